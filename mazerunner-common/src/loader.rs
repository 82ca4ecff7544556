use crate::config::{keys, Configuration, ConfigurationProvider};
use crate::error::{MazerunnerError, MazerunnerResult};
use std::path::Path;
use tracing::debug;

/// Environment variables that take precedence over file values.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SPARK_HOST", keys::MASTER),
    ("HDFS_HOST", keys::HDFS_URI),
    ("SPARK_EXECUTOR_MEMORY", keys::EXECUTOR_MEMORY),
    ("SPARK_DRIVER_MEMORY", keys::DRIVER_MEMORY),
    ("SPARK_EXECUTOR_INSTANCES", keys::EXECUTOR_INSTANCES),
    ("MAZERUNNER_APP_NAME", keys::APP_NAME),
];

/// Layered configuration: built-in defaults, then an optional TOML file, then the
/// environment.
#[derive(Debug, Clone)]
pub struct ConfigurationLoader {
    config: Configuration,
}

impl Default for ConfigurationLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationLoader {
    pub fn new() -> Self {
        Self {
            config: Configuration::with_defaults(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> MazerunnerResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            MazerunnerError::Config(format!("read {}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> MazerunnerResult<Self> {
        let table: toml::Table =
            toml::from_str(text).map_err(|e| MazerunnerError::Config(format!("{e}")))?;
        let mut loader = Self::new();
        flatten_into(&mut loader.config, "", &table)?;
        Ok(loader)
    }

    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(std::env::vars())
    }

    pub fn apply_overrides<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if let Some((_, key)) = ENV_OVERRIDES.iter().find(|(env, _)| *env == name) {
                debug!(env = %name, key = %key, "configuration override from environment");
                self.config.put(*key, value);
            }
        }
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.config.put(key, value);
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }
}

fn flatten_into(
    config: &mut Configuration,
    prefix: &str,
    table: &toml::Table,
) -> MazerunnerResult<()> {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            toml::Value::Table(inner) => flatten_into(config, &key, inner)?,
            toml::Value::String(s) => config.put(key, s.clone()),
            toml::Value::Integer(i) => config.put(key, i.to_string()),
            toml::Value::Float(f) => config.put(key, f.to_string()),
            toml::Value::Boolean(b) => config.put(key, b.to_string()),
            toml::Value::Datetime(d) => config.put(key, d.to_string()),
            toml::Value::Array(_) => {
                return Err(MazerunnerError::Config(format!(
                    "array values are not supported: {key}"
                )))
            }
        }
    }
    Ok(())
}

impl ConfigurationProvider for ConfigurationLoader {
    fn app_name(&self) -> String {
        self.config.app_name()
    }

    fn master(&self) -> String {
        self.config.master()
    }

    fn executor_memory(&self) -> String {
        self.config.executor_memory()
    }

    fn driver_memory(&self) -> String {
        self.config.driver_memory()
    }

    fn executor_instances(&self) -> String {
        self.config.executor_instances()
    }

    fn memory_fraction(&self) -> String {
        self.config.memory_fraction()
    }

    fn driver_extra_java_options(&self) -> String {
        self.config.driver_extra_java_options()
    }

    fn executor_extra_java_options(&self) -> String {
        self.config.executor_extra_java_options()
    }

    fn serializer(&self) -> String {
        self.config.serializer()
    }

    fn registration_required(&self) -> String {
        self.config.registration_required()
    }

    fn kryo_buffer(&self) -> String {
        self.config.kryo_buffer()
    }

    fn rdd_compress(&self) -> String {
        self.config.rdd_compress()
    }

    fn task_max_failures(&self) -> String {
        self.config.task_max_failures()
    }

    fn akka_frame_size(&self) -> String {
        self.config.akka_frame_size()
    }

    fn hdfs_uri(&self) -> String {
        self.config.hdfs_uri()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_tables_flatten_to_dotted_keys() {
        let loader = ConfigurationLoader::from_toml_str(
            r#"
            [spark]
            master = "local[2]"

            [spark.executor]
            memory = "8g"
            instances = 3

            [spark.rdd]
            compress = false

            [mazerunner.hdfs]
            uri = "file:///tmp/mazerunner"
            "#,
        )
        .unwrap();

        assert_eq!(loader.master(), "local[2]");
        assert_eq!(loader.executor_memory(), "8g");
        assert_eq!(loader.executor_instances(), "3");
        assert_eq!(loader.rdd_compress(), "false");
        assert_eq!(loader.hdfs_uri(), "file:///tmp/mazerunner");
        assert_eq!(loader.driver_memory(), "2g");
    }

    #[test]
    fn quoted_keys_are_kept_whole() {
        let loader = ConfigurationLoader::from_toml_str(
            r#"
            [spark]
            "akka.frameSize" = 256
            "#,
        )
        .unwrap();
        assert_eq!(loader.akka_frame_size(), "256");
    }

    #[test]
    fn arrays_are_rejected() {
        let err =
            ConfigurationLoader::from_toml_str("spark.master = [\"a\", \"b\"]").unwrap_err();
        assert!(matches!(err, MazerunnerError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = ConfigurationLoader::from_toml_str("[spark\nmaster = 1").unwrap_err();
        assert!(matches!(err, MazerunnerError::Config(_)));
    }

    #[test]
    fn environment_overrides_file_values() {
        let loader = ConfigurationLoader::from_toml_str("[spark]\nmaster = \"local[2]\"\n")
            .unwrap()
            .apply_overrides(vec![
                ("SPARK_HOST".to_string(), "spark://master:7077".to_string()),
                ("HDFS_HOST".to_string(), "hdfs://namenode:9000".to_string()),
                ("UNRELATED".to_string(), "ignored".to_string()),
            ]);
        assert_eq!(loader.master(), "spark://master:7077");
        assert_eq!(loader.hdfs_uri(), "hdfs://namenode:9000");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigurationLoader::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, MazerunnerError::Config(_)));
    }
}
