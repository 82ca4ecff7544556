use std::collections::HashMap;

/// Property names understood by the processor. The `spark.*` names are passed to
/// the compute engine verbatim.
pub mod keys {
    pub const APP_NAME: &str = "spark.app.name";
    pub const MASTER: &str = "spark.master";
    pub const EXECUTOR_MEMORY: &str = "spark.executor.memory";
    pub const DRIVER_MEMORY: &str = "spark.driver.memory";
    pub const EXECUTOR_INSTANCES: &str = "spark.executor.instances";
    pub const STORAGE_MEMORY_FRACTION: &str = "spark.storage.memoryFraction";
    pub const DRIVER_EXTRA_JAVA_OPTIONS: &str = "spark.driver.extraJavaOptions";
    pub const EXECUTOR_EXTRA_JAVA_OPTIONS: &str = "spark.executor.extraJavaOptions";
    pub const SERIALIZER: &str = "spark.serializer";
    pub const KRYO_REGISTRATION_REQUIRED: &str = "spark.kryo.registrationRequired";
    pub const KRYO_BUFFER: &str = "spark.kryoserializer.buffer";
    pub const RDD_COMPRESS: &str = "spark.rdd.compress";
    pub const TASK_MAX_FAILURES: &str = "spark.task.maxFailures";
    pub const AKKA_FRAME_SIZE: &str = "spark.akka.frameSize";

    pub const HDFS_URI: &str = "mazerunner.hdfs.uri";
    pub const UNKNOWN_ANALYSIS_POLICY: &str = "mazerunner.dispatch.unknown_analysis";
    pub const PAGERANK_ITERATIONS: &str = "mazerunner.pagerank.iterations";
    pub const PAGERANK_ALPHA: &str = "mazerunner.pagerank.alpha";
}

pub const DEFAULTS: &[(&str, &str)] = &[
    (keys::APP_NAME, "mazerunner"),
    (keys::MASTER, "local[*]"),
    (keys::EXECUTOR_MEMORY, "4g"),
    (keys::DRIVER_MEMORY, "2g"),
    (keys::EXECUTOR_INSTANCES, "1"),
    (keys::STORAGE_MEMORY_FRACTION, "0.5"),
    (keys::DRIVER_EXTRA_JAVA_OPTIONS, ""),
    (keys::EXECUTOR_EXTRA_JAVA_OPTIONS, ""),
    (keys::SERIALIZER, "org.apache.spark.serializer.KryoSerializer"),
    (keys::KRYO_REGISTRATION_REQUIRED, "false"),
    (keys::KRYO_BUFFER, "64k"),
    (keys::RDD_COMPRESS, "true"),
    (keys::TASK_MAX_FAILURES, "4"),
    (keys::AKKA_FRAME_SIZE, "128"),
    (keys::HDFS_URI, "hdfs://0.0.0.0:9000"),
    (keys::UNKNOWN_ANALYSIS_POLICY, "write_empty"),
    (keys::PAGERANK_ITERATIONS, "20"),
    (keys::PAGERANK_ALPHA, "0.85"),
];

pub fn default_value(key: &str) -> &'static str {
    DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or("")
}

#[derive(Debug, Clone, Default)]
pub struct Configuration {
    config: HashMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            config: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut config = Self::new();
        for (key, value) in DEFAULTS {
            config.put(*key, *value);
        }
        config
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.config.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.config.get(key)
    }

    pub fn get_string(&self, key: &str, default_value: &str) -> String {
        self.config
            .get(key)
            .cloned()
            .unwrap_or_else(|| default_value.to_string())
    }

    fn value_or_default(&self, key: &str) -> String {
        self.get_string(key, default_value(key))
    }

    pub fn len(&self) -> usize {
        self.config.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
    }
}

/// Read-only access to the values the processor needs to stand up a compute context
/// and locate the distributed filesystem.
pub trait ConfigurationProvider: Send + Sync {
    fn app_name(&self) -> String;
    fn master(&self) -> String;
    fn executor_memory(&self) -> String;
    fn driver_memory(&self) -> String;
    fn executor_instances(&self) -> String;
    fn memory_fraction(&self) -> String;
    fn driver_extra_java_options(&self) -> String;
    fn executor_extra_java_options(&self) -> String;
    fn serializer(&self) -> String;
    fn registration_required(&self) -> String;
    fn kryo_buffer(&self) -> String;
    fn rdd_compress(&self) -> String;
    fn task_max_failures(&self) -> String;
    fn akka_frame_size(&self) -> String;
    fn hdfs_uri(&self) -> String;
}

impl ConfigurationProvider for Configuration {
    fn app_name(&self) -> String {
        self.value_or_default(keys::APP_NAME)
    }

    fn master(&self) -> String {
        self.value_or_default(keys::MASTER)
    }

    fn executor_memory(&self) -> String {
        self.value_or_default(keys::EXECUTOR_MEMORY)
    }

    fn driver_memory(&self) -> String {
        self.value_or_default(keys::DRIVER_MEMORY)
    }

    fn executor_instances(&self) -> String {
        self.value_or_default(keys::EXECUTOR_INSTANCES)
    }

    fn memory_fraction(&self) -> String {
        self.value_or_default(keys::STORAGE_MEMORY_FRACTION)
    }

    fn driver_extra_java_options(&self) -> String {
        self.value_or_default(keys::DRIVER_EXTRA_JAVA_OPTIONS)
    }

    fn executor_extra_java_options(&self) -> String {
        self.value_or_default(keys::EXECUTOR_EXTRA_JAVA_OPTIONS)
    }

    fn serializer(&self) -> String {
        self.value_or_default(keys::SERIALIZER)
    }

    fn registration_required(&self) -> String {
        self.value_or_default(keys::KRYO_REGISTRATION_REQUIRED)
    }

    fn kryo_buffer(&self) -> String {
        self.value_or_default(keys::KRYO_BUFFER)
    }

    fn rdd_compress(&self) -> String {
        self.value_or_default(keys::RDD_COMPRESS)
    }

    fn task_max_failures(&self) -> String {
        self.value_or_default(keys::TASK_MAX_FAILURES)
    }

    fn akka_frame_size(&self) -> String {
        self.value_or_default(keys::AKKA_FRAME_SIZE)
    }

    fn hdfs_uri(&self) -> String {
        self.value_or_default(keys::HDFS_URI)
    }
}
