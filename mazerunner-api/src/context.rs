use mazerunner_common::error::MazerunnerResult;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named settings a compute context is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextConf {
    app_name: String,
    master: String,
    settings: BTreeMap<String, String>,
}

impl ContextConf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn set_master(mut self, master: impl Into<String>) -> Self {
        self.master = master.into();
        self
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn master(&self) -> &str {
        &self.master
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    pub fn settings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.settings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Handle to a configured compute cluster. Algorithms run against it.
pub trait ComputeContext: Send + Sync + std::fmt::Debug {
    fn conf(&self) -> &ContextConf;

    /// Ships an artifact to the workers. An empty path is accepted and ignored by
    /// the engine.
    fn add_artifact(&self, path: &str);

    fn set_checkpoint_dir(&self, dir: &str) -> MazerunnerResult<()>;

    fn as_any(&self) -> &dyn Any;
}

pub trait ComputeEngine: Send + Sync {
    fn create_context(&self, conf: ContextConf) -> MazerunnerResult<Arc<dyn ComputeContext>>;
}
