use mazerunner_api::context::{ComputeContext, ComputeEngine, ContextConf};
use mazerunner_common::config::{keys, ConfigurationProvider};
use mazerunner_common::error::{MazerunnerError, MazerunnerResult};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Where the engine keeps fault-tolerance state, relative to the default filesystem.
pub const CHECKPOINT_DIR: &str = "/neo4j/mazerunner/";

/// Owns the one compute context of the process.
///
/// The context is built on first use from the configuration provider and handed out
/// unchanged afterwards. Concurrent first callers block until a single construction
/// finishes. If construction fails the error goes to the caller and the manager stays
/// empty.
pub struct ComputeContextManager {
    engine: Arc<dyn ComputeEngine>,
    provider: Arc<dyn ConfigurationProvider>,
    artifact_location: Option<String>,
    context: OnceCell<Arc<dyn ComputeContext>>,
}

impl ComputeContextManager {
    pub fn new(engine: Arc<dyn ComputeEngine>, provider: Arc<dyn ConfigurationProvider>) -> Self {
        Self {
            engine,
            provider,
            artifact_location: None,
            context: OnceCell::new(),
        }
    }

    /// Registers `location` (a URL) instead of the running executable.
    pub fn with_artifact_location(mut self, location: impl Into<String>) -> Self {
        self.artifact_location = Some(location.into());
        self
    }

    pub fn get_or_create_context(&self) -> MazerunnerResult<Arc<dyn ComputeContext>> {
        self.context
            .get_or_try_init(|| self.initialize())
            .map(Arc::clone)
    }

    /// The context if it has been created.
    pub fn context(&self) -> Option<Arc<dyn ComputeContext>> {
        self.context.get().cloned()
    }

    fn initialize(&self) -> MazerunnerResult<Arc<dyn ComputeContext>> {
        let conf = build_context_conf(self.provider.as_ref());
        info!(
            app_name = conf.app_name(),
            master = conf.master(),
            "creating compute context"
        );
        for (key, value) in conf.settings() {
            debug!(key, value, "context setting");
        }

        let ctx = self.engine.create_context(conf)?;

        let location = match &self.artifact_location {
            Some(location) => Ok(location.clone()),
            None => current_artifact_location(),
        };
        let artifact = match location.and_then(|l| decode_artifact_path(&l)) {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "could not decode artifact path; registering an empty path");
                String::new()
            }
        };
        ctx.add_artifact(&artifact);
        ctx.set_checkpoint_dir(CHECKPOINT_DIR)?;

        info!(artifact = %artifact, checkpoint_dir = CHECKPOINT_DIR, "compute context ready");
        Ok(ctx)
    }
}

/// Reads every context setting from `provider`, once.
pub fn build_context_conf(provider: &dyn ConfigurationProvider) -> ContextConf {
    ContextConf::new()
        .set_app_name(provider.app_name())
        .set_master(provider.master())
        .set(keys::EXECUTOR_MEMORY, provider.executor_memory())
        .set(keys::DRIVER_MEMORY, provider.driver_memory())
        .set(keys::EXECUTOR_INSTANCES, provider.executor_instances())
        .set(keys::STORAGE_MEMORY_FRACTION, provider.memory_fraction())
        .set(
            keys::DRIVER_EXTRA_JAVA_OPTIONS,
            provider.driver_extra_java_options(),
        )
        .set(
            keys::EXECUTOR_EXTRA_JAVA_OPTIONS,
            provider.executor_extra_java_options(),
        )
        .set(keys::SERIALIZER, provider.serializer())
        .set(
            keys::KRYO_REGISTRATION_REQUIRED,
            provider.registration_required(),
        )
        .set(keys::KRYO_BUFFER, provider.kryo_buffer())
        .set(keys::RDD_COMPRESS, provider.rdd_compress())
        .set(keys::TASK_MAX_FAILURES, provider.task_max_failures())
        .set(keys::AKKA_FRAME_SIZE, provider.akka_frame_size())
}

/// `file://` URL of the running executable.
pub fn current_artifact_location() -> MazerunnerResult<String> {
    let exe = std::env::current_exe()?;
    Url::from_file_path(&exe)
        .map(String::from)
        .map_err(|_| {
            MazerunnerError::InvalidArgument(format!(
                "executable path is not absolute: {}",
                exe.display()
            ))
        })
}

/// Turns a percent-encoded `file://` URL into a plain filesystem path.
pub fn decode_artifact_path(location: &str) -> MazerunnerResult<String> {
    let url = Url::parse(location).map_err(|e| {
        MazerunnerError::InvalidArgument(format!("artifact location {location:?}: {e}"))
    })?;
    let path = url.to_file_path().map_err(|_| {
        MazerunnerError::InvalidArgument(format!("artifact location is not a file URL: {url}"))
    })?;
    path.into_os_string().into_string().map_err(|raw| {
        MazerunnerError::InvalidArgument(format!("artifact path is not UTF-8: {raw:?}"))
    })
}
