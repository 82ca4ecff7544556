//! Single-process compute engine. Runs every analysis on a rayon pool and treats a
//! directory on local disk as the default filesystem.

pub mod algorithms;
pub mod engine;

pub use algorithms::LocalGraphAlgorithms;
pub use engine::{LocalContext, LocalEngine};

use crate::context::ComputeContextManager;
use crate::dispatcher::{JobDispatcher, UnknownAnalysisPolicy};
use crate::io::file::FileResultWriter;
use mazerunner_common::config::ConfigurationProvider;
use mazerunner_common::error::MazerunnerResult;
use mazerunner_common::loader::ConfigurationLoader;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Filesystem root the local writer can reach. A `file://` root is kept; any other
/// scheme is replaced by the empty root so output lands under the storage root.
pub fn local_fs_root(configured: &str) -> String {
    if configured.is_empty() || configured.starts_with("file://") {
        return configured.to_string();
    }
    warn!(
        fs_root = configured,
        "filesystem root is not local; writing under the storage root instead"
    );
    String::new()
}

/// Dispatcher over the local engine and the file writer, both rooted at `storage_root`.
pub fn local_dispatcher(
    loader: ConfigurationLoader,
    storage_root: &Path,
) -> MazerunnerResult<JobDispatcher> {
    let config = loader.configuration().clone();
    let fs_root = local_fs_root(&loader.hdfs_uri());
    let algorithms = LocalGraphAlgorithms::from_configuration(&config)?;
    let policy = UnknownAnalysisPolicy::from_configuration(&config)?;

    let contexts = Arc::new(ComputeContextManager::new(
        Arc::new(LocalEngine::new(storage_root)),
        Arc::new(loader),
    ));
    Ok(JobDispatcher::new(
        contexts,
        Arc::new(algorithms),
        Arc::new(FileResultWriter::new(storage_root)),
        fs_root,
    )
    .with_unknown_analysis_policy(policy))
}
