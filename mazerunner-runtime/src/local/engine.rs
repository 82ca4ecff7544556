use mazerunner_api::context::{ComputeContext, ComputeEngine, ContextConf};
use mazerunner_common::error::{MazerunnerError, MazerunnerResult};
use std::any::Any;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// Builds [`LocalContext`]s for `local`, `local[N]` and `local[*]` masters.
#[derive(Debug, Clone)]
pub struct LocalEngine {
    storage_root: PathBuf,
}

impl LocalEngine {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
        }
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }
}

impl ComputeEngine for LocalEngine {
    fn create_context(&self, conf: ContextConf) -> MazerunnerResult<Arc<dyn ComputeContext>> {
        let parallelism = parse_local_master(conf.master())?;
        info!(
            app_name = conf.app_name(),
            parallelism,
            storage_root = %self.storage_root.display(),
            "local context started"
        );
        Ok(Arc::new(LocalContext {
            conf,
            parallelism,
            storage_root: self.storage_root.clone(),
            artifacts: Mutex::new(Vec::new()),
            checkpoint_dir: Mutex::new(None),
        }))
    }
}

/// Worker count encoded in a local master URL.
pub fn parse_local_master(master: &str) -> MazerunnerResult<usize> {
    let threads = match master {
        "local" => Some(1),
        "local[*]" => Some(rayon::current_num_threads()),
        _ => master
            .strip_prefix("local[")
            .and_then(|rest| rest.strip_suffix(']'))
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|n| *n > 0),
    };
    threads.ok_or_else(|| {
        MazerunnerError::Context(format!("master {master:?} is not a local master"))
    })
}

#[derive(Debug)]
pub struct LocalContext {
    conf: ContextConf,
    parallelism: usize,
    storage_root: PathBuf,
    artifacts: Mutex<Vec<String>>,
    checkpoint_dir: Mutex<Option<PathBuf>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl LocalContext {
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    pub fn artifacts(&self) -> Vec<String> {
        lock(&self.artifacts).clone()
    }

    pub fn checkpoint_dir(&self) -> Option<PathBuf> {
        lock(&self.checkpoint_dir).clone()
    }
}

impl ComputeContext for LocalContext {
    fn conf(&self) -> &ContextConf {
        &self.conf
    }

    fn add_artifact(&self, path: &str) {
        if path.is_empty() {
            warn!("empty artifact path, nothing registered");
            return;
        }
        lock(&self.artifacts).push(path.to_string());
    }

    fn set_checkpoint_dir(&self, dir: &str) -> MazerunnerResult<()> {
        let resolved = self.storage_root.join(dir.trim_start_matches('/'));
        fs::create_dir_all(&resolved)?;
        info!(checkpoint_dir = %resolved.display(), "checkpoint directory set");
        *lock(&self.checkpoint_dir) = Some(resolved);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_local_masters() {
        assert_eq!(parse_local_master("local").unwrap(), 1);
        assert_eq!(parse_local_master("local[6]").unwrap(), 6);
        assert!(parse_local_master("local[*]").unwrap() >= 1);
        for bad in ["local[0]", "local[x]", "spark://master:7077", "yarn", ""] {
            assert!(
                matches!(parse_local_master(bad), Err(MazerunnerError::Context(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn checkpoint_dir_lands_under_storage_root() {
        let dir = tempfile::tempdir().unwrap();
        let engine = LocalEngine::new(dir.path());
        let ctx = engine
            .create_context(ContextConf::new().set_master("local[2]"))
            .unwrap();
        ctx.set_checkpoint_dir("/neo4j/mazerunner/").unwrap();
        ctx.add_artifact("");
        ctx.add_artifact("/opt/mazerunner/bin/mazerunner-submit");

        let local = ctx.as_any().downcast_ref::<LocalContext>().unwrap();
        assert_eq!(local.parallelism(), 2);
        assert!(dir.path().join("neo4j/mazerunner").is_dir());
        assert_eq!(
            local.artifacts(),
            vec!["/opt/mazerunner/bin/mazerunner-submit".to_string()]
        );
    }
}
