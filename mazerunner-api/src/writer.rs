use crate::algorithm::ResultLines;
use mazerunner_common::error::MazerunnerResult;
use mazerunner_common::job::JobDescriptor;

/// Persists a property update list. Returns the number of lines written.
pub trait ResultWriter: Send + Sync {
    fn write_update(
        &self,
        job: &JobDescriptor,
        output_path: &str,
        results: ResultLines,
    ) -> MazerunnerResult<u64>;
}
