use crate::context::ComputeContextManager;
use mazerunner_api::algorithm::{empty_results, AnalysisKind, GraphAlgorithms, UnknownAnalysis};
use mazerunner_api::writer::ResultWriter;
use mazerunner_common::config::{keys, Configuration};
use mazerunner_common::error::{MazerunnerError, MazerunnerResult};
use mazerunner_common::job::{JobDescriptor, ProcessorMode};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Output location of a whole-graph job.
pub const PROPERTY_GRAPH_UPDATE_PATH: &str = "/neo4j/mazerunner/propertyUpdateList.txt";

/// Output location template of a partitioned job. `{job_name}` becomes the partition id.
pub const PARTITIONED_PROPERTY_GRAPH_UPDATE_PATH: &str =
    "/neo4j/mazerunner/update/jobs/{job_name}/propertyUpdateList.txt";

/// What happens to a job whose analysis key names no algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownAnalysisPolicy {
    /// Log the key and write an empty update list.
    #[default]
    WriteEmpty,
    Reject,
}

impl UnknownAnalysisPolicy {
    pub fn from_configuration(config: &Configuration) -> MazerunnerResult<Self> {
        config
            .get_string(keys::UNKNOWN_ANALYSIS_POLICY, "write_empty")
            .parse()
    }
}

impl FromStr for UnknownAnalysisPolicy {
    type Err = MazerunnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "write_empty" => Ok(UnknownAnalysisPolicy::WriteEmpty),
            "reject" => Ok(UnknownAnalysisPolicy::Reject),
            other => Err(MazerunnerError::Config(format!(
                "{}: expected write_empty or reject, got {other:?}",
                keys::UNKNOWN_ANALYSIS_POLICY
            ))),
        }
    }
}

impl fmt::Display for UnknownAnalysisPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownAnalysisPolicy::WriteEmpty => f.write_str("write_empty"),
            UnknownAnalysisPolicy::Reject => f.write_str("reject"),
        }
    }
}

/// Where a job's results go: `fs_root` followed by the mode's path.
pub fn resolve_output_path(fs_root: &str, job: &JobDescriptor) -> MazerunnerResult<String> {
    match job.mode {
        ProcessorMode::Whole => Ok(format!("{fs_root}{PROPERTY_GRAPH_UPDATE_PATH}")),
        ProcessorMode::Partitioned => {
            let partition = job.partition_description.as_ref().ok_or_else(|| {
                MazerunnerError::InvalidArgument(
                    "partitioned job without a partition description".to_string(),
                )
            })?;
            let id = partition.partition_id.as_str();
            let path = PARTITIONED_PROPERTY_GRAPH_UPDATE_PATH.replace("{job_name}", id);
            Ok(format!("{fs_root}{path}"))
        }
    }
}

/// How a job would be executed, without running it.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchPlan {
    pub analysis: Option<AnalysisKind>,
    pub input_path: String,
    pub output_path: String,
    pub unknown_analysis_policy: UnknownAnalysisPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchReport {
    pub analysis: Option<AnalysisKind>,
    pub output_path: String,
    pub lines_written: u64,
}

/// Routes jobs to graph algorithms and hands the results to a [`ResultWriter`].
pub struct JobDispatcher {
    contexts: Arc<ComputeContextManager>,
    algorithms: Arc<dyn GraphAlgorithms>,
    writer: Arc<dyn ResultWriter>,
    fs_root: String,
    unknown_analysis: UnknownAnalysisPolicy,
}

impl JobDispatcher {
    pub fn new(
        contexts: Arc<ComputeContextManager>,
        algorithms: Arc<dyn GraphAlgorithms>,
        writer: Arc<dyn ResultWriter>,
        fs_root: impl Into<String>,
    ) -> Self {
        Self {
            contexts,
            algorithms,
            writer,
            fs_root: fs_root.into(),
            unknown_analysis: UnknownAnalysisPolicy::default(),
        }
    }

    pub fn with_unknown_analysis_policy(mut self, policy: UnknownAnalysisPolicy) -> Self {
        self.unknown_analysis = policy;
        self
    }

    pub fn contexts(&self) -> &Arc<ComputeContextManager> {
        &self.contexts
    }

    pub fn plan(&self, job: &JobDescriptor) -> MazerunnerResult<DispatchPlan> {
        Ok(DispatchPlan {
            analysis: self.apply_policy(job.analysis.parse())?,
            input_path: job.path.clone(),
            output_path: resolve_output_path(&self.fs_root, job)?,
            unknown_analysis_policy: self.unknown_analysis,
        })
    }

    /// Runs the job's analysis and writes its update list.
    ///
    /// The compute context is obtained (and built, on first use) before anything else.
    /// Algorithm input is always the job's `path`. The writer receives the output path
    /// separately so the descriptor is never touched.
    pub fn dispatch(&self, job: &JobDescriptor) -> MazerunnerResult<DispatchReport> {
        let started = Instant::now();
        let ctx = self.contexts.get_or_create_context()?;
        let parsed = job.analysis.parse::<AnalysisKind>();
        if let Err(unknown) = &parsed {
            warn!("Did not recognize analysis key: {}", unknown.0);
            metrics::counter!("mazerunner_jobs_unrecognized_total").increment(1);
        }
        let analysis = self.apply_policy(parsed)?;

        let results = match analysis {
            Some(kind) => {
                info!(analysis = %kind, path = %job.path, "running analysis");
                metrics::counter!("mazerunner_jobs_dispatched_total", "analysis" => kind.key())
                    .increment(1);
                kind.run(self.algorithms.as_ref(), ctx.as_ref(), &job.path)?
            }
            None => empty_results(),
        };

        let output_path = resolve_output_path(&self.fs_root, job)?;
        let lines_written = self.writer.write_update(job, &output_path, results)?;
        metrics::counter!("mazerunner_result_lines_written_total").increment(lines_written);
        metrics::histogram!("mazerunner_dispatch_seconds").record(started.elapsed().as_secs_f64());

        info!(
            analysis = %job.analysis,
            output_path = %output_path,
            lines = lines_written,
            "job finished"
        );
        Ok(DispatchReport {
            analysis,
            output_path,
            lines_written,
        })
    }

    /// Maps a parsed key to the analysis to run. Has no side effects.
    fn apply_policy(
        &self,
        parsed: Result<AnalysisKind, UnknownAnalysis>,
    ) -> MazerunnerResult<Option<AnalysisKind>> {
        match (parsed, self.unknown_analysis) {
            (Ok(kind), _) => Ok(Some(kind)),
            (Err(_), UnknownAnalysisPolicy::WriteEmpty) => Ok(None),
            (Err(unknown), UnknownAnalysisPolicy::Reject) => {
                Err(MazerunnerError::InvalidArgument(unknown.to_string()))
            }
        }
    }
}
