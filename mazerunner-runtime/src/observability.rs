use mazerunner_common::error::{MazerunnerError, MazerunnerResult};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Installs the global Prometheus recorder. Render the returned handle to snapshot
/// the dispatch counters.
pub fn init_metrics() -> MazerunnerResult<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MazerunnerError::Internal(format!("prometheus init: {e}")))
}
