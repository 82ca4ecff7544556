use anyhow::{bail, Context};
use clap::Parser;
use mazerunner_common::config::keys;
use mazerunner_common::job::{JobDescriptor, PartitionDescription};
use mazerunner_common::loader::ConfigurationLoader;
use mazerunner_runtime::local::local_dispatcher;
use mazerunner_runtime::observability::{init_metrics, init_tracing};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(about = "Run one graph analysis job on the local engine")]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Job descriptor as JSON.
    #[arg(long, conflicts_with_all = ["analysis", "path", "partition_id"])]
    job: Option<PathBuf>,

    #[arg(long)]
    analysis: Option<String>,

    /// Input edge list location.
    #[arg(long)]
    path: Option<String>,

    /// Makes the job partitioned.
    #[arg(long)]
    partition_id: Option<String>,

    /// Root of the default filesystem. Overrides `mazerunner.hdfs.uri`. Only `file://`
    /// roots are used as given; anything else writes under the storage root.
    #[arg(long)]
    fs_root: Option<String>,

    /// Directory that bare paths resolve under.
    #[arg(long, default_value = "/tmp/mazerunner")]
    storage_root: PathBuf,

    #[arg(long)]
    dry_run: bool,

    /// Write the Prometheus exposition text here on exit.
    #[arg(long)]
    metrics_snapshot: Option<PathBuf>,
}

fn load_job(args: &Args) -> anyhow::Result<JobDescriptor> {
    if let Some(path) = &args.job {
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        return Ok(JobDescriptor::from_json(&bytes)?);
    }
    let (Some(analysis), Some(path)) = (&args.analysis, &args.path) else {
        bail!("either --job or both --analysis and --path are required");
    };
    Ok(match &args.partition_id {
        Some(id) => JobDescriptor::partitioned(
            analysis.as_str(),
            path.as_str(),
            PartitionDescription::new(id.as_str()),
        ),
        None => JobDescriptor::whole(analysis.as_str(), path.as_str()),
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();
    let metrics = init_metrics()?;

    let mut loader = match &args.config {
        Some(path) => ConfigurationLoader::from_file(path)?,
        None => ConfigurationLoader::new(),
    }
    .apply_env_overrides();
    if let Some(root) = &args.fs_root {
        loader.set(keys::HDFS_URI, root.as_str());
    }

    let job = load_job(&args)?;
    let dispatcher = local_dispatcher(loader, &args.storage_root)?;

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&job)?);
        println!("{}", serde_json::to_string_pretty(&dispatcher.plan(&job)?)?);
        return Ok(());
    }

    let outcome = dispatcher.dispatch(&job);

    if let Some(path) = &args.metrics_snapshot {
        std::fs::write(path, metrics.render())
            .with_context(|| format!("write metrics snapshot {}", path.display()))?;
    }

    let report = outcome?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
