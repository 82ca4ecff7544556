use std::path::Path;
use std::process::{Command, Output};

fn submit(storage_root: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mazerunner-submit"));
    for var in [
        "SPARK_HOST",
        "HDFS_HOST",
        "SPARK_EXECUTOR_MEMORY",
        "SPARK_DRIVER_MEMORY",
        "SPARK_EXECUTOR_INSTANCES",
        "MAZERUNNER_APP_NAME",
    ] {
        cmd.env_remove(var);
    }
    cmd.arg("--storage-root")
        .arg(storage_root)
        .args(args)
        .output()
        .unwrap()
}

fn write_graph(root: &Path, edges: &str) {
    std::fs::create_dir_all(root.join("graphs")).unwrap();
    std::fs::write(root.join("graphs/g1"), edges).unwrap();
}

#[test]
fn test_submit_with_default_configuration() {
    let root = tempfile::tempdir().unwrap();
    write_graph(root.path(), "1 2\n2 3\n3 1\n");

    let out = submit(root.path(), &["--analysis", "pagerank", "--path", "/graphs/g1"]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let written =
        std::fs::read_to_string(root.path().join("neo4j/mazerunner/propertyUpdateList.txt"))
            .unwrap();
    assert_eq!(written.lines().count(), 3);
}

#[test]
fn test_failed_job_still_writes_metrics_snapshot() {
    let root = tempfile::tempdir().unwrap();
    write_graph(root.path(), "1 2\n");
    let snapshot = root.path().join("metrics.prom");

    let out = submit(
        root.path(),
        &[
            "--analysis",
            "LC",
            "--path",
            "/graphs/g1",
            "--metrics-snapshot",
            snapshot.to_str().unwrap(),
        ],
    );

    assert!(!out.status.success());
    let rendered = std::fs::read_to_string(&snapshot).unwrap();
    assert!(rendered.contains("mazerunner_jobs_dispatched_total"), "{rendered}");
}

#[test]
fn test_dry_run_writes_nothing() {
    let root = tempfile::tempdir().unwrap();

    let out = submit(
        root.path(),
        &["--analysis", "community", "--path", "/graphs/g1", "--dry-run"],
    );

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("\"output_path\": \"/neo4j/mazerunner/propertyUpdateList.txt\""));
    assert!(!root.path().join("neo4j").exists());
}
