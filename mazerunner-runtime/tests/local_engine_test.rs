use mazerunner_common::config::{keys, Configuration};
use mazerunner_common::error::MazerunnerError;
use mazerunner_common::job::{JobDescriptor, PartitionDescription};
use mazerunner_runtime::context::ComputeContextManager;
use mazerunner_runtime::dispatcher::JobDispatcher;
use mazerunner_runtime::io::file::FileResultWriter;
use mazerunner_common::loader::ConfigurationLoader;
use mazerunner_runtime::local::{local_dispatcher as library_local_dispatcher, LocalEngine, LocalGraphAlgorithms};
use std::path::Path;
use std::sync::Arc;

fn local_dispatcher(root: &Path) -> JobDispatcher {
    let mut config = Configuration::with_defaults();
    config.put(keys::MASTER, "local[2]");
    let algorithms = LocalGraphAlgorithms::from_configuration(&config).unwrap();
    let contexts = Arc::new(
        ComputeContextManager::new(Arc::new(LocalEngine::new(root)), Arc::new(config))
            .with_artifact_location("file:///opt/mazerunner/processor"),
    );
    JobDispatcher::new(
        contexts,
        Arc::new(algorithms),
        Arc::new(FileResultWriter::new(root)),
        "",
    )
}

fn write_graph(root: &Path, name: &str, edges: &str) {
    let dir = root.join("graphs");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(name), edges).unwrap();
}

fn read_update(root: &Path, relative: &str) -> Vec<String> {
    std::fs::read_to_string(root.join(relative))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_connected_components_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    write_graph(root.path(), "g1", "1 2\n3 2\n# isolated pair\n5 4\n");
    let dispatcher = local_dispatcher(root.path());

    let report = dispatcher
        .dispatch(&JobDescriptor::whole("connected_components", "/graphs/g1"))
        .unwrap();

    assert_eq!(report.lines_written, 5);
    assert_eq!(
        read_update(root.path(), "neo4j/mazerunner/propertyUpdateList.txt"),
        vec!["1 1", "2 1", "3 1", "4 4", "5 4"]
    );
    assert!(root.path().join("neo4j/mazerunner").is_dir());
}

#[test]
fn test_pagerank_partitioned_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    write_graph(root.path(), "cycle", "1 2\n2 3\n3 1\n");
    let dispatcher = local_dispatcher(root.path());
    let job =
        JobDescriptor::partitioned("pagerank", "/graphs/cycle", PartitionDescription::new("42"));

    dispatcher.dispatch(&job).unwrap();

    let lines = read_update(
        root.path(),
        "neo4j/mazerunner/update/jobs/42/propertyUpdateList.txt",
    );
    assert_eq!(lines.len(), 3);
    for (line, expected_id) in lines.iter().zip(1u64..) {
        let (id, rank) = line.split_once(' ').unwrap();
        assert_eq!(id.parse::<u64>().unwrap(), expected_id);
        assert!((rank.parse::<f64>().unwrap() - 1.0).abs() < 1e-9, "{line}");
    }
}

#[test]
fn test_triangle_count_from_file_url() {
    let root = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    let edges = data.path().join("triangle.txt");
    std::fs::write(&edges, "1 2\n2 3\n3 1\n3 4\n").unwrap();
    let location = format!("file://{}", edges.display());

    let dispatcher = local_dispatcher(root.path());
    dispatcher
        .dispatch(&JobDescriptor::whole("triangle_count", location))
        .unwrap();

    assert_eq!(
        read_update(root.path(), "neo4j/mazerunner/propertyUpdateList.txt"),
        vec!["1 1", "2 1", "3 1", "4 0"]
    );
}

#[test]
fn test_strongly_connected_components_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    write_graph(root.path(), "g2", "1 2\n2 1\n2 3\n3 4\n4 3\n");
    let dispatcher = local_dispatcher(root.path());

    dispatcher
        .dispatch(&JobDescriptor::whole("strongly_connected_components", "/graphs/g2"))
        .unwrap();

    assert_eq!(
        read_update(root.path(), "neo4j/mazerunner/propertyUpdateList.txt"),
        vec!["1 1", "2 1", "3 3", "4 3"]
    );
}

#[test]
fn test_centrality_on_a_path() {
    let root = tempfile::tempdir().unwrap();
    write_graph(root.path(), "path", "1 2\n2 3\n");
    let dispatcher = local_dispatcher(root.path());
    let out = "neo4j/mazerunner/propertyUpdateList.txt";

    dispatcher
        .dispatch(&JobDescriptor::whole("BC", "/graphs/path"))
        .unwrap();
    assert_eq!(read_update(root.path(), out), vec!["1 0", "2 1", "3 0"]);

    dispatcher
        .dispatch(&JobDescriptor::whole("edge_betweenness", "/graphs/path"))
        .unwrap();
    assert_eq!(read_update(root.path(), out), vec!["1 2 2", "2 3 2"]);

    dispatcher
        .dispatch(&JobDescriptor::whole("CC", "/graphs/path"))
        .unwrap();
    assert_eq!(read_update(root.path(), out)[1], "2 1");
}

#[test]
fn test_cluster_only_algorithms_are_unsupported() {
    let root = tempfile::tempdir().unwrap();
    write_graph(root.path(), "g1", "1 2\n");
    let dispatcher = local_dispatcher(root.path());

    for key in ["collaborative_filtering", "LC"] {
        let err = dispatcher
            .dispatch(&JobDescriptor::whole(key, "/graphs/g1"))
            .unwrap_err();
        assert!(matches!(err, MazerunnerError::Unsupported(_)), "{key}");
    }
    assert!(!root.path().join("neo4j/mazerunner/propertyUpdateList.txt").exists());
}

#[test]
fn test_unknown_key_truncates_previous_update() {
    let root = tempfile::tempdir().unwrap();
    write_graph(root.path(), "g1", "1 2\n");
    let dispatcher = local_dispatcher(root.path());
    let out = "neo4j/mazerunner/propertyUpdateList.txt";

    dispatcher
        .dispatch(&JobDescriptor::whole("pagerank", "/graphs/g1"))
        .unwrap();
    assert_eq!(read_update(root.path(), out).len(), 2);

    dispatcher
        .dispatch(&JobDescriptor::whole("community", "/graphs/g1"))
        .unwrap();
    assert_eq!(std::fs::read_to_string(root.path().join(out)).unwrap(), "");
}

#[test]
fn test_missing_input_is_an_io_error() {
    let root = tempfile::tempdir().unwrap();
    let dispatcher = local_dispatcher(root.path());

    let err = dispatcher
        .dispatch(&JobDescriptor::whole("pagerank", "/graphs/nope"))
        .unwrap_err();
    assert!(matches!(err, MazerunnerError::Io(_)));
}

#[test]
fn test_default_configuration_writes_under_storage_root() {
    let root = tempfile::tempdir().unwrap();
    write_graph(root.path(), "g1", "1 2\n2 1\n");
    let dispatcher = library_local_dispatcher(ConfigurationLoader::new(), root.path()).unwrap();

    let report = dispatcher
        .dispatch(&JobDescriptor::whole("pagerank", "/graphs/g1"))
        .unwrap();

    assert_eq!(report.output_path, "/neo4j/mazerunner/propertyUpdateList.txt");
    assert_eq!(
        read_update(root.path(), "neo4j/mazerunner/propertyUpdateList.txt").len(),
        2
    );
}
