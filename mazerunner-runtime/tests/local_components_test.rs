use mazerunner_api::graph::VertexGraph;
use mazerunner_common::types::{Edge, Vertex};
use mazerunner_runtime::algorithms::components::ConnectedComponentsAlgorithm;
use mazerunner_runtime::graph::partitioned_graph::PartitionedGraph;

#[test]
fn test_min_label_propagation_parallel() {
    let vertices = vec![
        Vertex::new(1u64, 1u64),
        Vertex::new(2, 2),
        Vertex::new(3, 3),
        Vertex::new(7, 7),
        Vertex::new(9, 9),
    ];
    let edges = vec![
        Edge::new(1u64, 2u64, ()),
        Edge::new(2u64, 1u64, ()),
        Edge::new(2u64, 3u64, ()),
        Edge::new(3u64, 2u64, ()),
        Edge::new(9u64, 7u64, ()),
        Edge::new(7u64, 9u64, ()),
    ];

    let graph = PartitionedGraph::new(vertices, edges, 2);
    let result = graph.run(&ConnectedComponentsAlgorithm::default(), 4);

    let mut vertices = result.vertices();
    vertices.sort_by_key(|v| v.id);
    let labels: Vec<(u64, u64)> = vertices.iter().map(|v| (v.id, v.value)).collect();

    assert_eq!(labels, vec![(1, 1), (2, 1), (3, 1), (7, 7), (9, 7)]);
}

#[test]
fn test_superstep_cap_stops_propagation() {
    let vertices = (1u64..=4).map(|id| Vertex::new(id, id)).collect();
    let edges = (1u64..4)
        .flat_map(|id| [Edge::new(id, id + 1, ()), Edge::new(id + 1, id, ())])
        .collect();

    // superstep 1 seeds, superstep 2 lets each vertex see its neighbours
    let result = PartitionedGraph::new(vertices, edges, 1)
        .run(&ConnectedComponentsAlgorithm::new(2), 1);
    let mut vertices = result.vertices();
    vertices.sort_by_key(|v| v.id);
    let labels: Vec<u64> = vertices.iter().map(|v| v.value).collect();

    assert_eq!(labels, vec![1, 1, 2, 3]);
}
