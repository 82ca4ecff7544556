use super::DenseGraph;
use mazerunner_common::types::VertexId;
use rayon::prelude::*;

/// Number of triangles each vertex takes part in, edge direction ignored.
pub fn triangle_count(graph: &DenseGraph) -> Vec<(VertexId, u64)> {
    (0..graph.len())
        .into_par_iter()
        .map(|v| {
            let neighbors = graph.neighbors(v);
            let mut count = 0u64;
            for (i, &u) in neighbors.iter().enumerate() {
                let u_neighbors = graph.neighbors(u);
                for &w in &neighbors[i + 1..] {
                    if u_neighbors.binary_search(&w).is_ok() {
                        count += 1;
                    }
                }
            }
            (graph.id(v), count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazerunner_common::types::Edge;

    #[test]
    fn square_with_diagonal_has_two_triangles() {
        // 1-2-3-4-1 plus the 1-3 diagonal
        let edges = vec![
            Edge::new(1u64, 2u64, ()),
            Edge::new(2, 3, ()),
            Edge::new(3, 4, ()),
            Edge::new(4, 1, ()),
            Edge::new(1, 3, ()),
        ];
        let counts = triangle_count(&DenseGraph::undirected(&edges));
        assert_eq!(counts, vec![(1, 2), (2, 1), (3, 2), (4, 1)]);
    }
}
