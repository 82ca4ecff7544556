use super::DenseGraph;
use mazerunner_common::types::VertexId;
use rayon::prelude::*;
use std::collections::{HashMap, VecDeque};

/// Closeness centrality on an undirected graph where every edge costs `weight`.
/// Vertices that reach nothing score 0.
pub fn closeness_centrality(graph: &DenseGraph, weight: u32) -> Vec<(VertexId, f64)> {
    let weight = f64::from(weight.max(1));
    (0..graph.len())
        .into_par_iter()
        .map(|source| {
            let dist = bfs_distances(graph, source);
            let (reached, total) = dist
                .iter()
                .filter_map(|d| *d)
                .filter(|d| *d > 0)
                .fold((0u64, 0u64), |(n, sum), d| (n + 1, sum + d));
            let score = if total == 0 {
                0.0
            } else {
                reached as f64 / (total as f64 * weight)
            };
            (graph.id(source), score)
        })
        .collect()
}

fn bfs_distances(graph: &DenseGraph, source: usize) -> Vec<Option<u64>> {
    let mut dist = vec![None; graph.len()];
    dist[source] = Some(0);
    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        let next = dist[v].map(|d| d + 1);
        for &w in graph.neighbors(v) {
            if dist[w].is_none() {
                dist[w] = next;
                queue.push_back(w);
            }
        }
    }
    dist
}

/// Accumulated shortest-path dependencies for one or many sources.
struct Dependencies {
    vertices: Vec<f64>,
    edges: HashMap<(usize, usize), f64>,
}

impl Dependencies {
    fn new(n: usize) -> Self {
        Self {
            vertices: vec![0.0; n],
            edges: HashMap::new(),
        }
    }

    fn merge(mut self, other: Dependencies) -> Self {
        for (acc, v) in self.vertices.iter_mut().zip(other.vertices) {
            *acc += v;
        }
        for (edge, v) in other.edges {
            *self.edges.entry(edge).or_insert(0.0) += v;
        }
        self
    }
}

// Brandes' algorithm over unweighted undirected shortest paths.
fn brandes(graph: &DenseGraph) -> Dependencies {
    let n = graph.len();
    let mut total = (0..n)
        .into_par_iter()
        .fold(
            || Dependencies::new(n),
            |mut acc, source| {
                accumulate_from(graph, source, &mut acc);
                acc
            },
        )
        .reduce(|| Dependencies::new(n), Dependencies::merge);

    // every undirected path is seen from both ends
    for v in &mut total.vertices {
        *v /= 2.0;
    }
    for v in total.edges.values_mut() {
        *v /= 2.0;
    }
    total
}

fn accumulate_from(graph: &DenseGraph, source: usize, acc: &mut Dependencies) {
    let n = graph.len();
    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0f64; n];
    let mut dist: Vec<i64> = vec![-1; n];
    sigma[source] = 1.0;
    dist[source] = 0;

    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        order.push(v);
        for &w in graph.neighbors(v) {
            if dist[w] < 0 {
                dist[w] = dist[v] + 1;
                queue.push_back(w);
            }
            if dist[w] == dist[v] + 1 {
                sigma[w] += sigma[v];
                preds[w].push(v);
            }
        }
    }

    let mut delta = vec![0f64; n];
    while let Some(w) = order.pop() {
        for &v in &preds[w] {
            let c = sigma[v] / sigma[w] * (1.0 + delta[w]);
            let key = (v.min(w), v.max(w));
            *acc.edges.entry(key).or_insert(0.0) += c;
            delta[v] += c;
        }
        if w != source {
            acc.vertices[w] += delta[w];
        }
    }
}

/// Vertex betweenness centrality. `weight` is a uniform edge cost; it scales path
/// lengths but never changes which paths are shortest.
pub fn betweenness_centrality(graph: &DenseGraph, _weight: u32) -> Vec<(VertexId, f64)> {
    brandes(graph)
        .vertices
        .into_iter()
        .enumerate()
        .map(|(i, score)| (graph.id(i), score))
        .collect()
}

/// Betweenness of every undirected edge as `(smaller id, larger id, score)`.
pub fn edge_betweenness(graph: &DenseGraph) -> Vec<(VertexId, VertexId, f64)> {
    let mut out: Vec<(VertexId, VertexId, f64)> = brandes(graph)
        .edges
        .into_iter()
        .map(|((a, b), score)| (graph.id(a), graph.id(b), score))
        .collect();
    out.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazerunner_common::types::Edge;

    fn path_graph() -> DenseGraph {
        // 1 - 2 - 3
        DenseGraph::undirected(&[Edge::new(1u64, 2u64, ()), Edge::new(2, 3, ())])
    }

    #[test]
    fn middle_of_a_path_carries_all_betweenness() {
        let scores = betweenness_centrality(&path_graph(), 1);
        assert_eq!(scores, vec![(1, 0.0), (2, 1.0), (3, 0.0)]);
    }

    #[test]
    fn edge_betweenness_counts_paths_through_each_edge() {
        let scores = edge_betweenness(&path_graph());
        assert_eq!(scores, vec![(1, 2, 2.0), (2, 3, 2.0)]);
    }

    #[test]
    fn closeness_scales_with_edge_weight() {
        let unit = closeness_centrality(&path_graph(), 1);
        assert_eq!(unit, vec![(1, 2.0 / 3.0), (2, 1.0), (3, 2.0 / 3.0)]);

        let doubled = closeness_centrality(&path_graph(), 2);
        assert_eq!(doubled[1], (2, 0.5));
    }

    #[test]
    fn isolated_pair_components_do_not_reach_each_other() {
        let graph = DenseGraph::undirected(&[Edge::new(1u64, 2u64, ()), Edge::new(3, 4, ())]);
        let scores = closeness_centrality(&graph, 1);
        assert!(scores.iter().all(|(_, s)| (*s - 1.0).abs() < 1e-12));
    }
}
