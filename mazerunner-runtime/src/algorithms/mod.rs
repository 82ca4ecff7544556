pub mod centrality;
pub mod components;
pub mod pagerank;
pub mod scc;
pub mod triangle_count;

use mazerunner_common::types::{Edge, VertexId};
use std::collections::{BTreeSet, HashMap};

/// Compact adjacency over densely renumbered vertices. Index order follows
/// ascending vertex id.
#[derive(Debug, Clone)]
pub struct DenseGraph {
    ids: Vec<VertexId>,
    adjacency: Vec<Vec<usize>>,
}

impl DenseGraph {
    pub fn directed<EV>(edges: &[Edge<VertexId, EV>]) -> Self {
        Self::build(edges, false)
    }

    /// Both directions of every edge, self loops and parallel edges dropped.
    pub fn undirected<EV>(edges: &[Edge<VertexId, EV>]) -> Self {
        Self::build(edges, true)
    }

    fn build<EV>(edges: &[Edge<VertexId, EV>], undirected: bool) -> Self {
        let ids: Vec<VertexId> = edges
            .iter()
            .flat_map(|e| [e.src_id, e.target_id])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: HashMap<VertexId, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
        for e in edges {
            let (s, t) = (index[&e.src_id], index[&e.target_id]);
            if undirected {
                if s != t {
                    adjacency[s].push(t);
                    adjacency[t].push(s);
                }
            } else {
                adjacency[s].push(t);
            }
        }
        for n in &mut adjacency {
            n.sort_unstable();
            n.dedup();
        }
        Self { ids, adjacency }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn id(&self, index: usize) -> VertexId {
        self.ids[index]
    }

    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }
}
