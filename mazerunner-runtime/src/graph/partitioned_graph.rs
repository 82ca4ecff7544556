use mazerunner_api::graph::VertexGraph;
use mazerunner_api::vertex::{SuperstepContext, VertexAlgorithm, VertexProgram};
use mazerunner_common::types::{Edge, Vertex};
use rayon::prelude::*;
use std::collections::HashMap;
use std::hash::Hash;

/// In-memory graph split by hash of the vertex id. Edges live with their source.
pub struct PartitionedGraph<K, VV, EV> {
    partitions: Vec<GraphPartition<K, VV, EV>>,
    all_edges: Vec<Edge<K, EV>>,
}

struct GraphPartition<K, VV, EV> {
    vertices: HashMap<K, VV>,
    adjacency: HashMap<K, Vec<Edge<K, EV>>>,
}

impl<K, VV, EV> GraphPartition<K, VV, EV> {
    fn empty() -> Self {
        Self {
            vertices: HashMap::new(),
            adjacency: HashMap::new(),
        }
    }
}

impl<K, VV, EV> PartitionedGraph<K, VV, EV>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    VV: Clone + Send + Sync + 'static,
    EV: Clone + Send + Sync + 'static,
{
    pub fn new(vertices: Vec<Vertex<K, VV>>, edges: Vec<Edge<K, EV>>, partitions: usize) -> Self {
        let partitions = partitions.max(1);
        let mut parts: Vec<GraphPartition<K, VV, EV>> =
            (0..partitions).map(|_| GraphPartition::empty()).collect();

        for v in vertices {
            let p = partition_of(&v.id, partitions);
            parts[p].vertices.insert(v.id, v.value);
        }

        for e in &edges {
            let p = partition_of(&e.src_id, partitions);
            parts[p]
                .adjacency
                .entry(e.src_id.clone())
                .or_default()
                .push(e.clone());
        }

        Self {
            partitions: parts,
            all_edges: edges,
        }
    }

    pub fn partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.partitions.iter().map(|p| p.vertices.len()).sum()
    }
}

fn partition_of<K: Hash>(k: &K, partitions: usize) -> usize {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hasher;
    let mut h = DefaultHasher::new();
    k.hash(&mut h);
    (h.finish() as usize) % partitions.max(1)
}

struct PartitionContext<'a, K, VV, M> {
    vertex_value: Option<VV>,
    changed: bool,
    outbox: &'a mut Vec<(K, M)>,
    superstep: u64,
}

impl<'a, K, VV, M> SuperstepContext<K, VV, M> for PartitionContext<'a, K, VV, M> {
    fn vertex_value(&self) -> Option<&VV> {
        self.vertex_value.as_ref()
    }

    fn set_vertex_value(&mut self, value: VV) {
        self.vertex_value = Some(value);
        self.changed = true;
    }

    fn send_message(&mut self, target_id: K, message: M) {
        self.outbox.push((target_id, message));
    }

    fn superstep(&self) -> u64 {
        self.superstep
    }
}

struct PartitionWorker<K, VV, EV, M> {
    partition: GraphPartition<K, VV, EV>,
    inbox: HashMap<K, Vec<M>>,
    outbox: Vec<(K, M)>,
    program: Box<dyn VertexProgram<K, VV, EV, M>>,
}

impl<K, VV, EV, M> PartitionWorker<K, VV, EV, M>
where
    K: Clone + Eq + Hash,
    VV: Clone,
{
    fn superstep(&mut self, superstep: u64) {
        self.outbox.clear();
        let keys: Vec<K> = self.partition.vertices.keys().cloned().collect();
        for vertex_id in keys {
            let msgs = self.inbox.remove(&vertex_id).unwrap_or_default();
            let mut msg_iter = msgs.into_iter();
            let out_edges = self
                .partition
                .adjacency
                .get(&vertex_id)
                .map(|v| v.as_slice())
                .unwrap_or(&[]);
            let mut ctx = PartitionContext {
                vertex_value: self.partition.vertices.get(&vertex_id).cloned(),
                changed: false,
                outbox: &mut self.outbox,
                superstep,
            };
            self.program
                .compute(&vertex_id, &mut msg_iter, out_edges, &mut ctx);
            if ctx.changed {
                if let Some(new_v) = ctx.vertex_value {
                    self.partition.vertices.insert(vertex_id, new_v);
                }
            }
        }
    }
}

impl<K, VV, EV> VertexGraph<K, VV, EV> for PartitionedGraph<K, VV, EV>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    VV: Clone + Send + Sync + 'static,
    EV: Clone + Send + Sync + 'static,
{
    fn run<M, A>(self, algorithm: &A, parallelism: usize) -> Self
    where
        A: VertexAlgorithm<K, VV, EV, M>,
        M: Clone + Send + Sync + 'static,
    {
        let partitions = parallelism.max(self.partitions());
        let mut graph = if partitions == self.partitions() {
            self
        } else {
            let vertices = self.vertices();
            let edges = self.edges();
            PartitionedGraph::new(vertices, edges, partitions)
        };

        let mut workers: Vec<PartitionWorker<K, VV, EV, M>> = graph
            .partitions
            .drain(..)
            .map(|partition| PartitionWorker {
                partition,
                inbox: HashMap::new(),
                outbox: Vec::new(),
                program: algorithm.create_program(),
            })
            .collect();

        let max_supersteps = algorithm.max_supersteps();
        let mut superstep: u64 = 1;

        while superstep <= max_supersteps {
            workers
                .par_iter_mut()
                .for_each(|w| w.superstep(superstep));

            let mut any_msg = false;
            let mut next_inboxes: Vec<HashMap<K, Vec<M>>> =
                (0..partitions).map(|_| HashMap::new()).collect();

            for w in &mut workers {
                for (target, msg) in w.outbox.drain(..) {
                    let p = partition_of(&target, partitions);
                    next_inboxes[p].entry(target).or_default().push(msg);
                    any_msg = true;
                }
            }

            for (i, w) in workers.iter_mut().enumerate() {
                w.inbox = std::mem::take(&mut next_inboxes[i]);
            }

            superstep += 1;
            if !any_msg {
                break;
            }
        }

        graph.partitions = workers.into_iter().map(|w| w.partition).collect();
        graph
    }

    fn vertices(&self) -> Vec<Vertex<K, VV>> {
        self.partitions
            .iter()
            .flat_map(|p| {
                p.vertices.iter().map(|(k, v)| Vertex {
                    id: k.clone(),
                    value: v.clone(),
                })
            })
            .collect()
    }

    fn edges(&self) -> Vec<Edge<K, EV>> {
        self.all_edges.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    struct EchoProgram;

    impl VertexProgram<u64, u64, (), u64> for EchoProgram {
        fn compute(
            &mut self,
            _vertex_id: &u64,
            messages: &mut dyn Iterator<Item = u64>,
            out_edges: &[Edge<u64, ()>],
            context: &mut dyn SuperstepContext<u64, u64, u64>,
        ) {
            let received: u64 = messages.count() as u64;
            let seen = context.vertex_value().copied().unwrap_or(0);
            context.set_vertex_value(seen + received);
            if context.superstep() == 1 {
                for e in out_edges {
                    context.send_message(e.target_id, 1);
                }
            }
        }
    }

    impl VertexAlgorithm<u64, u64, (), u64> for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn max_supersteps(&self) -> u64 {
            10
        }

        fn create_program(&self) -> Box<dyn VertexProgram<u64, u64, (), u64>> {
            Box::new(EchoProgram)
        }
    }

    #[test]
    fn messages_cross_partitions_and_run_ends_when_quiet() {
        let vertices = (1u64..=4).map(|id| Vertex::new(id, 0)).collect();
        let edges = vec![
            Edge::new(1u64, 4u64, ()),
            Edge::new(2, 4, ()),
            Edge::new(3, 4, ()),
        ];
        let graph = PartitionedGraph::new(vertices, edges, 2);
        assert_eq!(graph.partitions(), 2);

        let result = graph.run(&Echo, 3);
        assert_eq!(result.partitions(), 3);
        assert_eq!(result.vertex_count(), 4);
        assert_eq!(result.edges().len(), 3);

        let mut vertices = result.vertices();
        vertices.sort_by_key(|v| v.id);
        let inbox: Vec<u64> = vertices.iter().map(|v| v.value).collect();
        assert_eq!(inbox, vec![0, 0, 0, 3]);
    }
}
