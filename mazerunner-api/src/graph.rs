use crate::vertex::VertexAlgorithm;
pub use mazerunner_common::types::{Edge, Vertex};

/// A graph that can run vertex algorithms over its partitions.
pub trait VertexGraph<K, VV, EV>: Sized {
    fn run<M, A>(self, algorithm: &A, parallelism: usize) -> Self
    where
        A: VertexAlgorithm<K, VV, EV, M>,
        M: Clone + Send + Sync + 'static;

    fn vertices(&self) -> Vec<Vertex<K, VV>>;

    fn edges(&self) -> Vec<Edge<K, EV>>;
}
