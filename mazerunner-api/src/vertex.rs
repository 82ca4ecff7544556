use mazerunner_common::types::Edge;

/// What a vertex program sees of the superstep it runs in.
pub trait SuperstepContext<K, VV, M> {
    fn vertex_value(&self) -> Option<&VV>;
    fn set_vertex_value(&mut self, value: VV);
    fn send_message(&mut self, target_id: K, message: M);
    fn superstep(&self) -> u64;
}

/// Per-vertex logic of a bulk-synchronous algorithm. Supersteps are numbered from 1;
/// the run ends when no messages are sent or the superstep limit is reached.
pub trait VertexProgram<K, VV, EV, M>: Send {
    fn compute(
        &mut self,
        vertex_id: &K,
        messages: &mut dyn Iterator<Item = M>,
        out_edges: &[Edge<K, EV>],
        context: &mut dyn SuperstepContext<K, VV, M>,
    );
}

pub trait VertexAlgorithm<K, VV, EV, M>: Send + Sync {
    fn name(&self) -> &str;
    fn max_supersteps(&self) -> u64;

    /// One program instance is created per partition.
    fn create_program(&self) -> Box<dyn VertexProgram<K, VV, EV, M>>;
}
