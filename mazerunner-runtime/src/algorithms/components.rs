use mazerunner_api::vertex::{SuperstepContext, VertexAlgorithm, VertexProgram};
use mazerunner_common::types::{Edge, VertexId};

/// Connected components by min-label propagation. Run it over a graph that holds
/// both directions of each edge to get weakly connected components.
#[derive(Debug, Clone)]
pub struct ConnectedComponentsAlgorithm {
    pub max_supersteps: u64,
}

impl ConnectedComponentsAlgorithm {
    pub fn new(max_supersteps: u64) -> Self {
        Self { max_supersteps }
    }
}

impl Default for ConnectedComponentsAlgorithm {
    fn default() -> Self {
        Self::new(u64::MAX)
    }
}

struct MinLabelProgram;

impl<EV> VertexProgram<VertexId, VertexId, EV, VertexId> for MinLabelProgram {
    fn compute(
        &mut self,
        vertex_id: &VertexId,
        messages: &mut dyn Iterator<Item = VertexId>,
        out_edges: &[Edge<VertexId, EV>],
        context: &mut dyn SuperstepContext<VertexId, VertexId, VertexId>,
    ) {
        if context.superstep() == 1 {
            context.set_vertex_value(*vertex_id);
            for e in out_edges {
                context.send_message(e.target_id, *vertex_id);
            }
            return;
        }

        let current = context.vertex_value().copied().unwrap_or(*vertex_id);
        let min_label = messages.fold(current, VertexId::min);
        if min_label < current {
            context.set_vertex_value(min_label);
            for e in out_edges {
                context.send_message(e.target_id, min_label);
            }
        }
    }
}

impl<EV: 'static> VertexAlgorithm<VertexId, VertexId, EV, VertexId>
    for ConnectedComponentsAlgorithm
{
    fn name(&self) -> &str {
        "connected_components"
    }

    fn max_supersteps(&self) -> u64 {
        self.max_supersteps
    }

    fn create_program(&self) -> Box<dyn VertexProgram<VertexId, VertexId, EV, VertexId>> {
        Box::new(MinLabelProgram)
    }
}
