use mazerunner_api::vertex::{SuperstepContext, VertexAlgorithm, VertexProgram};
use mazerunner_common::types::{Edge, VertexId};

/// Static PageRank: every vertex starts at 1.0 and each update computes
/// `(1 - alpha) + alpha * sum(incoming contributions)`.
#[derive(Debug, Clone)]
pub struct PageRankAlgorithm {
    pub iterations: u64,
    pub alpha: f64,
}

impl PageRankAlgorithm {
    pub fn new(iterations: u64, alpha: f64) -> Self {
        Self { iterations, alpha }
    }
}

struct PageRankProgram {
    alpha: f64,
}

impl<EV> VertexProgram<VertexId, f64, EV, f64> for PageRankProgram {
    fn compute(
        &mut self,
        _vertex_id: &VertexId,
        messages: &mut dyn Iterator<Item = f64>,
        out_edges: &[Edge<VertexId, EV>],
        context: &mut dyn SuperstepContext<VertexId, f64, f64>,
    ) {
        let out_degree = out_edges.len() as f64;

        let rank = if context.superstep() == 1 {
            context.vertex_value().copied().unwrap_or(1.0)
        } else {
            let sum: f64 = messages.sum();
            let rank = sum * self.alpha + (1.0 - self.alpha);
            context.set_vertex_value(rank);
            rank
        };

        if out_degree > 0.0 {
            let share = rank / out_degree;
            for e in out_edges {
                context.send_message(e.target_id, share);
            }
        }
    }
}

impl<EV: 'static> VertexAlgorithm<VertexId, f64, EV, f64> for PageRankAlgorithm {
    fn name(&self) -> &str {
        "pagerank"
    }

    // the first superstep only scatters the initial ranks
    fn max_supersteps(&self) -> u64 {
        self.iterations + 1
    }

    fn create_program(&self) -> Box<dyn VertexProgram<VertexId, f64, EV, f64>> {
        Box::new(PageRankProgram { alpha: self.alpha })
    }
}
