use crate::algorithms::centrality::{
    betweenness_centrality, closeness_centrality, edge_betweenness,
};
use crate::algorithms::components::ConnectedComponentsAlgorithm;
use crate::algorithms::pagerank::PageRankAlgorithm;
use crate::algorithms::scc::strongly_connected_components;
use crate::algorithms::triangle_count::triangle_count;
use crate::algorithms::DenseGraph;
use crate::graph::partitioned_graph::PartitionedGraph;
use crate::io::file::{read_edge_list, resolve_location};
use crate::local::engine::LocalContext;
use mazerunner_api::algorithm::{GraphAlgorithms, ResultLines};
use mazerunner_api::context::ComputeContext;
use mazerunner_api::graph::VertexGraph;
use mazerunner_common::config::{keys, Configuration};
use mazerunner_common::error::{MazerunnerError, MazerunnerResult};
use mazerunner_common::types::{Edge, Vertex, VertexId};
use std::collections::BTreeSet;
use std::fmt::Display;
use tracing::info;

/// [`GraphAlgorithms`] backed by the in-process engine. Needs a [`LocalContext`].
#[derive(Debug, Clone)]
pub struct LocalGraphAlgorithms {
    pagerank_iterations: u64,
    pagerank_alpha: f64,
}

impl Default for LocalGraphAlgorithms {
    fn default() -> Self {
        Self::new(20, 0.85)
    }
}

impl LocalGraphAlgorithms {
    pub fn new(pagerank_iterations: u64, pagerank_alpha: f64) -> Self {
        Self {
            pagerank_iterations,
            pagerank_alpha,
        }
    }

    pub fn from_configuration(config: &Configuration) -> MazerunnerResult<Self> {
        let iterations = config.get_string(keys::PAGERANK_ITERATIONS, "20");
        let alpha = config.get_string(keys::PAGERANK_ALPHA, "0.85");
        let iterations = iterations.trim().parse::<u64>().map_err(|e| {
            MazerunnerError::Config(format!("{}={iterations}: {e}", keys::PAGERANK_ITERATIONS))
        })?;
        let alpha = alpha.trim().parse::<f64>().map_err(|e| {
            MazerunnerError::Config(format!("{}={alpha}: {e}", keys::PAGERANK_ALPHA))
        })?;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(MazerunnerError::Config(format!(
                "{} must lie in [0, 1], got {alpha}",
                keys::PAGERANK_ALPHA
            )));
        }
        Ok(Self::new(iterations, alpha))
    }
}

fn local_context(ctx: &dyn ComputeContext) -> MazerunnerResult<&LocalContext> {
    ctx.as_any().downcast_ref::<LocalContext>().ok_or_else(|| {
        MazerunnerError::Context("local algorithms need a local compute context".to_string())
    })
}

fn load_edges(ctx: &LocalContext, path: &str) -> MazerunnerResult<Vec<Edge<VertexId, ()>>> {
    let file = resolve_location(ctx.storage_root(), path)?;
    let edges = read_edge_list(&file)?;
    info!(path = %file.display(), edges = edges.len(), "edge list loaded");
    Ok(edges)
}

fn seed_vertices<VV: Clone>(
    edges: &[Edge<VertexId, ()>],
    value: VV,
) -> Vec<Vertex<VertexId, VV>> {
    edges
        .iter()
        .flat_map(|e| [e.src_id, e.target_id])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|id| Vertex::new(id, value.clone()))
        .collect()
}

fn vertex_lines<V: Display + Send + 'static>(rows: Vec<(VertexId, V)>) -> ResultLines {
    Box::new(rows.into_iter().map(|(id, v)| format!("{id} {v}")))
}

fn sorted_lines<V: Display + Send + 'static>(vertices: Vec<Vertex<VertexId, V>>) -> ResultLines {
    let mut rows: Vec<(VertexId, V)> = vertices.into_iter().map(|v| (v.id, v.value)).collect();
    rows.sort_unstable_by_key(|(id, _)| *id);
    vertex_lines(rows)
}

impl GraphAlgorithms for LocalGraphAlgorithms {
    fn triangle_count(
        &self,
        ctx: &dyn ComputeContext,
        path: &str,
    ) -> MazerunnerResult<ResultLines> {
        let edges = load_edges(local_context(ctx)?, path)?;
        Ok(vertex_lines(triangle_count(&DenseGraph::undirected(&edges))))
    }

    fn connected_components(
        &self,
        ctx: &dyn ComputeContext,
        path: &str,
    ) -> MazerunnerResult<ResultLines> {
        let ctx = local_context(ctx)?;
        let edges = load_edges(ctx, path)?;
        let vertices = seed_vertices(&edges, VertexId::default());
        let both_ways: Vec<_> = edges
            .iter()
            .flat_map(|e| [e.clone(), e.reversed()])
            .collect();
        let graph = PartitionedGraph::new(vertices, both_ways, ctx.parallelism())
            .run(&ConnectedComponentsAlgorithm::default(), ctx.parallelism());
        Ok(sorted_lines(graph.vertices()))
    }

    fn pagerank(&self, ctx: &dyn ComputeContext, path: &str) -> MazerunnerResult<ResultLines> {
        let ctx = local_context(ctx)?;
        let edges = load_edges(ctx, path)?;
        let vertices = seed_vertices(&edges, 1.0_f64);
        let algorithm = PageRankAlgorithm::new(self.pagerank_iterations, self.pagerank_alpha);
        let graph = PartitionedGraph::new(vertices, edges, ctx.parallelism())
            .run(&algorithm, ctx.parallelism());
        Ok(sorted_lines(graph.vertices()))
    }

    fn strongly_connected_components(
        &self,
        ctx: &dyn ComputeContext,
        path: &str,
    ) -> MazerunnerResult<ResultLines> {
        let edges = load_edges(local_context(ctx)?, path)?;
        Ok(vertex_lines(strongly_connected_components(
            &DenseGraph::directed(&edges),
        )))
    }

    fn closeness_centrality(
        &self,
        ctx: &dyn ComputeContext,
        hint: u32,
        path: &str,
    ) -> MazerunnerResult<ResultLines> {
        let edges = load_edges(local_context(ctx)?, path)?;
        Ok(vertex_lines(closeness_centrality(
            &DenseGraph::undirected(&edges),
            hint,
        )))
    }

    fn betweenness_centrality(
        &self,
        ctx: &dyn ComputeContext,
        hint: u32,
        path: &str,
    ) -> MazerunnerResult<ResultLines> {
        let edges = load_edges(local_context(ctx)?, path)?;
        Ok(vertex_lines(betweenness_centrality(
            &DenseGraph::undirected(&edges),
            hint,
        )))
    }

    fn edge_betweenness(
        &self,
        ctx: &dyn ComputeContext,
        path: &str,
    ) -> MazerunnerResult<ResultLines> {
        let edges = load_edges(local_context(ctx)?, path)?;
        let rows = edge_betweenness(&DenseGraph::undirected(&edges));
        Ok(Box::new(
            rows.into_iter()
                .map(|(src, dst, value)| format!("{src} {dst} {value}")),
        ))
    }

    fn collaborative_filtering(
        &self,
        _ctx: &dyn ComputeContext,
        _path: &str,
    ) -> MazerunnerResult<ResultLines> {
        Err(MazerunnerError::Unsupported(
            "collaborative_filtering has no local implementation".to_string(),
        ))
    }

    fn louvain_community(
        &self,
        _ctx: &dyn ComputeContext,
        _path: &str,
    ) -> MazerunnerResult<ResultLines> {
        Err(MazerunnerError::Unsupported(
            "louvain community detection has no local implementation".to_string(),
        ))
    }
}
