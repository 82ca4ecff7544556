use crate::context::ComputeContext;
use mazerunner_common::error::MazerunnerResult;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Lazily produced `"<id> <value>"` lines of a property update list.
pub type ResultLines = Box<dyn Iterator<Item = String> + Send>;

/// Fixed hint passed to closeness and betweenness centrality.
pub const CENTRALITY_HINT: u32 = 1;

pub fn empty_results() -> ResultLines {
    Box::new(std::iter::empty())
}

/// The closed set of analyses the processor can route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AnalysisKind {
    #[serde(rename = "triangle_count")]
    TriangleCount,
    #[serde(rename = "connected_components")]
    ConnectedComponents,
    #[serde(rename = "pagerank")]
    PageRank,
    #[serde(rename = "strongly_connected_components")]
    StronglyConnectedComponents,
    #[serde(rename = "CC")]
    ClosenessCentrality,
    #[serde(rename = "BC")]
    BetweennessCentrality,
    #[serde(rename = "edge_betweenness")]
    EdgeBetweenness,
    #[serde(rename = "collaborative_filtering")]
    CollaborativeFiltering,
    #[serde(rename = "LC")]
    LouvainCommunity,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 9] = [
        AnalysisKind::TriangleCount,
        AnalysisKind::ConnectedComponents,
        AnalysisKind::PageRank,
        AnalysisKind::StronglyConnectedComponents,
        AnalysisKind::ClosenessCentrality,
        AnalysisKind::BetweennessCentrality,
        AnalysisKind::EdgeBetweenness,
        AnalysisKind::CollaborativeFiltering,
        AnalysisKind::LouvainCommunity,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AnalysisKind::TriangleCount => "triangle_count",
            AnalysisKind::ConnectedComponents => "connected_components",
            AnalysisKind::PageRank => "pagerank",
            AnalysisKind::StronglyConnectedComponents => "strongly_connected_components",
            AnalysisKind::ClosenessCentrality => "CC",
            AnalysisKind::BetweennessCentrality => "BC",
            AnalysisKind::EdgeBetweenness => "edge_betweenness",
            AnalysisKind::CollaborativeFiltering => "collaborative_filtering",
            AnalysisKind::LouvainCommunity => "LC",
        }
    }

    /// Invokes the algorithm bound to this kind.
    pub fn run(
        self,
        algorithms: &dyn GraphAlgorithms,
        ctx: &dyn ComputeContext,
        path: &str,
    ) -> MazerunnerResult<ResultLines> {
        match self {
            AnalysisKind::TriangleCount => algorithms.triangle_count(ctx, path),
            AnalysisKind::ConnectedComponents => algorithms.connected_components(ctx, path),
            AnalysisKind::PageRank => algorithms.pagerank(ctx, path),
            AnalysisKind::StronglyConnectedComponents => {
                algorithms.strongly_connected_components(ctx, path)
            }
            AnalysisKind::ClosenessCentrality => {
                algorithms.closeness_centrality(ctx, CENTRALITY_HINT, path)
            }
            AnalysisKind::BetweennessCentrality => {
                algorithms.betweenness_centrality(ctx, CENTRALITY_HINT, path)
            }
            AnalysisKind::EdgeBetweenness => algorithms.edge_betweenness(ctx, path),
            AnalysisKind::CollaborativeFiltering => algorithms.collaborative_filtering(ctx, path),
            AnalysisKind::LouvainCommunity => algorithms.louvain_community(ctx, path),
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAnalysis(pub String);

impl fmt::Display for UnknownAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown analysis key: {}", self.0)
    }
}

impl std::error::Error for UnknownAnalysis {}

impl FromStr for AnalysisKind {
    type Err = UnknownAnalysis;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        AnalysisKind::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| UnknownAnalysis(key.to_string()))
    }
}

/// The distributed graph algorithms a compute engine provides.
pub trait GraphAlgorithms: Send + Sync {
    fn triangle_count(
        &self,
        ctx: &dyn ComputeContext,
        path: &str,
    ) -> MazerunnerResult<ResultLines>;

    fn connected_components(
        &self,
        ctx: &dyn ComputeContext,
        path: &str,
    ) -> MazerunnerResult<ResultLines>;

    fn pagerank(&self, ctx: &dyn ComputeContext, path: &str) -> MazerunnerResult<ResultLines>;

    fn strongly_connected_components(
        &self,
        ctx: &dyn ComputeContext,
        path: &str,
    ) -> MazerunnerResult<ResultLines>;

    fn closeness_centrality(
        &self,
        ctx: &dyn ComputeContext,
        hint: u32,
        path: &str,
    ) -> MazerunnerResult<ResultLines>;

    fn betweenness_centrality(
        &self,
        ctx: &dyn ComputeContext,
        hint: u32,
        path: &str,
    ) -> MazerunnerResult<ResultLines>;

    fn edge_betweenness(
        &self,
        ctx: &dyn ComputeContext,
        path: &str,
    ) -> MazerunnerResult<ResultLines>;

    fn collaborative_filtering(
        &self,
        ctx: &dyn ComputeContext,
        path: &str,
    ) -> MazerunnerResult<ResultLines>;

    fn louvain_community(
        &self,
        ctx: &dyn ComputeContext,
        path: &str,
    ) -> MazerunnerResult<ResultLines>;
}
