pub mod advisor;
pub mod search;

pub use advisor::{Advisor, AdvisorSettings, EngineKind, recommend_breadth, recommend_depth};
pub use search::{
    BreadthFirst, ColumnOrder, DepthFirst, Recommendation, ScoreWeights, SearchConfig,
    SearchEngine, SearchLimits, SearchStats,
};
