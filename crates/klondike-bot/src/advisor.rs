use crate::search::{
    BreadthFirst, ColumnOrder, DEFAULT_BREADTH_DEPTH, DEFAULT_DEPTH_DEPTH, DEFAULT_NODE_CAP,
    DepthFirst, Recommendation, ScoreWeights, SearchConfig, SearchEngine, SearchLimits,
};
use klondike_core::model::state::GameState;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Breadth,
    Depth,
}

impl EngineKind {
    pub const ALL: [EngineKind; 2] = [EngineKind::Breadth, EngineKind::Depth];

    pub const fn as_str(self) -> &'static str {
        match self {
            EngineKind::Breadth => "breadth",
            EngineKind::Depth => "depth",
        }
    }

    fn engine(self) -> &'static dyn SearchEngine {
        match self {
            EngineKind::Breadth => &BreadthFirst,
            EngineKind::Depth => &DepthFirst,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "breadth" | "bfs" | "graph" => Ok(EngineKind::Breadth),
            "depth" | "dfs" | "tree" => Ok(EngineKind::Depth),
            other => Err(format!("unknown engine '{other}'")),
        }
    }
}

/// Per-engine search configuration used by [`Advisor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisorSettings {
    pub breadth: SearchConfig,
    pub depth: SearchConfig,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            breadth: SearchConfig::breadth_default(),
            depth: SearchConfig::depth_default(),
        }
    }
}

impl AdvisorSettings {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let breadth_depth = read("KLONDIKE_BREADTH_DEPTH")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_BREADTH_DEPTH);

        let depth_depth = read("KLONDIKE_DEPTH_DEPTH")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_DEPTH_DEPTH);

        let max_nodes = match read("KLONDIKE_NODE_CAP")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
        {
            Some(0) => None,
            Some(cap) => Some(cap),
            None => Some(DEFAULT_NODE_CAP),
        };

        let time_cap = read("KLONDIKE_TIME_CAP_MS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);

        let column_order = read("KLONDIKE_COLUMN_KEY")
            .and_then(|raw| raw.parse::<ColumnOrder>().ok())
            .unwrap_or_default();

        let weights = read("KLONDIKE_WEIGHTS")
            .and_then(|raw| raw.parse::<ScoreWeights>().ok())
            .unwrap_or_default();

        let config = |max_depth| SearchConfig {
            limits: SearchLimits {
                max_depth,
                max_nodes,
                time_cap,
            },
            column_order,
            weights,
        };

        Self {
            breadth: config(breadth_depth),
            depth: config(depth_depth),
        }
    }

    pub fn config(&self, kind: EngineKind) -> &SearchConfig {
        match kind {
            EngineKind::Breadth => &self.breadth,
            EngineKind::Depth => &self.depth,
        }
    }

    pub fn config_mut(&mut self, kind: EngineKind) -> &mut SearchConfig {
        match kind {
            EngineKind::Breadth => &mut self.breadth,
            EngineKind::Depth => &mut self.depth,
        }
    }
}

/// Hint provider. Holds settings only; every request searches from scratch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Advisor {
    settings: AdvisorSettings,
}

impl Advisor {
    pub const fn new(settings: AdvisorSettings) -> Self {
        Self { settings }
    }

    pub fn from_env() -> Self {
        Self::new(AdvisorSettings::from_env())
    }

    pub const fn settings(&self) -> &AdvisorSettings {
        &self.settings
    }

    pub fn recommend(&self, kind: EngineKind, state: &GameState) -> Recommendation {
        let recommendation = kind.engine().search(state, self.settings.config(kind));
        log_hint(kind, &recommendation);
        recommendation
    }
}

/// Breadth-first hint with default settings and the given ply bound.
pub fn recommend_breadth(state: &GameState, max_depth: usize) -> Recommendation {
    let mut settings = AdvisorSettings::default();
    settings.breadth.limits.max_depth = max_depth;
    Advisor::new(settings).recommend(EngineKind::Breadth, state)
}

/// Depth-first hint; `None` when nothing was found within the bound.
pub fn recommend_depth(state: &GameState, max_depth: usize) -> Option<Recommendation> {
    let mut settings = AdvisorSettings::default();
    settings.depth.limits.max_depth = max_depth;
    Some(Advisor::new(settings).recommend(EngineKind::Depth, state)).filter(Recommendation::found)
}

fn log_hint(kind: EngineKind, recommendation: &Recommendation) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    event!(
        target: "klondike_bot::advisor",
        Level::INFO,
        engine = kind.as_str(),
        hint = %recommendation.description(),
        move_kind = recommendation.mv.map(|mv| mv.kind()),
        score = ?recommendation.score,
        expanded = recommendation.stats.expanded,
        truncated = recommendation.stats.truncated,
        elapsed_ms = recommendation.elapsed_ms(),
    );
}
