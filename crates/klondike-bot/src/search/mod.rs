//! Bounded state-space search over Klondike positions.
//!
//! Both engines share the same contract: explore from a root snapshot,
//! score every newly discovered state and report the first move of the
//! path that reached the best score. Neither engine mutates the root or
//! keeps anything between calls.

mod breadth;
mod depth;
mod eval;
mod key;

pub use breadth::BreadthFirst;
pub use depth::{DepthFirst, breaks_color_alternation};
pub use eval::{ScoreWeights, score};
pub use key::{ColumnOrder, StateKey, state_key};

use klondike_core::model::state::GameState;
use klondike_core::rules::Move;
use std::time::{Duration, Instant};

pub const DEFAULT_BREADTH_DEPTH: usize = 15;
pub const DEFAULT_DEPTH_DEPTH: usize = 7;
pub const DEFAULT_NODE_CAP: usize = 250_000;
pub const NO_MOVE_FOUND: &str = "No move found";

/// Caps for one search. The node cap counts expanded states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: usize,
    pub max_nodes: Option<usize>,
    pub time_cap: Option<Duration>,
}

impl SearchLimits {
    pub const fn with_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            max_nodes: Some(DEFAULT_NODE_CAP),
            time_cap: None,
        }
    }

    pub const fn breadth_default() -> Self {
        Self::with_depth(DEFAULT_BREADTH_DEPTH)
    }

    pub const fn depth_default() -> Self {
        Self::with_depth(DEFAULT_DEPTH_DEPTH)
    }
}

/// Full knob set handed to an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub limits: SearchLimits,
    pub column_order: ColumnOrder,
    pub weights: ScoreWeights,
}

impl SearchConfig {
    pub fn breadth_default() -> Self {
        Self {
            limits: SearchLimits::breadth_default(),
            column_order: ColumnOrder::default(),
            weights: ScoreWeights::default(),
        }
    }

    pub fn depth_default() -> Self {
        Self {
            limits: SearchLimits::depth_default(),
            column_order: ColumnOrder::default(),
            weights: ScoreWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States whose legal moves were generated.
    pub expanded: usize,
    /// Successor states built, duplicates included.
    pub generated: usize,
    /// Successors dropped because their key was already visited.
    pub duplicates: usize,
    pub pruned_oscillation: usize,
    pub visited: usize,
    pub max_frontier: usize,
    pub deepest_ply: usize,
    /// A node or time cap stopped the search early.
    pub truncated: bool,
}

/// Result of one advisor search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub mv: Option<Move>,
    pub score: Option<i32>,
    pub elapsed: Duration,
    pub stats: SearchStats,
}

impl Recommendation {
    pub fn description(&self) -> String {
        match &self.mv {
            Some(mv) => mv.to_string(),
            None => NO_MOVE_FOUND.to_string(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0
    }

    pub fn found(&self) -> bool {
        self.mv.is_some()
    }
}

/// One search strategy. Implementations are stateless; every call owns
/// its own visited set and frontier.
pub trait SearchEngine {
    fn name(&self) -> &'static str;

    fn search(&self, root: &GameState, config: &SearchConfig) -> Recommendation;
}

/// Best-so-far tracker. Only a strictly better score replaces the holder,
/// so the earliest discovery wins ties.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BestLine {
    mv: Option<Move>,
    score: i32,
}

impl BestLine {
    pub(crate) fn new() -> Self {
        Self {
            mv: None,
            score: i32::MIN,
        }
    }

    pub(crate) fn offer(&mut self, score: i32, first_move: Move) {
        if score > self.score {
            self.score = score;
            self.mv = Some(first_move);
        }
    }

    pub(crate) fn finish(self, started: Instant, stats: SearchStats) -> Recommendation {
        Recommendation {
            mv: self.mv,
            score: self.mv.map(|_| self.score),
            elapsed: started.elapsed(),
            stats,
        }
    }
}

/// Node/time budget. The clock is only read every 256 expansions.
#[derive(Debug)]
pub(crate) struct Budget {
    started: Instant,
    max_nodes: Option<usize>,
    time_cap: Option<Duration>,
    expanded: usize,
    out_of_time: bool,
}

impl Budget {
    pub(crate) fn new(started: Instant, limits: &SearchLimits) -> Self {
        Self {
            started,
            max_nodes: limits.max_nodes,
            time_cap: limits.time_cap,
            expanded: 0,
            out_of_time: false,
        }
    }

    pub(crate) fn tick(&mut self) {
        self.expanded += 1;
        if let Some(cap) = self.time_cap {
            if self.expanded & 0xff == 0 && self.started.elapsed() >= cap {
                self.out_of_time = true;
            }
        }
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.out_of_time || self.max_nodes.is_some_and(|cap| self.expanded >= cap)
    }
}
