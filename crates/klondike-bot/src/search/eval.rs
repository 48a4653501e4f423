use klondike_core::model::state::GameState;
use std::str::FromStr;

/// Linear desirability weights. Neither preset detects won or lost
/// positions; the score only rewards progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeights {
    /// Per card resting on any foundation.
    pub foundation: i32,
    /// Per face-up tableau card.
    pub revealed: i32,
    /// Per empty tableau column.
    pub empty_column: i32,
}

impl ScoreWeights {
    pub const GRAPH: ScoreWeights = ScoreWeights {
        foundation: 10,
        revealed: 3,
        empty_column: 5,
    };

    pub const TREE: ScoreWeights = ScoreWeights {
        foundation: 10,
        revealed: 2,
        empty_column: 3,
    };

    pub fn preset_name(&self) -> Option<&'static str> {
        if *self == Self::GRAPH {
            Some("graph")
        } else if *self == Self::TREE {
            Some("tree")
        } else {
            None
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::GRAPH
    }
}

impl FromStr for ScoreWeights {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "graph" | "breadth" => Ok(ScoreWeights::GRAPH),
            "tree" | "depth" => Ok(ScoreWeights::TREE),
            other => Err(format!("unknown weight preset '{other}'")),
        }
    }
}

pub fn score(state: &GameState, weights: &ScoreWeights) -> i32 {
    let foundation = state.foundation_cards() as i32;
    let (revealed, empty) = state
        .tableau()
        .iter()
        .fold((0i32, 0i32), |(revealed, empty), pile| {
            (
                revealed + pile.revealed_count() as i32,
                empty + i32::from(pile.is_empty()),
            )
        });
    foundation * weights.foundation + revealed * weights.revealed + empty * weights.empty_column
}
