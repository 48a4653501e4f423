use crate::model::card::Card;
use crate::model::foundation::FoundationPile;
use crate::model::state::{GameState, StateError};
use crate::model::stock::{StockPile, WastePile};
use crate::model::suit::Suit;
use crate::model::tableau::TableauPile;
use serde::{Deserialize, Serialize};
use std::array;
use std::fmt;

/// One tableau column split at its face-down boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnSnapshot {
    #[serde(default)]
    pub hidden: Vec<Card>,
    #[serde(default)]
    pub shown: Vec<Card>,
}

/// Portable board position. Piles list cards bottom first; foundations
/// follow H, D, C, S order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub stock: Vec<Card>,
    #[serde(default)]
    pub waste: Vec<Card>,
    #[serde(default)]
    pub foundations: [Vec<Card>; 4],
    pub tableau: Vec<ColumnSnapshot>,
}

#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    Invalid(StateError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Json(err) => write!(f, "snapshot is not valid JSON: {err}"),
            SnapshotError::Invalid(err) => write!(f, "snapshot describes an invalid board: {err}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Json(err) => Some(err),
            SnapshotError::Invalid(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Json(err)
    }
}

impl From<StateError> for SnapshotError {
    fn from(err: StateError) -> Self {
        SnapshotError::Invalid(err)
    }
}

impl BoardSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let tableau = state
            .tableau()
            .iter()
            .map(|pile| {
                let split = pile.len() - pile.exposed().len();
                let (hidden, shown) = pile.cards().split_at(split);
                ColumnSnapshot {
                    hidden: hidden.to_vec(),
                    shown: shown.to_vec(),
                }
            })
            .collect();
        BoardSnapshot {
            stock: state.stock().cards().to_vec(),
            waste: state.waste().cards().to_vec(),
            foundations: array::from_fn(|index| state.foundations()[index].cards().to_vec()),
            tableau,
        }
    }

    /// Rebuilds the board without any legality checks.
    pub fn into_state_unchecked(self) -> GameState {
        let foundations = array::from_fn(|index| {
            let suit = Suit::from_index(index).unwrap_or(Suit::Hearts);
            let mut pile = FoundationPile::new(suit);
            let cards = self.foundations[index].iter().map(|card| Card {
                revealed: true,
                ..*card
            });
            for card in cards.clone() {
                if !pile.add(card) {
                    // Keep the bad card so validation reports it.
                    return FoundationPile::with_cards_unchecked(suit, cards.collect());
                }
            }
            pile
        });
        let tableau = self
            .tableau
            .into_iter()
            .map(|column| {
                let hidden = column.hidden.into_iter().map(|mut card| {
                    card.revealed = false;
                    card
                });
                let shown = column.shown.into_iter().map(|mut card| {
                    card.revealed = true;
                    card
                });
                TableauPile::from_cards(hidden.chain(shown))
            })
            .collect();
        GameState::from_parts(
            StockPile::from_cards(self.stock),
            WastePile::from_cards(self.waste),
            foundations,
            tableau,
        )
    }

    /// Rebuilds and validates the board.
    pub fn restore(self) -> Result<GameState, StateError> {
        let state = self.into_state_unchecked();
        state.validate()?;
        Ok(state)
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load_state(json: &str) -> Result<GameState, SnapshotError> {
        Ok(Self::from_json(json)?.restore()?)
    }
}
