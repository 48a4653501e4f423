use crate::model::card::Card;
use std::fmt;

/// One advisor-level move. Card payloads are the acting pile's top card at
/// generation time and only serve display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    DrawStock,
    ResetStock,
    WasteToFoundation { card: Card },
    WasteToTableau { column: usize, card: Card },
    TableauToFoundation { column: usize, card: Card },
    TableauToTableau { from: usize, to: usize, card: Card },
}

/// Where a move sends its card; drives search ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveCategory {
    Stock,
    Tableau,
    Foundation,
}

impl MoveCategory {
    pub const fn priority(self) -> u8 {
        match self {
            MoveCategory::Foundation => 2,
            MoveCategory::Tableau => 1,
            MoveCategory::Stock => 0,
        }
    }
}

impl Move {
    pub const fn category(&self) -> MoveCategory {
        match self {
            Move::WasteToFoundation { .. } | Move::TableauToFoundation { .. } => {
                MoveCategory::Foundation
            }
            Move::WasteToTableau { .. } | Move::TableauToTableau { .. } => MoveCategory::Tableau,
            Move::DrawStock | Move::ResetStock => MoveCategory::Stock,
        }
    }

    pub const fn card(&self) -> Option<Card> {
        match self {
            Move::WasteToFoundation { card }
            | Move::WasteToTableau { card, .. }
            | Move::TableauToFoundation { card, .. }
            | Move::TableauToTableau { card, .. } => Some(*card),
            Move::DrawStock | Move::ResetStock => None,
        }
    }

    /// Short machine-friendly label, used in logs and harness output.
    pub const fn kind(&self) -> &'static str {
        match self {
            Move::DrawStock => "draw_stock",
            Move::ResetStock => "reset_stock",
            Move::WasteToFoundation { .. } => "waste_to_foundation",
            Move::WasteToTableau { .. } => "waste_to_tableau",
            Move::TableauToFoundation { .. } => "tableau_to_foundation",
            Move::TableauToTableau { .. } => "tableau_to_tableau",
        }
    }
}

// Columns are shown 1-based to players.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::DrawStock => f.write_str("Move: draw a card from the stock"),
            Move::ResetStock => f.write_str("Move: reset the stock"),
            Move::WasteToFoundation { card } => {
                write!(f, "Move: {card} from waste to the foundation")
            }
            Move::WasteToTableau { column, card } => {
                write!(f, "Move: {card} from waste to column {}", column + 1)
            }
            Move::TableauToFoundation { column, card } => {
                write!(f, "Move: {card} from column {} to the foundation", column + 1)
            }
            Move::TableauToTableau { from, to, card } => write!(
                f,
                "Move: {card} from column {} to column {}",
                from + 1,
                to + 1
            ),
        }
    }
}
