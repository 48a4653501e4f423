use klondike_core::model::card::Card;
use klondike_core::model::state::GameState;
use klondike_core::model::tableau::TableauPile;
use std::str::FromStr;

const COLUMN_BREAK: u8 = 0xFF;
const SECTION_BREAK: u8 = 0xFE;
const REVEALED_BIT: u8 = 0x40;

/// How tableau columns enter the dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnOrder {
    /// Column identity matters: column 2 holding a pile is a different
    /// state from column 5 holding the same pile.
    Positional,
    /// Columns are ordered by their top card first, so boards that only
    /// differ by which physical column holds which pile share a key.
    #[default]
    Sorted,
}

impl ColumnOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            ColumnOrder::Positional => "positional",
            ColumnOrder::Sorted => "sorted",
        }
    }
}

impl FromStr for ColumnOrder {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positional" | "position" => Ok(ColumnOrder::Positional),
            "sorted" | "content" => Ok(ColumnOrder::Sorted),
            other => Err(format!("unknown column key policy '{other}'")),
        }
    }
}

/// Canonical dedup key for a position. Only meaningful for comparing
/// states inside one search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey(Box<[u8]>);

pub fn state_key(state: &GameState, order: ColumnOrder) -> StateKey {
    let mut bytes = Vec::with_capacity(64 + state.column_count());

    let mut columns: Vec<&TableauPile> = state.tableau().iter().collect();
    if order == ColumnOrder::Sorted {
        // Stable: only empty columns can tie, and those are identical.
        columns.sort_by_key(|pile| top_sort_key(pile));
    }
    for pile in columns {
        bytes.extend(pile.cards().iter().map(|card| tableau_byte(*card)));
        bytes.push(COLUMN_BREAK);
    }
    bytes.push(SECTION_BREAK);

    for foundation in state.foundations() {
        bytes.extend(foundation.cards().iter().map(|card| card.ordinal()));
        bytes.push(COLUMN_BREAK);
    }
    bytes.push(SECTION_BREAK);

    bytes.extend(state.stock().cards().iter().map(|card| card.ordinal()));
    bytes.push(SECTION_BREAK);
    bytes.extend(state.waste().cards().iter().map(|card| card.ordinal()));

    StateKey(bytes.into_boxed_slice())
}

fn tableau_byte(card: Card) -> u8 {
    if card.revealed {
        card.ordinal() | REVEALED_BIT
    } else {
        card.ordinal()
    }
}

// Empty columns sort first, then by rank, suit letter and facing of the top.
fn top_sort_key(pile: &TableauPile) -> Option<(u8, char, bool)> {
    pile.peek().map(|top| {
        let letter = top.suit.to_string().chars().next().unwrap_or('?');
        (top.rank.value(), letter, top.revealed)
    })
}
