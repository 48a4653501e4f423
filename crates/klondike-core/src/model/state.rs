use crate::model::card::Card;
use crate::model::deck::{DECK_SIZE, Deck};
use crate::model::foundation::FoundationPile;
use crate::model::stock::{StockPile, WastePile};
use crate::model::suit::Suit;
use crate::model::tableau::{DEFAULT_COLUMNS, TableauPile};
use std::array;
use std::fmt;

/// Complete board position. Cloning yields a fully independent position:
/// cards are plain values, so no two live states ever share one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    stock: StockPile,
    waste: WastePile,
    foundations: [FoundationPile; 4],
    tableau: Vec<TableauPile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAction {
    Drawn(Card),
    Recycled(usize),
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    DuplicateCard(Card),
    MissingCards { found: usize },
    StockFaceUp(Card),
    WasteFaceDown(Card),
    FoundationOrder { suit: Suit },
    TableauFacing { column: usize },
    TableauSequence { column: usize },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::DuplicateCard(card) => write!(f, "{card} appears more than once"),
            StateError::MissingCards { found } => {
                write!(f, "expected {DECK_SIZE} cards on the board but found {found}")
            }
            StateError::StockFaceUp(card) => write!(f, "stock card {card} is face-up"),
            StateError::WasteFaceDown(card) => write!(f, "waste card {card} is face-down"),
            StateError::FoundationOrder { suit } => {
                write!(f, "{suit} foundation is not an Ace-up run of its suit")
            }
            StateError::TableauFacing { column } => write!(
                f,
                "column {} has a face-down card above a face-up one or a hidden top",
                column + 1
            ),
            StateError::TableauSequence { column } => write!(
                f,
                "column {} face-up cards do not descend in alternating colors",
                column + 1
            ),
        }
    }
}

impl std::error::Error for StateError {}

impl GameState {
    /// Empty board with `columns` tableau piles.
    pub fn empty(columns: usize) -> Self {
        Self {
            stock: StockPile::new(),
            waste: WastePile::new(),
            foundations: array::from_fn(|index| {
                FoundationPile::new(Suit::from_index(index).unwrap_or(Suit::Hearts))
            }),
            tableau: vec![TableauPile::new(); columns],
        }
    }

    pub fn from_parts(
        stock: StockPile,
        waste: WastePile,
        foundations: [FoundationPile; 4],
        tableau: Vec<TableauPile>,
    ) -> Self {
        Self {
            stock,
            waste,
            foundations,
            tableau,
        }
    }

    /// Standard seven-column deal: column `i` receives `i + 1` cards with
    /// only the last one face-up; the rest of the deck becomes the stock.
    pub fn deal(deck: &Deck) -> Self {
        let mut state = Self::empty(DEFAULT_COLUMNS);
        let mut cards = deck.cards().iter().copied();
        for column in 0..DEFAULT_COLUMNS {
            let dealt: Vec<Card> = cards
                .by_ref()
                .take(column + 1)
                .enumerate()
                .map(|(row, mut card)| {
                    card.revealed = row == column;
                    card
                })
                .collect();
            state.tableau[column] = TableauPile::from_cards(dealt);
        }
        for card in cards {
            state.stock.add(card);
        }
        state
    }

    pub fn deal_with_seed(seed: u64) -> Self {
        Self::deal(&Deck::shuffled_with_seed(seed))
    }

    pub fn stock(&self) -> &StockPile {
        &self.stock
    }

    pub fn stock_mut(&mut self) -> &mut StockPile {
        &mut self.stock
    }

    pub fn waste(&self) -> &WastePile {
        &self.waste
    }

    pub fn waste_mut(&mut self) -> &mut WastePile {
        &mut self.waste
    }

    pub(crate) fn stock_and_waste_mut(&mut self) -> (&mut StockPile, &mut WastePile) {
        (&mut self.stock, &mut self.waste)
    }

    pub fn foundations(&self) -> &[FoundationPile; 4] {
        &self.foundations
    }

    pub fn foundation(&self, suit: Suit) -> &FoundationPile {
        &self.foundations[suit.index()]
    }

    pub fn foundation_mut(&mut self, suit: Suit) -> &mut FoundationPile {
        &mut self.foundations[suit.index()]
    }

    pub fn tableau(&self) -> &[TableauPile] {
        &self.tableau
    }

    pub fn column(&self, index: usize) -> Option<&TableauPile> {
        self.tableau.get(index)
    }

    pub fn column_mut(&mut self, index: usize) -> Option<&mut TableauPile> {
        self.tableau.get_mut(index)
    }

    pub fn column_count(&self) -> usize {
        self.tableau.len()
    }

    pub fn foundation_cards(&self) -> usize {
        self.foundations.iter().map(FoundationPile::len).sum()
    }

    pub fn is_won(&self) -> bool {
        self.foundations.iter().all(FoundationPile::is_complete)
    }

    /// Stock click: draw one card to the waste, or recycle the waste once
    /// the stock has run dry.
    pub fn turn_stock(&mut self) -> StockAction {
        if let Some(card) = self.stock.draw() {
            self.waste.add(card);
            return StockAction::Drawn(card);
        }
        if self.waste.is_empty() {
            return StockAction::NoOp;
        }
        StockAction::Recycled(self.stock.recycle_from(&mut self.waste))
    }

    /// Player-driven run relocation: lifts `cards[start..]` from column
    /// `from` onto column `to` when the run is a valid build and its first
    /// card is accepted by the destination.
    pub fn relocate_run(&mut self, from: usize, start: usize, to: usize) -> bool {
        if from == to || to >= self.tableau.len() {
            return false;
        }
        let Some(lead) = self
            .tableau
            .get(from)
            .and_then(|pile| pile.movable_run(start))
            .and_then(|run| run.first().copied())
        else {
            return false;
        };
        if !self.tableau[to].can_add(lead) {
            return false;
        }
        let run = self.tableau[from].split_off(start);
        self.tableau[to].extend_face_up(run);
        self.tableau[from].reveal_top();
        true
    }

    /// Player-driven single card to foundation from the top of a column.
    pub fn column_to_foundation(&mut self, from: usize) -> bool {
        let Some(card) = self.tableau.get(from).and_then(TableauPile::peek) else {
            return false;
        };
        if !card.revealed || !self.foundation(card.suit).can_add(card) {
            return false;
        }
        self.tableau[from].pop();
        self.foundation_mut(card.suit).add(card);
        self.tableau[from].reveal_top();
        true
    }

    /// Checks the deck invariant and per-pile facing rules. Search never
    /// calls this; it is meant for positions arriving from outside.
    pub fn validate(&self) -> Result<(), StateError> {
        let mut seen = [false; DECK_SIZE];
        let mut found = 0usize;
        let all_cards = self
            .stock
            .cards()
            .iter()
            .chain(self.waste.cards())
            .chain(self.foundations.iter().flat_map(|pile| pile.cards()))
            .chain(self.tableau.iter().flat_map(|pile| pile.cards()));
        for card in all_cards {
            let slot = &mut seen[card.ordinal() as usize];
            if *slot {
                return Err(StateError::DuplicateCard(*card));
            }
            *slot = true;
            found += 1;
        }
        if found != DECK_SIZE {
            return Err(StateError::MissingCards { found });
        }

        if let Some(card) = self.stock.cards().iter().find(|card| card.revealed) {
            return Err(StateError::StockFaceUp(*card));
        }
        if let Some(card) = self.waste.cards().iter().find(|card| !card.revealed) {
            return Err(StateError::WasteFaceDown(*card));
        }

        for pile in &self.foundations {
            let ordered = pile
                .cards()
                .iter()
                .enumerate()
                .all(|(index, card)| card.suit == pile.suit() && card.rank.value() as usize == index + 1);
            if !ordered {
                return Err(StateError::FoundationOrder { suit: pile.suit() });
            }
        }

        for (column, pile) in self.tableau.iter().enumerate() {
            if pile.exposed().len() != pile.revealed_count()
                || pile.peek().is_some_and(|top| !top.revealed)
            {
                return Err(StateError::TableauFacing { column });
            }
            if !pile.exposed().windows(2).all(|pair| pair[1].builds_on(pair[0])) {
                return Err(StateError::TableauSequence { column });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{GameState, StateError, StockAction};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::tableau::TableauPile;

    #[test]
    fn deal_lays_out_triangle_with_face_up_tops() {
        let state = GameState::deal_with_seed(7);
        assert_eq!(state.column_count(), 7);
        for (index, pile) in state.tableau().iter().enumerate() {
            assert_eq!(pile.len(), index + 1);
            assert_eq!(pile.revealed_count(), 1);
            assert!(pile.peek().unwrap().revealed);
        }
        assert_eq!(state.stock().len(), 24);
        assert!(state.waste().is_empty());
        assert_eq!(state.validate(), Ok(()));
    }

    #[test]
    fn validate_flags_duplicates() {
        let mut state = GameState::deal_with_seed(3);
        let top = state.column(0).unwrap().peek().unwrap();
        state.stock_mut().add(top);
        assert_eq!(state.validate(), Err(StateError::DuplicateCard(top)));
    }

    #[test]
    fn validate_flags_missing_cards() {
        let mut state = GameState::deal_with_seed(3);
        state.stock_mut().draw();
        assert_eq!(state.validate(), Err(StateError::MissingCards { found: 51 }));
    }

    #[test]
    fn turn_stock_draws_then_recycles() {
        let mut state = GameState::empty(7);
        state.stock_mut().add(Card::new(Rank::Four, Suit::Clubs));
        assert!(matches!(state.turn_stock(), StockAction::Drawn(_)));
        assert_eq!(state.turn_stock(), StockAction::Recycled(1));
        assert_eq!(state.stock().len(), 1);
        let mut empty = GameState::empty(7);
        assert_eq!(empty.turn_stock(), StockAction::NoOp);
    }

    #[test]
    fn relocate_run_moves_whole_build_and_reveals_source() {
        let mut state = GameState::empty(3);
        *state.column_mut(0).unwrap() = TableauPile::from_cards([
            Card::new(Rank::Two, Suit::Clubs),
            Card::face_up(Rank::Queen, Suit::Hearts),
            Card::face_up(Rank::Jack, Suit::Spades),
        ]);
        *state.column_mut(1).unwrap() =
            TableauPile::from_cards([Card::face_up(Rank::King, Suit::Clubs)]);

        assert!(!state.relocate_run(0, 0, 1));
        assert!(state.relocate_run(0, 1, 1));
        assert_eq!(state.column(1).unwrap().len(), 3);
        assert_eq!(state.column(0).unwrap().len(), 1);
        assert!(state.column(0).unwrap().peek().unwrap().revealed);
    }

    #[test]
    fn relocate_king_run_into_empty_column() {
        let mut state = GameState::empty(2);
        *state.column_mut(0).unwrap() = TableauPile::from_cards([
            Card::face_up(Rank::King, Suit::Diamonds),
            Card::face_up(Rank::Queen, Suit::Clubs),
        ]);
        assert!(state.relocate_run(0, 0, 1));
        assert!(state.column(0).unwrap().is_empty());
        assert_eq!(state.column(1).unwrap().exposed().len(), 2);
    }

    #[test]
    fn column_to_foundation_requires_next_rank() {
        let mut state = GameState::empty(1);
        *state.column_mut(0).unwrap() = TableauPile::from_cards([
            Card::new(Rank::Nine, Suit::Spades),
            Card::face_up(Rank::Ace, Suit::Hearts),
        ]);
        assert!(state.column_to_foundation(0));
        assert_eq!(state.foundation(Suit::Hearts).len(), 1);
        assert!(state.column(0).unwrap().peek().unwrap().revealed);
        assert!(!state.column_to_foundation(0));
    }
}
