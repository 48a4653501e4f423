use crate::model::card::Card;
use crate::model::state::GameState;
use crate::rules::moves::Move;

/// Successor of `state` after `mv`. The input is never touched; a move
/// whose preconditions no longer hold yields an unchanged copy.
pub fn apply(state: &GameState, mv: &Move) -> GameState {
    let mut next = state.clone();
    next.play(mv);
    next
}

impl GameState {
    /// Applies `mv` in place. Returns `false`, leaving the state untouched,
    /// when the move is not legal here.
    pub fn play(&mut self, mv: &Move) -> bool {
        match *mv {
            Move::DrawStock => match self.stock_mut().draw() {
                Some(card) => {
                    self.waste_mut().add(card);
                    true
                }
                None => false,
            },
            Move::ResetStock => {
                if !self.stock().is_empty() || self.waste().is_empty() {
                    return false;
                }
                let (stock, waste) = self.stock_and_waste_mut();
                stock.recycle_from(waste);
                true
            }
            Move::WasteToFoundation { card } => {
                let Some(top) = self.waste().peek().filter(|top| top.same_face(card)) else {
                    return false;
                };
                if !self.foundation(top.suit).can_add(top) {
                    return false;
                }
                self.waste_mut().pop();
                self.foundation_mut(top.suit).add(top)
            }
            Move::WasteToTableau { column, card } => {
                let Some(top) = self.waste().peek().filter(|top| top.same_face(card)) else {
                    return false;
                };
                if !self.column(column).is_some_and(|pile| pile.can_add(top)) {
                    return false;
                }
                self.waste_mut().pop();
                self.column_mut(column).is_some_and(|pile| pile.add(top))
            }
            Move::TableauToFoundation { column, card } => {
                let Some(top) = self.column_top(column, card) else {
                    return false;
                };
                if !self.foundation(top.suit).can_add(top) {
                    return false;
                }
                self.pop_and_reveal(column);
                self.foundation_mut(top.suit).add(top)
            }
            Move::TableauToTableau { from, to, card } => {
                if from == to {
                    return false;
                }
                let Some(top) = self.column_top(from, card) else {
                    return false;
                };
                if !self.column(to).is_some_and(|pile| pile.can_add(top)) {
                    return false;
                }
                self.pop_and_reveal(from);
                self.column_mut(to).is_some_and(|pile| pile.add(top))
            }
        }
    }

    fn column_top(&self, column: usize, expected: Card) -> Option<Card> {
        self.column(column)
            .and_then(|pile| pile.peek())
            .filter(|top| top.same_face(expected))
    }

    fn pop_and_reveal(&mut self, column: usize) {
        if let Some(pile) = self.column_mut(column) {
            pile.pop();
            pile.reveal_top();
        }
    }
}
