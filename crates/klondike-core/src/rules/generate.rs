use crate::model::state::GameState;
use crate::rules::moves::Move;

/// Every single-card move legal in `state`, foundation-bound moves first,
/// then tableau-bound, then the stock move. Ties keep discovery order.
///
/// Only the physical top card of each column is a source; lifting longer
/// runs is a player action (`GameState::relocate_run`).
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    let mut moves = Vec::new();
    let columns = state.tableau();

    if let Some(card) = state.waste().peek() {
        if state.foundation(card.suit).can_add(card) {
            moves.push(Move::WasteToFoundation { card });
        }
        for (column, pile) in columns.iter().enumerate() {
            if pile.can_add(card) {
                moves.push(Move::WasteToTableau { column, card });
            }
        }
    }

    for (from, pile) in columns.iter().enumerate() {
        let Some(card) = pile.peek() else {
            continue;
        };
        if state.foundation(card.suit).can_add(card) {
            moves.push(Move::TableauToFoundation { column: from, card });
        }
        for (to, target) in columns.iter().enumerate() {
            if to != from && target.can_add(card) {
                moves.push(Move::TableauToTableau { from, to, card });
            }
        }
    }

    if !state.stock().is_empty() {
        moves.push(Move::DrawStock);
    } else if !state.waste().is_empty() {
        moves.push(Move::ResetStock);
    }

    // Stable: equal categories stay in discovery order.
    moves.sort_by_key(|mv| std::cmp::Reverse(mv.category().priority()));
    moves
}

#[cfg(test)]
mod tests {
    use super::legal_moves;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::state::GameState;
    use crate::model::suit::Suit;
    use crate::model::tableau::TableauPile;
    use crate::rules::moves::{Move, MoveCategory};

    #[test]
    fn waste_ace_goes_to_foundation_first() {
        let mut state = GameState::empty(7);
        state.stock_mut().add(Card::new(Rank::Nine, Suit::Clubs));
        state.waste_mut().add(Card::new(Rank::Ace, Suit::Hearts));
        let moves = legal_moves(&state);
        assert!(matches!(moves[0], Move::WasteToFoundation { card } if card.is_ace()));
        assert_eq!(moves.last(), Some(&Move::DrawStock));
    }

    #[test]
    fn reset_offered_only_when_stock_is_empty() {
        let mut state = GameState::empty(7);
        state.waste_mut().add(Card::new(Rank::Nine, Suit::Clubs));
        assert_eq!(legal_moves(&state), vec![Move::ResetStock]);

        let empty = GameState::empty(7);
        assert!(legal_moves(&empty).is_empty());
    }

    #[test]
    fn king_can_move_to_every_empty_column() {
        let mut state = GameState::empty(4);
        *state.column_mut(0).unwrap() = TableauPile::from_cards([
            Card::new(Rank::Three, Suit::Clubs),
            Card::face_up(Rank::King, Suit::Hearts),
        ]);
        let moves = legal_moves(&state);
        let targets: Vec<usize> = moves
            .iter()
            .filter_map(|mv| match mv {
                Move::TableauToTableau { from: 0, to, .. } => Some(*to),
                _ => None,
            })
            .collect();
        assert_eq!(targets, vec![1, 2, 3]);
    }

    #[test]
    fn categories_are_non_increasing() {
        for seed in 0..20 {
            let state = GameState::deal_with_seed(seed);
            let moves = legal_moves(&state);
            let priorities: Vec<u8> = moves.iter().map(|mv| mv.category().priority()).collect();
            assert!(priorities.windows(2).all(|pair| pair[0] >= pair[1]));
            assert_eq!(
                moves.iter().filter(|mv| mv.category() == MoveCategory::Stock).count(),
                1
            );
        }
    }

    #[test]
    fn card_payload_matches_source_top() {
        for seed in 0..20 {
            let state = GameState::deal_with_seed(seed);
            for mv in legal_moves(&state) {
                if let Move::TableauToTableau { from, card, .. }
                | Move::TableauToFoundation { column: from, card } = mv
                {
                    assert_eq!(state.column(from).unwrap().peek(), Some(card));
                }
            }
        }
    }
}
