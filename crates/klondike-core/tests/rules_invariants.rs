use klondike_core::game::BoardSnapshot;
use klondike_core::model::state::GameState;
use klondike_core::model::suit::Suit;
use klondike_core::rules::{Move, apply, legal_moves};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

fn random_walk(seed: u64, steps: usize) -> Vec<GameState> {
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    let mut state = GameState::deal_with_seed(seed);
    let mut visited = vec![state.clone()];
    for _ in 0..steps {
        let moves = legal_moves(&state);
        let Some(mv) = moves.choose(&mut rng) else {
            break;
        };
        state = apply(&state, mv);
        visited.push(state.clone());
    }
    visited
}

#[test]
fn every_generated_move_preserves_board_invariants() {
    for seed in 0..25u64 {
        for state in random_walk(seed, 120) {
            for mv in legal_moves(&state) {
                let next = apply(&state, &mv);
                if let Err(err) = next.validate() {
                    panic!("seed {seed}: {mv} broke the board: {err}");
                }
                assert_ne!(next, state, "seed {seed}: {mv} changed nothing");
            }
        }
    }
}

#[test]
fn apply_never_mutates_its_input() {
    let state = GameState::deal_with_seed(2024);
    let before = state.clone();
    for mv in legal_moves(&state) {
        let _ = apply(&state, &mv);
    }
    assert_eq!(state, before);
}

#[test]
fn foundation_moves_grow_the_matching_pile() {
    for seed in 0..25u64 {
        for state in random_walk(seed, 80) {
            for mv in legal_moves(&state) {
                let (Move::WasteToFoundation { card } | Move::TableauToFoundation { card, .. }) = mv
                else {
                    continue;
                };
                let next = apply(&state, &mv);
                assert_eq!(
                    next.foundation(card.suit).len(),
                    state.foundation(card.suit).len() + 1
                );
                assert_eq!(next.foundation_cards(), state.foundation_cards() + 1);
            }
        }
    }
}

#[test]
fn snapshots_survive_a_random_game() {
    for state in random_walk(77, 200) {
        let json = BoardSnapshot::to_json(&state).expect("serialize");
        let restored = BoardSnapshot::load_state(&json).expect("restore");
        assert_eq!(restored, state);
        assert_eq!(
            restored.foundation(Suit::Spades).len(),
            state.foundation(Suit::Spades).len()
        );
    }
}
