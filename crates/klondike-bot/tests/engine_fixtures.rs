use klondike_bot::advisor::{Advisor, EngineKind, recommend_breadth, recommend_depth};
use klondike_bot::search::{BreadthFirst, DepthFirst, SearchConfig, SearchEngine};
use klondike_core::model::card::Card;
use klondike_core::model::rank::Rank;
use klondike_core::model::state::GameState;
use klondike_core::model::suit::Suit;
use klondike_core::model::tableau::TableauPile;
use klondike_core::rules::{Move, apply};
use std::time::Duration;

fn one_card_from_winning() -> GameState {
    let mut state = GameState::empty(7);
    for suit in Suit::ALL {
        for rank in Rank::ORDERED {
            if suit == Suit::Hearts && rank == Rank::King {
                continue;
            }
            assert!(state.foundation_mut(suit).add(Card::face_up(rank, suit)));
        }
    }
    *state.column_mut(3).unwrap() =
        TableauPile::from_cards([Card::face_up(Rank::King, Suit::Hearts)]);
    state
}

#[test]
fn both_engines_finish_a_nearly_won_game() {
    let state = one_card_from_winning();
    state.validate().expect("fixture is a legal position");
    let advisor = Advisor::default();
    for kind in EngineKind::ALL {
        let rec = advisor.recommend(kind, &state);
        let mv = rec.mv.expect("winning move");
        assert_eq!(
            mv,
            Move::TableauToFoundation {
                column: 3,
                card: Card::face_up(Rank::King, Suit::Hearts),
            }
        );
        assert_eq!(rec.description(), "Move: KH from column 4 to the foundation");
        assert!(apply(&state, &mv).is_won());
    }
}

#[test]
fn waste_ace_fixture_grows_its_foundation() {
    let mut state = GameState::empty(7);
    state.waste_mut().add(Card::new(Rank::Two, Suit::Spades));
    state.waste_mut().add(Card::new(Rank::Ace, Suit::Hearts));

    let rec = recommend_breadth(&state, 15);
    let mv = rec.mv.expect("foundation move");
    assert!(matches!(mv, Move::WasteToFoundation { card } if card.suit == Suit::Hearts));

    let next = apply(&state, &mv);
    assert_eq!(next.foundation(Suit::Hearts).len(), 1);
    assert_eq!(next.waste().len(), state.waste().len() - 1);
}

#[test]
fn depth_entry_point_reports_found_moves() {
    let state = GameState::deal_with_seed(2024);
    let rec = recommend_depth(&state, 7).expect("a fresh deal always has a stock move");
    assert!(rec.description().starts_with("Move: "));
    assert!(rec.elapsed_ms() >= 0.0);
}

#[test]
fn time_cap_truncates_and_keeps_best_so_far() {
    let mut config = SearchConfig::breadth_default();
    config.limits.max_nodes = None;
    config.limits.time_cap = Some(Duration::ZERO);
    let rec = BreadthFirst.search(&GameState::deal_with_seed(77), &config);
    assert!(rec.stats.truncated);
    assert_eq!(rec.stats.expanded, 256);
    assert!(rec.found());
}

#[test]
fn engines_never_touch_the_root() {
    let state = GameState::deal_with_seed(5);
    let before = state.clone();
    let _ = BreadthFirst.search(&state, &SearchConfig::breadth_default());
    let _ = DepthFirst.search(&state, &SearchConfig::depth_default());
    assert_eq!(state, before);
}
