use super::{BestLine, Budget, Recommendation, SearchConfig, SearchEngine, SearchStats};
use super::{StateKey, score, state_key};
use klondike_core::model::state::GameState;
use klondike_core::rules::{Move, apply, legal_moves};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{Level, event};

/// Recursive exploration to a fixed ply bound. The visited set is global
/// to the call, so the first path to reach a state claims it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirst;

/// Mutable search context threaded through the recursion by `&mut`.
struct Explorer<'a> {
    config: &'a SearchConfig,
    visited: HashSet<StateKey>,
    best: BestLine,
    stats: SearchStats,
    budget: Budget,
}

impl SearchEngine for DepthFirst {
    fn name(&self) -> &'static str {
        "depth"
    }

    fn search(&self, root: &GameState, config: &SearchConfig) -> Recommendation {
        let started = Instant::now();
        let mut explorer = Explorer {
            config,
            visited: HashSet::new(),
            best: BestLine::new(),
            stats: SearchStats::default(),
            budget: Budget::new(started, &config.limits),
        };
        explorer
            .visited
            .insert(state_key(root, config.column_order));
        explorer.explore(root, 0, None);

        explorer.stats.visited = explorer.visited.len();
        let recommendation = explorer.best.finish(started, explorer.stats);
        log_search_summary(&recommendation, config);
        recommendation
    }
}

impl Explorer<'_> {
    fn explore(&mut self, state: &GameState, depth: usize, first_move: Option<Move>) {
        if depth >= self.config.limits.max_depth {
            return;
        }
        if self.budget.exhausted() {
            self.stats.truncated = true;
            return;
        }
        self.budget.tick();
        self.stats.expanded += 1;

        let mut moves = legal_moves(state);
        moves.sort_by_key(|mv| std::cmp::Reverse(mv.category().priority()));

        for mv in moves {
            if breaks_color_alternation(state, &mv) {
                self.stats.pruned_oscillation += 1;
                continue;
            }
            let next = apply(state, &mv);
            self.stats.generated += 1;
            if !self.visited.insert(state_key(&next, self.config.column_order)) {
                self.stats.duplicates += 1;
                continue;
            }
            let chosen = first_move.unwrap_or(mv);
            self.best.offer(score(&next, &self.config.weights), chosen);
            self.stats.deepest_ply = self.stats.deepest_ply.max(depth + 1);
            self.explore(&next, depth + 1, Some(chosen));
            if self.stats.truncated {
                return;
            }
        }
    }
}

/// Oscillation guard for tableau-to-tableau moves: rejects the move when
/// the moving card, the card beneath it and the destination top all share
/// one color. Moves off a single-card column or onto an empty one pass.
pub fn breaks_color_alternation(state: &GameState, mv: &Move) -> bool {
    let Move::TableauToTableau { from, to, .. } = *mv else {
        return false;
    };
    let (Some(source), Some(target)) = (state.column(from), state.column(to)) else {
        return false;
    };
    let cards = source.cards();
    let [.., beneath, moving] = cards else {
        return false;
    };
    let Some(destination) = target.peek() else {
        return false;
    };
    moving.is_red() == beneath.is_red() && moving.is_red() == destination.is_red()
}

fn log_search_summary(recommendation: &Recommendation, config: &SearchConfig) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    let stats = &recommendation.stats;
    event!(
        target: "klondike_bot::depth",
        Level::DEBUG,
        max_depth = config.limits.max_depth,
        column_order = config.column_order.as_str(),
        weights = config.weights.preset_name().unwrap_or("custom"),
        expanded = stats.expanded,
        generated = stats.generated,
        duplicates = stats.duplicates,
        pruned_oscillation = stats.pruned_oscillation,
        visited = stats.visited,
        deepest_ply = stats.deepest_ply,
        truncated = stats.truncated,
        best_score = ?recommendation.score,
        elapsed_ms = recommendation.elapsed_ms(),
    );
}
