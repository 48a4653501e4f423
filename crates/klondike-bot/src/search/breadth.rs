use super::{BestLine, Budget, Recommendation, SearchConfig, SearchEngine, SearchStats};
use super::{score, state_key};
use klondike_core::model::state::GameState;
use klondike_core::rules::{Move, apply, legal_moves};
use std::collections::{HashSet, VecDeque};
use std::time::Instant;
use tracing::{Level, event};

/// Level-order exploration with one visited set shared by the whole
/// frontier. A state is enqueued at most once.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirst;

struct FrontierNode {
    state: GameState,
    depth: usize,
    first_move: Option<Move>,
}

impl SearchEngine for BreadthFirst {
    fn name(&self) -> &'static str {
        "breadth"
    }

    fn search(&self, root: &GameState, config: &SearchConfig) -> Recommendation {
        let started = Instant::now();
        let mut budget = Budget::new(started, &config.limits);
        let mut stats = SearchStats::default();
        let mut best = BestLine::new();

        let mut visited = HashSet::new();
        visited.insert(state_key(root, config.column_order));
        let mut frontier = VecDeque::new();
        frontier.push_back(FrontierNode {
            state: root.clone(),
            depth: 0,
            first_move: None,
        });

        while let Some(node) = frontier.pop_front() {
            if node.depth >= config.limits.max_depth {
                continue;
            }
            if budget.exhausted() {
                stats.truncated = true;
                break;
            }
            budget.tick();
            stats.expanded += 1;

            for mv in legal_moves(&node.state) {
                let next = apply(&node.state, &mv);
                stats.generated += 1;
                if !visited.insert(state_key(&next, config.column_order)) {
                    stats.duplicates += 1;
                    continue;
                }
                let first_move = node.first_move.unwrap_or(mv);
                best.offer(score(&next, &config.weights), first_move);
                stats.deepest_ply = stats.deepest_ply.max(node.depth + 1);
                frontier.push_back(FrontierNode {
                    state: next,
                    depth: node.depth + 1,
                    first_move: Some(first_move),
                });
            }
            stats.max_frontier = stats.max_frontier.max(frontier.len());
        }

        stats.visited = visited.len();
        let recommendation = best.finish(started, stats);
        log_search_summary(&recommendation, config);
        recommendation
    }
}

fn log_search_summary(recommendation: &Recommendation, config: &SearchConfig) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    let stats = &recommendation.stats;
    event!(
        target: "klondike_bot::breadth",
        Level::DEBUG,
        max_depth = config.limits.max_depth,
        column_order = config.column_order.as_str(),
        weights = config.weights.preset_name().unwrap_or("custom"),
        expanded = stats.expanded,
        generated = stats.generated,
        duplicates = stats.duplicates,
        visited = stats.visited,
        max_frontier = stats.max_frontier,
        deepest_ply = stats.deepest_ply,
        truncated = stats.truncated,
        best_score = ?recommendation.score,
        elapsed_ms = recommendation.elapsed_ms(),
    );
}
