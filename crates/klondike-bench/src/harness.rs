use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use klondike_bot::advisor::{Advisor, AdvisorSettings, EngineKind};
use klondike_core::model::state::GameState;
use klondike_core::rules::MoveCategory;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AdvisorConfig, BenchmarkConfig, PlayConfig, ResolvedOutputs, ValidationError};
use crate::summary::{SummaryCollector, SummaryError};

/// Plays every configured advisor through the same seeded deals.
pub struct HarnessRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    advisors: Vec<AdvisorBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub advisors: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

impl HarnessRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, HarnessError> {
        let advisors = config
            .advisors
            .iter()
            .map(AdvisorBlueprint::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            advisors,
        })
    }

    /// Execute all games, streaming one JSONL row per (game, advisor).
    pub fn run(&self) -> Result<RunSummary, HarnessError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.deals.seed.unwrap_or(0));
        let mut collector = SummaryCollector::new(&self.config);
        let mut rows_written = 0usize;

        for game_index in 0..self.config.deals.games {
            let seed = rng.next_u64();
            let deal = GameState::deal_with_seed(seed);

            for (advisor_index, advisor) in self.advisors.iter().enumerate() {
                let outcome = play_game(advisor, &deal, &self.config.play)?;
                collector.record_game(advisor_index, &outcome)?;
                if self.logging_enabled {
                    self.log_game(game_index, seed, advisor, &outcome);
                }

                let row = GameLogRow {
                    run_id: &self.config.run_id,
                    game_index,
                    seed,
                    advisor: &advisor.name,
                    engine: advisor.kind.as_str(),
                    moves_played: outcome.moves_played,
                    foundation_cards: outcome.foundation_cards,
                    won: outcome.won,
                    stop_reason: outcome.stop_reason,
                    avg_ms: outcome.metrics.avg_ms_per_decision,
                    max_ms: outcome.metrics.max_ms,
                };
                serde_json::to_writer(&mut writer, &row)?;
                writer.write_all(b"\n")?;
                rows_written += 1;
            }
        }

        writer.flush()?;
        collector.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            games_played: self.config.deals.games,
            advisors: self.advisors.len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    fn log_game(&self, game_index: usize, seed: u64, advisor: &AdvisorBlueprint, outcome: &GameOutcome) {
        if !tracing::enabled!(Level::INFO) {
            return;
        }
        event!(
            target: "klondike_bench::game",
            Level::INFO,
            run_id = %self.config.run_id,
            game_index = game_index as u64,
            seed,
            advisor = %advisor.name,
            engine = advisor.kind.as_str(),
            moves_played = outcome.moves_played as u64,
            foundation_cards = outcome.foundation_cards as u64,
            won = outcome.won,
            stop_reason = outcome.stop_reason.as_str(),
            avg_ms = outcome.metrics.avg_ms_per_decision,
        );
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), HarnessError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Drive one advisor through a game until it is won, runs out of ideas,
/// cycles the stock without progress or hits the move limit.
fn play_game(
    advisor: &AdvisorBlueprint,
    deal: &GameState,
    play: &PlayConfig,
) -> Result<GameOutcome, HarnessError> {
    let mut state = deal.clone();
    let mut metrics = DecisionMetrics::default();
    let mut moves_played = 0usize;
    let mut stock_streak = 0usize;

    let stop_reason = loop {
        if state.is_won() {
            break StopReason::Won;
        }
        if moves_played >= play.max_moves {
            break StopReason::MoveLimit;
        }

        let recommendation = advisor.advisor.recommend(advisor.kind, &state);
        metrics.record(recommendation.elapsed);
        let Some(mv) = recommendation.mv else {
            break StopReason::NoMove;
        };

        let before = state.foundation_cards();
        if !state.play(&mv) {
            return Err(HarnessError::IllegalMove {
                advisor: advisor.name.clone(),
                description: mv.to_string(),
            });
        }
        moves_played += 1;

        if mv.category() == MoveCategory::Stock && state.foundation_cards() == before {
            stock_streak += 1;
        } else {
            stock_streak = 0;
        }
        if stock_streak >= play.stall_limit {
            break StopReason::Stalled;
        }
    };

    Ok(GameOutcome {
        moves_played,
        foundation_cards: state.foundation_cards(),
        won: stop_reason == StopReason::Won,
        stop_reason,
        metrics: metrics.finalize(),
    })
}

struct AdvisorBlueprint {
    name: String,
    kind: EngineKind,
    advisor: Advisor,
}

impl AdvisorBlueprint {
    fn from_config(config: &AdvisorConfig) -> Result<Self, ValidationError> {
        let kind = config.engine.kind();
        let mut settings = AdvisorSettings::default();
        *settings.config_mut(kind) = config.search_config()?;
        Ok(Self {
            name: config.name.clone(),
            kind,
            advisor: Advisor::new(settings),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Won,
    NoMove,
    Stalled,
    MoveLimit,
}

impl StopReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            StopReason::Won => "won",
            StopReason::NoMove => "no_move",
            StopReason::Stalled => "stalled",
            StopReason::MoveLimit => "move_limit",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameOutcome {
    pub moves_played: usize,
    pub foundation_cards: usize,
    pub won: bool,
    pub stop_reason: StopReason,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    max: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.max = self.max.max(duration);
        self.decisions += 1;
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
            max_ms: self.max.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
    pub max_ms: f64,
}

#[derive(Serialize)]
struct GameLogRow<'a> {
    run_id: &'a str,
    game_index: usize,
    seed: u64,
    advisor: &'a str,
    engine: &'static str,
    moves_played: usize,
    foundation_cards: usize,
    won: bool,
    stop_reason: StopReason,
    avg_ms: f64,
    max_ms: f64,
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("invalid advisor configuration: {0}")]
    Advisor(#[from] ValidationError),
    #[error("advisor '{advisor}' recommended an illegal move: {description}")]
    IllegalMove { advisor: String, description: String },
    #[error("summary error: {0}")]
    Summary(#[from] SummaryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineChoice, PlayConfig};
    use klondike_core::model::card::Card;
    use klondike_core::model::rank::Rank;
    use klondike_core::model::suit::Suit;

    fn blueprint(engine: EngineChoice, max_depth: usize) -> AdvisorBlueprint {
        AdvisorBlueprint::from_config(&AdvisorConfig {
            name: "fixture".to_string(),
            engine,
            max_depth: Some(max_depth),
            node_cap: None,
            column_key: None,
            weights: None,
        })
        .expect("valid advisor")
    }

    fn one_card_from_winning() -> GameState {
        let mut state = GameState::empty(7);
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                if suit == Suit::Spades && rank == Rank::King {
                    continue;
                }
                state.foundation_mut(suit).add(Card::face_up(rank, suit));
            }
        }
        state
            .waste_mut()
            .add(Card::new(Rank::King, Suit::Spades));
        state
    }

    #[test]
    fn nearly_won_game_finishes_in_one_move() {
        for engine in [EngineChoice::Breadth, EngineChoice::Depth] {
            let outcome = play_game(
                &blueprint(engine, 3),
                &one_card_from_winning(),
                &PlayConfig::default(),
            )
            .expect("game plays");
            assert!(outcome.won);
            assert_eq!(outcome.stop_reason, StopReason::Won);
            assert_eq!(outcome.moves_played, 1);
            assert_eq!(outcome.foundation_cards, 52);
            assert_eq!(outcome.metrics.decisions, 1);
        }
    }

    #[test]
    fn empty_board_stops_without_a_move() {
        let outcome = play_game(
            &blueprint(EngineChoice::Depth, 3),
            &GameState::empty(7),
            &PlayConfig::default(),
        )
        .expect("game plays");
        assert_eq!(outcome.stop_reason, StopReason::NoMove);
        assert_eq!(outcome.moves_played, 0);
        assert!(!outcome.won);
    }

    #[test]
    fn stock_cycling_counts_as_a_stall() {
        // Only stock moves exist: a lone nine cycles between stock and waste.
        let mut state = GameState::empty(7);
        state.stock_mut().add(Card::new(Rank::Nine, Suit::Clubs));
        let play = PlayConfig {
            max_moves: 50,
            stall_limit: 4,
        };
        let outcome =
            play_game(&blueprint(EngineChoice::Breadth, 2), &state, &play).expect("game plays");
        assert_eq!(outcome.stop_reason, StopReason::Stalled);
        assert_eq!(outcome.moves_played, 4);
    }

    #[test]
    fn move_limit_caps_long_games() {
        let play = PlayConfig {
            max_moves: 3,
            stall_limit: 100,
        };
        let outcome = play_game(
            &blueprint(EngineChoice::Depth, 2),
            &GameState::deal_with_seed(11),
            &play,
        )
        .expect("game plays");
        assert!(outcome.moves_played <= 3);
        assert!(matches!(
            outcome.stop_reason,
            StopReason::MoveLimit | StopReason::NoMove | StopReason::Stalled
        ));
    }

    #[test]
    fn decision_metrics_track_average_and_max() {
        let mut metrics = DecisionMetrics::default();
        metrics.record(Duration::from_millis(2));
        metrics.record(Duration::from_millis(6));
        let summary = metrics.finalize();
        assert_eq!(summary.decisions, 2);
        assert!((summary.avg_ms_per_decision - 4.0).abs() < 1e-9);
        assert!((summary.max_ms - 6.0).abs() < 1e-9);
    }
}
