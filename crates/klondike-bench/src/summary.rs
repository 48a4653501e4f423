use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::BenchmarkConfig;
use crate::harness::GameOutcome;

/// Per-advisor aggregates accumulated while games are played.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorTotals {
    pub name: String,
    pub engine: String,
    pub games: usize,
    pub wins: usize,
    pub foundation_cards: usize,
    pub decisions: u64,
    pub total_ms: f64,
    pub max_ms: f64,
}

impl AdvisorTotals {
    pub fn win_rate(&self) -> f64 {
        ratio(self.wins as f64, self.games)
    }

    pub fn mean_foundation_cards(&self) -> f64 {
        ratio(self.foundation_cards as f64, self.games)
    }

    pub fn mean_ms_per_decision(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.total_ms / self.decisions as f64
        }
    }
}

fn ratio(numerator: f64, games: usize) -> f64 {
    if games == 0 {
        0.0
    } else {
        numerator / games as f64
    }
}

pub struct SummaryCollector {
    run_id: String,
    advisors: Vec<AdvisorTotals>,
}

impl SummaryCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        let advisors = config
            .advisors
            .iter()
            .map(|advisor| AdvisorTotals {
                name: advisor.name.clone(),
                engine: advisor.engine.kind().to_string(),
                games: 0,
                wins: 0,
                foundation_cards: 0,
                decisions: 0,
                total_ms: 0.0,
                max_ms: 0.0,
            })
            .collect();
        Self {
            run_id: config.run_id.clone(),
            advisors,
        }
    }

    pub fn record_game(
        &mut self,
        advisor_index: usize,
        outcome: &GameOutcome,
    ) -> Result<(), SummaryError> {
        let totals = self
            .advisors
            .get_mut(advisor_index)
            .ok_or(SummaryError::UnknownAdvisor {
                index: advisor_index,
            })?;
        totals.games += 1;
        totals.wins += usize::from(outcome.won);
        totals.foundation_cards += outcome.foundation_cards;
        totals.decisions += u64::from(outcome.metrics.decisions);
        totals.total_ms += outcome.metrics.total_ms;
        totals.max_ms = totals.max_ms.max(outcome.metrics.max_ms);
        Ok(())
    }

    pub fn advisors(&self) -> &[AdvisorTotals] {
        &self.advisors
    }

    pub fn render_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str(&format!("# Advisor Summary: {}\n\n", self.run_id));
        rows.push_str(
            "| Advisor | Engine | Games | Win % | Avg foundation cards | Avg ms/decision | Max ms |\n",
        );
        rows.push_str(
            "|---------|--------|-------|-------|----------------------|-----------------|--------|\n",
        );
        for advisor in &self.advisors {
            rows.push_str(&format!(
                "| {name} | {engine} | {games} | {win:.1}% | {foundation:.2} | {latency:.2} | {max:.2} |\n",
                name = advisor.name,
                engine = advisor.engine,
                games = advisor.games,
                win = advisor.win_rate() * 100.0,
                foundation = advisor.mean_foundation_cards(),
                latency = advisor.mean_ms_per_decision(),
                max = advisor.max_ms,
            ));
        }
        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), SummaryError> {
        fs::write(path.as_ref(), self.render_markdown()).map_err(|source| SummaryError::Io {
            context: "writing summary markdown",
            source,
        })
    }
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("no advisor registered at index {index}")]
    UnknownAdvisor { index: usize },
}
