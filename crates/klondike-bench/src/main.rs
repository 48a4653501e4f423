use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use klondike_bench::config::{BenchmarkConfig, ResolvedOutputs};
use klondike_bench::harness::HarnessRunner;
use klondike_bench::logging::{init_logging, init_stderr_logging};
use klondike_bot::advisor::{Advisor, EngineKind};
use klondike_core::game::BoardSnapshot;

/// Seeded self-play harness for the Klondike move advisors.
#[derive(Debug, Parser)]
#[command(
    name = "klondike-bench",
    author,
    version,
    about = "Deterministic Klondike advisor harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,

    /// Print a single hint for a JSON board snapshot instead of running games.
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Engine used for --snapshot hints (breadth or depth).
    #[arg(long, value_name = "ENGINE", default_value = "breadth")]
    engine: EngineKind,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.snapshot.as_ref() {
        return print_hint(path, cli.engine);
    }

    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.deals.games = games;
    }

    if let Some(seed) = cli.seed {
        config.deals.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let advisor_count = config.advisors.len();
    let run_id = config.run_id.clone();
    let games = config.deals.games;

    println!(
        "Loaded configuration '{run_id}' with {advisor_count} advisor{} ({games} games)",
        if advisor_count == 1 { "" } else { "s" }
    );

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = HarnessRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: game execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} games x {} advisors -> {} rows at {}",
        summary.games_played,
        summary.advisors,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}

fn print_hint(path: &Path, engine: EngineKind) -> anyhow::Result<()> {
    init_stderr_logging();
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let state = BoardSnapshot::load_state(&json)
        .with_context(|| format!("loading snapshot {}", path.display()))?;

    let recommendation = Advisor::from_env().recommend(engine, &state);
    println!("{}", recommendation.description());
    println!(
        "{engine} search: {:.3} ms, {} states expanded{}",
        recommendation.elapsed_ms(),
        recommendation.stats.expanded,
        if recommendation.stats.truncated {
            " (truncated)"
        } else {
            ""
        }
    );
    Ok(())
}
