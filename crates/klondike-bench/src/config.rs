use klondike_bot::advisor::EngineKind;
use klondike_bot::search::{ColumnOrder, ScoreWeights, SearchConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_MAX_MOVES: usize = 400;
const DEFAULT_STALL_LIMIT: usize = 75;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root harness configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub deals: DealConfig,
    pub advisors: Vec<AdvisorConfig>,
    #[serde(default)]
    pub play: PlayConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.deals.validate()?;
        self.play.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_advisors(&self.advisors)?;
        Ok(())
    }

    /// Resolve output templates (`{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// Which deals are played: `games` deals derived from one seed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DealConfig {
    pub seed: Option<u64>,
    pub games: usize,
}

impl DealConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.games == 0 {
            return Err(ValidationError::InvalidField {
                field: "deals.games".to_string(),
                message: "number of games must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// One advisor under test. Unset knobs inherit the engine defaults.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AdvisorConfig {
    pub name: String,
    pub engine: EngineChoice,
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// `0` disables the node cap.
    #[serde(default)]
    pub node_cap: Option<usize>,
    #[serde(default)]
    pub column_key: Option<String>,
    #[serde(default)]
    pub weights: Option<String>,
}

impl AdvisorConfig {
    /// Search configuration for this advisor, defaults filled in.
    pub fn search_config(&self) -> Result<SearchConfig, ValidationError> {
        let mut config = match self.engine.kind() {
            EngineKind::Breadth => SearchConfig::breadth_default(),
            EngineKind::Depth => SearchConfig::depth_default(),
        };
        if let Some(depth) = self.max_depth {
            config.limits.max_depth = depth;
        }
        if let Some(cap) = self.node_cap {
            config.limits.max_nodes = (cap > 0).then_some(cap);
        }
        if let Some(raw) = self.column_key.as_deref() {
            config.column_order =
                raw.parse::<ColumnOrder>()
                    .map_err(|message| ValidationError::InvalidField {
                        field: format!("advisors[{}].column_key", self.name),
                        message,
                    })?;
        }
        if let Some(raw) = self.weights.as_deref() {
            config.weights =
                raw.parse::<ScoreWeights>()
                    .map_err(|message| ValidationError::InvalidField {
                        field: format!("advisors[{}].weights", self.name),
                        message,
                    })?;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngineChoice {
    Breadth,
    Depth,
}

impl EngineChoice {
    pub const fn kind(self) -> EngineKind {
        match self {
            EngineChoice::Breadth => EngineKind::Breadth,
            EngineChoice::Depth => EngineKind::Depth,
        }
    }
}

/// Per-game stopping rules.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayConfig {
    #[serde(default = "default_max_moves")]
    pub max_moves: usize,
    /// Consecutive stock moves without foundation progress before giving up.
    #[serde(default = "default_stall_limit")]
    pub stall_limit: usize,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            max_moves: DEFAULT_MAX_MOVES,
            stall_limit: DEFAULT_STALL_LIMIT,
        }
    }
}

impl PlayConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_moves == 0 {
            return Err(ValidationError::InvalidField {
                field: "play.max_moves".to_string(),
                message: "max_moves must be greater than zero".to_string(),
            });
        }
        if self.stall_limit == 0 {
            return Err(ValidationError::InvalidField {
                field: "play.stall_limit".to_string(),
                message: "stall_limit must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn default_max_moves() -> usize {
    DEFAULT_MAX_MOVES
}

fn default_stall_limit() -> usize {
    DEFAULT_STALL_LIMIT
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_advisors(advisors: &[AdvisorConfig]) -> Result<(), ValidationError> {
    if advisors.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "advisors".to_string(),
            message: "at least one advisor must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for advisor in advisors {
        if advisor.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "advisors.name".to_string(),
                message: "advisor name must not be empty".to_string(),
            });
        }

        if !advisor.name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
            return Err(ValidationError::InvalidField {
                field: format!("advisors[{}].name", advisor.name),
                message: "advisor name contains invalid characters".to_string(),
            });
        }

        if !seen.insert(advisor.name.as_str()) {
            return Err(ValidationError::InvalidField {
                field: "advisors".to_string(),
                message: format!("advisor name '{}' defined more than once", advisor.name),
            });
        }

        if advisor.max_depth == Some(0) {
            return Err(ValidationError::InvalidField {
                field: format!("advisors[{}].max_depth", advisor.name),
                message: "max_depth must be at least 1".to_string(),
            });
        }

        advisor.search_config()?;
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "stage0_smoke"
deals:
  seed: 123
  games: 16
advisors:
  - name: "breadth15"
    engine: "breadth"
  - name: "depth5_tree"
    engine: "depth"
    max_depth: 5
    node_cap: 0
    column_key: "positional"
    weights: "tree"
outputs:
  jsonl: "bench/out/{run_id}/games.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.play, PlayConfig::default());
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/stage0_smoke/games.jsonl")
        );
    }

    #[test]
    fn advisor_knobs_override_engine_defaults() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse");
        cfg.validate().expect("valid");

        let breadth = cfg.advisors[0].search_config().expect("breadth config");
        assert_eq!(breadth, SearchConfig::breadth_default());

        let depth = cfg.advisors[1].search_config().expect("depth config");
        assert_eq!(depth.limits.max_depth, 5);
        assert_eq!(depth.limits.max_nodes, None);
        assert_eq!(depth.column_order, ColumnOrder::Positional);
        assert_eq!(depth.weights, ScoreWeights::TREE);
    }

    #[test]
    fn rejects_unknown_weights() {
        let yaml = BASIC_YAML.replace("weights: \"tree\"", "weights: \"heavy\"");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "advisors[depth5_tree].weights"
        ));
    }

    #[test]
    fn rejects_duplicate_advisors() {
        let yaml = BASIC_YAML.replace("depth5_tree", "breadth15");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("duplicate advisors should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "advisors"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("stage0_smoke", "stage 0 smoke");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn rejects_zero_games() {
        let yaml = BASIC_YAML.replace("games: 16", "games: 0");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("zero games");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "deals.games"
        ));
    }

    #[test]
    fn outputs_resolve_template_multiple_occurrences() {
        let yaml = BASIC_YAML.replace(
            "bench/out/{run_id}/summary.md",
            "bench/out/{run_id}/{run_id}.md",
        );
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.summary_md,
            PathBuf::from("bench/out/stage0_smoke/stage0_smoke.md")
        );
    }

    #[test]
    fn unknown_engine_fails_to_parse() {
        let yaml = BASIC_YAML.replace("engine: \"breadth\"", "engine: \"random\"");
        assert!(serde_yaml::from_str::<BenchmarkConfig>(&yaml).is_err());
    }
}
