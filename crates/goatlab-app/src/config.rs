// Configuration loading and parsing (config/goatlab.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use goatlab_basketball::ingest::IngestOptions;
use goatlab_basketball::presets::find_preset;
use goatlab_core::ScoreRange;

/// Config file name inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "goatlab.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// goatlab.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub ranking: RankingConfig,
    pub trade: TradeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub stats_csv: String,
    #[serde(default = "default_min_points")]
    pub min_points: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    pub top_n: usize,
    pub score_min: f64,
    pub score_max: f64,
    #[serde(default = "default_preset")]
    pub default_preset: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradeConfig {
    #[serde(default = "default_fairness_threshold")]
    pub fairness_threshold: f64,
}

fn default_min_points() -> f64 {
    IngestOptions::default().min_points
}

fn default_preset() -> String {
    "1".into()
}

fn default_fairness_threshold() -> f64 {
    goatlab_basketball::trade::DEFAULT_FAIRNESS_THRESHOLD
}

impl Config {
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            min_points: self.data.min_points,
        }
    }

    pub fn score_range(&self) -> ScoreRange {
        ScoreRange::new(self.ranking.score_min, self.ranking.score_max)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/goatlab.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()` which does.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Copy `defaults/goatlab.toml` into `config/` when it is missing there.
/// Returns the files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let source = defaults_dir.join(CONFIG_FILE);
    let target = config_dir.join(CONFIG_FILE);
    if target.exists() || !source.is_file() {
        return Ok(vec![]);
    }

    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    })?;
    Ok(vec![target])
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.stats_csv.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.stats_csv".into(),
            message: "must not be empty".into(),
        });
    }

    if !config.data.min_points.is_finite() || config.data.min_points < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "data.min_points".into(),
            message: format!("must be >= 0, got {}", config.data.min_points),
        });
    }

    let ranking = &config.ranking;
    if ranking.top_n == 0 {
        return Err(ConfigError::ValidationError {
            field: "ranking.top_n".into(),
            message: "must be > 0".into(),
        });
    }

    if !(ranking.score_min.is_finite() && ranking.score_max.is_finite())
        || ranking.score_max <= ranking.score_min
    {
        return Err(ConfigError::ValidationError {
            field: "ranking.score_max".into(),
            message: format!(
                "must be greater than ranking.score_min ({}), got {}",
                ranking.score_min, ranking.score_max
            ),
        });
    }

    if find_preset(&ranking.default_preset).is_none() {
        return Err(ConfigError::ValidationError {
            field: "ranking.default_preset".into(),
            message: format!("unknown preset `{}`", ranking.default_preset),
        });
    }

    let threshold = config.trade.fairness_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(ConfigError::ValidationError {
            field: "trade.fairness_threshold".into(),
            message: format!("must be in (0.0, 1.0], got {threshold}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
