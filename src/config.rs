//! Runtime configuration
//!
//! Paths come from environment variables with local-development defaults;
//! binaries let CLI flags override them. Training constants live in
//! `TrainConfig` / `ForestConfig`.

use crate::oracle::ForestConfig;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/fertilizer_data.csv";
pub const DEFAULT_MODEL_DIR: &str = "model";
/// Info for our crate, warn for others
pub const DEFAULT_LOG_FILTER: &str = "fertilizer_advisor=info,warn";

/// Where the advisor reads its inputs from
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorConfig {
    /// Training dataset CSV (also the source of the feature profiles)
    pub data_path: PathBuf,
    /// Directory holding `fertilizer_model.json` and `encoders.json`
    pub model_dir: PathBuf,
    /// Optional advisory table JSON; the built-in notes are used when unset
    pub advisory_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            advisory_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AdvisorConfig {
    /// Read `FERTILIZER_DATA`, `FERTILIZER_MODEL_DIR`, `FERTILIZER_ADVISORY`
    /// and `FERTILIZER_LOG`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            data_path: non_empty("FERTILIZER_DATA")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            model_dir: non_empty("FERTILIZER_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            advisory_path: non_empty("FERTILIZER_ADVISORY").map(PathBuf::from),
            log_filter: non_empty("FERTILIZER_LOG").unwrap_or(defaults.log_filter),
        }
    }

    pub fn log_config(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  FERTILIZER_DATA: {}", self.data_path.display());
        tracing::info!("  FERTILIZER_MODEL_DIR: {}", self.model_dir.display());
        match &self.advisory_path {
            Some(path) => tracing::info!("  FERTILIZER_ADVISORY: {}", path.display()),
            None => tracing::info!("  FERTILIZER_ADVISORY: (built-in notes)"),
        }
    }
}

/// Training constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub forest: ForestConfig,
    /// Share of rows held out for scoring
    pub test_fraction: f64,
    pub split_seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            forest: ForestConfig::default(),
            test_fraction: 0.2,
            split_seed: 42,
        }
    }
}
