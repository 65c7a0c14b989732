//! Optional user configuration read from `{user_dir}/config.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::similarity::DEFAULT_THRESHOLD;

/// Parsed config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Explicit location of the entry store.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    #[serde(default)]
    pub similarity: SimilarityConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimilarityConfig {
    /// Jaccard threshold for duplicate detection, 0.0..=1.0.
    pub threshold: Option<f64>,
}

impl Config {
    /// Load from the default config path. Returns defaults when absent or invalid.
    pub fn load() -> Self {
        crate::paths::config_file().map_or_else(Self::default, |p| Self::load_from(&p))
    }

    /// Load from an explicit path. Useful for testing.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                Self::default()
            }
        }
    }

    /// Effective similarity threshold.
    ///
    /// Priority: `NOTEERR_SIMILARITY_THRESHOLD` env var → config file → 0.85.
    pub fn similarity_threshold(&self) -> f64 {
        let from_env = std::env::var("NOTEERR_SIMILARITY_THRESHOLD")
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite());
        from_env
            .or(self.similarity.threshold)
            .map_or(DEFAULT_THRESHOLD, clamp_threshold)
    }
}

/// Clamp a threshold into the valid Jaccard range. Non-finite values fall back to the default.
pub fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        return DEFAULT_THRESHOLD;
    }
    threshold.clamp(0.0, 1.0)
}
