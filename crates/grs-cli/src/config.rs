//! `grs.toml` configuration.
//!
//! ```toml
//! [score]
//! preset = "weighted"
//! curvature = "auto"
//! exact_edge_limit = 5000
//! weights = { w1 = 1.0, w2 = 1.0, w3 = 1.0 }
//!
//! [attack]
//! fraction = 0.2
//! strategy = "hub-targeted"
//! seed = 42
//!
//! [sweep]
//! steps = 5
//! trials = 3
//! max_fraction = 0.5
//!
//! [sinkhorn]
//! epsilon = 0.01
//! max_iterations = 5000
//! tolerance = 1e-9
//! ```
//!
//! Every section and key is optional. Command-line flags override values
//! from the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use grs_score::{
    AttackStrategy, CurvatureCapabilities, CurvatureMode, DEFAULT_ATTACK_FRACTION, ScoreEngine,
    ScoringPreset, SinkhornConfig, SweepConfig, Weights,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "grs.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrsConfig {
    #[serde(default)]
    pub score: ScoreConfig,
    #[serde(default)]
    pub attack: AttackConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub sinkhorn: SinkhornConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    #[serde(default)]
    pub weights: Weights,
    #[serde(default)]
    pub preset: ScoringPreset,
    #[serde(default)]
    pub curvature: CurvatureMode,
    /// Above this many edges `auto` uses the clustering proxy.
    #[serde(default)]
    pub exact_edge_limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackConfig {
    #[serde(default = "default_fraction")]
    pub fraction: f64,
    #[serde(default)]
    pub strategy: AttackStrategy,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            fraction: default_fraction(),
            strategy: AttackStrategy::default(),
            seed: None,
        }
    }
}

const fn default_fraction() -> f64 {
    DEFAULT_ATTACK_FRACTION
}

impl GrsConfig {
    /// Score engine for this configuration and the capabilities of this build.
    pub fn engine(&self, preset: Option<ScoringPreset>) -> Result<ScoreEngine> {
        let capabilities =
            CurvatureCapabilities::detect().with_exact_edge_limit(self.score.exact_edge_limit);
        let engine = ScoreEngine::new(capabilities)
            .with_preset(preset.unwrap_or(self.score.preset))
            .with_sinkhorn(self.sinkhorn)
            .context("invalid [sinkhorn] settings")?;
        Ok(engine)
    }
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, `grs.toml` in the working
/// directory is used when present and defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<GrsConfig> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    if !required && !path.exists() {
        debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
        return Ok(GrsConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = toml::from_str::<GrsConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}
