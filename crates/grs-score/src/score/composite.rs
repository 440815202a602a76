use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::curvature::CurvatureSource;
use crate::error::ScoreError;

/// Curvature multiplier of the legacy preset when the proxy is in use.
pub const LEGACY_CURVATURE_SCALE: f64 = 10.0;

/// Configurable weights for the composite formula:
///
/// `C(G) = w1*gap - w2*var + w3*scale*curvature`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(default = "unit_weight")]
    pub w1: f64,
    #[serde(default = "unit_weight")]
    pub w2: f64,
    #[serde(default = "unit_weight")]
    pub w3: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl Weights {
    #[must_use]
    pub const fn new(w1: f64, w2: f64, w3: f64) -> Self {
        Self { w1, w2, w3 }
    }

    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidParameter`] for a NaN or infinite weight.
    pub fn validate(&self) -> Result<(), ScoreError> {
        for (name, value) in [("w1", self.w1), ("w2", self.w2), ("w3", self.w3)] {
            if !value.is_finite() {
                return Err(ScoreError::invalid(name, value, "weights must be finite"));
            }
        }
        Ok(())
    }
}

const fn unit_weight() -> f64 {
    1.0
}

/// How weights and curvature are combined into the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringPreset {
    /// Caller weights, curvature unscaled.
    #[default]
    Weighted,
    /// Unit weights; the clustering proxy is multiplied by
    /// [`LEGACY_CURVATURE_SCALE`]. Exact curvature is never scaled.
    LegacyScaled,
}

impl ScoringPreset {
    /// Weights actually used for scoring under this preset.
    #[must_use]
    pub fn effective_weights(self, requested: &Weights) -> Weights {
        match self {
            Self::Weighted => *requested,
            Self::LegacyScaled => Weights::default(),
        }
    }

    /// Factor applied to curvature from `source`.
    #[must_use]
    pub const fn curvature_scale(self, source: CurvatureSource) -> f64 {
        match (self, source) {
            (Self::LegacyScaled, CurvatureSource::ClusteringProxy) => LEGACY_CURVATURE_SCALE,
            _ => 1.0,
        }
    }
}

impl fmt::Display for ScoringPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Weighted => "weighted",
            Self::LegacyScaled => "legacy-scaled",
        })
    }
}

impl FromStr for ScoringPreset {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weighted" => Ok(Self::Weighted),
            "legacy" | "legacy-scaled" | "legacy_scaled" => Ok(Self::LegacyScaled),
            _ => Err(ScoreError::invalid(
                "preset",
                s,
                "expected one of: weighted, legacy-scaled",
            )),
        }
    }
}

/// Combine the three signals. No clamping.
#[must_use]
pub const fn composite_score(
    weights: &Weights,
    spectral_gap: f64,
    singular_value_variance: f64,
    scaled_curvature: f64,
) -> f64 {
    (weights.w1 * spectral_gap) - (weights.w2 * singular_value_variance)
        + (weights.w3 * scaled_curvature)
}
