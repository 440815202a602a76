//! The robustness score engine.
//!
//! # Overview
//!
//! [`ScoreEngine::compute_score`] combines three structural signals:
//!
//! ```text
//! C(G) = w1·gap − w2·var + w3·scale·κ
//! ```
//!
//! - `gap`: spectral gap of the adjacency matrix.
//! - `var`: population variance of its singular values.
//! - `κ`: average curvature from the provider chosen by
//!   [`select_curvature`], scaled by the preset.
//!
//! The engine is plain configuration: it holds no graph between calls and
//! every result is a pure function of its inputs.

use grs_core::{Graph, NodeLabel};
use serde::Serialize;
use tracing::instrument;

#[cfg(feature = "exact-curvature")]
use crate::curvature::ollivier::OllivierRicci;
use crate::curvature::{
    ClusteringProxy, CurvatureCapabilities, CurvatureMode, CurvatureProvider, CurvatureSource,
    FallbackReason, SinkhornConfig, select_curvature,
};
use crate::error::ScoreError;
use crate::metrics::Topology;
use crate::metrics::spectral::{adjacency_matrix, singular_value_variance, spectral_gap};

use super::composite::{ScoringPreset, Weights, composite_score};

/// Score of a single graph together with its components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    pub spectral_gap: f64,
    pub singular_value_variance: f64,
    /// Raw average curvature, before the preset scale.
    pub curvature: f64,
    pub score: f64,
    pub curvature_source: CurvatureSource,
    /// Set when exact curvature was requested but the proxy was used.
    pub fallback: Option<FallbackReason>,
    pub preset: ScoringPreset,
    /// Factor applied to `curvature` in `score`.
    pub curvature_scale: f64,
}

impl ScoreResult {
    const fn degenerate(preset: ScoringPreset) -> Self {
        Self {
            spectral_gap: 0.0,
            singular_value_variance: 0.0,
            curvature: 0.0,
            score: 0.0,
            curvature_source: CurvatureSource::ClusteringProxy,
            fallback: None,
            preset,
            curvature_scale: preset.curvature_scale(CurvatureSource::ClusteringProxy),
        }
    }
}

/// Scores graphs under a fixed set of capabilities and a scoring preset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreEngine {
    capabilities: CurvatureCapabilities,
    preset: ScoringPreset,
    sinkhorn: SinkhornConfig,
}

impl ScoreEngine {
    #[must_use]
    pub fn new(capabilities: CurvatureCapabilities) -> Self {
        Self {
            capabilities,
            preset: ScoringPreset::default(),
            sinkhorn: SinkhornConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_preset(mut self, preset: ScoringPreset) -> Self {
        self.preset = preset;
        self
    }

    /// Replace the optimal-transport solver settings.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidParameter`] if the settings are invalid.
    pub fn with_sinkhorn(mut self, sinkhorn: SinkhornConfig) -> Result<Self, ScoreError> {
        sinkhorn.validate()?;
        self.sinkhorn = sinkhorn;
        Ok(self)
    }

    #[must_use]
    pub const fn capabilities(&self) -> &CurvatureCapabilities {
        &self.capabilities
    }

    #[must_use]
    pub const fn preset(&self) -> ScoringPreset {
        self.preset
    }

    #[must_use]
    pub const fn sinkhorn(&self) -> &SinkhornConfig {
        &self.sinkhorn
    }

    /// Compute `C(G)` and its components.
    ///
    /// Graphs with fewer than two nodes score `0` with every component `0`.
    ///
    /// # Errors
    ///
    /// - [`ScoreError::InvalidParameter`] for non-finite weights.
    /// - [`ScoreError::NumericFailure`] if a decomposition or, for exact
    ///   curvature, an edge's transport problem does not converge.
    #[instrument(
        level = "debug",
        skip_all,
        fields(nodes = graph.node_count(), edges = graph.edge_count(), %mode)
    )]
    pub fn compute_score<N: NodeLabel>(
        &self,
        graph: &Graph<N>,
        weights: &Weights,
        mode: CurvatureMode,
    ) -> Result<ScoreResult, ScoreError> {
        weights.validate()?;
        if graph.node_count() < 2 {
            return Ok(ScoreResult::degenerate(self.preset));
        }

        let adjacency = adjacency_matrix(graph);
        let gap = spectral_gap(&adjacency)?;
        let variance = singular_value_variance(adjacency)?;

        let topology = Topology::from_graph(graph);
        let selection = select_curvature(mode, &self.capabilities, topology.edge_count());
        let curvature = self.average_curvature(selection.source, &topology)?;

        let weights = self.preset.effective_weights(weights);
        let scale = self.preset.curvature_scale(selection.source);

        Ok(ScoreResult {
            spectral_gap: gap,
            singular_value_variance: variance,
            curvature,
            score: composite_score(&weights, gap, variance, scale * curvature),
            curvature_source: selection.source,
            fallback: selection.fallback,
            preset: self.preset,
            curvature_scale: scale,
        })
    }

    #[instrument(level = "debug", skip_all, fields(%source))]
    fn average_curvature(
        &self,
        source: CurvatureSource,
        topology: &Topology,
    ) -> Result<f64, ScoreError> {
        match source {
            CurvatureSource::OllivierRicci => self.exact_curvature(topology),
            CurvatureSource::ClusteringProxy => ClusteringProxy.average_curvature(topology),
        }
    }

    #[cfg(feature = "exact-curvature")]
    fn exact_curvature(&self, topology: &Topology) -> Result<f64, ScoreError> {
        OllivierRicci::new(self.sinkhorn).average_curvature(topology)
    }

    // Capabilities never report exact curvature without the feature.
    #[cfg(not(feature = "exact-curvature"))]
    #[allow(clippy::unused_self)]
    fn exact_curvature(&self, topology: &Topology) -> Result<f64, ScoreError> {
        ClusteringProxy.average_curvature(topology)
    }
}
