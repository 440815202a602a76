//! Curvature providers and the policy that chooses between them.
//!
//! # Overview
//!
//! Two providers implement [`CurvatureProvider`]:
//!
//! - **Ollivier–Ricci** (`ollivier`, feature `exact-curvature`): average
//!   edge curvature from optimal transport between neighbour distributions.
//!   Cost grows with edge count times the squared support size.
//! - **Clustering proxy** ([`ClusteringProxy`]): mean local clustering
//!   coefficient. Cheap, always available.
//!
//! # Selection
//!
//! Availability is captured once in [`CurvatureCapabilities`] and injected
//! into the engine. [`select_curvature`] turns a requested
//! [`CurvatureMode`] into a [`CurvatureSelection`]; whenever the exact
//! provider is requested but not used for a reason other than an edgeless
//! graph, the selection carries a [`FallbackReason`] so callers can show it.

#[cfg(feature = "exact-curvature")]
pub mod ollivier;
#[cfg(feature = "exact-curvature")]
pub mod sinkhorn;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::metrics::Topology;

/// Mass kept on the centre node of each neighbour distribution.
pub const IDLENESS: f64 = 0.5;

// ---------------------------------------------------------------------------
// Modes and sources
// ---------------------------------------------------------------------------

/// Curvature requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurvatureMode {
    /// Exact when available and worthwhile, proxy otherwise.
    #[default]
    Auto,
    /// Exact Ollivier–Ricci; falls back (visibly) when unavailable.
    Exact,
    /// Clustering-coefficient proxy.
    Proxy,
}

impl fmt::Display for CurvatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Exact => "exact",
            Self::Proxy => "proxy",
        })
    }
}

impl FromStr for CurvatureMode {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "exact" | "ollivier" | "ricci" => Ok(Self::Exact),
            "proxy" | "clustering" => Ok(Self::Proxy),
            _ => Err(ScoreError::invalid(
                "curvature",
                s,
                "expected one of: auto, exact, proxy",
            )),
        }
    }
}

/// Provider that actually produced a curvature value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurvatureSource {
    OllivierRicci,
    ClusteringProxy,
}

impl fmt::Display for CurvatureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OllivierRicci => "ollivier-ricci",
            Self::ClusteringProxy => "clustering-proxy",
        })
    }
}

/// Why the exact provider was requested but the proxy was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The exact provider is not compiled in (or disabled by capabilities).
    Unavailable,
    /// `Auto` mode and the graph has more edges than the configured limit.
    EdgeLimit,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unavailable => "exact curvature unavailable",
            Self::EdgeLimit => "edge count above exact-curvature limit",
        })
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Curvature capabilities, resolved once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurvatureCapabilities {
    exact: bool,
    exact_edge_limit: Option<usize>,
}

/// Status of a single capability for user-visible display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityStatus {
    pub name: &'static str,
    pub available: bool,
    pub fallback: &'static str,
}

impl Default for CurvatureCapabilities {
    fn default() -> Self {
        Self::detect()
    }
}

impl CurvatureCapabilities {
    /// Capabilities of this build: exact curvature iff the
    /// `exact-curvature` feature is compiled in. No edge limit.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            exact: cfg!(feature = "exact-curvature"),
            exact_edge_limit: None,
        }
    }

    /// Capabilities with the exact provider switched off.
    #[must_use]
    pub const fn proxy_only() -> Self {
        Self {
            exact: false,
            exact_edge_limit: None,
        }
    }

    /// Cap the edge count above which `Auto` prefers the proxy.
    #[must_use]
    pub const fn with_exact_edge_limit(mut self, limit: Option<usize>) -> Self {
        self.exact_edge_limit = limit;
        self
    }

    #[must_use]
    pub const fn exact_available(&self) -> bool {
        self.exact
    }

    #[must_use]
    pub const fn exact_edge_limit(&self) -> Option<usize> {
        self.exact_edge_limit
    }

    /// Describe capability status in a stable order.
    #[must_use]
    pub fn describe(&self) -> Vec<CapabilityStatus> {
        vec![
            CapabilityStatus {
                name: "ollivier_ricci",
                available: self.exact,
                fallback: "curvature uses the clustering-coefficient proxy and results are marked as fallback",
            },
            CapabilityStatus {
                name: "clustering_proxy",
                available: true,
                fallback: "always available",
            },
        ]
    }
}

// ---------------------------------------------------------------------------
// Selection policy
// ---------------------------------------------------------------------------

/// Outcome of [`select_curvature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurvatureSelection {
    pub source: CurvatureSource,
    pub fallback: Option<FallbackReason>,
}

impl CurvatureSelection {
    const fn proxy(fallback: Option<FallbackReason>) -> Self {
        Self {
            source: CurvatureSource::ClusteringProxy,
            fallback,
        }
    }
}

/// Resolve a requested mode against the session capabilities.
///
/// - `Proxy` always selects the proxy.
/// - Edgeless graphs select the proxy without a fallback marker.
/// - `Exact`/`Auto` without the exact capability fall back with
///   [`FallbackReason::Unavailable`].
/// - `Auto` above the edge limit falls back with [`FallbackReason::EdgeLimit`];
///   `Exact` ignores the limit.
#[must_use]
pub fn select_curvature(
    mode: CurvatureMode,
    caps: &CurvatureCapabilities,
    edge_count: usize,
) -> CurvatureSelection {
    if mode == CurvatureMode::Proxy || edge_count == 0 {
        return CurvatureSelection::proxy(None);
    }
    if !caps.exact {
        return CurvatureSelection::proxy(Some(FallbackReason::Unavailable));
    }
    if mode == CurvatureMode::Auto
        && caps.exact_edge_limit.is_some_and(|limit| edge_count > limit)
    {
        return CurvatureSelection::proxy(Some(FallbackReason::EdgeLimit));
    }
    CurvatureSelection {
        source: CurvatureSource::OllivierRicci,
        fallback: None,
    }
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// A global curvature signal computed from a graph's neighbourhoods.
pub trait CurvatureProvider {
    /// Which provider this is.
    fn source(&self) -> CurvatureSource;

    /// Curvature averaged over the graph.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::NumericFailure`] when an underlying solver does
    /// not converge.
    fn average_curvature(&self, topology: &Topology) -> Result<f64, ScoreError>;
}

/// Mean local clustering coefficient as a curvature proxy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusteringProxy;

impl CurvatureProvider for ClusteringProxy {
    fn source(&self) -> CurvatureSource {
        CurvatureSource::ClusteringProxy
    }

    fn average_curvature(&self, topology: &Topology) -> Result<f64, ScoreError> {
        Ok(topology.average_clustering())
    }
}

/// Entropic optimal-transport solver settings for the exact provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SinkhornConfig {
    /// Entropic regularisation strength.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Maximum number of Sinkhorn sweeps per edge, shared by all ε stages.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Stop when the L1 marginal error drops below this value.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for SinkhornConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

impl SinkhornConfig {
    /// Check that the solver settings can make progress.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidParameter`] for a non-positive or
    /// non-finite `epsilon`/`tolerance`, or zero iterations.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ScoreError::invalid(
                "sinkhorn.epsilon",
                self.epsilon,
                "must be finite and positive",
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ScoreError::invalid(
                "sinkhorn.tolerance",
                self.tolerance,
                "must be finite and positive",
            ));
        }
        if self.max_iterations == 0 {
            return Err(ScoreError::invalid(
                "sinkhorn.max_iterations",
                self.max_iterations,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

const fn default_epsilon() -> f64 {
    0.01
}

const fn default_max_iterations() -> usize {
    5_000
}

const fn default_tolerance() -> f64 {
    1e-9
}
