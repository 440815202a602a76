#![forbid(unsafe_code)]
//! grs-score library.
//!
//! Robustness score `C(G) = w1·gap − w2·var + w3·κ` over [`grs_core::Graph`],
//! edge-removal attacks and degradation sweeps.
//!
//! # Conventions
//!
//! - **Errors**: Library errors are [`ScoreError`]; graphs with fewer than two
//!   nodes are a defined degenerate case, not an error.
//! - **Logging**: The engine only opens `debug` spans via
//!   `#[instrument]`; it never emits events. Subscribers belong to the binary.
//! - **Randomness**: Attacks take an injected [`rand::Rng`]; a fixed seed
//!   reproduces the same attack.

pub mod attack;
pub mod curvature;
pub mod error;
pub mod metrics;
pub mod score;

pub use attack::{
    AttackResult, AttackStrategy, DEFAULT_ATTACK_FRACTION, DegradationCurve, SweepConfig,
    SweepPoint, apply_attack, remove_count, sweep,
};
pub use curvature::{
    CapabilityStatus, CurvatureCapabilities, CurvatureMode, CurvatureSelection, CurvatureSource,
    FallbackReason, SinkhornConfig, select_curvature,
};
pub use error::{NumericStage, ScoreError};
pub use score::{ScoreEngine, ScoreResult, ScoringPreset, Weights};
