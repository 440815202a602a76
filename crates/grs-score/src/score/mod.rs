//! Composite robustness score.
//!
//! - **Composite** (`composite`): weights, presets and the combination formula.
//! - **Engine** (`engine`): computes the components for a graph and combines
//!   them.

pub mod composite;
pub mod engine;

pub use composite::{LEGACY_CURVATURE_SCALE, ScoringPreset, Weights, composite_score};
pub use engine::{ScoreEngine, ScoreResult};
