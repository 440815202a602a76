//! Degradation sweeps: score a graph under increasingly severe attacks.

use grs_core::{Graph, NodeLabel};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{AttackStrategy, apply_attack, validate_fraction};
use crate::curvature::CurvatureMode;
use crate::error::ScoreError;
use crate::score::{ScoreEngine, ScoreResult, Weights};

/// Shape of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Number of evenly spaced fractions in `(0, max_fraction]`.
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Attacks per fraction. Hub-targeted attacks are deterministic and run
    /// once regardless.
    #[serde(default = "default_trials")]
    pub trials: usize,
    #[serde(default)]
    pub strategy: AttackStrategy,
    #[serde(default = "default_max_fraction")]
    pub max_fraction: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            trials: default_trials(),
            strategy: AttackStrategy::default(),
            max_fraction: default_max_fraction(),
        }
    }
}

impl SweepConfig {
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidParameter`] for zero steps or trials, or
    /// a `max_fraction` outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.steps == 0 {
            return Err(ScoreError::invalid("steps", self.steps, "must be at least 1"));
        }
        if self.trials == 0 {
            return Err(ScoreError::invalid("trials", self.trials, "must be at least 1"));
        }
        validate_fraction(self.max_fraction)
    }

    /// The attack fractions, ascending.
    #[must_use]
    pub fn fractions(&self) -> Vec<f64> {
        #[allow(clippy::cast_precision_loss)]
        let steps = self.steps as f64;
        (1..=self.steps)
            .map(|step| {
                #[allow(clippy::cast_precision_loss)]
                let step = step as f64;
                self.max_fraction * step / steps
            })
            .collect()
    }

    const fn effective_trials(&self) -> usize {
        match self.strategy {
            AttackStrategy::Random => self.trials,
            AttackStrategy::HubTargeted => 1,
        }
    }
}

const fn default_steps() -> usize {
    5
}

const fn default_trials() -> usize {
    3
}

const fn default_max_fraction() -> f64 {
    0.5
}

/// Aggregated scores at one attack fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub fraction: f64,
    pub trials: usize,
    pub mean_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub mean_removed: f64,
}

/// Baseline score plus one point per fraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegradationCurve {
    pub strategy: AttackStrategy,
    pub baseline: ScoreResult,
    pub points: Vec<SweepPoint>,
}

/// Attack `graph` at every fraction of `config` and score each variant.
///
/// # Errors
///
/// Propagates invalid configuration and any scoring failure.
#[instrument(
    level = "debug",
    skip(engine, graph, weights, rng),
    fields(nodes = graph.node_count(), edges = graph.edge_count())
)]
pub fn sweep<N, R>(
    engine: &ScoreEngine,
    graph: &Graph<N>,
    weights: &Weights,
    mode: CurvatureMode,
    config: &SweepConfig,
    rng: &mut R,
) -> Result<DegradationCurve, ScoreError>
where
    N: NodeLabel,
    R: Rng + ?Sized,
{
    config.validate()?;
    let baseline = engine.compute_score(graph, weights, mode)?;
    let trials = config.effective_trials();

    let mut points = Vec::with_capacity(config.steps);
    for fraction in config.fractions() {
        let mut scores = Vec::with_capacity(trials);
        let mut removed = 0usize;
        for _ in 0..trials {
            let attack = apply_attack(graph, fraction, config.strategy, rng)?;
            removed += attack.removed;
            scores.push(engine.compute_score(&attack.graph, weights, mode)?.score);
        }

        #[allow(clippy::cast_precision_loss)]
        let n = trials as f64;
        #[allow(clippy::cast_precision_loss)]
        let mean_removed = removed as f64 / n;
        points.push(SweepPoint {
            fraction,
            trials,
            mean_score: scores.iter().sum::<f64>() / n,
            min_score: scores.iter().copied().fold(f64::INFINITY, f64::min),
            max_score: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_removed,
        });
    }

    Ok(DegradationCurve {
        strategy: config.strategy,
        baseline,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curvature::CurvatureCapabilities;
    use grs_core::generate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn engine() -> ScoreEngine {
        ScoreEngine::new(CurvatureCapabilities::proxy_only())
    }

    #[test]
    fn fractions_are_evenly_spaced() {
        let config = SweepConfig {
            steps: 4,
            max_fraction: 1.0,
            ..SweepConfig::default()
        };
        let fractions = config.fractions();
        assert_eq!(fractions.len(), 4);
        assert!((fractions[0] - 0.25).abs() < 1e-12);
        assert!((fractions[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_steps_is_invalid() {
        let config = SweepConfig {
            steps: 0,
            ..SweepConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let err = sweep(
            &engine(),
            &generate::complete(4),
            &Weights::default(),
            CurvatureMode::Proxy,
            &config,
            &mut rng,
        )
        .expect_err("zero steps");
        assert!(matches!(err, ScoreError::InvalidParameter { name: "steps", .. }));
    }

    #[test]
    fn hub_sweep_runs_single_trial() {
        let config = SweepConfig {
            steps: 2,
            trials: 5,
            strategy: AttackStrategy::HubTargeted,
            max_fraction: 0.5,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let curve = sweep(
            &engine(),
            &generate::double_star(3, 3),
            &Weights::default(),
            CurvatureMode::Proxy,
            &config,
            &mut rng,
        )
        .expect("sweep");
        assert_eq!(curve.points.len(), 2);
        for point in &curve.points {
            assert_eq!(point.trials, 1);
            assert_eq!(point.min_score, point.max_score);
        }
    }

    #[test]
    fn full_removal_ends_at_edgeless_score() {
        let config = SweepConfig {
            steps: 1,
            trials: 2,
            strategy: AttackStrategy::Random,
            max_fraction: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(9);
        let curve = sweep(
            &engine(),
            &generate::cycle(6),
            &Weights::default(),
            CurvatureMode::Proxy,
            &config,
            &mut rng,
        )
        .expect("sweep");
        let last = curve.points[0];
        assert!((last.mean_removed - 6.0).abs() < 1e-12);
        assert!(last.mean_score.abs() < 1e-9);
        assert!(curve.baseline.score > last.mean_score);
    }
}
