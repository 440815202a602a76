//! Entropic optimal transport via log-domain Sinkhorn iterations.
//!
//! # Algorithm
//!
//! For source marginal `a`, target marginal `b`, cost `C` and regularisation
//! `ε`, alternate the dual potential updates
//!
//! ```text
//! f_i = ε·ln a_i − ε·LSE_j((g_j − C_ij)/ε)
//! g_j = ε·ln b_j − ε·LSE_i((f_i − C_ij)/ε)
//! ```
//!
//! After each `g` update the column marginals are exact, so convergence is
//! measured as the L1 error of the row marginals of
//! `P_ij = exp((f_i + g_j − C_ij)/ε)`. Working with potentials instead of
//! scaling vectors keeps `exp(−C/ε)` from underflowing for small `ε`.
//!
//! The reported cost is the transport cost `⟨P, C⟩` without the entropy term.
//!
//! ## ε-scaling
//!
//! Small `ε` keeps the entropic bias on `⟨P, C⟩` negligible but makes cold
//! iterations slow. The solver therefore starts at `ε = max C` and divides by
//! [`EPSILON_DECAY`] until it reaches the configured value, carrying the
//! potentials from stage to stage. Intermediate stages stop at
//! [`STAGE_TOLERANCE`]; only the final stage has to meet the configured
//! tolerance. All stages share one iteration budget.

use nalgebra::DMatrix;

use super::SinkhornConfig;

/// Factor between consecutive regularisation stages.
const EPSILON_DECAY: f64 = 4.0;

/// Marginal error at which an intermediate stage hands over to the next.
const STAGE_TOLERANCE: f64 = 1e-3;

/// Result of a Sinkhorn solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportPlan {
    /// Transport cost `⟨P, C⟩` of the regularised plan.
    pub cost: f64,
    /// Number of sweeps performed across all stages.
    pub iterations: usize,
    /// Whether the final stage met the configured tolerance.
    pub converged: bool,
}

/// Solve the regularised transport problem between `source` and `target`.
///
/// `cost` must be `source.len() × target.len()`. Both marginals are expected
/// to be strictly positive and sum to the same total. A plan that used up
/// `max_iterations` is returned with `converged = false`; callers decide
/// whether that is an error.
#[must_use]
pub fn sinkhorn(
    source: &[f64],
    target: &[f64],
    cost: &DMatrix<f64>,
    config: &SinkhornConfig,
) -> TransportPlan {
    let (m, k) = (source.len(), target.len());
    debug_assert_eq!(cost.shape(), (m, k));
    if m == 0 || k == 0 {
        return TransportPlan {
            cost: 0.0,
            iterations: 0,
            converged: true,
        };
    }

    let mut solver = Solver {
        log_a: source.iter().map(|a| a.ln()).collect(),
        log_b: target.iter().map(|b| b.ln()).collect(),
        source,
        cost,
        f: vec![0.0; m],
        g: vec![0.0; k],
        scratch: Vec::with_capacity(m.max(k)),
    };

    let max_cost = cost.iter().copied().fold(0.0, f64::max);
    let schedule = epsilon_schedule(max_cost, config.epsilon);
    let last_stage = schedule.len() - 1;

    let mut iterations = 0;
    let mut converged = false;

    'stages: for (stage, &eps) in schedule.iter().enumerate() {
        let tolerance = if stage == last_stage {
            config.tolerance
        } else {
            config.tolerance.max(STAGE_TOLERANCE)
        };
        loop {
            if iterations == config.max_iterations {
                break 'stages;
            }
            iterations += 1;
            solver.sweep(eps);
            if solver.row_error(eps) < tolerance {
                converged = stage == last_stage;
                break;
            }
        }
    }

    let eps = config.epsilon;
    let mut total = 0.0;
    for i in 0..m {
        for j in 0..k {
            let c = cost[(i, j)];
            if c != 0.0 {
                total += ((solver.f[i] + solver.g[j] - c) / eps).exp() * c;
            }
        }
    }

    TransportPlan {
        cost: total,
        iterations,
        converged,
    }
}

/// Dual potentials and the fixed inputs of one solve.
struct Solver<'a> {
    log_a: Vec<f64>,
    log_b: Vec<f64>,
    source: &'a [f64],
    cost: &'a DMatrix<f64>,
    f: Vec<f64>,
    g: Vec<f64>,
    scratch: Vec<f64>,
}

impl Solver<'_> {
    fn sweep(&mut self, eps: f64) {
        let (m, k) = (self.f.len(), self.g.len());
        for i in 0..m {
            self.scratch.clear();
            self.scratch
                .extend((0..k).map(|j| (self.g[j] - self.cost[(i, j)]) / eps));
            self.f[i] = eps * (self.log_a[i] - log_sum_exp(&self.scratch));
        }
        for j in 0..k {
            self.scratch.clear();
            self.scratch
                .extend((0..m).map(|i| (self.f[i] - self.cost[(i, j)]) / eps));
            self.g[j] = eps * (self.log_b[j] - log_sum_exp(&self.scratch));
        }
    }

    /// L1 error of the row marginals; columns are exact after a sweep.
    fn row_error(&self, eps: f64) -> f64 {
        (0..self.f.len())
            .map(|i| {
                let row: f64 = (0..self.g.len())
                    .map(|j| ((self.f[i] + self.g[j] - self.cost[(i, j)]) / eps).exp())
                    .sum();
                (row - self.source[i]).abs()
            })
            .sum()
    }
}

/// Decreasing regularisation values ending exactly at `target`.
fn epsilon_schedule(max_cost: f64, target: f64) -> Vec<f64> {
    let mut schedule = Vec::new();
    let mut eps = max_cost;
    while eps > target * EPSILON_DECAY {
        schedule.push(eps);
        eps /= EPSILON_DECAY;
    }
    schedule.push(target);
    schedule
}

fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}
