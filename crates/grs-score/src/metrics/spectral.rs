//! Spectral signals of the adjacency matrix.
//!
//! # Overview
//!
//! - **Spectral gap**: `λ₁ − λ₂` of the adjacency spectrum, sorted descending.
//! - **Singular-value variance**: population variance of the singular values.
//!
//! The adjacency matrix is real symmetric by construction, so the symmetric
//! eigen-solver is used and its eigenvalues are real; no complex rounding
//! has to be stripped. Both solvers run with a bounded iteration count and
//! report [`ScoreError::NumericFailure`] instead of spinning forever.

use grs_core::{Graph, NodeLabel};
use nalgebra::{DMatrix, SymmetricEigen};
use tracing::instrument;

use crate::error::{NumericStage, ScoreError};

/// Minimum QR sweep budget for either solver.
const MIN_SOLVER_ITERATIONS: usize = 1_000;

/// Additional sweep budget per matrix row.
const SOLVER_ITERATIONS_PER_ROW: usize = 30;

/// Build the `|V|×|V|` 0/1 adjacency matrix in node insertion order.
///
/// A self-loop sets its diagonal entry to `1`.
#[must_use]
pub fn adjacency_matrix<N: NodeLabel>(graph: &Graph<N>) -> DMatrix<f64> {
    let n = graph.node_count();
    let mut adjacency = DMatrix::zeros(n, n);
    for edge in graph.edges() {
        adjacency[(edge.source, edge.target)] = 1.0;
        adjacency[(edge.target, edge.source)] = 1.0;
    }
    adjacency
}

/// Difference between the two largest eigenvalues.
///
/// A 1×1 matrix yields its only eigenvalue; an empty matrix yields `0`.
/// Repeated top eigenvalues give a gap of `0`.
///
/// # Errors
///
/// Returns [`ScoreError::NumericFailure`] if the eigen-solver does not
/// converge or produces non-finite values.
#[instrument(level = "debug", skip_all, fields(dimension = adjacency.nrows()))]
pub fn spectral_gap(adjacency: &DMatrix<f64>) -> Result<f64, ScoreError> {
    let mut eigenvalues = eigenvalues(adjacency)?;
    eigenvalues.sort_by(|a, b| b.total_cmp(a));

    Ok(match eigenvalues.as_slice() {
        [first, second, ..] => first - second,
        [only] => *only,
        [] => 0.0,
    })
}

/// All eigenvalues of a symmetric matrix, unordered.
///
/// # Errors
///
/// Returns [`ScoreError::NumericFailure`] on non-convergence.
pub fn eigenvalues(adjacency: &DMatrix<f64>) -> Result<Vec<f64>, ScoreError> {
    let dimension = adjacency.nrows();
    if dimension == 0 {
        return Ok(Vec::new());
    }

    let failure = ScoreError::NumericFailure {
        stage: NumericStage::Eigen,
        dimension,
    };
    let eigen = SymmetricEigen::try_new(
        adjacency.clone(),
        f64::EPSILON,
        iteration_budget(dimension),
    )
    .ok_or_else(|| failure.clone())?;

    let values: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    if values.iter().all(|v| v.is_finite()) {
        Ok(values)
    } else {
        Err(failure)
    }
}

/// Singular values of the matrix, without the orthogonal factors.
///
/// # Errors
///
/// Returns [`ScoreError::NumericFailure`] on non-convergence.
pub fn singular_values(adjacency: DMatrix<f64>) -> Result<Vec<f64>, ScoreError> {
    let dimension = adjacency.nrows();
    if dimension == 0 {
        return Ok(Vec::new());
    }

    let failure = ScoreError::NumericFailure {
        stage: NumericStage::SingularValues,
        dimension,
    };
    let svd = adjacency
        .try_svd(false, false, f64::EPSILON, iteration_budget(dimension))
        .ok_or_else(|| failure.clone())?;

    let values: Vec<f64> = svd.singular_values.iter().copied().collect();
    if values.iter().all(|v| v.is_finite()) {
        Ok(values)
    } else {
        Err(failure)
    }
}

/// Population variance (divide by `n`) of the singular values.
///
/// # Errors
///
/// Returns [`ScoreError::NumericFailure`] on non-convergence.
#[instrument(level = "debug", skip_all, fields(dimension = adjacency.nrows()))]
pub fn singular_value_variance(adjacency: DMatrix<f64>) -> Result<f64, ScoreError> {
    Ok(population_variance(&singular_values(adjacency)?))
}

/// Population variance of a sample; `0` for an empty slice.
#[must_use]
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

fn iteration_budget(dimension: usize) -> usize {
    MIN_SOLVER_ITERATIONS.max(SOLVER_ITERATIONS_PER_ROW.saturating_mul(dimension))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
