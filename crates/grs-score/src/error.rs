use std::fmt;

use grs_core::ErrorCode;

/// Which numeric solver failed to converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericStage {
    Eigen,
    SingularValues,
    /// Sinkhorn transport between the neighbour distributions of an edge.
    Transport,
}

impl fmt::Display for NumericStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eigen => f.write_str("eigen-decomposition"),
            Self::SingularValues => f.write_str("singular-value decomposition"),
            Self::Transport => f.write_str("optimal transport"),
        }
    }
}

/// Errors surfaced by the score engine and attack simulator.
///
/// Graphs with fewer than two nodes are a defined degenerate case (score 0),
/// never an error. A missing exact-curvature capability is reported through
/// [`crate::ScoreResult::fallback`], not here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    /// A solver hit its iteration limit or produced non-finite values.
    ///
    /// `dimension` is the adjacency order for the decompositions and the
    /// larger support size for transport.
    #[error("{stage} did not converge on a problem of dimension {dimension}")]
    NumericFailure {
        stage: NumericStage,
        dimension: usize,
    },

    /// A caller-supplied parameter is outside its accepted range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ScoreError {
    pub(crate) fn invalid(name: &'static str, value: impl fmt::Display, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NumericFailure { .. } => ErrorCode::NumericFailure,
            Self::InvalidParameter { .. } => ErrorCode::InvalidParameter,
        }
    }
}
