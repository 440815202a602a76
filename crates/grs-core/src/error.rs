use std::fmt;
use std::io;
use std::path::PathBuf;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EdgeListUnreadable,
    EdgeListMalformed,
    ConfigParseError,
    InvalidGenerator,
    InvalidParameter,
    NumericFailure,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EdgeListUnreadable => "E1001",
            Self::EdgeListMalformed => "E1002",
            Self::ConfigParseError => "E1003",
            Self::InvalidGenerator => "E2001",
            Self::InvalidParameter => "E2002",
            Self::NumericFailure => "E3001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::EdgeListUnreadable => "Edge list could not be read",
            Self::EdgeListMalformed => "Edge list is malformed",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidGenerator => "Invalid sample graph parameters",
            Self::InvalidParameter => "Invalid parameter",
            Self::NumericFailure => "Numeric solver did not converge",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::EdgeListUnreadable => Some("Check that the file exists and is readable."),
            Self::EdgeListMalformed => {
                Some("Use two columns per line (source,target); pass --tokens for non-integer labels.")
            }
            Self::ConfigParseError => Some("Fix syntax in grs.toml and retry."),
            Self::InvalidGenerator => Some("Check node counts and probabilities for the sample kind."),
            Self::InvalidParameter => Some("Attack fractions must lie in (0, 1]; weights must be finite."),
            Self::NumericFailure => {
                Some("Retry with --curvature proxy, or raise [sinkhorn] max_iterations for exact curvature.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while building, reading or generating graphs.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The edge-list file could not be opened or read.
    #[error("failed to read edge list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line of the edge list could not be parsed.
    #[error("edge list line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A sample generator was called with parameters it cannot satisfy.
    #[error("invalid generator parameters: {0}")]
    InvalidGenerator(String),
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::EdgeListUnreadable,
            Self::Parse { .. } => ErrorCode::EdgeListMalformed,
            Self::InvalidGenerator(_) => ErrorCode::InvalidGenerator,
        }
    }
}
