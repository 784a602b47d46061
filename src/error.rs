//! Error types for the hub location solver.

use thiserror::Error;

/// Errors raised while loading an instance or setting up a search.
///
/// Neighborhood moves never produce errors: a move whose preconditions are
/// not met returns the incumbent unchanged.
#[derive(Debug, Error)]
pub enum HubError {
    /// The instance cannot be searched (zero nodes, negative scale factor, ...)
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// A vector or matrix row does not match the declared instance size
    #[error("{what} should have {expected} values, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A token in the instance file is not a number
    #[error("line {line}: cannot parse `{token}` as a number")]
    Parse { line: usize, token: String },

    /// The instance file ended before all sections were read
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// Rejected solver configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A supplied solution violates the hub/assignment invariants
    #[error("invalid solution: {0}")]
    InvalidSolution(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, HubError>;
