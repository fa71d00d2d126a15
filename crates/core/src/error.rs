//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, client-caused failures (malformed input,
/// broken invariants, missing records). Storage failures belong to the store
/// adapters and are reported separately.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A date string did not match `MM-YYYY`.
    #[error("parse error: {0}")]
    Parse(String),

    /// The start month is after the end month.
    #[error("start date is later than end date")]
    InvalidDateRange,

    /// The request carried no usable payload (all-default body, missing query parameter).
    #[error("request is empty: {0}")]
    EmptyRequest(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The requested record does not exist.
    #[error("not found")]
    NotFound,

    /// The HTTP method is not supported on the path.
    #[error("method not allowed")]
    MethodNotAllowed,
}

impl DomainError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn empty_request(msg: impl Into<String>) -> Self {
        Self::EmptyRequest(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
