//! Domain-specific errors.

use thiserror::Error;

/// Raised for malformed invocations only. Lookups that simply find nothing are
/// reported as `None` or an empty result instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl DomainError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        DomainError::InvalidInput(message.into())
    }
}
