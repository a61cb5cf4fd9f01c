//! Error types for PACO construction.
//!
//! Two failure classes exist:
//! - [`PacoError::InvalidArgument`]: bad configuration or input, detected
//!   before any state is touched.
//! - [`PacoError::InvalidState`]: an internal invariant was broken (edge
//!   count overflow/underflow, candidate set misuse). These indicate a bug
//!   in population bookkeeping and are never retried.
//!
//! Structurally invalid moves (e.g. a job operation appended out of order)
//! are not errors. Adapters report them as an infinite cost and the model
//! excludes them from selection.

use thiserror::Error;

/// Errors raised by the PACO engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacoError {
    /// Bad configuration or input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Internal invariant violation.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl PacoError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PacoError>;
