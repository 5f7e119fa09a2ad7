//! Structured error types for backend requests.
//!
//! These are designed to be displayable in both CLI and TUI contexts. The
//! dashboard renders each variant differently: validation and format errors
//! become inline panels, timeouts become status-bar warnings and never an
//! error panel.

use thiserror::Error;

/// Errors from the backend data clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("backend health check failed: {0}")]
    Unhealthy(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response format: {0}")]
    Format(String),

    #[error("request timed out after {0}s")]
    TimedOut(u64),
}

impl ApiError {
    /// Timeouts are discarded rather than rendered as error panels.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::TimedOut(_))
    }

    /// Validation errors are caught before any network I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::MissingParameter(_) | ApiError::InvalidDateRange(_)
        )
    }
}
