// Error types for the EaaS end-to-end suite

use std::time::Duration;
use thiserror::Error;

/// Result type alias for suite operations
pub type Result<T> = std::result::Result<T, E2eError>;

/// Errors raised while driving a scenario.
///
/// Anything returned as an `Err` is a hard failure of the scenario it occurred
/// in. Optional-element absence is never an error: probes report it through
/// [`Probe::Absent`](crate::locate::Probe::Absent) instead.
#[derive(Debug, Error)]
pub enum E2eError {
    /// Error reported by the browser automation layer
    ///
    /// Covers protocol failures, closed targets and Playwright's own
    /// timeouts on mandatory actions (click, fill, goto).
    #[error("Browser error: {0}")]
    Browser(#[from] playwright_rs::Error),

    /// A mandatory condition did not materialize within its bound
    #[error("Timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    /// A scenario-level expectation did not hold
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Invalid suite configuration (environment or builder input)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error (results directory, screenshots, downloads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while decoding an in-page evaluation result
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Route or base URL could not be parsed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<E2eError>),
}

impl E2eError {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        E2eError::Context(msg.into(), Box::new(self))
    }

    /// Builds a timeout error for `what`
    pub fn timeout(what: impl Into<String>, after: Duration) -> Self {
        E2eError::Timeout {
            what: what.into(),
            after,
        }
    }

    /// Returns true if this error (or the error it wraps) is a bounded-wait timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            E2eError::Timeout { .. } => true,
            E2eError::Browser(playwright_rs::Error::Timeout(_))
            | E2eError::Browser(playwright_rs::Error::AssertionTimeout(_)) => true,
            E2eError::Context(_, inner) => inner.is_timeout(),
            _ => false,
        }
    }
}
