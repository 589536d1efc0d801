//! Query error types.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Failure of one attempt against one monitor host.
///
/// Every variant causes fallthrough to the next host in the list; none
/// is surfaced to the caller on its own.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("could not reach {host}: {source}")]
    Unreachable {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("remote command failed on {host} (exit {code}): {stderr}")]
    RemoteFailure {
        host: String,
        code: i32,
        stderr: String,
    },

    #[error("malformed response from {host}: {source}")]
    Malformed {
        host: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("query to {host} timed out after {timeout:?}")]
    Timeout { host: String, timeout: Duration },
}

impl AttemptError {
    /// The host this attempt was made against.
    pub fn host(&self) -> &str {
        match self {
            AttemptError::Unreachable { host, .. }
            | AttemptError::RemoteFailure { host, .. }
            | AttemptError::Malformed { host, .. }
            | AttemptError::Timeout { host, .. } => host,
        }
    }
}

/// Terminal failure of a query invocation.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Caller error: the requested command is outside the whitelist.
    /// Raised before any host is contacted.
    #[error("command {0:?} is not allowed")]
    CommandNotAllowed(String),

    /// The configured monitor host list is empty.
    #[error("monitor host list is empty")]
    NoMonitors,

    /// Every monitor failed. Carries only the last host's error;
    /// earlier failures were logged as they happened and discarded.
    #[error("all monitors failed, last error: {0}")]
    AllMonitorsFailed(#[source] AttemptError),
}
