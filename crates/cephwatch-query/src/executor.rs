//! The failover query executor.
//!
//! Tries monitors strictly in configured order, one attempt per host,
//! each attempt bounded by the configured timeout. First decodable
//! response wins; when every host fails only the last error is kept.

use std::str::FromStr;

use tracing::{debug, warn};

use cephwatch_types::MonitorConfig;

use crate::error::{AttemptError, QueryError, QueryResult};
use crate::transport::Transport;

/// The closed set of allowed read-only monitor queries.
///
/// These are the only two command strings ever sent to a monitor. The
/// enum being closed is the whitelist inside the core; `from_str` is
/// the same whitelist at the boundary where untyped names enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonQuery {
    /// `ceph status` — aggregate cluster state and OSD counters.
    Status,
    /// `ceph osd tree` — full device topology.
    OsdTree,
}

impl MonQuery {
    /// The ceph subcommand for this query.
    pub fn command(self) -> &'static str {
        match self {
            MonQuery::Status => "status",
            MonQuery::OsdTree => "osd tree",
        }
    }

    /// The full remote command line, requesting JSON output.
    pub fn remote_command(self) -> String {
        format!("ceph {} --format=json", self.command())
    }
}

impl FromStr for MonQuery {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(MonQuery::Status),
            "osd tree" | "osd-tree" => Ok(MonQuery::OsdTree),
            other => Err(QueryError::CommandNotAllowed(other.to_string())),
        }
    }
}

/// Executes one query against an ordered monitor list.
pub struct QueryExecutor<T> {
    transport: T,
}

impl<T: Transport> QueryExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Run `query` against the configured monitors, first success wins.
    ///
    /// Attempts are strictly sequential in `config` host order, one
    /// try per host. A per-attempt failure (unreachable, non-zero
    /// exit, malformed JSON, timeout) falls through to the next host;
    /// exhaustion surfaces only the last host's error.
    pub async fn execute(
        &self,
        query: MonQuery,
        config: &MonitorConfig,
    ) -> QueryResult<serde_json::Value> {
        let command = query.remote_command();
        let timeout = config.attempt_timeout();
        let mut last_err = None;

        for target in config.targets() {
            debug!(monitor = %target, query = query.command(), "attempting monitor");

            let attempt = tokio::time::timeout(timeout, self.transport.run(&target, &command));
            let decoded = match attempt.await {
                Ok(Ok(raw)) => {
                    serde_json::from_slice(&raw).map_err(|source| AttemptError::Malformed {
                        host: target.host.clone(),
                        source,
                    })
                }
                Ok(Err(err)) => Err(err),
                Err(_) => Err(AttemptError::Timeout {
                    host: target.host.clone(),
                    timeout,
                }),
            };

            match decoded {
                Ok(payload) => {
                    debug!(monitor = %target, query = query.command(), "monitor answered");
                    return Ok(payload);
                }
                Err(err) => {
                    warn!(host = %target.host, error = %err, "monitor attempt failed");
                    last_err = Some(err);
                }
            }
        }

        match last_err {
            Some(err) => Err(QueryError::AllMonitorsFailed(err)),
            None => Err(QueryError::NoMonitors),
        }
    }
}
