//! Health check error types.

use thiserror::Error;

use cephwatch_query::QueryError;

/// Errors that can end a health check. All are terminal for the
/// invocation — no partial report is ever returned, and "check could
/// not complete" is distinct from "cluster is unhealthy".
#[derive(Debug, Error)]
pub enum HealthError {
    /// The status query exhausted every monitor.
    #[error("status query failed: {0}")]
    StatusQuery(#[source] QueryError),

    /// The status payload decoded but carries no usable OSD counters.
    #[error("status payload is missing osd counters")]
    MissingCounters,

    /// The counters showed degradation but the osd tree query failed.
    #[error("osd tree query failed: {0}")]
    TopologyQuery(#[source] QueryError),

    /// The osd tree payload did not match the expected node schema.
    #[error("osd tree payload did not decode: {0}")]
    MalformedTopology(#[from] serde_json::Error),
}
