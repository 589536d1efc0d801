//! The health checker — orchestrates the two monitor queries.

use tracing::{debug, info};

use cephwatch_query::{MonQuery, QueryExecutor, Transport};
use cephwatch_types::{ClusterCounters, HealthReport, MonitorConfig, TopologySnapshot};

use crate::detect::unhealthy_devices;
use crate::error::HealthError;

/// Runs one full health check against a cluster.
pub struct HealthChecker<T> {
    executor: QueryExecutor<T>,
}

impl<T: Transport> HealthChecker<T> {
    pub fn new(transport: T) -> Self {
        Self {
            executor: QueryExecutor::new(transport),
        }
    }

    /// Run one health check.
    ///
    /// The status query always runs first and its failure is fatal.
    /// The osd tree query runs only when the counters show degradation
    /// — the healthy path costs a single round-trip.
    pub async fn check(&self, config: &MonitorConfig) -> Result<HealthReport, HealthError> {
        let status = self
            .executor
            .execute(MonQuery::Status, config)
            .await
            .map_err(HealthError::StatusQuery)?;

        let counters =
            ClusterCounters::from_status(&status).ok_or(HealthError::MissingCounters)?;

        if !counters.degraded() {
            debug!(
                total = counters.total,
                up = counters.up,
                in_cluster = counters.in_cluster,
                "all osds up and in, skipping osd tree query"
            );
            return Ok(HealthReport {
                status,
                details: None,
            });
        }

        info!(
            total = counters.total,
            up = counters.up,
            in_cluster = counters.in_cluster,
            "cluster degraded, fetching osd tree"
        );

        let tree = self
            .executor
            .execute(MonQuery::OsdTree, config)
            .await
            .map_err(HealthError::TopologyQuery)?;
        let snapshot: TopologySnapshot = serde_json::from_value(tree)?;

        let details = unhealthy_devices(&snapshot);
        info!(unhealthy = details.len(), "osd tree reconciled");

        Ok(HealthReport {
            status,
            details: Some(details),
        })
    }
}
