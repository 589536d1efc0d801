//! cephwatch-types — shared domain types for the cephwatch health reporter.
//!
//! Everything here is plain data: the monitor configuration loaded from
//! `cephwatch.toml`, the decoded shapes of the two read-only monitor
//! queries (`ceph status` and `ceph osd tree`), and the merged
//! `HealthReport` handed back to the caller. No I/O lives in this crate.

pub mod config;
pub mod types;

pub use config::{ConfigError, MonTarget, MonitorConfig, WatchConfig};
pub use types::{
    ClusterCounters, HealthReport, HostNode, OsdNode, TopologySnapshot, TreeNode, UnhealthyDevice,
    UNKNOWN_HOST,
};
