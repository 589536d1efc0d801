//! Wire payload shapes and the caller-facing health report.
//!
//! `ceph status` and `ceph osd tree` are decoded from the
//! `--format=json` output of the monitors. The status payload is kept
//! as raw JSON (the report passes it through whole); only the OSD
//! counters are pulled out of it. The osd tree payload is decoded into
//! typed nodes.

use serde::{Deserialize, Serialize};

/// Sentinel host name for a device no host node claims.
pub const UNKNOWN_HOST: &str = "unknown";

// ── Cluster counters ───────────────────────────────────────────────

/// Aggregate OSD counters from the status payload.
///
/// Immutable once parsed; `degraded()` decides whether the osd tree
/// query is worth the second round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterCounters {
    /// Total OSDs known to the cluster.
    pub total: u64,
    /// OSDs reporting up.
    pub up: u64,
    /// OSDs in the data placement set.
    pub in_cluster: u64,
}

impl ClusterCounters {
    /// Extract the counters from a decoded `ceph status` payload.
    ///
    /// Jewel-era releases nest the counters under `osdmap.osdmap`;
    /// later releases flatten them under `osdmap`. Both are accepted.
    /// `up` reads `num_up_osds` and `in_cluster` reads `num_in_osds`.
    pub fn from_status(status: &serde_json::Value) -> Option<Self> {
        let osdmap = status.get("osdmap")?;
        let map = osdmap.get("osdmap").unwrap_or(osdmap);
        Some(Self {
            total: map.get("num_osds")?.as_u64()?,
            up: map.get("num_up_osds")?.as_u64()?,
            in_cluster: map.get("num_in_osds")?.as_u64()?,
        })
    }

    /// True when at least one OSD is down or out.
    pub fn degraded(&self) -> bool {
        self.up < self.total || self.in_cluster < self.total
    }
}

// ── OSD tree ───────────────────────────────────────────────────────

/// Decoded `ceph osd tree` payload.
///
/// Node order comes from the monitor and is preserved; the detector
/// relies on it for first-occurrence semantics.
#[derive(Debug, Clone, Deserialize)]
pub struct TopologySnapshot {
    pub nodes: Vec<TreeNode>,
}

/// One node of the osd tree.
///
/// The tree also contains `root`, `rack`, and other bucket types; only
/// hosts and OSDs matter here, the rest decode to `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Host(HostNode),
    Osd(OsdNode),
    #[serde(other)]
    Other,
}

/// A host bucket: name and the ids of the OSDs attached to it.
#[derive(Debug, Clone, Deserialize)]
pub struct HostNode {
    pub name: String,
    #[serde(default)]
    pub children: Vec<i64>,
}

/// An OSD leaf node.
#[derive(Debug, Clone, Deserialize)]
pub struct OsdNode {
    pub id: i64,
    pub name: String,
    /// DNE flag: an OSD removed from the tree keeps a tombstone entry
    /// with `exists` cleared. Monitors emit it as 0/1.
    #[serde(deserialize_with = "flag")]
    pub exists: bool,
    pub status: String,
}

/// Accept the `exists` flag as either a JSON integer or a bool.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}

// ── Report ─────────────────────────────────────────────────────────

/// One unhealthy OSD finding.
///
/// Two records are equal iff all three fields are equal; the detector
/// dedups on that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnhealthyDevice {
    pub name: String,
    pub status: String,
    pub host: String,
}

/// The merged health report handed to the caller.
///
/// Serializes as the full status payload with an added `details` array
/// when the cluster is degraded; on the healthy path `details` is
/// absent entirely.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Full decoded `ceph status` payload, flattened into the report.
    #[serde(flatten)]
    pub status: serde_json::Value,
    /// Unhealthy OSDs found in the osd tree, present only when the
    /// counters showed degradation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<UnhealthyDevice>>,
}
