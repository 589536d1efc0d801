//! Unhealthy-OSD detection over an osd tree snapshot.

use std::collections::HashMap;

use cephwatch_types::{TopologySnapshot, TreeNode, UnhealthyDevice, UNKNOWN_HOST};

/// Lookup from OSD id to owning host name, built once per snapshot.
///
/// An OSD can appear under more than one host bucket (multi-path or
/// shared-bus attachment); the first host in snapshot order wins, so
/// repeated lookups against the same snapshot are stable.
pub struct HostIndex {
    owners: HashMap<i64, String>,
}

impl HostIndex {
    /// Index the host buckets of a snapshot.
    pub fn new(snapshot: &TopologySnapshot) -> Self {
        let mut owners = HashMap::new();
        for node in &snapshot.nodes {
            if let TreeNode::Host(host) = node {
                for child in &host.children {
                    owners.entry(*child).or_insert_with(|| host.name.clone());
                }
            }
        }
        Self { owners }
    }

    /// The owning host for an OSD id, or `"unknown"` if no host bucket
    /// claims it.
    pub fn host_for(&self, id: i64) -> &str {
        self.owners
            .get(&id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_HOST)
    }
}

/// Collect the unhealthy OSDs of a snapshot, in first-occurrence order.
///
/// An OSD is unhealthy when its status is exactly `down` or `out`.
/// Tombstone entries (`exists` cleared) are skipped regardless of
/// status. Duplicate findings — same name, status, and host — are
/// emitted once.
pub fn unhealthy_devices(snapshot: &TopologySnapshot) -> Vec<UnhealthyDevice> {
    let index = HostIndex::new(snapshot);
    let mut found: Vec<UnhealthyDevice> = Vec::new();

    for node in &snapshot.nodes {
        let TreeNode::Osd(osd) = node else { continue };
        if !osd.exists {
            continue;
        }
        if osd.status != "down" && osd.status != "out" {
            continue;
        }

        let entry = UnhealthyDevice {
            name: osd.name.clone(),
            status: osd.status.clone(),
            host: index.host_for(osd.id).to_string(),
        };
        if !found.contains(&entry) {
            found.push(entry);
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(nodes: serde_json::Value) -> TopologySnapshot {
        serde_json::from_value(json!({ "nodes": nodes })).unwrap()
    }

    #[test]
    fn host_lookup_is_stable() {
        let snap = snapshot(json!([
            {"id": -2, "name": "osd-host-1", "type": "host", "children": [0, 1]},
            {"id": 0, "name": "osd.0", "type": "osd", "exists": 1, "status": "up"}
        ]));
        let index = HostIndex::new(&snap);
        assert_eq!(index.host_for(0), "osd-host-1");
        assert_eq!(index.host_for(0), "osd-host-1");
        assert_eq!(index.host_for(99), "unknown");
    }

    #[test]
    fn first_host_wins_on_overlap() {
        let snap = snapshot(json!([
            {"id": -2, "name": "osd-host-a", "type": "host", "children": [5]},
            {"id": -3, "name": "osd-host-b", "type": "host", "children": [5]}
        ]));
        let index = HostIndex::new(&snap);
        assert_eq!(index.host_for(5), "osd-host-a");
    }

    #[test]
    fn down_and_out_are_flagged() {
        let snap = snapshot(json!([
            {"id": -2, "name": "osd-host-1", "type": "host", "children": [0, 1, 2]},
            {"id": 0, "name": "osd.0", "type": "osd", "exists": 1, "status": "down"},
            {"id": 1, "name": "osd.1", "type": "osd", "exists": 1, "status": "out"},
            {"id": 2, "name": "osd.2", "type": "osd", "exists": 1, "status": "up"}
        ]));
        let found = unhealthy_devices(&snap);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "osd.0");
        assert_eq!(found[0].status, "down");
        assert_eq!(found[1].name, "osd.1");
        assert_eq!(found[1].status, "out");
    }

    #[test]
    fn other_statuses_are_not_flagged() {
        let snap = snapshot(json!([
            {"id": 0, "name": "osd.0", "type": "osd", "exists": 1, "status": "destroyed"},
            {"id": 1, "name": "osd.1", "type": "osd", "exists": 1, "status": "up"}
        ]));
        assert!(unhealthy_devices(&snap).is_empty());
    }

    #[test]
    fn tombstones_are_skipped() {
        let snap = snapshot(json!([
            {"id": -2, "name": "osd-host-1", "type": "host", "children": [0]},
            {"id": 0, "name": "osd.0", "type": "osd", "exists": 0, "status": "down"}
        ]));
        assert!(unhealthy_devices(&snap).is_empty());
    }

    #[test]
    fn duplicate_findings_emitted_once() {
        // osd.5 hangs under two host buckets; its node appears twice in
        // the flattened tree but resolves to the first host both times.
        let snap = snapshot(json!([
            {"id": -2, "name": "osd-host-a", "type": "host", "children": [5]},
            {"id": -3, "name": "osd-host-b", "type": "host", "children": [5]},
            {"id": 5, "name": "osd.5", "type": "osd", "exists": 1, "status": "down"},
            {"id": 5, "name": "osd.5", "type": "osd", "exists": 1, "status": "down"}
        ]));
        let found = unhealthy_devices(&snap);
        assert_eq!(
            found,
            vec![UnhealthyDevice {
                name: "osd.5".to_string(),
                status: "down".to_string(),
                host: "osd-host-a".to_string(),
            }]
        );
    }

    #[test]
    fn unowned_osd_reports_unknown_host() {
        let snap = snapshot(json!([
            {"id": 7, "name": "osd.7", "type": "osd", "exists": 1, "status": "down"}
        ]));
        let found = unhealthy_devices(&snap);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].host, "unknown");
    }

    #[test]
    fn snapshot_order_is_preserved() {
        let snap = snapshot(json!([
            {"id": -2, "name": "h1", "type": "host", "children": [0, 1]},
            {"id": 1, "name": "osd.1", "type": "osd", "exists": 1, "status": "out"},
            {"id": 0, "name": "osd.0", "type": "osd", "exists": 1, "status": "down"}
        ]));
        let found = unhealthy_devices(&snap);
        let names: Vec<&str> = found.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["osd.1", "osd.0"]);
    }
}
