//! HealthSnapshot - a point-in-time read of cluster health counters.

use std::collections::BTreeMap;

use crate::OverallHealth;

/// A point-in-time snapshot of cluster health and performance counters.
///
/// Every field is always present. Values missing from the health endpoint
/// decode as zero (or an empty map), so downstream math never has to
/// special-case absent data.
///
/// With the `serde` feature the snapshot decodes from, and encodes to, the
/// health endpoint's JSON shape:
///
/// ```json
/// {
///   "health": { "status": "HEALTH_OK" },
///   "client_perf": { "read_op_per_sec": 80, "write_op_per_sec": 20,
///                    "read_bytes_sec": 4096, "write_bytes_sec": 1024 },
///   "df": { "stats": { "total_bytes": 1000, "total_used_raw_bytes": 250 } },
///   "pg_info": {
///     "statuses": { "active+clean": 10 },
///     "object_stats": { "num_objects": 100, "num_object_copies": 300,
///                       "num_objects_misplaced": 0, "num_objects_degraded": 0,
///                       "num_objects_unfound": 0 }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "crate::wire::WireSnapshot", into = "crate::wire::WireSnapshot")
)]
pub struct HealthSnapshot {
    /// Cluster-wide health status.
    pub health: OverallHealth,
    /// Client I/O rates.
    pub client_perf: ClientPerf,
    /// Raw cluster capacity.
    pub capacity: Capacity,
    /// Placement group counts keyed by raw status label (e.g. `active+clean`).
    pub pg_statuses: BTreeMap<String, u64>,
    /// Object replica counters.
    pub object_stats: ObjectStats,
}

impl HealthSnapshot {
    /// Create a builder for constructing snapshots.
    pub fn builder() -> HealthSnapshotBuilder {
        HealthSnapshotBuilder::default()
    }

    /// Total number of placement groups across all status labels.
    pub fn total_pgs(&self) -> u64 {
        self.pg_statuses
            .values()
            .fold(0u64, |acc, count| acc.saturating_add(*count))
    }
}

/// Client I/O rates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientPerf {
    pub read_ops_per_sec: f64,
    pub write_ops_per_sec: f64,
    pub read_bytes_per_sec: f64,
    pub write_bytes_per_sec: f64,
}

impl ClientPerf {
    /// Combined read and write operations per second.
    pub fn total_ops(&self) -> f64 {
        self.read_ops_per_sec + self.write_ops_per_sec
    }

    /// Combined read and write bytes per second.
    pub fn total_bytes(&self) -> f64 {
        self.read_bytes_per_sec + self.write_bytes_per_sec
    }
}

/// Raw cluster capacity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Capacity {
    pub total_bytes: f64,
    pub used_raw_bytes: f64,
}

impl Capacity {
    /// Bytes still available, never negative.
    pub fn available_bytes(&self) -> f64 {
        (self.total_bytes - self.used_raw_bytes).max(0.0)
    }
}

/// Object replica counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectStats {
    pub num_objects: u64,
    pub num_object_copies: u64,
    pub num_objects_misplaced: u64,
    pub num_objects_degraded: u64,
    pub num_objects_unfound: u64,
}

impl ObjectStats {
    /// Copies that are neither misplaced, degraded nor unfound.
    ///
    /// Clamped at zero when the unhealthy counters exceed the copy count.
    pub fn healthy_copies(&self) -> u64 {
        self.num_object_copies
            .saturating_sub(self.num_objects_misplaced)
            .saturating_sub(self.num_objects_degraded)
            .saturating_sub(self.num_objects_unfound)
    }
}

/// Builder for constructing `HealthSnapshot` instances.
#[derive(Debug, Default)]
pub struct HealthSnapshotBuilder {
    snapshot: HealthSnapshot,
}

impl HealthSnapshotBuilder {
    /// Set the overall health status.
    pub fn health(mut self, health: OverallHealth) -> Self {
        self.snapshot.health = health;
        self
    }

    /// Set client I/O rates using a closure.
    pub fn client_perf<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ClientPerfBuilder) -> ClientPerfBuilder,
    {
        self.snapshot.client_perf = f(ClientPerfBuilder::default()).perf;
        self
    }

    /// Set raw capacity.
    pub fn capacity(mut self, total_bytes: f64, used_raw_bytes: f64) -> Self {
        self.snapshot.capacity = Capacity {
            total_bytes,
            used_raw_bytes,
        };
        self
    }

    /// Add (or replace) the count for a PG status label.
    pub fn pg_status(mut self, label: impl Into<String>, count: u64) -> Self {
        self.snapshot.pg_statuses.insert(label.into(), count);
        self
    }

    /// Set object replica counters.
    pub fn object_stats(mut self, stats: ObjectStats) -> Self {
        self.snapshot.object_stats = stats;
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> HealthSnapshot {
        self.snapshot
    }
}

/// Builder for `ClientPerf`.
#[derive(Debug, Default)]
pub struct ClientPerfBuilder {
    perf: ClientPerf,
}

impl ClientPerfBuilder {
    pub fn read_ops(mut self, value: f64) -> Self {
        self.perf.read_ops_per_sec = value;
        self
    }

    pub fn write_ops(mut self, value: f64) -> Self {
        self.perf.write_ops_per_sec = value;
        self
    }

    pub fn read_bytes(mut self, value: f64) -> Self {
        self.perf.read_bytes_per_sec = value;
        self
    }

    pub fn write_bytes(mut self, value: f64) -> Self {
        self.perf.write_bytes_per_sec = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero_filled() {
        let snapshot = HealthSnapshot::default();
        assert_eq!(snapshot.health, OverallHealth::Unknown);
        assert_eq!(snapshot.client_perf.total_ops(), 0.0);
        assert_eq!(snapshot.capacity.available_bytes(), 0.0);
        assert!(snapshot.pg_statuses.is_empty());
        assert_eq!(snapshot.total_pgs(), 0);
        assert_eq!(snapshot.object_stats.healthy_copies(), 0);
    }

    #[test]
    fn test_available_bytes_clamps_at_zero() {
        let capacity = Capacity {
            total_bytes: 100.0,
            used_raw_bytes: 150.0,
        };
        assert_eq!(capacity.available_bytes(), 0.0);
    }

    #[test]
    fn test_healthy_copies_clamps_when_counters_are_inconsistent() {
        let stats = ObjectStats {
            num_objects: 10,
            num_object_copies: 30,
            num_objects_misplaced: 20,
            num_objects_degraded: 15,
            num_objects_unfound: 1,
        };
        assert_eq!(stats.healthy_copies(), 0);

        let stats = ObjectStats {
            num_object_copies: 30,
            num_objects_misplaced: 5,
            num_objects_degraded: 3,
            num_objects_unfound: 1,
            ..Default::default()
        };
        assert_eq!(stats.healthy_copies(), 21);
    }

    #[test]
    fn test_builder() {
        let snapshot = HealthSnapshot::builder()
            .health(OverallHealth::Warn)
            .client_perf(|p| p.read_ops(1.0).write_ops(2.0).read_bytes(3.0).write_bytes(4.0))
            .capacity(1000.0, 250.0)
            .pg_status("active+clean", 10)
            .pg_status("odd-state", 3)
            .build();

        assert_eq!(snapshot.health, OverallHealth::Warn);
        assert_eq!(snapshot.client_perf.total_ops(), 3.0);
        assert_eq!(snapshot.client_perf.total_bytes(), 7.0);
        assert_eq!(snapshot.capacity.available_bytes(), 750.0);
        assert_eq!(snapshot.total_pgs(), 13);
    }
}
