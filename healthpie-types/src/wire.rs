//! Wire schema of the health endpoint.
//!
//! Every subtree and leaf is optional: a missing key and an explicit `null`
//! both decode as `None` and are zero-filled when converted into a
//! [`HealthSnapshot`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Capacity, ClientPerf, HealthSnapshot, ObjectStats, OverallHealth};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct WireSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    health: Option<WireHealth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_perf: Option<WireClientPerf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    df: Option<WireDf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pg_info: Option<WirePgInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireHealth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireClientPerf {
    #[serde(default)]
    read_op_per_sec: Option<f64>,
    #[serde(default)]
    write_op_per_sec: Option<f64>,
    #[serde(default)]
    read_bytes_sec: Option<f64>,
    #[serde(default)]
    write_bytes_sec: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireDf {
    #[serde(default)]
    stats: Option<WireDfStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireDfStats {
    #[serde(default)]
    total_bytes: Option<f64>,
    #[serde(default)]
    total_used_raw_bytes: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WirePgInfo {
    #[serde(default)]
    statuses: Option<BTreeMap<String, Option<u64>>>,
    #[serde(default)]
    object_stats: Option<WireObjectStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireObjectStats {
    #[serde(default)]
    num_objects: Option<u64>,
    #[serde(default)]
    num_object_copies: Option<u64>,
    #[serde(default)]
    num_objects_misplaced: Option<u64>,
    #[serde(default)]
    num_objects_degraded: Option<u64>,
    #[serde(default)]
    num_objects_unfound: Option<u64>,
}

impl From<WireSnapshot> for HealthSnapshot {
    fn from(wire: WireSnapshot) -> Self {
        let health = wire
            .health
            .and_then(|h| h.status)
            .map(|s| OverallHealth::from_status(&s))
            .unwrap_or_default();

        let perf = wire.client_perf.unwrap_or_default();
        let client_perf = ClientPerf {
            read_ops_per_sec: perf.read_op_per_sec.unwrap_or(0.0),
            write_ops_per_sec: perf.write_op_per_sec.unwrap_or(0.0),
            read_bytes_per_sec: perf.read_bytes_sec.unwrap_or(0.0),
            write_bytes_per_sec: perf.write_bytes_sec.unwrap_or(0.0),
        };

        let stats = wire.df.and_then(|df| df.stats).unwrap_or_default();
        let capacity = Capacity {
            total_bytes: stats.total_bytes.unwrap_or(0.0),
            used_raw_bytes: stats.total_used_raw_bytes.unwrap_or(0.0),
        };

        let pg_info = wire.pg_info.unwrap_or_default();
        let pg_statuses = pg_info
            .statuses
            .unwrap_or_default()
            .into_iter()
            .map(|(label, count)| (label, count.unwrap_or(0)))
            .collect();

        let objects = pg_info.object_stats.unwrap_or_default();
        let object_stats = ObjectStats {
            num_objects: objects.num_objects.unwrap_or(0),
            num_object_copies: objects.num_object_copies.unwrap_or(0),
            num_objects_misplaced: objects.num_objects_misplaced.unwrap_or(0),
            num_objects_degraded: objects.num_objects_degraded.unwrap_or(0),
            num_objects_unfound: objects.num_objects_unfound.unwrap_or(0),
        };

        HealthSnapshot {
            health,
            client_perf,
            capacity,
            pg_statuses,
            object_stats,
        }
    }
}

impl From<HealthSnapshot> for WireSnapshot {
    fn from(snapshot: HealthSnapshot) -> Self {
        let perf = snapshot.client_perf;
        let objects = snapshot.object_stats;

        WireSnapshot {
            health: snapshot.health.as_status().map(|status| WireHealth {
                status: Some(status.to_string()),
            }),
            client_perf: Some(WireClientPerf {
                read_op_per_sec: Some(perf.read_ops_per_sec),
                write_op_per_sec: Some(perf.write_ops_per_sec),
                read_bytes_sec: Some(perf.read_bytes_per_sec),
                write_bytes_sec: Some(perf.write_bytes_per_sec),
            }),
            df: Some(WireDf {
                stats: Some(WireDfStats {
                    total_bytes: Some(snapshot.capacity.total_bytes),
                    total_used_raw_bytes: Some(snapshot.capacity.used_raw_bytes),
                }),
            }),
            pg_info: Some(WirePgInfo {
                statuses: Some(
                    snapshot
                        .pg_statuses
                        .into_iter()
                        .map(|(label, count)| (label, Some(count)))
                        .collect(),
                ),
                object_stats: Some(WireObjectStats {
                    num_objects: Some(objects.num_objects),
                    num_object_copies: Some(objects.num_object_copies),
                    num_objects_misplaced: Some(objects.num_objects_misplaced),
                    num_objects_degraded: Some(objects.num_objects_degraded),
                    num_objects_unfound: Some(objects.num_objects_unfound),
                }),
            }),
        }
    }
}
