//! Chart builders.
//!
//! Each builder is a pure function from a snapshot fragment to a new
//! [`ChartConfig`]. Missing or zero data produces 0% segments, never an
//! error.

use std::collections::BTreeMap;

use healthpie_types::{
    Capacity, ChartConfig, ChartSet, ClientPerf, HealthSnapshot, ObjectStats, LINE_SEPARATOR,
};

use super::format::UnitFormatter;
use super::palette;
use crate::classify::CategoryClassifier;
use crate::ratio::{classify_and_total, distribute, distribute_against, percentage};

/// Read vs. write operations per second.
pub fn read_write_ratio(perf: &ClientPerf, fmt: &dyn UnitFormatter) -> ChartConfig {
    let read = perf.read_ops_per_sec;
    let write = perf.write_ops_per_sec;

    ChartConfig::new(
        vec![
            format!("Reads: {}/s", fmt.count(read)),
            format!("Writes: {}/s", fmt.count(write)),
        ],
        distribute(&[read, write]),
    )
    .with_center(fmt.count(perf.total_ops()), "IOPS")
    .with_colors(palette::CLIENT)
}

/// Read vs. write bytes per second.
pub fn client_throughput(perf: &ClientPerf, fmt: &dyn UnitFormatter) -> ChartConfig {
    let read = perf.read_bytes_per_sec;
    let write = perf.write_bytes_per_sec;

    // "1.5 KiB" becomes "1.5" over "KiB/s".
    let total = fmt
        .bytes(perf.total_bytes())
        .replacen(' ', &LINE_SEPARATOR.to_string(), 1);

    ChartConfig::new(
        vec![
            format!("Reads: {}/s", fmt.bytes(read)),
            format!("Writes: {}/s", fmt.bytes(write)),
        ],
        distribute(&[read, write]),
    )
    .with_center_label(format!("{total}/s"))
    .with_colors(palette::CLIENT)
}

/// Used vs. available raw capacity.
pub fn raw_capacity_usage(capacity: &Capacity, fmt: &dyn UnitFormatter) -> ChartConfig {
    let used = capacity.used_raw_bytes;
    let avail = capacity.available_bytes();
    let total = capacity.total_bytes;

    ChartConfig::new(
        vec![
            format!("Used: {}", fmt.bytes(used)),
            format!("Avail.: {}", fmt.bytes(avail)),
        ],
        distribute(&[used, avail]),
    )
    .with_center(
        format!("{}%", percentage(used, total)),
        format!("of {}", fmt.bytes(total)),
    )
    .with_colors(palette::CAPACITY)
}

/// Placement groups per category, in fixed category order.
pub fn pg_status_distribution(
    pg_statuses: &BTreeMap<String, u64>,
    classifier: &CategoryClassifier,
    fmt: &dyn UnitFormatter,
) -> ChartConfig {
    let (counts, total) = classify_and_total(pg_statuses, classifier);
    let categories = classifier.all_categories();

    let labels = categories
        .iter()
        .map(|c| format!("{}: {}", c.label(), fmt.count(counts[*c] as f64)))
        .collect();
    let values: Vec<f64> = categories.iter().map(|c| counts[*c] as f64).collect();

    ChartConfig::new(labels, distribute(&values))
        .with_center(fmt.count(total as f64), "PGs")
        .with_colors(palette::SEVERITY)
}

/// Healthy, misplaced, degraded and unfound object copies.
///
/// Percentages are taken against the total copy count. When the unhealthy
/// counters exceed it, the healthy share is clamped to zero.
pub fn object_health(stats: &ObjectStats, fmt: &dyn UnitFormatter) -> ChartConfig {
    let counts = [
        stats.healthy_copies() as f64,
        stats.num_objects_misplaced as f64,
        stats.num_objects_degraded as f64,
        stats.num_objects_unfound as f64,
    ];

    ChartConfig::new(
        ["Healthy", "Misplaced", "Degraded", "Unfound"]
            .iter()
            .map(|l| l.to_string())
            .collect(),
        distribute_against(&counts, stats.num_object_copies as f64),
    )
    .with_center(fmt.count(stats.num_objects as f64), "objects")
    .with_colors(palette::SEVERITY)
}

/// Whether the read/write chart has anything to show.
pub fn is_client_read_write_showable(perf: &ClientPerf) -> bool {
    perf.total_ops() > 0.0
}

/// Build all dashboard charts from one snapshot.
pub fn build_all(
    snapshot: &HealthSnapshot,
    classifier: &CategoryClassifier,
    fmt: &dyn UnitFormatter,
) -> ChartSet {
    ChartSet {
        read_write_ratio: read_write_ratio(&snapshot.client_perf, fmt),
        client_throughput: client_throughput(&snapshot.client_perf, fmt),
        raw_capacity: raw_capacity_usage(&snapshot.capacity, fmt),
        pg_status: pg_status_distribution(&snapshot.pg_statuses, classifier, fmt),
        object_health: object_health(&snapshot.object_stats, fmt),
    }
}
