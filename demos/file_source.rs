//! Example: Building charts from a snapshot file
//!
//! This example writes a sample health snapshot to a temporary file, reads
//! it back through a `FileSource` and prints the prepared charts.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example file_source
//! ```

use healthpie::{charts, CategoryClassifier, DimlessFormatter, FileSource, MetricsSource};

const SAMPLE: &str = r#"{
    "health": { "status": "HEALTH_WARN" },
    "client_perf": {
        "read_op_per_sec": 80,
        "write_op_per_sec": 20,
        "read_bytes_sec": 3145728,
        "write_bytes_sec": 1048576
    },
    "df": { "stats": { "total_bytes": 10995116277760, "total_used_raw_bytes": 2748779069440 } },
    "pg_info": {
        "statuses": {
            "active+clean": 240,
            "active+clean+scrubbing+deep": 8,
            "active+undersized+degraded": 4
        },
        "object_stats": {
            "num_objects": 5000,
            "num_object_copies": 15000,
            "num_objects_degraded": 120
        }
    }
}"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join("healthpie-sample.json");
    std::fs::write(&path, SAMPLE)?;

    let source = FileSource::new(&path);
    println!("Reading from {}\n", source.description());

    let snapshot = source.fetch().await?;
    let set = charts::build_all(&snapshot, &CategoryClassifier::default(), &DimlessFormatter);

    for (kind, chart) in set.iter() {
        println!("{}", kind.title());
        for i in 0..chart.len() {
            if let Some(tooltip) = chart.tooltip(i) {
                println!("  {}", tooltip);
            }
        }
        println!("  center: {}\n", chart.center_lines().join(" / "));
    }

    std::fs::remove_file(&path)?;
    Ok(())
}
