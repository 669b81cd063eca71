//! Example: Feeding the dashboard through a channel
//!
//! This example shows how to drive the dashboard from your own collector by
//! publishing snapshots through a channel. A background task simulates a
//! cluster recovering from a failed disk: degraded placement groups settle
//! back to clean over a few seconds.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example channel_source
//! ```

use std::time::Duration;

use healthpie::{ChannelSource, HealthDashboard};
use healthpie_types::{HealthSnapshot, ObjectStats, OverallHealth};

#[tokio::main]
async fn main() {
    println!("Channel source example");
    println!("Simulating a recovering cluster...\n");

    let (publisher, source) = ChannelSource::create("synthetic-data");

    tokio::spawn(async move {
        for step in 0..=10u64 {
            let degraded = 100 - step * 10;
            let snapshot = HealthSnapshot::builder()
                .health(if degraded > 0 {
                    OverallHealth::Warn
                } else {
                    OverallHealth::Ok
                })
                .client_perf(|p| {
                    p.read_ops(120.0 + step as f64)
                        .write_ops(40.0)
                        .read_bytes(8.0 * 1024.0 * 1024.0)
                        .write_bytes(2.0 * 1024.0 * 1024.0)
                })
                .capacity(12.0 * 1024f64.powi(4), 3.5 * 1024f64.powi(4))
                .pg_status("active+clean", 412 - degraded)
                .pg_status("active+recovering+degraded", degraded)
                .object_stats(ObjectStats {
                    num_objects: 20_000,
                    num_object_copies: 60_000,
                    num_objects_degraded: degraded * 30,
                    ..Default::default()
                })
                .build();

            if !publisher.publish(snapshot) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    });

    let handle = HealthDashboard::builder()
        .interval(Duration::from_millis(500))
        .build(source)
        .start();
    let mut views = handle.subscribe();

    let deadline = tokio::time::sleep(Duration::from_secs(6));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                match (&view.charts, &view.error) {
                    (Some(charts), _) => println!(
                        "#{:<3} {:<12} PGs {:?}  objects {:?}",
                        view.sequence,
                        view.health.as_status().unwrap_or("-"),
                        charts.pg_status.segments,
                        charts.object_health.segments,
                    ),
                    (None, Some(error)) => println!("waiting: {}", error),
                    (None, None) => {}
                }
            }
            _ = &mut deadline => break,
        }
    }

    let last = handle.dispose().await;
    println!("\nDone after {} fetches", last.stats.issued);
}
