use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use clap::Parser;
use healthpie::{
    charts, duration::parse_duration, DashboardConfig, DashboardView, DimlessFormatter,
    FileSource, HealthDashboard, MetricsSource,
};
use healthpie_types::{ChartSet, HealthSnapshot};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "healthpie")]
#[command(about = "Prepare cluster health donut charts from health snapshots")]
struct Args {
    /// Path to the health snapshot JSON file
    #[arg(short, long, default_value = "health.json")]
    file: PathBuf,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh interval (e.g., "5s", "500ms"); overrides the config file
    #[arg(short, long)]
    interval: Option<String>,

    /// Fetch once, print the charts as JSON and exit
    #[arg(long)]
    once: bool,

    /// Write the charts of a single fetch to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = DashboardConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(ref interval) = args.interval {
        config.refresh_interval = parse_duration(interval)?;
        config.validate()?;
    }

    let source = FileSource::new(&args.file);

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_file(&source, &config, export_path).await;
    }

    if args.once {
        let snapshot = source
            .fetch()
            .await
            .with_context(|| format!("Failed to read {}", args.file.display()))?;
        let set = charts::build_all(&snapshot, &config.classifier(), &DimlessFormatter);
        println!("{}", serde_json::to_string_pretty(&charts_json(&snapshot, &set))?);
        return Ok(());
    }

    run(source, &config).await
}

/// Run the dashboard until Ctrl-C, printing one JSON line per view.
async fn run(source: FileSource, config: &DashboardConfig) -> Result<()> {
    let handle = HealthDashboard::from_config(config, source).start();
    let mut views = handle.subscribe();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                println!("{}", view_json(&view));
            }
            _ = &mut shutdown => {
                tracing::info!("interrupted, shutting down");
                break;
            }
        }
    }

    handle.dispose().await;
    Ok(())
}

/// Export the charts of one fetch to a JSON file
async fn export_to_file(
    source: &FileSource,
    config: &DashboardConfig,
    export_path: &Path,
) -> Result<()> {
    let snapshot = source
        .fetch()
        .await
        .with_context(|| format!("Failed to read {}", source.path().display()))?;
    let set = charts::build_all(&snapshot, &config.classifier(), &DimlessFormatter);

    let json = serde_json::to_string_pretty(&charts_json(&snapshot, &set))?;
    std::fs::write(export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    tracing::info!(path = %export_path.display(), "exported charts");
    Ok(())
}

fn charts_json(snapshot: &HealthSnapshot, set: &ChartSet) -> serde_json::Value {
    serde_json::json!({
        "health": snapshot.health.as_status(),
        "health_color": snapshot.health.color(),
        "client_read_write_showable": charts::is_client_read_write_showable(&snapshot.client_perf),
        "charts": chart_entries(set),
    })
}

fn view_json(view: &DashboardView) -> serde_json::Value {
    let updated_at_ms = view
        .updated_at
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64);

    serde_json::json!({
        "status": view.status.as_str(),
        "sequence": view.sequence,
        "health": view.health.as_status(),
        "error": view.error,
        "updated_at_ms": updated_at_ms,
        "stats": {
            "issued": view.stats.issued,
            "applied": view.stats.applied,
            "failed": view.stats.failed,
            "skipped_ticks": view.stats.skipped_ticks,
            "discarded": view.stats.discarded,
            "deferred_refreshes": view.stats.deferred_refreshes,
        },
        "charts": view.charts.as_deref().map(chart_entries),
    })
}

fn chart_entries(set: &ChartSet) -> Vec<serde_json::Value> {
    set.iter()
        .map(|(kind, chart)| {
            serde_json::json!({
                "kind": kind,
                "title": kind.title(),
                "labels": chart.labels,
                "segments": chart.segments,
                "centerLabel": chart.center_label,
                "colors": chart.colors,
                "borderWidth": chart.border_width(),
                "tooltips": (0..chart.len()).filter_map(|i| chart.tooltip(i)).collect::<Vec<_>>(),
            })
        })
        .collect()
}
