//! File-based snapshot source.
//!
//! Reads a health endpoint dump from disk. Useful for replaying a captured
//! cluster state, or together with a cron job that refreshes the file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use healthpie_types::HealthSnapshot;

use super::{MetricsSource, SourceError};

/// A source that reads and decodes a JSON snapshot file on every fetch.
///
/// The file is re-read each time, so external rewrites show up on the next
/// tick. Missing fields in the file decode as zero.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MetricsSource for FileSource {
    async fn fetch(&self) -> Result<HealthSnapshot, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let snapshot = serde_json::from_str(&content)?;
        tracing::trace!(path = %self.path.display(), "read snapshot");
        Ok(snapshot)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthpie_types::OverallHealth;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "health": { "status": "HEALTH_WARN" },
            "client_perf": { "read_op_per_sec": 80, "write_op_per_sec": 20 },
            "df": { "stats": { "total_bytes": 1000, "total_used_raw_bytes": 250 } },
            "pg_info": {
                "statuses": { "active+clean": 10, "active+recovering": 5 },
                "object_stats": { "num_objects": 100, "num_object_copies": 300 }
            }
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/health.json");
        assert_eq!(source.path(), Path::new("/tmp/health.json"));
        assert_eq!(source.description(), "file: /tmp/health.json");
    }

    #[tokio::test]
    async fn test_file_source_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let source = FileSource::new(file.path());
        let snapshot = source.fetch().await.unwrap();

        assert_eq!(snapshot.health, OverallHealth::Warn);
        assert_eq!(snapshot.client_perf.total_ops(), 100.0);
        assert_eq!(snapshot.capacity.total_bytes, 1000.0);
        assert_eq!(snapshot.total_pgs(), 15);
        assert_eq!(snapshot.object_stats.num_object_copies, 300);
        assert_eq!(snapshot.object_stats.num_objects_unfound, 0);
    }

    #[tokio::test]
    async fn test_file_source_rereads_on_every_fetch() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();
        let source = FileSource::new(file.path());
        assert_eq!(source.fetch().await.unwrap().total_pgs(), 15);

        std::fs::write(file.path(), r#"{ "pg_info": { "statuses": { "down": 2 } } }"#).unwrap();
        let snapshot = source.fetch().await.unwrap();
        assert_eq!(snapshot.total_pgs(), 2);
        assert_eq!(snapshot.health, OverallHealth::Unknown);
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/path/health.json");

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Read(_)));
        assert!(err.to_string().contains("Read error"));
    }

    #[tokio::test]
    async fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let source = FileSource::new(file.path());

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
        assert!(err.to_string().contains("Parse error"));
    }
}
