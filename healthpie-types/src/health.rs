//! Overall cluster health status.

use core::fmt;

/// Cluster-wide health as reported by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverallHealth {
    /// `HEALTH_OK`
    Ok,
    /// `HEALTH_WARN`
    Warn,
    /// `HEALTH_ERR`
    Err,
    /// Missing or unrecognised status.
    #[default]
    Unknown,
}

impl OverallHealth {
    /// Parse the wire status string. Unrecognised values map to `Unknown`.
    pub fn from_status(status: &str) -> Self {
        match status {
            "HEALTH_OK" => OverallHealth::Ok,
            "HEALTH_WARN" => OverallHealth::Warn,
            "HEALTH_ERR" => OverallHealth::Err,
            _ => OverallHealth::Unknown,
        }
    }

    /// The wire status string, if this is a known status.
    pub fn as_status(&self) -> Option<&'static str> {
        match self {
            OverallHealth::Ok => Some("HEALTH_OK"),
            OverallHealth::Warn => Some("HEALTH_WARN"),
            OverallHealth::Err => Some("HEALTH_ERR"),
            OverallHealth::Unknown => None,
        }
    }

    /// Display color for the status text. Unknown statuses are uncolored.
    pub fn color(&self) -> Option<&'static str> {
        match self {
            OverallHealth::Ok => Some("#6ca100"),
            OverallHealth::Warn => Some("#f0ab00"),
            OverallHealth::Err => Some("#c9190b"),
            OverallHealth::Unknown => None,
        }
    }
}

impl fmt::Display for OverallHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_status().unwrap_or("UNKNOWN"))
    }
}
