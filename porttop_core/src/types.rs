//! Records produced by the scanner and the enricher.

use serde::Serialize;

use crate::classify::ServiceKind;

pub const UNKNOWN: &str = "unknown";
pub const NO_CPU: &str = "0%";

/// One listening socket as reported by the scan utility. Unique by (port, pid).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PortRecord {
    pub port: u16,
    pub pid: u32,
    pub user: String,
    pub command: String,
}

impl PortRecord {
    pub fn url(&self) -> String {
        local_url(self.port)
    }
}

/// Display-ready resource usage for one pid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceUsage {
    pub uptime: String,
    pub memory: String,
    pub cpu: String,
}

impl ResourceUsage {
    /// Sentinel used when the process could not be queried (usually it exited).
    pub fn unknown() -> Self {
        Self {
            uptime: UNKNOWN.into(),
            memory: UNKNOWN.into(),
            cpu: NO_CPU.into(),
        }
    }
}

/// A [`PortRecord`] with classification, usage and label attached. Recomputed every poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPort {
    #[serde(flatten)]
    pub record: PortRecord,
    #[serde(skip)]
    pub kind: ServiceKind,
    pub service_type: &'static str,
    pub icon: &'static str,
    pub uptime: String,
    pub memory: String,
    pub cpu: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
}

impl EnrichedPort {
    pub fn port(&self) -> u16 {
        self.record.port
    }

    pub fn pid(&self) -> u32 {
        self.record.pid
    }

    /// The label if one is set, otherwise the detected service type.
    pub fn display_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(self.service_type)
    }

    pub fn kill_command(&self) -> String {
        format!("kill -9 {}", self.record.pid)
    }
}

/// Result of one full scan + enrich poll.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub ports: Vec<EnrichedPort>,
    /// Set when the scan itself failed, so an empty list can be told apart from no listeners.
    pub scan_error: Option<String>,
}

pub fn local_url(port: u16) -> String {
    format!("http://localhost:{port}")
}
