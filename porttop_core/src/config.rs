//! Core configuration, read from `PORTTOP_*` environment variables.
//!
//! - `PORTTOP_CMD_TIMEOUT_MS`: per-command timeout (default 5000)
//! - `PORTTOP_USAGE`: `ps` or `sysinfo` (default `ps`)
//! - `PORTTOP_LABELS`: label file path (default `$XDG_CONFIG_HOME/porttop/labels.json`)

use std::{path::PathBuf, time::Duration};

use tracing::warn;

use crate::usage::UsageSource;

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(5_000);

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub command_timeout: Duration,
    pub usage_source: UsageSource,
    pub labels_path: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            usage_source: UsageSource::default(),
            labels_path: labels_path(),
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(ms) = env_millis("PORTTOP_CMD_TIMEOUT_MS") {
            cfg.command_timeout = ms;
        }
        if let Ok(v) = std::env::var("PORTTOP_USAGE") {
            match v.parse() {
                Ok(src) => cfg.usage_source = src,
                Err(e) => warn!("PORTTOP_USAGE: {e}"),
            }
        }
        if let Some(p) = std::env::var_os("PORTTOP_LABELS").filter(|p| !p.is_empty()) {
            cfg.labels_path = PathBuf::from(p);
        }
        cfg
    }
}

/// Millisecond duration from an env var; zero and garbage are ignored.
pub fn env_millis(key: &str) -> Option<Duration> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            warn!("{key}: expected a positive number of milliseconds, got '{raw}'");
            None
        }
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("porttop")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("porttop")
    }
}

pub fn labels_path() -> PathBuf {
    config_dir().join("labels.json")
}
