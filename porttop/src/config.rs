//! TUI poll cadences. `PORTTOP_LIST_MS`, `PORTTOP_DETAIL_MS` and `PORTTOP_SUMMARY_MS`
//! override the defaults.

use std::time::Duration;

use porttop_core::config::env_millis;

#[derive(Debug, Clone)]
pub struct TuiConfig {
    pub list_interval: Duration,
    pub detail_interval: Duration,
    pub summary_interval: Duration,
    pub auto_refresh: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            list_interval: Duration::from_secs(3),
            detail_interval: Duration::from_secs(2),
            summary_interval: Duration::from_secs(5),
            auto_refresh: true,
        }
    }
}

impl TuiConfig {
    pub fn from_env(auto_refresh: bool) -> Self {
        let d = Self::default();
        Self {
            list_interval: env_millis("PORTTOP_LIST_MS").unwrap_or(d.list_interval),
            detail_interval: env_millis("PORTTOP_DETAIL_MS").unwrap_or(d.detail_interval),
            summary_interval: env_millis("PORTTOP_SUMMARY_MS").unwrap_or(d.summary_interval),
            auto_refresh,
        }
    }
}
