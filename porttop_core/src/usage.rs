//! Per-process resource usage (elapsed time, resident memory, CPU%).
//!
//! Two sources: `ps` (default) and a shared sysinfo handle. Either way a failed
//! query degrades to [`ResourceUsage::unknown`]; a pid vanishing between scan and
//! query is normal.

use std::{str::FromStr, sync::Arc};

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tokio::sync::Mutex;
use tracing::debug;

use crate::runner::CommandRunner;
use crate::types::{ResourceUsage, NO_CPU, UNKNOWN};

pub type SharedSystem = Arc<Mutex<System>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsageSource {
    #[default]
    Ps,
    Sysinfo,
}

impl FromStr for UsageSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ps" => Ok(UsageSource::Ps),
            "sysinfo" => Ok(UsageSource::Sysinfo),
            other => Err(format!("unknown usage source '{other}' (expected ps or sysinfo)")),
        }
    }
}

/// `ps -p <pid> -o etime=,rss=,pcpu=`, parsed positionally.
pub async fn query_ps<R: CommandRunner>(runner: &R, pid: u32) -> ResourceUsage {
    let pid_arg = pid.to_string();
    match runner
        .run("ps", &["-p", pid_arg.as_str(), "-o", "etime=,rss=,pcpu="])
        .await
    {
        Ok(out) if out.success() => parse_ps_usage(&out.stdout),
        Ok(out) => {
            debug!(pid, code = ?out.code, "ps found no such process");
            ResourceUsage::unknown()
        }
        Err(e) => {
            debug!(pid, "usage query failed: {e}");
            ResourceUsage::unknown()
        }
    }
}

pub fn parse_ps_usage(stdout: &str) -> ResourceUsage {
    let mut parts = stdout.split_whitespace();
    let uptime = parts
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN.into());
    let memory = parts
        .next()
        .and_then(|v| v.parse::<u64>().ok())
        .map(format_memory)
        .unwrap_or_else(|| UNKNOWN.into());
    let cpu = parts
        .next()
        .and_then(|v| v.parse::<f64>().ok())
        .map(format_cpu)
        .unwrap_or_else(|| NO_CPU.into());
    ResourceUsage { uptime, memory, cpu }
}

/// Same triple from a persistent sysinfo handle. CPU% needs two refreshes of the
/// same pid, so the first poll of a new process reports 0.0%.
pub async fn query_sysinfo(sys: &SharedSystem, pid: u32) -> ResourceUsage {
    let pid = Pid::from_u32(pid);
    let mut sys = sys.lock().await;
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing().with_cpu().with_memory(),
    );
    match sys.process(pid) {
        Some(p) => ResourceUsage {
            uptime: format_elapsed(p.run_time()),
            memory: format_memory(p.memory() / 1024),
            cpu: format_cpu(f64::from(p.cpu_usage())),
        },
        None => {
            debug!(pid = pid.as_u32(), "process vanished before usage query");
            ResourceUsage::unknown()
        }
    }
}

/// 1024-based: `512 KB`, `2.0 MB`, `5.00 GB`.
pub fn format_memory(kb: u64) -> String {
    const K: f64 = 1024.0;
    if kb < 1024 {
        return format!("{kb} KB");
    }
    let mb = kb as f64 / K;
    if mb < K {
        return format!("{mb:.1} MB");
    }
    format!("{:.2} GB", mb / K)
}

pub fn format_cpu(pct: f64) -> String {
    format!("{pct:.1}%")
}

/// Seconds rendered like `ps` etime: `[[dd-]hh:]mm:ss`.
pub fn format_elapsed(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let mins = (secs % 3_600) / 60;
    let s = secs % 60;
    if days > 0 {
        format!("{days}-{hours:02}:{mins:02}:{s:02}")
    } else if hours > 0 {
        format!("{hours:02}:{mins:02}:{s:02}")
    } else {
        format!("{mins:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_thresholds() {
        assert_eq!(format_memory(0), "0 KB");
        assert_eq!(format_memory(512), "512 KB");
        assert_eq!(format_memory(1023), "1023 KB");
        assert_eq!(format_memory(1024), "1.0 MB");
        assert_eq!(format_memory(2048), "2.0 MB");
        assert_eq!(format_memory(1024 * 1024), "1.00 GB");
        assert_eq!(format_memory(5_242_880), "5.00 GB");
    }

    #[test]
    fn ps_output_parsed_positionally() {
        let u = parse_ps_usage("   01:02:03  20480  12.34\n");
        assert_eq!(u.uptime, "01:02:03");
        assert_eq!(u.memory, "20.0 MB");
        assert_eq!(u.cpu, "12.3%");
    }

    #[test]
    fn missing_ps_fields_fall_back_individually() {
        assert_eq!(parse_ps_usage(""), ResourceUsage::unknown());

        let u = parse_ps_usage("05:00");
        assert_eq!(u.uptime, "05:00");
        assert_eq!(u.memory, "unknown");
        assert_eq!(u.cpu, "0%");

        let u = parse_ps_usage("05:00 lots nan?");
        assert_eq!(u.memory, "unknown");
        assert_eq!(u.cpu, "0%");
    }

    #[test]
    fn elapsed_matches_etime_layout() {
        assert_eq!(format_elapsed(5), "00:05");
        assert_eq!(format_elapsed(65), "01:05");
        assert_eq!(format_elapsed(3_661), "01:01:01");
        assert_eq!(format_elapsed(90_061), "1-01:01:01");
    }

    #[test]
    fn usage_source_from_str() {
        assert_eq!("ps".parse::<UsageSource>(), Ok(UsageSource::Ps));
        assert_eq!(" SysInfo ".parse::<UsageSource>(), Ok(UsageSource::Sysinfo));
        assert!("top".parse::<UsageSource>().is_err());
    }

    #[tokio::test]
    async fn sysinfo_reports_own_process_and_unknown_for_missing_pid() {
        let sys: SharedSystem = Arc::new(Mutex::new(System::new()));
        let me = query_sysinfo(&sys, std::process::id()).await;
        assert_ne!(me.memory, "unknown");

        // pid_max on Linux tops out well below this
        let gone = query_sysinfo(&sys, u32::MAX - 1).await;
        assert_eq!(gone, ResourceUsage::unknown());
    }
}
