//! Port termination: fresh pid lookup for the port, then one `kill -9` for all of them.
//!
//! The pid from an earlier scan is never trusted; it may have been reused since.

use tracing::{info, warn};

use crate::error::TerminateError;
use crate::runner::CommandRunner;
use crate::scanner::LSOF;

pub const KILL: &str = "kill";

/// Resolve pids listening on `port` and force-kill them. Returns the pids signalled.
pub async fn terminate<R: CommandRunner>(runner: &R, port: u16) -> Result<Vec<u32>, TerminateError> {
    let selector = format!("-iTCP:{port}");
    let out = runner
        .run(LSOF, &["-t", selector.as_str(), "-sTCP:LISTEN"])
        .await
        .map_err(|source| TerminateError::Lookup { port, source })?;

    let pids = parse_pid_list(&out.stdout);
    if pids.is_empty() {
        // same rule as the scan: a silent non-zero exit means nothing matched
        let silent = out.stdout.trim().is_empty() && out.stderr.trim().is_empty();
        if !out.success() && !silent {
            return Err(TerminateError::LookupExit {
                port,
                code: out.code,
                stderr: out.stderr.trim().to_string(),
            });
        }
        warn!(port, "nothing to kill");
        return Err(TerminateError::NoProcesses { port });
    }

    let pid_args: Vec<String> = pids.iter().map(u32::to_string).collect();
    let mut args = vec!["-9"];
    args.extend(pid_args.iter().map(String::as_str));
    let out = runner
        .run(KILL, &args)
        .await
        .map_err(|e| TerminateError::Signal {
            port,
            reason: e.to_string(),
        })?;
    if !out.success() {
        let reason = match out.stderr.trim() {
            "" => format!("kill exited with status {:?}", out.code),
            stderr => stderr.to_string(),
        };
        return Err(TerminateError::Signal { port, reason });
    }

    info!(port, ?pids, "killed");
    Ok(pids)
}

/// One pid per line (`lsof -t`), deduplicated and sorted.
pub fn parse_pid_list(stdout: &str) -> Vec<u32> {
    let mut pids: Vec<u32> = stdout
        .lines()
        .filter_map(|l| l.trim().parse().ok())
        .filter(|pid| *pid > 0)
        .collect();
    pids.sort_unstable();
    pids.dedup();
    pids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_list_parsing() {
        assert_eq!(parse_pid_list("123\n456\n123\n"), vec![123, 456]);
        assert_eq!(parse_pid_list(" 9 \n\n"), vec![9]);
        assert!(parse_pid_list("").is_empty());
        assert!(parse_pid_list("lsof: WARNING\n0\n").is_empty());
    }
}
