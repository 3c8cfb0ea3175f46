//! Listener scanner: runs `lsof` for listening TCP sockets and parses its table output.
//!
//! Expected layout (header line first, `NAME` is the 9th column):
//! ```text
//! COMMAND   PID USER   FD   TYPE DEVICE SIZE/OFF NODE NAME
//! node     1234 alice  22u  IPv4 0x1234      0t0  TCP *:3000 (LISTEN)
//! ```

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::ScanError;
use crate::runner::CommandRunner;
use crate::types::PortRecord;

pub const LSOF: &str = "lsof";
const LISTEN_ARGS: [&str; 4] = ["-iTCP", "-sTCP:LISTEN", "-n", "-P"];

const COMMAND_FIELD: usize = 0;
const PID_FIELD: usize = 1;
const USER_FIELD: usize = 2;
const NAME_FIELD: usize = 8;

/// Scan listening sockets, keeping the failure distinguishable from "no listeners".
pub async fn try_scan<R: CommandRunner>(runner: &R) -> Result<Vec<PortRecord>, ScanError> {
    let out = runner.run(LSOF, &LISTEN_ARGS).await?;
    if !out.success() {
        // lsof exits 1 without output when nothing matched
        if out.stdout.trim().is_empty() && out.stderr.trim().is_empty() {
            return Ok(Vec::new());
        }
        return Err(ScanError::Exit {
            code: out.code,
            stderr: out.stderr.trim().to_string(),
        });
    }
    let records = parse_listeners(&out.stdout);
    debug!(count = records.len(), "scan complete");
    Ok(records)
}

/// Scan listening sockets; any failure reads as an empty list.
pub async fn scan<R: CommandRunner>(runner: &R) -> Vec<PortRecord> {
    match try_scan(runner).await {
        Ok(records) => records,
        Err(e) => {
            warn!("{e}");
            Vec::new()
        }
    }
}

/// Parse full `lsof` output: skip the header, dedupe by (port, pid), sort by port.
pub fn parse_listeners(stdout: &str) -> Vec<PortRecord> {
    let mut seen = HashSet::new();
    let mut records: Vec<PortRecord> = stdout
        .lines()
        .skip(1)
        .filter_map(parse_line)
        .filter(|r| seen.insert((r.port, r.pid)))
        .collect();
    // stable: same-port records keep discovery order
    records.sort_by_key(|r| r.port);
    records
}

fn parse_line(line: &str) -> Option<PortRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let command = fields.get(COMMAND_FIELD)?;
    let pid = fields.get(PID_FIELD)?.parse().ok()?;
    let user = fields.get(USER_FIELD)?;
    let port = port_from_address(fields.get(NAME_FIELD)?)?;
    Some(PortRecord {
        port,
        pid,
        user: user.to_string(),
        command: command.to_string(),
    })
}

/// Trailing `:<digits>` of a local address (`*:3000`, `127.0.0.1:80`, `[::1]:443`).
pub fn port_from_address(addr: &str) -> Option<u16> {
    let (_, digits) = addr.rsplit_once(':')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u16>().ok().filter(|p| *p > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "COMMAND     PID   USER   FD   TYPE DEVICE SIZE/OFF NODE NAME";

    fn lsof(lines: &[&str]) -> String {
        let mut s = String::from(HEADER);
        for l in lines {
            s.push('\n');
            s.push_str(l);
        }
        s
    }

    #[test]
    fn parses_fields_by_position() {
        let out = lsof(&["node      1234  alice   22u  IPv4 0x1234      0t0  TCP *:3000 (LISTEN)"]);
        let recs = parse_listeners(&out);
        assert_eq!(
            recs,
            vec![PortRecord {
                port: 3000,
                pid: 1234,
                user: "alice".into(),
                command: "node".into(),
            }]
        );
    }

    #[test]
    fn sorts_numerically_not_lexically() {
        let out = lsof(&[
            "java   10 u  1u IPv4 0x1 0t0 TCP *:8080 (LISTEN)",
            "nginx  11 u  1u IPv4 0x1 0t0 TCP *:80 (LISTEN)",
            "nginx  11 u  2u IPv4 0x1 0t0 TCP *:443 (LISTEN)",
            "node   12 u  1u IPv4 0x1 0t0 TCP 127.0.0.1:3000 (LISTEN)",
        ]);
        let ports: Vec<u16> = parse_listeners(&out).iter().map(|r| r.port).collect();
        assert_eq!(ports, vec![80, 443, 3000, 8080]);
    }

    #[test]
    fn dedupes_by_port_and_pid() {
        let out = lsof(&[
            "node   12 u  20u IPv4 0x1 0t0 TCP *:3000 (LISTEN)",
            "node   12 u  21u IPv6 0x2 0t0 TCP [::]:3000 (LISTEN)",
            "node   13 u  20u IPv4 0x3 0t0 TCP *:3000 (LISTEN)",
        ]);
        let recs = parse_listeners(&out);
        let keys: Vec<(u16, u32)> = recs.iter().map(|r| (r.port, r.pid)).collect();
        assert_eq!(keys, vec![(3000, 12), (3000, 13)]);
    }

    #[test]
    fn skips_header_and_malformed_lines() {
        let out = lsof(&[
            "",
            "short line",
            "node notapid u 20u IPv4 0x1 0t0 TCP *:3000 (LISTEN)",
            "node 12 u 20u IPv4 0x1 0t0 TCP *:http (LISTEN)",
            "node 14 u 20u IPv4 0x1 0t0 TCP *:5173 (LISTEN)",
        ]);
        let recs = parse_listeners(&out);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].port, 5173);
    }

    #[test]
    fn header_only_is_empty() {
        assert!(parse_listeners(HEADER).is_empty());
        assert!(parse_listeners("").is_empty());
    }

    #[test]
    fn port_from_address_variants() {
        assert_eq!(port_from_address("*:3000"), Some(3000));
        assert_eq!(port_from_address("127.0.0.1:80"), Some(80));
        assert_eq!(port_from_address("[::1]:443"), Some(443));
        assert_eq!(port_from_address("localhost:65535"), Some(65535));
        assert_eq!(port_from_address("*:0"), None);
        assert_eq!(port_from_address("*:65536"), None);
        assert_eq!(port_from_address("*:"), None);
        assert_eq!(port_from_address("no-colon"), None);
        assert_eq!(port_from_address("*:+80"), None);
    }
}
