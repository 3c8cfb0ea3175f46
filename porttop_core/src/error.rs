//! Error types for the pipeline. Read paths degrade to data; these surface the rest.

use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

/// A shell utility could not be run to completion.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("`{program}` could not be started: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` did not finish within {}ms", .after.as_millis())]
    TimedOut { program: String, after: Duration },
}

impl CommandError {
    /// True when the utility is not installed (or not on PATH).
    pub fn is_missing(&self) -> bool {
        matches!(self, CommandError::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("listener scan unavailable: {0}")]
    Command(#[from] CommandError),
    #[error("listener scan exited with status {}: {stderr}", fmt_code(.code))]
    Exit { code: Option<i32>, stderr: String },
}

#[derive(Debug, Error)]
pub enum TerminateError {
    #[error("failed to kill port {port}: no process is listening on it")]
    NoProcesses { port: u16 },
    #[error("failed to kill port {port}: could not resolve owning processes: {source}")]
    Lookup {
        port: u16,
        #[source]
        source: CommandError,
    },
    #[error("failed to kill port {port}: pid lookup exited with status {}: {stderr}", fmt_code(.code))]
    LookupExit {
        port: u16,
        code: Option<i32>,
        stderr: String,
    },
    #[error("failed to kill port {port}: {reason}")]
    Signal { port: u16, reason: String },
}

impl TerminateError {
    pub fn port(&self) -> u16 {
        match self {
            TerminateError::NoProcesses { port }
            | TerminateError::Lookup { port, .. }
            | TerminateError::LookupExit { port, .. }
            | TerminateError::Signal { port, .. } => *port,
        }
    }
}

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("could not write labels to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode labels: {0}")]
    Encode(#[from] serde_json::Error),
}

fn fmt_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "signal".into())
}
