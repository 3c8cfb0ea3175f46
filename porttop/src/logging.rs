//! tracing-subscriber setup. The TUI owns the terminal, so it logs to a file;
//! one-shot commands log to stderr.

use std::{fs, io, path::PathBuf, sync::Mutex};

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PORTTOP_LOG";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn log_path() -> PathBuf {
    dirs_next::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("porttop")
        .join("porttop.log")
}

pub fn init_cli() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Append to the log file; if it cannot be opened, logging is discarded.
pub fn init_tui() -> Option<PathBuf> {
    let path = log_path();
    let file = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|_| fs::OpenOptions::new().create(true).append(true).open(&path));
    match file {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter("info"))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
            Some(path)
        }
        Err(_) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter("info"))
                .with_writer(io::sink)
                .try_init();
            None
        }
    }
}
