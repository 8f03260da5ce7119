//! tracing-subscriber setup.
//!
//! The dashboard owns the terminal, so it logs to a file in the data
//! directory; headless commands log to stderr.

use std::sync::Mutex;

use power1440_core::storage::data_dir;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    File,
    Stderr,
}

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env("POWER1440_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init(target: LogTarget) {
    match target {
        LogTarget::File => {
            let file = data_dir().ok().and_then(|dir| {
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(dir.join("power1440.log"))
                    .ok()
            });
            // No log file means no logging; never fall back to the terminal.
            if let Some(file) = file {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter("info"))
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .try_init();
            }
        }
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter("warn"))
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
