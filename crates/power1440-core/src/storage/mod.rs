mod config;

pub use config::{AllocationConfig, ClockConfig, Config, UiConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/power1440[-dev]/` based on POWER1440_ENV.
///
/// Set POWER1440_ENV=dev to use a separate development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POWER1440_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("power1440-dev")
    } else {
        base_dir.join("power1440")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
