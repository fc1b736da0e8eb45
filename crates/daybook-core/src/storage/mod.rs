mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, StorageConfig, StreakConfig};
pub use database::{Database, Entry, NewEntry, StreakReport, User, UserId};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/daybook[-dev]/` based on DAYBOOK_ENV.
///
/// Set DAYBOOK_ENV=dev to use development data directory.
/// DAYBOOK_DATA_DIR, when set, replaces the directory entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("DAYBOOK_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("DAYBOOK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("daybook-dev")
            } else {
                base_dir.join("daybook")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
