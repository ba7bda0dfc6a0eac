mod config;
pub mod database;
pub mod store;

pub use config::{AssistantConfig, Config, HistoryConfig, TimerConfig};
pub use database::Database;
pub use store::{FavoriteItem, RecipeStore, FAVORITES_KEY, HISTORY_KEY};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/barista[-dev]/` based on BARISTA_ENV.
///
/// Set BARISTA_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("BARISTA_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("barista-dev")
    } else {
        base_dir.join("barista")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
