pub mod database;
pub mod goals;

pub use database::{SessionRecord, SessionStore};
pub use goals::{GoalConfig, GoalStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, `~/.pomo` by default.
///
/// Set `POMO_DATA_DIR` to use a different location (tests point this at
/// a temporary directory). The directory is created if it is missing.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("POMO_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pomo"),
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
