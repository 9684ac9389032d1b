//! JSON-backed goal configuration.
//!
//! A single document at `<data_dir>/goals.json`, overwritten wholesale
//! on every save. A missing file is not an error: it loads as the
//! default configuration with goals disabled.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{GoalsError, StorageError};

/// User-configured pomodoro targets. `0` means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default)]
    pub daily_goal: u32,
    #[serde(default)]
    pub weekly_goal: u32,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Persistence for the single [`GoalConfig`] document.
pub struct GoalStore {
    path: PathBuf,
}

impl GoalStore {
    /// Store rooted at the default data directory.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self {
            path: data_dir()?.join("goals.json"),
        })
    }

    /// Store rooted at an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the goals document; an absent file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<GoalConfig, GoalsError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(GoalConfig::default());
            }
            Err(source) => {
                return Err(GoalsError::ReadFailed {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&data).map_err(|source| GoalsError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the goals document, stamping `updated_at` (and
    /// `created_at` on first save).
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, config: &mut GoalConfig) -> Result<(), GoalsError> {
        let now = Utc::now();
        config.updated_at = Some(now);
        if config.created_at.is_none() {
            config.created_at = Some(now);
        }

        let data = serde_json::to_vec_pretty(config).map_err(|source| GoalsError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, data).map_err(|source| GoalsError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }

    /// Remove the goals document. A cleared store loads exactly like a
    /// never-configured one.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be removed.
    pub fn clear(&self) -> Result<(), GoalsError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(GoalsError::WriteFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
