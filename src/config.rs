use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{NotesError, Result};

/// File name of the persisted note collection, the namespaced key for this
/// application's data.
pub const STORE_FILE: &str = "notes.v1.json";

/// Environment variable naming a remote notes endpoint.
pub const API_BASE_ENV: &str = "NOTES_API_BASE";

/// Default quiet window for search-driven reloads, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Path of the JSON document holding the note collection
    pub store_path: PathBuf,

    /// Base URL of a remote notes backend (recognized but unused by the
    /// current store; reserved for a future HTTP-backed implementation)
    pub api_base: Option<String>,

    /// Quiet window for debounced search reloads, in milliseconds
    pub debounce_ms: u64,
}

impl Config {
    /// Builds a configuration rooted in the per-user data directory,
    /// picking up `NOTES_API_BASE` from the environment if set.
    pub fn load() -> Result<Self> {
        let dirs =
            ProjectDirs::from("", "", "ocean-notes").ok_or_else(|| NotesError::ConfigError {
                message: "could not determine a data directory for this platform".to_string(),
            })?;

        Ok(Self {
            store_path: dirs.data_dir().join(STORE_FILE),
            api_base: resolve_api_base(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        })
    }

    /// Builds a configuration storing notes at an explicit path.
    pub fn with_store_path(store_path: PathBuf) -> Self {
        Self {
            store_path,
            api_base: resolve_api_base(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }

    /// The debounce quiet window as a Duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn resolve_api_base() -> Option<String> {
    std::env::var(API_BASE_ENV)
        .ok()
        .filter(|base| !base.trim().is_empty())
}
