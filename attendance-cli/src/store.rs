//! JSON file state store
//!
//! Keeps the `targetUrl` / `savedDates` / `checkedDates` keys in one JSON
//! object on disk.

use attendance_engine::{EngineError, FilterSnapshot, StateStore};
use std::fs;
use std::path::{Path, PathBuf};

/// State store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> attendance_engine::Result<FilterSnapshot> {
        if !self.path.exists() {
            log::debug!("No state file at {:?}, starting empty", self.path);
            return Ok(FilterSnapshot::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(FilterSnapshot::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            EngineError::Storage(format!("Failed to parse state file {:?}: {}", self.path, e))
        })
    }

    fn save(&self, snapshot: &FilterSnapshot) -> attendance_engine::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot).map_err(|e| {
            EngineError::Storage(format!("Failed to encode state: {}", e))
        })?;
        fs::write(&self.path, json)?;

        log::debug!("State saved to {:?}", self.path);
        Ok(())
    }
}
