//! Session state
//!
//! Holds the date catalog loaded from the state file and writes it back after
//! every mutation.

use crate::store::JsonFileStore;
use anyhow::{Context, Result};
use attendance_engine::{DateCatalog, StateStore};
use std::path::Path;

/// Date catalog bound to the store it was loaded from
pub struct Session<S: StateStore = JsonFileStore> {
    store: S,
    catalog: DateCatalog,
}

impl Session<JsonFileStore> {
    /// Open the JSON state file at `path` (missing file = empty state)
    pub fn open(path: &Path) -> Result<Self> {
        let session = Self::with_store(JsonFileStore::new(path))
            .with_context(|| format!("Failed to load state file: {:?}", path))?;
        log::debug!(
            "Loaded {} saved dates from {:?}",
            session.catalog.known_dates().len(),
            session.store.path()
        );
        Ok(session)
    }
}

impl<S: StateStore> Session<S> {
    pub fn with_store(store: S) -> Result<Self> {
        let catalog = DateCatalog::load_from(&store)?;
        Ok(Self { store, catalog })
    }

    pub fn catalog(&self) -> &DateCatalog {
        &self.catalog
    }

    /// Apply a change to the catalog and persist it
    pub fn update<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut DateCatalog),
    {
        change(&mut self.catalog);
        self.catalog
            .save_to(&self.store)
            .context("Failed to save state")
    }
}
