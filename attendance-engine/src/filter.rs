//! Active date selection
//!
//! [`DateFilterState`] is the single source of truth for which dates take part
//! in aggregation. [`DateCatalog`] adds the universe of known dates around it,
//! and [`FilterSnapshot`] is the persisted form exchanged with a key-value
//! store through [`StateStore`].

use crate::types::{CalendarDate, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of dates currently selected for aggregation.
///
/// Empty means "nothing selected", not "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateFilterState {
    dates: BTreeSet<CalendarDate>,
}

impl DateFilterState {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a date. Returns false if it was already selected.
    pub fn add(&mut self, date: CalendarDate) -> bool {
        self.dates.insert(date)
    }

    /// Deselect a date. Returns false if it was not selected.
    pub fn remove(&mut self, date: &CalendarDate) -> bool {
        self.dates.remove(date)
    }

    pub fn clear(&mut self) {
        self.dates.clear();
    }

    /// Replace the selection with exactly the given dates
    pub fn sync<I>(&mut self, snapshot: I)
    where
        I: IntoIterator<Item = CalendarDate>,
    {
        self.dates = snapshot.into_iter().collect();
        log::debug!("Filter synced: {} dates active", self.dates.len());
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.dates.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Selected dates, ascending
    pub fn iter(&self) -> impl Iterator<Item = &CalendarDate> {
        self.dates.iter()
    }
}

impl FromIterator<CalendarDate> for DateFilterState {
    fn from_iter<I: IntoIterator<Item = CalendarDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

/// Persisted selection state, keyed the way the key-value store stores it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSnapshot {
    /// Source page address; carried along, never read by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,

    /// Every known date
    #[serde(default)]
    pub saved_dates: Vec<String>,

    /// Dates selected for aggregation
    #[serde(default)]
    pub checked_dates: Vec<String>,
}

/// External key-value store holding a [`FilterSnapshot`]
pub trait StateStore {
    /// Read the stored snapshot; a store with nothing saved yields the default
    fn load(&self) -> Result<FilterSnapshot>;

    /// Overwrite the stored snapshot
    fn save(&self, snapshot: &FilterSnapshot) -> Result<()>;
}

/// Known dates plus the active selection among them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateCatalog {
    known: BTreeSet<CalendarDate>,
    filter: DateFilterState,
    target_url: Option<String>,
}

impl DateCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a date. An already known date only has its selection updated.
    pub fn add_date(&mut self, date: CalendarDate, checked: bool) {
        if !self.known.insert(date) {
            log::debug!("Date already known: {}", date);
        }
        self.set_selected(date, checked);
    }

    /// Toggle a date, registering it if unknown
    pub fn set_checked(&mut self, date: CalendarDate, checked: bool) {
        self.known.insert(date);
        self.set_selected(date, checked);
    }

    /// Forget a date entirely. Returns false if it was not known.
    pub fn delete_date(&mut self, date: &CalendarDate) -> bool {
        self.filter.remove(date);
        self.known.remove(date)
    }

    /// Forget every date
    pub fn clear_all(&mut self) {
        self.known.clear();
        self.filter.clear();
    }

    /// Replace the selection from a toggle snapshot
    pub fn sync_checked<I>(&mut self, checked: I)
    where
        I: IntoIterator<Item = CalendarDate>,
    {
        let checked: Vec<CalendarDate> = checked.into_iter().collect();
        self.known.extend(checked.iter().copied());
        self.filter.sync(checked);
    }

    /// Known dates, ascending
    pub fn known_dates(&self) -> Vec<CalendarDate> {
        self.known.iter().copied().collect()
    }

    pub fn is_checked(&self, date: &CalendarDate) -> bool {
        self.filter.contains(date)
    }

    pub fn filter(&self) -> &DateFilterState {
        &self.filter
    }

    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    pub fn set_target_url(&mut self, url: Option<String>) {
        self.target_url = url;
    }

    /// Rebuild a catalog from persisted state.
    ///
    /// The universe is the union of saved and checked dates. Entries that are
    /// not `YYYY-MM-DD` are skipped.
    pub fn from_snapshot(snapshot: &FilterSnapshot) -> Self {
        let saved = parse_dates(&snapshot.saved_dates, "savedDates");
        let checked = parse_dates(&snapshot.checked_dates, "checkedDates");

        let mut catalog = Self {
            known: saved.into_iter().collect(),
            filter: DateFilterState::new(),
            target_url: snapshot.target_url.clone(),
        };
        catalog.sync_checked(checked);

        log::debug!(
            "Loaded {} known dates, {} checked",
            catalog.known.len(),
            catalog.filter.len()
        );
        catalog
    }

    /// Persisted form of this catalog, dates ascending
    pub fn to_snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            target_url: self.target_url.clone(),
            saved_dates: self.known.iter().map(|d| d.to_string()).collect(),
            checked_dates: self.filter.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Load from a store
    pub fn load_from<S: StateStore + ?Sized>(store: &S) -> Result<Self> {
        let snapshot = store.load()?;
        Ok(Self::from_snapshot(&snapshot))
    }

    /// Save to a store
    pub fn save_to<S: StateStore + ?Sized>(&self, store: &S) -> Result<()> {
        store.save(&self.to_snapshot())
    }

    fn set_selected(&mut self, date: CalendarDate, checked: bool) {
        if checked {
            self.filter.add(date);
        } else {
            self.filter.remove(&date);
        }
    }
}

fn parse_dates(raw: &[String], key: &str) -> Vec<CalendarDate> {
    raw.iter()
        .filter_map(|s| match s.parse::<CalendarDate>() {
            Ok(date) => Some(date),
            Err(e) => {
                log::warn!("Skipping invalid entry in {}: {}", key, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[derive(Default)]
    struct MemoryStore {
        slot: RefCell<Option<FilterSnapshot>>,
    }

    impl StateStore for MemoryStore {
        fn load(&self) -> Result<FilterSnapshot> {
            Ok(self.slot.borrow().clone().unwrap_or_default())
        }

        fn save(&self, snapshot: &FilterSnapshot) -> Result<()> {
            *self.slot.borrow_mut() = Some(snapshot.clone());
            Ok(())
        }
    }

    #[test]
    fn test_filter_add_remove_idempotent() {
        let mut filter = DateFilterState::new();
        assert!(filter.is_empty());

        assert!(filter.add(date("2023-05-01")));
        assert!(!filter.add(date("2023-05-01")));
        assert_eq!(filter.len(), 1);

        assert!(filter.remove(&date("2023-05-01")));
        assert!(!filter.remove(&date("2023-05-01")));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_filter_sync_replaces() {
        let mut filter: DateFilterState = [date("2023-05-01"), date("2023-05-02")]
            .into_iter()
            .collect();
        filter.sync([date("2023-05-03")]);

        assert_eq!(filter.len(), 1);
        assert!(filter.contains(&date("2023-05-03")));
        assert!(!filter.contains(&date("2023-05-01")));

        filter.sync(std::iter::empty());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_filter_clear() {
        let mut filter: DateFilterState = [date("2023-05-01")].into_iter().collect();
        filter.clear();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_catalog_add_and_toggle() {
        let mut catalog = DateCatalog::new();
        catalog.add_date(date("2023-05-02"), false);
        catalog.add_date(date("2023-05-01"), true);
        assert_eq!(
            catalog.known_dates(),
            vec![date("2023-05-01"), date("2023-05-02")]
        );
        assert!(catalog.is_checked(&date("2023-05-01")));
        assert!(!catalog.is_checked(&date("2023-05-02")));

        // Re-adding a known date updates only its selection
        catalog.add_date(date("2023-05-02"), true);
        assert_eq!(catalog.known_dates().len(), 2);
        assert!(catalog.is_checked(&date("2023-05-02")));

        catalog.set_checked(date("2023-05-01"), false);
        assert!(!catalog.is_checked(&date("2023-05-01")));
    }

    #[test]
    fn test_catalog_delete_and_clear() {
        let mut catalog = DateCatalog::new();
        catalog.add_date(date("2023-05-01"), true);
        catalog.add_date(date("2023-05-02"), true);

        assert!(catalog.delete_date(&date("2023-05-01")));
        assert!(!catalog.delete_date(&date("2023-05-01")));
        assert!(!catalog.filter().contains(&date("2023-05-01")));

        catalog.clear_all();
        assert!(catalog.known_dates().is_empty());
        assert!(catalog.filter().is_empty());
    }

    #[test]
    fn test_catalog_from_snapshot_union_and_skip_invalid() {
        let snapshot = FilterSnapshot {
            target_url: Some("https://example.com/board/1".to_string()),
            saved_dates: vec!["2023-05-02".to_string(), "garbage".to_string()],
            checked_dates: vec!["2023-05-03".to_string()],
        };
        let catalog = DateCatalog::from_snapshot(&snapshot);

        assert_eq!(
            catalog.known_dates(),
            vec![date("2023-05-02"), date("2023-05-03")]
        );
        assert_eq!(catalog.filter().len(), 1);
        assert_eq!(catalog.target_url(), Some("https://example.com/board/1"));
    }

    #[test]
    fn test_snapshot_key_names() {
        let mut catalog = DateCatalog::new();
        catalog.add_date(date("2023-05-01"), true);
        let json = serde_json::to_value(catalog.to_snapshot()).unwrap();

        assert_eq!(json["savedDates"][0], "2023-05-01");
        assert_eq!(json["checkedDates"][0], "2023-05-01");
        assert!(json.get("targetUrl").is_none());
    }

    #[test]
    fn test_catalog_store_round_trip() {
        let store = MemoryStore::default();
        assert_eq!(DateCatalog::load_from(&store).unwrap(), DateCatalog::new());

        let mut catalog = DateCatalog::new();
        catalog.add_date(date("2023-05-01"), true);
        catalog.add_date(date("2023-05-08"), false);
        catalog.set_target_url(Some("https://example.com".to_string()));
        catalog.save_to(&store).unwrap();

        assert_eq!(DateCatalog::load_from(&store).unwrap(), catalog);
    }
}
