use std::collections::HashMap;

use crate::error::MaptyError;
use crate::record::WorkoutRecord;

type Result<T> = std::result::Result<T, MaptyError>;

/// A string key-value store with `localStorage` semantics.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// In-process store, used off the browser and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Parse a persisted workout list.
pub fn parse_records(json: &str) -> Result<Vec<WorkoutRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Saves and restores the workout list under a single key.
#[derive(Debug)]
pub struct WorkoutRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> WorkoutRepository<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Overwrite the stored list with `records` in one write.
    pub fn save(&mut self, records: &[WorkoutRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.store.set_item(&self.key, &json)?;
        tracing::debug!(key = %self.key, count = records.len(), "saved workouts");
        Ok(())
    }

    /// Read the stored list. Missing, unreadable or corrupt data yields an
    /// empty list.
    pub fn load(&self) -> Vec<WorkoutRecord> {
        let raw = match self.store.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, err = %e, "could not read stored workouts");
                return Vec::new();
            }
        };

        match parse_records(&raw) {
            Ok(records) => {
                tracing::debug!(key = %self.key, count = records.len(), "loaded workouts");
                records
            }
            Err(e) => {
                tracing::warn!(key = %self.key, err = %e, "ignoring corrupt stored workouts");
                Vec::new()
            }
        }
    }

    /// Delete the key entirely.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove_item(&self.key)?;
        tracing::info!(key = %self.key, "cleared stored workouts");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::{Coords, Workout};
    use chrono::{Local, TimeZone};

    fn sample_records() -> Vec<WorkoutRecord> {
        let t1 = Local.with_ymd_and_hms(2024, 4, 14, 9, 30, 0).unwrap();
        let t2 = Local.with_ymd_and_hms(2024, 4, 15, 18, 5, 0).unwrap();
        vec![
            WorkoutRecord::from(&Workout::running(Coords::new(51.5, -0.1), t1, 5.0, 30.0, 150.0)),
            WorkoutRecord::from(&Workout::cycling(Coords::new(51.6, -0.2), t2, 27.0, 95.0, 523.0)),
        ]
    }

    #[test]
    fn test_absent_key_loads_empty() {
        let repo = WorkoutRepository::new(MemoryStore::new(), "workouts");
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_corrupt_value_loads_empty() {
        let mut store = MemoryStore::new();
        store.set_item("workouts", "{not json").unwrap();
        let repo = WorkoutRepository::new(store, "workouts");
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_unknown_kind_loads_empty() {
        let mut store = MemoryStore::new();
        store
            .set_item(
                "workouts",
                r#"[{"id":"1","createdAt":"x","coordinates":[0,0],"distanceKm":1,"durationMin":1,"kind":"swimming","description":"d"}]"#,
            )
            .unwrap();
        let repo = WorkoutRepository::new(store, "workouts");
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let records = sample_records();
        let mut repo = WorkoutRepository::new(MemoryStore::new(), "workouts");
        repo.save(&records).unwrap();

        let loaded = repo.load();
        assert_eq!(loaded, records);
        assert_eq!(loaded[0].derived_metric(), Some(6.0));
    }

    #[test]
    fn test_save_overwrites() {
        let records = sample_records();
        let mut repo = WorkoutRepository::new(MemoryStore::new(), "workouts");
        repo.save(&records).unwrap();
        repo.save(&records[..1]).unwrap();

        assert_eq!(repo.load().len(), 1);
        assert_eq!(repo.store().len(), 1);
    }

    #[test]
    fn test_clear_removes_key() {
        let mut repo = WorkoutRepository::new(MemoryStore::new(), "workouts");
        repo.save(&sample_records()).unwrap();
        repo.clear().unwrap();

        assert!(repo.store().get_item("workouts").unwrap().is_none());
        assert!(repo.load().is_empty());

        // Clearing an absent key is fine.
        repo.clear().unwrap();
        assert!(repo.store().is_empty());
    }

    #[test]
    fn test_uses_configured_key() {
        let mut store = MemoryStore::new();
        {
            let mut repo = WorkoutRepository::new(&mut store, "mapty");
            repo.save(&sample_records()).unwrap();
        }
        assert!(store.get_item("mapty").unwrap().is_some());
        assert!(store.get_item("workouts").unwrap().is_none());
    }
}
