use serde::de::DeserializeOwned;
use serde::Serialize;

use studyplan_core::domain::models::{Settings, Task};
use studyplan_core::SnapshotHistory;

use crate::error::{Section, StorageError};
use crate::kv::KeyValueStore;

pub const TASKS_KEY: &str = "studyplan.tasks";
pub const HISTORY_KEY: &str = "studyplan.history";
pub const SETTINGS_KEY: &str = "studyplan.settings";

/// Everything a session needs at startup; sections that could not be read
/// come back as their defaults.
#[derive(Debug, Default)]
pub struct LoadedState {
    pub tasks: Vec<Task>,
    pub history: SnapshotHistory,
    pub settings: Settings,
}

/// Serializes the session state to and from the external key-value store.
///
/// Tasks, history and settings live under three independent keys, so one
/// broken record only degrades its own section: writes are best-effort and
/// attempted for every section, reads fall back to defaults per section.
#[derive(Debug)]
pub struct PersistenceGateway<S> {
    store: S,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Write all three sections.
    ///
    /// Failures are logged and collected; the remaining sections are still
    /// written. Returns which sections failed, if any.
    pub fn save(
        &mut self,
        tasks: &[Task],
        history: &SnapshotHistory,
        settings: &Settings,
    ) -> Result<(), StorageError> {
        let mut failed = Vec::new();

        self.write_section(Section::Tasks, TASKS_KEY, &tasks, &mut failed);
        self.write_section(Section::History, HISTORY_KEY, history, &mut failed);
        self.write_section(Section::Settings, SETTINGS_KEY, settings, &mut failed);

        if failed.is_empty() {
            tracing::debug!(task_count = tasks.len(), "persisted session state");
            Ok(())
        } else {
            Err(StorageError::PartialWrite(failed))
        }
    }

    /// Read all three sections, degrading each to its default on a missing
    /// or corrupt record.
    pub fn load(&self) -> LoadedState {
        LoadedState {
            tasks: self.read_section(TASKS_KEY),
            history: self.read_section(HISTORY_KEY),
            settings: self.read_section(SETTINGS_KEY),
        }
    }

    /// Drop all persisted records. In-memory state is unaffected.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(TASKS_KEY)?;
        self.store.remove(HISTORY_KEY)?;
        self.store.remove(SETTINGS_KEY)?;
        Ok(())
    }

    fn write_section<T: Serialize>(
        &mut self,
        section: Section,
        key: &str,
        value: &T,
        failed: &mut Vec<Section>,
    ) {
        let result = serde_json::to_string(value)
            .map_err(|e| StorageError::backend(e.to_string()))
            .and_then(|json| self.store.set(key, &json));

        if let Err(err) = result {
            tracing::warn!(%section, error = %err, "failed to persist section");
            failed.push(section);
        }
    }

    fn read_section<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read section; using defaults");
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "corrupt section; using defaults");
                T::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use chrono::{NaiveDate, TimeZone, Utc};
    use studyplan_core::domain::models::TaskDraft;
    use studyplan_core::TaskStore;

    /// Fails writes for one key, to exercise section independence.
    struct FlakyStore {
        inner: MemoryStore,
        failing_key: &'static str,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.failing_key {
                return Err(StorageError::backend("disk full"));
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn sample_tasks() -> Vec<Task> {
        let mut store = TaskStore::new();
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let draft = TaskDraft::new("Algebra homework")
            .with_due_date(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
            .with_estimated_hours(3.0);
        store.create(draft, now).unwrap();
        store.tasks().to_vec()
    }

    #[test]
    fn save_and_load_round_trip() {
        let mut gateway = PersistenceGateway::new(MemoryStore::new());
        let tasks = sample_tasks();
        let mut history = SnapshotHistory::new();
        history.push(&tasks, Utc::now());
        let settings = Settings::default();

        gateway.save(&tasks, &history, &settings).unwrap();
        let loaded = gateway.load();

        assert_eq!(loaded.tasks, tasks);
        assert_eq!(loaded.history, history);
        assert_eq!(loaded.settings, settings);
    }

    #[test]
    fn empty_store_loads_defaults() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        let loaded = gateway.load();

        assert!(loaded.tasks.is_empty());
        assert!(loaded.history.is_empty());
        assert_eq!(loaded.settings, Settings::default());
    }

    #[test]
    fn corrupt_section_degrades_alone() {
        let mut gateway = PersistenceGateway::new(MemoryStore::new());
        let tasks = sample_tasks();
        gateway
            .save(&tasks, &SnapshotHistory::new(), &Settings::default())
            .unwrap();
        gateway
            .store_mut()
            .set(SETTINGS_KEY, "{not json")
            .unwrap();

        let loaded = gateway.load();
        assert_eq!(loaded.tasks, tasks);
        assert_eq!(loaded.settings, Settings::default());
    }

    #[test]
    fn failed_write_does_not_abort_other_sections() {
        let mut gateway = PersistenceGateway::new(FlakyStore {
            inner: MemoryStore::new(),
            failing_key: HISTORY_KEY,
        });
        let tasks = sample_tasks();

        let err = gateway
            .save(&tasks, &SnapshotHistory::new(), &Settings::default())
            .unwrap_err();
        match err {
            StorageError::PartialWrite(sections) => assert_eq!(sections, vec![Section::History]),
            other => panic!("unexpected error: {other}"),
        }

        assert!(gateway.store().get(TASKS_KEY).unwrap().is_some());
        assert!(gateway.store().get(SETTINGS_KEY).unwrap().is_some());
    }

    #[test]
    fn clear_removes_all_keys() {
        let mut gateway = PersistenceGateway::new(MemoryStore::new());
        gateway
            .save(&sample_tasks(), &SnapshotHistory::new(), &Settings::default())
            .unwrap();
        gateway.clear().unwrap();

        assert!(gateway.store().is_empty());
    }
}
