use chrono::{DateTime, Utc};

use studyplan_core::domain::models::{Settings, Task, TaskDraft, TaskId};
use studyplan_core::domain::{PlannerError, TaskQuery};
use studyplan_core::{SnapshotHistory, TaskStats, TaskStore};

use crate::exchange::{export_snapshot, import_snapshot, ExchangeDocument};
use crate::gateway::PersistenceGateway;
use crate::kv::KeyValueStore;

/// One running planner session: the task store, the snapshot history and
/// the settings, wired to a persistence gateway.
///
/// Constructed once and passed by reference; there is no process-wide
/// state. Every mutation runs [mutate -> snapshot push -> save] to
/// completion before returning, and mutations take `&mut self`, which is
/// the mutual-exclusion boundary a multi-threaded embedding must wrap.
/// Persistence is best-effort: a failed save is logged and the in-memory
/// state remains the source of truth.
pub struct PlannerSession<S: KeyValueStore> {
    store: TaskStore,
    history: SnapshotHistory,
    settings: Settings,
    gateway: PersistenceGateway<S>,
}

impl<S: KeyValueStore> PlannerSession<S> {
    /// Open a session against a key-value store, hydrating whatever state
    /// it holds. Missing or corrupt sections start from defaults.
    pub fn open(kv: S) -> Self {
        let gateway = PersistenceGateway::new(kv);
        let loaded = gateway.load();

        let mut store = TaskStore::new();
        store.hydrate(loaded.tasks);
        tracing::debug!(
            task_count = store.len(),
            snapshot_count = loaded.history.len(),
            "opened planner session"
        );

        Self {
            store,
            history: loaded.history,
            settings: loaded.settings,
            gateway,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn create_task(&mut self, draft: TaskDraft) -> Result<Task, PlannerError> {
        let now = Utc::now();
        let task = self.store.create(draft, now)?;
        self.commit(now);
        Ok(task)
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Task, PlannerError> {
        let now = Utc::now();
        let task = self.store.toggle_complete(id, now)?;
        self.commit(now);
        Ok(task)
    }

    /// Update a task's progress. Persists, but deliberately does not push a
    /// snapshot: progress nudges are too fine-grained for the history.
    pub fn set_progress(&mut self, id: TaskId, value: u8) -> Result<Task, PlannerError> {
        let task = self.store.set_progress(id, value, Utc::now())?;
        self.persist();
        Ok(task)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<(), PlannerError> {
        self.store.delete(id)?;
        self.commit(Utc::now());
        Ok(())
    }

    /// Explicitly re-run the study plan allocator for one task.
    pub fn reallocate(&mut self, id: TaskId) -> Result<Task, PlannerError> {
        let now = Utc::now();
        let task = self.store.reallocate(id, now)?;
        self.commit(now);
        Ok(task)
    }

    /// The task view for the current settings, optionally narrowed by a
    /// search string.
    pub fn task_view(&self, search: &str, now: DateTime<Utc>) -> Vec<Task> {
        let query = TaskQuery::from_settings(&self.settings, now.date_naive()).with_search(search);
        self.store.query(&query)
    }

    pub fn query(&self, query: &TaskQuery) -> Vec<Task> {
        self.store.query(query)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> TaskStats {
        self.store.stats(now.date_naive())
    }

    /// Replace the live collection with a snapshot's copy.
    ///
    /// Restoring does not push a snapshot itself, so stepping through
    /// history cannot inflate it.
    pub fn restore(&mut self, version: u64) -> Result<(), PlannerError> {
        let snapshot = self
            .history
            .snapshot(version)
            .ok_or(PlannerError::SnapshotNotFound(version))?;
        let tasks = snapshot.tasks.clone();
        self.store.hydrate(tasks);
        tracing::debug!(version, "restored snapshot");
        self.persist();
        Ok(())
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.persist();
    }

    pub fn export(&self) -> ExchangeDocument {
        export_snapshot(self.store.tasks(), &self.settings, Utc::now())
    }

    /// Import an exchange document, replacing tasks and settings.
    ///
    /// A malformed document fails before any state changes. A successful
    /// import commits like any other mutation, so the pre-import state
    /// stays reachable through the prior snapshot.
    pub fn import(&mut self, json: &str) -> Result<usize, PlannerError> {
        let (tasks, settings) = import_snapshot(json)?;
        let count = tasks.len();

        self.store.hydrate(tasks);
        self.settings = settings;
        self.commit(Utc::now());
        tracing::debug!(task_count = count, "imported exchange document");
        Ok(count)
    }

    fn commit(&mut self, now: DateTime<Utc>) {
        self.history.push(self.store.tasks(), now);
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(err) = self
            .gateway
            .save(self.store.tasks(), &self.history, &self.settings)
        {
            tracing::warn!(error = %err, "persistence degraded; in-memory state unaffected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{SETTINGS_KEY, TASKS_KEY};
    use crate::kv::MemoryStore;
    use chrono::{Duration, NaiveDate};
    use studyplan_core::domain::models::PriorityFilter;

    fn due_in(days: i64) -> NaiveDate {
        Utc::now().date_naive() + Duration::days(days)
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title)
            .with_due_date(due_in(3))
            .with_estimated_hours(2.0)
    }

    #[test]
    fn mutations_snapshot_and_persist() {
        let mut session = PlannerSession::open(MemoryStore::new());
        let task = session.create_task(draft("Essay")).unwrap();
        session.toggle_complete(task.id).unwrap();

        assert_eq!(session.history().len(), 2);
        assert!(session
            .gateway
            .store()
            .get(TASKS_KEY)
            .unwrap()
            .is_some());
    }

    #[test]
    fn progress_updates_skip_the_history() {
        let mut session = PlannerSession::open(MemoryStore::new());
        let task = session.create_task(draft("Essay")).unwrap();
        session.set_progress(task.id, 40).unwrap();

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.task(task.id).unwrap().progress, 40);
    }

    #[test]
    fn restore_rolls_back_without_new_snapshot() {
        let mut session = PlannerSession::open(MemoryStore::new());
        let first = session.create_task(draft("First")).unwrap();
        let version_after_first = session.history().last_version();
        session.create_task(draft("Second")).unwrap();

        session.restore(version_after_first).unwrap();
        assert_eq!(session.tasks().len(), 1);
        assert_eq!(session.tasks()[0].id, first.id);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn restore_unknown_version_is_refused() {
        let mut session = PlannerSession::open(MemoryStore::new());
        assert!(matches!(
            session.restore(99),
            Err(PlannerError::SnapshotNotFound(99))
        ));
    }

    #[test]
    fn state_survives_reopen() {
        let mut store = MemoryStore::new();
        {
            let mut session = PlannerSession::open(store.clone());
            session.create_task(draft("Persistent")).unwrap();
            store = session.gateway.store().clone();
        }

        let reopened = PlannerSession::open(store);
        assert_eq!(reopened.tasks().len(), 1);
        assert_eq!(reopened.tasks()[0].title, "Persistent");
        assert_eq!(reopened.history().len(), 1);
    }

    #[test]
    fn reopened_session_keeps_ids_unique() {
        let mut session = PlannerSession::open(MemoryStore::new());
        let first = session.create_task(draft("One")).unwrap();
        let store = session.gateway.store().clone();

        let mut reopened = PlannerSession::open(store);
        let second = reopened.create_task(draft("Two")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn failed_import_leaves_state_untouched() {
        let mut session = PlannerSession::open(MemoryStore::new());
        session.create_task(draft("Keep me")).unwrap();

        let err = session.import(r#"{"settings":{}}"#).unwrap_err();
        assert!(matches!(err, PlannerError::Format(_)));
        assert_eq!(session.tasks().len(), 1);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn export_import_round_trip_through_session() {
        let mut session = PlannerSession::open(MemoryStore::new());
        session
            .create_task(draft("Exam prep").with_subject("Math"))
            .unwrap();
        let settings = Settings {
            filter_priority: PriorityFilter::Pending,
            ..Settings::default()
        };
        session.update_settings(settings.clone());

        let json = session.export().to_json().unwrap();

        let mut other = PlannerSession::open(MemoryStore::new());
        let imported = other.import(&json).unwrap();
        assert_eq!(imported, 1);
        assert_eq!(other.tasks(), session.tasks());
        assert_eq!(other.settings(), &settings);
    }

    #[test]
    fn settings_updates_persist_without_history() {
        let mut session = PlannerSession::open(MemoryStore::new());
        session.update_settings(Settings {
            is_dark_mode: true,
            ..Settings::default()
        });

        assert!(session.history().is_empty());
        assert!(session
            .gateway
            .store()
            .get(SETTINGS_KEY)
            .unwrap()
            .is_some());
    }

    #[test]
    fn task_view_respects_settings() {
        let mut session = PlannerSession::open(MemoryStore::new());
        let done = session.create_task(draft("Done")).unwrap();
        session.create_task(draft("Open item")).unwrap();
        session.toggle_complete(done.id).unwrap();

        session.update_settings(Settings {
            show_completed_tasks: false,
            ..Settings::default()
        });

        let view = session.task_view("", Utc::now());
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].title, "Open item");
    }
}
