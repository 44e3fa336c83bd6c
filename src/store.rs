// Task list state: ordered tasks, edit/delete sessions, filter and persistence

use crate::error::{StorageError, StoreError, ValidationError};
use crate::filter::Filter;
use crate::models::{Task, validate_text};
use crate::snapshot;
use crate::stats::Stats;
use crate::storage::Storage;
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{debug, info, warn};

/// Storage key the task list is saved under
pub const STORAGE_KEY: &str = "todoApp_tasks";

/// In-memory task list backed by a key-value storage adapter
///
/// Tasks are kept newest first. Every mutation writes the whole list back to
/// storage; a failed write is kept as a warning and does not undo the
/// mutation.
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: Filter,
    editing_id: Option<String>,
    pending_delete_id: Option<String>,
    storage: Box<dyn Storage>,
    key: String,
    revision: u64,
    saved_revision: u64,
    warnings: Vec<StoreError>,
    clock: fn() -> DateTime<Utc>,
}

impl TaskStore {
    /// Open a store, restoring tasks saved under [`STORAGE_KEY`]
    pub fn open(storage: Box<dyn Storage>) -> Self {
        Self::open_with_key(storage, STORAGE_KEY)
    }

    /// Open a store, restoring tasks saved under `key`
    ///
    /// A missing value gives an empty list. Unreadable or corrupt data also
    /// gives an empty list, with the error queued in [`take_warnings`](Self::take_warnings).
    pub fn open_with_key(storage: Box<dyn Storage>, key: &str) -> Self {
        let mut store = Self {
            tasks: Vec::new(),
            filter: Filter::All,
            editing_id: None,
            pending_delete_id: None,
            storage,
            key: key.to_string(),
            revision: 0,
            saved_revision: 0,
            warnings: Vec::new(),
            clock: Utc::now,
        };
        store.load();
        store
    }

    /// Replace the time source (used by tests)
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Current time from the store's clock
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn load(&mut self) {
        let data = match self.storage.load(&self.key) {
            Ok(Some(data)) => data,
            Ok(None) => {
                debug!(key = %self.key, "No saved tasks");
                return;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to load tasks");
                self.warnings.push(e.into());
                return;
            }
        };

        match snapshot::from_json(&data) {
            Ok(tasks) => {
                info!(key = %self.key, count = tasks.len(), "Loaded tasks");
                self.tasks = tasks;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Saved tasks are corrupt, starting empty");
                self.warnings.push(e);
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// All tasks, newest first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn pending_delete_id(&self) -> Option<&str> {
        self.pending_delete_id.as_deref()
    }

    /// Whether state changed since the last successful write
    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Drain warnings collected since the last call
    pub fn take_warnings(&mut self) -> Vec<StoreError> {
        std::mem::take(&mut self.warnings)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a task at the front of the list
    pub fn add(&mut self, text: &str) -> Result<&Task, ValidationError> {
        let text = validate_text(text)?;
        let task = Task::new(text, (self.clock)());
        debug!(id = %task.id, "Adding task");

        self.tasks.insert(0, task);
        self.mutated();
        Ok(&self.tasks[0])
    }

    /// Flip completion of `id`; `None` if there is no such task
    pub fn toggle(&mut self, id: &str) -> Option<&Task> {
        let index = self.position(id)?;
        let now = (self.clock)();
        self.tasks[index].toggle(now);
        debug!(id, completed = self.tasks[index].completed, "Toggled task");

        self.mutated();
        Some(&self.tasks[index])
    }

    /// Open an edit session on `id`, returning its current text
    pub fn begin_edit(&mut self, id: &str) -> Option<String> {
        let text = self.get(id)?.text.clone();
        self.editing_id = Some(id.to_string());
        Some(text)
    }

    /// Apply `new_text` to the task being edited
    ///
    /// On a validation error the edit session stays open. When the edited
    /// task no longer exists the session is closed and `Ok(None)` returned.
    pub fn commit_edit(&mut self, new_text: &str) -> Result<Option<&Task>, ValidationError> {
        let text = validate_text(new_text)?;
        let index = self.editing_id.take().and_then(|id| self.position(&id));

        match index {
            Some(index) => {
                debug!(id = %self.tasks[index].id, "Edited task");
                self.tasks[index].text = text;
                self.mutated();
                Ok(Some(&self.tasks[index]))
            }
            None => Ok(None),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing_id = None;
    }

    /// Mark `id` for deletion pending confirmation
    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete_id = Some(id.to_string());
    }

    /// Delete the task marked by [`request_delete`](Self::request_delete)
    pub fn confirm_delete(&mut self) -> Option<Task> {
        let id = self.pending_delete_id.take()?;
        let index = self.position(&id)?;
        let task = self.tasks.remove(index);
        debug!(id = %task.id, "Deleted task");

        self.mutated();
        Some(task)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete_id = None;
    }

    pub fn set_filter(&mut self, filter: Filter) {
        debug!(%filter, "Filter set");
        self.filter = filter;
    }

    /// Tasks visible under the current filter, in list order
    pub fn filtered_tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        let filter = self.filter;
        self.tasks.iter().filter(move |t| filter.matches(t))
    }

    /// Remove all completed tasks once `confirm` approves
    ///
    /// `confirm` receives the number of completed tasks and is not called
    /// when there are none. Returns the number of tasks removed.
    pub fn clear_completed<F>(&mut self, confirm: F) -> usize
    where
        F: FnOnce(usize) -> bool,
    {
        let count = self.completed_count();
        if count == 0 || !confirm(count) {
            return 0;
        }

        self.tasks.retain(|t| !t.completed);
        debug!(count, "Cleared completed tasks");
        self.mutated();
        count
    }

    pub fn stats(&self) -> Stats {
        self.stats_on(Local::now().date_naive())
    }

    /// Statistics with `today` as the local calendar date
    pub fn stats_on(&self, today: NaiveDate) -> Stats {
        Stats::compute(&self.tasks, today)
    }

    /// Pretty JSON snapshot of the whole list
    pub fn export(&self) -> Result<String, StoreError> {
        let data = snapshot::to_json_pretty(&self.tasks)?;
        info!(count = self.tasks.len(), "Exported tasks");
        Ok(data)
    }

    /// Replace the whole list with a snapshot
    ///
    /// Every record is checked first; on any error the list is unchanged.
    pub fn import(&mut self, data: &str) -> Result<usize, StoreError> {
        let tasks = snapshot::from_json(data)?;
        let count = tasks.len();

        self.tasks = tasks;
        info!(count, "Imported tasks");
        self.mutated();
        Ok(count)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write the list if it changed since the last successful write
    pub fn flush(&mut self) -> bool {
        if !self.is_dirty() {
            return false;
        }
        self.save().is_ok()
    }

    /// Write the list unconditionally
    pub fn save(&mut self) -> Result<(), StorageError> {
        let data = match snapshot::to_json(&self.tasks) {
            Ok(data) => data,
            Err(e) => {
                let err = StorageError::write(&self.key, e);
                self.warnings.push(err.clone().into());
                return Err(err);
            }
        };

        match self.storage.save(&self.key, &data) {
            Ok(()) => {
                debug!(key = %self.key, count = self.tasks.len(), "Saved tasks");
                self.saved_revision = self.revision;
                Ok(())
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to save tasks");
                self.warnings.push(e.clone().into());
                Err(e)
            }
        }
    }

    fn mutated(&mut self) {
        self.revision += 1;
        // Failures are queued as warnings; the in-memory change stands
        let _ = self.save();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Storage whose contents and failure mode are shared with the test
    #[derive(Clone, Default)]
    struct SharedStorage {
        inner: Rc<RefCell<MemoryStorage>>,
        fail_writes: Rc<RefCell<bool>>,
        fail_reads: bool,
        writes: Rc<RefCell<usize>>,
    }

    impl Storage for SharedStorage {
        fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if *self.fail_writes.borrow() {
                return Err(StorageError::write(key, "quota exceeded"));
            }
            *self.writes.borrow_mut() += 1;
            self.inner.borrow_mut().save(key, value)
        }

        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                return Err(StorageError::read(key, "unavailable"));
            }
            self.inner.borrow().load(key)
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn new_store() -> TaskStore {
        TaskStore::open(Box::new(MemoryStorage::new()))
    }

    fn texts<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<&'a str> {
        tasks.map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_open_empty() {
        let mut store = new_store();
        assert!(store.is_empty());
        assert_eq!(store.filter(), Filter::All);
        assert!(store.take_warnings().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_add_prepends_pending_task() {
        let mut store = new_store().with_clock(fixed_now);

        let task = store.add("  Buy milk  ").unwrap().clone();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert_eq!(task.created_at, fixed_now());

        store.add("Walk dog").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[0].text, "Walk dog");
        assert_eq!(store.tasks()[1].id, task.id);
    }

    #[test]
    fn test_add_rejects_empty() {
        let mut store = new_store();

        assert_eq!(store.add("").unwrap_err(), ValidationError::Empty);
        assert_eq!(store.add(" ").unwrap_err(), ValidationError::Empty);
        assert!(store.is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_add_length_bound() {
        let mut store = new_store();

        let err = store.add(&"x".repeat(201)).unwrap_err();
        assert_eq!(err, ValidationError::TooLong { len: 201, max: 200 });
        assert!(store.is_empty());

        store.add(&"x".repeat(200)).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_ids_unique() {
        let mut store = new_store();
        for i in 0..50 {
            store.add(&format!("task {}", i)).unwrap();
        }
        let mut ids: Vec<_> = store.tasks().iter().map(|t| t.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut store = new_store().with_clock(fixed_now);
        let id = store.add("Buy milk").unwrap().id.clone();
        let before = store.get(&id).unwrap().clone();

        let toggled = store.toggle(&id).unwrap();
        assert!(toggled.completed);
        assert_eq!(toggled.completed_at, Some(fixed_now()));

        store.toggle(&id).unwrap();
        assert_eq!(store.get(&id).unwrap(), &before);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let mut store = new_store();
        store.add("Buy milk").unwrap();
        let snapshot = store.tasks().to_vec();

        assert!(store.toggle("missing").is_none());
        assert_eq!(store.tasks(), snapshot.as_slice());
    }

    #[test]
    fn test_edit_flow() {
        let mut store = new_store();
        let id = store.add("Buy milk").unwrap().id.clone();

        assert_eq!(store.begin_edit(&id), Some("Buy milk".to_string()));
        assert_eq!(store.editing_id(), Some(id.as_str()));

        let edited = store.commit_edit(" Buy oat milk ").unwrap().unwrap();
        assert_eq!(edited.text, "Buy oat milk");
        assert!(store.editing_id().is_none());
        assert_eq!(store.get(&id).unwrap().text, "Buy oat milk");
    }

    #[test]
    fn test_begin_edit_unknown_id() {
        let mut store = new_store();
        assert!(store.begin_edit("missing").is_none());
        assert!(store.editing_id().is_none());
    }

    #[test]
    fn test_commit_edit_validation_keeps_session() {
        let mut store = new_store();
        let id = store.add("Buy milk").unwrap().id.clone();
        store.begin_edit(&id);

        assert_eq!(store.commit_edit("   ").unwrap_err(), ValidationError::Empty);
        assert_eq!(store.editing_id(), Some(id.as_str()));

        assert!(store.commit_edit(&"y".repeat(201)).is_err());
        assert_eq!(store.editing_id(), Some(id.as_str()));
        assert_eq!(store.get(&id).unwrap().text, "Buy milk");

        // Retry succeeds
        store.commit_edit("Buy bread").unwrap();
        assert_eq!(store.get(&id).unwrap().text, "Buy bread");
    }

    #[test]
    fn test_commit_edit_target_deleted() {
        let mut store = new_store();
        let id = store.add("Buy milk").unwrap().id.clone();
        store.begin_edit(&id);

        store.request_delete(&id);
        store.confirm_delete().unwrap();

        assert_eq!(store.commit_edit("Buy bread").unwrap(), None);
        assert!(store.editing_id().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_commit_edit_without_session() {
        let mut store = new_store();
        store.add("Buy milk").unwrap();

        assert_eq!(store.commit_edit("Other").unwrap(), None);
        assert_eq!(store.tasks()[0].text, "Buy milk");
    }

    #[test]
    fn test_cancel_edit() {
        let mut store = new_store();
        let id = store.add("Buy milk").unwrap().id.clone();
        store.begin_edit(&id);

        store.cancel_edit();
        assert!(store.editing_id().is_none());
        assert_eq!(store.get(&id).unwrap().text, "Buy milk");

        // Unconditional
        store.cancel_edit();
        assert!(store.editing_id().is_none());
    }

    #[test]
    fn test_delete_flow() {
        let mut store = new_store();
        let keep = store.add("Keep").unwrap().id.clone();
        let drop = store.add("Drop").unwrap().id.clone();

        store.request_delete(&drop);
        assert_eq!(store.pending_delete_id(), Some(drop.as_str()));
        assert_eq!(store.len(), 2);

        let removed = store.confirm_delete().unwrap();
        assert_eq!(removed.id, drop);
        assert!(store.pending_delete_id().is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].id, keep);
    }

    #[test]
    fn test_confirm_delete_without_request_is_noop() {
        let mut store = new_store();
        store.add("Keep").unwrap();

        assert!(store.confirm_delete().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_cancel_delete() {
        let mut store = new_store();
        let id = store.add("Keep").unwrap().id.clone();

        store.request_delete(&id);
        store.cancel_delete();
        assert!(store.pending_delete_id().is_none());
        assert!(store.confirm_delete().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_edit_and_delete_sessions_are_independent() {
        let mut store = new_store();
        let a = store.add("A").unwrap().id.clone();
        let b = store.add("B").unwrap().id.clone();

        store.begin_edit(&a);
        store.request_delete(&b);
        assert_eq!(store.editing_id(), Some(a.as_str()));
        assert_eq!(store.pending_delete_id(), Some(b.as_str()));

        store.cancel_delete();
        assert_eq!(store.editing_id(), Some(a.as_str()));

        store.commit_edit("A2").unwrap();
        assert_eq!(store.get(&a).unwrap().text, "A2");
        assert!(store.get(&b).is_some());
    }

    #[test]
    fn test_filtered_tasks_preserve_order() {
        let mut store = new_store();
        let ids: Vec<String> = ["one", "two", "three", "four"]
            .iter()
            .map(|t| store.add(t).unwrap().id.clone())
            .collect();
        // List is now four, three, two, one
        store.toggle(&ids[0]);
        store.toggle(&ids[2]);

        assert_eq!(texts(store.filtered_tasks()), vec!["four", "three", "two", "one"]);

        store.set_filter(Filter::Completed);
        assert_eq!(texts(store.filtered_tasks()), vec!["three", "one"]);

        store.set_filter(Filter::Pending);
        assert_eq!(texts(store.filtered_tasks()), vec!["four", "two"]);
    }

    #[test]
    fn test_clear_completed_noop_without_completed() {
        let mut store = new_store();
        store.add("Pending").unwrap();

        let mut asked = false;
        let removed = store.clear_completed(|_| {
            asked = true;
            true
        });
        assert_eq!(removed, 0);
        assert!(!asked);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_completed_requires_confirmation() {
        let mut store = new_store();
        let id = store.add("Done").unwrap().id.clone();
        store.toggle(&id);

        assert_eq!(store.clear_completed(|_| false), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_completed_removes_only_completed() {
        let mut store = new_store();
        let ids: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|t| store.add(t).unwrap().id.clone())
            .collect();
        store.toggle(&ids[1]);
        store.toggle(&ids[3]);

        let mut seen = 0;
        let removed = store.clear_completed(|count| {
            seen = count;
            true
        });
        assert_eq!(seen, 2);
        assert_eq!(removed, 2);
        assert_eq!(texts(store.tasks().iter()), vec!["e", "c", "a"]);
    }

    #[test]
    fn test_scenario_buy_milk_walk_dog() {
        let mut store = new_store();
        let milk = store.add("Buy milk").unwrap().id.clone();
        store.add("Walk dog").unwrap();
        assert_eq!(texts(store.tasks().iter()), vec!["Walk dog", "Buy milk"]);

        store.toggle(&milk);

        store.set_filter(Filter::Pending);
        assert_eq!(texts(store.filtered_tasks()), vec!["Walk dog"]);
        store.set_filter(Filter::Completed);
        assert_eq!(texts(store.filtered_tasks()), vec!["Buy milk"]);

        let stats = store.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completion_rate, 50);
        assert_eq!(stats.tasks_created_today, 2);
    }

    #[test]
    fn test_stats_empty() {
        let store = new_store();
        let stats = store.stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_rate, 0);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut store = new_store();
        let id = store.add("Buy milk").unwrap().id.clone();
        store.add("Walk dog").unwrap();
        store.toggle(&id);

        let data = store.export().unwrap();

        let mut other = new_store();
        other.add("Will be replaced").unwrap();
        assert_eq!(other.import(&data).unwrap(), 2);
        assert_eq!(other.tasks(), store.tasks());
    }

    #[test]
    fn test_import_rejects_bad_data_and_keeps_state() {
        let mut store = new_store();
        store.add("Keep me").unwrap();
        let before = store.tasks().to_vec();

        assert!(matches!(store.import(r#"{"tasks":[]}"#), Err(StoreError::Format(_))));
        assert!(matches!(store.import("garbage"), Err(StoreError::Format(_))));
        assert!(matches!(
            store.import(r#"[{"id":"1","text":"","completed":false,"createdAt":"2024-01-01T00:00:00Z"}]"#),
            Err(StoreError::Format(_))
        ));
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_import_persists() {
        let storage = SharedStorage::default();
        let mut store = TaskStore::open(Box::new(storage.clone()));

        store
            .import(r#"[{"id":"x1","text":"Imported","completed":false,"createdAt":"2024-01-01T00:00:00Z","completedAt":null}]"#)
            .unwrap();

        let reopened = TaskStore::open(Box::new(storage));
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.tasks()[0].id, "x1");
    }

    #[test]
    fn test_mutations_persist_and_reload() {
        let storage = SharedStorage::default();
        let mut store = TaskStore::open(Box::new(storage.clone()));
        let id = store.add("Buy milk").unwrap().id.clone();
        store.add("Walk dog").unwrap();
        store.toggle(&id);
        assert!(!store.is_dirty());

        let reopened = TaskStore::open(Box::new(storage.clone()));
        assert_eq!(reopened.tasks(), store.tasks());
        // Transient state resets
        assert_eq!(reopened.filter(), Filter::All);
        assert!(reopened.editing_id().is_none());
        assert!(reopened.pending_delete_id().is_none());
    }

    #[test]
    fn test_transient_state_not_persisted() {
        let storage = SharedStorage::default();
        let mut store = TaskStore::open(Box::new(storage.clone()));
        let id = store.add("Buy milk").unwrap().id.clone();
        let writes = *storage.writes.borrow();

        store.set_filter(Filter::Completed);
        store.begin_edit(&id);
        store.cancel_edit();
        store.request_delete(&id);
        store.cancel_delete();

        assert_eq!(*storage.writes.borrow(), writes);
    }

    #[test]
    fn test_write_failure_keeps_mutation_and_warns() {
        let storage = SharedStorage::default();
        let mut store = TaskStore::open(Box::new(storage.clone()));

        *storage.fail_writes.borrow_mut() = true;
        store.add("Buy milk").unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.is_dirty());
        let warnings = store.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], StoreError::Storage(StorageError::Write { .. })));
        assert!(store.take_warnings().is_empty());

        // Backstop flush succeeds once storage recovers
        assert!(!store.flush());
        *storage.fail_writes.borrow_mut() = false;
        assert!(store.flush());
        assert!(!store.is_dirty());
        assert!(!store.flush());

        let reopened = TaskStore::open(Box::new(storage));
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn test_corrupt_storage_opens_empty_with_warning() {
        let storage = SharedStorage::default();
        storage
            .inner
            .borrow_mut()
            .save(STORAGE_KEY, "{not json")
            .unwrap();

        let mut store = TaskStore::open(Box::new(storage));
        assert!(store.is_empty());
        let warnings = store.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], StoreError::Format(_)));
    }

    #[test]
    fn test_read_failure_opens_empty_with_warning() {
        let storage = SharedStorage {
            fail_reads: true,
            ..Default::default()
        };

        let mut store = TaskStore::open(Box::new(storage));
        assert!(store.is_empty());
        assert!(matches!(
            store.take_warnings()[0],
            StoreError::Storage(StorageError::Read { .. })
        ));

        // Still usable in memory
        store.add("Buy milk").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_custom_key() {
        let storage = SharedStorage::default();
        let mut store = TaskStore::open_with_key(Box::new(storage.clone()), "work_tasks");
        store.add("Ship it").unwrap();

        assert!(storage.inner.borrow().load("work_tasks").unwrap().is_some());
        assert!(storage.inner.borrow().load(STORAGE_KEY).unwrap().is_none());
    }
}
