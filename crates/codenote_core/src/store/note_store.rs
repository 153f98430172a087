//! Concurrent note store backed by per-project JSON partitions.
//!
//! # Responsibility
//! - Provide add/update/delete/get/list/search over all notes.
//! - Load every partition under the storage root on open.
//! - Rewrite partition documents synchronously after each mutation.
//!
//! # Invariants
//! - `add` assigns a fresh id only when the supplied id is empty.
//! - `update` on an absent id is a no-op and writes nothing.
//! - `delete` is idempotent.
//! - Listings are ordered `created_time DESC`.
//! - Disk writes are serialized; the last full write of a partition wins.

use crate::model::code_note::{CodeNote, NoteId};
use crate::model::timestamp;
use crate::search::matcher::{sort_newest_first, NoteQuery};
use crate::settings::CodeNoteSettings;
use crate::store::error::StoreResult;
use crate::store::partition::{
    discover_partitions, partition_file, partition_key, read_partition_file,
    write_partition_file,
};
use dashmap::DashMap;
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Instant;

/// Store construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the partition documents.
    pub root: PathBuf,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Derives the storage root from host settings.
    pub fn from_settings(settings: &CodeNoteSettings) -> Self {
        Self::new(settings.effective_storage_path())
    }
}

/// Change notification emitted after a mutation has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added(NoteId),
    Updated(NoteId),
    Deleted(NoteId),
    /// Store contents were replaced by a disk scan; carries the note count.
    Reloaded(usize),
}

/// Callback registered through [`NoteStore::subscribe`].
pub type StoreListener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

#[derive(Default)]
struct PersistState {
    /// Partitions that exist on disk, so emptied ones get rewritten.
    known_partitions: BTreeSet<String>,
}

/// Process-wide note collection.
///
/// The map tolerates concurrent readers and writers; the disk step of each
/// mutation runs under a single write lock.
pub struct NoteStore {
    config: StoreConfig,
    notes: DashMap<NoteId, CodeNote>,
    persist: Mutex<PersistState>,
    listeners: RwLock<Vec<StoreListener>>,
}

impl NoteStore {
    /// Opens the store and loads every partition found under the root.
    ///
    /// Never fails: unreadable partitions are logged and skipped.
    pub fn open(config: StoreConfig) -> Self {
        let store = Self {
            config,
            notes: DashMap::new(),
            persist: Mutex::new(PersistState::default()),
            listeners: RwLock::new(Vec::new()),
        };
        store.load_from_disk();
        store
    }

    /// Storage root this store reads and writes.
    pub fn root(&self) -> &Path {
        self.config.root.as_path()
    }

    /// Registers a listener for change events.
    ///
    /// Listeners run outside the registry lock and may subscribe further
    /// listeners; those only see later events.
    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        listeners.push(Arc::new(listener));
    }

    /// Stores `note`, assigning an id when it has none, and returns the id.
    ///
    /// An existing note with the same id is replaced. An `updated_time`
    /// earlier than `created_time` is raised to `created_time`.
    ///
    /// # Errors
    /// - Returns `StoreError::Validation` when the line range is inverted.
    ///   Nothing is stored in that case.
    pub fn add(&self, mut note: CodeNote) -> StoreResult<NoteId> {
        note.updated_time = note.updated_time.max(note.created_time);
        note.validate()?;
        if note.id.is_empty() {
            note.id = CodeNote::generate_id();
        }
        let id = note.id.clone();
        self.notes.insert(id.clone(), note);
        self.persist_logged("add");
        info!("event=note_add module=store status=ok id={id}");
        self.notify(&StoreEvent::Added(id.clone()));
        Ok(id)
    }

    /// Replaces the note stored under `id`.
    ///
    /// The stored note keeps `id` and gets a fresh `updated_time`, never
    /// earlier than its `created_time` (notes may come from a clock ahead of
    /// ours). Returns `Ok(false)` without touching disk when `id` is absent.
    ///
    /// # Errors
    /// - Returns `StoreError::Validation` when the line range is inverted.
    pub fn update(&self, id: &str, mut note: CodeNote) -> StoreResult<bool> {
        {
            let Some(mut entry) = self.notes.get_mut(id) else {
                debug!("event=note_update module=store status=skip reason=not_found id={id}");
                return Ok(false);
            };
            note.id = id.to_string();
            note.updated_time = timestamp::now().max(note.created_time);
            note.validate()?;
            *entry = note;
        }

        self.persist_logged("update");
        info!("event=note_update module=store status=ok id={id}");
        self.notify(&StoreEvent::Updated(id.to_string()));
        Ok(true)
    }

    /// Removes the note stored under `id` and returns whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.notes.remove(id).is_some();
        self.persist_logged("delete");
        info!("event=note_delete module=store status=ok id={id} removed={removed}");
        if removed {
            self.notify(&StoreEvent::Deleted(id.to_string()));
        }
        removed
    }

    /// Gets one note by id.
    pub fn get(&self, id: &str) -> Option<CodeNote> {
        self.notes.get(id).map(|entry| entry.value().clone())
    }

    /// All notes, newest first.
    pub fn get_all(&self) -> Vec<CodeNote> {
        self.collect(|_| true)
    }

    /// Notes owned by `project_path`, newest first.
    pub fn get_by_project(&self, project_path: &str) -> Vec<CodeNote> {
        self.collect(|note| note.project_path == project_path)
    }

    /// Notes whose title, content, body, tags or file path contain `query`
    /// case-insensitively. A blank query returns [`Self::get_all`].
    pub fn search(&self, query: &str) -> Vec<CodeNote> {
        let query = NoteQuery::new(query);
        self.collect(|note| query.matches(note))
    }

    /// Distinct non-blank project paths, sorted.
    pub fn list_projects(&self) -> Vec<String> {
        self.notes
            .iter()
            .map(|entry| entry.value().project_path.clone())
            .filter(|path| !path.trim().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of stored notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.notes.contains_key(id)
    }

    /// Drops in-memory state and rescans the storage root.
    pub fn reload(&self) {
        self.notes.clear();
        self.lock_persist().known_partitions.clear();
        self.load_from_disk();
    }

    /// Rewrites every partition document from the in-memory map.
    ///
    /// All partitions are attempted; the first failure is returned.
    pub fn flush(&self) -> StoreResult<()> {
        let started_at = Instant::now();
        let mut state = self.lock_persist();

        let mut groups: BTreeMap<String, Vec<CodeNote>> = BTreeMap::new();
        for entry in self.notes.iter() {
            let note = entry.value();
            groups
                .entry(partition_key(&note.project_path))
                .or_default()
                .push(note.clone());
        }
        for key in &state.known_partitions {
            groups.entry(key.clone()).or_default();
        }

        let mut first_error = None;
        let partition_count = groups.len();
        for (key, notes) in groups {
            let path = partition_file(&self.config.root, &key);
            let count = notes.len();
            match write_partition_file(&path, notes) {
                Ok(()) => {
                    debug!(
                        "event=partition_write module=store status=ok partition={} count={}",
                        display_partition(&key),
                        count
                    );
                    state.known_partitions.insert(key);
                }
                Err(err) => {
                    error!(
                        "event=partition_write module=store status=error partition={} error={}",
                        display_partition(&key),
                        err
                    );
                    first_error.get_or_insert(err);
                }
            }
        }

        debug!(
            "event=store_flush module=store status={} partitions={} duration_ms={}",
            if first_error.is_some() { "error" } else { "ok" },
            partition_count,
            started_at.elapsed().as_millis()
        );
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn collect(&self, keep: impl Fn(&CodeNote) -> bool) -> Vec<CodeNote> {
        let mut notes: Vec<CodeNote> = self
            .notes
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        sort_newest_first(&mut notes);
        notes
    }

    fn load_from_disk(&self) {
        let started_at = Instant::now();
        let root = self.config.root.as_path();
        let partitions = match discover_partitions(root) {
            Ok(partitions) => partitions,
            Err(err) => {
                warn!("event=store_load module=store status=error error={err}");
                return;
            }
        };

        let mut loaded_partitions = Vec::with_capacity(partitions.len());
        for (key, path) in partitions {
            match read_partition_file(&path) {
                Ok(notes) => {
                    for note in notes {
                        self.notes.insert(note.id.clone(), note);
                    }
                    loaded_partitions.push(key);
                }
                Err(err) => {
                    warn!(
                        "event=partition_load module=store status=skip partition={} error={}",
                        display_partition(&key),
                        err
                    );
                }
            }
        }

        self.lock_persist()
            .known_partitions
            .extend(loaded_partitions.iter().cloned());
        let count = self.notes.len();
        info!(
            "event=store_load module=store status=ok partitions={} notes={} duration_ms={}",
            loaded_partitions.len(),
            count,
            started_at.elapsed().as_millis()
        );
        self.notify(&StoreEvent::Reloaded(count));
    }

    fn persist_logged(&self, operation: &str) {
        if let Err(err) = self.flush() {
            error!(
                "event=store_persist module=store status=error operation={operation} error={err}"
            );
        }
    }

    fn lock_persist(&self) -> MutexGuard<'_, PersistState> {
        self.persist
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, event: &StoreEvent) {
        let listeners: Vec<StoreListener> = self
            .listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        for listener in &listeners {
            listener(event);
        }
    }
}

fn display_partition(key: &str) -> &str {
    if key.is_empty() {
        "default"
    } else {
        key
    }
}

impl std::fmt::Debug for NoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStore")
            .field("root", &self.config.root)
            .field("notes", &self.notes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteStore, StoreConfig, StoreEvent};
    use crate::model::code_note::CodeNote;
    use crate::model::timestamp;
    use chrono::Duration;
    use std::sync::{Arc, Mutex};

    fn note(project: &str) -> CodeNote {
        CodeNote::new("t", "body", format!("{project}/src/a.rs"), 1, 2, project)
    }

    #[test]
    fn listeners_observe_persisted_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::open(StoreConfig::new(dir.path()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        let id = store.add(note("/p")).unwrap();
        store.update(&id, note("/p")).unwrap();
        store.delete(&id);
        store.delete(&id);

        let events = seen.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                StoreEvent::Added(id.clone()),
                StoreEvent::Updated(id.clone()),
                StoreEvent::Deleted(id),
            ]
        );
    }

    #[test]
    fn add_rejects_inverted_line_range_without_storing() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::open(StoreConfig::new(dir.path()));
        let mut invalid = note("/p");
        invalid.start_line = 9;
        invalid.end_line = 3;

        assert!(store.add(invalid).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn add_raises_stale_updated_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::open(StoreConfig::new(dir.path()));
        let mut skewed = note("/p");
        skewed.updated_time = skewed.created_time - Duration::hours(3);

        let id = store.add(skewed.clone()).unwrap();
        assert_eq!(store.get(&id).unwrap().updated_time, skewed.created_time);
    }

    #[test]
    fn update_accepts_note_created_ahead_of_local_clock() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::open(StoreConfig::new(dir.path()));
        let mut ahead = note("/p");
        ahead.created_time = timestamp::now() + Duration::hours(8);
        ahead.updated_time = ahead.created_time;
        let id = store.add(ahead).unwrap();

        let mut edited = store.get(&id).unwrap();
        edited.title = "edited".to_string();
        assert!(store.update(&id, edited).unwrap());

        let stored = store.get(&id).unwrap();
        assert_eq!(stored.title, "edited");
        assert!(stored.updated_time >= stored.created_time);
    }

    #[test]
    fn listener_may_subscribe_during_notification() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(NoteStore::open(StoreConfig::new(dir.path())));
        let late_events = Arc::new(Mutex::new(Vec::new()));

        let registry = Arc::downgrade(&store);
        let late_sink = Arc::clone(&late_events);
        let registered = Arc::new(Mutex::new(false));
        store.subscribe(move |_| {
            let mut done = registered.lock().unwrap();
            if *done {
                return;
            }
            *done = true;
            if let Some(store) = registry.upgrade() {
                let sink = Arc::clone(&late_sink);
                store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
            }
        });

        let first = store.add(note("/p")).unwrap();
        let second = store.add(note("/p")).unwrap();
        assert_ne!(first, second);
        assert_eq!(
            late_events.lock().unwrap().as_slice(),
            &[StoreEvent::Added(second)]
        );
    }
}
