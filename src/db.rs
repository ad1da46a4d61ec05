//! Database Module
//!
//! The core database object that coordinates all components.
//!
//! ## Responsibilities
//! - Coordinate RecordStore, IndexManager, and Snapshot
//! - Serialize mutating operations behind a single write lock
//! - Persist the full state after every successful mutation
//! - Hydrate from the snapshot file on open

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::index::IndexManager;
use crate::snapshot::Snapshot;
use crate::store::RecordStore;
use crate::value::Value;

/// The in-memory state: record store plus built indexes
///
/// Kept together under one lock so readers never see the store and the
/// indexes disagree.
struct State {
    store: RecordStore,
    indexes: IndexManager,
}

/// An embedded, single-file key-value database
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Mutations** (insert/update/delete/build_index): Serialized by
///   `write_lock`
///   - Only ONE mutating operation at a time
///   - Sequence: write_lock → state mutation + index update → snapshot save
///   - The snapshot save runs under a state read lock, so readers are only
///     blocked for the in-memory step, not for file I/O
///
/// - **Reads** (get/scan_all/query/find_by_field): Concurrent
///   - No write_lock needed
///   - Take the state read lock only, and always observe a fully applied
///     mutation (store and indexes move together)
///
/// Persistence failures never fail the mutating call: the in-memory state
/// stays authoritative and the failure goes to the tracing sink. The next
/// successful mutation rewrites the full snapshot anyway.
pub struct Database {
    /// Database configuration
    config: Config,

    /// Record store and index set behind one RwLock
    state: RwLock<State>,

    /// Snapshot reader/writer for the single database file
    snapshot: Snapshot,

    /// Serializes mutating operations
    write_lock: Mutex<()>,
}

impl Database {
    /// Open or create a database backed by the given snapshot file
    ///
    /// Uses default config with the specified path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().path(path.as_ref()).build();
        Self::open_with(config)
    }

    /// Open or create a database with the given config
    ///
    /// On startup:
    /// 1. Create the parent directory if it doesn't exist
    /// 2. Load the snapshot file if present
    /// 3. Fall back to an empty store and index set on any load failure
    ///    (an empty-but-usable database beats refusing to open)
    pub fn open_with(config: Config) -> Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let snapshot = Snapshot::new(&config);

        let (store, indexes) = match snapshot.load() {
            Ok(Some((store, indexes))) => {
                info!(
                    path = %config.path.display(),
                    records = store.len(),
                    indexed_fields = indexes.indexed_fields().len(),
                    "database loaded from snapshot"
                );
                (store, indexes)
            }
            Ok(None) => {
                info!(path = %config.path.display(), "no snapshot found, starting fresh");
                (RecordStore::new(), IndexManager::new())
            }
            Err(e) => {
                warn!(
                    path = %config.path.display(),
                    error = %e,
                    "snapshot load failed, starting empty"
                );
                (RecordStore::new(), IndexManager::new())
            }
        };

        Ok(Self {
            config,
            state: RwLock::new(State { store, indexes }),
            snapshot,
            write_lock: Mutex::new(()),
        })
    }

    // =========================================================================
    // Mutating Operations
    // =========================================================================

    /// Insert a new key-value pair
    ///
    /// Fails with `DuplicateKey` if the key already exists; the stored value
    /// is left untouched and nothing is persisted.
    pub fn insert(&self, key: &str, value: Value) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        {
            let mut state = self.state.write();
            state.store.insert(key, value.clone())?;
            state.indexes.on_insert(key, &value);
        }

        self.persist();
        debug!(key, "inserted");
        Ok(())
    }

    /// Replace the value under an existing key
    ///
    /// Full replacement, not a merge. Fails with `KeyNotFound` if the key is
    /// absent. Built indexes are re-derived for the key: removed from the old
    /// value's buckets, then added under the new value's.
    pub fn update(&self, key: &str, value: Value) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        {
            let mut state = self.state.write();
            let old = state.store.update(key, value.clone())?;
            if let Err(e) = state.indexes.on_update(key, &old, &value) {
                warn!(key, error = %e, "index maintenance on update");
            }
        }

        self.persist();
        debug!(key, "updated");
        Ok(())
    }

    /// Delete a key and its record
    ///
    /// Fails with `KeyNotFound` if the key is absent. The key leaves every
    /// built index; buckets emptied by the removal are dropped.
    pub fn delete(&self, key: &str) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        {
            let mut state = self.state.write();
            let old = state.store.remove(key)?;
            if let Err(e) = state.indexes.on_delete(key, &old) {
                warn!(key, error = %e, "index maintenance on delete");
            }
        }

        self.persist();
        debug!(key, "deleted");
        Ok(())
    }

    /// Build (or fully rebuild) a secondary index on one field
    ///
    /// Scans every current record; map-shaped records carrying the field are
    /// bucketed by field value in scan order. Once built, the field's index
    /// is maintained incrementally by insert/update/delete.
    pub fn build_index(&self, field: &str) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        {
            let mut state = self.state.write();
            let State { store, indexes } = &mut *state;
            indexes.build_index(field, store.iter());
        }

        self.persist();
        debug!(field, "index built");
        Ok(())
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Get a value by key
    ///
    /// Never errors; an absent key is `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.read().store.get(key).cloned()
    }

    /// Return an owned copy of the full key → value mapping
    pub fn scan_all(&self) -> BTreeMap<String, Value> {
        self.state.read().store.scan_all()
    }

    /// Return all values matching a predicate, in key order
    pub fn query<F>(&self, predicate: F) -> Vec<Value>
    where
        F: Fn(&Value) -> bool,
    {
        self.state.read().store.query(predicate)
    }

    /// Find `(key, record)` pairs whose `field` equals `value`
    ///
    /// Served from the field's index, preserving bucket order. A field that
    /// was never built returns an empty list rather than an error.
    pub fn find_by_field(&self, field: &str, value: &Value) -> Vec<(String, Value)> {
        let state = self.state.read();
        state
            .indexes
            .find_keys(field, value)
            .iter()
            .filter_map(|key| {
                state
                    .store
                    .get(key)
                    .map(|record| (key.clone(), record.clone()))
            })
            .collect()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of records
    pub fn len(&self) -> usize {
        self.state.read().store.len()
    }

    /// Whether the database holds no records
    pub fn is_empty(&self) -> bool {
        self.state.read().store.is_empty()
    }

    /// Whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.state.read().store.contains_key(key)
    }

    /// Names of all built index fields, in sorted order
    pub fn indexed_fields(&self) -> Vec<String> {
        self.state.read().indexes.indexed_fields()
    }

    /// The snapshot file path
    pub fn path(&self) -> &Path {
        self.snapshot.path()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Write the full state to the snapshot file
    ///
    /// Called with `write_lock` held, after the in-memory mutation is fully
    /// applied. A failed save is logged and swallowed: in-memory state stays
    /// authoritative, and the next successful mutation re-attempts a full
    /// write.
    fn persist(&self) {
        let state = self.state.read();
        if let Err(e) = self.snapshot.save(&state.store, &state.indexes) {
            warn!(
                path = %self.snapshot.path().display(),
                error = %e,
                "snapshot save failed, in-memory state is ahead of disk"
            );
        }
    }
}
