//! RecordStore implementation
//!
//! BTreeMap-based key → value table with a uniqueness invariant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapError};
use crate::value::Value;

/// The key → record mapping
///
/// Keys are unique. Key-existence errors are returned before any mutation, so
/// a rejected operation never leaves a partial change behind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordStore {
    records: BTreeMap<String, Value>,
}

impl RecordStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Insert a new key-value pair
    ///
    /// Fails with `DuplicateKey` if the key is already present; the existing
    /// value is left untouched.
    pub fn insert(&mut self, key: &str, value: Value) -> Result<()> {
        if self.records.contains_key(key) {
            return Err(SnapError::DuplicateKey(key.to_string()));
        }
        self.records.insert(key.to_string(), value);
        Ok(())
    }

    /// Replace the value under an existing key
    ///
    /// Full replacement, not a merge. Fails with `KeyNotFound` if the key is
    /// absent. Returns the previous value so index maintenance can unbucket it.
    pub fn update(&mut self, key: &str, value: Value) -> Result<Value> {
        match self.records.get_mut(key) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(SnapError::KeyNotFound(key.to_string())),
        }
    }

    /// Remove a key and return its value
    ///
    /// Fails with `KeyNotFound` if the key is absent.
    pub fn remove(&mut self, key: &str) -> Result<Value> {
        self.records
            .remove(key)
            .ok_or_else(|| SnapError::KeyNotFound(key.to_string()))
    }

    /// Get a value by key
    ///
    /// Never errors; an absent key is `None`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.records.get(key)
    }

    /// Return an owned copy of the full key → value mapping
    ///
    /// The copy is detached: mutating it cannot corrupt the store.
    pub fn scan_all(&self) -> BTreeMap<String, Value> {
        self.records.clone()
    }

    /// Return all values matching a predicate, in key order
    pub fn query<F>(&self, predicate: F) -> Vec<Value>
    where
        F: Fn(&Value) -> bool,
    {
        self.records
            .values()
            .filter(|v| predicate(v))
            .cloned()
            .collect()
    }

    /// Iterate over `(key, value)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.records.iter()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }
}
