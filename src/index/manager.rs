//! Index Manager
//!
//! Owns every built field index and keeps them consistent with the store.
//!
//! ## Responsibilities
//! - Full rebuild of one field's index from a store scan
//! - Value → key-bucket lookup, preserving bucket order
//! - Incremental maintenance hooks for insert/update/delete

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapError};
use crate::value::Value;

/// One field's index: field value → ordered bucket of keys
///
/// Keys appear at most once per bucket, in the order they were indexed.
pub type FieldIndex = BTreeMap<Value, Vec<String>>;

/// Manages all built field indexes
///
/// ## Consistency invariant:
/// For every built `field` and every stored key `k` whose record carries
/// `field` with value `v`, `k` sits in the bucket for `v` and in no other
/// bucket under that field. Maintenance hooks preserve this; a violation
/// detected during removal is reported as `IndexInconsistency` (the caller
/// logs it, the triggering operation still completes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexManager {
    /// field name → field index
    indexes: BTreeMap<String, FieldIndex>,
}

impl IndexManager {
    /// Create a manager with no built indexes
    pub fn new() -> Self {
        Self {
            indexes: BTreeMap::new(),
        }
    }

    /// Build (or fully rebuild) the index for one field
    ///
    /// Scans the given records in order; every map-shaped record carrying the
    /// field contributes its key to the field value's bucket. Any prior index
    /// for the field is replaced wholesale.
    pub fn build_index<'a, I>(&mut self, field: &str, records: I)
    where
        I: IntoIterator<Item = (&'a String, &'a Value)>,
    {
        let mut index = FieldIndex::new();

        for (key, record) in records {
            if let Some(field_value) = record.field(field) {
                let bucket = index.entry(field_value.clone()).or_default();
                // Bucket keys stay unique even if the same key shows up twice
                // in one scan.
                if !bucket.iter().any(|k| k == key.as_str()) {
                    bucket.push(key.clone());
                }
            }
        }

        self.indexes.insert(field.to_string(), index);
    }

    /// Look up the key bucket for a field value
    ///
    /// Returns an empty slice when the field was never built or the value has
    /// no bucket — lookups are opportunistic, never an error.
    pub fn find_keys(&self, field: &str, value: &Value) -> &[String] {
        self.indexes
            .get(field)
            .and_then(|index| index.get(value))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Maintain built indexes after an insert
    ///
    /// Only fields that have been built react; the new key is appended to the
    /// bucket for its field value, creating the bucket if needed.
    pub fn on_insert(&mut self, key: &str, record: &Value) {
        for (field, index) in self.indexes.iter_mut() {
            if let Some(field_value) = record.field(field) {
                let bucket = index.entry(field_value.clone()).or_default();
                if !bucket.iter().any(|k| k == key) {
                    bucket.push(key.to_string());
                }
            }
        }
    }

    /// Maintain built indexes after a delete
    ///
    /// Symmetric removal: the key leaves the bucket for the removed record's
    /// field value, and a bucket with no keys left is dropped entirely. A key
    /// that should have been bucketed but wasn't is reported as
    /// `IndexInconsistency` after the remaining fields are cleaned up.
    pub fn on_delete(&mut self, key: &str, record: &Value) -> Result<()> {
        let mut inconsistency = None;

        for (field, index) in self.indexes.iter_mut() {
            let Some(field_value) = record.field(field) else {
                continue;
            };

            let mut removed = false;
            let mut drop_bucket = false;
            if let Some(bucket) = index.get_mut(field_value) {
                let before = bucket.len();
                bucket.retain(|k| k != key);
                removed = bucket.len() < before;
                drop_bucket = bucket.is_empty();
            }
            if drop_bucket {
                index.remove(field_value);
            }

            if !removed && inconsistency.is_none() {
                inconsistency = Some(SnapError::IndexInconsistency(format!(
                    "key '{}' missing from bucket for field '{}'",
                    key, field
                )));
            }
        }

        match inconsistency {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Maintain built indexes after an update
    ///
    /// Remove-then-add: the key leaves its old value's buckets before it is
    /// re-bucketed under the new value. Add-only maintenance would leave the
    /// key stranded in the old bucket whenever an update changes an indexed
    /// field.
    pub fn on_update(&mut self, key: &str, old: &Value, new: &Value) -> Result<()> {
        let result = self.on_delete(key, old);
        self.on_insert(key, new);
        result
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Names of all built fields, in sorted order
    pub fn indexed_fields(&self) -> Vec<String> {
        self.indexes.keys().cloned().collect()
    }

    /// Whether a field has a built index
    pub fn is_indexed(&self, field: &str) -> bool {
        self.indexes.contains_key(field)
    }

    /// Whether no index has been built yet
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}
