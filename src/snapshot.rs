//! Snapshot Persistence
//!
//! Whole-state serialization of the database to a single file.
//!
//! ## File Format
//! Two sequential bincode blocks, read back in the same fixed order:
//! - Block 1: the record store (key → value mapping)
//! - Block 2: the index set (field → value → key-bucket mapping)
//!
//! No header, version tag, or checksum. A file that fails to decode is
//! treated as absent (the database starts empty rather than refusing to
//! open).
//!
//! ## Atomicity
//! Every save rewrites the entire state into a sibling `.tmp` file and then
//! renames it over the target, so a crash mid-save leaves the previous
//! complete snapshot intact — never a torn file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, SnapError};
use crate::index::IndexManager;
use crate::store::RecordStore;

/// Handles loading and saving the single snapshot file
#[derive(Debug)]
pub struct Snapshot {
    /// Target snapshot file
    path: PathBuf,

    /// fsync the tmp file before renaming it into place
    sync_writes: bool,
}

impl Snapshot {
    /// Create a snapshot handle from config
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.path.clone(),
            sync_writes: config.sync_writes,
        }
    }

    /// Load the persisted state, if any
    ///
    /// Returns:
    /// - `Ok(Some((store, indexes)))` — file existed and decoded cleanly
    /// - `Ok(None)` — no snapshot file yet
    /// - `Err(_)` — file existed but could not be read or decoded; the
    ///   caller decides the fallback (the database starts empty and logs)
    pub fn load(&self) -> Result<Option<(RecordStore, IndexManager)>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);

        // Blocks are read in the same fixed order they were written.
        let store: RecordStore = bincode::deserialize_from(&mut reader)
            .map_err(|e| SnapError::Serialization(format!("store block: {}", e)))?;
        let indexes: IndexManager = bincode::deserialize_from(&mut reader)
            .map_err(|e| SnapError::Serialization(format!("index block: {}", e)))?;

        Ok(Some((store, indexes)))
    }

    /// Persist the full state, replacing any prior snapshot
    ///
    /// Steps:
    /// 1. Serialize both blocks into `<file>.tmp`
    /// 2. Optionally fsync the tmp file
    /// 3. Rename the tmp file over the target (atomic replace)
    ///
    /// A failed save removes the tmp file so nothing stray is left next to
    /// the (still intact) previous snapshot.
    pub fn save(&self, store: &RecordStore, indexes: &IndexManager) -> Result<()> {
        let tmp = self.tmp_path();

        let result = self
            .write_blocks(&tmp, store, indexes)
            .and_then(|_| fs::rename(&tmp, &self.path).map_err(SnapError::from));

        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }

        result
    }

    /// The snapshot file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Serialize both blocks into the tmp file
    fn write_blocks(&self, tmp: &Path, store: &RecordStore, indexes: &IndexManager) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)?;
        let mut writer = BufWriter::new(file);

        bincode::serialize_into(&mut writer, store)
            .map_err(|e| SnapError::Serialization(format!("store block: {}", e)))?;
        bincode::serialize_into(&mut writer, indexes)
            .map_err(|e| SnapError::Serialization(format!("index block: {}", e)))?;

        writer.flush()?;

        let file = writer
            .into_inner()
            .map_err(|e| SnapError::Serialization(format!("flush tmp snapshot: {}", e)))?;
        if self.sync_writes {
            file.sync_all()?;
        }

        Ok(())
    }

    /// Sibling tmp path: "snapdb.db" → "snapdb.db.tmp"
    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        self.path.with_file_name(format!("{}.tmp", name))
    }
}
