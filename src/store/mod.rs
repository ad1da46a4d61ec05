//! Record Store Module
//!
//! In-memory key → value mapping with a uniqueness invariant.
//!
//! ## Responsibilities
//! - Own the authoritative key → record mapping
//! - Reject duplicate inserts and missing-key updates/deletes
//! - Serve point reads, full scans, and predicate queries
//!
//! ## Data Structure Choice
//! BTreeMap over HashMap:
//! - Deterministic iteration order, so scans and predicate queries return
//!   the same order on every call
//! - Deterministic snapshot bytes for the same logical state
//!
//! Locking lives in [`crate::db::Database`]; the store itself is a pure
//! structure.

mod records;

pub use records::RecordStore;
