//! # snapdb
//!
//! An embedded, single-file key-value store with:
//! - Secondary-field indexing (opt-in, per field)
//! - Full-snapshot persistence after every mutation
//! - Atomic rename-on-write snapshot files
//! - Single-writer/multi-reader concurrency model
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Database                               │
//! │               (Single Writer / Multi Reader)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────┐
//!   │ RecordStore │          │ IndexManager │
//!   │  (key→val)  │          │ (field→keys) │
//!   └──────┬──────┘          └──────┬───────┘
//!          │                        │
//!          └───────────┬────────────┘
//!                      ▼
//!              ┌─────────────┐
//!              │  Snapshot   │
//!              │ (one file)  │
//!              └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod value;
pub mod store;
pub mod index;
pub mod snapshot;
pub mod db;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SnapError};
pub use config::Config;
pub use db::Database;
pub use value::Value;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of snapdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
