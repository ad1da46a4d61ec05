//! Error types for snapdb
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SnapError
pub type Result<T> = std::result::Result<T, SnapError>;

/// Unified error type for snapdb operations
#[derive(Debug, Error)]
pub enum SnapError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Key Errors (caller-visible, abort before any mutation)
    // -------------------------------------------------------------------------
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),

    // -------------------------------------------------------------------------
    // Persistence Errors (swallowed at the snapshot boundary, logged)
    // -------------------------------------------------------------------------
    #[error("snapshot serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Index Errors (detected during maintenance, logged, never fatal)
    // -------------------------------------------------------------------------
    #[error("index inconsistency: {0}")]
    IndexInconsistency(String),
}
