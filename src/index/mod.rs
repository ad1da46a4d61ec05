//! Secondary Index Module
//!
//! Opt-in, per-field secondary indexes over map-shaped records.
//!
//! ## Responsibilities
//! - Build a field's index from a full store scan on request
//! - Serve value → key-bucket lookups for built fields
//! - Keep built indexes consistent across insert/update/delete
//!
//! A field participates only after an explicit build; unbuilt fields cost
//! nothing and lookups against them return an empty result rather than an
//! error.

mod manager;

pub use manager::{FieldIndex, IndexManager};
