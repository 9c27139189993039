//! Trellis store
//!
//! This module provides the core spatio-temporal storage:
//!
//! - **types**: Core data structures (Schema, Record, Frequency)
//! - **registry**: Schema validation and the append-only name map
//! - **grid**: Dense per-dataset bucket storage with chunked growth
//! - **stats**: Eventually-consistent per-dataset counters
//! - **engine**: The database orchestrating all components
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   Record → Validate → Bucket append (+ sort) → Stats task
//!
//! Read Path:
//!   Query → Resolve vs Schema → Bucket rectangle scan → Records
//! ```

pub mod engine;
pub mod error;
pub(crate) mod grid;
pub mod registry;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use engine::Database;
pub use error::{Axis, RangeReason, StoreError, StoreResult};
pub use registry::SchemaRegistry;
pub use stats::DatasetStats;
pub use types::{Frequency, Record, Schema};
