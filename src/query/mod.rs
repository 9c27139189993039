//! Trellis queries
//!
//! Queries are structured predicates, one tagged selection per
//! dimension, resolved against a dataset's schema before execution:
//!
//! - **predicate**: The `Query` type and its per-dimension selections
//! - **plan**: Resolution of a predicate into clipped bucket ranges
//!   and filters
//!
//! # Execution Pipeline
//!
//! ```text
//! Query → Resolve (clip, pre-check) → Bucket scan → Filter → Records
//! ```

pub(crate) mod plan;
pub mod predicate;

// Re-export commonly used types
pub use predicate::{AxisSelect, Query, TimeSelect};
