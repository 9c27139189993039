//! # Trellis
//!
//! An in-memory spatio-temporal database for positioned telemetry:
//! named scalar measurements tagged with an `(x, y)` grid position, a
//! heading in degrees, and a wall-clock timestamp.
//!
//! ## Features
//!
//! - **Dense bucket storage**: O(1) cell addressing over a bounded
//!   floor plan, with capacity reserved per expected insert rate
//! - **Sort-on-insert datasets**: buckets kept in timestamp order,
//!   enabling windowed scans that stop early and `latest` queries
//! - **Structured queries**: per-dimension predicates over position,
//!   heading, and time
//! - **Eventually-consistent stats**: per-dataset counts, sizes, and
//!   field names updated off the insert path
//!
//! ## Modules
//!
//! - [`store`]: Schemas, records, the bucket grid, and the database
//! - [`query`]: Query predicates and planning
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trellis::{Database, Frequency, Query, Record, Schema};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new();
//!
//!     // Datasets are bounded, immutable coordinate spaces
//!     db.create_dataset(
//!         Schema::new("site-a", (0, 10), (0, 10))
//!             .frequency(Frequency::F10KHz)
//!             .sort_on_insert(true),
//!     )
//!     .await?;
//!
//!     // Record a measurement at (1, 1), facing east
//!     db.insert(Record::new("site-a", "temperature", 21, 1, 1).heading(90))
//!         .await?;
//!
//!     // Everything the dataset holds
//!     let records = db.retrieve(&Query::dataset("site-a")).await?;
//!     println!("found {} records", records.len());
//!
//!     Ok(())
//! }
//! ```

pub mod query;
pub mod store;

// Re-export top-level types for convenience
pub use query::{AxisSelect, Query, TimeSelect};
pub use store::{
    Axis, Database, DatasetStats, Frequency, Record, Schema, StoreError, StoreResult,
};
