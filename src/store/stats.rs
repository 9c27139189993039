//! Dataset statistics
//!
//! Eventually-consistent per-dataset counters: record count, estimated
//! resident size, and the set of observed field names. The insert path
//! schedules updates on a separate task and returns without waiting,
//! so a snapshot taken immediately after an insert may lag it. Handy
//! data for capacity planning, not a transactional view.

use crate::store::types::Record;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

/// A point-in-time view of one dataset's statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    /// Records successfully inserted
    pub record_count: u64,
    /// Estimated resident bytes across those records
    pub total_size: u64,
    /// Distinct field names observed
    pub fields: BTreeSet<String>,
}

impl std::fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Records: {}, Size: {:.2} KB, Fields: {}",
            self.record_count,
            self.total_size as f64 / 1024.0,
            self.fields.len()
        )
    }
}

/// Accumulator cell for one dataset. Mutations take the cell's own
/// lock, never the database lock, so stats writers cannot stall
/// inserts or queries.
#[derive(Debug, Default)]
pub(crate) struct StatsCell {
    inner: Mutex<DatasetStats>,
}

impl StatsCell {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fold one inserted record into the counters
    pub(crate) fn record(&self, record: &Record) {
        let mut stats = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        stats.record_count += 1;
        stats.total_size += record.estimated_size();

        if !stats.fields.contains(&record.name) {
            stats.fields.insert(record.name.clone());
        }
    }

    /// Clone the current counters
    pub(crate) fn snapshot(&self) -> DatasetStats {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
