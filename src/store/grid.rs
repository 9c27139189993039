//! Bucket grid
//!
//! One dense two-dimensional array of buckets per dataset, flattened
//! X-major. Dense addressing keeps bucket lookup at O(1) with no
//! hashing, which suits the expected workload of high-frequency point
//! writes to known cells.
//!
//! Capacity policy: each bucket is pre-reserved to one frequency chunk
//! (unless the schema asks for lazy allocation), and grows by exactly
//! one further chunk when full. Amortised, that is one allocation per
//! second of data rather than one per record.

use crate::store::types::{Record, Schema};
use std::sync::Arc;

/// Dense bucket storage for a single dataset
#[derive(Debug)]
pub(crate) struct BucketGrid {
    x_min: i32,
    y_min: i32,
    height: usize,
    /// Slots added per growth step
    chunk: usize,
    /// Buckets hold non-decreasing `when` order
    sorted: bool,
    /// `width * height` buckets, X-major
    buckets: Vec<Vec<Arc<Record>>>,
}

impl BucketGrid {
    /// Allocate the full grid for a validated schema
    pub(crate) fn new(schema: &Schema) -> Self {
        let cells = schema.width() * schema.height();
        let chunk = schema.frequency.reservation();

        let buckets = if schema.lazy_initial_allocate {
            vec![Vec::new(); cells]
        } else {
            (0..cells).map(|_| Vec::with_capacity(chunk)).collect()
        };

        Self {
            x_min: schema.x_min,
            y_min: schema.y_min,
            height: schema.height(),
            chunk,
            sorted: schema.sort_on_insert,
            buckets,
        }
    }

    /// Bucket index for an in-bounds position
    fn index(&self, x: i32, y: i32) -> usize {
        let ix = (x as i64 - self.x_min as i64) as usize;
        let iy = (y as i64 - self.y_min as i64) as usize;
        ix * self.height + iy
    }

    /// Append a validated record, growing the bucket by one frequency
    /// chunk when it is full.
    pub(crate) fn insert(&mut self, record: Arc<Record>) {
        let idx = self.index(record.x, record.y);
        let chunk = self.chunk;
        let bucket = &mut self.buckets[idx];

        if bucket.len() == bucket.capacity() {
            tracing::debug!(
                "growing bucket ({}, {}) by {} slots",
                record.x,
                record.y,
                chunk
            );
            bucket.reserve_exact(chunk);
        }

        bucket.push(record);

        if self.sorted {
            Self::place_tail(bucket);
        }
    }

    /// The bucket minus its tail is already in `when` order; move the
    /// tail into its slot. Equal timestamps keep arrival order.
    fn place_tail(bucket: &mut [Arc<Record>]) {
        let last = bucket.len() - 1;
        let when = bucket[last].when;
        let pos = bucket[..last].partition_point(|r| r.when <= when);
        bucket[pos..].rotate_right(1);
    }

    /// Records stored at one in-bounds cell
    pub(crate) fn bucket(&self, x: i32, y: i32) -> &[Arc<Record>] {
        &self.buckets[self.index(x, y)]
    }

    /// Total records across all buckets
    #[cfg(test)]
    pub(crate) fn record_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    #[cfg(test)]
    fn capacity_at(&self, x: i32, y: i32) -> usize {
        self.buckets[self.index(x, y)].capacity()
    }
}
