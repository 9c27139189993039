//! Trellis database engine
//!
//! The main engine orchestrates all components:
//! - Write path: Record → validate → bucket append (+ optional sort) → stats task
//! - Read path: Query → resolve against schema → bucket rectangle scan → records
//!
//! Thread-safe via a single read/write lock over the registry and the
//! bucket grids: writers exclude everything, readers proceed in
//! parallel. Stats cells carry their own locks and are updated from
//! spawned tasks, so they trail inserts by design.

use crate::query::plan::{ResolvedQuery, TimeMode};
use crate::query::predicate::Query;
use crate::store::error::{StoreError, StoreResult};
use crate::store::grid::BucketGrid;
use crate::store::registry::SchemaRegistry;
use crate::store::stats::{DatasetStats, StatsCell};
use crate::store::types::{Record, Schema};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// State guarded by the database lock. The registry and the grids
/// move together: a dataset is visible in both or in neither.
#[derive(Debug, Default)]
struct DbInner {
    registry: SchemaRegistry,
    grids: HashMap<String, BucketGrid>,
    stats: HashMap<String, Arc<StatsCell>>,
}

/// The top-level trellis database: named datasets of positioned
/// records, created once and resident for the process lifetime.
///
/// `Database` is a cheap handle; clones share the same store. All
/// operations are safe to call from many tasks concurrently.
#[derive(Debug, Default, Clone)]
pub struct Database {
    inner: Arc<RwLock<DbInner>>,
}

impl Database {
    /// Create an empty database. All the interesting tunables live on
    /// the individual dataset schemas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a schema, bind its name, and allocate the full bucket
    /// grid.
    ///
    /// Schemas carry the per-dataset tunables:
    ///
    /// - `frequency` caps reallocation at roughly once per second by
    ///   reserving a second's worth of slots per bucket;
    /// - `sort_on_insert` keeps buckets in ascending `when` order,
    ///   buying faster time queries and `latest` support for slower
    ///   inserts on large buckets;
    /// - `lazy_initial_allocate` skips the up-front reservation for
    ///   datasets where only a few cells will ever be written.
    pub async fn create_dataset(&self, schema: Schema) -> StoreResult<()> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let schema = inner.registry.create(schema)?;

        tracing::info!(
            "created dataset {} ({}x{} buckets, {} per chunk)",
            schema.dataset,
            schema.width(),
            schema.height(),
            schema.frequency.reservation()
        );

        inner
            .grids
            .insert(schema.dataset.clone(), BucketGrid::new(schema));
        inner
            .stats
            .insert(schema.dataset.clone(), Arc::new(StatsCell::new()));

        Ok(())
    }

    /// Validate a record and append it to its bucket.
    ///
    /// The write lock is held for the whole mutation, so a failed
    /// insert leaves no partial state, and inserts from one caller are
    /// observed in submission order. The stats update is spawned and
    /// not awaited; see [`Database::stats`].
    pub async fn insert(&self, record: Record) -> StoreResult<()> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        inner.registry.validate_record(&record)?;

        let grid = inner
            .grids
            .get_mut(&record.dataset)
            .ok_or_else(|| StoreError::UnknownDataset(record.dataset.clone()))?;
        let stats = inner
            .stats
            .get(&record.dataset)
            .map(Arc::clone)
            .ok_or_else(|| StoreError::UnknownDataset(record.dataset.clone()))?;

        let record = Arc::new(record);
        grid.insert(Arc::clone(&record));

        drop(guard);

        // Stats are eventually consistent
        tokio::spawn(async move {
            stats.record(&record);
        });

        Ok(())
    }

    /// Resolve a query and return the matching records.
    ///
    /// Results come bucket-by-bucket in X-major then Y-major order;
    /// within a bucket, in stored order (insertion order, or ascending
    /// `when` for sort-on-insert datasets). An empty result is a
    /// success, not an error. Callers needing a global ordering merge
    /// externally.
    pub async fn retrieve(&self, query: &Query) -> StoreResult<Vec<Arc<Record>>> {
        if query.dataset.is_empty() {
            return Err(StoreError::MissingDataset);
        }

        let inner = self.inner.read().await;

        let schema = inner.registry.lookup(&query.dataset)?;
        let plan = ResolvedQuery::new(query, schema)?;
        let grid = inner
            .grids
            .get(&query.dataset)
            .ok_or_else(|| StoreError::UnknownDataset(query.dataset.clone()))?;

        let mut results = Vec::new();

        for x in plan.x.0..plan.x.1 {
            for y in plan.y.0..plan.y.1 {
                let bucket = grid.bucket(x, y);

                if plan.time == TimeMode::Latest {
                    // Newest first; the first heading match wins the
                    // bucket. Latest is a per-bucket pick, so no time
                    // window applies.
                    if let Some(record) = bucket.iter().rev().find(|r| plan.heading_matches(r.t)) {
                        results.push(Arc::clone(record));
                    }
                    continue;
                }

                for record in bucket {
                    if let TimeMode::Range { start, end } = plan.time {
                        if record.when < start {
                            continue;
                        }

                        if record.when >= end {
                            if plan.sorted {
                                // The rest of the bucket is newer still
                                break;
                            }

                            continue;
                        }
                    }

                    if !plan.heading_matches(record.t) {
                        continue;
                    }

                    results.push(Arc::clone(record));
                }
            }
        }

        Ok(results)
    }

    /// Clones of every registered schema.
    ///
    /// Deliberately copies rather than sharing: handing out the live
    /// schemata would let a caller resize a dataset by poking at
    /// `x_max`, which would break bucket addressing. Trellis datasets
    /// don't work like that.
    pub async fn list_schemas(&self) -> HashMap<String, Schema> {
        self.inner.read().await.registry.list()
    }

    /// Point-in-time stats snapshot per dataset: record counts,
    /// estimated sizes, observed field names. Updates run behind the
    /// insert path, so a snapshot taken immediately after an insert
    /// may not include it yet.
    pub async fn stats(&self) -> HashMap<String, DatasetStats> {
        let inner = self.inner.read().await;

        inner
            .stats
            .iter()
            .map(|(dataset, cell)| (dataset.clone(), cell.snapshot()))
            .collect()
    }
}
