//! Query planning
//!
//! Resolves a `Query` against its dataset's schema: absolute bucket
//! ranges clipped to the schema's bounds, an optional heading filter,
//! the time mode, and the latest-mode sort pre-check. The executor can
//! then iterate the minimal bucket rectangle without re-validating
//! anything.

use crate::query::predicate::{AxisSelect, Query, TimeSelect};
use crate::store::error::{StoreError, StoreResult};
use crate::store::types::Schema;

/// Time filtering mode after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeMode {
    /// No time filter
    All,
    /// Keep records with `when` in `[start, end)`
    Range { start: i64, end: i64 },
    /// Most recent heading-matching record per bucket
    Latest,
}

/// A query resolved against a schema, ready for bucket iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedQuery {
    /// Absolute half-open X range, clipped to the schema
    pub(crate) x: (i32, i32),
    /// Absolute half-open Y range, clipped to the schema
    pub(crate) y: (i32, i32),
    /// Half-open heading filter; `None` when T is unconstrained
    pub(crate) t: Option<(i32, i32)>,
    pub(crate) time: TimeMode,
    /// Whether buckets hold non-decreasing `when` order, enabling the
    /// early break once a time range is exhausted
    pub(crate) sorted: bool,
}

impl ResolvedQuery {
    pub(crate) fn new(query: &Query, schema: &Schema) -> StoreResult<Self> {
        let time = match query.time {
            TimeSelect::All => TimeMode::All,
            TimeSelect::Range { start, end } => TimeMode::Range { start, end },
            TimeSelect::Latest => {
                // Latest semantics rely on bucket ordering
                if !schema.sort_on_insert {
                    return Err(StoreError::UnsortedDataset(schema.dataset.clone()));
                }
                TimeMode::Latest
            }
        };

        let x = clip(
            query.x.bounds(schema.x_min, schema.x_max),
            (schema.x_min, schema.x_max),
        );
        let y = clip(
            query.y.bounds(schema.y_min, schema.y_max),
            (schema.y_min, schema.y_max),
        );

        let t = match query.t {
            AxisSelect::All => None,
            select => Some(select.bounds(0, 360)),
        };

        tracing::debug!(
            "resolved query on {}: x={:?} y={:?} t={:?} time={:?}",
            schema.dataset,
            x,
            y,
            t,
            time
        );

        Ok(Self {
            x,
            y,
            t,
            time,
            sorted: schema.sort_on_insert,
        })
    }

    /// Whether a record's heading passes the resolved T filter
    pub(crate) fn heading_matches(&self, t: i32) -> bool {
        match self.t {
            None => true,
            Some((min, max)) => t >= min && t < max,
        }
    }
}

/// Intersect a requested half-open range with the schema's bounds. A
/// request entirely outside collapses to an empty range rather than an
/// error, so such queries succeed with zero records.
fn clip(requested: (i32, i32), bounds: (i32, i32)) -> (i32, i32) {
    let start = requested.0.max(bounds.0);
    let end = requested.1.min(bounds.1);

    if start >= end {
        (start, start)
    } else {
        (start, end)
    }
}
