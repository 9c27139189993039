//! Query predicates
//!
//! A query names a dataset and, per dimension, a tagged selection:
//! everything, a single value, or a half-open range. The time
//! dimension additionally offers `Latest`, which picks the most recent
//! heading-matching record per visited bucket.
//!
//! # Examples
//!
//! ```
//! use trellis::{AxisSelect, Query};
//!
//! // Everything in the dataset
//! let all = Query::dataset("site-a");
//!
//! // One column of cells, facing roughly north, in a time window
//! let narrow = Query::dataset("site-a")
//!     .x_value(3)
//!     .t_range(315, 360)
//!     .between(1_000, 2_000);
//!
//! assert_eq!(all.y, AxisSelect::All);
//! assert_eq!(narrow.x, AxisSelect::Value(3));
//! ```

use serde::{Deserialize, Serialize};

/// Selection over one integer axis. Ranges are half-open; `Value(v)`
/// is shorthand for `Range { start: v, end: v + 1 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSelect {
    /// No constraint on this axis
    #[default]
    All,
    /// Exactly one coordinate
    Value(i32),
    /// The half-open range `[start, end)`
    Range { start: i32, end: i32 },
}

impl AxisSelect {
    /// Absolute half-open bounds for this selection, given the bounds
    /// that `All` stands for on its axis.
    pub(crate) fn bounds(&self, all_min: i32, all_max: i32) -> (i32, i32) {
        match *self {
            AxisSelect::All => (all_min, all_max),
            AxisSelect::Value(v) => (v, v.saturating_add(1)),
            AxisSelect::Range { start, end } => (start, end),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, AxisSelect::All)
    }
}

/// Selection over the time dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSelect {
    /// No time constraint
    #[default]
    All,
    /// Records with `when` in the half-open `[start, end)`
    Range { start: i64, end: i64 },
    /// The most recent heading-matching record per visited bucket.
    /// Only valid against sort-on-insert datasets.
    Latest,
}

/// A query predicate. Unset dimensions default to `All`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Dataset to query; must be non-empty and registered
    pub dataset: String,
    #[serde(default)]
    pub x: AxisSelect,
    #[serde(default)]
    pub y: AxisSelect,
    /// Heading selection in degrees
    #[serde(default)]
    pub t: AxisSelect,
    #[serde(default)]
    pub time: TimeSelect,
}

impl Query {
    /// Start a query against a dataset, selecting everything
    pub fn dataset(name: impl Into<String>) -> Self {
        Self {
            dataset: name.into(),
            ..Default::default()
        }
    }

    /// Builder method: set the X selection
    pub fn x(mut self, select: AxisSelect) -> Self {
        self.x = select;
        self
    }

    /// Builder method: set the Y selection
    pub fn y(mut self, select: AxisSelect) -> Self {
        self.y = select;
        self
    }

    /// Builder method: set the heading selection
    pub fn t(mut self, select: AxisSelect) -> Self {
        self.t = select;
        self
    }

    /// Builder method: set the time selection
    pub fn time(mut self, select: TimeSelect) -> Self {
        self.time = select;
        self
    }

    /// Select a single X coordinate
    pub fn x_value(self, v: i32) -> Self {
        self.x(AxisSelect::Value(v))
    }

    /// Select the X range `[start, end)`
    pub fn x_range(self, start: i32, end: i32) -> Self {
        self.x(AxisSelect::Range { start, end })
    }

    /// Select a single Y coordinate
    pub fn y_value(self, v: i32) -> Self {
        self.y(AxisSelect::Value(v))
    }

    /// Select the Y range `[start, end)`
    pub fn y_range(self, start: i32, end: i32) -> Self {
        self.y(AxisSelect::Range { start, end })
    }

    /// Select a single heading
    pub fn t_value(self, v: i32) -> Self {
        self.t(AxisSelect::Value(v))
    }

    /// Select the heading range `[start, end)` in degrees
    pub fn t_range(self, start: i32, end: i32) -> Self {
        self.t(AxisSelect::Range { start, end })
    }

    /// Select records with `when` in `[start, end)` milliseconds
    pub fn between(self, start: i64, end: i64) -> Self {
        self.time(TimeSelect::Range { start, end })
    }

    /// Select the most recent record per bucket
    pub fn latest(self) -> Self {
        self.time(TimeSelect::Latest)
    }
}
