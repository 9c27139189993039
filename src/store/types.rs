//! Core data types for the trellis store
//!
//! This module defines the fundamental types used throughout the store:
//! - `Schema`: the immutable configuration of a dataset
//! - `Record`: a single positioned measurement
//! - `Frequency`: expected insert rate, which sizes bucket reservations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Expected insert rate for a dataset.
///
/// Controls how much capacity each bucket reserves up front and how
/// much it grows by when full, so that steady-state writes allocate
/// roughly once per second rather than once per record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// One record per second; also the fallback for anything unstated
    #[default]
    F1Hz,
    F100Hz,
    F1KHz,
    F10KHz,
}

impl Frequency {
    /// Record slots in one reservation chunk: about a second's worth
    /// of writes at the expected rate.
    pub fn reservation(&self) -> usize {
        match self {
            Frequency::F1Hz => 1,
            Frequency::F100Hz => 100,
            Frequency::F1KHz => 1_000,
            Frequency::F10KHz => 10_000,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::F1Hz => write!(f, "1Hz"),
            Frequency::F100Hz => write!(f, "100Hz"),
            Frequency::F1KHz => write!(f, "1kHz"),
            Frequency::F10KHz => write!(f, "10kHz"),
        }
    }
}

/// The immutable configuration of a dataset: a named, bounded
/// coordinate space plus its allocation and ordering flags.
///
/// Bounds are half-open on both axes: a dataset created over
/// `(0, 10)` accepts positions `0..=9`. Schemas are validated and
/// bound once; they are never resized or rebound afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Unique dataset name
    pub dataset: String,
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
    /// Expected insert rate; sizes bucket reservations
    #[serde(default)]
    pub frequency: Frequency,
    /// Keep each bucket in non-decreasing `when` order
    #[serde(default)]
    pub sort_on_insert: bool,
    /// Skip up-front capacity reservation, trading first-write cost
    /// for initial memory
    #[serde(default)]
    pub lazy_initial_allocate: bool,
}

impl Schema {
    /// Create a schema over the half-open ranges `[x.0, x.1)` and
    /// `[y.0, y.1)`, with default frequency and flags.
    pub fn new(dataset: impl Into<String>, x: (i32, i32), y: (i32, i32)) -> Self {
        Self {
            dataset: dataset.into(),
            x_min: x.0,
            x_max: x.1,
            y_min: y.0,
            y_max: y.1,
            frequency: Frequency::default(),
            sort_on_insert: false,
            lazy_initial_allocate: false,
        }
    }

    /// Builder method: set the expected insert rate
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Builder method: keep buckets sorted by `when`
    pub fn sort_on_insert(mut self, sort: bool) -> Self {
        self.sort_on_insert = sort;
        self
    }

    /// Builder method: defer bucket capacity reservation
    pub fn lazy_initial_allocate(mut self, lazy: bool) -> Self {
        self.lazy_initial_allocate = lazy;
        self
    }

    /// Number of bucket columns
    pub fn width(&self) -> usize {
        (self.x_max as i64 - self.x_min as i64) as usize
    }

    /// Number of bucket rows
    pub fn height(&self) -> usize {
        (self.y_max as i64 - self.y_min as i64) as usize
    }

    /// Whether a position falls inside this schema's half-open bounds
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x_min && x < self.x_max && y >= self.y_min && y < self.y_max
    }
}

/// A single positioned measurement.
///
/// Records one named scalar at an `(x, y)` cell with a heading `t` in
/// degrees and a wall-clock timestamp. Labels ride along for callers
/// to filter on externally; the store does not index them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Dataset this record belongs to
    pub dataset: String,
    /// Field identifier for the measurement
    pub name: String,
    /// The measured value
    pub value: i64,
    pub x: i32,
    pub y: i32,
    /// Heading in degrees, `0..=360`
    pub t: i32,
    /// Unix timestamp in milliseconds; never zero for a valid record
    pub when: i64,
    /// Free-form labels, carried through queries but not indexed
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl Record {
    /// Create a record at `(x, y)` stamped with the current wall clock
    pub fn new(
        dataset: impl Into<String>,
        name: impl Into<String>,
        value: i64,
        x: i32,
        y: i32,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            name: name.into(),
            value,
            x,
            y,
            t: 0,
            when: Utc::now().timestamp_millis(),
            labels: HashMap::new(),
        }
    }

    /// Builder method: set the heading in degrees
    pub fn heading(mut self, t: i32) -> Self {
        self.t = t;
        self
    }

    /// Builder method: set the timestamp (Unix milliseconds)
    pub fn at(mut self, when: i64) -> Self {
        self.when = when;
        self
    }

    /// Builder method: attach a label
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Check if this record carries a specific label value
    pub fn has_label(&self, key: &str, value: &str) -> bool {
        self.labels.get(key).map(|v| v == value).unwrap_or(false)
    }

    /// Estimated in-memory size in bytes, used by the stats
    /// accumulator. A deterministic function of contents: fixed
    /// scalar header plus string and label lengths.
    pub fn estimated_size(&self) -> u64 {
        // value(8) + x(4) + y(4) + t(4) + when(8) = 28 bytes
        let label_size: usize = self
            .labels
            .iter()
            .map(|(k, v)| k.len() + v.len() + 16) // 16 bytes overhead per entry
            .sum();
        (28 + self.dataset.len() + self.name.len() + label_size + 24) as u64 // 24 bytes map overhead
    }
}
