//! Schema registry
//!
//! The single authority for dataset existence, bounds, and record
//! validation. Names are append-only: once bound, a schema is never
//! rebound, resized, or removed for the process lifetime. Validation
//! lives here so the bucket grid and the query planner can treat
//! their inputs as pre-checked.

use crate::store::error::{Axis, RangeReason, StoreError, StoreResult};
use crate::store::types::{Record, Schema};
use std::collections::HashMap;

/// Registry of dataset schemas
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemata: HashMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a schema and bind its name, returning a reference to
    /// the bound entry. Fails without touching the registry.
    pub fn create(&mut self, schema: Schema) -> StoreResult<&Schema> {
        Self::validate_schema(&schema)?;

        if self.schemata.contains_key(&schema.dataset) {
            return Err(StoreError::DuplicateDataset(schema.dataset));
        }

        let name = schema.dataset.clone();
        Ok(self.schemata.entry(name).or_insert(schema))
    }

    /// Look up a dataset's schema
    pub fn lookup(&self, dataset: &str) -> StoreResult<&Schema> {
        self.schemata
            .get(dataset)
            .ok_or_else(|| StoreError::UnknownDataset(dataset.to_string()))
    }

    /// Clones of every registered schema. The result is owned by the
    /// caller; mutating it cannot resize a dataset or otherwise reach
    /// registry state.
    pub fn list(&self) -> HashMap<String, Schema> {
        self.schemata.clone()
    }

    /// Number of registered datasets
    pub fn len(&self) -> usize {
        self.schemata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemata.is_empty()
    }

    fn validate_schema(schema: &Schema) -> StoreResult<()> {
        if schema.dataset.is_empty() {
            return Err(StoreError::MissingDataset);
        }

        if schema.x_min >= schema.x_max {
            return Err(StoreError::InvalidCoordRange {
                dataset: schema.dataset.clone(),
                axis: Axis::X,
                reason: RangeReason::MinNotBelowMax,
            });
        }

        if schema.y_min >= schema.y_max {
            return Err(StoreError::InvalidCoordRange {
                dataset: schema.dataset.clone(),
                axis: Axis::Y,
                reason: RangeReason::MinNotBelowMax,
            });
        }

        Ok(())
    }

    /// Check a record against its dataset's schema, returning the
    /// schema on success. Position upper bounds are exclusive; the
    /// heading accepts the full `0..=360`.
    pub fn validate_record(&self, record: &Record) -> StoreResult<&Schema> {
        if record.dataset.is_empty() {
            return Err(StoreError::MissingDataset);
        }

        if record.name.is_empty() {
            return Err(StoreError::MissingFieldName);
        }

        let schema = self.lookup(&record.dataset)?;

        if record.x < schema.x_min || record.x >= schema.x_max {
            return Err(StoreError::PositionOutOfBounds {
                dataset: record.dataset.clone(),
                axis: Axis::X,
                min: schema.x_min,
                max: schema.x_max,
                received: record.x,
            });
        }

        if record.y < schema.y_min || record.y >= schema.y_max {
            return Err(StoreError::PositionOutOfBounds {
                dataset: record.dataset.clone(),
                axis: Axis::Y,
                min: schema.y_min,
                max: schema.y_max,
                received: record.y,
            });
        }

        if record.t < 0 || record.t > 360 {
            return Err(StoreError::PositionOutOfBounds {
                dataset: record.dataset.clone(),
                axis: Axis::T,
                min: 0,
                max: 360,
                received: record.t,
            });
        }

        if record.when == 0 {
            return Err(StoreError::MissingWhen);
        }

        Ok(schema)
    }
}
