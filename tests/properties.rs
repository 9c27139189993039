//! Property-based tests for the trellis store.
//!
//! Uses proptest to verify the store's invariants over arbitrary valid
//! insert sequences: sorted buckets stay sorted, full scans return the
//! exact inserted multiset, axis ranges slice precisely, the schema
//! list is detached from registry state, and stats converge on the
//! truth once writes quiesce.

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;
use trellis::{Database, Query, Record, Schema, StoreError};

fn run<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
        .block_on(future)
}

/// A small bounded schema plus a sequence of valid records for it.
/// Offsets exercise negative and non-zero-based bounds.
fn dataset_strategy() -> impl Strategy<Value = (Schema, Vec<Record>)> {
    (1i32..6, 1i32..6, -20i32..20, -20i32..20).prop_flat_map(|(w, h, x_min, y_min)| {
        prop::collection::vec(
            (
                0..w,
                0..h,
                0i32..=360,
                1i64..10_000,
                prop::sample::select(vec!["temperature", "humidity", "pressure"]),
            ),
            0..60,
        )
        .prop_map(move |raw| {
            let schema = Schema::new("prop", (x_min, x_min + w), (y_min, y_min + h));
            let records = raw
                .into_iter()
                .map(|(dx, dy, t, when, name)| {
                    Record::new("prop", name, 1, x_min + dx, y_min + dy)
                        .heading(t)
                        .at(when)
                })
                .collect();
            (schema, records)
        })
    })
}

/// Comparable identity of a record for multiset equality
fn key(r: &Record) -> (i32, i32, i32, i64, String) {
    (r.x, r.y, r.t, r.when, r.name.clone())
}

async fn populated(schema: Schema, records: &[Record]) -> Database {
    let db = Database::new();
    db.create_dataset(schema).await.unwrap();
    for record in records {
        db.insert(record.clone()).await.unwrap();
    }
    db
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Sort-on-insert buckets are non-decreasing in `when` after any
    /// valid insert sequence.
    #[test]
    fn sorted_buckets_stay_sorted((schema, records) in dataset_strategy()) {
        let schema = schema.sort_on_insert(true);
        let (x_bounds, y_bounds) = ((schema.x_min, schema.x_max), (schema.y_min, schema.y_max));

        run(async move {
            let db = populated(schema, &records).await;

            for x in x_bounds.0..x_bounds.1 {
                for y in y_bounds.0..y_bounds.1 {
                    let bucket = db
                        .retrieve(&Query::dataset("prop").x_value(x).y_value(y))
                        .await
                        .unwrap();
                    for pair in bucket.windows(2) {
                        prop_assert!(pair[0].when <= pair[1].when);
                    }
                }
            }
            Ok(())
        })?;
    }

    /// A retrieve with every predicate left at `All` returns exactly
    /// the inserted multiset.
    #[test]
    fn full_scan_returns_inserted_multiset((schema, records) in dataset_strategy()) {
        run(async move {
            let db = populated(schema, &records).await;

            let stored = db.retrieve(&Query::dataset("prop")).await.unwrap();

            let mut expected: Vec<_> = records.iter().map(key).collect();
            let mut actual: Vec<_> = stored.iter().map(|r| key(r)).collect();
            expected.sort();
            actual.sort();
            prop_assert_eq!(expected, actual);
            Ok(())
        })?;
    }

    /// An X range returns exactly the inserts whose `x` lies in it.
    #[test]
    fn x_range_slices_exactly(
        (schema, records) in dataset_strategy(),
        a in -25i32..25,
        span in 0i32..12,
    ) {
        let b = a + span;
        run(async move {
            let db = populated(schema, &records).await;

            let sliced = db
                .retrieve(&Query::dataset("prop").x_range(a, b))
                .await
                .unwrap();

            let mut expected: Vec<_> = records
                .iter()
                .filter(|r| r.x >= a && r.x < b)
                .map(key)
                .collect();
            let mut actual: Vec<_> = sliced.iter().map(|r| key(r)).collect();
            expected.sort();
            actual.sort();
            prop_assert_eq!(expected, actual);
            Ok(())
        })?;
    }

    /// A heading range returns exactly the inserts whose `t` lies in it.
    #[test]
    fn heading_range_slices_exactly(
        (schema, records) in dataset_strategy(),
        a in 0i32..=360,
        span in 0i32..90,
    ) {
        let b = a + span;
        run(async move {
            let db = populated(schema, &records).await;

            let sliced = db
                .retrieve(&Query::dataset("prop").t_range(a, b))
                .await
                .unwrap();

            let mut expected: Vec<_> = records
                .iter()
                .filter(|r| r.t >= a && r.t < b)
                .map(key)
                .collect();
            let mut actual: Vec<_> = sliced.iter().map(|r| key(r)).collect();
            expected.sort();
            actual.sort();
            prop_assert_eq!(expected, actual);
            Ok(())
        })?;
    }

    /// Listing schemas is idempotent, and mutating a returned map
    /// never affects later calls.
    #[test]
    fn list_schemas_is_idempotent((schema, _) in dataset_strategy()) {
        run(async move {
            let db = Database::new();
            db.create_dataset(schema).await.unwrap();

            let mut first = db.list_schemas().await;
            let second = db.list_schemas().await;
            prop_assert_eq!(&first, &second);

            first.get_mut("prop").unwrap().x_max = i32::MAX;
            first.clear();

            prop_assert_eq!(db.list_schemas().await, second);
            Ok(())
        })?;
    }

    /// Re-creating a dataset under the same name always fails.
    #[test]
    fn duplicate_create_fails((schema, _) in dataset_strategy()) {
        run(async move {
            let db = Database::new();
            db.create_dataset(schema.clone()).await.unwrap();

            let err = db.create_dataset(schema).await.unwrap_err();
            prop_assert!(matches!(err, StoreError::DuplicateDataset(_)));
            Ok(())
        })?;
    }
}

proptest! {
    // Fewer cases: each one waits for background stats tasks
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// After quiescence, stats match the successful inserts exactly.
    #[test]
    fn stats_converge_after_quiescence((schema, records) in dataset_strategy()) {
        run(async move {
            let db = populated(schema, &records).await;

            let expected_fields: BTreeSet<String> =
                records.iter().map(|r| r.name.clone()).collect();

            let mut stats = None;
            for _ in 0..200 {
                let snapshot = db.stats().await.remove("prop").unwrap();
                if snapshot.record_count == records.len() as u64 {
                    stats = Some(snapshot);
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }

            let stats = stats.expect("stats never converged");
            prop_assert_eq!(stats.record_count, records.len() as u64);
            prop_assert_eq!(stats.fields, expected_fields);
            prop_assert_eq!(
                stats.total_size,
                records.iter().map(Record::estimated_size).sum::<u64>()
            );
            Ok(())
        })?;
    }
}
