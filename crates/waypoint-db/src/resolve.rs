//! Cache resolution engine.
//!
//! One generic protocol for every entity kind: derive the lookup key from
//! the request context, read the store, classify the result as Miss /
//! Hit-Fresh / Hit-Stale, and drive the matching branch. Each kind supplies
//! only its specifics — the key shape, the freshness window, and a fetch
//! capability that calls its provider client.
//!
//! Error policy: read-path store failures propagate (no classification can
//! be made without the rows); write-path failures (insert, purge) are logged
//! and swallowed, since the store is a cache, not the source of truth. A
//! provider fetch failure always surfaces to the caller — never a silent
//! empty result.

use std::future::Future;

use tracing::{debug, warn};

use waypoint_core::{now_ms, CacheEntity, Freshness, Location, LocationKey, NewLocation, Result};

use crate::cached::CacheStore;
use crate::locations::LocationStore;

/// Resolve a dependent entity kind against its store.
///
/// * Miss (no rows): invoke `fetch` exactly once, persist the returned set
///   with conflict-ignoring semantics, and return it.
/// * Hit-Fresh (rows within the window): return the stored rows; no store
///   mutations, no provider call.
/// * Hit-Stale (first row older than the window): purge all rows for the
///   key, then proceed as a Miss with the same key.
///
/// Concurrent callers race unsynchronized: two Misses both fetch but the
/// idempotent insert keeps the stored set duplicate-free; at least one
/// writer wins.
pub async fn resolve<S, F, Fut>(
    store: &S,
    key: &S::Key,
    freshness: Freshness,
    fetch: F,
) -> Result<Vec<S::Entity>>
where
    S: CacheStore,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<S::Entity>>>,
{
    resolve_at(store, key, freshness, now_ms(), fetch).await
}

/// [`resolve`] with an explicit clock, for deterministic freshness tests.
pub async fn resolve_at<S, F, Fut>(
    store: &S,
    key: &S::Key,
    freshness: Freshness,
    now: i64,
    fetch: F,
) -> Result<Vec<S::Entity>>
where
    S: CacheStore,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<S::Entity>>>,
{
    let kind = store.kind();

    // Read-path failure propagates: without the rows there is no branch.
    let rows = store.rows(key).await?;

    if !rows.is_empty() {
        let created_at = rows[0].created_at_ms();
        if !freshness.is_stale(created_at, now) {
            debug!(
                subsystem = "db",
                component = "resolve",
                db_table = kind.table(),
                cache_branch = "hit_fresh",
                row_count = rows.len(),
                age_ms = now - created_at,
                "Serving stored rows"
            );
            return Ok(rows);
        }

        debug!(
            subsystem = "db",
            component = "resolve",
            db_table = kind.table(),
            cache_branch = "hit_stale",
            age_ms = now - created_at,
            "Stored rows stale, purging"
        );
        if let Err(e) = store.purge(key).await {
            // Leftover rows are absorbed by the conflict-ignoring insert.
            warn!(
                subsystem = "db",
                component = "resolve",
                db_table = kind.table(),
                error = %e,
                "Purge of stale rows failed"
            );
        }
    } else {
        debug!(
            subsystem = "db",
            component = "resolve",
            db_table = kind.table(),
            cache_branch = "miss",
            "No stored rows, fetching"
        );
    }

    let fetched = fetch().await?;

    if let Err(e) = store.insert_bulk(key, &fetched).await {
        warn!(
            subsystem = "db",
            component = "resolve",
            db_table = kind.table(),
            error = %e,
            "Cache write failed, serving uncached"
        );
    }

    Ok(fetched)
}

/// Resolve a location by any of its key variants.
///
/// Location is the freshness exception: stored rows are immutable and served
/// unconditionally regardless of age. On a miss, `fetch` geocodes and the
/// insert must succeed — the caller needs the stored row's id to key every
/// dependent lookup, so unlike the dependent kinds a failed location write
/// propagates.
pub async fn resolve_location<S, F, Fut>(store: &S, key: &LocationKey, fetch: F) -> Result<Location>
where
    S: LocationStore,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<NewLocation>>,
{
    if let Some(found) = store.find(key).await? {
        debug!(
            subsystem = "db",
            component = "resolve",
            db_table = "locations",
            cache_branch = "hit_fresh",
            "Serving stored location"
        );
        return Ok(found);
    }

    debug!(
        subsystem = "db",
        component = "resolve",
        db_table = "locations",
        cache_branch = "miss",
        "No stored location, geocoding"
    );
    let fresh = fetch().await?;
    store.insert(&fresh).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use waypoint_core::{EntityKind, Error, Forecast};

    /// In-memory store double with call counters.
    #[derive(Default)]
    struct FakeStore {
        rows: Mutex<Vec<Forecast>>,
        read_calls: AtomicUsize,
        insert_calls: AtomicUsize,
        purge_calls: AtomicUsize,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl FakeStore {
        fn with_rows(rows: Vec<Forecast>) -> Self {
            Self {
                rows: Mutex::new(rows),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl CacheStore for FakeStore {
        type Key = i32;
        type Entity = Forecast;

        fn kind(&self) -> EntityKind {
            EntityKind::Weather
        }

        async fn rows(&self, _key: &i32) -> Result<Vec<Forecast>> {
            self.read_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads {
                return Err(Error::Internal("read failed".to_string()));
            }
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn insert_bulk(&self, _key: &i32, rows: &[Forecast]) -> Result<u64> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(Error::Internal("write failed".to_string()));
            }
            let mut stored = self.rows.lock().unwrap();
            let mut written = 0;
            for row in rows {
                // Natural key here is the display time.
                if !stored.iter().any(|r| r.time == row.time) {
                    stored.push(row.clone());
                    written += 1;
                }
            }
            Ok(written)
        }

        async fn purge(&self, _key: &i32) -> Result<u64> {
            self.purge_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(Error::Internal("purge failed".to_string()));
            }
            let mut stored = self.rows.lock().unwrap();
            let removed = stored.len() as u64;
            stored.clear();
            Ok(removed)
        }
    }

    fn forecast(time: &str, created_at: i64) -> Forecast {
        Forecast {
            forecast: "Partly cloudy".to_string(),
            time: time.to_string(),
            created_at,
        }
    }

    const NOW: i64 = 1_000_000;
    const WINDOW: Freshness = Freshness::Window(60_000);

    #[tokio::test]
    async fn miss_fetches_once_and_persists() {
        let store = FakeStore::default();
        let fetch_calls = AtomicUsize::new(0);

        let result = resolve_at(&store, &1, WINDOW, NOW, || async {
            fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![forecast("Mon", NOW), forecast("Tue", NOW)])
        })
        .await
        .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(fetch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.purge_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.rows.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn hit_fresh_serves_stored_without_mutation_or_fetch() {
        let stored = vec![forecast("Mon", NOW - 59_000)];
        let store = FakeStore::with_rows(stored.clone());
        let fetch_calls = AtomicUsize::new(0);

        let result = resolve_at(&store, &1, WINDOW, NOW, || async {
            fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![forecast("SENTINEL", NOW)])
        })
        .await
        .unwrap();

        assert_eq!(result, stored);
        assert_eq!(fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.purge_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn hit_at_exact_window_edge_is_still_fresh() {
        let store = FakeStore::with_rows(vec![forecast("Mon", NOW - 60_000)]);
        let fetch_calls = AtomicUsize::new(0);

        let result = resolve_at(&store, &1, WINDOW, NOW, || async {
            fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![forecast("SENTINEL", NOW)])
        })
        .await
        .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].time, "Mon");
        assert_eq!(fetch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn hit_stale_purges_then_refetches() {
        let store = FakeStore::with_rows(vec![forecast("Mon", NOW - 61_000)]);
        let fetch_calls = AtomicUsize::new(0);

        let result = resolve_at(&store, &1, WINDOW, NOW, || async {
            fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![forecast("Tue", NOW)])
        })
        .await
        .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].time, "Tue");
        assert_eq!(fetch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.purge_calls.load(Ordering::SeqCst), 1);
        // Stored set was replaced, not appended.
        let stored = store.rows.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].time, "Tue");
    }

    #[tokio::test]
    async fn immutable_rows_never_expire() {
        let ancient = vec![forecast("Mon", 0)];
        let store = FakeStore::with_rows(ancient.clone());

        let fetch_calls = AtomicUsize::new(0);
        let result = resolve_at(&store, &1, Freshness::Immutable, i64::MAX, || async {
            fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![forecast("SENTINEL", NOW)])
        })
        .await
        .unwrap();

        assert_eq!(result, ancient);
        assert_eq!(fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.purge_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn read_failure_propagates() {
        let store = FakeStore {
            fail_reads: true,
            ..Default::default()
        };
        let fetch_calls = AtomicUsize::new(0);

        let result = resolve_at(&store, &1, WINDOW, NOW, || async {
            fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![forecast("SENTINEL", NOW)])
        })
        .await;

        assert!(result.is_err());
        assert_eq!(fetch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn write_failure_is_swallowed_and_fetched_set_served() {
        let store = FakeStore {
            fail_writes: true,
            ..Default::default()
        };

        let result = resolve_at(&store, &1, WINDOW, NOW, || async {
            Ok(vec![forecast("Mon", NOW)])
        })
        .await
        .unwrap();

        // Cache write degraded, response did not.
        assert_eq!(result.len(), 1);
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_purge_failure_still_refetches() {
        let store = FakeStore {
            rows: Mutex::new(vec![forecast("Mon", NOW - 100_000)]),
            fail_writes: true,
            ..Default::default()
        };
        let fetch_calls = AtomicUsize::new(0);

        let result = resolve_at(&store, &1, WINDOW, NOW, || async {
            fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![forecast("Tue", NOW)])
        })
        .await
        .unwrap();

        assert_eq!(result[0].time, "Tue");
        assert_eq!(fetch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.purge_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetch_failure_surfaces_not_silent_empty() {
        let store = FakeStore::default();

        let result: Result<Vec<Forecast>> = resolve_at(&store, &1, WINDOW, NOW, || async {
            Err(Error::Provider("upstream 503".to_string()))
        })
        .await;

        match result {
            Err(Error::Provider(msg)) => assert!(msg.contains("503")),
            other => panic!("expected provider error, got {:?}", other.map(|v| v.len())),
        }
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn idempotent_insert_leaves_single_row() {
        let store = FakeStore::default();
        let rows = vec![forecast("Mon", NOW)];

        store.insert_bulk(&1, &rows).await.unwrap();
        let written = store.insert_bulk(&1, &rows).await.unwrap();

        assert_eq!(written, 0);
        assert_eq!(store.rows.lock().unwrap().len(), 1);
    }

    // =========================================================================
    // LOCATION RESOLUTION
    // =========================================================================

    #[derive(Default)]
    struct FakeLocationStore {
        stored: Mutex<Vec<Location>>,
        insert_calls: AtomicUsize,
    }

    #[async_trait]
    impl LocationStore for FakeLocationStore {
        async fn find(&self, key: &LocationKey) -> Result<Option<Location>> {
            let stored = self.stored.lock().unwrap();
            Ok(stored
                .iter()
                .find(|l| match key {
                    LocationKey::ByText(q) => &l.search_query == q,
                    LocationKey::ByCoordinates {
                        latitude,
                        longitude,
                    } => l.latitude == *latitude && l.longitude == *longitude,
                    LocationKey::ById(id) => l.id == *id,
                })
                .cloned())
        }

        async fn insert(&self, location: &NewLocation) -> Result<Location> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            let mut stored = self.stored.lock().unwrap();
            if let Some(existing) = stored
                .iter()
                .find(|l| l.search_query == location.search_query)
            {
                return Ok(existing.clone());
            }
            let row = Location {
                id: stored.len() as i32 + 1,
                search_query: location.search_query.clone(),
                formatted_query: location.formatted_query.clone(),
                latitude: location.latitude,
                longitude: location.longitude,
                region_code: location.region_code.clone(),
            };
            stored.push(row.clone());
            Ok(row)
        }
    }

    fn seattle() -> NewLocation {
        NewLocation {
            search_query: "Seattle".to_string(),
            formatted_query: "Seattle, WA, USA".to_string(),
            latitude: 47.6062,
            longitude: -122.3321,
            region_code: "US".to_string(),
        }
    }

    #[tokio::test]
    async fn location_miss_geocodes_once_and_persists() {
        let store = FakeLocationStore::default();
        let geocode_calls = AtomicUsize::new(0);

        let loc = resolve_location(&store, &LocationKey::ByText("Seattle".to_string()), || async {
            geocode_calls.fetch_add(1, Ordering::SeqCst);
            Ok(seattle())
        })
        .await
        .unwrap();

        assert_eq!(loc.id, 1);
        assert_eq!(loc.region_code, "US");
        assert_eq!(geocode_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn location_hit_never_refetches_regardless_of_age() {
        let store = FakeLocationStore::default();
        store.insert(&seattle()).await.unwrap();

        let geocode_calls = AtomicUsize::new(0);
        let loc = resolve_location(&store, &LocationKey::ByText("Seattle".to_string()), || async {
            geocode_calls.fetch_add(1, Ordering::SeqCst);
            Ok(seattle())
        })
        .await
        .unwrap();

        assert_eq!(loc.formatted_query, "Seattle, WA, USA");
        assert_eq!(geocode_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn location_resolvable_by_all_three_keys() {
        let store = FakeLocationStore::default();
        let inserted = store.insert(&seattle()).await.unwrap();

        let geocode_calls = AtomicUsize::new(0);
        for key in [
            LocationKey::ByText("Seattle".to_string()),
            LocationKey::ByCoordinates {
                latitude: 47.6062,
                longitude: -122.3321,
            },
            LocationKey::ById(inserted.id),
        ] {
            let loc = resolve_location(&store, &key, || async {
                geocode_calls.fetch_add(1, Ordering::SeqCst);
                Ok(seattle())
            })
            .await
            .unwrap();
            assert_eq!(loc.id, inserted.id);
        }
        assert_eq!(geocode_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn location_geocode_failure_propagates() {
        let store = FakeLocationStore::default();

        let result = resolve_location(&store, &LocationKey::ByText("xyzzy".to_string()), || async {
            Err(Error::NotFound("no geocode result".to_string()))
        })
        .await;

        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
