//! Keyed stores for the cached dependent datasets.
//!
//! One store per dependent entity kind (weather, events, businesses, movies),
//! all behind the [`CacheStore`] trait the resolution engine drives. Rows are
//! created in bulk per successful provider fetch and deleted in bulk per
//! owner key when stale; individual rows are never updated.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use waypoint_core::{Business, CacheEntity, EntityKind, Error, Event, Forecast, Movie, Result};

/// A keyed record store for one cached entity kind.
///
/// `Key` is the owner key scoping lookup, insert, and purge: the location id
/// for weather/events/businesses, the region code for movies.
#[async_trait]
pub trait CacheStore: Send + Sync {
    type Key: Send + Sync;
    type Entity: CacheEntity + Send + Sync;

    /// Entity kind this store backs (used for logging).
    fn kind(&self) -> EntityKind;

    /// All stored rows for the key, in insertion order.
    async fn rows(&self, key: &Self::Key) -> Result<Vec<Self::Entity>>;

    /// Insert a fetched row set under the key.
    ///
    /// Conflict-ignoring on the natural key: a duplicate insert is a no-op,
    /// not an error. Returns the number of rows actually written.
    async fn insert_bulk(&self, key: &Self::Key, rows: &[Self::Entity]) -> Result<u64>;

    /// Delete all rows for the key. Returns the number of rows removed.
    async fn purge(&self, key: &Self::Key) -> Result<u64>;
}

// =============================================================================
// WEATHER
// =============================================================================

/// PostgreSQL store for the `weather` table, keyed by location id.
#[derive(Clone)]
pub struct PgForecastStore {
    pool: Pool<Postgres>,
}

impl PgForecastStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheStore for PgForecastStore {
    type Key = i32;
    type Entity = Forecast;

    fn kind(&self) -> EntityKind {
        EntityKind::Weather
    }

    async fn rows(&self, key: &i32) -> Result<Vec<Forecast>> {
        sqlx::query_as::<_, Forecast>(
            "SELECT forecast, time, created_at FROM weather WHERE location_id = $1 ORDER BY id",
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Store)
    }

    async fn insert_bulk(&self, key: &i32, rows: &[Forecast]) -> Result<u64> {
        let mut written = 0;
        for row in rows {
            written += sqlx::query(
                r#"
                INSERT INTO weather (forecast, time, created_at, location_id)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (location_id, time) DO NOTHING
                "#,
            )
            .bind(&row.forecast)
            .bind(&row.time)
            .bind(row.created_at)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(Error::Store)?
            .rows_affected();
        }
        debug!(
            subsystem = "db",
            component = "weather",
            op = "insert_bulk",
            db_table = "weather",
            row_count = written,
            "Persisted forecast rows"
        );
        Ok(written)
    }

    async fn purge(&self, key: &i32) -> Result<u64> {
        let removed = sqlx::query("DELETE FROM weather WHERE location_id = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(Error::Store)?
            .rows_affected();
        debug!(
            subsystem = "db",
            component = "weather",
            op = "purge",
            db_table = "weather",
            row_count = removed,
            "Purged stale forecast rows"
        );
        Ok(removed)
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// PostgreSQL store for the `events` table, keyed by location id.
#[derive(Clone)]
pub struct PgEventStore {
    pool: Pool<Postgres>,
}

impl PgEventStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheStore for PgEventStore {
    type Key = i32;
    type Entity = Event;

    fn kind(&self) -> EntityKind {
        EntityKind::Event
    }

    async fn rows(&self, key: &i32) -> Result<Vec<Event>> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT link, name, event_date, summary, created_at
            FROM events WHERE location_id = $1 ORDER BY id
            "#,
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Store)
    }

    async fn insert_bulk(&self, key: &i32, rows: &[Event]) -> Result<u64> {
        let mut written = 0;
        for row in rows {
            written += sqlx::query(
                r#"
                INSERT INTO events (link, name, event_date, summary, created_at, location_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (location_id, link) DO NOTHING
                "#,
            )
            .bind(&row.link)
            .bind(&row.name)
            .bind(&row.event_date)
            .bind(&row.summary)
            .bind(row.created_at)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(Error::Store)?
            .rows_affected();
        }
        debug!(
            subsystem = "db",
            component = "events",
            op = "insert_bulk",
            db_table = "events",
            row_count = written,
            "Persisted event rows"
        );
        Ok(written)
    }

    async fn purge(&self, key: &i32) -> Result<u64> {
        let removed = sqlx::query("DELETE FROM events WHERE location_id = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(Error::Store)?
            .rows_affected();
        Ok(removed)
    }
}

// =============================================================================
// BUSINESSES
// =============================================================================

/// PostgreSQL store for the `yelps` table, keyed by location id.
#[derive(Clone)]
pub struct PgBusinessStore {
    pool: Pool<Postgres>,
}

impl PgBusinessStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheStore for PgBusinessStore {
    type Key = i32;
    type Entity = Business;

    fn kind(&self) -> EntityKind {
        EntityKind::Business
    }

    async fn rows(&self, key: &i32) -> Result<Vec<Business>> {
        sqlx::query_as::<_, Business>(
            r#"
            SELECT name, image_url, price, rating, url, created_at
            FROM yelps WHERE location_id = $1 ORDER BY id
            "#,
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Store)
    }

    async fn insert_bulk(&self, key: &i32, rows: &[Business]) -> Result<u64> {
        let mut written = 0;
        for row in rows {
            written += sqlx::query(
                r#"
                INSERT INTO yelps (name, image_url, price, rating, url, created_at, location_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (location_id, url) DO NOTHING
                "#,
            )
            .bind(&row.name)
            .bind(&row.image_url)
            .bind(&row.price)
            .bind(row.rating)
            .bind(&row.url)
            .bind(row.created_at)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(Error::Store)?
            .rows_affected();
        }
        debug!(
            subsystem = "db",
            component = "businesses",
            op = "insert_bulk",
            db_table = "yelps",
            row_count = written,
            "Persisted business rows"
        );
        Ok(written)
    }

    async fn purge(&self, key: &i32) -> Result<u64> {
        let removed = sqlx::query("DELETE FROM yelps WHERE location_id = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(Error::Store)?
            .rows_affected();
        Ok(removed)
    }
}

// =============================================================================
// MOVIES
// =============================================================================

/// PostgreSQL store for the `movies` table, keyed by region code.
///
/// Every location resolving to the same region shares this cache entry.
#[derive(Clone)]
pub struct PgMovieStore {
    pool: Pool<Postgres>,
}

impl PgMovieStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheStore for PgMovieStore {
    type Key = String;
    type Entity = Movie;

    fn kind(&self) -> EntityKind {
        EntityKind::Movie
    }

    async fn rows(&self, key: &String) -> Result<Vec<Movie>> {
        sqlx::query_as::<_, Movie>(
            r#"
            SELECT title, overview, average_votes, total_votes, image_url,
                   popularity, released_on, created_at
            FROM movies WHERE region_code = $1 ORDER BY id
            "#,
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Store)
    }

    async fn insert_bulk(&self, key: &String, rows: &[Movie]) -> Result<u64> {
        let mut written = 0;
        for row in rows {
            written += sqlx::query(
                r#"
                INSERT INTO movies (title, overview, average_votes, total_votes, image_url,
                                    popularity, released_on, created_at, region_code)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (region_code, title) DO NOTHING
                "#,
            )
            .bind(&row.title)
            .bind(&row.overview)
            .bind(row.average_votes)
            .bind(row.total_votes)
            .bind(&row.image_url)
            .bind(row.popularity)
            .bind(&row.released_on)
            .bind(row.created_at)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(Error::Store)?
            .rows_affected();
        }
        debug!(
            subsystem = "db",
            component = "movies",
            op = "insert_bulk",
            db_table = "movies",
            row_count = written,
            "Persisted movie rows"
        );
        Ok(written)
    }

    async fn purge(&self, key: &String) -> Result<u64> {
        let removed = sqlx::query("DELETE FROM movies WHERE region_code = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(Error::Store)?
            .rows_affected();
        Ok(removed)
    }
}
