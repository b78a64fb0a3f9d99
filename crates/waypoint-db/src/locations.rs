//! Location repository implementation.
//!
//! Locations are the identity anchor for every dependent dataset. Rows are
//! immutable once created: the engine never updates, deletes, or re-fetches
//! them, so no freshness column exists on this table.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use waypoint_core::{Error, Location, LocationKey, NewLocation, Result};

/// Store seam for location rows, so the resolution engine can be exercised
/// against an in-memory double.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Look up a location by any key variant.
    async fn find(&self, key: &LocationKey) -> Result<Option<Location>>;

    /// Idempotently insert a geocoded location, returning the stored row.
    async fn insert(&self, location: &NewLocation) -> Result<Location>;
}

/// PostgreSQL repository for the `locations` table.
#[derive(Clone)]
pub struct PgLocationRepository {
    pool: Pool<Postgres>,
}

impl PgLocationRepository {
    /// Create a new PgLocationRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Look up a location by any of its three identity attributes.
    ///
    /// All variants read the same table; the key only selects the column
    /// matched against. Returns `Ok(None)` on a cache miss — the caller
    /// decides whether that means "geocode now" or "bad request".
    pub async fn find(&self, key: &LocationKey) -> Result<Option<Location>> {
        const COLUMNS: &str =
            "id, search_query, formatted_query, latitude, longitude, region_code";

        let row = match key {
            LocationKey::ByText(query) => {
                sqlx::query_as::<_, Location>(&format!(
                    "SELECT {COLUMNS} FROM locations WHERE search_query = $1"
                ))
                .bind(query)
                .fetch_optional(&self.pool)
                .await
            }
            LocationKey::ByCoordinates {
                latitude,
                longitude,
            } => {
                sqlx::query_as::<_, Location>(&format!(
                    "SELECT {COLUMNS} FROM locations WHERE latitude = $1 AND longitude = $2"
                ))
                .bind(latitude)
                .bind(longitude)
                .fetch_optional(&self.pool)
                .await
            }
            LocationKey::ById(id) => {
                sqlx::query_as::<_, Location>(&format!(
                    "SELECT {COLUMNS} FROM locations WHERE id = $1"
                ))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(Error::Store)?;

        debug!(
            subsystem = "db",
            component = "locations",
            op = "lookup",
            found = row.is_some(),
            "Location lookup"
        );
        Ok(row)
    }

    /// Insert a freshly geocoded location, returning the stored row.
    ///
    /// Insert is conflict-ignoring on the natural key (`search_query`): a
    /// concurrent duplicate insert is silently dropped and the established
    /// row is re-selected, so the caller always gets a row with its id.
    pub async fn insert(&self, location: &NewLocation) -> Result<Location> {
        let inserted = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (search_query, formatted_query, latitude, longitude, region_code)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (search_query) DO NOTHING
            RETURNING id, search_query, formatted_query, latitude, longitude, region_code
            "#,
        )
        .bind(&location.search_query)
        .bind(&location.formatted_query)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(&location.region_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Store)?;

        if let Some(row) = inserted {
            return Ok(row);
        }

        // Lost the insert race; the winning row is authoritative.
        self.find(&LocationKey::ByText(location.search_query.clone()))
            .await?
            .ok_or_else(|| {
                Error::Internal(format!(
                    "location '{}' vanished between conflict and re-select",
                    location.search_query
                ))
            })
    }
}

#[async_trait]
impl LocationStore for PgLocationRepository {
    async fn find(&self, key: &LocationKey) -> Result<Option<Location>> {
        PgLocationRepository::find(self, key).await
    }

    async fn insert(&self, location: &NewLocation) -> Result<Location> {
        PgLocationRepository::insert(self, location).await
    }
}
