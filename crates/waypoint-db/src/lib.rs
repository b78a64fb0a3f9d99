//! # waypoint-db
//!
//! PostgreSQL record store layer for waypoint.
//!
//! This crate provides:
//! - Connection pool management
//! - One keyed store per cached entity kind
//! - The generic cache resolution engine (`resolve`) that classifies a
//!   lookup as Miss / Hit-Fresh / Hit-Stale and drives the matching
//!   fetch-store-respond branch
//!
//! ## Example
//!
//! ```rust,ignore
//! use waypoint_core::{Freshness, freshness::WEATHER_WINDOW_MS};
//! use waypoint_db::{resolve, Database};
//!
//! let db = Database::connect("postgres://localhost/waypoint").await?;
//! let forecasts = resolve(
//!     &db.weather,
//!     &location.id,
//!     Freshness::Window(WEATHER_WINDOW_MS),
//!     || providers.weather.fetch(location.latitude, location.longitude),
//! )
//! .await?;
//! ```

pub mod cached;
pub mod locations;
pub mod pool;
pub mod resolve;

// Re-export core types
pub use waypoint_core::*;

pub use cached::{CacheStore, PgBusinessStore, PgEventStore, PgForecastStore, PgMovieStore};
pub use locations::{LocationStore, PgLocationRepository};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use resolve::{resolve, resolve_at, resolve_location};

/// Combined database context with every store.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Location repository: the identity anchor.
    pub locations: PgLocationRepository,
    /// Weather forecast store, keyed by location id.
    pub weather: PgForecastStore,
    /// Event store, keyed by location id.
    pub events: PgEventStore,
    /// Business listing store, keyed by location id.
    pub businesses: PgBusinessStore,
    /// Movie store, keyed by region code.
    pub movies: PgMovieStore,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            locations: PgLocationRepository::new(pool.clone()),
            weather: PgForecastStore::new(pool.clone()),
            events: PgEventStore::new(pool.clone()),
            businesses: PgBusinessStore::new(pool.clone()),
            movies: PgMovieStore::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Apply pending migrations from the crate's `migrations/` directory.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Internal(format!("migration failed: {e}")))
    }
}
