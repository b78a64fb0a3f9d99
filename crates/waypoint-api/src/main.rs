//! waypoint-api - HTTP API server for the waypoint aggregation proxy.

mod handlers;

use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waypoint_core::Config;
use waypoint_db::Database;
use waypoint_providers::Providers;

use handlers::{get_businesses, get_events, get_location, get_movies, get_weather};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub providers: Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing (RUST_LOG overrides the default filter)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "waypoint_api=debug,waypoint_db=debug,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    waypoint_db::log_pool_metrics(&db.pool);

    let providers = Providers::from_config(&config);

    let state = AppState { db, providers };

    let app = Router::new()
        .route("/location", get(get_location))
        .route("/weather", get(get_weather))
        .route("/events", get(get_events))
        .route("/yelps", get(get_businesses))
        .route("/movies", get(get_movies))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(
        subsystem = "api",
        component = "server",
        op = "startup",
        %addr,
        "waypoint-api listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Liveness probe: process is up and the record store answers.
async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl IntoResponse {
    let db_ok = sqlx::query("SELECT 1")
        .execute(&state.db.pool)
        .await
        .is_ok();

    let status = if db_ok { "healthy" } else { "degraded" };
    let code = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(serde_json::json!({
            "status": status,
            "version": env!("CARGO_PKG_VERSION"),
            "database": db_ok,
        })),
    )
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// Error type handlers return; maps the core taxonomy onto HTTP statuses.
#[derive(Debug)]
pub enum ApiError {
    Internal(waypoint_core::Error),
    NotFound(String),
    BadRequest(String),
    BadGateway(String),
}

impl From<waypoint_core::Error> for ApiError {
    fn from(err: waypoint_core::Error) -> Self {
        match err {
            waypoint_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            waypoint_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            waypoint_core::Error::Provider(msg) => ApiError::BadGateway(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_maps_core_taxonomy() {
        let e: ApiError = waypoint_core::Error::NotFound("x".to_string()).into();
        assert!(matches!(e, ApiError::NotFound(_)));

        let e: ApiError = waypoint_core::Error::Provider("503".to_string()).into();
        assert!(matches!(e, ApiError::BadGateway(_)));

        let e: ApiError = waypoint_core::Error::InvalidInput("bad".to_string()).into();
        assert!(matches!(e, ApiError::BadRequest(_)));

        let e: ApiError = waypoint_core::Error::Internal("boom".to_string()).into();
        assert!(matches!(e, ApiError::Internal(_)));
    }
}
