//! Structured logging field name constants for waypoint.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, cache classifications, config choices |

/// Subsystem originating the log event.
/// Values: "api", "db", "providers"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "resolve", "pool", "geocode", "weather"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "lookup", "fetch", "purge", "insert_bulk"
pub const OPERATION: &str = "op";

/// Record store table affected.
pub const DB_TABLE: &str = "db_table";

/// Number of rows read, written, or deleted.
pub const ROW_COUNT: &str = "row_count";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Cache branch taken by the resolution engine.
/// Values: "miss", "hit_fresh", "hit_stale"
pub const CACHE_BRANCH: &str = "cache_branch";
