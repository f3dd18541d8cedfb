//! Structured logging schema and field name constants for the autofill engine.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Request failed, store unreachable |
//! | WARN  | Store timeout, config value rejected and defaulted |
//! | INFO  | Lifecycle events (startup, shutdown, key backfill) |
//! | DEBUG | Decision points: clause count, autofill vs. disambiguation |
//! | TRACE | Per-candidate scores |
//!
//! ## Personal data
//!
//! Owner names and national IDs are never written to logs. Log field
//! presence (see [`FIELDS_PRESENT`]) and counts instead.

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "match", "db"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "retriever", "scorer", "resolver", "live_store", "legacy_store", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "autofill", "find_candidates", "backfill_keys", "health"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Record store provenance ("live" or "legacy").
pub const PROVENANCE: &str = "provenance";

/// Stored record UUID.
pub const RECORD_ID: &str = "record_id";

/// Comma-separated names of identity fields present on the query.
pub const FIELDS_PRESENT: &str = "fields_present";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records or candidates returned.
pub const RESULT_COUNT: &str = "result_count";

/// Number of any-of clauses sent to the stores.
pub const CLAUSE_COUNT: &str = "clause_count";

/// Per-store candidate limit.
pub const LIMIT: &str = "limit";

/// Highest candidate score in a resolution.
pub const TOP_SCORE: &str = "top_score";

/// Score of a single candidate (TRACE only).
pub const SCORE: &str = "score";

/// Records returned by the live store, or its approximate size in health checks.
pub const LIVE_COUNT: &str = "live_count";

/// Records returned by the legacy registry, or its approximate size in health checks.
pub const LEGACY_COUNT: &str = "legacy_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Database table affected.
pub const DB_TABLE: &str = "db_table";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Whether a resolution produced an autofill match.
pub const MATCHED: &str = "matched";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
