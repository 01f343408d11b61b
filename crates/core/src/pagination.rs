//! Pagination clamping helpers shared by list endpoints.

/// Default number of rows returned by list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum number of rows a single list request may return.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Clamp a client-supplied limit into `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a client-supplied offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
