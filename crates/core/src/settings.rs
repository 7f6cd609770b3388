//! Well-known setting keys for the cleanup policy.
//!
//! Settings live in a durable key-value table so that policy changes made
//! through the admin API survive restarts. Values are stored as strings.

/// Whether the cleanup sweeper is allowed to delete anything.
pub const CLEANUP_ENABLED: &str = "cleanup_enabled";
/// Retention horizon in hours, measured from the first download.
pub const CLEANUP_MAX_AGE_HOURS: &str = "cleanup_max_age_hours";
/// RFC 3339 timestamp of the last executed (non-skipped) sweep.
pub const CLEANUP_LAST_RUN: &str = "cleanup_last_run";

/// All keys the settings API accepts.
pub const KNOWN_KEYS: [&str; 3] = [CLEANUP_ENABLED, CLEANUP_MAX_AGE_HOURS, CLEANUP_LAST_RUN];

/// Returns `true` if `key` is one of the known setting keys.
pub fn is_known_key(key: &str) -> bool {
    KNOWN_KEYS.contains(&key)
}
