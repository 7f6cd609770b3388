use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default retention horizon when `cleanup_max_age_hours` is unset.
pub const DEFAULT_MAX_AGE_HOURS: u32 = 24;

/// The effective cleanup policy, parsed from the settings table.
///
/// Absent or unparseable values fall back to the defaults: cleanup
/// disabled, 24-hour horizon. Validation of new values happens at write
/// time in the settings API; reads stay tolerant so a hand-edited row
/// cannot wedge the sweeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupPolicy {
    /// Whether sweeps are allowed to delete anything.
    pub enabled: bool,
    /// Records first downloaded more than this many hours ago are eligible.
    pub max_age_hours: u32,
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
        }
    }
}

impl CleanupPolicy {
    /// Build a policy from raw setting values.
    pub fn from_values(enabled: Option<&str>, max_age_hours: Option<&str>) -> Self {
        let enabled = enabled.is_some_and(|v| v == "true");
        let max_age_hours = max_age_hours
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|hours| *hours > 0)
            .unwrap_or(DEFAULT_MAX_AGE_HOURS);
        Self {
            enabled,
            max_age_hours,
        }
    }

    /// The download-time cutoff for a sweep running at `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::hours(i64::from(self.max_age_hours))
    }
}

/// How a sweep ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum CleanupStatus {
    /// Cleanup is disabled; no record was examined.
    Skipped,
    /// The sweep ran to completion (possibly deleting nothing).
    Completed,
}

/// Result of one cleanup sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CleanupReport {
    /// Whether the sweep ran or was skipped.
    pub status: CleanupStatus,
    /// Number of records tombstoned by this sweep.
    pub deleted_count: u64,
    /// The retention horizon the sweep was evaluated against.
    pub max_age_hours: u32,
    /// When the sweep was invoked.
    pub timestamp: DateTime<Utc>,
}

impl CleanupReport {
    /// Report for a sweep that was skipped because cleanup is disabled.
    pub fn skipped(policy: &CleanupPolicy, now: DateTime<Utc>) -> Self {
        Self {
            status: CleanupStatus::Skipped,
            deleted_count: 0,
            max_age_hours: policy.max_age_hours,
            timestamp: now,
        }
    }
}
