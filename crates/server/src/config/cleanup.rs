use serde::Deserialize;

/// Periodic cleanup scheduler configuration.
///
/// This only controls the in-process timer; whether a sweep may actually
/// delete anything is governed by the `cleanup_enabled` setting, which is
/// adjustable at runtime through the settings API.
#[derive(Debug, Deserialize)]
pub struct CleanupSchedulerConfig {
    /// Whether to run cleanup sweeps on a timer.
    #[serde(default)]
    pub enabled: bool,
    /// Seconds between sweeps.
    #[serde(default = "default_cleanup_interval")]
    pub interval_seconds: u64,
}

impl Default for CleanupSchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: default_cleanup_interval(),
        }
    }
}

fn default_cleanup_interval() -> u64 {
    3600
}
