use std::time::Duration;

/// Tunables for the lifecycle engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Whether a download schedules deletion of the archive (unless the
    /// caller asks to keep it).
    pub auto_delete: bool,

    /// How long the reaper waits before deleting a downloaded archive.
    ///
    /// The pause keeps the deletion clear of the in-flight response body
    /// transfer. Must stay in the low seconds; the delay cannot be
    /// cancelled once a deletion is scheduled.
    pub delete_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_delete: true,
            delete_delay: Duration::from_secs(2),
        }
    }
}
