use serde::{Deserialize, Serialize};

/// Aggregate storage statistics, derived from the record table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecordStats {
    /// All records, tombstoned or not.
    pub total: u64,
    /// Records whose blob is still stored.
    pub active: u64,
    /// Tombstoned records.
    pub deleted: u64,
    /// Records downloaded at least once.
    pub downloaded: u64,
    /// Sum of `size_bytes` over active records.
    pub total_size_bytes: u64,
}

impl RecordStats {
    /// Human-readable rendering of `total_size_bytes`.
    pub fn total_size_human(&self) -> String {
        format_bytes(self.total_size_bytes)
    }
}

/// Format a byte count as a short human-readable string (`"1.5 MB"`).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_owned();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    format!("{rounded} {}", UNITS[unit])
}
