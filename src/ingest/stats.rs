//! Run statistics

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Maximum number of skipped-row samples kept
pub const MAX_SKIP_SAMPLES: usize = 100;

/// Statistics from a decomposition run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    /// Number of rows parsed into records
    pub records_read: usize,
    /// Number of rows skipped as malformed
    pub records_skipped: usize,
    /// Number of batches processed
    pub batches_processed: usize,
    /// Bytes consumed from the source
    pub bytes_processed: u64,
    /// Skip reasons (limited to the first 100)
    pub skipped_samples: Vec<String>,
    /// Duration of the run
    #[serde(skip)]
    pub duration: Duration,
}

impl IngestStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a skipped row, keeping its reason if there is room
    pub fn record_skip(&mut self, reason: String) {
        self.records_skipped += 1;
        if self.skipped_samples.len() < MAX_SKIP_SAMPLES {
            self.skipped_samples.push(reason);
        }
    }

    /// Fold the source-side counters of `other` into these stats
    pub fn merge_source(&mut self, other: &IngestStats) {
        self.records_read = other.records_read;
        self.records_skipped = other.records_skipped;
        self.bytes_processed = other.bytes_processed;
        self.skipped_samples = other.skipped_samples.clone();
    }

    /// Records per second throughput
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.records_read as f64 / secs
        }
    }

    /// Format duration as human-readable string
    pub fn duration_string(&self) -> String {
        let secs = self.duration.as_secs();
        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }
}
