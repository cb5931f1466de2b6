//! Progress reporting for decomposition runs

use indicatif::{ProgressBar, ProgressStyle};

use crate::ingest::IngestStats;

const TEMPLATE: &str =
    "[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta} @ {bytes_per_sec}) {msg}";

/// Byte-based progress bar over the input file.
///
/// Disabled reporters do nothing, so callers never branch on `--no-progress`.
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(enabled: bool, total_bytes: u64) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total_bytes);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self { bar: Some(bar) }
    }

    /// Move the bar to the bytes consumed so far
    pub fn update(&self, stats: &IngestStats) {
        if let Some(bar) = &self.bar {
            bar.set_position(stats.bytes_processed);
            bar.set_message(format!("{} rows", format_number(stats.records_read as u64)));
        }
    }

    pub fn finish(&self, stats: &IngestStats) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(format!(
                "{} rows, {} skipped",
                format_number(stats.records_read as u64),
                format_number(stats.records_skipped as u64)
            ));
        }
    }

    /// Clear the bar after a failed run
    pub fn abandon(&self) {
        if let Some(bar) = &self.bar {
            bar.abandon();
        }
    }
}

/// Format a large number with commas for readability.
///
/// # Examples
///
/// ```rust,ignore
/// use star_schema::cli::progress::format_number;
///
/// assert_eq!(format_number(0), "0");
/// assert_eq!(format_number(1234), "1,234");
/// assert_eq!(format_number(1234567), "1,234,567");
/// ```
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}
