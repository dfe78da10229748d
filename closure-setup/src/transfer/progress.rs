//! Throttled progress reporting for a single download.

/// One mebibyte.
pub const MB: u64 = 1024 * 1024;

/// Accumulates chunk sizes for one fetch and decides when a progress line is due.
///
/// A report is due on the first chunk and then whenever at least `step` bytes
/// have arrived since the last report.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    current: u64,
    last_reported: u64,
    reported_once: bool,
    step: u64,
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(MB)
    }
}

impl ProgressThrottle {
    /// Create a throttle that reports every `step` bytes.
    pub fn new(step: u64) -> Self {
        Self {
            current: 0,
            last_reported: 0,
            reported_once: false,
            step: step.max(1),
        }
    }

    /// Record a chunk. Returns the running total if a report is due.
    pub fn record(&mut self, chunk_bytes: u64) -> Option<u64> {
        self.current += chunk_bytes;
        if !self.reported_once || self.current - self.last_reported >= self.step {
            self.reported_once = true;
            self.last_reported = self.current;
            return Some(self.current);
        }
        None
    }

    /// Bytes seen so far.
    pub fn current(&self) -> u64 {
        self.current
    }
}

/// Format a progress line, e.g. `| 3 / 12 mb` or `| 3 / ??? mb`.
pub fn format_progress(current: u64, total: Option<u64>) -> String {
    let total = match total {
        Some(t) if t > 0 => (t / MB).to_string(),
        _ => "???".to_string(),
    };
    format!("| {} / {} mb", current / MB, total)
}

/// Whole mebibytes, as shown in completion messages.
pub fn whole_mb(bytes: u64) -> u64 {
    bytes / MB
}
