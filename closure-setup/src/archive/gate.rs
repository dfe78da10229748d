//! One-shot completion gate for streaming extraction.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// How an unpack run resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// End of stream reached and every discovered file finished writing.
    Complete {
        /// Number of file entries written.
        files: usize,
    },
    /// The first error seen during the run.
    Failed,
}

/// Tracks in-flight file writes and end-of-stream for a single unpack.
///
/// Completion requires both conditions: the entry stream has ended, and every
/// file discovered so far has finished. Checking only the files seen so far is
/// not enough, because more entries may still be on their way.
///
/// The gate resolves at most once. After it resolves, every further signal
/// returns `None`.
#[derive(Debug, Default)]
pub struct CompletionGate {
    in_flight: HashSet<PathBuf>,
    finished: usize,
    stream_ended: bool,
    resolved: bool,
}

impl CompletionGate {
    /// Create an unresolved gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// A file entry was discovered and its write started.
    pub fn file_started(&mut self, path: &Path) {
        if !self.resolved {
            self.in_flight.insert(path.to_path_buf());
        }
    }

    /// A file finished writing.
    pub fn file_finished(&mut self, path: &Path) -> Option<Resolution> {
        if self.resolved {
            return None;
        }
        if self.in_flight.remove(path) {
            self.finished += 1;
        }
        self.try_complete()
    }

    /// The entry stream has no more entries.
    pub fn end_of_stream(&mut self) -> Option<Resolution> {
        if self.resolved {
            return None;
        }
        self.stream_ended = true;
        self.try_complete()
    }

    /// An error occurred. Only the first failure resolves the gate.
    pub fn fail(&mut self) -> Option<Resolution> {
        if self.resolved {
            return None;
        }
        self.resolved = true;
        Some(Resolution::Failed)
    }

    /// Whether the gate has already resolved.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Files currently being written.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn try_complete(&mut self) -> Option<Resolution> {
        if self.stream_ended && self.in_flight.is_empty() {
            self.resolved = true;
            return Some(Resolution::Complete {
                files: self.finished,
            });
        }
        None
    }
}
