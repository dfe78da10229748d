//! Transfer client for the compiler and runtime archives.
//!
//! This module provides:
//! - Single-request HTTP downloads with progress callbacks (`http`)
//! - Optional SHA-256 verification (`checksum`)
//! - Per-download progress throttling for console output (`progress`)

mod checksum;
mod http;
mod progress;

use std::path::{Path, PathBuf};

pub use checksum::{sha256_file, verify_sha256};
pub use http::{HttpDownloader, DEFAULT_TIMEOUT_SECS};
pub use progress::{format_progress, whole_mb, ProgressThrottle, MB};

/// State of a single download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Source URL.
    pub url: String,
    /// Destination file.
    pub dest: PathBuf,
    /// Bytes written to `dest` so far.
    pub bytes_written: u64,
    /// Total size from `Content-Length`, when known.
    pub total: Option<u64>,
}

impl DownloadTask {
    /// Create a task that has not started yet.
    pub fn new(url: impl Into<String>, dest: impl AsRef<Path>) -> Self {
        Self {
            url: url.into(),
            dest: dest.as_ref().to_path_buf(),
            bytes_written: 0,
            total: None,
        }
    }
}
