//! Blocking HTTP downloader.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;

use super::DownloadTask;
use crate::error::{SetupError, SetupResult};
use crate::traits::{Downloader, ProgressCallback};

/// Default timeout for HTTP requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300; // 5 minutes

/// Buffer size for reading/writing during downloads (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// HTTP-based archive downloader.
///
/// A single GET per fetch. No resume, no retry, no redirects: any failure
/// (including a 3xx) is terminal.
#[derive(Debug)]
pub struct HttpDownloader {
    client: Client,
    pub(crate) timeout: Duration,
}

impl HttpDownloader {
    /// Create a downloader with the default timeout.
    pub fn new() -> SetupResult<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a downloader with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> SetupResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| SetupError::InvalidConfig(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    /// Run a download task to completion, updating its counters as data arrives.
    pub fn run_task(
        &self,
        task: &mut DownloadTask,
        on_progress: ProgressCallback<'_>,
    ) -> SetupResult<u64> {
        // The destination is opened before the request so a failed transfer
        // still leaves a file for cleanup to remove.
        let file = create_destination(&task.dest)?;

        debug!(url = %task.url, dest = %task.dest.display(), "Starting download");

        let mut response = self
            .client
            .get(&task.url)
            .send()
            .map_err(|e| self.request_error(&task.url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SetupError::UnexpectedStatus {
                url: task.url.clone(),
                status: status.as_u16(),
            });
        }

        task.total = response.content_length();

        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            let bytes_read = match response.read(&mut buffer) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if is_timeout(&e) => {
                    return Err(SetupError::Timeout {
                        url: task.url.clone(),
                        timeout_secs: self.timeout.as_secs(),
                    })
                }
                Err(e) => {
                    return Err(SetupError::DownloadFailed {
                        url: task.url.clone(),
                        reason: format!("read error: {e}"),
                    })
                }
            };

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| SetupError::WriteFailed {
                    path: task.dest.clone(),
                    source: e,
                })?;

            task.bytes_written += bytes_read as u64;
            on_progress(bytes_read as u64, task.total);
        }

        writer.flush().map_err(|e| SetupError::WriteFailed {
            path: task.dest.clone(),
            source: e,
        })?;

        debug!(url = %task.url, bytes = task.bytes_written, "Download finished");

        Ok(task.bytes_written)
    }

    fn request_error(&self, url: &str, e: reqwest::Error) -> SetupError {
        if e.is_timeout() {
            SetupError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            SetupError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

impl Downloader for HttpDownloader {
    fn fetch(
        &self,
        url: &str,
        dest: &Path,
        on_progress: ProgressCallback<'_>,
    ) -> SetupResult<u64> {
        let mut task = DownloadTask::new(url, dest);
        self.run_task(&mut task, on_progress)
    }
}

/// Whether a body read failed on the client timeout. The blocking response
/// reports it as an opaque `io::Error` wrapping the `reqwest::Error`.
fn is_timeout(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::TimedOut
        || e
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
            .is_some_and(reqwest::Error::is_timeout)
}

/// Create (or truncate) the destination file, creating parent directories.
fn create_destination(dest: &Path) -> SetupResult<File> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SetupError::CreateDirFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    File::create(dest).map_err(|e| SetupError::WriteFailed {
        path: dest.to_path_buf(),
        source: e,
    })
}
