//! Error types for the setup run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for setup operations.
pub type SetupResult<T> = Result<T, SetupError>;

/// Broad classification of a [`SetupError`].
///
/// Every kind is unrecoverable at the point it occurs; the installer aborts
/// the run on the first error of any kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fetching a remote archive failed.
    Transfer,
    /// Decompressing or unpacking an archive failed.
    Extraction,
    /// Preparing the bundled runtime tree failed.
    Configuration,
    /// Neither the bundled nor the system runtime could be invoked.
    RuntimeUnavailable,
    /// Invalid settings or an unreadable config file.
    Config,
    /// Any other filesystem failure.
    Io,
}

impl ErrorKind {
    /// Get a human-readable name for the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Extraction => "extraction",
            Self::Configuration => "configuration",
            Self::RuntimeUnavailable => "runtime",
            Self::Config => "config",
            Self::Io => "io",
        }
    }
}

/// Errors that can occur while configuring the toolchain.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Connection or read failure during a download.
    #[error("failed to download {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Server answered with something other than 200 OK.
    #[error("failed to download {url}: unexpected status code {status}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The HTTP client gave up waiting.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// Downloaded archive does not match the configured digest.
    #[error("checksum mismatch for {filename}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        filename: String,
        expected: String,
        actual: String,
    },

    /// Decompression or tar parsing failed.
    #[error("failed to extract {}: {reason}", path.display())]
    ExtractionFailed { path: PathBuf, reason: String },

    /// Archive entry would land outside the destination directory.
    #[error("refusing to unpack entry with unsafe path {}", path.display())]
    UnsafeEntryPath { path: PathBuf },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to read a file or directory.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// A permission change or rename in the bundled runtime tree failed.
    #[error("failed to configure bundled runtime at {}: {source}", path.display())]
    ConfigureFailed { path: PathBuf, source: io::Error },

    /// No runtime passed the smoke test.
    #[error("no usable Java runtime: bundled {} and system {} both failed", bundled.display(), system.display())]
    RuntimeUnavailable { bundled: PathBuf, system: PathBuf },

    /// A setting has an invalid value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The config file could not be parsed.
    #[error("failed to parse config file {}: {reason}", path.display())]
    ConfigParse { path: PathBuf, reason: String },
}

impl SetupError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DownloadFailed { .. }
            | Self::UnexpectedStatus { .. }
            | Self::Timeout { .. }
            | Self::ChecksumMismatch { .. } => ErrorKind::Transfer,
            Self::ExtractionFailed { .. }
            | Self::UnsafeEntryPath { .. }
            | Self::CreateDirFailed { .. }
            | Self::WriteFailed { .. } => ErrorKind::Extraction,
            Self::ConfigureFailed { .. } => ErrorKind::Configuration,
            Self::RuntimeUnavailable { .. } => ErrorKind::RuntimeUnavailable,
            Self::InvalidConfig(_) | Self::ConfigParse { .. } => ErrorKind::Config,
            Self::ReadFailed { .. } => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_display() {
        let err = SetupError::UnexpectedStatus {
            url: "http://example.com/a.tar.gz".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "failed to download http://example.com/a.tar.gz: unexpected status code 404"
        );
        assert_eq!(err.kind(), ErrorKind::Transfer);
    }

    #[test]
    fn test_checksum_mismatch_display() {
        let err = SetupError::ChecksumMismatch {
            filename: "jre.tar.gz".to_string(),
            expected: "abc123".to_string(),
            actual: "def456".to_string(),
        };
        assert!(err.to_string().contains("checksum mismatch"));
        assert!(err.to_string().contains("abc123"));
        assert!(err.to_string().contains("def456"));
    }

    #[test]
    fn test_error_kinds() {
        let io = || io::Error::new(io::ErrorKind::PermissionDenied, "denied");

        assert_eq!(
            SetupError::CreateDirFailed {
                path: PathBuf::from("/x"),
                source: io()
            }
            .kind(),
            ErrorKind::Extraction
        );
        assert_eq!(
            SetupError::ConfigureFailed {
                path: PathBuf::from("/x"),
                source: io()
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            SetupError::RuntimeUnavailable {
                bundled: PathBuf::from("jre/bin/java"),
                system: PathBuf::from("java"),
            }
            .kind(),
            ErrorKind::RuntimeUnavailable
        );
        assert_eq!(
            SetupError::InvalidConfig("bad".into()).kind(),
            ErrorKind::Config
        );
    }

    #[test]
    fn test_source_is_preserved() {
        use std::error::Error;

        let err = SetupError::WriteFailed {
            path: PathBuf::from("/tmp/out"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert_eq!(err.source().map(|s| s.to_string()), Some("disk full".into()));
    }
}
