//! Seams between the installer and its collaborators.
//!
//! The installer only talks to these traits, so tests can swap in fakes for
//! the network, the archive code, or the Java process.

use std::path::Path;

use crate::archive::{ArchiveEntry, UnpackSummary};
use crate::error::SetupResult;
use crate::runtime::{ProbeReport, RuntimeRef};

/// Progress callback for downloads.
///
/// # Arguments
///
/// * `chunk_bytes` - Size of the chunk that just arrived
/// * `total_bytes` - Total size from `Content-Length`, if the server sent one
pub type ProgressCallback<'a> = &'a mut dyn FnMut(u64, Option<u64>);

/// Callback fired for each archive entry as it is discovered.
pub type EntryCallback<'a> = &'a mut dyn FnMut(&ArchiveEntry);

/// Fetches a remote resource into a local file.
pub trait Downloader {
    /// Download `url` to `dest`, truncating any existing content.
    ///
    /// Returns the number of bytes written. The file is fully flushed before
    /// this returns.
    fn fetch(&self, url: &str, dest: &Path, on_progress: ProgressCallback<'_>)
        -> SetupResult<u64>;
}

/// Unpacks a compressed archive into a directory.
pub trait Unpacker {
    /// Unpack `archive` into `dest_dir`, calling `on_entry` for every entry
    /// before its content is consumed.
    fn unpack(
        &self,
        archive: &Path,
        dest_dir: &Path,
        on_entry: EntryCallback<'_>,
    ) -> SetupResult<UnpackSummary>;
}

/// Smoke-tests a Java runtime.
pub trait JavaProbe {
    /// Whether the runtime can be invoked successfully.
    ///
    /// Never fails: spawn errors, non-zero exits and timeouts are `false`.
    fn test(&self, runtime: &RuntimeRef) -> bool;

    /// Run the smoke test once and report the version along with the result.
    ///
    /// Implementations that can read the version from the same invocation
    /// should override this; the default reports no version.
    fn smoke_test(&self, runtime: &RuntimeRef) -> ProbeReport {
        ProbeReport {
            passed: self.test(runtime),
            version: None,
        }
    }
}
