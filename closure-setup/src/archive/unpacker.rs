//! Streaming gzip + tar extraction.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::debug;

use super::gate::{CompletionGate, Resolution};
use super::{ArchiveEntry, EntryKind, UnpackSummary};
use crate::error::{SetupError, SetupResult};
use crate::traits::{EntryCallback, Unpacker};

/// Unpacks `.tar.gz` archives entry by entry.
///
/// The archive is decompressed and parsed lazily; nothing is buffered beyond
/// the entry currently being written.
#[derive(Debug, Default, Clone, Copy)]
pub struct TarGzUnpacker;

impl TarGzUnpacker {
    /// Create a new unpacker.
    pub fn new() -> Self {
        Self
    }

    /// Unpack `archive` into `dest_dir` and deliver the result to `on_complete`.
    ///
    /// `on_complete` fires exactly once: with the summary after the entry
    /// stream has ended and every file has been written, or with the first
    /// error encountered.
    pub fn unpack_with<C>(
        &self,
        archive: &Path,
        dest_dir: &Path,
        on_entry: EntryCallback<'_>,
        on_complete: C,
    ) where
        C: FnOnce(SetupResult<UnpackSummary>),
    {
        let mut gate = CompletionGate::new();
        let mut summary = UnpackSummary::default();

        let result = match stream_entries(archive, dest_dir, on_entry, &mut gate, &mut summary) {
            Ok(()) => match gate.end_of_stream() {
                Some(Resolution::Complete { files }) => {
                    debug!(archive = %archive.display(), files, "Unpack complete");
                    Ok(summary)
                }
                _ => Err(SetupError::ExtractionFailed {
                    path: archive.to_path_buf(),
                    reason: format!(
                        "entry stream ended with {} files still being written",
                        gate.in_flight()
                    ),
                }),
            },
            Err(e) => {
                gate.fail();
                Err(e)
            }
        };

        on_complete(result);
    }
}

impl Unpacker for TarGzUnpacker {
    fn unpack(
        &self,
        archive: &Path,
        dest_dir: &Path,
        on_entry: EntryCallback<'_>,
    ) -> SetupResult<UnpackSummary> {
        let mut outcome = None;
        self.unpack_with(archive, dest_dir, on_entry, |result| outcome = Some(result));
        outcome.unwrap_or_else(|| {
            Err(SetupError::ExtractionFailed {
                path: archive.to_path_buf(),
                reason: "unpack finished without a result".to_string(),
            })
        })
    }
}

fn stream_entries(
    archive: &Path,
    dest_dir: &Path,
    on_entry: EntryCallback<'_>,
    gate: &mut CompletionGate,
    summary: &mut UnpackSummary,
) -> SetupResult<()> {
    let file = File::open(archive).map_err(|e| SetupError::ReadFailed {
        path: archive.to_path_buf(),
        source: e,
    })?;

    let decoder = GzDecoder::new(BufReader::new(file));
    let mut tar = tar::Archive::new(decoder);
    let entries = tar.entries().map_err(|e| extraction_error(archive, e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| extraction_error(archive, e))?;

        let relative = entry
            .path()
            .map_err(|e| extraction_error(archive, e))?
            .into_owned();
        let kind = EntryKind::from(entry.header().entry_type());
        let size = entry.header().size().unwrap_or(0);

        on_entry(&ArchiveEntry {
            path: relative.clone(),
            kind,
            size,
        });

        let target = safe_join(dest_dir, &relative)?;

        match kind {
            EntryKind::Directory => {
                create_directory(&target)?;
                summary.directories += 1;
            }
            EntryKind::File => {
                gate.file_started(&relative);
                let mode = entry.header().mode().ok();
                let written = write_file(&mut entry, &target)?;
                if let Some(mode) = mode {
                    apply_mode(&target, mode).map_err(|e| SetupError::WriteFailed {
                        path: target.clone(),
                        source: e,
                    })?;
                }
                summary.files += 1;
                summary.bytes += written;
                gate.file_finished(&relative);
            }
            EntryKind::Other => {
                debug!(entry = %relative.display(), "Skipping unsupported entry type");
                summary.skipped += 1;
            }
        }
    }

    Ok(())
}

/// Join an entry path onto the destination, rejecting anything that escapes it.
fn safe_join(dest_dir: &Path, relative: &Path) -> SetupResult<PathBuf> {
    let mut target = dest_dir.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => target.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(SetupError::UnsafeEntryPath {
                    path: relative.to_path_buf(),
                });
            }
        }
    }
    Ok(target)
}

/// Create a directory entry. An existing path is not an error.
fn create_directory(path: &Path) -> SetupResult<()> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // Parent was not listed before this entry.
            fs::create_dir_all(path).map_err(|e| SetupError::CreateDirFailed {
                path: path.to_path_buf(),
                source: e,
            })
        }
        Err(e) => Err(SetupError::CreateDirFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn write_file(reader: &mut impl Read, target: &Path) -> SetupResult<u64> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| SetupError::CreateDirFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let file = File::create(target).map_err(|e| SetupError::WriteFailed {
        path: target.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    let written = io::copy(reader, &mut writer).map_err(|e| SetupError::ExtractionFailed {
        path: target.to_path_buf(),
        reason: e.to_string(),
    })?;
    writer.flush().map_err(|e| SetupError::WriteFailed {
        path: target.to_path_buf(),
        source: e,
    })?;

    Ok(written)
}

/// Apply the permission bits stored in the archive, keeping the file writable
/// by its owner so a later unpack can overwrite it.
#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode((mode & 0o777) | 0o600))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

fn extraction_error(archive: &Path, e: io::Error) -> SetupError {
    SetupError::ExtractionFailed {
        path: archive.to_path_buf(),
        reason: e.to_string(),
    }
}
