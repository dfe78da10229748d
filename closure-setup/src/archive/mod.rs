//! Archive unpacking for the compiler and runtime archives.
//!
//! Archives are `.tar.gz` streams. They are decompressed and parsed lazily,
//! one entry at a time, so a fresh unpack always reopens the file.
//!
//! Completion is gated on two conditions (see [`CompletionGate`]): the entry
//! stream has ended, and every discovered file has finished writing.

mod gate;
mod unpacker;

use std::path::PathBuf;

pub use gate::{CompletionGate, Resolution};
pub use unpacker::TarGzUnpacker;

/// Kind of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Links, devices and anything else; reported but not extracted.
    Other,
}

impl From<tar::EntryType> for EntryKind {
    fn from(entry_type: tar::EntryType) -> Self {
        match entry_type {
            tar::EntryType::Regular | tar::EntryType::Continuous => Self::File,
            tar::EntryType::Directory => Self::Directory,
            _ => Self::Other,
        }
    }
}

/// An entry discovered while streaming an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path relative to the destination directory, as stored in the archive.
    pub path: PathBuf,
    /// Entry kind.
    pub kind: EntryKind,
    /// Size of the entry content in bytes.
    pub size: u64,
}

/// Totals for a finished unpack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackSummary {
    /// File entries written.
    pub files: usize,
    /// Directory entries created (or already present).
    pub directories: usize,
    /// Entries of other kinds that were skipped.
    pub skipped: usize,
    /// Total bytes written across all files.
    pub bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_from_tar() {
        assert_eq!(EntryKind::from(tar::EntryType::Regular), EntryKind::File);
        assert_eq!(
            EntryKind::from(tar::EntryType::Directory),
            EntryKind::Directory
        );
        assert_eq!(EntryKind::from(tar::EntryType::Symlink), EntryKind::Other);
    }
}
