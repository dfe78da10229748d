//! Setup stages and progress observation.

use std::fmt;
use std::path::Path;

use crate::archive::{ArchiveEntry, UnpackSummary};
use crate::runtime::{ConfigureOutcome, RuntimeRef};

/// States of a setup run, in the order they can be visited.
///
/// ```text
/// Start → DownloadingArchive → UnpackingArchive → LocatingRuntime
///   ├─ system ok ─────────────────────────────────────────────→ Success
///   ├─ bundled present ────────────────────→ TestingBundled
///   └─ DownloadingRuntime → UnpackingRuntime → ConfiguringRuntime → TestingBundled
/// TestingBundled ── ok ──→ Success
///   └─ TestingSystemFallback ── ok ──→ Success, else Failure
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupStage {
    Start,
    DownloadingArchive,
    UnpackingArchive,
    LocatingRuntime,
    DownloadingRuntime,
    UnpackingRuntime,
    ConfiguringRuntime,
    TestingBundled,
    TestingSystemFallback,
    Success,
    Failure,
}

impl SetupStage {
    /// Get a human-readable name for the stage.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "Starting",
            Self::DownloadingArchive => "Downloading compiler",
            Self::UnpackingArchive => "Unpacking compiler",
            Self::LocatingRuntime => "Locating Java",
            Self::DownloadingRuntime => "Downloading bundled JRE",
            Self::UnpackingRuntime => "Unpacking bundled JRE",
            Self::ConfiguringRuntime => "Configuring bundled JRE",
            Self::TestingBundled => "Testing bundled Java",
            Self::TestingSystemFallback => "Testing system Java",
            Self::Success => "Complete",
            Self::Failure => "Failed",
        }
    }

    /// Whether the run ends in this stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which archive a download or unpack event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Compiler,
    Runtime,
}

impl Artifact {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Compiler => "compiler",
            Self::Runtime => "bundled JRE",
        }
    }
}

/// Receives progress from a setup run. Every method defaults to a no-op.
pub trait SetupObserver {
    /// A new stage was entered.
    fn stage(&mut self, _stage: SetupStage) {}

    /// A download started.
    fn download_started(&mut self, _artifact: Artifact, _url: &str) {}

    /// A chunk arrived.
    fn download_progress(&mut self, _artifact: Artifact, _chunk_bytes: u64, _total: Option<u64>) {}

    /// A download completed.
    fn download_finished(&mut self, _artifact: Artifact, _bytes: u64, _dest: &Path) {}

    /// An archive entry was discovered.
    fn entry(&mut self, _artifact: Artifact, _entry: &ArchiveEntry) {}

    /// An archive was fully unpacked.
    fn unpacked(&mut self, _artifact: Artifact, _summary: &UnpackSummary) {}

    /// The bundled runtime tree was configured (or already was).
    fn configured(&mut self, _outcome: &ConfigureOutcome) {}

    /// A runtime was smoke-tested.
    fn runtime_tested(&mut self, _runtime: &RuntimeRef, _ok: bool) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SetupObserver for NoopObserver {}
