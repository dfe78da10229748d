//! The setup state machine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::cleanup::TempArchives;
use super::stage::{Artifact, SetupObserver, SetupStage};
use crate::archive::{ArchiveEntry, TarGzUnpacker, UnpackSummary};
use crate::config::SetupConfig;
use crate::error::{SetupError, SetupResult};
use crate::layout::InstallLayout;
use crate::runtime::{
    Located, PlatformConfigurator, ProbeReport, ProcessProbe, RuntimeLocator, RuntimeRef,
};
use crate::traits::{Downloader, JavaProbe, Unpacker};
use crate::transfer::{verify_sha256, HttpDownloader};

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct SetupOutcome {
    /// The runtime that passed its smoke test.
    pub runtime: RuntimeRef,
    /// Version reported by the runtime, if it could be read.
    pub java_version: Option<String>,
    /// Stages visited, ending in [`SetupStage::Success`].
    pub stages: Vec<SetupStage>,
    /// Size of the compiler archive.
    pub compiler_bytes: u64,
    /// Size of the runtime archive, if one was downloaded.
    pub runtime_bytes: Option<u64>,
    /// The compiler jar, if one was found after unpacking.
    pub compiler_jar: Option<PathBuf>,
}

impl SetupOutcome {
    fn new(
        runtime: RuntimeRef,
        java_version: Option<String>,
        compiler_bytes: u64,
        runtime_bytes: Option<u64>,
        compiler_jar: Option<PathBuf>,
    ) -> Self {
        Self {
            runtime,
            java_version,
            stages: Vec::new(),
            compiler_bytes,
            runtime_bytes,
            compiler_jar,
        }
    }
}

/// A failed run: the stage that failed and why.
#[derive(Debug, Error)]
#[error("{} failed: {error}", stage.name())]
pub struct SetupFailure {
    /// The stage that was running when the error occurred.
    pub stage: SetupStage,
    /// The error.
    #[source]
    pub error: SetupError,
    /// Stages visited, ending in [`SetupStage::Failure`].
    pub stages: Vec<SetupStage>,
}

/// What [`Installer::inspect`] found without downloading anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    /// Usable runtime, if any.
    pub runtime: Option<RuntimeRef>,
    /// Its version, if it could be read.
    pub java_version: Option<String>,
    /// The compiler jar, if the compiler is unpacked.
    pub compiler_jar: Option<PathBuf>,
}

/// Runs the full setup: compiler archive, runtime discovery or install,
/// smoke test, cleanup.
///
/// Stages run strictly one after another. The first error aborts the run;
/// there is no retry anywhere.
pub struct Installer<D: Downloader, U: Unpacker, P: JavaProbe> {
    config: SetupConfig,
    layout: InstallLayout,
    downloader: D,
    unpacker: U,
    probe: P,
}

impl Installer<HttpDownloader, TarGzUnpacker, ProcessProbe> {
    /// Create an installer with the real network, archive and process backends.
    pub fn from_config(config: SetupConfig) -> SetupResult<Self> {
        config.validate()?;
        let downloader = HttpDownloader::with_timeout(config.http_timeout)?;
        let probe = ProcessProbe::new(config.probe_timeout);
        Ok(Self::new(config, downloader, TarGzUnpacker::new(), probe))
    }
}

impl<D: Downloader, U: Unpacker, P: JavaProbe> Installer<D, U, P> {
    pub fn new(config: SetupConfig, downloader: D, unpacker: U, probe: P) -> Self {
        let layout = InstallLayout::new(config.root.clone(), config.platform);
        Self {
            config,
            layout,
            downloader,
            unpacker,
            probe,
        }
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    pub fn config(&self) -> &SetupConfig {
        &self.config
    }

    /// The system runtime this installer checks.
    pub fn system_runtime(&self) -> RuntimeRef {
        RuntimeRef::system(self.config.java_home.as_deref(), self.config.platform)
    }

    /// Run the setup.
    ///
    /// Temporary archives are removed before this returns, on success and on
    /// failure alike (unless `keep_archives` is set).
    pub fn run(&self, observer: &mut dyn SetupObserver) -> Result<SetupOutcome, SetupFailure> {
        let mut cleanup = TempArchives::new(vec![
            self.layout.compiler_archive(),
            self.layout.jre_archive(),
        ])
        .keep(self.config.keep_archives);

        let mut run = Run {
            observer,
            stages: Vec::new(),
        };

        let result = self.execute(&mut run);
        cleanup.remove_all();

        match result {
            Ok(mut outcome) => {
                run.enter(SetupStage::Success);
                outcome.stages = run.stages;
                Ok(outcome)
            }
            Err(error) => {
                let stage = run.current();
                warn!(stage = %stage, error = %error, "Setup failed");
                run.enter(SetupStage::Failure);
                Err(SetupFailure {
                    stage,
                    error,
                    stages: run.stages,
                })
            }
        }
    }

    fn execute(&self, run: &mut Run<'_>) -> SetupResult<SetupOutcome> {
        run.enter(SetupStage::Start);

        run.enter(SetupStage::DownloadingArchive);
        let compiler_bytes = self.download(
            run,
            Artifact::Compiler,
            &self.config.compiler_url,
            &self.layout.compiler_archive(),
            self.config.compiler_sha256.as_deref(),
        )?;

        run.enter(SetupStage::UnpackingArchive);
        self.unpack(
            run,
            Artifact::Compiler,
            &self.layout.compiler_archive(),
            &self.layout.compiler_dir(),
        )?;

        let compiler_jar = self.layout.compiler_jar();
        if compiler_jar.is_none() {
            warn!(dir = %self.layout.compiler_dir().display(), "No compiler jar found after unpacking");
        }

        run.enter(SetupStage::LocatingRuntime);
        let system = self.system_runtime();
        let locator = RuntimeLocator::new(&self.probe, &self.layout, system.clone());

        let mut runtime_bytes = None;
        let bundled = match locator.locate() {
            Located::System { runtime, version } => {
                run.observer.runtime_tested(&runtime, true);
                return Ok(SetupOutcome::new(runtime, version, compiler_bytes, None, compiler_jar));
            }
            Located::Bundled(runtime) => {
                run.observer.runtime_tested(&system, false);
                runtime
            }
            Located::NotFound => {
                run.observer.runtime_tested(&system, false);
                runtime_bytes = Some(self.install_bundled(run)?);
                RuntimeRef::Bundled(self.layout.bundled_java())
            }
        };

        run.enter(SetupStage::TestingBundled);
        let report = self.test(run, &bundled);
        if report.passed {
            return Ok(SetupOutcome::new(
                bundled,
                report.version,
                compiler_bytes,
                runtime_bytes,
                compiler_jar,
            ));
        }

        run.enter(SetupStage::TestingSystemFallback);
        let report = self.test(run, &system);
        if report.passed {
            return Ok(SetupOutcome::new(
                system,
                report.version,
                compiler_bytes,
                runtime_bytes,
                compiler_jar,
            ));
        }

        Err(SetupError::RuntimeUnavailable {
            bundled: bundled.program().to_path_buf(),
            system: system.program().to_path_buf(),
        })
    }

    /// Download, unpack and configure the bundled runtime.
    fn install_bundled(&self, run: &mut Run<'_>) -> SetupResult<u64> {
        run.enter(SetupStage::DownloadingRuntime);
        let bytes = self.download(
            run,
            Artifact::Runtime,
            &self.config.jre_url,
            &self.layout.jre_archive(),
            self.config.jre_sha256.as_deref(),
        )?;

        run.enter(SetupStage::UnpackingRuntime);
        self.unpack(
            run,
            Artifact::Runtime,
            &self.layout.jre_archive(),
            &self.layout.jre_dir(),
        )?;

        run.enter(SetupStage::ConfiguringRuntime);
        let outcome = PlatformConfigurator::new(self.layout.jre_dir(), self.layout.platform())
            .configure()?;
        run.observer.configured(&outcome);

        Ok(bytes)
    }

    fn download(
        &self,
        run: &mut Run<'_>,
        artifact: Artifact,
        url: &str,
        dest: &Path,
        sha256: Option<&str>,
    ) -> SetupResult<u64> {
        info!(artifact = artifact.name(), url, "Downloading");
        run.observer.download_started(artifact, url);

        let observer = &mut *run.observer;
        let bytes = self.downloader.fetch(url, dest, &mut |chunk: u64, total: Option<u64>| {
            observer.download_progress(artifact, chunk, total)
        })?;

        if let Some(expected) = sha256 {
            verify_sha256(dest, expected)?;
        }

        run.observer.download_finished(artifact, bytes, dest);
        Ok(bytes)
    }

    fn unpack(
        &self,
        run: &mut Run<'_>,
        artifact: Artifact,
        archive: &Path,
        dest_dir: &Path,
    ) -> SetupResult<UnpackSummary> {
        info!(artifact = artifact.name(), archive = %archive.display(), "Unpacking");

        let observer = &mut *run.observer;
        let summary = self
            .unpacker
            .unpack(archive, dest_dir, &mut |entry: &ArchiveEntry| {
                observer.entry(artifact, entry)
            })?;

        run.observer.unpacked(artifact, &summary);
        Ok(summary)
    }

    fn test(&self, run: &mut Run<'_>, runtime: &RuntimeRef) -> ProbeReport {
        let report = self.probe.smoke_test(runtime);
        info!(runtime = %runtime, ok = report.passed, version = ?report.version, "Smoke test");
        run.observer.runtime_tested(runtime, report.passed);
        report
    }

    /// Report what is usable right now, without downloading anything.
    pub fn inspect(&self) -> Inspection {
        let system = self.system_runtime();
        let (runtime, java_version) =
            match RuntimeLocator::new(&self.probe, &self.layout, system).locate() {
                Located::System { runtime, version } => (Some(runtime), version),
                Located::Bundled(runtime) => {
                    let report = self.probe.smoke_test(&runtime);
                    if report.passed {
                        (Some(runtime), report.version)
                    } else {
                        (None, None)
                    }
                }
                Located::NotFound => (None, None),
            };

        Inspection {
            runtime,
            java_version,
            compiler_jar: self.layout.compiler_jar(),
        }
    }
}

/// Remove the unpacked compiler and runtime directories.
///
/// Returns the directories that were removed.
pub fn clean(layout: &InstallLayout) -> SetupResult<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for dir in [layout.compiler_dir(), layout.jre_dir()] {
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                info!(dir = %dir.display(), "Removed");
                removed.push(dir);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(SetupError::WriteFailed {
                    path: dir,
                    source: e,
                })
            }
        }
    }
    Ok(removed)
}

/// Per-run state: the observer and the stages visited so far.
struct Run<'a> {
    observer: &'a mut dyn SetupObserver,
    stages: Vec<SetupStage>,
}

impl Run<'_> {
    fn enter(&mut self, stage: SetupStage) {
        info!(stage = %stage, "Entering stage");
        self.stages.push(stage);
        self.observer.stage(stage);
    }

    fn current(&self) -> SetupStage {
        self.stages.last().copied().unwrap_or(SetupStage::Start)
    }
}
