//! On-disk layout of a configured installation.

use std::path::{Path, PathBuf};

use crate::runtime::Platform;

/// Directory holding the unpacked compiler.
pub const COMPILER_DIR: &str = "compiler";
/// Directory holding the bundled runtime.
pub const JRE_DIR: &str = "jre";
/// Canonical runtime directory inside [`JRE_DIR`] after configuration.
pub const CANONICAL_BIN_DIR: &str = "bin";
/// Temporary download name for the compiler archive.
pub const COMPILER_ARCHIVE: &str = "compiler.tar.gz";
/// Temporary download name for the runtime archive.
pub const JRE_ARCHIVE: &str = "jre.tar.gz";

/// Paths under an installation root.
///
/// ```text
/// <root>/compiler/                  unpacked compiler archive
/// <root>/compiler/compiler.tar.gz   temporary download
/// <root>/jre/                       unpacked runtime archive
/// <root>/jre/jre.tar.gz             temporary download
/// <root>/jre/bin/java[.exe]         configured runtime
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    root: PathBuf,
    platform: Platform,
}

impl InstallLayout {
    /// Create a layout rooted at `root` for the given platform.
    pub fn new(root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            root: root.into(),
            platform,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn compiler_dir(&self) -> PathBuf {
        self.root.join(COMPILER_DIR)
    }

    pub fn compiler_archive(&self) -> PathBuf {
        self.compiler_dir().join(COMPILER_ARCHIVE)
    }

    pub fn jre_dir(&self) -> PathBuf {
        self.root.join(JRE_DIR)
    }

    pub fn jre_archive(&self) -> PathBuf {
        self.jre_dir().join(JRE_ARCHIVE)
    }

    /// The canonical runtime directory, `<root>/jre/bin`.
    pub fn jre_bin_dir(&self) -> PathBuf {
        self.jre_dir().join(CANONICAL_BIN_DIR)
    }

    /// The bundled runtime executable.
    pub fn bundled_java(&self) -> PathBuf {
        self.jre_bin_dir().join(self.platform.java_executable())
    }

    /// Whether a configured bundled runtime is present.
    pub fn has_bundled_runtime(&self) -> bool {
        self.jre_bin_dir().is_dir()
    }

    /// Locate the compiler jar.
    ///
    /// Prefers `compiler.jar`; otherwise the first `.jar` (by name) directly
    /// under the compiler directory.
    pub fn compiler_jar(&self) -> Option<PathBuf> {
        let dir = self.compiler_dir();
        let preferred = dir.join("compiler.jar");
        if preferred.is_file() {
            return Some(preferred);
        }

        let mut jars: Vec<PathBuf> = std::fs::read_dir(&dir)
            .ok()?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "jar"))
            .collect();
        jars.sort();
        jars.into_iter().next()
    }
}
