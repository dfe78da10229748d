//! Platform configuration of an unpacked bundled runtime.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use super::Platform;
use crate::error::{SetupError, SetupResult};
use crate::layout::CANONICAL_BIN_DIR;

/// Result of [`PlatformConfigurator::configure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureOutcome {
    /// `<jre>/bin` already existed; nothing was touched.
    AlreadyConfigured,
    /// The platform directory was renamed into place.
    Configured { from: PathBuf, to: PathBuf },
}

/// Renames the platform subdirectory of an unpacked runtime to `bin` and
/// makes it executable.
///
/// The unpacked tree holds one directory per platform:
///
/// ```text
/// jre/bin_windows/java.exe
/// jre/bin_mac/java
/// jre/bin_linux/java
/// ```
#[derive(Debug, Clone)]
pub struct PlatformConfigurator {
    jre_dir: PathBuf,
    platform: Platform,
}

impl PlatformConfigurator {
    pub fn new(jre_dir: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            jre_dir: jre_dir.into(),
            platform,
        }
    }

    /// Configure the runtime tree. Idempotent: a second call is a no-op.
    pub fn configure(&self) -> SetupResult<ConfigureOutcome> {
        let to = self.jre_dir.join(CANONICAL_BIN_DIR);
        if to.exists() {
            info!(dir = %to.display(), "Bundled runtime is already configured");
            return Ok(ConfigureOutcome::AlreadyConfigured);
        }

        info!(platform = %self.platform, "Configuring bundled runtime");

        make_executable(&self.jre_dir)?;

        let from = self.jre_dir.join(self.platform.bundle_dir_name());
        make_executable(&from)?;

        info!(from = %from.display(), to = %to.display(), "Renaming platform directory");
        fs::rename(&from, &to).map_err(|e| SetupError::ConfigureFailed {
            path: from.clone(),
            source: e,
        })?;

        make_executable(&to.join(self.platform.java_executable()))?;

        Ok(ConfigureOutcome::Configured { from, to })
    }
}

/// Set mode 0755.
fn make_executable(path: &Path) -> SetupResult<()> {
    info!(path = %path.display(), "chmod 0755");
    set_mode_755(path).map_err(|e| SetupError::ConfigureFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(unix)]
fn set_mode_755(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

/// Windows has no execute bit; only check the path exists.
#[cfg(not(unix))]
fn set_mode_755(path: &Path) -> io::Result<()> {
    fs::metadata(path).map(|_| ())
}
