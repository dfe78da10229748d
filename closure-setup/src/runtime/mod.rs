//! Java runtime discovery, configuration and smoke testing.
//!
//! - `platform`: OS bucket selection
//! - `probe`: subprocess smoke test (`java -version`)
//! - `locator`: system runtime first, then an existing bundled one
//! - `configurator`: turns an unpacked runtime archive into `<jre>/bin`

mod configurator;
mod locator;
mod platform;
mod probe;

use std::fmt;
use std::path::{Path, PathBuf};

pub use configurator::{ConfigureOutcome, PlatformConfigurator};
pub use locator::{Located, RuntimeLocator};
pub use platform::Platform;
pub use probe::{parse_version, ProcessProbe, DEFAULT_PROBE_TIMEOUT_SECS};

/// Command name used when no `JAVA_HOME` is known.
pub const SYSTEM_JAVA_COMMAND: &str = "java";

/// A runtime that can be invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeRef {
    /// A system-wide runtime: a bare command name resolved through `PATH`,
    /// or an executable under `JAVA_HOME`.
    System(PathBuf),
    /// The bundled runtime under `<root>/jre/bin`.
    Bundled(PathBuf),
}

impl RuntimeRef {
    /// The system runtime, honouring `java_home` when given.
    pub fn system(java_home: Option<&Path>, platform: Platform) -> Self {
        match java_home {
            Some(home) => Self::System(home.join("bin").join(platform.java_executable())),
            None => Self::System(PathBuf::from(SYSTEM_JAVA_COMMAND)),
        }
    }

    /// Path or command to execute.
    pub fn program(&self) -> &Path {
        match self {
            Self::System(path) | Self::Bundled(path) => path,
        }
    }

    pub fn is_bundled(&self) -> bool {
        matches!(self, Self::Bundled(_))
    }
}

/// Result of a single smoke test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    /// The runtime exited with status zero in time.
    pub passed: bool,
    /// Version printed by the runtime, if it could be parsed.
    pub version: Option<String>,
}

impl fmt::Display for RuntimeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program().display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_without_java_home() {
        let runtime = RuntimeRef::system(None, Platform::Linux);
        assert_eq!(runtime, RuntimeRef::System(PathBuf::from("java")));
        assert!(!runtime.is_bundled());
    }

    #[test]
    fn test_system_with_java_home() {
        let runtime = RuntimeRef::system(Some(Path::new("/usr/lib/jvm/17")), Platform::Linux);
        assert_eq!(runtime.program(), Path::new("/usr/lib/jvm/17/bin/java"));

        let runtime = RuntimeRef::system(Some(Path::new("C:/jdk")), Platform::Windows);
        assert!(runtime.program().ends_with("bin/java.exe"));
    }

    #[test]
    fn test_display_is_program_path() {
        let runtime = RuntimeRef::Bundled(PathBuf::from("/opt/cc/jre/bin/java"));
        assert_eq!(runtime.to_string(), "/opt/cc/jre/bin/java");
    }
}
