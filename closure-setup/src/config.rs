//! Configuration for a setup run.
//!
//! [`SetupConfig`] is what the installer consumes. [`ConfigFile`] is the
//! optional `config.ini` that overrides its defaults:
//!
//! ```ini
//! [install]
//! root = /path/to/package
//! keep_archives = false
//!
//! [download]
//! compiler_url = https://dl.google.com/closure-compiler/compiler-latest.tar.gz
//! jre_url = http://bundled-openjdk-jre.googlecode.com/files/OpenJDK-JRE-7u6_24.tar.gz
//! compiler_sha256 =
//! jre_sha256 =
//! timeout_secs = 300
//!
//! [java]
//! java_home = /usr/lib/jvm/default
//! probe_timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;

use crate::error::{SetupError, SetupResult};
use crate::runtime::{Platform, DEFAULT_PROBE_TIMEOUT_SECS};
use crate::transfer::DEFAULT_TIMEOUT_SECS;

/// Default compiler archive location.
pub const DEFAULT_COMPILER_URL: &str =
    "https://dl.google.com/closure-compiler/compiler-latest.tar.gz";

/// Default bundled runtime archive location.
pub const DEFAULT_JRE_URL: &str =
    "http://bundled-openjdk-jre.googlecode.com/files/OpenJDK-JRE-7u6_24.tar.gz";

/// Name of the application directory under the user config dir.
const APP_DIR: &str = "closure-setup";

/// Name of the config file.
const CONFIG_FILE: &str = "config.ini";

/// Settings for a setup run.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Installation root; `compiler/` and `jre/` are created beneath it.
    pub root: PathBuf,

    /// Compiler archive URL.
    pub compiler_url: String,

    /// Bundled runtime archive URL.
    pub jre_url: String,

    /// Expected SHA-256 of the compiler archive, if verification is wanted.
    pub compiler_sha256: Option<String>,

    /// Expected SHA-256 of the runtime archive, if verification is wanted.
    pub jre_sha256: Option<String>,

    /// HTTP request timeout.
    pub http_timeout: Duration,

    /// Time a runtime smoke test may take.
    pub probe_timeout: Duration,

    /// Keep downloaded archives instead of deleting them.
    pub keep_archives: bool,

    /// `JAVA_HOME` for the system runtime.
    pub java_home: Option<PathBuf>,

    /// Platform bucket for the bundled runtime.
    pub platform: Platform,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            compiler_url: DEFAULT_COMPILER_URL.to_string(),
            jre_url: DEFAULT_JRE_URL.to_string(),
            compiler_sha256: None,
            jre_sha256: None,
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            keep_archives: false,
            java_home: None,
            platform: Platform::current(),
        }
    }
}

impl SetupConfig {
    /// Create a configuration rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn with_compiler_url(mut self, url: impl Into<String>) -> Self {
        self.compiler_url = url.into();
        self
    }

    pub fn with_jre_url(mut self, url: impl Into<String>) -> Self {
        self.jre_url = url.into();
        self
    }

    pub fn with_compiler_sha256(mut self, digest: impl Into<String>) -> Self {
        self.compiler_sha256 = Some(digest.into());
        self
    }

    pub fn with_jre_sha256(mut self, digest: impl Into<String>) -> Self {
        self.jre_sha256 = Some(digest.into());
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_keep_archives(mut self, keep: bool) -> Self {
        self.keep_archives = keep;
        self
    }

    pub fn with_java_home(mut self, java_home: Option<PathBuf>) -> Self {
        self.java_home = java_home;
        self
    }

    /// Override the platform bucket (mostly useful for tests).
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Check the settings before starting a run.
    pub fn validate(&self) -> SetupResult<()> {
        for (name, url) in [("compiler_url", &self.compiler_url), ("jre_url", &self.jre_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(SetupError::InvalidConfig(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }
        if self.http_timeout.is_zero() || self.probe_timeout.is_zero() {
            return Err(SetupError::InvalidConfig(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Values read from `config.ini`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub root: Option<PathBuf>,
    pub keep_archives: Option<bool>,
    pub compiler_url: Option<String>,
    pub jre_url: Option<String>,
    pub compiler_sha256: Option<String>,
    pub jre_sha256: Option<String>,
    pub timeout_secs: Option<u64>,
    pub java_home: Option<PathBuf>,
    pub probe_timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Default config file location (`~/.config/closure-setup/config.ini` on Linux).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the default config file. A missing file is not an error.
    pub fn load_default() -> SetupResult<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load a config file. The file must exist.
    pub fn load(path: &Path) -> SetupResult<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| SetupError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini, path)
    }

    /// Parse config file contents. `origin` is only used in error messages.
    pub fn parse(contents: &str, origin: &Path) -> SetupResult<Self> {
        let ini = Ini::load_from_str(contents).map_err(|e| SetupError::ConfigParse {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini, origin)
    }

    fn from_ini(ini: &Ini, origin: &Path) -> SetupResult<Self> {
        let get = |section: &str, key: &str| -> Option<String> {
            ini.section(Some(section))
                .and_then(|s| s.get(key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            root: get("install", "root").map(PathBuf::from),
            keep_archives: parse_value(get("install", "keep_archives"), "install.keep_archives", origin)?,
            compiler_url: get("download", "compiler_url"),
            jre_url: get("download", "jre_url"),
            compiler_sha256: get("download", "compiler_sha256"),
            jre_sha256: get("download", "jre_sha256"),
            timeout_secs: parse_value(get("download", "timeout_secs"), "download.timeout_secs", origin)?,
            java_home: get("java", "java_home").map(PathBuf::from),
            probe_timeout_secs: parse_value(
                get("java", "probe_timeout_secs"),
                "java.probe_timeout_secs",
                origin,
            )?,
        })
    }

    /// Overlay the values that are set onto `config`.
    pub fn apply(&self, mut config: SetupConfig) -> SetupConfig {
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(keep) = self.keep_archives {
            config.keep_archives = keep;
        }
        if let Some(url) = &self.compiler_url {
            config.compiler_url = url.clone();
        }
        if let Some(url) = &self.jre_url {
            config.jre_url = url.clone();
        }
        if let Some(digest) = &self.compiler_sha256 {
            config.compiler_sha256 = Some(digest.clone());
        }
        if let Some(digest) = &self.jre_sha256 {
            config.jre_sha256 = Some(digest.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config.http_timeout = Duration::from_secs(secs);
        }
        if let Some(home) = &self.java_home {
            config.java_home = Some(home.clone());
        }
        if let Some(secs) = self.probe_timeout_secs {
            config.probe_timeout = Duration::from_secs(secs);
        }
        config
    }
}

fn parse_value<T: FromStr>(value: Option<String>, key: &str, origin: &Path) -> SetupResult<Option<T>> {
    value
        .map(|v| {
            v.parse::<T>().map_err(|_| {
                SetupError::InvalidConfig(format!(
                    "{key} has invalid value '{v}' in {}",
                    origin.display()
                ))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn origin() -> &'static Path {
        Path::new("config.ini")
    }

    #[test]
    fn test_default_config() {
        let config = SetupConfig::default();
        assert_eq!(config.compiler_url, DEFAULT_COMPILER_URL);
        assert_eq!(config.jre_url, DEFAULT_JRE_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(300));
        assert_eq!(config.probe_timeout, Duration::from_secs(30));
        assert!(!config.keep_archives);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SetupConfig::new("/opt/cc")
            .with_compiler_url("http://localhost/c.tar.gz")
            .with_jre_url("http://localhost/j.tar.gz")
            .with_http_timeout(Duration::from_secs(5))
            .with_keep_archives(true)
            .with_platform(Platform::Windows);

        assert_eq!(config.root, PathBuf::from("/opt/cc"));
        assert_eq!(config.compiler_url, "http://localhost/c.tar.gz");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert!(config.keep_archives);
        assert_eq!(config.platform, Platform::Windows);
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = SetupConfig::default().with_jre_url("ftp://example.com/jre.tar.gz");
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("jre_url"));
    }

    #[test]
    fn test_parse_full_file() {
        let file = ConfigFile::parse(
            "[install]\nroot = /srv/cc\nkeep_archives = true\n\
             [download]\ncompiler_url = https://mirror/c.tar.gz\ntimeout_secs = 60\n\
             [java]\njava_home = /usr/lib/jvm/17\nprobe_timeout_secs = 5\n",
            origin(),
        )
        .unwrap();

        assert_eq!(file.root, Some(PathBuf::from("/srv/cc")));
        assert_eq!(file.keep_archives, Some(true));
        assert_eq!(file.timeout_secs, Some(60));
        assert_eq!(file.jre_url, None);

        let config = file.apply(SetupConfig::default());
        assert_eq!(config.compiler_url, "https://mirror/c.tar.gz");
        assert_eq!(config.jre_url, DEFAULT_JRE_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(60));
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.java_home, Some(PathBuf::from("/usr/lib/jvm/17")));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let file = ConfigFile::parse("[download]\njre_sha256 =\n", origin()).unwrap();
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn test_invalid_number() {
        let err = ConfigFile::parse("[download]\ntimeout_secs = soon\n", origin()).unwrap_err();
        assert!(matches!(err, SetupError::InvalidConfig(_)));
        assert!(err.to_string().contains("download.timeout_secs"));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = ConfigFile::load(Path::new("/nonexistent/closure-setup.ini")).unwrap_err();
        assert!(matches!(err, SetupError::ConfigParse { .. }));
    }
}
