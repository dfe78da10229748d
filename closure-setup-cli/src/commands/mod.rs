//! CLI command implementations.

pub mod check;
pub mod clean;
pub mod configure;

use std::env;
use std::path::{Path, PathBuf};

use clap::Args;
use closure_setup::config::{ConfigFile, SetupConfig};
use tracing::debug;

use crate::error::CliError;

/// Arguments shared by commands that only need the installation root.
#[derive(Debug, Default, Args)]
pub struct RootArgs {
    /// Installation root (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

/// Load the config file: the explicit one if given, else the default location.
pub fn load_config_file(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let file = match path {
        Some(path) => ConfigFile::load(path),
        None => ConfigFile::load_default(),
    };
    file.map_err(CliError::Config)
}

/// Build the run configuration from defaults, `JAVA_HOME`, the config file
/// and the `--root` flag, in increasing order of precedence.
pub fn resolve_config(file: &ConfigFile, java_home_env: Option<PathBuf>, root: Option<PathBuf>) -> SetupConfig {
    let mut config = file.apply(SetupConfig::default().with_java_home(java_home_env));
    if let Some(root) = root {
        config.root = root;
    }
    debug!(root = %config.root.display(), platform = %config.platform, "Resolved configuration");
    config
}

/// `JAVA_HOME` from the environment, ignoring an empty value.
pub fn java_home_from_env() -> Option<PathBuf> {
    env::var_os("JAVA_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_missing_config_is_error() {
        let temp = TempDir::new().unwrap();
        let result = load_config_file(Some(&temp.path().join("missing.ini")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_precedence() {
        let file = ConfigFile::parse(
            "[install]\nroot = /from/file\n[java]\njava_home = /jdk/file\n",
            Path::new("test.ini"),
        )
        .unwrap();

        let config = resolve_config(&file, Some(PathBuf::from("/jdk/env")), None);
        assert_eq!(config.root, PathBuf::from("/from/file"));
        assert_eq!(config.java_home, Some(PathBuf::from("/jdk/file")));

        let config = resolve_config(
            &ConfigFile::default(),
            Some(PathBuf::from("/jdk/env")),
            Some(PathBuf::from("/from/cli")),
        );
        assert_eq!(config.root, PathBuf::from("/from/cli"));
        assert_eq!(config.java_home, Some(PathBuf::from("/jdk/env")));
    }
}
