//! Tracing subscriber setup.
//!
//! Console progress for humans is printed by the CLI; this only configures
//! diagnostic logging. `RUST_LOG` always wins over the verbosity level.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{SetupError, SetupResult};

/// Logging options.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// 0 = warnings, 1 = info, 2+ = debug.
    pub verbosity: u8,
    /// Also write logs to this file.
    pub log_file: Option<PathBuf>,
}

impl LogConfig {
    /// Filter directive for the configured verbosity.
    ///
    /// The CLI binary is also named `closure_setup`, so one target covers both.
    pub fn default_directive(&self) -> &'static str {
        match self.verbosity {
            0 => "closure_setup=warn",
            1 => "closure_setup=info",
            _ => "closure_setup=debug",
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

/// Install the global subscriber.
///
/// Returns the file writer guard when a log file is configured; logs are
/// flushed when it is dropped, so keep it alive for the whole run.
pub fn init(config: &LogConfig) -> SetupResult<Option<WorkerGuard>> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    match &config.log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let file = fmt::layer().with_writer(writer).with_ansi(false);
            tracing_subscriber::registry()
                .with(config.filter())
                .with(console)
                .with(file)
                .try_init()
                .map_err(|e| SetupError::InvalidConfig(format!("logging already initialised: {e}")))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(config.filter())
                .with(console)
                .try_init()
                .map_err(|e| SetupError::InvalidConfig(format!("logging already initialised: {e}")))?;
            Ok(None)
        }
    }
}

fn file_writer(
    path: &Path,
) -> SetupResult<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| SetupError::CreateDirFailed {
        path: dir.clone(),
        source: e,
    })?;

    let file_name = path
        .file_name()
        .ok_or_else(|| SetupError::InvalidConfig(format!("invalid log file {}", path.display())))?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_directives() {
        let mut config = LogConfig::default();
        assert!(config.default_directive().contains("closure_setup=warn"));
        config.verbosity = 1;
        assert!(config.default_directive().contains("closure_setup=info"));
        config.verbosity = 7;
        assert!(config.default_directive().contains("closure_setup=debug"));
    }
}
