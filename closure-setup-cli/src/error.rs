//! CLI error type.

use std::fmt;

use closure_setup::setup::SetupFailure;
use closure_setup::SetupError;

/// Errors surfaced to the user by the CLI.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    Config(SetupError),
    /// The setup run failed at some stage.
    Setup(Box<SetupFailure>),
    /// `check` found no usable runtime.
    NoRuntime,
    /// `clean` could not remove a directory.
    Clean(SetupError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Setup(failure) => write!(f, "{}", failure),
            CliError::NoRuntime => write!(f, "No usable Java runtime found"),
            CliError::Clean(e) => write!(f, "Clean failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) | CliError::Clean(e) => Some(e),
            CliError::Setup(failure) => Some(&failure.error),
            CliError::NoRuntime => None,
        }
    }
}

impl From<SetupFailure> for CliError {
    fn from(failure: SetupFailure) -> Self {
        CliError::Setup(Box::new(failure))
    }
}
