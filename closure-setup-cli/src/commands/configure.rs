//! Configure command - download the compiler and set up Java.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use closure_setup::config::{ConfigFile, SetupConfig};
use closure_setup::setup::Installer;

use super::{java_home_from_env, resolve_config};
use crate::error::CliError;
use crate::output::ConsoleReporter;

/// Arguments for the configure command.
#[derive(Debug, Default, Args)]
pub struct ConfigureArgs {
    /// Installation root (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Compiler archive URL
    #[arg(long, value_name = "URL")]
    pub compiler_url: Option<String>,

    /// Bundled JRE archive URL
    #[arg(long, value_name = "URL")]
    pub jre_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Keep the downloaded archives after setup
    #[arg(long)]
    pub keep_archives: bool,
}

impl ConfigureArgs {
    /// Overlay the flags that were given onto `config`.
    fn apply(self, mut config: SetupConfig) -> SetupConfig {
        if let Some(url) = self.compiler_url {
            config.compiler_url = url;
        }
        if let Some(url) = self.jre_url {
            config.jre_url = url;
        }
        if let Some(secs) = self.timeout {
            config.http_timeout = Duration::from_secs(secs);
        }
        if self.keep_archives {
            config.keep_archives = true;
        }
        config
    }
}

/// Run the configure command.
pub fn run(mut args: ConfigureArgs, file: &ConfigFile) -> Result<(), CliError> {
    let config = resolve_config(file, java_home_from_env(), args.root.take());
    let config = args.apply(config);

    println!(
        "Configuring Closure Compiler in {} ...\n",
        config.root.display()
    );

    let installer = Installer::from_config(config).map_err(CliError::Config)?;
    let mut reporter = ConsoleReporter::new();

    let outcome = installer.run(&mut reporter)?;
    reporter.print_success(&outcome);
    Ok(())
}
