//! closure-setup CLI - Command-line interface
//!
//! Configures the Closure Compiler after installation: downloads the compiler,
//! then finds or installs a Java runtime that can run it.

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use closure_setup::logging::{self, LogConfig};

use commands::{check, clean, configure};
use error::CliError;

#[derive(Parser)]
#[command(name = "closure-setup")]
#[command(version, about = "Configure the Closure Compiler and a Java runtime", long_about = None)]
#[command(after_help = "\
CONFIGURATION:
    Settings are read from config.ini in the user config directory
    (~/.config/closure-setup/config.ini on Linux) unless --config is given.
    CLI arguments override config file values; JAVA_HOME is used when the
    config file does not set java.java_home.

ENVIRONMENT VARIABLES:
    JAVA_HOME    System Java installation to test first
    RUST_LOG     Log filter, overrides --verbose")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the compiler and set up a Java runtime (default)
    Configure(configure::ConfigureArgs),

    /// Report which Java runtime would be used, without downloading anything
    Check(commands::RootArgs),

    /// Remove the unpacked compiler and bundled runtime
    Clean(commands::RootArgs),
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig {
        verbosity: cli.verbose,
        log_file: cli.log_file.clone(),
    };
    // Flushes the log file on drop.
    let _log_guard = match logging::init(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(cli) {
        output::print_error(&e);
        process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let file = commands::load_config_file(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Configure(args)) => configure::run(args, &file),
        Some(Commands::Check(args)) => check::run(args, &file),
        Some(Commands::Clean(args)) => clean::run(args, &file),
        None => configure::run(configure::ConfigureArgs::default(), &file),
    }
}
