//! Check command - report the runtime that would be used.

use closure_setup::config::ConfigFile;
use closure_setup::setup::Installer;
use console::style;

use super::{java_home_from_env, resolve_config, RootArgs};
use crate::error::CliError;

/// Run the check command.
pub fn run(args: RootArgs, file: &ConfigFile) -> Result<(), CliError> {
    let config = resolve_config(file, java_home_from_env(), args.root);
    let installer = Installer::from_config(config).map_err(CliError::Config)?;

    let inspection = installer.inspect();

    match &inspection.compiler_jar {
        Some(jar) => println!("  {} Compiler: {}", style("✔").green(), jar.display()),
        None => println!(
            "  {} Compiler not found in {}",
            style("✖").red(),
            installer.layout().compiler_dir().display()
        ),
    }

    match &inspection.runtime {
        Some(runtime) => {
            let kind = if runtime.is_bundled() { "bundled" } else { "system" };
            println!("  {} Java ({}): {}", style("✔").green(), kind, runtime);
            if let Some(version) = &inspection.java_version {
                println!("  | version {}", version);
            }
            Ok(())
        }
        None => Err(CliError::NoRuntime),
    }
}
