//! Clean command - remove the unpacked compiler and bundled runtime.

use closure_setup::config::ConfigFile;
use closure_setup::layout::InstallLayout;
use closure_setup::setup;
use console::style;

use super::{java_home_from_env, resolve_config, RootArgs};
use crate::error::CliError;

/// Run the clean command.
pub fn run(args: RootArgs, file: &ConfigFile) -> Result<(), CliError> {
    let config = resolve_config(file, java_home_from_env(), args.root);
    let layout = InstallLayout::new(config.root, config.platform);

    let removed = setup::clean(&layout).map_err(CliError::Clean)?;

    if removed.is_empty() {
        println!("Nothing to clean in {}", layout.root().display());
    }
    for dir in &removed {
        println!("  {} Removed {}", style("✔").green(), dir.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_install() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("compiler")).unwrap();
        fs::create_dir_all(temp.path().join("jre").join("bin")).unwrap();
        fs::write(temp.path().join("keep.txt"), b"x").unwrap();

        let args = RootArgs {
            root: Some(temp.path().to_path_buf()),
        };
        run(args, &ConfigFile::default()).unwrap();

        assert!(!temp.path().join("compiler").exists());
        assert!(!temp.path().join("jre").exists());
        assert!(temp.path().join("keep.txt").exists());
    }
}
