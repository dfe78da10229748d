//! Removal of temporary archive downloads.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, warn};

/// Deletes the listed files when dropped, whatever the outcome of the run.
///
/// Errors are logged and swallowed. A file that was never created is fine.
#[derive(Debug)]
pub struct TempArchives {
    paths: Vec<PathBuf>,
    enabled: bool,
}

impl TempArchives {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            enabled: true,
        }
    }

    /// Keep the files instead of deleting them.
    pub fn keep(mut self, keep: bool) -> Self {
        self.enabled = !keep;
        self
    }

    /// Remove the files now. Called automatically on drop.
    pub fn remove_all(&mut self) {
        if !self.enabled {
            return;
        }
        for path in self.paths.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "Removed temporary archive"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove temporary archive"),
            }
        }
    }
}

impl Drop for TempArchives {
    fn drop(&mut self) {
        self.remove_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_removes_on_drop() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.tar.gz");
        let b = temp.path().join("b.tar.gz");
        fs::write(&a, b"a").unwrap();

        {
            let _guard = TempArchives::new(vec![a.clone(), b.clone()]);
        }

        assert!(!a.exists());
        assert!(!b.exists());
    }

    #[test]
    fn test_keep_leaves_files() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.tar.gz");
        fs::write(&a, b"a").unwrap();

        drop(TempArchives::new(vec![a.clone()]).keep(true));

        assert!(a.exists());
    }

    #[test]
    fn test_directory_in_place_of_file_is_swallowed() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("not-a-file");
        fs::create_dir(&dir).unwrap();

        drop(TempArchives::new(vec![dir.clone()]));

        assert!(dir.exists());
    }
}
