//! Optional SHA-256 verification of downloaded archives.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{SetupError, SetupResult};

/// Buffer size for hashing (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Calculate the lowercase hex SHA-256 of a file.
pub fn sha256_file(path: &Path) -> SetupResult<String> {
    let mut file = File::open(path).map_err(|e| SetupError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| SetupError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify that a downloaded archive matches the expected digest.
///
/// The comparison ignores case and surrounding whitespace, since digests are
/// usually pasted into config files by hand.
pub fn verify_sha256(path: &Path, expected: &str) -> SetupResult<()> {
    let actual = sha256_file(path)?;
    let expected = expected.trim().to_ascii_lowercase();
    if actual != expected {
        return Err(SetupError::ChecksumMismatch {
            filename: path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HELLO_WORLD_SHA256: &str =
        "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_sha256_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.txt");
        std::fs::write(&path, b"hello world").unwrap();

        assert_eq!(sha256_file(&path).unwrap(), HELLO_WORLD_SHA256);
    }

    #[test]
    fn test_sha256_missing_file() {
        assert!(sha256_file(Path::new("/nonexistent/file.tar.gz")).is_err());
    }

    #[test]
    fn test_verify_accepts_uppercase_digest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.txt");
        std::fs::write(&path, b"hello world").unwrap();

        let upper = format!("  {}\n", HELLO_WORLD_SHA256.to_uppercase());
        assert!(verify_sha256(&path, &upper).is_ok());
    }

    #[test]
    fn test_verify_mismatch() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("jre.tar.gz");
        std::fs::write(&path, b"hello world").unwrap();

        match verify_sha256(&path, "0000") {
            Err(SetupError::ChecksumMismatch {
                filename, actual, ..
            }) => {
                assert_eq!(filename, "jre.tar.gz");
                assert_eq!(actual, HELLO_WORLD_SHA256);
            }
            other => panic!("expected ChecksumMismatch, got {other:?}"),
        }
    }
}
