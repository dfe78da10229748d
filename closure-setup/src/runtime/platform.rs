//! Host platform buckets for the bundled runtime.

use std::fmt;

/// Platform bucket used to pick a subdirectory of the bundled runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux and every other OS.
    Linux,
}

impl Platform {
    /// The platform this binary is running on.
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map an OS identifier to a bucket.
    ///
    /// Matching is case-insensitive on the prefix: `win*` is Windows,
    /// `darwin*` and `mac*` are macOS, anything else is Linux.
    pub fn from_os_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        if name.starts_with("win") {
            Self::Windows
        } else if name.starts_with("darwin") || name.starts_with("mac") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    /// Name of the platform subdirectory in the unpacked runtime archive.
    pub fn bundle_dir_name(&self) -> &'static str {
        match self {
            Self::Windows => "bin_windows",
            Self::MacOs => "bin_mac",
            Self::Linux => "bin_linux",
        }
    }

    /// File name of the Java executable.
    pub fn java_executable(&self) -> &'static str {
        match self {
            Self::Windows => "java.exe",
            Self::MacOs | Self::Linux => "java",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_os_names() {
        assert_eq!(Platform::from_os_name("windows"), Platform::Windows);
        assert_eq!(Platform::from_os_name("win32"), Platform::Windows);
        assert_eq!(Platform::from_os_name("Darwin"), Platform::MacOs);
        assert_eq!(Platform::from_os_name("macos"), Platform::MacOs);
        assert_eq!(Platform::from_os_name("linux"), Platform::Linux);
        assert_eq!(Platform::from_os_name("freebsd"), Platform::Linux);
        assert_eq!(Platform::from_os_name(""), Platform::Linux);
    }

    #[test]
    fn test_bundle_dir_names() {
        assert_eq!(Platform::Windows.bundle_dir_name(), "bin_windows");
        assert_eq!(Platform::MacOs.bundle_dir_name(), "bin_mac");
        assert_eq!(Platform::Linux.bundle_dir_name(), "bin_linux");
    }

    #[test]
    fn test_current_matches_target() {
        let current = Platform::current();
        if cfg!(target_os = "windows") {
            assert_eq!(current, Platform::Windows);
        } else if cfg!(target_os = "macos") {
            assert_eq!(current, Platform::MacOs);
        } else {
            assert_eq!(current, Platform::Linux);
        }
    }

    proptest! {
        #[test]
        fn prop_win_prefix_is_windows(suffix in "[a-zA-Z0-9]{0,8}") {
            prop_assert_eq!(Platform::from_os_name(&format!("WiN{suffix}")), Platform::Windows);
        }

        #[test]
        fn prop_other_names_are_linux(name in "[a-lnoq-vx-z][a-z]{0,8}") {
            // No leading 'w', 'm' or 'd', so never a Windows or macOS prefix.
            prop_assume!(!name.starts_with("d"));
            prop_assert_eq!(Platform::from_os_name(&name), Platform::Linux);
        }
    }
}
