//! Host platform probe.
//!
//! Transport code asks these questions to pick OS-specific socket options.
//! Answers come from the compile-target OS name and never fail: an
//! unrecognized OS answers `false` to every query.

use serde::Serialize;

/// Operating system family the process runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Windows,
    #[serde(rename = "macos")]
    MacOS,
    Other,
}

impl Platform {
    /// Probe the current host.
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os_name(os: &str) -> Self {
        match os {
            "linux" => Platform::Linux,
            "windows" => Platform::Windows,
            "macos" => Platform::MacOS,
            _ => Platform::Other,
        }
    }

    pub fn is_linux(&self) -> bool {
        matches!(self, Platform::Linux)
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    pub fn is_macos(&self) -> bool {
        matches!(self, Platform::MacOS)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::MacOS => "macos",
            Platform::Other => "other",
        };
        f.write_str(name)
    }
}

/// Is the process running on Linux.
pub fn is_linux() -> bool {
    Platform::current().is_linux()
}

/// Is the process running on Windows.
pub fn is_windows() -> bool {
    Platform::current().is_windows()
}

/// Is the process running on macOS.
pub fn is_macos() -> bool {
    Platform::current().is_macos()
}
