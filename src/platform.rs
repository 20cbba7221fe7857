//! Host detection and the PDFium distribution lookup table.

use crate::error::BuildError;
use std::fmt;

/// Operating systems the build knows how to target from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Linux,
    Darwin,
    Other(String),
}

impl HostOs {
    /// Map a Rust target OS name (`std::env::consts::OS`).
    pub fn from_target_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            "macos" => Self::Darwin,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => f.write_str("Windows"),
            Self::Linux => f.write_str("Linux"),
            Self::Darwin => f.write_str("Darwin"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Operating system plus machine name, in the spelling the host itself uses
/// (`AMD64` on Windows, `arm64` on macOS, `x86_64` or `aarch64` on Linux).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: HostOs,
    pub arch: String,
}

impl Platform {
    pub fn new(os: HostOs, arch: impl Into<String>) -> Self {
        Self {
            os,
            arch: arch.into(),
        }
    }

    /// Platform of the running process.
    pub fn detect() -> Self {
        let os = HostOs::from_target_os(std::env::consts::OS);
        let arch = machine_name(&os, std::env::consts::ARCH);
        Self { os, arch }
    }

    /// Name suffix of the PDFium distribution for this platform,
    /// e.g. `linux-x64` for `lib/pdfium/pdfium-linux-x64`.
    pub fn library_suffix(&self) -> Result<&'static str, BuildError> {
        let arch = self.arch.as_str();
        match self.os {
            HostOs::Windows => Ok(if arch == "AMD64" { "win-x64" } else { "win-x86" }),
            HostOs::Linux => match arch {
                "x86_64" => Ok("linux-x64"),
                "aarch64" => Ok("linux-arm64"),
                a if a.starts_with("arm") => Ok("linux-arm"),
                a if a.contains("86") => Ok("linux-x86"),
                _ => Err(BuildError::UnsupportedArchitecture {
                    os: self.os.to_string(),
                    arch: self.arch.clone(),
                }),
            },
            HostOs::Darwin => Ok(if arch == "arm64" { "mac-arm64" } else { "mac-x64" }),
            HostOs::Other(ref name) => Err(BuildError::UnsupportedOs(name.clone())),
        }
    }
}

/// Translate Rust's architecture name into the host's own machine name.
fn machine_name(os: &HostOs, rust_arch: &str) -> String {
    let name = match (os, rust_arch) {
        (HostOs::Windows, "x86_64") => "AMD64",
        (HostOs::Windows, "aarch64") => "ARM64",
        (HostOs::Darwin, "aarch64") => "arm64",
        (HostOs::Linux, "x86") => "i686",
        (_, other) => other,
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffix(os: HostOs, arch: &str) -> Result<&'static str, BuildError> {
        Platform::new(os, arch).library_suffix()
    }

    #[test]
    fn test_windows_table() {
        assert_eq!(suffix(HostOs::Windows, "AMD64").unwrap(), "win-x64");
        assert_eq!(suffix(HostOs::Windows, "x86").unwrap(), "win-x86");
        assert_eq!(suffix(HostOs::Windows, "ARM64").unwrap(), "win-x86");
    }

    #[test]
    fn test_linux_table() {
        assert_eq!(suffix(HostOs::Linux, "x86_64").unwrap(), "linux-x64");
        assert_eq!(suffix(HostOs::Linux, "aarch64").unwrap(), "linux-arm64");
        assert_eq!(suffix(HostOs::Linux, "armv7l").unwrap(), "linux-arm");
        assert_eq!(suffix(HostOs::Linux, "arm").unwrap(), "linux-arm");
        assert_eq!(suffix(HostOs::Linux, "i686").unwrap(), "linux-x86");
        assert_eq!(suffix(HostOs::Linux, "i386").unwrap(), "linux-x86");
    }

    #[test]
    fn test_linux_unknown_arch_is_rejected() {
        let err = suffix(HostOs::Linux, "riscv64").unwrap_err();
        assert!(matches!(
            err,
            BuildError::UnsupportedArchitecture { ref arch, .. } if arch == "riscv64"
        ));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("riscv64"));
    }

    #[test]
    fn test_darwin_table() {
        assert_eq!(suffix(HostOs::Darwin, "arm64").unwrap(), "mac-arm64");
        assert_eq!(suffix(HostOs::Darwin, "x86_64").unwrap(), "mac-x64");
    }

    #[test]
    fn test_unknown_os_is_rejected() {
        let err = suffix(HostOs::Other("freebsd".to_string()), "x86_64").unwrap_err();
        assert!(matches!(err, BuildError::UnsupportedOs(ref os) if os == "freebsd"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_machine_names_follow_host_spelling() {
        assert_eq!(machine_name(&HostOs::Windows, "x86_64"), "AMD64");
        assert_eq!(machine_name(&HostOs::Darwin, "aarch64"), "arm64");
        assert_eq!(machine_name(&HostOs::Darwin, "x86_64"), "x86_64");
        assert_eq!(machine_name(&HostOs::Linux, "aarch64"), "aarch64");
        assert_eq!(machine_name(&HostOs::Linux, "x86"), "i686");
    }

    #[test]
    fn test_detect_matches_target() {
        let platform = Platform::detect();
        assert_eq!(platform.os, HostOs::from_target_os(std::env::consts::OS));
        assert!(!platform.arch.is_empty());
    }
}
