//! Fixed repository layout the build works against.

use std::path::{Path, PathBuf};

/// Vendored PDFium distributions, relative to the workspace root.
pub const LIBRARY_ROOT: &str = "lib/pdfium";
/// Every distribution directory name starts with this.
pub const LIBRARY_DIR_PREFIX: &str = "pdfium-";
/// Where build artifacts land, relative to the workspace root.
pub const OUTPUT_DIR: &str = "demo";

/// Flags passed to every `go build` / `gomobile bind` / `xgo` invocation.
pub const GO_BUILD_FLAGS: [&str; 4] = ["-ldflags", "-s -w", "-trimpath", "-v"];

/// Paths derived from the workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    root: PathBuf,
}

impl BuildConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/demo`
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(OUTPUT_DIR)
    }

    /// `<root>/lib/pdfium`
    pub fn library_root(&self) -> PathBuf {
        self.root.join(LIBRARY_ROOT)
    }

    /// `<root>/lib/pdfium/pdfium-<suffix>`
    pub fn library_dir(&self, suffix: &str) -> PathBuf {
        self.library_root().join(format!("{LIBRARY_DIR_PREFIX}{suffix}"))
    }

    /// Go package directory of a backend entry point, e.g. `cmd/backend/local/ios`.
    pub fn backend_package(&self, target: &str) -> PathBuf {
        self.root.join(backend_package_path(target))
    }
}

/// Slash-separated package path of a backend entry point.
pub fn backend_package_path(target: &str) -> String {
    format!("cmd/backend/local/{target}")
}
