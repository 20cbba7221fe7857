use crate::platform::HostOs;
use std::collections::BTreeMap;
use std::env as stdenv;
use std::ffi::OsStr;
use std::path::PathBuf;

/// Variables every cgo build needs, regardless of host.
const TOOLCHAIN_VARS: &[(&str, &str)] = &[
    ("CGO_ENABLED", "1"),
    ("CC", "clang"),
    ("CXX", "clang++"),
    ("CGO_CFLAGS", "-O3 -g"),
    ("CGO_LDFLAGS", "-lc++"),
    ("CGO_CXXFLAGS", "-std=c++20 -stdlib=libc++"),
];

/// Linker flags for the Apple frameworks PDFium depends on.
pub const DARWIN_FRAMEWORK_FLAGS: &str = "-framework CoreGraphics -framework CoreFoundation \
     -framework Foundation -framework Quartz -framework QuartzCore -lc++";

/// Variable read by `pkg-config` to locate `.pc` files.
pub const PKG_CONFIG_PATH: &str = "PKG_CONFIG_PATH";

/// Explicit view of the environment handed to every external tool.
///
/// The environment contains:
/// - `vars`: every variable a child process will see, kept sorted by name.
/// - `current_dir`: the default working directory for child processes.
///
/// Tasks that need a one-off override clone this value and modify the clone;
/// the process's own environment is never written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, CGO_CFLAGS).
    pub vars: BTreeMap<String, String>,
    /// The working directory for command execution.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self::from_vars(stdenv::vars_os(), stdenv::current_dir()?))
    }

    /// Build an environment from raw name/value pairs.
    ///
    /// Names and values that are not valid Unicode are converted lossily.
    pub fn from_vars<I, K, V>(vars: I, current_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| {
                (
                    k.as_ref().to_string_lossy().into_owned(),
                    v.as_ref().to_string_lossy().into_owned(),
                )
            })
            .collect();
        Self {
            vars,
            current_dir: current_dir.into(),
        }
    }

    /// An environment with no variables, rooted at `dir`.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: BTreeMap::new(),
            current_dir: dir.into(),
        }
    }

    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a variable.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Overwrite the compiler selection and cgo flags for a build on `os`.
    pub fn apply_toolchain(&mut self, os: &HostOs) {
        for (key, val) in TOOLCHAIN_VARS {
            self.set_var(*key, *val);
        }
        if *os == HostOs::Darwin {
            self.set_var("LDFLAGS", DARWIN_FRAMEWORK_FLAGS);
            self.set_var("CGO_LDFLAGS", DARWIN_FRAMEWORK_FLAGS);
        }
    }
}
