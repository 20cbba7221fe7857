//! Build orchestration for the PDFium-backed Go backend.
//!
//! Every build goes through the same steps: the vendored PDFium `.pc` files
//! get an absolute `prefix=`, the cgo toolchain variables are prepared in an
//! explicit [`Environment`], and one named [`Task`] shells out to `go`,
//! `gomobile`, `xgo` or `pkg-config`. A failing tool ends the run with the
//! tool's own exit code, see [`BuildError::exit_code`].
//!
//! The main entry point is [`BuildRunner`]. External processes go through the
//! [`Launcher`] trait so tasks can be driven without the Go toolchain installed.

pub mod command;
pub mod config;
pub mod env;
mod error;
mod external;
pub mod pkgconfig;
pub mod platform;
mod runner;
mod tasks;
#[cfg(test)]
mod testing;

pub use command::{CapturedOutput, ExitCode, ExternalCommand, Launcher};
pub use config::BuildConfig;
pub use env::Environment;
pub use error::BuildError;
pub use external::{SystemLauncher, find_command_path};
pub use platform::{HostOs, Platform};
pub use runner::BuildRunner;
pub use tasks::{Task, help};
