//! Error type shared by every build task.

use crate::command::ExitCode;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a build run.
///
/// Each variant maps to a process exit code through [`BuildError::exit_code`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Unsupported architecture: {arch} (on {os})")]
    UnsupportedArchitecture { os: String, arch: String },

    #[error("Unsupported operating system: {0}")]
    UnsupportedOs(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{program} failed with exit code {code}")]
    CommandFailed { program: String, code: ExitCode },

    #[error("{0}: command not found")]
    ToolNotFound(String),

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code the process should terminate with.
    ///
    /// A failed external tool passes its own code through; everything else is 1.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::CommandFailed { code, .. } => *code,
            _ => 1,
        }
    }
}
