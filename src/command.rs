use crate::env::Environment;
use crate::error::BuildError;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// A single invocation of an external tool: program name, arguments and an
/// optional working directory.
///
/// When no working directory is set, the [`Environment`]'s current directory is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Directory the command runs in, falling back to the environment's.
    pub fn working_dir<'a>(&'a self, env: &'a Environment) -> &'a Path {
        self.current_dir.as_deref().unwrap_or(&env.current_dir)
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Output of a command whose stdout was captured instead of inherited.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    pub code: ExitCode,
    pub stdout: String,
}

/// Seam between the build tasks and the operating system.
///
/// Both methods receive the full environment the child must see; the
/// implementation is the only place where that environment becomes a real
/// process environment.
pub trait Launcher {
    /// Run the command with inherited stdio and wait for it to exit.
    fn status(&mut self, cmd: &ExternalCommand, env: &Environment) -> Result<ExitCode, BuildError>;

    /// Run the command with stdout captured and wait for it to exit.
    fn output(
        &mut self,
        cmd: &ExternalCommand,
        env: &Environment,
    ) -> Result<CapturedOutput, BuildError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_program_and_args() {
        let cmd = ExternalCommand::new("go")
            .args(["build", "-ldflags", "-s -w"])
            .arg("-v");
        assert_eq!(cmd.to_string(), "go build -ldflags -s -w -v");
        assert_eq!(cmd.get_args().len(), 4);
    }

    #[test]
    fn test_working_dir_falls_back_to_environment() {
        let env = Environment::with_dir("/work");
        let plain = ExternalCommand::new("go");
        assert_eq!(plain.working_dir(&env), Path::new("/work"));

        let moved = ExternalCommand::new("xgo").current_dir("/work/cmd");
        assert_eq!(moved.working_dir(&env), Path::new("/work/cmd"));
    }
}
