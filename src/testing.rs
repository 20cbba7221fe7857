//! Test doubles shared by the task and runner tests.

use crate::command::{CapturedOutput, ExitCode, ExternalCommand, Launcher};
use crate::config::BuildConfig;
use crate::env::{Environment, PKG_CONFIG_PATH};
use crate::error::BuildError;
use crate::platform::{HostOs, Platform};
use crate::runner::BuildRunner;
use std::collections::VecDeque;
use std::path::PathBuf;
use tempfile::TempDir;

/// What a launched command looked like from the child's side.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub pkg_config_path: Option<String>,
}

impl Invocation {
    fn record(cmd: &ExternalCommand, env: &Environment) -> Self {
        Self {
            program: cmd.program().to_string(),
            args: cmd
                .get_args()
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
            cwd: cmd.working_dir(env).to_path_buf(),
            pkg_config_path: env.get_var(PKG_CONFIG_PATH).map(str::to_string),
        }
    }
}

/// Records every launch instead of spawning anything.
///
/// `status` pops the next queued exit code (0 once the queue is empty).
/// `output` answers with `captured`, or fails like a missing tool when it is `None`.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    pub calls: Vec<Invocation>,
    pub exit_codes: VecDeque<ExitCode>,
    pub captured: Option<String>,
}

impl RecordingLauncher {
    pub fn with_exit_codes(codes: impl IntoIterator<Item = ExitCode>) -> Self {
        Self {
            exit_codes: codes.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn programs(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.program.as_str()).collect()
    }
}

impl Launcher for RecordingLauncher {
    fn status(&mut self, cmd: &ExternalCommand, env: &Environment) -> Result<ExitCode, BuildError> {
        self.calls.push(Invocation::record(cmd, env));
        Ok(self.exit_codes.pop_front().unwrap_or(0))
    }

    fn output(
        &mut self,
        cmd: &ExternalCommand,
        env: &Environment,
    ) -> Result<CapturedOutput, BuildError> {
        self.calls.push(Invocation::record(cmd, env));
        match &self.captured {
            Some(stdout) => Ok(CapturedOutput {
                code: 0,
                stdout: stdout.clone(),
            }),
            None => Err(BuildError::ToolNotFound(cmd.program().to_string())),
        }
    }
}

/// A runner for a Linux x86_64 host rooted in a fresh temporary directory.
pub fn workspace(launcher: RecordingLauncher) -> (TempDir, BuildRunner<RecordingLauncher>) {
    let tmp = TempDir::new().unwrap();
    let mut env = Environment::with_dir(tmp.path());
    env.set_var("HOME", "/home/builder");
    let platform = Platform::new(HostOs::Linux, "x86_64");
    let runner = BuildRunner::new(BuildConfig::new(tmp.path()), env, &platform, launcher).unwrap();
    (tmp, runner)
}
