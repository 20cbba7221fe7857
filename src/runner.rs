use crate::command::{ExternalCommand, Launcher};
use crate::config::BuildConfig;
use crate::env::{Environment, PKG_CONFIG_PATH};
use crate::error::BuildError;
use crate::external::SystemLauncher;
use crate::pkgconfig;
use crate::platform::Platform;
use crate::tasks::{self, Task};
use std::io::Write;
use tracing::{error, info};

/// Runs build tasks against one workspace.
///
/// The runner owns the prepared [`Environment`] (toolchain variables and the
/// host's `PKG_CONFIG_PATH` already applied) and a [`Launcher`] that turns
/// [`ExternalCommand`]s into child processes.
///
/// Example
/// ```no_run
/// use backend_build::{BuildConfig, BuildRunner, Environment, Platform, SystemLauncher};
/// let env = Environment::new().unwrap();
/// let config = BuildConfig::new(env.current_dir.clone());
/// let mut runner =
///     BuildRunner::new(config, env, &Platform::detect(), SystemLauncher).unwrap();
/// runner.run("desktop", &mut std::io::stdout()).unwrap();
/// ```
pub struct BuildRunner<L = SystemLauncher> {
    pub(crate) config: BuildConfig,
    pub(crate) env: Environment,
    pub(crate) launcher: L,
}

impl<L: Launcher> BuildRunner<L> {
    /// Prepare the environment for `platform`.
    ///
    /// Fails when the platform has no vendored PDFium distribution.
    pub fn new(
        config: BuildConfig,
        mut env: Environment,
        platform: &Platform,
        launcher: L,
    ) -> Result<Self, BuildError> {
        info!("Detected OS: {}, Architecture: {}", platform.os, platform.arch);
        env.apply_toolchain(&platform.os);

        let library_dir = config.library_dir(platform.library_suffix()?);
        env.set_var(PKG_CONFIG_PATH, library_dir.to_string_lossy());

        Ok(Self {
            config,
            env,
            launcher,
        })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Run the task named by `token`.
    ///
    /// The `.pc` files are patched first, whatever the token. An unknown token
    /// prints the help listing to `out` and launches nothing.
    pub fn run(&mut self, token: &str, out: &mut dyn Write) -> Result<(), BuildError> {
        pkgconfig::fix_pc_files(&self.config.library_root())?;

        let Some(task) = Task::parse(token) else {
            writeln!(out, "Unknown command: {token}")?;
            tasks::help(out)?;
            return Err(BuildError::UnknownCommand(token.to_string()));
        };
        self.execute(task, out)
    }

    /// Run a single task.
    pub fn execute(&mut self, task: Task, out: &mut dyn Write) -> Result<(), BuildError> {
        match task {
            Task::Help => tasks::help(out),
            Task::Env => self.env_table(out),
            Task::Tidy => self.tidy(),
            Task::Desktop => self.desktop(),
            Task::Android => self.android(),
            Task::Ios => self.ios(),
            Task::Cross => self.cross(),
            Task::FixPc => self.fix_pc(),
        }
    }
}

/// Launch `cmd` and turn a non-zero exit into [`BuildError::CommandFailed`].
pub(crate) fn run_checked<L: Launcher + ?Sized>(
    launcher: &mut L,
    cmd: &ExternalCommand,
    env: &Environment,
) -> Result<(), BuildError> {
    info!("Running: {cmd}");
    let code = launcher.status(cmd, env)?;
    if code != 0 {
        error!("Command failed with exit code {code}");
        return Err(BuildError::CommandFailed {
            program: cmd.program().to_string(),
            code,
        });
    }
    Ok(())
}
