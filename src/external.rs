use crate::command::{CapturedOutput, ExitCode, ExternalCommand, Launcher};
use crate::env::Environment;
use crate::error::BuildError;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// Launches real child processes.
///
/// The child sees exactly the variables of the [`Environment`] it is given;
/// nothing leaks in from this process's own environment.
#[derive(Debug, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    fn prepare(cmd: &ExternalCommand, env: &Environment) -> Result<Command, BuildError> {
        let search_paths = env.get_var("PATH").unwrap_or_default();
        let program = cmd.program();
        let executable = find_command_path(OsStr::new(search_paths), Path::new(program))
            .ok_or_else(|| BuildError::ToolNotFound(program.to_string()))?;
        debug!("resolved {} to {}", program, executable.display());

        let mut child = Command::new(&*executable);
        child
            .args(cmd.get_args())
            .env_clear()
            .envs(&env.vars)
            .current_dir(cmd.working_dir(env));
        Ok(child)
    }
}

impl Launcher for SystemLauncher {
    fn status(&mut self, cmd: &ExternalCommand, env: &Environment) -> Result<ExitCode, BuildError> {
        let mut child = Self::prepare(cmd, env)?;
        let exit_status = child
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| BuildError::io(cmd.working_dir(env), e))?;
        Ok(exit_code(exit_status))
    }

    fn output(
        &mut self,
        cmd: &ExternalCommand,
        env: &Environment,
    ) -> Result<CapturedOutput, BuildError> {
        let mut child = Self::prepare(cmd, env)?;
        let output = child
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| BuildError::io(cmd.working_dir(env), e))?;
        Ok(CapturedOutput {
            code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

fn exit_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `bin/xgo`): returns it if it exists.
/// - `./foo` on Unix or any existing relative path on other platforms: returns it.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first existing match. On Windows `<name>.exe` is tried as well.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    for dir in std::env::split_paths(search_paths) {
        let path = dir.join(cmd);
        if let Some(path) = find_by_path(&path) {
            return Some(path.to_owned());
        }
        if cfg!(windows) {
            let exe = path.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.is_file() { Some(path) } else { None }
}
