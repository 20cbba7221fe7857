//! The named build tasks.
//!
//! Each task assembles one or more [`ExternalCommand`]s and runs them through
//! the runner's [`Launcher`]. The first failing command ends the task.

use crate::command::{ExternalCommand, Launcher};
use crate::config::{GO_BUILD_FLAGS, backend_package_path};
use crate::env::PKG_CONFIG_PATH;
use crate::error::BuildError;
use crate::pkgconfig;
use crate::runner::{BuildRunner, run_checked};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info};

/// Android ABIs paired with the PDFium distribution built for them.
const ANDROID_TARGETS: [(&str, &str); 4] = [
    ("arm", "arm"),
    ("arm64", "arm64"),
    ("386", "x86"),
    ("amd64", "x64"),
];
const ANDROID_API_LEVEL: &str = "23";
const IOS_LIBRARY: &str = "ios-device-arm64";
const IOS_FRAMEWORK: &str = "Backend.xcframework";
const CROSS_TARGETS: &str = "darwin/amd64,darwin/arm64,windows/386,windows/amd64";

/// Every task the runner understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Help,
    Env,
    Tidy,
    Desktop,
    Android,
    Ios,
    Cross,
    FixPc,
}

impl Task {
    pub const ALL: [Task; 8] = [
        Task::Help,
        Task::Env,
        Task::Tidy,
        Task::Desktop,
        Task::Android,
        Task::Ios,
        Task::Cross,
        Task::FixPc,
    ];

    /// Canonical command-line name, e.g. `fix-pc`.
    pub fn name(self) -> &'static str {
        match self {
            Task::Help => "help",
            Task::Env => "env",
            Task::Tidy => "tidy",
            Task::Desktop => "desktop",
            Task::Android => "android",
            Task::Ios => "ios",
            Task::Cross => "cross",
            Task::FixPc => "fix-pc",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Task::Help => "displays help",
            Task::Env => "show environment variables",
            Task::Tidy => "formats and updates the go.mod file",
            Task::Desktop => "compiles the local backend for the desktop platform",
            Task::Android => "compiles the local backend for the android platform",
            Task::Ios => "compiles the local backend for the ios platform",
            Task::Cross => "compiles the desktop backend for many platforms",
            Task::FixPc => "fix .pc files with absolute paths",
        }
    }

    /// Look a task up by name. `-` and `_` are interchangeable.
    pub fn parse(token: &str) -> Option<Task> {
        let normalized = token.replace('_', "-");
        Task::ALL.into_iter().find(|t| t.name() == normalized)
    }
}

/// Print the usage listing.
pub fn help(out: &mut dyn Write) -> Result<(), BuildError> {
    writeln!(out, "Usage:")?;
    writeln!(out, "  {} <command>", env!("CARGO_PKG_NAME"))?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    for task in Task::ALL {
        writeln!(out, "  {:<14}- {}", task.name(), task.summary())?;
    }
    Ok(())
}

fn go_build_flags() -> impl Iterator<Item = &'static str> {
    GO_BUILD_FLAGS.into_iter()
}

/// Render flags as a bracketed, single-quoted list: `['-v', '-trimpath']`.
fn flag_list(flags: &[&str]) -> String {
    let quoted: Vec<String> = flags.iter().map(|f| format!("'{f}'")).collect();
    format!("[{}]", quoted.join(", "))
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|e| BuildError::io(path, e))
}

fn remove_file_if_exists(path: &Path) -> Result<(), BuildError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BuildError::io(path, e)),
    }
}

fn remove_dir_if_exists(path: &Path) -> Result<(), BuildError> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            debug!("removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BuildError::io(path, e)),
    }
}

impl<L: Launcher> BuildRunner<L> {
    /// Ask pkg-config for a PDFium flag string; empty when it cannot answer.
    fn query_pdfium(
        &mut self,
        flag: &str,
        label: &str,
        out: &mut dyn Write,
    ) -> Result<String, BuildError> {
        let cmd = ExternalCommand::new("pkg-config").args([flag, "pdfium"]);
        match self.launcher.output(&cmd, &self.env) {
            Ok(output) if output.code == 0 => Ok(output.stdout.trim().to_string()),
            Ok(output) => {
                debug!("pkg-config {} exited with {}", flag, output.code);
                Ok(String::new())
            }
            Err(e) => {
                writeln!(out, "pdfium {label}: (pkg-config not available): {e}")?;
                Ok(String::new())
            }
        }
    }

    pub(crate) fn env_table(&mut self, out: &mut dyn Write) -> Result<(), BuildError> {
        let cflags = self.query_pdfium("--cflags", "CFLAGS", out)?;
        let ldflags = self.query_pdfium("--libs", "LDFLAGS", out)?;
        let var = |key: &str| self.env.get_var(key).unwrap_or_default().to_string();

        let mut rows: Vec<(String, String)> = vec![
            ("PWD".into(), self.config.root().display().to_string()),
            ("DST".into(), self.config.output_dir().display().to_string()),
            (PKG_CONFIG_PATH.into(), var(PKG_CONFIG_PATH)),
            ("pdfium CFLAGS".into(), cflags),
            ("pdfium LDFLAGS".into(), ldflags),
            ("GOBUILDFLAGS".into(), flag_list(&GO_BUILD_FLAGS)),
            ("CGO_CFLAGS".into(), var("CGO_CFLAGS")),
            (String::new(), String::new()),
        ];
        rows.extend(self.env.vars.iter().map(|(k, v)| (k.clone(), v.clone())));

        let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
        writeln!(out, "{:<width$} | Value", "Variable")?;
        writeln!(out, "{}-+-{}", "-".repeat(width), "-".repeat(50))?;
        for (key, value) in &rows {
            writeln!(out, "{key:<width$} | {value}")?;
        }
        Ok(())
    }

    pub(crate) fn tidy(&mut self) -> Result<(), BuildError> {
        let steps = [
            ExternalCommand::new("go").args(["mod", "tidy", "-v"]),
            ExternalCommand::new("gofumpt").args(["-extra", "-w", "."]),
        ];
        for cmd in &steps {
            run_checked(&mut self.launcher, cmd, &self.env)?;
        }
        Ok(())
    }

    pub(crate) fn desktop(&mut self) -> Result<(), BuildError> {
        let dst = self.config.output_dir();
        create_dir(&dst)?;

        let cmd = ExternalCommand::new("go")
            .arg("build")
            .args(go_build_flags())
            .arg("-o")
            .arg(dst.join("desktop"))
            .args(["-tags", "desktop"])
            .arg(self.config.root().join("demo"));
        run_checked(&mut self.launcher, &cmd, &self.env)
    }

    pub(crate) fn android(&mut self) -> Result<(), BuildError> {
        let dst = self.config.output_dir().join("android");
        create_dir(&dst)?;
        let package = self.config.backend_package("android");

        for (arch, library) in ANDROID_TARGETS {
            let aar = dst.join(format!("backend-{arch}.aar"));
            remove_file_if_exists(&aar)?;
            remove_file_if_exists(&dst.join(format!("backend-sources-{arch}.jar")))?;

            let mut env = self.env.clone();
            let library_dir = self.config.library_dir(&format!("android-{library}"));
            env.set_var(PKG_CONFIG_PATH, library_dir.to_string_lossy());

            info!("Building android/{arch}");
            let cmd = ExternalCommand::new("gomobile")
                .arg("bind")
                .arg("-target")
                .arg(format!("android/{arch}"))
                .args(["-androidapi", ANDROID_API_LEVEL])
                .arg("-o")
                .arg(&aar)
                .args(go_build_flags())
                .args(["-tags", "android"])
                .arg(&package);
            run_checked(&mut self.launcher, &cmd, &env)?;
        }
        Ok(())
    }

    pub(crate) fn ios(&mut self) -> Result<(), BuildError> {
        let dst = self.config.output_dir();
        create_dir(&dst)?;

        let framework = dst.join(IOS_FRAMEWORK);
        remove_dir_if_exists(&framework)?;

        let mut env = self.env.clone();
        let library_dir = self.config.library_dir(IOS_LIBRARY);
        env.set_var(PKG_CONFIG_PATH, library_dir.to_string_lossy());

        let cmd = ExternalCommand::new("gomobile")
            .args(["bind", "-target", "ios", "-o"])
            .arg(&framework)
            .args(go_build_flags())
            .args(["-tags", "ios"])
            .arg(self.config.backend_package("ios"));
        run_checked(&mut self.launcher, &cmd, &env)
    }

    pub(crate) fn cross(&mut self) -> Result<(), BuildError> {
        let dst = self.config.output_dir();
        create_dir(&dst)?;

        let cmd = ExternalCommand::new("xgo")
            .args(go_build_flags())
            .arg("--dest")
            .arg(&dst)
            .arg("--pkg")
            .arg(backend_package_path("desktop"))
            .args(["--targets", CROSS_TARGETS])
            .arg(self.config.root())
            .current_dir(self.config.backend_package("desktop"));
        run_checked(&mut self.launcher, &cmd, &self.env)
    }

    pub(crate) fn fix_pc(&mut self) -> Result<(), BuildError> {
        let changed = pkgconfig::fix_pc_files(&self.config.library_root())?;
        info!("{} .pc file(s) rewritten", changed.len());
        Ok(())
    }
}
