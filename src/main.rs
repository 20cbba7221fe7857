use anyhow::Context;
use argh::FromArgs;
use backend_build::{BuildConfig, BuildError, BuildRunner, Environment, Platform, SystemLauncher};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
#[argh(help_triggers("-h", "--help"))]
/// Build the PDFium-backed Go backend for desktop, mobile and cross targets.
struct Cli {
    #[argh(positional, default = "String::from(\"help\")")]
    /// task to run: help, env, tidy, desktop, android, ios, cross or fix-pc
    command: String,
}

fn main() {
    let cli: Cli = argh::from_env();
    init_logging();

    if let Err(err) = run(&cli.command) {
        let build_error = err.downcast_ref::<BuildError>();
        // help has already been printed for an unknown command
        if !matches!(build_error, Some(BuildError::UnknownCommand(_))) {
            error!("{err:#}");
        }
        std::process::exit(build_error.map_or(1, BuildError::exit_code));
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(command: &str) -> anyhow::Result<()> {
    let env = Environment::new().context("failed to read the current directory")?;
    let config = BuildConfig::new(env.current_dir.clone());
    let mut runner = BuildRunner::new(config, env, &Platform::detect(), SystemLauncher)?;

    let mut stdout = std::io::stdout().lock();
    runner.run(command, &mut stdout)?;
    Ok(())
}
