/// Command-line surface and run sequencing
///
/// A launch moves through the phases in [`RunPhase`]. Anything that fails
/// before `TempFileWritten` exits without cleanup because nothing has been
/// written yet. From `TempFileWritten` on, the staged directory is owned by a
/// guard that is released on every path out of [`execute`].
use crate::config::{ConfigError, ConfigStore, PortOverrides, StagedConfig};
use crate::console;
use crate::launcher::{self, LaunchError, LaunchOutcome, PerimeterRuntime, ProcessRuntime};
use crate::provider::Provider;
use crate::report::{ReportSource, SampleReportSource};
use crate::settings::Settings;
use anyhow::{Context, Result};
use clap::Parser;
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug, Clone)]
#[command(name = "agent-inspector")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Agent Inspector by Cylestio lets you debug, inspect, and evaluate agent behaviour and risk."
)]
pub struct Args {
    /// Configuration to load: openai or anthropic
    #[arg(value_enum, default_value_t = Provider::OpenAi, value_name = "PROVIDER")]
    pub provider: Provider,

    /// Override the perimeter server listening port (defaults to 3000)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Override the Live Trace web server port (defaults to 8080)
    #[arg(long = "trace-port", value_parser = clap::value_parser!(u16).range(1..))]
    pub trace_port: Option<u16>,

    /// Display the bundled configurations and exit
    #[arg(long)]
    pub show_configs: bool,

    /// Display the behavioral and PII report and exit
    #[arg(long)]
    pub show_report: bool,

    /// Report output format (used with --show-report)
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Directory holding the bundled provider configurations
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging (to stderr)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn overrides(&self) -> PortOverrides {
        PortOverrides {
            server_port: self.port,
            trace_port: self.trace_port,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Phases of a single launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    ConfigLoaded,
    ConfigPatched,
    TempFileWritten,
    Running,
    Cleanup,
    Terminal,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Idle => write!(f, "idle"),
            RunPhase::ConfigLoaded => write!(f, "config-loaded"),
            RunPhase::ConfigPatched => write!(f, "config-patched"),
            RunPhase::TempFileWritten => write!(f, "temp-file-written"),
            RunPhase::Running => write!(f, "running"),
            RunPhase::Cleanup => write!(f, "cleanup"),
            RunPhase::Terminal => write!(f, "terminal"),
        }
    }
}

fn enter(phase: RunPhase) {
    debug!(%phase, "Entering phase");
}

/// Parse-independent entry point used by `main`
pub async fn execute(args: Args) -> Result<ExitCode> {
    let settings = Settings::from_env().with_config_dir(args.config_dir.clone());
    let store = ConfigStore::locate(&settings);
    let runtime = ProcessRuntime::new(
        settings.perimeter_program.clone(),
        settings.perimeter_args.clone(),
    );

    execute_with(
        &args,
        &store,
        &SampleReportSource,
        &runtime,
        launcher::ctrl_c(),
    )
    .await
}

/// Run with injected collaborators
pub async fn execute_with<R, S>(
    args: &Args,
    store: &ConfigStore,
    reports: &dyn ReportSource,
    runtime: &R,
    shutdown: S,
) -> Result<ExitCode>
where
    R: PerimeterRuntime + ?Sized,
    S: Future<Output = ()>,
{
    if args.show_configs {
        console::print_configs(store)?;
        return Ok(ExitCode::SUCCESS);
    }

    if args.show_report {
        let report = reports.load_report()?;
        console::print_report(&report, args.format)?;
        return Ok(ExitCode::SUCCESS);
    }

    enter(RunPhase::Idle);
    let base = store
        .load(args.provider)
        .with_context(|| format!("Failed to load the {} profile", args.provider))?;
    enter(RunPhase::ConfigLoaded);

    let document = match base.with_overrides(&args.overrides()) {
        Ok(document) => document,
        Err(e @ ConfigError::TraceInterceptorNotFound) => {
            console::print_error(&e.to_string());
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context("Failed to apply port overrides"),
    };
    enter(RunPhase::ConfigPatched);

    let report = reports.load_report()?;
    console::print_banner();
    console::print_known_issues(&report.known_issues);
    console::print_loading(args.provider);

    let staged = StagedConfig::write(&document, args.provider)
        .context("Failed to write patched configuration")?;
    enter(RunPhase::TempFileWritten);
    console::print_using_config(staged.path());

    enter(RunPhase::Running);
    let result = launcher::launch(runtime, staged.path(), shutdown).await;

    enter(RunPhase::Cleanup);
    staged.cleanup();
    enter(RunPhase::Terminal);

    Ok(match result {
        Ok(LaunchOutcome::Completed) => ExitCode::SUCCESS,
        Ok(LaunchOutcome::Interrupted) => {
            console::print_interrupted();
            ExitCode::SUCCESS
        }
        Ok(LaunchOutcome::Exited(code)) => {
            info!("Perimeter runtime exited with code {}", code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
        Err(e @ LaunchError::RuntimeUnavailable { .. }) => {
            console::print_error(&e.to_string());
            ExitCode::FAILURE
        }
        Err(e) => return Err(e.into()),
    })
}
