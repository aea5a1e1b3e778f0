/// Perimeter runtime launcher
///
/// Hands a staged configuration to the external perimeter runtime and waits
/// for it to finish. What the runtime does with the configuration is opaque.
/// The launcher only distinguishes a normal exit, a failing exit and an
/// interruption.
use async_trait::async_trait;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Conventional exit code for a process stopped by SIGINT
const SIGINT_EXIT_CODE: i32 = 130;

/// How long an interrupted runtime gets to finish its own shutdown
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// How a perimeter run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The runtime returned normally
    Completed,
    /// The runtime exited with a non-zero code
    Exited(i32),
    /// The user interrupted the run
    Interrupted,
}

impl LaunchOutcome {
    fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            return LaunchOutcome::Completed;
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if status.signal() == Some(2) {
                return LaunchOutcome::Interrupted;
            }
        }

        match status.code() {
            Some(SIGINT_EXIT_CODE) => LaunchOutcome::Interrupted,
            Some(code) => LaunchOutcome::Exited(code),
            None => LaunchOutcome::Exited(1),
        }
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    /// The runtime executable could not be located
    #[error(
        "Unable to locate {program}. Ensure cylestio-perimeter is installed and available on PATH."
    )]
    RuntimeUnavailable { program: String },

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed while waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// The external perimeter runtime boundary: `run(config_path)`
#[async_trait]
pub trait PerimeterRuntime: Send + Sync {
    /// Run until the runtime exits
    async fn run(&self, config_path: &Path) -> Result<LaunchOutcome, LaunchError>;
}

/// Runs the perimeter as a child process: `<program> <args...> --config <path>`
#[derive(Debug, Clone)]
pub struct ProcessRuntime {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessRuntime {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

#[async_trait]
impl PerimeterRuntime for ProcessRuntime {
    async fn run(&self, config_path: &Path) -> Result<LaunchOutcome, LaunchError> {
        let program = self.program_name();
        debug!("Spawning {} {:?} --config {}", program, self.args, config_path.display());

        // The child shares our stdio. Dropping this future kills it.
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("--config")
            .arg(config_path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => LaunchError::RuntimeUnavailable {
                    program: program.clone(),
                },
                _ => LaunchError::Spawn {
                    program: program.clone(),
                    source,
                },
            })?;

        let status = child
            .wait()
            .await
            .map_err(|source| LaunchError::Wait { program, source })?;

        let outcome = LaunchOutcome::from_status(status);
        info!("Perimeter runtime finished: {:?}", outcome);
        Ok(outcome)
    }
}

/// Run the perimeter until it exits or `shutdown` resolves
///
/// See [`launch_with_grace`]. Uses [`SHUTDOWN_GRACE`].
pub async fn launch<R, S>(
    runtime: &R,
    config_path: &Path,
    shutdown: S,
) -> Result<LaunchOutcome, LaunchError>
where
    R: PerimeterRuntime + ?Sized,
    S: Future<Output = ()>,
{
    launch_with_grace(runtime, config_path, shutdown, SHUTDOWN_GRACE).await
}

/// Run the perimeter until it exits, stopping it gracefully on `shutdown`
///
/// The terminal delivers SIGINT to the whole process group, so when
/// `shutdown` resolves the runtime is already handling the interrupt. It
/// keeps running for up to `grace` to finish that shutdown and is only
/// killed once the grace period runs out. Either way the outcome is
/// [`LaunchOutcome::Interrupted`], returned only after the runtime has exited
/// or been killed, so the staged configuration outlives it.
pub async fn launch_with_grace<R, S>(
    runtime: &R,
    config_path: &Path,
    shutdown: S,
    grace: Duration,
) -> Result<LaunchOutcome, LaunchError>
where
    R: PerimeterRuntime + ?Sized,
    S: Future<Output = ()>,
{
    let run = runtime.run(config_path);
    tokio::pin!(run);

    // Shutdown is polled first so the Ctrl-C handler is installed before the
    // runtime is spawned.
    tokio::select! {
        biased;
        _ = shutdown => {}
        result = &mut run => return result,
    }

    warn!(
        "Interrupt received; waiting up to {:?} for the perimeter runtime to stop",
        grace
    );
    match tokio::time::timeout(grace, run).await {
        Ok(Ok(outcome)) => {
            debug!("Perimeter runtime stopped after interrupt: {:?}", outcome);
            Ok(LaunchOutcome::Interrupted)
        }
        Ok(Err(e)) => Err(e),
        Err(_) => {
            warn!(
                "Perimeter runtime still running after {:?}; killing it",
                grace
            );
            Ok(LaunchOutcome::Interrupted)
        }
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
