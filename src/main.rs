use agent_inspector::cli::{self, Args};
use agent_inspector::console;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr; stdout is for console output
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    debug!("Starting agent-inspector v{}", env!("CARGO_PKG_VERSION"));

    // No process::exit here: the staged config guard must drop first
    match cli::execute(args).await {
        Ok(code) => code,
        Err(e) => {
            console::print_error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}
