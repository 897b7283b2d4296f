use vidfetch_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Log to the state file; fall back to stderr rather than refusing to run.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!(error = %err, "could not open log file, logging to stderr");
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("vidfetch error: {:#}", err);
        std::process::exit(1);
    }
}
