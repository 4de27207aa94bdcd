use std::io::Write;
use std::process::ExitCode;

use agentctl::{commands, telemetry};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse CLI args
    let args = agentctl::config::Args::parse();

    if let Err(e) = telemetry::init_telemetry() {
        eprintln!("Failed to initialize telemetry: {e}");
    }

    tracing::debug!("{:?}", args);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let succeeded = match commands::invoke(&args, &mut out).await {
        Ok(succeeded) => succeeded && out.flush().is_ok(),
        Err(e) => {
            tracing::error!("Failed to write output: {e}");
            false
        }
    };

    if succeeded { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
