//! `vitrine` - Portfolio page animation engines

use clap::Parser;

use vitrine::cli::args::Cli;
use vitrine::cli::commands;
use vitrine::error::ExitCode;
use vitrine::observability::{LogSettings, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(&LogSettings::from_cli(&cli));

    // A second Ctrl+C forces exit while a realtime run is winding down.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nShutting down... (press Ctrl+C again to force)");
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(ExitCode::INTERRUPTED);
            }
        }
    });

    let result = commands::dispatch(cli).await;

    match result {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
