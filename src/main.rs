use std::process::ExitCode;

use clap::Parser;
use topicsub::app::{Application, RunOutcome};
use topicsub::config::{DEFAULT_CONFIG_FILE, Settings, load_config_from};
use topicsub::utils::error::AppError;
use topicsub::utils::logging;
use tracing::{error, info, warn};

/// Publish one message through a topic exchange and wait for it to arrive.
#[derive(Parser)]
#[command(name = "topicsub")]
struct Cli {
    /// Configuration file, without extension
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Log level override (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = match load_config_from(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            logging::init(cli.log_level.as_deref().unwrap_or("info"));
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(cli.log_level.as_deref().unwrap_or(&settings.logging.level));

    match run(&settings).await {
        Ok(RunOutcome::Received) => {
            info!("Round trip complete");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::TimedOut) => {
            warn!("Exiting without receipt confirmation");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &Settings) -> Result<RunOutcome, AppError> {
    let app = Application::bootstrap(settings)?;
    let outcome = app.run().await?;
    app.shutdown().await?;
    Ok(outcome)
}
