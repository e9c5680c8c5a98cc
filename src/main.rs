use clap::Parser;
use rabot::cli::handle_ask_command;
use rabot::cli::handle_config_command;
use rabot::cli::handle_index_command;
use rabot::cli::handle_serve_api;
use rabot::cli::print_error;
use rabot::cli::Cli;
use rabot::cli::Commands;
use rabot::AppConfig;
use rabot::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match AppConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            print_error(&format!("Failed to load configuration: {e}"));
            return Err(e);
        }
    };

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = if cli.verbose {
        rabot::logging::init_logging_with_level("debug", &config.logging)?
    } else {
        rabot::logging::init_logging(&config.logging)?
    };
    info!("Configuration loaded successfully");

    let result = match cli.command {
        Commands::Index { force } => handle_index_command(&config, force).await,
        Commands::Ask { question, json } => handle_ask_command(&config, question, json).await,
        Commands::Serve { host, port, cors } => handle_serve_api(&config, host, port, cors).await,
        Commands::Config => handle_config_command(&config),
    };

    if let Err(e) = &result {
        print_error(&e.to_string());
        if e.is_startup_fatal() {
            tracing::error!("Startup failed: {}", e);
        }
    }
    result
}
