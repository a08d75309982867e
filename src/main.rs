use clap::Parser;
use tasktree::api::ApiServer;
use tasktree::cli::Cli;
use tasktree::config::AppConfig;
use tasktree::logging::{init_logging, LoggingConfig};

#[tokio::main]
async fn main() {
    // Parse CLI arguments first to get logging configuration
    let cli = Cli::parse();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        },
    };
    config.apply_cli(&cli);

    let log_config = LoggingConfig::from_args(cli.quiet, cli.verbose, cli.json)
        .with_file_output(config.log_file.clone());
    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = ApiServer::new(config).with_seed(cli.seed).run().await {
        tracing::error!(error = ?e, "Server failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
