use clap::Parser;
use poly_scout::cli::{self, Cli, Commands};
use poly_scout::config::Config;
use std::process::ExitCode;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            match toml::from_str(include_str!("../config.toml.example")) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: bundled default config is invalid: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    // Initialize telemetry
    let _telemetry = match poly_scout::telemetry::init_telemetry(&config.telemetry) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize telemetry: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &Config) -> anyhow::Result<()> {
    match command {
        Commands::Scan(args) => {
            tracing::info!("Running single-shot scan");
            args.execute(config).await
        }
        Commands::Monitor(args) => {
            tracing::info!("Starting monitor mode");
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        tracing::info!("Shutdown requested, finishing current cycle");
                        let _ = shutdown_tx.send(true);
                    }
                    Err(e) => {
                        // Keep the sender alive so the loop runs until killed
                        tracing::warn!(error = %e, "Ctrl-C handler unavailable");
                        std::future::pending::<()>().await;
                    }
                }
            });
            args.execute(config, shutdown_rx).await
        }
        Commands::Status => cli::show_status(config),
        Commands::Config => {
            cli::show_config(config);
            Ok(())
        }
    }
}
