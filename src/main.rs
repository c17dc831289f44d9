use clap::Parser;
use trade_tape::cli::{Cli, Commands};
use trade_tape::config::Config;
use trade_tape::data::{count_rows, StoreError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    trade_tape::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Capture(args) => {
            tracing::info!("Starting capture mode");
            args.execute(&config).await?;
        }
        Commands::Watch(args) => {
            tracing::info!("Starting watch mode");
            args.execute(&config).await?;
        }
        Commands::Dashboard(args) => {
            args.execute(&config).await?;
        }
        Commands::Status { input } => {
            let path = input.unwrap_or_else(|| config.capture.output_path.clone());
            match count_rows(&path) {
                Ok(count) => {
                    println!("trade-tape status");
                    println!("  File: {}", path.display());
                    println!("  Trades stored: {}", count);
                }
                Err(StoreError::NotFound(_)) => {
                    println!("No trade file at {}", path.display());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
