use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;

use droneweather::{DroneWeatherConfig, EmailNotifier, FlightSafetyEvaluator, Notifier, logging};

/// Check airspace restrictions and weather for the configured home location
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Email the report when conditions are flyable
    #[arg(long)]
    notify: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = DroneWeatherConfig::load_from_path(args.config)?;
    logging::init(&config.logging)?;

    tracing::info!("Starting drone weather check for {}", config.home.name);

    let evaluator = FlightSafetyEvaluator::from_config(&config)?;
    let report = match evaluator.evaluate(Utc::now()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Evaluation failed: {e}");
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{report}");
    }

    if args.notify {
        match config.email {
            Some(email) => {
                EmailNotifier::new(email).notify(&report).await?;
            }
            None => tracing::warn!("--notify given but no [email] section is configured"),
        }
    }

    tracing::info!(flyable = report.flyable, "Drone weather check complete");
    Ok(())
}
