#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the hazard map overlay engine.

mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hazard_map_overlay::EngineConfig;

#[derive(Parser)]
#[command(name = "hazard_map", about = "Accident hazard map overlay engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate reports into per-zone risk records
    Zones {
        /// JSON file containing an array of accident reports
        #[arg(long)]
        reports: PathBuf,
        /// TOML config file (defaults to the embedded config)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Compute heat-map intensities for reports
    Heat {
        /// JSON file containing an array of accident reports
        #[arg(long)]
        reports: PathBuf,
    },
    /// Fetch road geometry and assign risk to each segment
    Roads {
        /// JSON file containing `[{ segmentId, riskScore, accidentCount? }]`
        #[arg(long)]
        overrides: Option<PathBuf>,
        /// TOML config file (defaults to the embedded config)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Emit all overlays as a single JSON document
    Render {
        /// JSON file containing an array of accident reports
        #[arg(long)]
        reports: PathBuf,
        /// JSON file containing road score overrides
        #[arg(long)]
        overrides: Option<PathBuf>,
        /// TOML config file (defaults to the embedded config)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let document = match cli.command {
        Commands::Zones { reports, config } => {
            let config = EngineConfig::load(config.as_deref())?;
            let reports = render::read_reports(&reports)?;
            let zones = render::load_zones(&client, &config).await;
            render::zones_document(&reports, &zones)
        }
        Commands::Heat { reports } => {
            let reports = render::read_reports(&reports)?;
            render::heat_document(&reports)
        }
        Commands::Roads { overrides, config } => {
            let config = EngineConfig::load(config.as_deref())?;
            let overrides = overrides
                .as_deref()
                .map(render::read_overrides)
                .transpose()?;
            let layer = render::road_layer(client, &config, overrides);
            render::roads_document(&layer).await
        }
        Commands::Render {
            reports,
            overrides,
            config,
        } => {
            let config = EngineConfig::load(config.as_deref())?;
            let reports = render::read_reports(&reports)?;
            let overrides = overrides
                .as_deref()
                .map(render::read_overrides)
                .transpose()?;
            let zones = render::load_zones(&client, &config).await;
            let layer = render::road_layer(client, &config, overrides);
            render::full_document(&reports, &zones, &layer).await
        }
    };

    println!("{}", serde_json::to_string_pretty(&document)?);

    Ok(())
}
