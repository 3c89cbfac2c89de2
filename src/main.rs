//! Wearcast - do you need an umbrella, jacket, gloves or scarf today?
//!
//! Usage:
//! ```bash
//! # What to wear in Oslo right now
//! wearcast now Oslo
//!
//! # Machine-readable output
//! wearcast --json now "New York"
//!
//! # Tune when a jacket is recommended
//! wearcast thresholds set --jacket-temp 15 --jacket-wind 25
//! wearcast thresholds show
//! wearcast thresholds reset
//! ```

mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use wearcast_advice::{Controller, SearchState};
use wearcast_core::{config::default_config_dir, Config, ThresholdConfig, ThresholdStore};
use wearcast_weather::{ProviderSettings, RetryConfig, WeatherProvider};

#[derive(Parser)]
#[command(
    name = "wearcast",
    version,
    about = "Tells you whether you need an umbrella, jacket, gloves or scarf today"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding config.toml and thresholds.toml
    #[arg(long, global = true, env = "WEARCAST_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show current weather and what to bring for a place
    Now {
        /// Place name, e.g. "Oslo" or "New York"
        #[arg(required = true, num_args = 1..)]
        place: Vec<String>,
    },
    /// Inspect or change recommendation thresholds
    Thresholds {
        #[command(subcommand)]
        action: ThresholdCommand,
    },
}

#[derive(Subcommand)]
enum ThresholdCommand {
    /// Print the active thresholds
    Show,
    /// Change one or more thresholds; others keep their current value
    Set(SetThresholds),
    /// Restore the defaults
    Reset,
}

#[derive(Args)]
struct SetThresholds {
    /// Jacket needed at or below this temperature (°C)
    #[arg(long, allow_negative_numbers = true)]
    jacket_temp: Option<f64>,

    /// Jacket needed at or above this wind speed (km/h)
    #[arg(long, allow_negative_numbers = true)]
    jacket_wind: Option<f64>,

    /// Gloves needed at or below this temperature (°C)
    #[arg(long, allow_negative_numbers = true)]
    gloves_temp: Option<f64>,

    /// Scarf needed this many degrees below the gloves threshold
    #[arg(long, allow_negative_numbers = true)]
    scarf_offset: Option<f64>,
}

impl SetThresholds {
    fn apply(&self, current: &ThresholdConfig) -> ThresholdConfig {
        ThresholdConfig {
            jacket_temperature_ceiling_c: self
                .jacket_temp
                .unwrap_or(current.jacket_temperature_ceiling_c),
            jacket_wind_floor_kmh: self.jacket_wind.unwrap_or(current.jacket_wind_floor_kmh),
            gloves_temperature_ceiling_c: self
                .gloves_temp
                .unwrap_or(current.gloves_temperature_ceiling_c),
            scarf_offset_c: self.scarf_offset.unwrap_or(current.scarf_offset_c),
        }
    }
}

fn provider_settings(config: &Config) -> ProviderSettings {
    let weather = &config.weather;
    ProviderSettings {
        geocoding_url: weather.geocoding_url.clone(),
        forecast_url: weather.forecast_url.clone(),
        timeout: Duration::from_secs(weather.timeout_secs),
        retry: RetryConfig {
            max_retries: weather.max_retries,
            ..RetryConfig::default()
        },
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    wearcast_core::init(if cli.verbose { "debug" } else { "warn" })?;

    let config_dir = cli.config_dir.clone().unwrap_or_else(default_config_dir);
    let (config, _) = Config::load_validated(&config_dir)?;
    tracing::debug!("Using config directory {}", config.config_dir.display());

    let provider = WeatherProvider::new(provider_settings(&config))?;
    let store = ThresholdStore::new(config.thresholds_path());
    let mut controller = Controller::new(provider, store);

    match cli.command {
        Command::Now { place } => {
            let query = place.join(" ");

            match controller.search(&query).await.clone() {
                SearchState::Idle => render::idle(cli.json)?,
                SearchState::Error { message } => {
                    render::error(&message, cli.json)?;
                    return Ok(ExitCode::FAILURE);
                }
                _ => render::search_result(&controller, cli.json)?,
            }
        }
        Command::Thresholds { action } => {
            match action {
                ThresholdCommand::Show => {}
                ThresholdCommand::Set(changes) => {
                    let updated = changes.apply(controller.thresholds());
                    controller.update_thresholds(updated)?;
                }
                ThresholdCommand::Reset => controller.reset_thresholds(),
            }
            render::thresholds(controller.thresholds(), cli.json)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
