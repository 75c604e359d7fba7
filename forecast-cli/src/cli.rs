use anyhow::{Context, Result};
use chrono::{Local, Timelike};
use clap::{Args, Parser, Subcommand};
use forecast_core::{
    CacheMode, Config, Forecast, HistoryLog, HistoryRecord, Overrides, Units, provider_from_config,
    render, write_lines,
};
use inquire::{CustomType, CustomUserError, Select, Text, validator::Validation};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "forecast",
    version,
    about = "Prints the weather forecast as glyph lines for e-ink panels and status bars"
)]
pub struct Cli {
    #[command(flatten)]
    pub location: LocationArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Defaults to `show`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Request parameters. Each one overrides the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct LocationArgs {
    /// API key for the forecast service.
    #[arg(long, global = true, env = "FORECAST_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Latitude in decimal degrees.
    #[arg(long, global = true, env = "FORECAST_LATITUDE", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, global = true, env = "FORECAST_LONGITUDE", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Unit system: si, us, ca, uk2 or auto.
    #[arg(long, global = true, env = "FORECAST_UNITS", value_parser = parse_units)]
    pub units: Option<Units>,

    /// Scheme and host of a Dark Sky compatible API.
    #[arg(long, global = true, env = "FORECAST_BASE_URL")]
    pub base_url: Option<String>,
}

/// Where the forecast comes from and what is kept of it.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct SourceArgs {
    /// Read the last cached response instead of calling the API.
    #[arg(long, global = true, conflicts_with = "no_cache")]
    pub offline: bool,

    /// Do not store the response for later offline runs.
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Append the current conditions to the history log.
    #[arg(long, global = true, env = "FORECAST_RECORD")]
    pub record: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the forecast feed, one value per line.
    Show,

    /// Interactively store API key, coordinates and units in the config file.
    Configure,

    /// Print the decoded forecast as JSON.
    Dump,

    /// Print recorded observations as JSON lines, oldest first.
    History {
        /// Only the most recent N records.
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
}

fn parse_units(value: &str) -> Result<Units> {
    Units::try_from(value)
}

impl From<LocationArgs> for Overrides {
    fn from(args: LocationArgs) -> Self {
        Overrides {
            api_key: args.api_key,
            latitude: args.lat,
            longitude: args.lon,
            units: args.units,
            base_url: args.base_url,
        }
    }
}

impl SourceArgs {
    fn cache_mode(&self) -> CacheMode {
        if self.offline {
            CacheMode::Offline
        } else if self.no_cache {
            CacheMode::Bypass
        } else {
            CacheMode::Refresh
        }
    }

    /// Offline runs replay an observation that was already seen live.
    fn should_record(&self) -> bool {
        self.record && !self.offline
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let command = self.command.unwrap_or(Command::Show);
        let source = self.source;

        match command {
            Command::Show => {
                let forecast = fetch(self.location, source).await?;
                let now = Local::now();
                let lines = render(&forecast, now.hour(), &Local)?;

                let stdout = std::io::stdout();
                write_lines(&mut stdout.lock(), &lines).context("Failed to write forecast")?;
            }
            Command::Configure => configure(self.location)?,
            Command::Dump => {
                let forecast = fetch(self.location, source).await?;
                let json = serde_json::to_string_pretty(&forecast)
                    .context("Failed to serialize forecast to JSON")?;
                println!("{json}");
            }
            Command::History { limit } => {
                let records = HistoryLog::default_location()?.load()?;
                let skip = limit.map_or(0, |n| records.len().saturating_sub(n));
                for record in &records[skip..] {
                    let json = serde_json::to_string(record)
                        .context("Failed to serialize history record")?;
                    println!("{json}");
                }
            }
        }

        Ok(())
    }
}

async fn fetch(location: LocationArgs, source: SourceArgs) -> Result<Forecast> {
    let config = Config::load()?;
    let provider = provider_from_config(&config, location.into(), source.cache_mode())?;

    log::debug!("Using provider {provider:?}");
    let forecast = provider.fetch().await?;

    if source.should_record() {
        match HistoryLog::default_location() {
            Ok(history) => record(&history, &forecast),
            Err(err) => log::warn!("{err:#}"),
        }
    }

    Ok(forecast)
}

/// A failed history write is logged and never fails the run.
fn record(history: &HistoryLog, forecast: &Forecast) {
    if let Err(err) = history.append(&HistoryRecord::from(forecast)) {
        log::warn!("{err:#}");
    }
}

/// Prompt for every setting, using flags and existing values as defaults.
fn configure(location: LocationArgs) -> Result<()> {
    let mut config = Config::load()?;

    let mut key_prompt = Text::new("API key:").with_validator(non_empty);
    let current_key = location.api_key.or_else(|| config.api_key.clone());
    if let Some(key) = current_key.as_deref() {
        key_prompt = key_prompt.with_default(key);
    }
    let api_key = key_prompt.prompt().context("API key prompt aborted")?;

    let latitude = prompt_coordinate("Latitude:", location.lat.or(config.latitude), 90.0)?;
    let longitude = prompt_coordinate("Longitude:", location.lon.or(config.longitude), 180.0)?;

    let current_units = location.units.or(config.units).unwrap_or_default();
    let start = Units::all().iter().position(|u| *u == current_units).unwrap_or(0);
    let units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Units prompt aborted")?;

    config.api_key = Some(api_key.trim().to_string());
    config.latitude = Some(latitude);
    config.longitude = Some(longitude);
    config.units = Some(units);
    if location.base_url.is_some() {
        config.base_url = location.base_url;
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn non_empty(input: &str) -> Result<Validation, CustomUserError> {
    Ok(if input.trim().is_empty() {
        Validation::Invalid("API key must not be empty".into())
    } else {
        Validation::Valid
    })
}

fn prompt_coordinate(message: &str, current: Option<f64>, limit: f64) -> Result<f64> {
    let mut prompt = CustomType::<f64>::new(message)
        .with_error_message("Please enter a number in decimal degrees")
        .with_validator(move |value: &f64| -> Result<Validation, CustomUserError> {
            Ok(if value.abs() <= limit {
                Validation::Valid
            } else {
                Validation::Invalid(format!("Must be within -{limit}..={limit}").into())
            })
        });
    if let Some(value) = current {
        prompt = prompt.with_default(value);
    }

    prompt.prompt().with_context(|| format!("{message} prompt aborted"))
}
