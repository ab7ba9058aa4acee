use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::InquireError;
use std::process::ExitCode;
use weatherview_core::{
    Config, Coordinates, Display, FileCityStore, GeoLocator, IpLocator, NoGeolocation, Query,
    TemperatureUnit, WeatherApp, display::DEFAULT_ICON_BASE_URL, provider_from_config,
};

use crate::{consent::PromptedLocator, terminal::TerminalPresenter};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherview", version, about = "Current weather and a 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Display unit: celsius (c) or fahrenheit (f). Defaults to the configured unit.
    #[arg(long, global = true, value_parser = parse_unit)]
    pub units: Option<TemperatureUnit>,

    /// Never ask for the device location at startup.
    #[arg(long, global = true)]
    pub no_geolocation: bool,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and display preferences.
    Configure,

    /// Show weather for a city or a coordinate pair, then exit.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: Option<String>,

        #[arg(long, requires = "lon", allow_hyphen_values = true, conflicts_with = "city")]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
}

fn parse_unit(value: &str) -> Result<TemperatureUnit, String> {
    TemperatureUnit::try_from(value).map_err(|e| e.to_string())
}

/// What the user typed at the session prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Lookup(&'a str),
    ToggleUnit,
    Quit,
}

fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        ":q" | ":quit" => Input::Quit,
        ":u" | ":unit" => Input::ToggleUnit,
        city => Input::Lookup(city),
    }
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        let Cli { command, units, no_geolocation, .. } = self;
        let config = Config::load()?;

        match command {
            Some(Command::Configure) => {
                configure(config)?;
                Ok(ExitCode::SUCCESS)
            }
            Some(Command::Show { city, lat, lon }) => {
                let mut app = build_app(&config, units)?;
                let query = match (lat, lon) {
                    (Some(latitude), Some(longitude)) => {
                        Query::Coordinates(Coordinates { latitude, longitude })
                    }
                    _ => Query::City(city.unwrap_or_default().trim().to_string()),
                };

                match app.lookup(query).await {
                    Ok(outcome) if outcome.forecast_days.is_some() => Ok(ExitCode::SUCCESS),
                    // Errors were already shown by the presenter.
                    Ok(_) | Err(_) => Ok(ExitCode::FAILURE),
                }
            }
            None => {
                let mut app = build_app(&config, units)?;
                let locator: Box<dyn GeoLocator> = if no_geolocation || !config.geolocation {
                    Box::new(NoGeolocation)
                } else {
                    Box::new(PromptedLocator::new(IpLocator::new()))
                };

                session(&mut app, locator.as_ref()).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn build_app(
    config: &Config,
    units: Option<TemperatureUnit>,
) -> Result<WeatherApp<TerminalPresenter<std::io::Stdout>>> {
    let provider = provider_from_config(config)?;
    let store = FileCityStore::default_location()?;
    let unit = units.unwrap_or(config.units);
    let icon_base = config.icon_base_url.as_deref().unwrap_or(DEFAULT_ICON_BASE_URL);

    let display = Display::new(TerminalPresenter::stdout(), unit).with_icon_base_url(icon_base);

    Ok(WeatherApp::new(provider, Box::new(store), display))
}

async fn session(
    app: &mut WeatherApp<TerminalPresenter<std::io::Stdout>>,
    locator: &dyn GeoLocator,
) -> Result<()> {
    if let Err(err) = app.start(locator).await {
        tracing::debug!(error = %err, "startup lookup did not complete");
    }

    println!("\nType a city name. `:u` switches units, `:q` quits.");

    loop {
        let line = match inquire::Text::new("City:").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        };

        match parse_input(&line) {
            Input::Quit => break,
            Input::ToggleUnit => {
                let unit = app.toggle_unit();
                tracing::debug!(%unit, "switched display unit");
            }
            Input::Lookup(city) => {
                if let Err(err) = app.lookup_city(city).await {
                    tracing::debug!(city, error = %err, "lookup failed");
                }
            }
        }
    }

    Ok(())
}

fn configure(mut config: Config) -> Result<()> {
    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let units = TemperatureUnit::all().to_vec();
    let cursor = units.iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = inquire::Select::new("Preferred unit:", units)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read unit")?;

    config.geolocation =
        inquire::Confirm::new("Offer a location lookup when no city is remembered?")
            .with_default(config.geolocation)
            .prompt()
            .context("Failed to read geolocation preference")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
