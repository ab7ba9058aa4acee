//! Core library for the `weatherview` CLI.
//!
//! This crate defines:
//! - The lookup pipeline (current conditions, then forecast, then remember the city)
//! - The OpenWeather provider behind the `WeatherProvider` trait
//! - Display state, unit conversion and theme selection behind a `Presenter` trait
//! - Configuration, last-city persistence and startup location resolution
//!
//! It is used by `weatherview-cli`, but any front end that implements `Presenter`
//! can drive it.

pub mod config;
pub mod display;
pub mod error;
pub mod location;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod store;
pub mod theme;
pub mod units;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use display::{CurrentView, Display, DisplayState, ForecastRow, Presenter};
pub use error::WeatherError;
pub use location::{FixedLocator, GeoLocator, IpLocator, NoGeolocation, Startup, resolve_startup};
pub use model::{Coordinates, CurrentConditions, ForecastSample, ForecastSeries, Query};
pub use pipeline::{LookupOutcome, WeatherApp};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use store::{CityStore, FileCityStore, MemoryCityStore};
pub use theme::Theme;
pub use units::{TemperatureUnit, to_display_temp, wind_direction_label};
