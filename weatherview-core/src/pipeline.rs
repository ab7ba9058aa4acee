//! The lookup sequence: current conditions, then forecast, then remember the city.

use crate::{
    Query, WeatherError, WeatherProvider,
    display::{Display, Presenter},
    location::{GeoLocator, Startup, resolve_startup},
    store::CityStore,
    units::TemperatureUnit,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOutcome {
    /// Name used for the forecast request and remembered for next startup.
    pub city: String,
    /// Number of forecast days shown, `None` when the forecast failed.
    pub forecast_days: Option<usize>,
}

/// Owns everything one lookup touches. Lookups take `&mut self`, so a new
/// lookup cannot start while another is still rendering.
#[derive(Debug)]
pub struct WeatherApp<P: Presenter> {
    provider: Box<dyn WeatherProvider>,
    store: Box<dyn CityStore>,
    display: Display<P>,
}

impl<P: Presenter> WeatherApp<P> {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        store: Box<dyn CityStore>,
        display: Display<P>,
    ) -> Self {
        Self { provider, store, display }
    }

    pub fn display(&self) -> &Display<P> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display<P> {
        &mut self.display
    }

    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        self.display.toggle_unit()
    }

    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.display.set_unit(unit);
    }

    /// Look up a city typed by the user.
    pub async fn lookup_city(&mut self, input: &str) -> Result<LookupOutcome, WeatherError> {
        self.lookup(Query::City(input.trim().to_string())).await
    }

    /// Run one full lookup. Any error is also shown on the display.
    pub async fn lookup(&mut self, query: Query) -> Result<LookupOutcome, WeatherError> {
        self.display.clear();

        let result = self.run(query).await;
        if let Err(err) = &result {
            self.display.show_error(err);
        }
        result
    }

    /// Startup: remembered city, else device position, else idle (`Ok(None)`).
    pub async fn start(
        &mut self,
        locator: &dyn GeoLocator,
    ) -> Result<Option<LookupOutcome>, WeatherError> {
        let startup = resolve_startup(self.store.as_ref(), locator).await;
        match startup {
            Ok(Startup::Lookup(query)) => self.lookup(query).await.map(Some),
            Ok(Startup::Idle) => Ok(None),
            Err(err) => {
                self.display.show_error(&err);
                Err(err)
            }
        }
    }

    async fn run(&mut self, query: Query) -> Result<LookupOutcome, WeatherError> {
        let loading = match &query {
            Query::City(name) if name.trim().is_empty() => return Err(WeatherError::EmptyQuery),
            Query::City(_) => "Loading...",
            Query::Coordinates(_) => "Loading location weather...",
        };
        self.display.show_status(loading);

        let conditions = self.provider.fetch_current(&query).await?;

        // Coordinate lookups are named after the place the service resolved.
        let city = match &query {
            Query::City(name) => name.trim().to_string(),
            Query::Coordinates(_) => conditions.location_name.trim().to_string(),
        };

        self.display.show_current(conditions);

        let forecast = if city.is_empty() {
            Err(WeatherError::ForecastUnavailable)
        } else {
            self.provider.fetch_forecast(&city).await
        };

        let forecast_days = match forecast {
            Ok(series) => {
                let days = series.len();
                self.display.show_forecast(series);
                Some(days)
            }
            Err(err) => {
                self.display.show_error(&err);
                None
            }
        };

        if !city.is_empty() {
            if let Err(err) = self.store.save(&city) {
                tracing::warn!(city = %city, error = ?err, "could not remember last city");
            }
        }

        if forecast_days.is_some() {
            self.display.show_status("");
        }

        tracing::info!(city = %city, ?forecast_days, "lookup complete");
        Ok(LookupOutcome { city, forecast_days })
    }
}
