//! Display state and the formatting of weather data for a [`Presenter`].
//!
//! Readings are stored exactly as fetched (Celsius). Every render converts
//! from those stored values, so switching units any number of times never
//! accumulates rounding.

use chrono::{DateTime, FixedOffset, Local, Offset};

use crate::{
    CurrentConditions, ForecastSample, ForecastSeries, Theme, WeatherError,
    units::{TemperatureUnit, to_display_temp, wind_direction_label},
};

pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org";

/// Current conditions formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentView {
    pub location: String,
    pub temperature: String,
    pub condition: String,
    pub icon_url: String,
    pub humidity: String,
    pub wind: String,
    pub sunrise: String,
    pub sunset: String,
    pub unit: TemperatureUnit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRow {
    pub date: String,
    pub temperature: String,
    pub description: String,
}

/// Output surface the lookup pipeline renders into.
pub trait Presenter {
    fn render_current(&mut self, view: &CurrentView);
    fn render_forecast(&mut self, rows: &[ForecastRow]);
    /// Progress or neutral status line; an empty string clears it.
    fn render_status(&mut self, message: &str);
    fn render_error(&mut self, message: &str);
    fn set_theme(&mut self, theme: Theme);
    /// Drop every displayed field and return to the neutral theme.
    fn clear(&mut self);
}

/// What is currently on screen, kept in its fetched form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub unit: TemperatureUnit,
    pub current: Option<CurrentConditions>,
    pub forecast: ForecastSeries,
}

#[derive(Debug)]
pub struct Display<P: Presenter> {
    presenter: P,
    state: DisplayState,
    offset: FixedOffset,
    icon_base_url: String,
}

impl<P: Presenter> Display<P> {
    /// Times are rendered in the machine's local offset.
    pub fn new(presenter: P, unit: TemperatureUnit) -> Self {
        Self::with_offset(presenter, unit, Local::now().offset().fix())
    }

    pub fn with_offset(presenter: P, unit: TemperatureUnit, offset: FixedOffset) -> Self {
        Self {
            presenter,
            state: DisplayState { unit, ..DisplayState::default() },
            offset,
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
        }
    }

    pub fn with_icon_base_url(mut self, base: impl Into<String>) -> Self {
        self.icon_base_url = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.state.unit
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Switch units and redraw whatever is stored. No network access.
    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.state.unit = unit;
        self.rerender();
    }

    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        let unit = self.state.unit.toggled();
        self.set_unit(unit);
        unit
    }

    pub fn show_current(&mut self, conditions: CurrentConditions) {
        let theme = Theme::select(&conditions.condition_main);
        let view = self.current_view(&conditions);
        self.presenter.render_current(&view);
        self.presenter.set_theme(theme);
        self.state.current = Some(conditions);
    }

    pub fn show_forecast(&mut self, series: ForecastSeries) {
        let rows = format_forecast(&series, self.state.unit, &self.offset);
        self.presenter.render_forecast(&rows);
        self.state.forecast = series;
    }

    pub fn show_status(&mut self, message: &str) {
        self.presenter.render_status(message);
    }

    pub fn show_error(&mut self, err: &WeatherError) {
        self.presenter.render_error(err.user_message());
    }

    /// Reset to a blank screen at the start of a lookup. Stored readings are
    /// dropped too so a unit switch cannot bring stale data back.
    pub fn clear(&mut self) {
        self.state.current = None;
        self.state.forecast.clear();
        self.presenter.clear();
        self.presenter.set_theme(Theme::Default);
    }

    fn rerender(&mut self) {
        if let Some(conditions) = &self.state.current {
            let view = self.current_view(conditions);
            self.presenter.render_current(&view);
        }
        if !self.state.forecast.is_empty() {
            let rows = format_forecast(&self.state.forecast, self.state.unit, &self.offset);
            self.presenter.render_forecast(&rows);
        }
    }

    fn current_view(&self, conditions: &CurrentConditions) -> CurrentView {
        format_current(conditions, self.state.unit, &self.offset, &self.icon_base_url)
    }
}

pub fn icon_url(base: &str, icon_code: &str) -> String {
    format!("{base}/img/wn/{icon_code}@2x.png")
}

pub fn format_current(
    conditions: &CurrentConditions,
    unit: TemperatureUnit,
    offset: &FixedOffset,
    icon_base_url: &str,
) -> CurrentView {
    let symbol = unit.symbol();
    let temp = to_display_temp(conditions.temperature_c, unit);
    let feels = to_display_temp(conditions.feels_like_c, unit);

    let location = if conditions.country_code.is_empty() {
        conditions.location_name.clone()
    } else {
        format!("{}, {}", conditions.location_name, conditions.country_code)
    };

    CurrentView {
        location,
        temperature: format!("{temp} {symbol} (feels like {feels} {symbol})"),
        condition: format!(
            "{} ({})",
            conditions.condition_main, conditions.condition_description
        ),
        icon_url: icon_url(icon_base_url, &conditions.icon_code),
        humidity: format!("{}%", conditions.humidity_pct),
        wind: format!(
            "{} m/s {}",
            conditions.wind_speed_mps,
            wind_direction_label(conditions.wind_direction_deg)
        ),
        sunrise: time_of_day(conditions.sunrise, offset),
        sunset: time_of_day(conditions.sunset, offset),
        unit,
    }
}

/// One row per sample, in series order.
pub fn format_forecast(
    series: &[ForecastSample],
    unit: TemperatureUnit,
    offset: &FixedOffset,
) -> Vec<ForecastRow> {
    series
        .iter()
        .map(|sample| ForecastRow {
            date: local_time(sample.timestamp, offset)
                .map(|dt| dt.format("%a %d %b").to_string())
                .unwrap_or_else(|| "?".to_string()),
            temperature: format!(
                "{} {}",
                to_display_temp(sample.temperature_c, unit),
                unit.symbol()
            ),
            description: sample.description.clone(),
        })
        .collect()
}

fn local_time(epoch_seconds: i64, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(epoch_seconds, 0).map(|utc| utc.with_timezone(offset))
}

fn time_of_day(epoch_seconds: i64, offset: &FixedOffset) -> String {
    local_time(epoch_seconds, offset)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
