use crate::{
    CurrentConditions, ForecastSample, Theme,
    display::{CurrentView, ForecastRow, Presenter},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Current(CurrentView),
    Forecast(Vec<ForecastRow>),
    Status(String),
    Error(String),
    Theme(Theme),
    Cleared,
}

/// Presenter that keeps the latest screen contents plus a call log.
/// Status and error share one line, like a single status bar.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub current: Option<CurrentView>,
    pub forecast: Vec<ForecastRow>,
    pub status: String,
    pub error: Option<String>,
    pub theme: Theme,
    pub log: Vec<Rendered>,
}

impl Presenter for RecordingPresenter {
    fn render_current(&mut self, view: &CurrentView) {
        self.current = Some(view.clone());
        self.log.push(Rendered::Current(view.clone()));
    }

    fn render_forecast(&mut self, rows: &[ForecastRow]) {
        self.forecast = rows.to_vec();
        self.log.push(Rendered::Forecast(rows.to_vec()));
    }

    fn render_status(&mut self, message: &str) {
        self.status = message.to_string();
        self.error = None;
        self.log.push(Rendered::Status(message.to_string()));
    }

    fn render_error(&mut self, message: &str) {
        self.status.clear();
        self.error = Some(message.to_string());
        self.log.push(Rendered::Error(message.to_string()));
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.log.push(Rendered::Theme(theme));
    }

    fn clear(&mut self) {
        self.current = None;
        self.forecast.clear();
        self.status.clear();
        self.error = None;
        self.theme = Theme::Default;
        self.log.push(Rendered::Cleared);
    }
}

pub fn paris_conditions() -> CurrentConditions {
    CurrentConditions {
        location_name: "Paris".into(),
        country_code: "FR".into(),
        temperature_c: 18.3,
        feels_like_c: 17.2,
        condition_main: "Clear".into(),
        condition_description: "clear sky".into(),
        icon_code: "01d".into(),
        humidity_pct: 40,
        wind_speed_mps: 4.1,
        wind_direction_deg: 40.0,
        sunrise: 1_728_884_580,
        sunset: 1_728_924_480,
    }
}

pub fn sample(timestamp: i64, temperature_c: f64, description: &str) -> ForecastSample {
    ForecastSample { timestamp, temperature_c, description: description.to_string() }
}
