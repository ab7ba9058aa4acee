/// Terminal failures of a single lookup attempt.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeatherError {
    #[error("no city given")]
    EmptyQuery,
    #[error("location not found")]
    NotFound,
    #[error("credential rejected by weather service")]
    Unauthorized,
    #[error("weather service error (status {status:?}): {message}")]
    Upstream { status: Option<u16>, message: String },
    #[error("malformed weather response: {0}")]
    Parse(String),
    #[error("forecast unavailable")]
    ForecastUnavailable,
    #[error("geolocation denied or unavailable")]
    GeolocationDenied,
}

impl WeatherError {
    /// Short status line shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::EmptyQuery => "Please enter a city name",
            WeatherError::NotFound => "City not found.",
            WeatherError::Unauthorized => "Invalid API key.",
            WeatherError::Upstream { .. } | WeatherError::Parse(_) => "Something went wrong.",
            WeatherError::ForecastUnavailable => "Failed to load forecast.",
            WeatherError::GeolocationDenied => "Geolocation access denied.",
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
