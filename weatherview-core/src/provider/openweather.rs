use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDateTime, NaiveTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{CurrentConditions, ForecastSample, ForecastSeries, Query},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/data/2.5/{}", self.base_url, name)
    }

    async fn request_forecast(&self, city: &str) -> Result<ForecastSeries> {
        let res = self
            .http
            .get(self.endpoint("forecast"))
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (5-day forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwForecastResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather forecast JSON")?;

        midday_samples(parsed.list)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    // Omitted by the service in calm air.
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

/// Error payload, e.g. `{"cod":"404","message":"city not found"}`.
/// `cod` arrives as a string or a number depending on the endpoint.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    cod: serde_json::Value,
    #[serde(default)]
    message: Option<String>,
}

impl OwCurrentResponse {
    fn into_conditions(self) -> Result<CurrentConditions, WeatherError> {
        let weather = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("response contained no weather entry".into()))?;

        Ok(CurrentConditions {
            location_name: self.name,
            country_code: self.sys.country,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            condition_main: weather.main,
            condition_description: weather.description,
            icon_code: weather.icon,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            wind_direction_deg: self.wind.deg,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, query: &Query) -> Result<CurrentConditions, WeatherError> {
        let mut params: Vec<(&str, String)> = match query {
            Query::City(name) => vec![("q", name.clone())],
            Query::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        };
        params.push(("units", "metric".to_string()));
        params.push(("appid", self.api_key.clone()));

        tracing::debug!(%query, "requesting current conditions");

        let res = self
            .http
            .get(self.endpoint("weather"))
            .query(&params)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let err = classify_failure(status, &body);
            tracing::debug!(%query, %status, error = %err, "current conditions request failed");
            return Err(err);
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        parsed.into_conditions()
    }

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastSeries, WeatherError> {
        self.request_forecast(city).await.map_err(|err| {
            tracing::warn!(city, error = ?err, "forecast unavailable");
            WeatherError::ForecastUnavailable
        })
    }
}

/// Map a non-success response to the lookup error taxonomy. The code in the
/// body wins; the HTTP status is used when the body carries none.
fn classify_failure(status: StatusCode, body: &str) -> WeatherError {
    let parsed = serde_json::from_str::<OwErrorBody>(body).ok();

    let code = match parsed.as_ref().map(|b| &b.cod) {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => status.as_u16().to_string(),
    };

    match code.as_str() {
        "404" => WeatherError::NotFound,
        "401" => WeatherError::Unauthorized,
        _ => WeatherError::Upstream {
            status: Some(status.as_u16()),
            message: parsed
                .and_then(|b| b.message)
                .unwrap_or_else(|| truncate_body(body)),
        },
    }
}

/// Keep entries stamped 12:00:00, in upstream order.
fn midday_samples(list: Vec<OwForecastEntry>) -> Result<ForecastSeries> {
    let midday = NaiveTime::from_hms_opt(12, 0, 0).ok_or_else(|| anyhow!("invalid midday time"))?;
    let mut series = Vec::new();

    for entry in list {
        let stamp = NaiveDateTime::parse_from_str(&entry.dt_txt, "%Y-%m-%d %H:%M:%S")
            .with_context(|| format!("Invalid forecast timestamp '{}'", entry.dt_txt))?;

        if stamp.time() != midday {
            continue;
        }

        let description = entry
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        series.push(ForecastSample {
            timestamp: entry.dt,
            temperature_c: entry.main.temp,
            description,
        });
    }

    Ok(series)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
