//! Device position lookup and the startup decision between a remembered
//! city, the device position, or waiting for input.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{Coordinates, Query, WeatherError, store::CityStore};

pub const DEFAULT_IP_LOCATOR_URL: &str = "http://ip-api.com/json/";

#[async_trait]
pub trait GeoLocator: Send + Sync + Debug {
    fn is_available(&self) -> bool {
        true
    }

    /// Any refusal or failure is reported as [`WeatherError::GeolocationDenied`].
    async fn current_position(&self) -> Result<Coordinates, WeatherError>;
}

/// No position source on this machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl GeoLocator for NoGeolocation {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        Err(WeatherError::GeolocationDenied)
    }
}

/// Always reports the same position, e.g. from `--lat/--lon`.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Coordinates);

#[async_trait]
impl GeoLocator for FixedLocator {
    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        Ok(self.0)
    }
}

/// Approximate position derived from the public IP address.
#[derive(Debug, Clone)]
pub struct IpLocator {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLocator {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_IP_LOCATOR_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into(), http: Client::new() }
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoLocator for IpLocator {
    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        let denied = |reason: &dyn std::fmt::Display| {
            tracing::debug!(%reason, "ip geolocation failed");
            WeatherError::GeolocationDenied
        };

        let res = self
            .http
            .get(&self.url)
            .query(&[("fields", "status,lat,lon")])
            .send()
            .await
            .map_err(|e| denied(&e))?;

        if !res.status().is_success() {
            return Err(denied(&res.status()));
        }

        let body: IpApiResponse = res.json().await.map_err(|e| denied(&e))?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(latitude), Some(longitude)) => {
                Ok(Coordinates { latitude, longitude })
            }
            _ => Err(denied(&body.status)),
        }
    }
}

/// Where the first lookup after startup comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Startup {
    Lookup(Query),
    Idle,
}

/// Remembered city first, then the device position, else idle.
///
/// A denied or failed position request is returned as an error and does not
/// fall back any further.
pub async fn resolve_startup(
    store: &dyn CityStore,
    locator: &dyn GeoLocator,
) -> Result<Startup, WeatherError> {
    match store.load() {
        Ok(Some(city)) => return Ok(Startup::Lookup(Query::City(city))),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = ?err, "could not read remembered city"),
    }

    if !locator.is_available() {
        return Ok(Startup::Idle);
    }

    let position = locator.current_position().await?;
    Ok(Startup::Lookup(Query::Coordinates(position)))
}
