use async_trait::async_trait;
use weatherview_core::{Coordinates, GeoLocator, WeatherError};

/// Asks before handing the request to `inner`. Refusing, or having no
/// terminal to ask on, counts as a denial.
#[derive(Debug)]
pub struct PromptedLocator<L> {
    inner: L,
}

impl<L: GeoLocator> PromptedLocator<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<L: GeoLocator> GeoLocator for PromptedLocator<L> {
    fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        let allowed = inquire::Confirm::new("Use your approximate location (looked up from your IP address)?")
            .with_default(false)
            .prompt()
            .unwrap_or(false);

        if !allowed {
            return Err(WeatherError::GeolocationDenied);
        }

        self.inner.current_position().await
    }
}
