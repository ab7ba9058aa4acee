//! Integration tests for the OpenWeather provider and the lookup pipeline
//! using wiremock.

use chrono::{Duration, NaiveDate, Timelike};
use weatherview_core::{
    CityStore, Coordinates, CurrentView, Display, ForecastRow, GeoLocator, IpLocator, MemoryCityStore,
    OpenWeatherProvider, Presenter, Query, TemperatureUnit, Theme, WeatherApp, WeatherError,
    WeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "TEST_KEY";

fn paris_current() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.3488, "lat": 48.8534 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 18.3, "feels_like": 17.2, "temp_min": 16.0, "temp_max": 19.5, "humidity": 40 },
        "wind": { "speed": 4.1, "deg": 40 },
        "sys": { "country": "FR", "sunrise": 1728884580, "sunset": 1728924480 },
        "name": "Paris",
        "cod": 200
    })
}

/// Five days of 3-hourly samples starting at midnight.
fn five_day_forecast() -> serde_json::Value {
    let start = NaiveDate::from_ymd_opt(2024, 10, 14).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let list: Vec<serde_json::Value> = (0..40)
        .map(|i| {
            let at = start + Duration::hours(3 * i);
            let temp = 10.0 + f64::from(at.hour()) / 3.0;
            serde_json::json!({
                "dt": at.and_utc().timestamp(),
                "dt_txt": at.format("%Y-%m-%d %H:%M:%S").to_string(),
                "main": { "temp": temp },
                "weather": [{ "main": "Clouds", "description": "scattered clouds", "icon": "03d" }]
            })
        })
        .collect();

    serde_json::json!({ "cod": "200", "cnt": 40, "list": list, "city": { "name": "Paris", "country": "FR" } })
}

async fn mount_json(server: &MockServer, endpoint: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/data/2.5/{endpoint}")))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

fn provider(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_base_url(KEY.to_string(), server.uri())
}

#[tokio::test]
async fn current_by_city_sends_metric_units_and_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_current()))
        .expect(1)
        .mount(&server)
        .await;

    let conditions = provider(&server).fetch_current(&Query::city("Paris")).await.unwrap();

    assert_eq!(conditions.location_name, "Paris");
    assert_eq!(conditions.country_code, "FR");
    assert_eq!(conditions.condition_main, "Clear");
    assert_eq!(conditions.icon_code, "01d");
    assert_eq!(conditions.humidity_pct, 40);
    assert_eq!(conditions.wind_direction_deg, 40.0);
    assert_eq!(conditions.sunset, 1728924480);
    assert_eq!(Theme::select(&conditions.condition_main), Theme::ClearSky);
}

#[tokio::test]
async fn current_by_coordinates_sends_lat_lon() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_current()))
        .expect(1)
        .mount(&server)
        .await;

    let query = Query::Coordinates(Coordinates { latitude: 48.85, longitude: 2.35 });
    let conditions = provider(&server).fetch_current(&query).await.unwrap();
    assert_eq!(conditions.location_name, "Paris");
}

#[tokio::test]
async fn unknown_city_is_not_found() {
    let server = MockServer::start().await;
    mount_json(&server, "weather", 404, serde_json::json!({ "cod": "404", "message": "city not found" })).await;

    let err = provider(&server).fetch_current(&Query::city("Xyzzyplonk")).await.unwrap_err();
    assert_eq!(err, WeatherError::NotFound);
}

#[tokio::test]
async fn rejected_key_is_unauthorized() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "weather",
        401,
        serde_json::json!({ "cod": 401, "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info." }),
    )
    .await;

    let err = provider(&server).fetch_current(&Query::city("Paris")).await.unwrap_err();
    assert_eq!(err, WeatherError::Unauthorized);
}

#[tokio::test]
async fn other_failures_are_upstream_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let err = provider(&server).fetch_current(&Query::city("Paris")).await.unwrap_err();
    match err {
        WeatherError::Upstream { status, message } => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "internal error");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_fields_are_parse_errors() {
    let server = MockServer::start().await;
    mount_json(&server, "weather", 200, serde_json::json!({ "name": "Paris", "cod": 200 })).await;

    let err = provider(&server).fetch_current(&Query::city("Paris")).await.unwrap_err();
    assert!(matches!(err, WeatherError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn empty_weather_list_is_a_parse_error() {
    let server = MockServer::start().await;
    let mut body = paris_current();
    body["weather"] = serde_json::json!([]);
    mount_json(&server, "weather", 200, body).await;

    let err = provider(&server).fetch_current(&Query::city("Paris")).await.unwrap_err();
    assert!(matches!(err, WeatherError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_service_is_an_upstream_error() {
    let provider = OpenWeatherProvider::with_base_url(KEY.to_string(), "http://127.0.0.1:9");

    let err = provider.fetch_current(&Query::city("Paris")).await.unwrap_err();
    assert!(matches!(err, WeatherError::Upstream { status: None, .. }), "got {err:?}");
}

#[tokio::test]
async fn forecast_keeps_one_midday_sample_per_day() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Paris"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(five_day_forecast()))
        .mount(&server)
        .await;

    let series = provider(&server).fetch_forecast("Paris").await.unwrap();

    assert_eq!(series.len(), 5);
    for pair in series.windows(2) {
        assert_eq!(pair[1].timestamp - pair[0].timestamp, 86_400);
    }
    for sample in &series {
        assert_eq!(sample.timestamp % 86_400, 12 * 3600);
        assert_eq!(sample.temperature_c, 14.0);
        assert_eq!(sample.description, "scattered clouds");
    }
}

#[tokio::test]
async fn forecast_without_midday_entries_is_empty() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "cod": "200",
        "list": [
            { "dt": 1728896400, "dt_txt": "2024-10-14 09:00:00", "main": { "temp": 11.0 },
              "weather": [{ "main": "Rain", "description": "light rain", "icon": "10d" }] },
            { "dt": 1728918000, "dt_txt": "2024-10-14 15:00:00", "main": { "temp": 13.0 },
              "weather": [{ "main": "Rain", "description": "light rain", "icon": "10d" }] }
        ]
    });
    mount_json(&server, "forecast", 200, body).await;

    let series = provider(&server).fetch_forecast("Paris").await.unwrap();
    assert!(series.is_empty());
}

#[tokio::test]
async fn forecast_failures_collapse_to_unavailable() {
    let server = MockServer::start().await;
    mount_json(&server, "forecast", 404, serde_json::json!({ "cod": "404", "message": "city not found" })).await;
    let err = provider(&server).fetch_forecast("Nowhere").await.unwrap_err();
    assert_eq!(err, WeatherError::ForecastUnavailable);

    let server = MockServer::start().await;
    mount_json(&server, "forecast", 200, serde_json::json!({ "cod": "200" })).await;
    let err = provider(&server).fetch_forecast("Paris").await.unwrap_err();
    assert_eq!(err, WeatherError::ForecastUnavailable);
}

/// Keeps only what a terminal would currently show.
#[derive(Debug, Default)]
struct Screen {
    current: Option<CurrentView>,
    forecast: Vec<ForecastRow>,
    message: String,
    theme: Theme,
}

impl Presenter for Screen {
    fn render_current(&mut self, view: &CurrentView) {
        self.current = Some(view.clone());
    }

    fn render_forecast(&mut self, rows: &[ForecastRow]) {
        self.forecast = rows.to_vec();
    }

    fn render_status(&mut self, message: &str) {
        self.message = message.to_string();
    }

    fn render_error(&mut self, message: &str) {
        self.message = message.to_string();
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    fn clear(&mut self) {
        *self = Screen::default();
    }
}

#[tokio::test]
async fn paris_lookup_end_to_end() {
    let server = MockServer::start().await;
    mount_json(&server, "weather", 200, paris_current()).await;
    mount_json(&server, "forecast", 200, five_day_forecast()).await;

    let store = std::sync::Arc::new(MemoryCityStore::default());
    let display = Display::with_offset(
        Screen::default(),
        TemperatureUnit::Celsius,
        chrono::FixedOffset::east_opt(0).unwrap(),
    );
    let mut app = WeatherApp::new(Box::new(provider(&server)), Box::new(store.clone()), display);

    let outcome = app.lookup_city("Paris").await.unwrap();
    assert_eq!(outcome.forecast_days, Some(5));

    let screen = app.display().presenter();
    assert_eq!(screen.theme, Theme::ClearSky);
    assert_eq!(screen.current.as_ref().unwrap().wind, "4.1 m/s NE");
    assert_eq!(screen.forecast.len(), 5);
    assert_eq!(screen.forecast[0].date, "Mon 14 Oct");
    assert!(screen.message.is_empty());

    app.toggle_unit();
    assert_eq!(app.display().presenter().forecast[0].temperature, "57 °F");

    assert_eq!(store.load().unwrap().as_deref(), Some("Paris"));
}

#[tokio::test]
async fn ip_locator_reads_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .and(query_param("fields", "status,lat,lon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success", "lat": 52.52, "lon": 13.405
        })))
        .mount(&server)
        .await;

    let locator = IpLocator::with_url(format!("{}/json/", server.uri()));
    let position = locator.current_position().await.unwrap();
    assert_eq!(position, Coordinates { latitude: 52.52, longitude: 13.405 });
}

#[tokio::test]
async fn ip_locator_failure_is_denial() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail", "message": "private range"
        })))
        .mount(&server)
        .await;

    let locator = IpLocator::with_url(format!("{}/json/", server.uri()));
    assert_eq!(locator.current_position().await.unwrap_err(), WeatherError::GeolocationDenied);
}
