use serde::{Deserialize, Serialize};

/// Visual background treatment chosen from the current condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    ClearSky,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
    Misty,
    #[default]
    Default,
}

impl Theme {
    /// Map an upstream condition group (e.g. "Clear", "Rain") to a theme.
    /// Unknown groups fall back to [`Theme::Default`].
    pub fn select(condition_main: &str) -> Self {
        match condition_main.trim().to_lowercase().as_str() {
            "clear" => Theme::ClearSky,
            "clouds" => Theme::Cloudy,
            "rain" | "drizzle" => Theme::Rainy,
            "snow" => Theme::Snowy,
            "thunderstorm" => Theme::Stormy,
            "mist" | "haze" | "fog" => Theme::Misty,
            _ => Theme::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::ClearSky => "clear-sky",
            Theme::Cloudy => "cloudy",
            Theme::Rainy => "rainy",
            Theme::Snowy => "snowy",
            Theme::Stormy => "stormy",
            Theme::Misty => "misty",
            Theme::Default => "default",
        }
    }

    /// Start and end colours of the background gradient for this theme.
    pub fn gradient(&self) -> (&'static str, &'static str) {
        match self {
            Theme::ClearSky => ("#fbc2eb", "#a6c1ee"),
            Theme::Cloudy => ("#bdc3c7", "#2c3e50"),
            Theme::Rainy => ("#00c6fb", "#005bea"),
            Theme::Snowy => ("#e0eafc", "#cfdef3"),
            Theme::Stormy => ("#141e30", "#243b55"),
            Theme::Misty => ("#bdc3c7", "#95a5a6"),
            Theme::Default => ("#74ebd5", "#acb6e5"),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
