use std::fmt;

use serde::{Deserialize, Serialize};

/// Extra minutes added when any precipitation is forecast at wake time.
pub const PRECIPITATION_DELAY_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Fog,
    Other,
}

impl WeatherCondition {
    /// Map a provider's condition group name ("Clear", "Rain", "Mist", ...).
    pub fn from_provider(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "clear" | "sunny" => WeatherCondition::Clear,
            "clouds" | "cloudy" => WeatherCondition::Clouds,
            "rain" => WeatherCondition::Rain,
            "drizzle" => WeatherCondition::Drizzle,
            "thunderstorm" => WeatherCondition::Thunderstorm,
            "snow" => WeatherCondition::Snow,
            "mist" | "fog" | "haze" | "smoke" => WeatherCondition::Fog,
            _ => WeatherCondition::Other,
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::Clouds => "clouds",
            WeatherCondition::Rain => "rain",
            WeatherCondition::Drizzle => "drizzle",
            WeatherCondition::Thunderstorm => "thunderstorm",
            WeatherCondition::Snow => "snow",
            WeatherCondition::Fog => "fog",
            WeatherCondition::Other => "other",
        };
        f.write_str(s)
    }
}

/// Forecast (or current) conditions at one point in time.
///
/// Temperatures are in whatever units the provider was asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub condition: WeatherCondition,
    pub temperature: f64,
    pub feels_like: f64,
    /// Millimetres over the sample window; never negative.
    pub precipitation_amount: f64,
    pub cloud_coverage_percent: u8,
    pub humidity_percent: u8,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self {
            condition: WeatherCondition::Clear,
            temperature: 72.0,
            feels_like: 72.0,
            precipitation_amount: 0.0,
            cloud_coverage_percent: 0,
            humidity_percent: 50,
            description: "Clear morning".into(),
            error: None,
        }
    }
}

impl WeatherSnapshot {
    /// Default conditions annotated with why the real lookup failed.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn has_precipitation(&self) -> bool {
        self.precipitation_amount > 0.0
    }

    /// Minutes the weather adds to the morning: 5 with any precipitation.
    pub fn delay_minutes(&self) -> u32 {
        if self.has_precipitation() {
            PRECIPITATION_DELAY_MINUTES
        } else {
            0
        }
    }
}
