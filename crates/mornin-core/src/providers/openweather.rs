//! OpenWeatherMap adapter -- 3-hourly forecast and current conditions.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use reqwest::Client;
use serde::Deserialize;

use super::http::{build_client, endpoint, get_json};
use super::traits::WeatherForecastProvider;
use crate::error::ProviderError;
use crate::location::Coordinates;
use crate::snapshot::{WeatherCondition, WeatherSnapshot};

const SERVICE: &str = "OpenWeatherMap";
/// The free forecast endpoint serves at most 40 three-hour samples.
const MAX_FORECAST_SAMPLES: i64 = 40;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherClient {
    http: Client,
    api_key: String,
    units: String,
    base_url: String,
}

// ── Wire types ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<Sample>,
}

/// One forecast entry, or the body of the current-weather endpoint.
#[derive(Debug, Deserialize)]
struct Sample {
    /// Unix seconds.
    dt: i64,
    main: MainBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
    #[serde(default)]
    clouds: Option<CloudsBlock>,
    /// Keyed by window: "1h" or "3h".
    #[serde(default)]
    rain: Option<HashMap<String, f64>>,
    #[serde(default)]
    snow: Option<HashMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct CloudsBlock {
    all: f64,
}

impl Sample {
    /// Rain over the window, else snow, else nothing.
    fn precipitation(&self, window: &str) -> f64 {
        let amount = |m: &Option<HashMap<String, f64>>| m.as_ref().and_then(|m| m.get(window).copied());
        amount(&self.rain)
            .or_else(|| amount(&self.snow))
            .unwrap_or(0.0)
            .max(0.0)
    }

    fn into_snapshot(self, window: &str) -> WeatherSnapshot {
        let precipitation_amount = self.precipitation(window);
        let (condition, description) = self
            .weather
            .into_iter()
            .next()
            .map(|w| (WeatherCondition::from_provider(&w.main), w.description))
            .unwrap_or((WeatherCondition::Other, String::new()));
        WeatherSnapshot {
            condition,
            temperature: self.main.temp.round(),
            feels_like: self.main.feels_like.unwrap_or(self.main.temp).round(),
            precipitation_amount,
            cloud_coverage_percent: percent(self.clouds.map(|c| c.all)),
            humidity_percent: percent(self.main.humidity),
            description,
            error: None,
        }
    }
}

fn percent(value: Option<f64>) -> u8 {
    value.unwrap_or(0.0).clamp(0.0, 100.0).round() as u8
}

/// The sample closest to `target` (unix seconds); ties keep the earlier one.
fn closest_sample(samples: Vec<Sample>, target: i64) -> Option<Sample> {
    samples
        .into_iter()
        .min_by_key(|s| (s.dt - target).abs())
}

/// How many samples to request so the list reaches `target`.
fn sample_count(now: DateTime<Utc>, target: DateTime<FixedOffset>) -> i64 {
    let seconds = (target.with_timezone(&Utc) - now).num_seconds();
    let hours = (seconds + 3599).div_euclid(3600);
    hours.clamp(1, MAX_FORECAST_SAMPLES)
}

// ── Client ───────────────────────────────────────────────────────────

impl OpenWeatherClient {
    /// `units` is passed through: "imperial", "metric" or "standard".
    pub fn new(
        api_key: impl Into<String>,
        units: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http: build_client(timeout),
            api_key: api_key.into(),
            units: units.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn params(&self, position: Coordinates) -> Result<Vec<(&'static str, String)>, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey { service: SERVICE });
        }
        Ok(vec![
            ("lat", position.lat.to_string()),
            ("lon", position.lng.to_string()),
            ("appid", self.api_key.clone()),
            ("units", self.units.clone()),
        ])
    }
}

impl WeatherForecastProvider for OpenWeatherClient {
    async fn forecast_at(
        &self,
        position: Coordinates,
        target: DateTime<FixedOffset>,
    ) -> Result<WeatherSnapshot, ProviderError> {
        let mut params = self.params(position)?;
        params.push(("cnt", sample_count(Utc::now(), target).to_string()));
        let url = endpoint(SERVICE, &format!("{}/forecast", self.base_url), &params)?;
        let resp: ForecastResponse = get_json(&self.http, SERVICE, url).await?;

        closest_sample(resp.list, target.timestamp())
            .map(|s| s.into_snapshot("3h"))
            .ok_or_else(|| ProviderError::Malformed {
                service: SERVICE,
                message: "forecast list is empty".into(),
            })
    }

    async fn current(&self, position: Coordinates) -> Result<WeatherSnapshot, ProviderError> {
        let params = self.params(position)?;
        let url = endpoint(SERVICE, &format!("{}/weather", self.base_url), &params)?;
        let sample: Sample = get_json(&self.http, SERVICE, url).await?;
        Ok(sample.into_snapshot("1h"))
    }
}
