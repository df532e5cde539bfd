//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The morning routine (arrival time, get-ready time, buffer, sleeper profile)
//! - The saved destination
//! - The fallback origin used when no current position is known
//! - Provider API keys, units and endpoints
//!
//! Configuration is stored at `~/.config/mornin/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::engine::{ScheduleInputs, DEFAULT_FALLBACK_COMMUTE_MINUTES};
use crate::error::ConfigError;
use crate::location::{Coordinates, Destination};
use crate::profile::SleeperProfile;
use crate::providers::{openweather, HereClient, HereEndpoints, OpenWeatherClient};
use crate::time::{minutes_to_time, ClockTime, TimeFormat};

/// Morning routine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_arrival_time")]
    pub arrival_time: ClockTime,
    #[serde(default = "default_get_ready")]
    pub get_ready_minutes: u32,
    #[serde(default = "default_buffer")]
    pub buffer_minutes: u32,
    #[serde(default)]
    pub sleeper_profile: SleeperProfile,
    #[serde(default = "default_fallback_commute")]
    pub fallback_commute_minutes: u32,
    #[serde(default)]
    pub time_format: TimeFormat,
}

/// Saved destination. Coordinates are optional; without them the label is
/// geocoded on every plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinationConfig {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

/// Origin used when no current position is available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub current_lat: Option<f64>,
    #[serde(default)]
    pub current_lng: Option<f64>,
    #[serde(default = "default_lat")]
    pub default_lat: f64,
    #[serde(default = "default_lng")]
    pub default_lng: f64,
}

/// External provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Falls back to the HERE_API_KEY environment variable when empty.
    #[serde(default)]
    pub here_api_key: String,
    /// Falls back to the OPENWEATHER_API_KEY environment variable when empty.
    #[serde(default)]
    pub openweather_api_key: String,
    #[serde(default = "default_units")]
    pub units: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_here_autocomplete_url")]
    pub here_autocomplete_url: String,
    #[serde(default = "default_here_geocode_url")]
    pub here_geocode_url: String,
    #[serde(default = "default_here_revgeocode_url")]
    pub here_revgeocode_url: String,
    #[serde(default = "default_here_router_url")]
    pub here_router_url: String,
    #[serde(default = "default_openweather_url")]
    pub openweather_url: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/mornin/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub destination: DestinationConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

// Default functions
fn default_arrival_time() -> ClockTime {
    minutes_to_time(8 * 60)
}
fn default_get_ready() -> u32 {
    30
}
fn default_buffer() -> u32 {
    10
}
fn default_fallback_commute() -> u32 {
    DEFAULT_FALLBACK_COMMUTE_MINUTES
}
fn default_lat() -> f64 {
    40.7128
}
fn default_lng() -> f64 {
    -74.0060
}
fn default_units() -> String {
    "imperial".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_here_autocomplete_url() -> String {
    HereEndpoints::default().autocomplete
}
fn default_here_geocode_url() -> String {
    HereEndpoints::default().geocode
}
fn default_here_revgeocode_url() -> String {
    HereEndpoints::default().revgeocode
}
fn default_here_router_url() -> String {
    HereEndpoints::default().router
}
fn default_openweather_url() -> String {
    openweather::DEFAULT_BASE_URL.into()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            arrival_time: default_arrival_time(),
            get_ready_minutes: default_get_ready(),
            buffer_minutes: default_buffer(),
            sleeper_profile: SleeperProfile::default(),
            fallback_commute_minutes: default_fallback_commute(),
            time_format: TimeFormat::default(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            current_lat: None,
            current_lng: None,
            default_lat: default_lat(),
            default_lng: default_lng(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            here_api_key: String::new(),
            openweather_api_key: String::new(),
            units: default_units(),
            timeout_secs: default_timeout_secs(),
            here_autocomplete_url: default_here_autocomplete_url(),
            here_geocode_url: default_here_geocode_url(),
            here_revgeocode_url: default_here_revgeocode_url(),
            here_router_url: default_here_router_url(),
            openweather_url: default_openweather_url(),
        }
    }
}

impl DestinationConfig {
    pub fn to_destination(&self) -> Option<Destination> {
        let coordinates = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        };
        let destination = Destination {
            label: self.label.clone(),
            coordinates,
        };
        destination.is_set().then_some(destination)
    }
}

impl LocationConfig {
    pub fn current(&self) -> Option<Coordinates> {
        match (self.current_lat, self.current_lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    pub fn fallback(&self) -> Coordinates {
        Coordinates::new(self.default_lat, self.default_lng)
    }
}

impl ProvidersConfig {
    fn key_or_env(configured: &str, var: &str) -> String {
        if configured.trim().is_empty() {
            std::env::var(var).unwrap_or_default()
        } else {
            configured.to_string()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn here_client(&self) -> HereClient {
        HereClient::new(
            Self::key_or_env(&self.here_api_key, "HERE_API_KEY"),
            HereEndpoints {
                autocomplete: self.here_autocomplete_url.clone(),
                geocode: self.here_geocode_url.clone(),
                revgeocode: self.here_revgeocode_url.clone(),
                router: self.here_router_url.clone(),
            },
            self.timeout(),
        )
    }

    pub fn openweather_client(&self) -> OpenWeatherClient {
        OpenWeatherClient::new(
            Self::key_or_env(&self.openweather_api_key, "OPENWEATHER_API_KEY"),
            self.units.clone(),
            self.openweather_url.clone(),
            self.timeout(),
        )
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => parse_number(value).ok_or_else(|| {
                        invalid(format!("cannot parse '{value}' as number"))
                    })?,
                    // Unset optional: a number if it parses, else clear or store text
                    serde_json::Value::Null => match value.trim() {
                        "" | "none" | "null" => serde_json::Value::Null,
                        v => parse_number(v).unwrap_or_else(|| serde_json::Value::String(v.into())),
                    },
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot assign to a section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Where the config file lives.
    pub fn file_path() -> Result<PathBuf, ConfigError> {
        Self::path()
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing the defaults there if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving. The whole config is
    /// re-validated, so e.g. `schedule.arrival_time = "25:00"` is rejected.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Inputs for one computation, built from the saved routine.
    pub fn schedule_inputs(&self) -> ScheduleInputs {
        let s = &self.schedule;
        let mut inputs = ScheduleInputs::new(s.arrival_time)
            .get_ready(s.get_ready_minutes)
            .buffer(s.buffer_minutes)
            .profile(s.sleeper_profile)
            .fallback_commute(s.fallback_commute_minutes);
        inputs.destination = self.destination.to_destination();
        inputs
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.trim().parse::<u64>() {
        Some(serde_json::Value::Number(n.into()))
    } else if let Ok(n) = value.trim().parse::<f64>() {
        serde_json::Number::from_f64(n).map(serde_json::Value::Number)
    } else {
        None
    }
}
