use std::future::Future;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::location::Coordinates;
use crate::snapshot::{TrafficSnapshot, WeatherSnapshot};

/// One autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub label: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// A reverse-geocoded position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Place {
    pub label: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Raw route durations, in whole minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub total_travel_minutes: u32,
    pub baseline_minutes: u32,
    pub polyline: Option<String>,
}

impl From<Route> for TrafficSnapshot {
    fn from(route: Route) -> Self {
        let snapshot = TrafficSnapshot::from_durations(route.total_travel_minutes, route.baseline_minutes);
        match route.polyline {
            Some(polyline) => snapshot.with_polyline(polyline),
            None => snapshot,
        }
    }
}

/// Where the user is right now.
pub trait LocationProvider: Send + Sync {
    /// `ProviderError::Unavailable` when no fix can be obtained; the caller
    /// then falls back to its configured default.
    fn current_position(&self) -> impl Future<Output = Result<Coordinates, ProviderError>> + Send;
}

/// Address suggestions as the user types.
pub trait AutocompleteProvider: Send + Sync {
    fn suggest(
        &self,
        query: &str,
        bias: Option<Coordinates>,
    ) -> impl Future<Output = Result<Vec<Suggestion>, ProviderError>> + Send;
}

/// Free-text address to coordinates.
pub trait GeocodingProvider: Send + Sync {
    /// `ProviderError::NotFound` when nothing matches.
    fn geocode(&self, address: &str) -> impl Future<Output = Result<Coordinates, ProviderError>> + Send;
}

/// Coordinates to a human-readable address.
pub trait ReverseGeocodingProvider: Send + Sync {
    fn reverse_geocode(
        &self,
        position: Coordinates,
    ) -> impl Future<Output = Result<Place, ProviderError>> + Send;
}

/// Travel time between two points under current traffic.
pub trait RoutingProvider: Send + Sync {
    fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        departure: DateTime<FixedOffset>,
    ) -> impl Future<Output = Result<Route, ProviderError>> + Send;
}

/// Weather at a position, now or at a future instant.
pub trait WeatherForecastProvider: Send + Sync {
    /// The forecast sample whose timestamp is closest to `target`.
    fn forecast_at(
        &self,
        position: Coordinates,
        target: DateTime<FixedOffset>,
    ) -> impl Future<Output = Result<WeatherSnapshot, ProviderError>> + Send;

    /// Current observed conditions.
    fn current(
        &self,
        position: Coordinates,
    ) -> impl Future<Output = Result<WeatherSnapshot, ProviderError>> + Send;
}
