//! Geographic positions and resolved destinations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `lat,lng` as the routing and reverse-geocoding APIs expect it.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// Where the user needs to be.
///
/// `coordinates` is filled in when the address came from an autocomplete
/// pick; a typed address without coordinates is geocoded before routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub label: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl Destination {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            coordinates: None,
        }
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// A destination with a blank label and no coordinates does not count.
    pub fn is_set(&self) -> bool {
        !self.label.trim().is_empty() || self.coordinates.is_some()
    }
}
