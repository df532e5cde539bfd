//! Location from configuration.
//!
//! A terminal has no geolocation API, so "current position" is whatever the
//! user configured or passed on the command line.

use super::traits::LocationProvider;
use crate::error::ProviderError;
use crate::location::Coordinates;

#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    position: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

impl LocationProvider for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coordinates, ProviderError> {
        self.position
            .ok_or_else(|| ProviderError::Unavailable("No current position available".into()))
    }
}
