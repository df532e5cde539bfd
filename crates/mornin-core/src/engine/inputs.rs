use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::location::Destination;
use crate::profile::SleeperProfile;
use crate::time::{ClockTime, MAX_MINUTES};

/// Baseline commute assumed when traffic is unknown.
pub const DEFAULT_FALLBACK_COMMUTE_MINUTES: u32 = 25;

/// Everything the user told us, frozen for one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInputs {
    pub arrival_time: ClockTime,
    pub get_ready_minutes: u32,
    pub buffer_minutes: u32,
    pub sleeper_profile: SleeperProfile,
    #[serde(default)]
    pub destination: Option<Destination>,
    pub fallback_commute_minutes: u32,
}

impl ScheduleInputs {
    /// Inputs with the stock defaults: 30 minutes to get ready, a 10 minute
    /// buffer, a normal sleeper and no destination yet.
    pub fn new(arrival_time: ClockTime) -> Self {
        Self {
            arrival_time,
            get_ready_minutes: 30,
            buffer_minutes: 10,
            sleeper_profile: SleeperProfile::Normal,
            destination: None,
            fallback_commute_minutes: DEFAULT_FALLBACK_COMMUTE_MINUTES,
        }
    }

    pub fn get_ready(mut self, minutes: u32) -> Self {
        self.get_ready_minutes = minutes.min(MAX_MINUTES);
        self
    }

    pub fn buffer(mut self, minutes: u32) -> Self {
        self.buffer_minutes = minutes.min(MAX_MINUTES);
        self
    }

    pub fn profile(mut self, profile: SleeperProfile) -> Self {
        self.sleeper_profile = profile;
        self
    }

    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn fallback_commute(mut self, minutes: u32) -> Self {
        self.fallback_commute_minutes = minutes.min(MAX_MINUTES);
        self
    }

    /// The precondition for planning: a non-blank destination.
    pub fn require_destination(&self) -> Result<&Destination, ValidationError> {
        self.destination
            .as_ref()
            .filter(|d| d.is_set())
            .ok_or(ValidationError::DestinationRequired)
    }
}
