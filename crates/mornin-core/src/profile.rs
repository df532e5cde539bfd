//! Sleeper profiles.
//!
//! A sleeper profile is the user's own answer to "how do you wake up?". It
//! decides how many snooze cycles to plan for and how much extra slack to add.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Length of one snooze cycle in minutes.
pub const SNOOZE_CYCLE_MINUTES: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SleeperProfile {
    #[serde(rename = "heavy-sleeper")]
    Heavy,
    #[default]
    Normal,
    #[serde(rename = "light-sleeper")]
    Light,
    AlwaysLate,
}

/// Snooze and buffer figures for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfileSpec {
    pub snooze_count: u32,
    pub extra_buffer_minutes: u32,
    pub label: &'static str,
}

impl ProfileSpec {
    /// Minutes spent between the first alarm and actually getting up.
    pub fn snooze_minutes(&self) -> u32 {
        self.snooze_count * SNOOZE_CYCLE_MINUTES
    }
}

impl SleeperProfile {
    pub const ALL: [SleeperProfile; 4] = [
        SleeperProfile::Heavy,
        SleeperProfile::Normal,
        SleeperProfile::Light,
        SleeperProfile::AlwaysLate,
    ];

    pub fn spec(self) -> ProfileSpec {
        match self {
            SleeperProfile::Heavy => ProfileSpec {
                snooze_count: 3,
                extra_buffer_minutes: 15,
                label: "Heavy Sleeper",
            },
            SleeperProfile::Normal => ProfileSpec {
                snooze_count: 1,
                extra_buffer_minutes: 5,
                label: "Normal Sleeper",
            },
            SleeperProfile::Light => ProfileSpec {
                snooze_count: 0,
                extra_buffer_minutes: 0,
                label: "Light Sleeper",
            },
            SleeperProfile::AlwaysLate => ProfileSpec {
                snooze_count: 2,
                extra_buffer_minutes: 20,
                label: "Always Late",
            },
        }
    }

    /// Stable key used in config files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            SleeperProfile::Heavy => "heavy-sleeper",
            SleeperProfile::Normal => "normal",
            SleeperProfile::Light => "light-sleeper",
            SleeperProfile::AlwaysLate => "always-late",
        }
    }
}

impl fmt::Display for SleeperProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SleeperProfile {
    type Err = ValidationError;

    /// Accepts the stable keys plus the short forms `heavy` and `light`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "heavy-sleeper" | "heavy" => Ok(SleeperProfile::Heavy),
            "normal" | "normal-sleeper" => Ok(SleeperProfile::Normal),
            "light-sleeper" | "light" => Ok(SleeperProfile::Light),
            "always-late" => Ok(SleeperProfile::AlwaysLate),
            _ => Err(ValidationError::UnknownProfile(s.to_string())),
        }
    }
}
