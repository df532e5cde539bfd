use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse congestion classification derived from the traffic delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Light,
    Moderate,
    Heavy,
}

impl CongestionLevel {
    /// More than 10 minutes of delay is heavy, more than 5 is moderate.
    pub fn from_delay(delay_minutes: u32) -> Self {
        if delay_minutes > 10 {
            CongestionLevel::Heavy
        } else if delay_minutes > 5 {
            CongestionLevel::Moderate
        } else {
            CongestionLevel::Light
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CongestionLevel::Light => "light",
            CongestionLevel::Moderate => "moderate",
            CongestionLevel::Heavy => "heavy",
        })
    }
}

/// Normalized result of a route lookup.
///
/// Either carries durations, or an `error` meaning traffic is unknown. An
/// unknown snapshot makes the engine fall back to the configured baseline
/// commute with no delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    pub total_travel_minutes: u32,
    pub baseline_minutes: u32,
    pub delay_minutes: u32,
    pub congestion: CongestionLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrafficSnapshot {
    pub fn from_durations(total_travel_minutes: u32, baseline_minutes: u32) -> Self {
        let delay_minutes = total_travel_minutes.saturating_sub(baseline_minutes);
        Self {
            total_travel_minutes,
            baseline_minutes,
            delay_minutes,
            congestion: CongestionLevel::from_delay(delay_minutes),
            polyline: None,
            error: None,
        }
    }

    pub fn with_polyline(mut self, polyline: impl Into<String>) -> Self {
        self.polyline = Some(polyline.into());
        self
    }

    /// Traffic is unknown; `message` is kept for display.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            total_travel_minutes: 0,
            baseline_minutes: 0,
            delay_minutes: 0,
            congestion: CongestionLevel::Light,
            polyline: None,
            error: Some(message.into()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.error.is_none()
    }

    /// `(commute, delay)` as the engine should count them.
    ///
    /// When traffic is known, `commute + delay` equals the total travel time
    /// even if the provider reported a baseline above the total.
    pub fn commute_and_delay(&self, fallback_minutes: u32) -> (u32, u32) {
        if self.is_available() {
            let commute = self.total_travel_minutes - self.delay_minutes;
            (commute, self.delay_minutes)
        } else {
            (fallback_minutes, 0)
        }
    }
}
