use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::time::ClockTime;

/// Itemized minutes between waking up and arriving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub get_ready: u32,
    /// Free-flow travel time.
    pub commute: u32,
    pub traffic_delay: u32,
    pub weather_delay: u32,
    pub buffer: u32,
    pub personal_buffer: u32,
    pub snooze_time: u32,
}

impl Breakdown {
    /// Minutes from the first alarm to arrival.
    pub fn total_prep(&self) -> u32 {
        [
            self.commute,
            self.traffic_delay,
            self.weather_delay,
            self.buffer,
            self.personal_buffer,
        ]
        .into_iter()
        .fold(self.get_ready, u32::saturating_add)
    }

    /// Minutes from the final wake-up to arrival.
    pub fn total(&self) -> u32 {
        self.total_prep().saturating_add(self.snooze_time)
    }
}

/// The final schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub arrival_time: ClockTime,
    pub wake_up_time: ClockTime,
    pub first_alarm_time: ClockTime,
    /// The arrival clock time had already passed today.
    pub is_next_day: bool,
    pub snooze_count: u32,
    pub breakdown: Breakdown,
    pub arrival_at: DateTime<FixedOffset>,
    pub wake_at: DateTime<FixedOffset>,
    pub first_alarm_at: DateTime<FixedOffset>,
    /// Set when the commute came from the fallback instead of live traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_error: Option<String>,
}
