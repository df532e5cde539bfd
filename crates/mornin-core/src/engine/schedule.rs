//! Two-phase wake-up computation.
//!
//! The wake time depends on the weather delay, and the weather we care about
//! is the weather at wake time. Instead of iterating to a fixed point, the
//! computation runs in two steps:
//!
//! 1. [`estimate`] computes a provisional wake time with no weather delay and
//!    the instant the caller should ask the forecast provider about.
//! 2. [`ProvisionalEstimate::refine`] folds in the weather delay and commits.
//!
//! The delay is either 0 or 5 minutes, so a single refinement is enough; the
//! refined wake time is never sent back for another forecast.
//!
//! ```ignore
//! let estimate = engine::estimate(&inputs, &traffic, now);
//! let weather = forecast.forecast_at(origin, estimate.weather_target).await?;
//! let result = estimate.refine(&weather);
//! ```

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use serde::Serialize;
use tracing::debug;

use super::inputs::ScheduleInputs;
use super::result::{Breakdown, ScheduleResult};
use crate::snapshot::{TrafficSnapshot, WeatherSnapshot};
use crate::time::{
    arrival_instant, is_arrival_next_day, minutes_to_time, time_to_minutes, ClockTime,
    MINUTES_PER_DAY,
};

/// Output of the first phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionalEstimate {
    pub arrival_time: ClockTime,
    pub arrival_at: DateTime<FixedOffset>,
    pub is_next_day: bool,
    /// Breakdown without any weather delay.
    pub breakdown: Breakdown,
    pub snooze_count: u32,
    /// Arrival minutes minus everything; negative when the wake-up falls on
    /// the calendar day before the arrival.
    pub wake_minutes_raw: i32,
    pub wake_time: ClockTime,
    /// When to sample the forecast: the provisional wake-up instant.
    pub weather_target: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_error: Option<String>,
}

impl ProvisionalEstimate {
    /// True when the provisional wake-up happens on a later calendar day
    /// than `now`: the arrival rolled to tomorrow and the wake-up did not
    /// fold back past midnight.
    pub fn wakes_on_later_day<Tz: TimeZone>(&self, now: DateTime<Tz>) -> bool {
        self.weather_target.with_timezone(&now.timezone()).date_naive() > now.date_naive()
    }

    /// Second phase: add the weather delay and produce the final schedule.
    pub fn refine(&self, weather: &WeatherSnapshot) -> ScheduleResult {
        let breakdown = Breakdown {
            weather_delay: weather.delay_minutes(),
            ..self.breakdown
        };
        let arrival_minutes = time_to_minutes(self.arrival_time);
        let total_prep = as_minutes(breakdown.total_prep());
        let first_alarm_minutes = arrival_minutes - total_prep;
        let wake_minutes = first_alarm_minutes - as_minutes(breakdown.snooze_time);

        let first_alarm_at = self.arrival_at - Duration::minutes(i64::from(total_prep));
        let wake_at = first_alarm_at - Duration::minutes(i64::from(breakdown.snooze_time));

        debug!(
            weather_delay = breakdown.weather_delay,
            total_prep,
            wake_minutes,
            "refined schedule"
        );

        ScheduleResult {
            arrival_time: self.arrival_time,
            wake_up_time: minutes_to_time(wake_minutes),
            first_alarm_time: minutes_to_time(first_alarm_minutes),
            is_next_day: self.is_next_day,
            snooze_count: self.snooze_count,
            breakdown,
            arrival_at: self.arrival_at,
            wake_at,
            first_alarm_at,
            traffic_error: self.traffic_error.clone(),
        }
    }
}

/// First phase: provisional wake-up time ignoring the weather.
///
/// The arrival is resolved in `now`'s zone; the instants in the result carry
/// the offset in force at arrival.
pub fn estimate<Tz: TimeZone>(
    inputs: &ScheduleInputs,
    traffic: &TrafficSnapshot,
    now: DateTime<Tz>,
) -> ProvisionalEstimate {
    let profile = inputs.sleeper_profile.spec();
    let (commute, traffic_delay) = traffic.commute_and_delay(inputs.fallback_commute_minutes);

    let breakdown = Breakdown {
        get_ready: inputs.get_ready_minutes,
        commute,
        traffic_delay,
        weather_delay: 0,
        buffer: inputs.buffer_minutes,
        personal_buffer: profile.extra_buffer_minutes,
        snooze_time: profile.snooze_minutes(),
    };

    let arrival_minutes = time_to_minutes(inputs.arrival_time);
    let wake_minutes_raw = arrival_minutes - as_minutes(breakdown.total());
    let arrival_at = arrival_instant(inputs.arrival_time, now.clone()).fixed_offset();
    let weather_target = arrival_at - Duration::minutes(i64::from(breakdown.total()));

    debug!(
        arrival = %inputs.arrival_time,
        total_prep = breakdown.total_prep(),
        snooze_time = breakdown.snooze_time,
        wake_minutes_raw,
        "provisional estimate"
    );

    ProvisionalEstimate {
        arrival_time: inputs.arrival_time,
        arrival_at,
        is_next_day: is_arrival_next_day(inputs.arrival_time, now),
        breakdown,
        snooze_count: profile.snooze_count,
        wake_minutes_raw,
        wake_time: minutes_to_time(wake_minutes_raw),
        weather_target,
        traffic_error: traffic.error.clone(),
    }
}

/// Both phases at once, for callers that already hold the wake-time weather.
pub fn compute_schedule<Tz: TimeZone>(
    inputs: &ScheduleInputs,
    traffic: &TrafficSnapshot,
    weather_at_estimated_time: &WeatherSnapshot,
    now: DateTime<Tz>,
) -> ScheduleResult {
    estimate(inputs, traffic, now).refine(weather_at_estimated_time)
}

/// Minute sums stay far below `i32::MAX` in practice; saturate rather than wrap.
fn as_minutes(minutes: u32) -> i32 {
    i32::try_from(minutes).unwrap_or(i32::MAX - MINUTES_PER_DAY)
}
