//! Orchestration around the schedule engine.
//!
//! The planner is the only place that talks to providers. It enforces the
//! destination precondition, resolves the origin once, and sequences the
//! lookups the two engine phases need:
//!
//! ```text
//! origin ──┬── (geocode) → route ──→ estimate ──→ forecast at wake ──→ refine
//!          └── current weather ───────────────────────────────────────┘
//! ```
//!
//! Every provider failure becomes a degraded snapshot with the error text
//! attached, so a plan is always produced once a destination is set.

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;
use tracing::{info, warn};

use crate::engine::{self, ProvisionalEstimate, ScheduleInputs, ScheduleResult};
use crate::error::ValidationError;
use crate::location::{Coordinates, Destination};
use crate::providers::{GeocodingProvider, LocationProvider, RoutingProvider, WeatherForecastProvider};
use crate::snapshot::{TrafficSnapshot, WeatherSnapshot};

/// Everything produced by one planning run.
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutcome {
    pub origin: Coordinates,
    /// The configured default was used because no position was available.
    pub origin_is_fallback: bool,
    pub destination: Destination,
    pub traffic: TrafficSnapshot,
    pub current_weather: WeatherSnapshot,
    pub wake_weather: WeatherSnapshot,
    pub estimate: ProvisionalEstimate,
    pub schedule: ScheduleResult,
}

impl PlanOutcome {
    /// Non-fatal provider errors, for display next to the schedule.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.origin_is_fallback {
            warnings.push(format!("Current position unavailable; using {}", self.origin));
        }
        if let Some(e) = &self.traffic.error {
            warnings.push(format!("Traffic: {e}"));
        }
        if let Some(e) = &self.current_weather.error {
            warnings.push(format!("Current weather: {e}"));
        }
        if let Some(e) = &self.wake_weather.error {
            warnings.push(format!("Wake-up weather: {e}"));
        }
        warnings
    }
}

pub struct Planner<'a, L, G, R, W> {
    location: &'a L,
    geocoder: &'a G,
    router: &'a R,
    weather: &'a W,
    default_origin: Coordinates,
}

impl<'a, L, G, R, W> Planner<'a, L, G, R, W>
where
    L: LocationProvider,
    G: GeocodingProvider,
    R: RoutingProvider,
    W: WeatherForecastProvider,
{
    pub fn new(
        location: &'a L,
        geocoder: &'a G,
        router: &'a R,
        weather: &'a W,
        default_origin: Coordinates,
    ) -> Self {
        Self {
            location,
            geocoder,
            router,
            weather,
            default_origin,
        }
    }

    /// Run both engine phases with freshly fetched snapshots.
    ///
    /// # Errors
    ///
    /// Only `ValidationError::DestinationRequired`; provider failures degrade.
    pub async fn plan<Tz: TimeZone>(
        &self,
        inputs: &ScheduleInputs,
        now: DateTime<Tz>,
    ) -> Result<PlanOutcome, ValidationError> {
        let destination = inputs.require_destination()?.clone();
        let (origin, origin_is_fallback) = self.origin().await;

        let ((traffic, destination), current_weather) = tokio::join!(
            self.traffic(origin, destination, now.fixed_offset()),
            self.current_weather(origin),
        );

        let estimate = engine::estimate(inputs, &traffic, now);
        info!(
            wake = %estimate.wake_time,
            target = %estimate.weather_target,
            "provisional wake-up; fetching forecast"
        );

        let wake_weather = match self.weather.forecast_at(origin, estimate.weather_target).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "wake-up forecast unavailable, assuming default weather");
                WeatherSnapshot::degraded(e.to_string())
            }
        };

        let schedule = estimate.refine(&wake_weather);
        info!(
            wake = %schedule.wake_up_time,
            first_alarm = %schedule.first_alarm_time,
            next_day = schedule.is_next_day,
            "schedule ready"
        );

        Ok(PlanOutcome {
            origin,
            origin_is_fallback,
            destination,
            traffic,
            current_weather,
            wake_weather,
            estimate,
            schedule,
        })
    }

    async fn origin(&self) -> (Coordinates, bool) {
        match self.location.current_position().await {
            Ok(position) => (position, false),
            Err(e) => {
                warn!(error = %e, fallback = %self.default_origin, "using default origin");
                (self.default_origin, true)
            }
        }
    }

    /// Route to the destination, geocoding it first when needed. Returns the
    /// destination with any resolved coordinates filled in.
    async fn traffic(
        &self,
        origin: Coordinates,
        mut destination: Destination,
        now: DateTime<FixedOffset>,
    ) -> (TrafficSnapshot, Destination) {
        let target = match destination.coordinates {
            Some(c) => c,
            None => match self.geocoder.geocode(&destination.label).await {
                Ok(c) => {
                    destination.coordinates = Some(c);
                    c
                }
                Err(e) => {
                    warn!(error = %e, destination = %destination.label, "geocoding failed");
                    return (TrafficSnapshot::unavailable(e.to_string()), destination);
                }
            },
        };

        match self.router.route(origin, target, now).await {
            Ok(route) => (route.into(), destination),
            Err(e) => {
                warn!(error = %e, "routing failed, using fallback commute");
                (TrafficSnapshot::unavailable(e.to_string()), destination)
            }
        }
    }

    async fn current_weather(&self, origin: Coordinates) -> WeatherSnapshot {
        match self.weather.current(origin).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "current weather unavailable");
                WeatherSnapshot::degraded(e.to_string())
            }
        }
    }
}
