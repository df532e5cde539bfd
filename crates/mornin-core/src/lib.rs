//! # Mornin Core Library
//!
//! This library computes when to wake up so that the user arrives at a
//! destination on time, given live traffic, the forecast at wake-up time and
//! a sleeper profile that accounts for snoozing. The `mornin` CLI is a thin
//! layer over the same library.
//!
//! ## Architecture
//!
//! - **Engine**: Pure minute arithmetic over snapshots, split into a
//!   provisional estimate and a weather refinement
//! - **Providers**: Traits for location, geocoding, routing and weather, with
//!   HERE and OpenWeather adapters
//! - **Planner**: Sequences provider calls around the two engine phases and
//!   degrades failed lookups to defaults
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`estimate`] / [`ProvisionalEstimate::refine`]: The schedule engine
//! - [`Planner`]: End-to-end planning against real providers
//! - [`SleeperProfile`]: Snooze and buffer presets
//! - [`Config`]: Application configuration management

pub mod engine;
pub mod error;
pub mod location;
pub mod planner;
pub mod profile;
pub mod providers;
pub mod snapshot;
pub mod storage;
pub mod time;

pub use engine::{compute_schedule, estimate, Breakdown, ProvisionalEstimate, ScheduleInputs, ScheduleResult};
pub use error::{ConfigError, CoreError, ProviderError, ValidationError};
pub use location::{Coordinates, Destination};
pub use planner::{PlanOutcome, Planner};
pub use profile::{ProfileSpec, SleeperProfile, SNOOZE_CYCLE_MINUTES};
pub use snapshot::{CongestionLevel, TrafficSnapshot, WeatherCondition, WeatherSnapshot};
pub use storage::Config;
pub use time::{ClockTime, TimeFormat};
