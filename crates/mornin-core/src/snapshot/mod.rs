//! Provider results normalized into what the schedule engine consumes.

mod traffic;
mod weather;

pub use traffic::{CongestionLevel, TrafficSnapshot};
pub use weather::{WeatherCondition, WeatherSnapshot, PRECIPITATION_DELAY_MINUTES};
