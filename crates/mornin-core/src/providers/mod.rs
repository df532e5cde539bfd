//! External provider contracts and the adapters that implement them.
//!
//! The engine never talks to these; the planner calls them and turns any
//! failure into a degraded snapshot.

pub mod debounce;
pub mod here;
mod http;
pub mod location;
pub mod openweather;
pub mod traits;

pub use debounce::QueryDebouncer;
pub use here::{HereClient, HereEndpoints};
pub use location::ConfiguredLocation;
pub use openweather::OpenWeatherClient;
pub use traits::{
    AutocompleteProvider, GeocodingProvider, LocationProvider, Place, ReverseGeocodingProvider,
    Route, RoutingProvider, Suggestion, WeatherForecastProvider,
};
