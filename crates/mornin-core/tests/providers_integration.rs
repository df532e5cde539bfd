//! Provider adapters against a local mock HTTP server.
//!
//! | Adapter       | Endpoint          | Covered                                   |
//! |---------------|-------------------|-------------------------------------------|
//! | HERE          | /v1/autocomplete  | query params, bias, mapping               |
//! | HERE          | /v1/geocode       | first hit, empty result                   |
//! | HERE          | /v1/revgeocode    | address label                             |
//! | HERE          | /v8/routes        | summed sections, HTTP errors, missing key |
//! | OpenWeather   | /forecast         | closest sample, rain delay                |
//! | OpenWeather   | /weather          | current conditions, malformed body        |

use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};
use mockito::{Matcher, Server};
use mornin_core::providers::{
    AutocompleteProvider, GeocodingProvider, HereClient, HereEndpoints, OpenWeatherClient,
    ReverseGeocodingProvider, RoutingProvider, WeatherForecastProvider,
};
use mornin_core::{Coordinates, ProviderError, WeatherCondition};

const TIMEOUT: Duration = Duration::from_secs(5);

fn here(server: &Server) -> HereClient {
    HereClient::new("test-key", HereEndpoints::at(&server.url()), TIMEOUT)
}

fn weather(server: &Server) -> OpenWeatherClient {
    OpenWeatherClient::new("test-key", "imperial", server.url(), TIMEOUT)
}

fn home() -> Coordinates {
    Coordinates::new(40.7128, -74.006)
}

fn campus() -> Coordinates {
    Coordinates::new(40.8075, -73.9626)
}

fn departure() -> DateTime<FixedOffset> {
    FixedOffset::west_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 3, 10, 22, 0, 0)
        .unwrap()
}

// ============================================================================
// HERE
// ============================================================================

/// Test: autocomplete sends the query, limit and bias, and maps items.
#[tokio::test]
async fn test_here_autocomplete_maps_items() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/autocomplete")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "116th St".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
            Matcher::UrlEncoded("at".into(), "40.7128,-74.006".into()),
            Matcher::UrlEncoded("apikey".into(), "test-key".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"items":[
                {"title":"116th St, New York","address":{"label":"W 116th St, New York, NY 10027"},
                 "position":{"lat":40.8075,"lng":-73.9626}},
                {"title":"116th St Station"}
            ]}"#,
        )
        .create_async()
        .await;

    let suggestions = here(&server).suggest("116th St", Some(home())).await.unwrap();
    mock.assert_async().await;

    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].label, "116th St, New York");
    assert_eq!(
        suggestions[0].address.as_deref(),
        Some("W 116th St, New York, NY 10027")
    );
    assert_eq!(suggestions[0].coordinates, Some(campus()));
    assert_eq!(suggestions[1].address, None);
    assert_eq!(suggestions[1].coordinates, None);
}

/// Test: geocoding returns the first item's position.
#[tokio::test]
async fn test_here_geocode_first_hit() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/geocode")
        .match_query(Matcher::UrlEncoded("q".into(), "Columbia University".into()))
        .with_body(
            r#"{"items":[{"position":{"lat":40.8075,"lng":-73.9626}},
                         {"position":{"lat":1.0,"lng":1.0}}]}"#,
        )
        .create_async()
        .await;

    let position = here(&server).geocode("Columbia University").await.unwrap();
    assert_eq!(position, campus());
}

/// Test: an empty geocoding result is "Destination not found".
#[tokio::test]
async fn test_here_geocode_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/geocode")
        .match_query(Matcher::Any)
        .with_body(r#"{"items":[]}"#)
        .create_async()
        .await;

    let err = here(&server).geocode("zzzz").await.unwrap_err();
    assert!(matches!(err, ProviderError::NotFound(_)));
    assert_eq!(err.to_string(), "Destination not found");
}

/// Test: reverse geocoding prefers the address label.
#[tokio::test]
async fn test_here_reverse_geocode() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/revgeocode")
        .match_query(Matcher::UrlEncoded("at".into(), "40.7128,-74.006".into()))
        .with_body(
            r#"{"items":[{"title":"City Hall","address":{
                "label":"City Hall Park, New York, NY 10007",
                "city":"New York","state":"New York","countryName":"United States"}}]}"#,
        )
        .create_async()
        .await;

    let place = here(&server).reverse_geocode(home()).await.unwrap();
    assert_eq!(place.label, "City Hall Park, New York, NY 10007");
    assert_eq!(place.city.as_deref(), Some("New York"));
    assert_eq!(place.country.as_deref(), Some("United States"));
}

/// Test: routing sums sections and rounds to whole minutes.
#[tokio::test]
async fn test_here_route_sums_sections() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v8/routes")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("transportMode".into(), "car".into()),
            Matcher::UrlEncoded("origin".into(), "40.7128,-74.006".into()),
            Matcher::UrlEncoded("destination".into(), "40.8075,-73.9626".into()),
            Matcher::UrlEncoded("departureTime".into(), "2026-03-10T22:00:00-05:00".into()),
        ]))
        .with_body(
            r#"{"routes":[{"sections":[
                {"travelSummary":{"duration":1500,"baseDuration":1200},"polyline":"BFoz5xJ67i1B1B7PzIhaxL7Y"},
                {"travelSummary":{"duration":900,"baseDuration":600}}
            ]}]}"#,
        )
        .create_async()
        .await;

    let route = here(&server).route(home(), campus(), departure()).await.unwrap();
    mock.assert_async().await;

    assert_eq!(route.total_travel_minutes, 40);
    assert_eq!(route.baseline_minutes, 30);
    assert_eq!(route.polyline.as_deref(), Some("BFoz5xJ67i1B1B7PzIhaxL7Y"));
}

/// Test: a server error surfaces as a status error.
#[tokio::test]
async fn test_here_route_http_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v8/routes")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":"Unauthorized"}"#)
        .create_async()
        .await;

    let err = here(&server).route(home(), campus(), departure()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 401, .. }));
}

/// Test: no API key fails before any request is made.
#[tokio::test]
async fn test_here_missing_key_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = HereClient::new("", HereEndpoints::at(&server.url()), TIMEOUT);
    let err = client.route(home(), campus(), departure()).await.unwrap_err();
    assert!(matches!(err, ProviderError::MissingApiKey { service: "HERE" }));
    mock.assert_async().await;
}

// ============================================================================
// OpenWeather
// ============================================================================

/// Test: the forecast sample closest to the target is used.
#[tokio::test]
async fn test_openweather_forecast_picks_closest_sample() {
    let target = departure() + chrono::Duration::hours(8);
    let t = target.timestamp();
    let body = format!(
        r#"{{"list":[
            {{"dt":{before},"main":{{"temp":41.2,"humidity":80}},"weather":[{{"main":"Clouds","description":"overcast clouds"}}],"clouds":{{"all":90}}}},
            {{"dt":{near},"main":{{"temp":39.6,"feels_like":33.1,"humidity":93}},"weather":[{{"main":"Rain","description":"light rain"}}],"clouds":{{"all":100}},"rain":{{"3h":0.62}}}},
            {{"dt":{after},"main":{{"temp":45.0}},"weather":[{{"main":"Clear","description":"clear sky"}}]}}
        ]}}"#,
        before = t - 3 * 3600,
        near = t + 1800,
        after = t + 3 * 3600,
    );

    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/forecast")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("lat".into(), "40.7128".into()),
            Matcher::UrlEncoded("lon".into(), "-74.006".into()),
            Matcher::UrlEncoded("units".into(), "imperial".into()),
            Matcher::UrlEncoded("appid".into(), "test-key".into()),
        ]))
        .with_body(body)
        .create_async()
        .await;

    let snapshot = weather(&server).forecast_at(home(), target).await.unwrap();
    mock.assert_async().await;

    assert_eq!(snapshot.condition, WeatherCondition::Rain);
    assert_eq!(snapshot.temperature, 40.0);
    assert_eq!(snapshot.feels_like, 33.0);
    assert_eq!(snapshot.precipitation_amount, 0.62);
    assert_eq!(snapshot.cloud_coverage_percent, 100);
    assert_eq!(snapshot.humidity_percent, 93);
    assert_eq!(snapshot.description, "light rain");
    assert_eq!(snapshot.delay_minutes(), 5);
}

/// Test: an empty forecast list is malformed.
#[tokio::test]
async fn test_openweather_empty_forecast() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/forecast")
        .match_query(Matcher::Any)
        .with_body(r#"{"list":[]}"#)
        .create_async()
        .await;

    let err = weather(&server).forecast_at(home(), departure()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Malformed { .. }));
}

/// Test: current weather reads the one-hour precipitation window.
#[tokio::test]
async fn test_openweather_current_conditions() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/weather")
        .match_query(Matcher::Any)
        .with_body(
            r#"{"dt":1773198000,"main":{"temp":28.4,"feels_like":19.9,"humidity":71},
                "weather":[{"main":"Snow","description":"light snow"}],
                "clouds":{"all":75},"snow":{"1h":0.3}}"#,
        )
        .create_async()
        .await;

    let snapshot = weather(&server).current(home()).await.unwrap();
    assert_eq!(snapshot.condition, WeatherCondition::Snow);
    assert_eq!(snapshot.precipitation_amount, 0.3);
    assert!(snapshot.has_precipitation());
    assert!(snapshot.error.is_none());
}

/// Test: a body that is not weather JSON is malformed.
#[tokio::test]
async fn test_openweather_malformed_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/weather")
        .match_query(Matcher::Any)
        .with_body("<html>rate limited</html>")
        .create_async()
        .await;

    let err = weather(&server).current(home()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Malformed { service: "OpenWeatherMap", .. }));
}
