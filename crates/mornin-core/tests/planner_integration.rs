//! End-to-end planning through the HERE and OpenWeather adapters.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};
use mockito::{Matcher, Server, ServerGuard};
use mornin_core::providers::{ConfiguredLocation, HereClient, HereEndpoints, OpenWeatherClient};
use mornin_core::{
    ClockTime, Coordinates, Destination, Planner, ScheduleInputs, SleeperProfile, ValidationError,
};

const TIMEOUT: Duration = Duration::from_secs(5);

fn now() -> DateTime<FixedOffset> {
    FixedOffset::west_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 3, 10, 22, 0, 0)
        .unwrap()
}

fn home() -> Coordinates {
    Coordinates::new(40.7128, -74.006)
}

fn inputs(destination: Destination) -> ScheduleInputs {
    ScheduleInputs::new(ClockTime::new(8, 0).unwrap())
        .get_ready(30)
        .buffer(10)
        .profile(SleeperProfile::Heavy)
        .destination(destination)
}

async fn mock_route(server: &mut ServerGuard, duration: u64, base: u64) -> mockito::Mock {
    server
        .mock("GET", "/v8/routes")
        .match_query(Matcher::Any)
        .with_body(format!(
            r#"{{"routes":[{{"sections":[{{"travelSummary":{{"duration":{duration},"baseDuration":{base}}}}}]}}]}}"#
        ))
        .create_async()
        .await
}

async fn mock_weather(server: &mut ServerGuard, rain: Option<f64>) {
    let rain = rain
        .map(|mm| format!(r#","rain":{{"3h":{mm}}}"#))
        .unwrap_or_default();
    server
        .mock("GET", "/forecast")
        .match_query(Matcher::Any)
        .with_body(format!(
            r#"{{"list":[{{"dt":1773230400,"main":{{"temp":44.0}},"weather":[{{"main":"Rain","description":"moderate rain"}}]{rain}}}]}}"#
        ))
        .create_async()
        .await;
    server
        .mock("GET", "/weather")
        .match_query(Matcher::Any)
        .with_body(r#"{"dt":1773198000,"main":{"temp":48.0},"weather":[{"main":"Clouds","description":"broken clouds"}]}"#)
        .create_async()
        .await;
}

/// Test: heavy sleeper, live traffic and rain at wake time.
#[tokio::test]
async fn test_plan_with_traffic_and_rain() {
    let mut server = Server::new_async().await;
    let route = mock_route(&mut server, 2400, 1500).await;
    mock_weather(&mut server, Some(1.4)).await;

    let location = ConfiguredLocation::new(Some(home()));
    let here = HereClient::new("key", HereEndpoints::at(&server.url()), TIMEOUT);
    let weather = OpenWeatherClient::new("key", "imperial", server.url(), TIMEOUT);
    let planner = Planner::new(&location, &here, &here, &weather, home());

    let destination = Destination::new("Campus").with_coordinates(Coordinates::new(40.8075, -73.9626));
    let outcome = planner.plan(&inputs(destination), now()).await.unwrap();
    route.assert_async().await;

    let schedule = &outcome.schedule;
    // 30 + 25 + 15 + 5 + 10 + 15 = 100 minutes of prep, then 27 of snoozing
    assert_eq!(schedule.breakdown.total_prep(), 100);
    assert_eq!(schedule.breakdown.weather_delay, 5);
    assert_eq!(schedule.first_alarm_time.to_string(), "06:20");
    assert_eq!(schedule.wake_up_time.to_string(), "05:53");
    assert_eq!(schedule.snooze_count, 3);
    assert!(schedule.is_next_day);
    assert_eq!(outcome.current_weather.description, "broken clouds");
    assert!(outcome.warnings().is_empty());
}

/// Test: a typed destination is geocoded before routing.
#[tokio::test]
async fn test_plan_geocodes_typed_destination() {
    let mut server = Server::new_async().await;
    let geocode = server
        .mock("GET", "/v1/geocode")
        .match_query(Matcher::UrlEncoded("q".into(), "Columbia University".into()))
        .with_body(r#"{"items":[{"position":{"lat":40.8075,"lng":-73.9626}}]}"#)
        .create_async()
        .await;
    let route = server
        .mock("GET", "/v8/routes")
        .match_query(Matcher::UrlEncoded(
            "destination".into(),
            "40.8075,-73.9626".into(),
        ))
        .with_body(r#"{"routes":[{"sections":[{"travelSummary":{"duration":1500,"baseDuration":1500}}]}]}"#)
        .create_async()
        .await;
    mock_weather(&mut server, None).await;

    let location = ConfiguredLocation::new(Some(home()));
    let here = HereClient::new("key", HereEndpoints::at(&server.url()), TIMEOUT);
    let weather = OpenWeatherClient::new("key", "imperial", server.url(), TIMEOUT);
    let planner = Planner::new(&location, &here, &here, &weather, home());

    let outcome = planner
        .plan(&inputs(Destination::new("Columbia University")), now())
        .await
        .unwrap();
    geocode.assert_async().await;
    route.assert_async().await;

    assert_eq!(outcome.destination.coordinates, Some(Coordinates::new(40.8075, -73.9626)));
    assert_eq!(outcome.schedule.breakdown.commute, 25);
    assert_eq!(outcome.schedule.breakdown.weather_delay, 0);
}

/// Test: every provider down still yields a schedule from defaults.
#[tokio::test]
async fn test_plan_all_providers_down() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let location = ConfiguredLocation::default();
    let here = HereClient::new("key", HereEndpoints::at(&server.url()), TIMEOUT);
    let weather = OpenWeatherClient::new("key", "imperial", server.url(), TIMEOUT);
    let planner = Planner::new(&location, &here, &here, &weather, home());

    let destination = Destination::new("Campus").with_coordinates(Coordinates::new(40.8075, -73.9626));
    let outcome = planner
        .plan(&inputs(destination).fallback_commute(30), now())
        .await
        .unwrap();

    assert!(outcome.origin_is_fallback);
    assert_eq!(outcome.schedule.breakdown.commute, 30);
    assert_eq!(outcome.schedule.breakdown.traffic_delay, 0);
    assert_eq!(outcome.schedule.breakdown.weather_delay, 0);
    assert!(outcome.schedule.traffic_error.is_some());
    assert_eq!(outcome.wake_weather.description, "Clear morning");
    assert_eq!(outcome.warnings().len(), 4);
}

/// Test: without a destination no request is made.
#[tokio::test]
async fn test_plan_requires_destination() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let location = ConfiguredLocation::new(Some(home()));
    let here = HereClient::new("key", HereEndpoints::at(&server.url()), TIMEOUT);
    let weather = OpenWeatherClient::new("key", "imperial", server.url(), TIMEOUT);
    let planner = Planner::new(&location, &here, &here, &weather, home());

    let bare = ScheduleInputs::new(ClockTime::new(8, 0).unwrap());
    let err = planner.plan(&bare, now()).await.unwrap_err();
    assert_eq!(err, ValidationError::DestinationRequired);
    any.assert_async().await;
}
