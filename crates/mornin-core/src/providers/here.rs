//! HERE adapter -- autocomplete, geocoding, reverse geocoding and routing.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use reqwest::Client;
use serde::Deserialize;

use super::http::{build_client, endpoint, get_json, round_minutes};
use super::traits::{
    AutocompleteProvider, GeocodingProvider, Place, ReverseGeocodingProvider, Route,
    RoutingProvider, Suggestion,
};
use crate::error::ProviderError;
use crate::location::Coordinates;

const SERVICE: &str = "HERE";
const SUGGESTION_LIMIT: usize = 5;

/// Base URLs for the four HERE services.
#[derive(Debug, Clone, PartialEq)]
pub struct HereEndpoints {
    pub autocomplete: String,
    pub geocode: String,
    pub revgeocode: String,
    pub router: String,
}

impl Default for HereEndpoints {
    fn default() -> Self {
        Self {
            autocomplete: "https://autocomplete.search.hereapi.com/v1/autocomplete".into(),
            geocode: "https://geocode.search.hereapi.com/v1/geocode".into(),
            revgeocode: "https://revgeocode.search.hereapi.com/v1/revgeocode".into(),
            router: "https://router.hereapi.com/v8/routes".into(),
        }
    }
}

impl HereEndpoints {
    /// All four services under one base URL (used against mock servers).
    pub fn at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            autocomplete: format!("{base}/v1/autocomplete"),
            geocode: format!("{base}/v1/geocode"),
            revgeocode: format!("{base}/v1/revgeocode"),
            router: format!("{base}/v8/routes"),
        }
    }
}

pub struct HereClient {
    http: Client,
    api_key: String,
    endpoints: HereEndpoints,
}

// ── Wire types ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ItemsResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Position {
    lat: f64,
    lng: f64,
}

impl From<Position> for Coordinates {
    fn from(p: Position) -> Self {
        Coordinates::new(p.lat, p.lng)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Address {
    #[serde(default)]
    label: String,
    city: Option<String>,
    state: Option<String>,
    country_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AutocompleteItem {
    title: String,
    address: Option<Address>,
    position: Option<Position>,
}

#[derive(Debug, Deserialize)]
struct GeocodeItem {
    position: Position,
}

#[derive(Debug, Deserialize)]
struct RevgeocodeItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    address: Address,
}

#[derive(Debug, Deserialize)]
struct RoutesResponse {
    #[serde(default)]
    routes: Vec<WireRoute>,
}

#[derive(Debug, Deserialize)]
struct WireRoute {
    #[serde(default)]
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Section {
    travel_summary: Option<TravelSummary>,
    summary: Option<TravelSummary>,
    polyline: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TravelSummary {
    /// Seconds under current traffic.
    duration: u64,
    /// Seconds under free-flow conditions.
    base_duration: Option<u64>,
}

// ── Client ───────────────────────────────────────────────────────────

impl HereClient {
    pub fn new(api_key: impl Into<String>, endpoints: HereEndpoints, timeout: Duration) -> Self {
        Self {
            http: build_client(timeout),
            api_key: api_key.into(),
            endpoints,
        }
    }

    fn key(&self) -> Result<String, ProviderError> {
        if self.api_key.trim().is_empty() {
            Err(ProviderError::MissingApiKey { service: SERVICE })
        } else {
            Ok(self.api_key.clone())
        }
    }
}

impl AutocompleteProvider for HereClient {
    async fn suggest(
        &self,
        query: &str,
        bias: Option<Coordinates>,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        let mut params = vec![
            ("q", query.to_string()),
            ("limit", SUGGESTION_LIMIT.to_string()),
            ("apikey", self.key()?),
        ];
        if let Some(at) = bias {
            params.push(("at", at.to_query()));
        }
        let url = endpoint(SERVICE, &self.endpoints.autocomplete, &params)?;
        let resp: ItemsResponse<AutocompleteItem> = get_json(&self.http, SERVICE, url).await?;

        Ok(resp
            .items
            .into_iter()
            .map(|item| Suggestion {
                label: item.title,
                address: item.address.map(|a| a.label).filter(|l| !l.is_empty()),
                coordinates: item.position.map(Coordinates::from),
            })
            .collect())
    }
}

impl GeocodingProvider for HereClient {
    async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        let url = endpoint(
            SERVICE,
            &self.endpoints.geocode,
            &[("q", address.to_string()), ("apikey", self.key()?)],
        )?;
        let resp: ItemsResponse<GeocodeItem> = get_json(&self.http, SERVICE, url).await?;

        resp.items
            .into_iter()
            .next()
            .map(|item| item.position.into())
            .ok_or_else(|| ProviderError::NotFound("Destination not found".into()))
    }
}

impl ReverseGeocodingProvider for HereClient {
    async fn reverse_geocode(&self, position: Coordinates) -> Result<Place, ProviderError> {
        let url = endpoint(
            SERVICE,
            &self.endpoints.revgeocode,
            &[("at", position.to_query()), ("apikey", self.key()?)],
        )?;
        let resp: ItemsResponse<RevgeocodeItem> = get_json(&self.http, SERVICE, url).await?;

        let item = resp
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound(format!("No address found at {position}")))?;
        let label = if item.address.label.is_empty() {
            item.title
        } else {
            item.address.label
        };
        Ok(Place {
            label,
            city: item.address.city,
            state: item.address.state,
            country: item.address.country_name,
        })
    }
}

impl RoutingProvider for HereClient {
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        departure: DateTime<FixedOffset>,
    ) -> Result<Route, ProviderError> {
        let url = endpoint(
            SERVICE,
            &self.endpoints.router,
            &[
                ("transportMode", "car".to_string()),
                ("origin", origin.to_query()),
                ("destination", destination.to_query()),
                ("return", "summary,travelSummary,polyline".to_string()),
                (
                    "departureTime",
                    departure.to_rfc3339_opts(SecondsFormat::Secs, false),
                ),
                ("apikey", self.key()?),
            ],
        )?;
        let resp: RoutesResponse = get_json(&self.http, SERVICE, url).await?;
        route_from_response(resp)
    }
}

/// Sum every section of the first route.
fn route_from_response(resp: RoutesResponse) -> Result<Route, ProviderError> {
    let route = resp
        .routes
        .into_iter()
        .next()
        .filter(|r| !r.sections.is_empty())
        .ok_or_else(|| ProviderError::NotFound("No route found".into()))?;

    let mut duration = 0u64;
    let mut base_duration = 0u64;
    let mut polyline = None;
    for section in route.sections {
        let summary = section
            .travel_summary
            .or(section.summary)
            .ok_or_else(|| ProviderError::Malformed {
                service: SERVICE,
                message: "route section has no travel summary".into(),
            })?;
        duration = duration.saturating_add(summary.duration);
        base_duration = base_duration.saturating_add(summary.base_duration.unwrap_or(summary.duration));
        if polyline.is_none() {
            polyline = section.polyline;
        }
    }

    Ok(Route {
        total_travel_minutes: round_minutes(duration),
        baseline_minutes: round_minutes(base_duration),
        polyline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Route, ProviderError> {
        route_from_response(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn route_rounds_seconds_to_minutes() {
        let route = parse(
            r#"{"routes":[{"sections":[{"travelSummary":{"duration":2010,"baseDuration":1500},"polyline":"BFoz5xJ67i1B"}]}]}"#,
        )
        .unwrap();
        assert_eq!(route.total_travel_minutes, 34);
        assert_eq!(route.baseline_minutes, 25);
        assert_eq!(route.polyline.as_deref(), Some("BFoz5xJ67i1B"));
    }

    #[test]
    fn route_sums_sections() {
        let route = parse(
            r#"{"routes":[{"sections":[
                {"travelSummary":{"duration":600,"baseDuration":600}},
                {"travelSummary":{"duration":900,"baseDuration":600}}
            ]}]}"#,
        )
        .unwrap();
        assert_eq!(route.total_travel_minutes, 25);
        assert_eq!(route.baseline_minutes, 20);
    }

    #[test]
    fn huge_section_durations_saturate() {
        let max = u64::MAX;
        let route = parse(&format!(
            r#"{{"routes":[{{"sections":[
                {{"travelSummary":{{"duration":{max},"baseDuration":{max}}}}},
                {{"travelSummary":{{"duration":{max}}}}}
            ]}}]}}"#
        ))
        .unwrap();
        assert_eq!(route.total_travel_minutes, u32::MAX);
        assert_eq!(route.baseline_minutes, u32::MAX);
    }

    #[test]
    fn missing_base_duration_means_no_delay() {
        let route = parse(r#"{"routes":[{"sections":[{"summary":{"duration":1200}}]}]}"#).unwrap();
        assert_eq!(route.total_travel_minutes, route.baseline_minutes);
    }

    #[test]
    fn no_routes_is_not_found() {
        let err = parse(r#"{"routes":[]}"#).unwrap_err();
        assert_eq!(err.to_string(), "No route found");
    }

    #[test]
    fn endpoints_under_one_base() {
        let endpoints = HereEndpoints::at("http://127.0.0.1:1234/");
        assert_eq!(endpoints.router, "http://127.0.0.1:1234/v8/routes");
        assert_eq!(endpoints.geocode, "http://127.0.0.1:1234/v1/geocode");
    }
}
