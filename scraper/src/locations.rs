use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::fetch::{fetch_with_retry, FetchOutcome, FetchRequest, RetryPolicy, Transport};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParkrunLocation {
    /// Latitude then longitude.
    pub coords: [f64; 2],
    pub name: String,
    pub description: String,
}

/// Shape of the file the location updater writes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationFile {
    pub parkruns: Vec<ParkrunLocation>,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    formatted_address: Option<String>,
    geometry: PlaceGeometry,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

pub fn places_search_url(base: &str, query: &str, api_key: &str) -> Result<String> {
    let url = Url::parse_with_params(base, &[("query", query), ("key", api_key)])
        .with_context(|| format!("Invalid places search URL: {}", base))?;
    Ok(url.into())
}

pub fn parse_places_response(json: &str) -> Result<Vec<ParkrunLocation>> {
    let response: PlacesResponse =
        serde_json::from_str(json).context("Failed to parse places response")?;

    Ok(response
        .results
        .into_iter()
        .map(|place| ParkrunLocation {
            coords: [place.geometry.location.lat, place.geometry.location.lng],
            name: place.name,
            description: place.formatted_address.unwrap_or_default(),
        })
        .collect())
}

pub fn fetch_locations(
    transport: &dyn Transport,
    request: &FetchRequest,
    policy: &RetryPolicy,
) -> Result<Vec<ParkrunLocation>> {
    match fetch_with_retry(transport, request, policy)? {
        FetchOutcome::Page(json) => {
            let locations = parse_places_response(&json)?;
            info!(count = locations.len(), "received places");
            Ok(locations)
        }
        FetchOutcome::AccessDenied => Ok(Vec::new()),
    }
}
