use anyhow::{Context, Result};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::fetch::{fetch_with_retry, FetchError, FetchOutcome, FetchRequest, RetryPolicy, Transport};

pub const NO_DESCRIPTION: &str = "No description available";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Beach,
    Hilly,
    Trail,
    Path,
    Unknown,
}

/// Words in an event's location that become tags.
const LOCATION_TAG_KEYWORDS: [&str; 1] = ["park"];

/// Checked in order; the first keyword found wins.
const TERRAIN_KEYWORDS: [(&str, Terrain); 4] = [
    ("beach", Terrain::Beach),
    ("hilly", Terrain::Hilly),
    ("trail", Terrain::Trail),
    ("path", Terrain::Path),
];

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Terrain::Beach => "beach",
            Terrain::Hilly => "hilly",
            Terrain::Trail => "trail",
            Terrain::Path => "path",
            Terrain::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventCatalog {
    pub countries: HashMap<String, Country>,
    pub events: EventCollection,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Country {
    /// Host of the country's site; null for countries without one.
    pub url: Option<String>,
    /// `[min_lng, min_lat, max_lng, max_lat]`
    #[serde(default)]
    pub bounds: Option<[f64; 4]>,
}

impl Country {
    fn contains(&self, lng: f64, lat: f64) -> bool {
        match self.bounds {
            Some([min_lng, min_lat, max_lng, max_lat]) => {
                (min_lng..=max_lng).contains(&lng) && (min_lat..=max_lat).contains(&lat)
            }
            None => false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventCollection {
    pub features: Vec<EventFeature>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventFeature {
    pub properties: EventProperties,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventProperties {
    pub eventname: String,
    #[serde(rename = "EventLongName")]
    pub long_name: String,
    #[serde(rename = "EventLocation")]
    pub location: String,
    pub countrycode: CountryCode,
}

/// The catalog stores country codes as numbers; accept strings too.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum CountryCode {
    Number(u64),
    Text(String),
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountryCode::Number(n) => write!(f, "{}", n),
            CountryCode::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Geometry {
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EventRecord {
    pub eventname: String,
    #[serde(rename = "EventLongName")]
    pub long_name: String,
    #[serde(rename = "EventLocation")]
    pub location: String,
    pub url: String,
    pub description: String,
    pub terrain: Terrain,
    #[serde(default)]
    pub tags: Vec<String>,
    pub coordinates: Vec<f64>,
}

pub fn load_catalog(path: &Path) -> Result<EventCatalog> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event catalog {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse event catalog {}", path.display()))
}

/// The course page of an event, or None when the country has no site.
pub fn event_url(country: &Country, eventname: &str) -> Option<String> {
    country
        .url
        .as_deref()
        .map(|host| format!("https://{}/{}/course", host, eventname))
}

/// A country with a site whose bounds contain the point, lowest code first.
pub fn country_by_bounds<'a>(
    countries: &'a HashMap<String, Country>,
    coordinates: &[f64],
) -> Option<&'a Country> {
    let (lng, lat) = match coordinates {
        [lng, lat, ..] => (*lng, *lat),
        _ => return None,
    };

    countries
        .iter()
        .filter(|(_, country)| country.url.is_some() && country.contains(lng, lat))
        .min_by_key(|(code, _)| code.parse::<u64>().unwrap_or(u64::MAX))
        .map(|(_, country)| country)
}

pub fn location_tags(location: &str) -> Vec<String> {
    let lower = location.to_lowercase();
    LOCATION_TAG_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}

pub fn extract_description(html: &str) -> String {
    let document = Html::parse_document(html);
    let description_selector = Selector::parse("div.c-event-description").unwrap();

    document
        .select(&description_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

pub fn classify_terrain(description: &str) -> Terrain {
    let lower = description.to_lowercase();
    TERRAIN_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, terrain)| *terrain)
        .unwrap_or(Terrain::Unknown)
}

pub fn enrich_events(
    catalog: &EventCatalog,
    transport: &dyn Transport,
    policy: &RetryPolicy,
    user_agent: &str,
    limit: Option<usize>,
) -> Result<Vec<EventRecord>, FetchError> {
    let features = &catalog.events.features;
    let take = limit.unwrap_or(features.len());
    let mut records = Vec::new();

    for feature in features.iter().take(take) {
        let props = &feature.properties;
        let code = props.countrycode.to_string();
        let coordinates = &feature.geometry.coordinates;

        // Fall back to the coordinates when the event's own country has no site.
        let url = catalog
            .countries
            .get(&code)
            .and_then(|c| event_url(c, &props.eventname))
            .or_else(|| {
                country_by_bounds(&catalog.countries, coordinates)
                    .and_then(|c| event_url(c, &props.eventname))
            });
        let url = match url {
            Some(url) => url,
            None => {
                warn!(event = %props.eventname, country = %code, "no site for country, skipping event");
                continue;
            }
        };

        let request = FetchRequest::with_user_agent(url.as_str(), user_agent);
        let description = match fetch_with_retry(transport, &request, policy)? {
            FetchOutcome::Page(html) => extract_description(&html),
            FetchOutcome::AccessDenied => NO_DESCRIPTION.to_string(),
        };
        let terrain = classify_terrain(&description);
        info!(event = %props.eventname, %terrain, "enriched event");

        records.push(EventRecord {
            eventname: props.eventname.clone(),
            long_name: props.long_name.clone(),
            location: props.location.clone(),
            url,
            description,
            terrain,
            tags: location_tags(&props.location),
            coordinates: coordinates.clone(),
        });
    }

    Ok(records)
}
