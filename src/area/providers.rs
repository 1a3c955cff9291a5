//! Geocoding providers: transit middleware (Google-backed) and OpenStreetMap Nominatim.

use super::types::{GeocodeResult, ProviderError, ProviderKind};
use serde::Deserialize;
use std::time::Duration;

/// A text-to-coordinates lookup. The resolver drives an ordered list of these,
/// moving on to the next one on any error.
pub trait GeocodingProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn geocode(&self, query: &str) -> Result<GeocodeResult, ProviderError>;
}

fn build_agent(timeout: Duration, user_agent: &str) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
}

fn call(request: ureq::Request) -> Result<ureq::Response, ProviderError> {
    let response = request.call().map_err(|e| match e {
        ureq::Error::Status(code, _) => ProviderError::Status { code },
        ureq::Error::Transport(t) => ProviderError::Network(t.to_string()),
    })?;
    if !(200..300).contains(&response.status()) {
        return Err(ProviderError::Status { code: response.status() });
    }
    Ok(response)
}

fn check_coords(lat: f64, lon: f64) -> Result<(), ProviderError> {
    if !lat.is_finite() || !lon.is_finite() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(ProviderError::InvalidResponse(format!("coordinates out of range: {}, {}", lat, lon)));
    }
    Ok(())
}

// ─── Middleware provider ────────────────────────────────────────

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareGeocodeResponse {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

/// Geocoding through the transit middleware's `/api/geocode` endpoint.
pub struct MiddlewareGeocoder {
    agent: ureq::Agent,
    base_url: String,
    api_key: Option<String>,
}

impl MiddlewareGeocoder {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration, user_agent: &str) -> Self {
        Self {
            agent: build_agent(timeout, user_agent),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

impl GeocodingProvider for MiddlewareGeocoder {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Middleware
    }

    fn geocode(&self, query: &str) -> Result<GeocodeResult, ProviderError> {
        let url = format!("{}/api/geocode", self.base_url);
        let mut request = self.agent.get(&url).query("query", query);
        if let Some(ref key) = self.api_key {
            request = request.set("X-API-Key", key);
        }

        let body: MiddlewareGeocodeResponse = call(request)?
            .into_json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        parse_middleware(query, body)
    }
}

pub fn parse_middleware(query: &str, body: MiddlewareGeocodeResponse) -> Result<GeocodeResult, ProviderError> {
    let (lat, lon) = match (body.lat, body.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(ProviderError::InvalidResponse("missing lat/lon".into())),
    };
    check_coords(lat, lon)?;

    let name = body
        .formatted_address
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| query.to_string());
    // Google formatted addresses end with the country.
    let country = name
        .rsplit(',')
        .next()
        .map(str::trim)
        .filter(|c| c.eq_ignore_ascii_case("malaysia"))
        .map(str::to_string);

    Ok(GeocodeResult { name, state: None, country, lat, lon })
}

// ─── Nominatim provider ─────────────────────────────────────────

#[derive(Deserialize, Debug, Clone)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub address: NominatimAddress,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct NominatimAddress {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Direct OpenStreetMap Nominatim search, restricted to Malaysia.
pub struct NominatimGeocoder {
    agent: ureq::Agent,
    base_url: String,
}

impl NominatimGeocoder {
    /// Nominatim's usage policy requires an identifying `user_agent`.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Self {
        Self {
            agent: build_agent(timeout, user_agent),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl GeocodingProvider for NominatimGeocoder {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Nominatim
    }

    fn geocode(&self, query: &str) -> Result<GeocodeResult, ProviderError> {
        let url = format!("{}/search", self.base_url);
        let request = self
            .agent
            .get(&url)
            .query("q", query)
            .query("format", "json")
            .query("countrycodes", "my")
            .query("limit", "1")
            .query("addressdetails", "1");

        let places: Vec<NominatimPlace> = call(request)?
            .into_json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        parse_nominatim(query, places)
    }
}

pub fn parse_nominatim(query: &str, places: Vec<NominatimPlace>) -> Result<GeocodeResult, ProviderError> {
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::NotFound(query.to_string()))?;

    let lat: f64 = place
        .lat
        .trim()
        .parse()
        .map_err(|_| ProviderError::InvalidResponse(format!("bad latitude '{}'", place.lat)))?;
    let lon: f64 = place
        .lon
        .trim()
        .parse()
        .map_err(|_| ProviderError::InvalidResponse(format!("bad longitude '{}'", place.lon)))?;
    check_coords(lat, lon)?;

    let name = if place.display_name.trim().is_empty() {
        place.address.city.or(place.address.town).unwrap_or_else(|| query.to_string())
    } else {
        place.display_name
    };

    Ok(GeocodeResult {
        name,
        state: place.address.state,
        country: place.address.country,
        lat,
        lon,
    })
}
