//! Area resolver — orchestrates the gazetteer tiers and the geocoding chain.
//!
//! Flow:  direct landmarks → states/towns → geocoding (always) → address-derived area → not determined

use super::config::ResolverConfig;
use super::gazetteer::{self, GazetteerMatch};
use super::providers::GeocodingProvider;
use super::types::{
    AreaDetection, AreaError, Confidence, DetectedLocation, DetectionSource, GeocodeResult, ProviderKind,
    ServiceArea,
};
use tracing::{debug, info, warn};

/// The area resolver with its provider chain.
pub struct AreaResolver {
    providers: Vec<Box<dyn GeocodingProvider>>,
}

impl AreaResolver {
    pub fn new(config: &ResolverConfig) -> Self {
        Self::with_providers(config.build_providers())
    }

    /// Create a resolver with an explicit provider chain, tried in order.
    pub fn with_providers(providers: Vec<Box<dyn GeocodingProvider>>) -> Self {
        Self { providers }
    }

    /// Resolve free text to a service area.
    pub fn resolve(&self, query: &str) -> Result<AreaDetection, AreaError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AreaError::NoInput);
        }
        let normalized = gazetteer::normalize(query);

        // 1-2. Gazetteer tiers
        let table_match = gazetteer::direct_match(&normalized)
            .map(|m| (m, DetectionSource::DirectMatch))
            .or_else(|| gazetteer::state_match(&normalized).map(|m| (m, DetectionSource::StateMapping)));

        if let Some((m, source)) = table_match {
            debug!(query, key = m.key, area = %m.area, %source, "gazetteer match");
        }

        // 3. Geocode regardless; downstream tools need real coordinates.
        let geocoded = self.geocode(&geocoding_query(query));

        let detection = match (table_match, geocoded) {
            (Some((m, source)), Some((provider, result))) => AreaDetection {
                area: Some(m.area),
                confidence: Confidence::High,
                location: located(query, result, table_state(&m, source)),
                source,
                provider: Some(provider),
            },
            (None, Some((provider, result))) => {
                let derived = area_from_geocode(&result);
                let confidence = match derived {
                    Some(_) => provider.address_confidence(),
                    None => Confidence::Low,
                };
                AreaDetection {
                    area: derived.map(|m| m.area),
                    confidence,
                    location: located(query, result, None),
                    source: DetectionSource::Geocoding,
                    provider: Some(provider),
                }
            }
            // 4. No coordinates, but the table knows the area.
            (Some((m, source)), None) => AreaDetection {
                area: Some(m.area),
                confidence: Confidence::Medium,
                location: DetectedLocation {
                    query: query.to_string(),
                    name: None,
                    state: table_state(&m, source),
                    country: None,
                    coordinates: None,
                },
                source,
                provider: None,
            },
            // 5. Ask the user.
            (None, None) => {
                info!(query, "no service area detected");
                return Err(AreaError::NotDetermined {
                    query: query.to_string(),
                    areas: ServiceArea::ALL.to_vec(),
                });
            }
        };

        info!(
            query,
            area = detection.area_id(),
            confidence = %detection.confidence,
            source = %detection.source,
            "service area detected"
        );
        Ok(detection)
    }

    /// Walk the provider chain; the first success wins.
    fn geocode(&self, query: &str) -> Option<(ProviderKind, GeocodeResult)> {
        for provider in &self.providers {
            match provider.geocode(query) {
                Ok(result) => return Some((provider.kind(), result)),
                Err(e) => debug!(provider = %provider.kind(), error = %e, "geocoding failed, trying next provider"),
            }
        }
        if !self.providers.is_empty() {
            warn!(query, "all geocoding providers failed");
        }
        None
    }
}

/// Bias the geocoder towards Malaysia unless the query already names it.
fn geocoding_query(query: &str) -> String {
    if query.to_lowercase().contains("malaysia") {
        query.to_string()
    } else {
        format!("{}, Malaysia", query)
    }
}

/// Derive an area from the geocoder's answer: its state field first, then the address text.
fn area_from_geocode(result: &GeocodeResult) -> Option<GazetteerMatch> {
    result
        .state
        .as_deref()
        .and_then(|s| gazetteer::state_match(&gazetteer::normalize(s)))
        .or_else(|| gazetteer::state_match(&gazetteer::normalize(&result.name)))
}

/// The state key recorded when the query itself matched the state tier.
fn table_state(m: &GazetteerMatch, source: DetectionSource) -> Option<String> {
    match source {
        DetectionSource::StateMapping => Some(m.key.to_string()),
        _ => None,
    }
}

fn located(query: &str, result: GeocodeResult, fallback_state: Option<String>) -> DetectedLocation {
    let coordinates = Some(result.coordinates());
    DetectedLocation {
        query: query.to_string(),
        name: Some(result.name),
        state: result.state.or(fallback_state),
        country: result.country,
        coordinates,
    }
}
