//! Core types for service-area detection.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

// ─── Service areas ──────────────────────────────────────────────

/// A transit service area. The set is closed: every area the gazetteer can
/// produce is listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceArea {
    KlangValley,
    Penang,
    Ipoh,
    Seremban,
    Melaka,
    Johor,
    Kuantan,
    KualaTerengganu,
    KotaBharu,
    AlorSetar,
    Kangar,
    Kuching,
}

impl ServiceArea {
    pub const ALL: [ServiceArea; 12] = [
        Self::KlangValley,
        Self::Penang,
        Self::Ipoh,
        Self::Seremban,
        Self::Melaka,
        Self::Johor,
        Self::Kuantan,
        Self::KualaTerengganu,
        Self::KotaBharu,
        Self::AlorSetar,
        Self::Kangar,
        Self::Kuching,
    ];

    /// The wire identifier (e.g. `klang-valley`).
    pub fn id(self) -> &'static str {
        match self {
            Self::KlangValley => "klang-valley",
            Self::Penang => "penang",
            Self::Ipoh => "ipoh",
            Self::Seremban => "seremban",
            Self::Melaka => "melaka",
            Self::Johor => "johor",
            Self::Kuantan => "kuantan",
            Self::KualaTerengganu => "kuala-terengganu",
            Self::KotaBharu => "kota-bharu",
            Self::AlorSetar => "alor-setar",
            Self::Kangar => "kangar",
            Self::Kuching => "kuching",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::KlangValley => "Klang Valley",
            Self::Penang => "Penang",
            Self::Ipoh => "Ipoh",
            Self::Seremban => "Seremban",
            Self::Melaka => "Melaka",
            Self::Johor => "Johor Bahru",
            Self::Kuantan => "Kuantan",
            Self::KualaTerengganu => "Kuala Terengganu",
            Self::KotaBharu => "Kota Bharu",
            Self::AlorSetar => "Alor Setar",
            Self::Kangar => "Kangar",
            Self::Kuching => "Kuching",
        }
    }

    /// States (or federal territories) served by this area.
    pub fn states(self) -> &'static [&'static str] {
        match self {
            Self::KlangValley => &["Kuala Lumpur", "Selangor", "Putrajaya"],
            Self::Penang => &["Penang"],
            Self::Ipoh => &["Perak"],
            Self::Seremban => &["Negeri Sembilan"],
            Self::Melaka => &["Melaka"],
            Self::Johor => &["Johor"],
            Self::Kuantan => &["Pahang"],
            Self::KualaTerengganu => &["Terengganu"],
            Self::KotaBharu => &["Kelantan"],
            Self::AlorSetar => &["Kedah"],
            Self::Kangar => &["Perlis"],
            Self::Kuching => &["Sarawak"],
        }
    }

    /// Parse a wire identifier. Case-insensitive.
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim().to_lowercase();
        Self::ALL.into_iter().find(|a| a.id() == id)
    }
}

impl fmt::Display for ServiceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A service-area entry for the public area list API.
#[derive(Debug, Clone, Serialize)]
pub struct AreaInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub states: &'static [&'static str],
}

impl From<ServiceArea> for AreaInfo {
    fn from(area: ServiceArea) -> Self {
        Self {
            id: area.id(),
            name: area.display_name(),
            states: area.states(),
        }
    }
}

/// Return the full service-area list (for prompts and the API).
pub fn service_area_list() -> Vec<AreaInfo> {
    ServiceArea::ALL.into_iter().map(AreaInfo::from).collect()
}

// ─── Detection result ───────────────────────────────────────────

/// How reliable a detection is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Which step produced the area label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// A landmark or terminal key found in the query.
    DirectMatch,
    /// A state or town key found in the query.
    StateMapping,
    /// A state key found in the geocoder's answer.
    Geocoding,
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectMatch => write!(f, "direct_match"),
            Self::StateMapping => write!(f, "state_mapping"),
            Self::Geocoding => write!(f, "geocoding"),
        }
    }
}

/// Which geocoding backend answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Transit middleware, backed by Google Maps.
    Middleware,
    /// OpenStreetMap Nominatim.
    Nominatim,
}

impl ProviderKind {
    /// Confidence of an area derived purely from this provider's address text.
    pub fn address_confidence(self) -> Confidence {
        match self {
            Self::Middleware => Confidence::High,
            Self::Nominatim => Confidence::Medium,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Middleware => write!(f, "Middleware"),
            Self::Nominatim => write!(f, "Nominatim"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A single geocoder answer.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    /// Place name or formatted address.
    pub name: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl GeocodeResult {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates { lat: self.lat, lon: self.lon }
    }
}

/// Where the detection points to on the map.
#[derive(Debug, Clone, Serialize)]
pub struct DetectedLocation {
    /// The query as given by the caller (trimmed).
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// `None` when no geocoder answered; use the text query instead.
    pub coordinates: Option<Coordinates>,
}

/// Outcome of a successful area detection.
#[derive(Debug, Clone, Serialize)]
pub struct AreaDetection {
    #[serde(serialize_with = "serialize_area")]
    pub area: Option<ServiceArea>,
    pub confidence: Confidence,
    pub location: DetectedLocation,
    pub source: DetectionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
}

fn serialize_area<S: Serializer>(area: &Option<ServiceArea>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(area.map(ServiceArea::id).unwrap_or("unknown"))
}

impl AreaDetection {
    /// The area identifier, or `"unknown"`.
    pub fn area_id(&self) -> &'static str {
        self.area.map(ServiceArea::id).unwrap_or("unknown")
    }

    pub fn display_line(&self) -> String {
        let area = match self.area {
            Some(a) => format!("{} ({})", a.display_name(), a.id()),
            None => "unknown area".to_string(),
        };
        let coords = match self.location.coordinates {
            Some(c) => format_coords(c.lat, c.lon),
            None => "no coordinates".to_string(),
        };
        let provider = match self.provider {
            Some(p) => format!(", via {}", p),
            None => String::new(),
        };
        format!(
            "\u{1F68C} {}\n  \u{1F4CD} {}\n  \u{1F4D0} {}\n  confidence {} ({}{})",
            area,
            self.location.name.as_deref().unwrap_or(&self.location.query),
            coords,
            self.confidence,
            self.source,
            provider,
        )
    }
}

/// Format coordinates as human-readable (e.g. "3.1390°N, 101.6869°E").
pub fn format_coords(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", lat.abs(), ns, lon.abs(), ew)
}

// ─── Errors ─────────────────────────────────────────────────────

/// A single geocoding provider failed. The resolver recovers from all of these.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned HTTP {code}")]
    Status { code: u16 },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("no result for '{0}'")]
    NotFound(String),
}

/// Area detection errors surfaced to the caller.
#[derive(Debug, Error)]
pub enum AreaError {
    #[error("No location specified")]
    NoInput,

    /// Every gazetteer tier and every provider came up empty. The caller should
    /// ask the user to pick one of `areas`.
    #[error("Could not detect a service area for '{}'. Available areas: {}", .query, area_ids(.areas))]
    NotDetermined {
        query: String,
        areas: Vec<ServiceArea>,
    },
}

fn area_ids(areas: &[ServiceArea]) -> String {
    areas.iter().map(|a| a.id()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_ids_are_kebab_case() {
        for area in ServiceArea::ALL {
            let json = serde_json::to_value(area).unwrap();
            assert_eq!(json, serde_json::Value::String(area.id().to_string()));
        }
    }

    #[test]
    fn test_from_id() {
        assert_eq!(ServiceArea::from_id("Klang-Valley"), Some(ServiceArea::KlangValley));
        assert_eq!(ServiceArea::from_id(" kota-bharu "), Some(ServiceArea::KotaBharu));
        assert_eq!(ServiceArea::from_id("singapore"), None);
    }

    #[test]
    fn test_unknown_area_serializes_as_string() {
        let detection = AreaDetection {
            area: None,
            confidence: Confidence::Low,
            location: DetectedLocation {
                query: "somewhere".into(),
                name: None,
                state: None,
                country: None,
                coordinates: Some(Coordinates { lat: 1.5, lon: 110.3 }),
            },
            source: DetectionSource::Geocoding,
            provider: Some(ProviderKind::Nominatim),
        };
        let json = serde_json::to_value(&detection).unwrap();
        assert_eq!(json["area"], "unknown");
        assert_eq!(json["confidence"], "low");
        assert_eq!(json["source"], "geocoding");
        assert_eq!(json["provider"], "nominatim");
        assert_eq!(json["location"]["coordinates"]["lat"], 1.5);
    }

    #[test]
    fn test_missing_coordinates_serialize_as_null() {
        let detection = AreaDetection {
            area: Some(ServiceArea::Penang),
            confidence: Confidence::Medium,
            location: DetectedLocation {
                query: "komtar".into(),
                name: None,
                state: None,
                country: None,
                coordinates: None,
            },
            source: DetectionSource::DirectMatch,
            provider: None,
        };
        let json = serde_json::to_value(&detection).unwrap();
        assert_eq!(json["area"], "penang");
        assert_eq!(json["source"], "direct_match");
        assert!(json["location"]["coordinates"].is_null());
        assert!(json.get("provider").is_none());
    }

    #[test]
    fn test_not_determined_lists_areas() {
        let err = AreaError::NotDetermined {
            query: "xyz".into(),
            areas: vec![ServiceArea::Penang, ServiceArea::Ipoh],
        };
        assert_eq!(
            err.to_string(),
            "Could not detect a service area for 'xyz'. Available areas: penang, ipoh"
        );
    }

    #[test]
    fn test_address_confidence() {
        assert_eq!(ProviderKind::Middleware.address_confidence(), Confidence::High);
        assert_eq!(ProviderKind::Nominatim.address_confidence(), Confidence::Medium);
    }

    #[test]
    fn test_format_coords() {
        assert_eq!(format_coords(3.139, 101.6869), "3.1390\u{00B0}N, 101.6869\u{00B0}E");
        assert_eq!(format_coords(-6.2088, -74.006), "6.2088\u{00B0}S, 74.0060\u{00B0}W");
    }
}
