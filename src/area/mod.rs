//! Service-area detection for Malaysian public transit.
//!
//! Maps free-text locations to a transit service area using a built-in
//! two-tier gazetteer, and geocodes them through an ordered provider chain
//! (transit middleware first, OpenStreetMap Nominatim as fallback).

pub mod config;
pub mod gazetteer;
pub mod providers;
pub mod resolver;
pub mod types;

pub use config::ResolverConfig;
pub use providers::{GeocodingProvider, MiddlewareGeocoder, NominatimGeocoder};
pub use resolver::AreaResolver;
pub use types::{
    format_coords, service_area_list, AreaDetection, AreaError, AreaInfo, Confidence, Coordinates,
    DetectedLocation, DetectionSource, GeocodeResult, ProviderError, ProviderKind, ServiceArea,
};
