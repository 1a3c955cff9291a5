//! Resolver configuration, injected at construction time.

use super::providers::{GeocodingProvider, MiddlewareGeocoder, NominatimGeocoder, NOMINATIM_URL};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("MalaysiaTransitArea/", env!("CARGO_PKG_VERSION"), " (transit-area-resolver)");

/// Settings for the geocoding chain.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Transit middleware base URL. The Google-backed primary geocoder is only
    /// used when this is set.
    pub middleware_url: Option<String>,
    pub api_key: Option<String>,
    pub nominatim_url: String,
    pub user_agent: String,
    pub primary_timeout: Duration,
    pub fallback_timeout: Duration,
    /// Skip all network calls (gazetteer only).
    pub offline: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            middleware_url: None,
            api_key: None,
            nominatim_url: NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            primary_timeout: Duration::from_secs(10),
            fallback_timeout: Duration::from_secs(5),
            offline: false,
        }
    }
}

impl ResolverConfig {
    /// Build the ordered provider chain: middleware first (if configured), then Nominatim.
    pub fn build_providers(&self) -> Vec<Box<dyn GeocodingProvider>> {
        let mut providers: Vec<Box<dyn GeocodingProvider>> = Vec::new();
        if self.offline {
            return providers;
        }

        if let Some(url) = self.middleware_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            providers.push(Box::new(MiddlewareGeocoder::new(
                url,
                self.api_key.clone(),
                self.primary_timeout,
                &self.user_agent,
            )));
        }
        providers.push(Box::new(NominatimGeocoder::new(
            &self.nominatim_url,
            self.fallback_timeout,
            &self.user_agent,
        )));
        providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::types::ProviderKind;

    fn kinds(config: &ResolverConfig) -> Vec<ProviderKind> {
        config.build_providers().iter().map(|p| p.kind()).collect()
    }

    #[test]
    fn test_default_chain_is_nominatim_only() {
        assert_eq!(kinds(&ResolverConfig::default()), vec![ProviderKind::Nominatim]);
    }

    #[test]
    fn test_middleware_goes_first() {
        let config = ResolverConfig {
            middleware_url: Some("http://localhost:3000/".into()),
            ..Default::default()
        };
        assert_eq!(kinds(&config), vec![ProviderKind::Middleware, ProviderKind::Nominatim]);
    }

    #[test]
    fn test_blank_middleware_url_is_ignored() {
        let config = ResolverConfig {
            middleware_url: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(kinds(&config), vec![ProviderKind::Nominatim]);
    }

    #[test]
    fn test_offline_has_no_providers() {
        let config = ResolverConfig {
            middleware_url: Some("http://localhost:3000".into()),
            offline: true,
            ..Default::default()
        };
        assert!(config.build_providers().is_empty());
    }
}
