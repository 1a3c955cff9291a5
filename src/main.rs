use clap::Parser;
use malaysia_transit_area::area::{service_area_list, AreaResolver, ResolverConfig};
use malaysia_transit_area::server;
use std::time::Duration;

/// Malaysia transit service-area detection.
///
/// Maps a place name, landmark or address to the transit service area that
/// covers it, with coordinates from the geocoding chain.
///
/// Examples:
///   transit-area Komtar
///   transit-area "Seremban 2" --offline
///   transit-area --list-areas
///   transit-area --serve --port 8080
#[derive(Parser)]
#[command(name = "transit-area", version, about, long_about = None)]
struct Cli {
    /// Place, landmark or address to resolve.
    #[arg(index = 1)]
    query: Option<String>,

    /// Print the service-area list as JSON and exit.
    #[arg(long)]
    list_areas: bool,

    /// Run the HTTP API instead of resolving a single query.
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, short = 'p', default_value_t = 8080)]
    port: u16,

    /// Transit middleware base URL (enables the Google-backed geocoder).
    #[arg(long, env = "MIDDLEWARE_URL")]
    middleware_url: Option<String>,

    /// API key sent to the middleware.
    #[arg(long, env = "MIDDLEWARE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Nominatim base URL.
    #[arg(long, env = "NOMINATIM_URL", default_value = "https://nominatim.openstreetmap.org")]
    nominatim_url: String,

    /// Timeout for the middleware geocoder, in seconds.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Timeout for the Nominatim fallback, in seconds.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    fallback_timeout_secs: u64,

    /// Offline mode: gazetteer only, no geocoding.
    #[arg(long)]
    offline: bool,
}

impl Cli {
    fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            middleware_url: self.middleware_url.clone(),
            api_key: self.api_key.clone(),
            nominatim_url: self.nominatim_url.clone(),
            primary_timeout: Duration::from_secs(self.timeout_secs),
            fallback_timeout: Duration::from_secs(self.fallback_timeout_secs),
            offline: self.offline,
            ..Default::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(if cli.serve { "malaysia_transit_area=info" } else { "malaysia_transit_area=warn" });

    if cli.list_areas {
        print_json(&service_area_list());
        return;
    }

    let resolver = AreaResolver::new(&cli.resolver_config());

    // ── Server mode ─────────────────────────────────────────────

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start runtime: {}", e);
            std::process::exit(1);
        });
        if let Err(e) = runtime.block_on(server::start(&cli.host, cli.port, resolver)) {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // ── Single query ────────────────────────────────────────────

    let Some(query) = cli.query.as_deref() else {
        eprintln!("Error: No location specified.");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  transit-area Komtar");
        eprintln!("  transit-area \"Bukit Bintang\" --middleware-url http://localhost:3000");
        eprintln!("  transit-area --list-areas");
        eprintln!("  transit-area --serve");
        std::process::exit(1);
    };

    match resolver.resolve(query) {
        Ok(detection) => {
            eprintln!("  {}", detection.display_line());
            print_json(&detection);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: Cannot serialize output: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(default_filter: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // RUST_LOG wins over the mode default.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        assert!(Cli::try_parse_from(["transit-area", "--timeout-secs", "0", "Komtar"]).is_err());
        assert!(Cli::try_parse_from(["transit-area", "--fallback-timeout-secs", "0", "Komtar"]).is_err());
    }

    #[test]
    fn test_timeouts_reach_config() {
        let cli = Cli::try_parse_from([
            "transit-area",
            "--timeout-secs",
            "3",
            "--fallback-timeout-secs",
            "1",
            "Komtar",
        ])
        .unwrap();
        let config = cli.resolver_config();
        assert_eq!(config.primary_timeout, Duration::from_secs(3));
        assert_eq!(config.fallback_timeout, Duration::from_secs(1));
    }
}
