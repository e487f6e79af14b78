// src/config.rs
use std::env;
use std::time::Duration;

pub const NYC_INSPECTIONS_ENDPOINT: &str = "https://data.cityofnewyork.us/resource/43nn-pn8j.json";
pub const GOOGLE_PLACES_BASE: &str = "https://maps.googleapis.com/maps/api/place";

#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Socrata resource for DOHMH restaurant inspection results.
    pub endpoint: String,
    /// Sent as `$$app_token` on every feed query.
    pub app_token: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: NYC_INSPECTIONS_ENDPOINT.to_string(),
            app_token: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// Base URL; endpoint paths such as `/details/json` are appended.
    pub base_url: String,
    pub api_key: String,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: GOOGLE_PLACES_BASE.to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub db_path: String,
    /// Per-request timeout; a timed out stage counts as zero rows.
    pub http_timeout: Duration,
    pub workers: usize,
    pub feed: FeedConfig,
    pub places: PlacesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            db_path: "rat.sqlite3".to_string(),
            http_timeout: Duration::from_secs(20),
            workers: 8,
            feed: FeedConfig::default(),
            places: PlacesConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by whichever environment variables are set.
    /// Malformed numbers fall back to the default rather than aborting startup.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let http_timeout = env::var("RAT_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        let workers = env::var("RAT_WORKERS")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.workers);

        Self {
            bind_addr: env::var("RAT_BIND_ADDR").unwrap_or(defaults.bind_addr),
            db_path: env::var("RAT_DB_PATH").unwrap_or(defaults.db_path),
            http_timeout,
            workers,
            feed: FeedConfig {
                app_token: env::var("NYC_APP_TOKEN").unwrap_or_default(),
                ..defaults.feed
            },
            places: PlacesConfig {
                api_key: env::var("GOOGLE_API_KEY").unwrap_or_default(),
                ..defaults.places
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_endpoints() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.feed.endpoint, NYC_INSPECTIONS_ENDPOINT);
        assert_eq!(cfg.places.base_url, GOOGLE_PLACES_BASE);
        assert_eq!(cfg.http_timeout, Duration::from_secs(20));
        assert!(cfg.feed.app_token.is_empty());
    }
}
