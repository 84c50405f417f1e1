//! Environment-driven server configuration.

use tripsync_travel_search::AmadeusConfig;

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,
    /// Path of the SQLite database file.
    pub db_path: String,
    /// Allowed CORS origin; "*" permits any.
    pub cors_origin: String,
    /// Travel-search provider credentials.
    pub amadeus: AmadeusConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let amadeus_env =
            std::env::var("AMADEUS_ENV").unwrap_or_else(|_| "test".to_string());
        Config {
            listen_addr: std::env::var("TS_LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            db_path: std::env::var("TS_DB_PATH")
                .unwrap_or_else(|_| "data/tripsync.db".to_string()),
            cors_origin: std::env::var("TS_CORS_ORIGIN").unwrap_or_else(|_| "*".to_string()),
            amadeus: AmadeusConfig {
                client_id: std::env::var("AMADEUS_CLIENT_ID").unwrap_or_default(),
                client_secret: std::env::var("AMADEUS_CLIENT_SECRET").unwrap_or_default(),
                environment: amadeus_env.to_lowercase(),
                base_url: std::env::var("AMADEUS_BASE_URL").ok(),
            },
        }
    }
}
