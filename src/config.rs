use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Content
    pub content_dir: String,

    // Geolocation providers
    pub geo_primary_url: String,
    pub geo_fallback_url: String,
    pub geo_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            port: match std::env::var("PORT") {
                Ok(value) => value.parse().context("PORT must be a number")?,
                Err(_) => 8080,
            },

            // Content
            content_dir: std::env::var("CONTENT_DIR")
                .unwrap_or_else(|_| "content".to_string()),

            // Geolocation (primary + single fallback, advisory only)
            geo_primary_url: std::env::var("GEO_PRIMARY_URL")
                .unwrap_or_else(|_| "https://ipapi.co/json/".to_string()),
            geo_fallback_url: std::env::var("GEO_FALLBACK_URL")
                .unwrap_or_else(|_| "https://api.country.is/".to_string()),
            geo_timeout_secs: std::env::var("GEO_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(5),
        })
    }

    pub fn geo_timeout(&self) -> Duration {
        Duration::from_secs(self.geo_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "PORT",
            "CONTENT_DIR",
            "GEO_PRIMARY_URL",
            "GEO_FALLBACK_URL",
            "GEO_TIMEOUT_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.geo_primary_url, "https://ipapi.co/json/");
        assert_eq!(config.geo_fallback_url, "https://api.country.is/");
        assert_eq!(config.geo_timeout(), Duration::from_secs(5));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("PORT", "9000");
        std::env::set_var("CONTENT_DIR", "/srv/posts");
        std::env::set_var("GEO_TIMEOUT_SECS", "2");

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.content_dir, "/srv/posts");
        assert_eq!(config.geo_timeout_secs, 2);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_malformed_port() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");

        let result = Config::from_env();
        assert!(result.is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_malformed_timeout_falls_back() {
        clear_env();
        std::env::set_var("GEO_TIMEOUT_SECS", "soon");

        let config = Config::from_env().unwrap();
        assert_eq!(config.geo_timeout_secs, 5);

        clear_env();
    }
}
