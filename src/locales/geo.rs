//! Geolocation-based locale detection.
//!
//! Two halves: a pure country-code-to-locale table, and an HTTP client that
//! asks a primary and a single fallback provider for the reader's country.
//! Detection is advisory only. Every failure path collapses to "no signal";
//! nothing here ever surfaces an error to the reader.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::locales::Locale;

/// Country code to locale table.
///
/// Exact-match on normalized uppercase ISO codes; countries not listed give
/// no signal rather than a wrong guess.
const COUNTRY_LOCALES: &[(&str, &str)] = &[
    // Portuguese
    ("BR", "pt"),
    ("PT", "pt"),
    ("AO", "pt"),
    ("MZ", "pt"),
    // Spanish
    ("ES", "es"),
    ("MX", "es"),
    ("AR", "es"),
    ("CO", "es"),
    ("PE", "es"),
    ("VE", "es"),
    ("CL", "es"),
    ("EC", "es"),
    ("BO", "es"),
    ("PY", "es"),
    ("UY", "es"),
    ("CR", "es"),
    ("PA", "es"),
    ("SV", "es"),
    ("HN", "es"),
    ("NI", "es"),
    ("GT", "es"),
    ("CU", "es"),
    ("DO", "es"),
    // French
    ("FR", "fr"),
    ("CA", "fr"),
    ("BE", "fr"),
    ("CH", "fr"),
    ("SN", "fr"),
    ("CI", "fr"),
    // German
    ("DE", "de"),
    ("AT", "de"),
    // Italian
    ("IT", "it"),
    ("SM", "it"),
    ("VA", "it"),
    // Filipino
    ("PH", "fil"),
    // English
    ("US", "en"),
    ("GB", "en"),
    ("AU", "en"),
    ("NZ", "en"),
    ("IE", "en"),
    ("ZA", "en"),
    ("IN", "en"),
    ("SG", "en"),
    ("MY", "en"),
];

/// Map a country code to a preferred locale.
///
/// Codes are trimmed and uppercased before lookup, so `"br"` and `" BR "`
/// both resolve. Unknown codes return `None` ("no signal").
pub fn locale_for_country(country: &str) -> Option<Locale> {
    let normalized = country.trim().to_ascii_uppercase();
    COUNTRY_LOCALES
        .iter()
        .find(|(code, _)| *code == normalized)
        .and_then(|(_, locale)| Locale::from_code(locale))
}

/// Payload of the primary provider (ipapi.co style).
#[derive(Debug, Deserialize)]
struct PrimaryResponse {
    country_code: Option<String>,
}

/// Payload of the fallback provider (country.is style).
#[derive(Debug, Deserialize)]
struct FallbackResponse {
    country: Option<String>,
}

/// HTTP client for the geolocation providers.
///
/// Tries the primary once, then the fallback once, each with a short timeout.
/// Both failing yields `None`.
#[derive(Debug, Clone)]
pub struct GeoClient {
    primary_url: String,
    fallback_url: String,
    timeout: Duration,
}

impl GeoClient {
    pub fn new(primary_url: String, fallback_url: String, timeout: Duration) -> Self {
        Self {
            primary_url,
            fallback_url,
            timeout,
        }
    }

    /// Detect the reader's locale from their country, or `None` on any failure.
    pub async fn detect_locale(&self) -> Option<Locale> {
        self.detect_country().await.and_then(|country| {
            let locale = locale_for_country(&country);
            if locale.is_none() {
                debug!("No locale mapping for country '{}'", country);
            }
            locale
        })
    }

    /// Detect the reader's country code, or `None` on any failure.
    pub async fn detect_country(&self) -> Option<String> {
        let client = match reqwest::Client::builder().timeout(self.timeout).build() {
            Ok(client) => client,
            Err(e) => {
                warn!("Failed to build geolocation HTTP client: {}", e);
                return None;
            }
        };

        match self.query_primary(&client).await {
            Some(country) => {
                debug!("Primary geolocation provider returned '{}'", country);
                return Some(country);
            }
            None => {
                debug!("Primary geolocation provider gave no country, trying fallback");
            }
        }

        match self.query_fallback(&client).await {
            Some(country) => {
                debug!("Fallback geolocation provider returned '{}'", country);
                Some(country)
            }
            None => {
                // Advisory signal only: the reader keeps their current locale.
                warn!("Country detection failed on both providers, no signal");
                None
            }
        }
    }

    async fn query_primary(&self, client: &reqwest::Client) -> Option<String> {
        let response = client.get(&self.primary_url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body: PrimaryResponse = response.json().await.ok()?;
        body.country_code.filter(|code| !code.is_empty())
    }

    async fn query_fallback(&self, client: &reqwest::Client) -> Option<String> {
        let response = client.get(&self.fallback_url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body: FallbackResponse = response.json().await.ok()?;
        body.country.filter(|code| !code.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(primary: &str, fallback: &str) -> GeoClient {
        GeoClient::new(
            primary.to_string(),
            fallback.to_string(),
            Duration::from_secs(2),
        )
    }

    // ==================== locale_for_country Tests ====================

    #[test]
    fn test_brazil_maps_to_portuguese() {
        assert_eq!(locale_for_country("BR"), Some(Locale::PORTUGUESE));
    }

    #[test]
    fn test_unknown_country_gives_no_signal() {
        assert_eq!(locale_for_country("ZZ"), None);
        assert_eq!(locale_for_country(""), None);
    }

    #[test]
    fn test_lookup_normalizes_case_and_whitespace() {
        assert_eq!(locale_for_country("br"), Some(Locale::PORTUGUESE));
        assert_eq!(locale_for_country(" de "), Some(Locale::GERMAN));
    }

    #[test]
    fn test_representative_mappings() {
        assert_eq!(locale_for_country("PH"), Some(Locale::FILIPINO));
        assert_eq!(locale_for_country("MX"), Some(Locale::SPANISH));
        assert_eq!(locale_for_country("CA"), Some(Locale::FRENCH));
        assert_eq!(locale_for_country("AT"), Some(Locale::GERMAN));
        assert_eq!(locale_for_country("VA"), Some(Locale::ITALIAN));
        assert_eq!(locale_for_country("GB"), Some(Locale::ENGLISH));
    }

    #[test]
    fn test_every_table_entry_targets_a_supported_locale() {
        for (country, locale) in COUNTRY_LOCALES {
            assert!(
                Locale::from_code(locale).is_some(),
                "table maps {} to unsupported locale {}",
                country,
                locale
            );
        }
    }

    // ==================== Provider Client Tests ====================

    #[tokio::test]
    async fn test_detect_uses_primary_provider() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"country_code": "BR"}"#),
            )
            .mount(&server)
            .await;

        let client = test_client(
            &format!("{}/json/", server.uri()),
            "http://localhost:1/unused",
        );

        assert_eq!(client.detect_locale().await, Some(Locale::PORTUGUESE));
    }

    #[tokio::test]
    async fn test_detect_falls_back_when_primary_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/fallback"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"country": "DE"}"#))
            .mount(&server)
            .await;

        let client = test_client(
            &format!("{}/json/", server.uri()),
            &format!("{}/fallback", server.uri()),
        );

        assert_eq!(client.detect_locale().await, Some(Locale::GERMAN));
    }

    #[tokio::test]
    async fn test_detect_falls_back_when_primary_returns_garbage() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<!DOCTYPE html>"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/fallback"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"country": "PH"}"#))
            .mount(&server)
            .await;

        let client = test_client(
            &format!("{}/json/", server.uri()),
            &format!("{}/fallback", server.uri()),
        );

        assert_eq!(client.detect_locale().await, Some(Locale::FILIPINO));
    }

    #[tokio::test]
    async fn test_detect_no_signal_when_both_providers_fail() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = test_client(
            &format!("{}/json/", server.uri()),
            &format!("{}/fallback", server.uri()),
        );

        assert_eq!(client.detect_locale().await, None);
    }

    #[tokio::test]
    async fn test_detect_no_signal_when_providers_unreachable() {
        let client = test_client("http://localhost:1/json/", "http://localhost:1/fallback");
        assert_eq!(client.detect_locale().await, None);
    }

    #[tokio::test]
    async fn test_detect_no_signal_for_unmapped_country() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"country_code": "ZZ"}"#),
            )
            .mount(&server)
            .await;

        let client = test_client(
            &format!("{}/json/", server.uri()),
            "http://localhost:1/unused",
        );

        assert_eq!(client.detect_locale().await, None);
    }

    #[tokio::test]
    async fn test_detect_times_out_slow_primary_and_uses_fallback() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"country_code": "BR"}"#)
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/fallback"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"country": "IT"}"#))
            .mount(&server)
            .await;

        let client = GeoClient::new(
            format!("{}/json/", server.uri()),
            format!("{}/fallback", server.uri()),
            Duration::from_millis(200),
        );

        assert_eq!(client.detect_locale().await, Some(Locale::ITALIAN));
    }

    #[tokio::test]
    async fn test_detect_ignores_empty_country_field() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"country_code": ""}"#),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/fallback"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"country": "FR"}"#))
            .mount(&server)
            .await;

        let client = test_client(
            &format!("{}/json/", server.uri()),
            &format!("{}/fallback", server.uri()),
        );

        assert_eq!(client.detect_locale().await, Some(Locale::FRENCH));
    }
}
