//! Persisted locale preference.
//!
//! A reader's preference is a tri-state record: unset, a manual choice made
//! through the language switcher, or an auto-detected locale from
//! geolocation. Manual choices suppress detection entirely until cleared; an
//! auto-detected record only suppresses repeat detection and can still be
//! overridden manually.
//!
//! The store trait is the seam between the routing core and whatever carries
//! the preference on the wire. Two implementations live here: an in-memory
//! store used by tests and link generation, and a cookie codec for the HTTP
//! surface (two independently named cookies, so clearing the manual choice
//! re-enables detection without touching the detection record).

use chrono::{DateTime, Duration, Utc};

use crate::locales::Locale;

/// Cookie carrying a manual language choice. Valid for one year.
pub const MANUAL_COOKIE: &str = "preferred-language";

/// Cookie carrying an auto-detected language. Valid for 30 days.
pub const AUTO_COOKIE: &str = "auto-detected-language";

/// Manual choices persist for a year.
pub fn manual_ttl() -> Duration {
    Duration::days(365)
}

/// Auto-detected choices persist for 30 days, then detection may run again.
pub fn auto_ttl() -> Duration {
    Duration::days(30)
}

/// A reader's persisted locale preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    /// No preference recorded; detection may run.
    Unset,
    /// Explicit choice via the language switcher.
    Manual(Locale),
    /// Result of a past geolocation lookup.
    AutoDetected {
        locale: Locale,
        expires_at: DateTime<Utc>,
    },
}

impl Default for Preference {
    fn default() -> Self {
        Preference::Unset
    }
}

impl Preference {
    /// The locale this preference contributes to link generation, if any.
    ///
    /// Manual choices always apply; auto-detected ones only while unexpired.
    pub fn effective_locale(&self, now: DateTime<Utc>) -> Option<Locale> {
        match self {
            Preference::Unset => None,
            Preference::Manual(locale) => Some(*locale),
            Preference::AutoDetected { locale, expires_at } => {
                (now < *expires_at).then_some(*locale)
            }
        }
    }

    /// Whether a new detection attempt should be skipped.
    ///
    /// Manual choices suppress detection until cleared; auto-detected ones
    /// suppress repeats only while unexpired.
    pub fn suppresses_detection(&self, now: DateTime<Utc>) -> bool {
        match self {
            Preference::Unset => false,
            Preference::Manual(_) => true,
            Preference::AutoDetected { expires_at, .. } => now < *expires_at,
        }
    }
}

/// Storage contract for the persisted preference.
pub trait PreferenceStore {
    fn read(&self) -> Preference;

    /// Record an explicit language choice. Replaces any prior state.
    fn write_manual(&mut self, locale: Locale);

    /// Record a detection result.
    ///
    /// A manual choice always wins: this is a no-op while one is present.
    fn write_auto_detected(&mut self, locale: Locale);

    /// Reset to auto-detect: drop the manual choice and any detection record.
    fn clear(&mut self);
}

/// In-memory preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    preference: Preference,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn read(&self) -> Preference {
        self.preference
    }

    fn write_manual(&mut self, locale: Locale) {
        self.preference = Preference::Manual(locale);
    }

    fn write_auto_detected(&mut self, locale: Locale) {
        if matches!(self.preference, Preference::Manual(_)) {
            return;
        }
        self.preference = Preference::AutoDetected {
            locale,
            expires_at: Utc::now() + auto_ttl(),
        };
    }

    fn clear(&mut self) {
        self.preference = Preference::Unset;
    }
}

/// Cookie-backed preference store for the HTTP surface.
///
/// Reads the two preference cookies from a `Cookie` request header and
/// collects the `Set-Cookie` values a response must carry. Expiry of the
/// auto-detected record is delegated to the cookie's `Max-Age`: a cookie the
/// browser still sends is by definition live.
#[derive(Debug, Default)]
pub struct CookiePreferenceStore {
    manual: Option<Locale>,
    auto: Option<Locale>,
    pending: Vec<String>,
}

impl CookiePreferenceStore {
    /// Parse the preference cookies out of a `Cookie` header value.
    ///
    /// Malformed pairs and unsupported locale codes are ignored.
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        let mut manual = None;
        let mut auto = None;

        for pair in header.unwrap_or("").split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let (name, value) = (name.trim(), value.trim());
            match name {
                MANUAL_COOKIE => manual = Locale::from_code(value),
                AUTO_COOKIE => auto = Locale::from_code(value),
                _ => {}
            }
        }

        Self {
            manual,
            auto,
            pending: Vec::new(),
        }
    }

    /// The `Set-Cookie` header values accumulated by writes on this store.
    pub fn set_cookie_headers(&self) -> &[String] {
        &self.pending
    }

    fn set_cookie(name: &str, value: &str, max_age_secs: i64) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            name, value, max_age_secs
        )
    }

    fn expire_cookie(name: &str) -> String {
        format!("{}=; Path=/; Max-Age=0; SameSite=Lax", name)
    }
}

impl PreferenceStore for CookiePreferenceStore {
    fn read(&self) -> Preference {
        if let Some(locale) = self.manual {
            return Preference::Manual(locale);
        }
        if let Some(locale) = self.auto {
            // Still being sent by the browser, so within its Max-Age window.
            return Preference::AutoDetected {
                locale,
                expires_at: Utc::now() + auto_ttl(),
            };
        }
        Preference::Unset
    }

    fn write_manual(&mut self, locale: Locale) {
        self.manual = Some(locale);
        self.pending.push(Self::set_cookie(
            MANUAL_COOKIE,
            locale.code(),
            manual_ttl().num_seconds(),
        ));
    }

    fn write_auto_detected(&mut self, locale: Locale) {
        if self.manual.is_some() {
            return;
        }
        self.auto = Some(locale);
        self.pending.push(Self::set_cookie(
            AUTO_COOKIE,
            locale.code(),
            auto_ttl().num_seconds(),
        ));
    }

    fn clear(&mut self) {
        self.manual = None;
        self.auto = None;
        self.pending.push(Self::expire_cookie(MANUAL_COOKIE));
        self.pending.push(Self::expire_cookie(AUTO_COOKIE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Preference Semantics Tests ====================

    #[test]
    fn test_unset_contributes_nothing() {
        let now = Utc::now();
        assert_eq!(Preference::Unset.effective_locale(now), None);
        assert!(!Preference::Unset.suppresses_detection(now));
    }

    #[test]
    fn test_manual_always_applies() {
        let now = Utc::now();
        let pref = Preference::Manual(Locale::SPANISH);
        assert_eq!(pref.effective_locale(now), Some(Locale::SPANISH));
        assert!(pref.suppresses_detection(now));
    }

    #[test]
    fn test_auto_detected_applies_until_expiry() {
        let now = Utc::now();
        let live = Preference::AutoDetected {
            locale: Locale::PORTUGUESE,
            expires_at: now + Duration::days(10),
        };
        assert_eq!(live.effective_locale(now), Some(Locale::PORTUGUESE));
        assert!(live.suppresses_detection(now));
    }

    #[test]
    fn test_expired_auto_detected_reads_as_unset() {
        let now = Utc::now();
        let expired = Preference::AutoDetected {
            locale: Locale::PORTUGUESE,
            expires_at: now - Duration::seconds(1),
        };
        assert_eq!(expired.effective_locale(now), None);
        assert!(!expired.suppresses_detection(now));
    }

    // ==================== Memory Store Tests ====================

    #[test]
    fn test_memory_store_starts_unset() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.read(), Preference::Unset);
    }

    #[test]
    fn test_manual_write_survives_detection_attempts() {
        let mut store = MemoryPreferenceStore::new();
        store.write_manual(Locale::GERMAN);

        store.write_auto_detected(Locale::PORTUGUESE);
        store.write_auto_detected(Locale::SPANISH);
        store.write_auto_detected(Locale::FRENCH);

        assert_eq!(store.read(), Preference::Manual(Locale::GERMAN));
    }

    #[test]
    fn test_manual_overrides_auto_detected() {
        let mut store = MemoryPreferenceStore::new();
        store.write_auto_detected(Locale::PORTUGUESE);
        store.write_manual(Locale::ITALIAN);

        assert_eq!(store.read(), Preference::Manual(Locale::ITALIAN));
    }

    #[test]
    fn test_clear_reenables_detection() {
        let mut store = MemoryPreferenceStore::new();
        store.write_manual(Locale::GERMAN);
        store.clear();

        assert_eq!(store.read(), Preference::Unset);

        store.write_auto_detected(Locale::PORTUGUESE);
        match store.read() {
            Preference::AutoDetected { locale, .. } => {
                assert_eq!(locale, Locale::PORTUGUESE)
            }
            other => panic!("expected auto-detected, got {:?}", other),
        }
    }

    #[test]
    fn test_auto_detected_write_sets_thirty_day_expiry() {
        let mut store = MemoryPreferenceStore::new();
        let before = Utc::now();
        store.write_auto_detected(Locale::FRENCH);

        match store.read() {
            Preference::AutoDetected { expires_at, .. } => {
                assert!(expires_at >= before + Duration::days(30) - Duration::seconds(5));
                assert!(expires_at <= Utc::now() + Duration::days(30) + Duration::seconds(5));
            }
            other => panic!("expected auto-detected, got {:?}", other),
        }
    }

    // ==================== Cookie Store Tests ====================

    #[test]
    fn test_cookie_parse_manual() {
        let store =
            CookiePreferenceStore::from_cookie_header(Some("preferred-language=pt; theme=dark"));
        assert_eq!(store.read(), Preference::Manual(Locale::PORTUGUESE));
    }

    #[test]
    fn test_cookie_parse_auto_detected() {
        let store =
            CookiePreferenceStore::from_cookie_header(Some("auto-detected-language=es"));
        match store.read() {
            Preference::AutoDetected { locale, .. } => assert_eq!(locale, Locale::SPANISH),
            other => panic!("expected auto-detected, got {:?}", other),
        }
    }

    #[test]
    fn test_cookie_manual_wins_over_auto() {
        let store = CookiePreferenceStore::from_cookie_header(Some(
            "auto-detected-language=es; preferred-language=de",
        ));
        assert_eq!(store.read(), Preference::Manual(Locale::GERMAN));
    }

    #[test]
    fn test_cookie_parse_ignores_invalid_locale() {
        let store = CookiePreferenceStore::from_cookie_header(Some("preferred-language=zz"));
        assert_eq!(store.read(), Preference::Unset);
    }

    #[test]
    fn test_cookie_parse_no_header() {
        let store = CookiePreferenceStore::from_cookie_header(None);
        assert_eq!(store.read(), Preference::Unset);
    }

    #[test]
    fn test_cookie_write_manual_emits_year_long_cookie() {
        let mut store = CookiePreferenceStore::from_cookie_header(None);
        store.write_manual(Locale::FILIPINO);

        let headers = store.set_cookie_headers();
        assert_eq!(headers.len(), 1);
        assert!(headers[0].starts_with("preferred-language=fil;"));
        assert!(headers[0].contains("Max-Age=31536000"));
    }

    #[test]
    fn test_cookie_write_auto_emits_thirty_day_cookie() {
        let mut store = CookiePreferenceStore::from_cookie_header(None);
        store.write_auto_detected(Locale::PORTUGUESE);

        let headers = store.set_cookie_headers();
        assert_eq!(headers.len(), 1);
        assert!(headers[0].starts_with("auto-detected-language=pt;"));
        assert!(headers[0].contains("Max-Age=2592000"));
    }

    #[test]
    fn test_cookie_auto_write_is_noop_with_manual_present() {
        let mut store = CookiePreferenceStore::from_cookie_header(Some("preferred-language=it"));
        store.write_auto_detected(Locale::PORTUGUESE);

        assert!(store.set_cookie_headers().is_empty());
        assert_eq!(store.read(), Preference::Manual(Locale::ITALIAN));
    }

    #[test]
    fn test_cookie_clear_expires_both_cookies() {
        let mut store = CookiePreferenceStore::from_cookie_header(Some(
            "preferred-language=pt; auto-detected-language=es",
        ));
        store.clear();

        assert_eq!(store.read(), Preference::Unset);
        let headers = store.set_cookie_headers();
        assert_eq!(headers.len(), 2);
        assert!(headers.iter().all(|h| h.contains("Max-Age=0")));
    }

    #[test]
    fn test_cookie_round_trip() {
        let mut store = CookiePreferenceStore::from_cookie_header(None);
        store.write_manual(Locale::SPANISH);

        // Simulate the browser sending back what we set.
        let header = store.set_cookie_headers()[0]
            .split(';')
            .next()
            .unwrap()
            .to_string();
        let reread = CookiePreferenceStore::from_cookie_header(Some(&header));
        assert_eq!(reread.read(), Preference::Manual(Locale::SPANISH));
    }
}
