//! Locale subsystem: catalog, detection, and persisted preference.
//!
//! Everything the router knows about languages lives here:
//!
//! - `registry`: single source of truth for supported locales, aliases, and
//!   the default, with startup validation
//! - `locale`: validated `Locale` value type
//! - `geo`: country-to-locale mapping and the geolocation provider client
//! - `preference`: the persisted reader preference and its store contract

mod geo;
mod locale;
mod preference;
mod registry;

pub use geo::{locale_for_country, GeoClient};
pub use locale::Locale;
pub use preference::{
    CookiePreferenceStore, MemoryPreferenceStore, Preference, PreferenceStore, AUTO_COOKIE,
    MANUAL_COOKIE,
};
pub use registry::{CatalogError, LocaleConfig, LocaleRegistry};
