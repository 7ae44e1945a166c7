//! Locale type: validated, copyable locale representation.
//!
//! A `Locale` can only be constructed for codes present in the registry, so
//! every instance is known-good for the lifetime of the process. Ordering
//! follows catalog order (`en` first), not lexicographic order, so ordered
//! maps keyed by `Locale` iterate the way the site lists languages.

use std::cmp::Ordering;
use std::fmt;

use crate::locales::{LocaleConfig, LocaleRegistry};

/// A validated locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    /// Locale code backed by the registry (e.g., "en", "fil")
    code: &'static str,
}

impl Locale {
    pub const ENGLISH: Locale = Locale { code: "en" };
    pub const PORTUGUESE: Locale = Locale { code: "pt" };
    pub const SPANISH: Locale = Locale { code: "es" };
    pub const GERMAN: Locale = Locale { code: "de" };
    pub const FRENCH: Locale = Locale { code: "fr" };
    pub const ITALIAN: Locale = Locale { code: "it" };
    pub const FILIPINO: Locale = Locale { code: "fil" };

    /// Create a `Locale` from a code string.
    ///
    /// Only exact supported codes succeed; aliases are resolved by
    /// [`LocaleRegistry::canonicalize`], not here.
    pub fn from_code(code: &str) -> Option<Locale> {
        LocaleRegistry::get()
            .get_by_code(code)
            .map(|config| Locale { code: config.code })
    }

    /// The default locale for unprefixed URLs.
    pub fn default_locale() -> Locale {
        LocaleRegistry::get().default_locale()
    }

    /// The locale code (e.g., "en", "pt").
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Full registry configuration for this locale.
    ///
    /// # Panics
    /// Panics if the code is not in the registry, which cannot happen for a
    /// properly constructed `Locale`.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("locale code should always be valid")
    }

    /// English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Native name of the language.
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Whether this is the default locale.
    pub fn is_default(&self) -> bool {
        self.config().is_default
    }

    fn position(&self) -> usize {
        LocaleRegistry::get()
            .position(self.code)
            .expect("locale code should always be valid")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl serde::Serialize for Locale {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

impl Ord for Locale {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position().cmp(&other.position())
    }
}

impl PartialOrd for Locale {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
