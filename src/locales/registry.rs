//! Locale registry: single source of truth for supported locales and aliases.
//!
//! The registry holds the closed set of locale codes the site publishes in,
//! the default locale used for unprefixed URLs, and the alias table that maps
//! country-style path shorthands (`/br/...`) to canonical locales (`/pt/...`).
//! It uses a singleton pattern with `OnceLock` to ensure thread-safe
//! initialization and access.

use std::sync::OnceLock;

use thiserror::Error;

use crate::locales::Locale;

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 style locale code (e.g., "en", "pt", "fil")
    pub code: &'static str,

    /// English name of the language (e.g., "Portuguese")
    pub name: &'static str,

    /// Native name of the language (e.g., "Português")
    pub native_name: &'static str,

    /// Whether this is the default locale for unprefixed URLs (exactly one)
    pub is_default: bool,
}

/// Errors found while validating the catalog at startup.
///
/// These are configuration errors: the process must refuse to serve rather
/// than route requests against a broken locale table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no default locale is configured")]
    MissingDefault,

    #[error("multiple locales are marked as default: '{0}' and '{1}'")]
    MultipleDefaults(&'static str, &'static str),

    #[error("alias '{alias}' points to unsupported locale '{target}'")]
    UnknownAliasTarget {
        alias: &'static str,
        target: &'static str,
    },

    #[error("alias '{0}' shadows a supported locale code")]
    AliasShadowsLocale(&'static str),
}

/// Global locale registry.
///
/// Initialized once on first access and immutable thereafter.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    aliases: Vec<(&'static str, &'static str)>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: supported_locales(),
            aliases: locale_aliases(),
        })
    }

    /// Check whether a code is a supported locale (aliases do not count).
    pub fn is_supported(&self, code: &str) -> bool {
        self.locales.iter().any(|locale| locale.code == code)
    }

    /// Get a locale configuration by its canonical code.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Resolve a path segment to a canonical locale.
    ///
    /// Supported codes resolve to themselves (idempotent), aliases resolve to
    /// their target, anything else is `None`.
    pub fn canonicalize(&self, code: &str) -> Option<Locale> {
        if self.is_supported(code) {
            return Locale::from_code(code);
        }
        self.alias_target(code)
    }

    /// Resolve an alias segment to its canonical locale.
    ///
    /// Returns `None` for supported codes and unknown segments alike; callers
    /// that want both behaviors use [`canonicalize`](Self::canonicalize).
    pub fn alias_target(&self, segment: &str) -> Option<Locale> {
        self.aliases
            .iter()
            .find(|(alias, _)| *alias == segment)
            .and_then(|(_, target)| Locale::from_code(target))
    }

    /// The default locale for unprefixed URLs.
    ///
    /// # Panics
    /// Panics if the table has zero or multiple defaults.
    /// [`validate`](Self::validate) reports the same condition as a typed
    /// error and is called at startup before any routing happens.
    pub fn default_locale(&self) -> Locale {
        let defaults: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_default)
            .collect();

        match defaults.len() {
            1 => Locale::from_code(defaults[0].code)
                .expect("default locale is in the supported set"),
            0 => panic!("no default locale found in registry"),
            _ => panic!("multiple default locales found in registry"),
        }
    }

    /// All supported locales, in catalog order.
    pub fn list(&self) -> &[LocaleConfig] {
        &self.locales
    }

    /// Position of a code in catalog order, used for stable iteration and
    /// tie-breaking.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.locales.iter().position(|locale| locale.code == code)
    }

    /// Validate the catalog invariants.
    ///
    /// Checks that exactly one default exists, that every alias targets a
    /// supported locale, and that no alias shadows a real locale code.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut default: Option<&'static str> = None;
        for locale in &self.locales {
            if locale.is_default {
                match default {
                    None => default = Some(locale.code),
                    Some(first) => {
                        return Err(CatalogError::MultipleDefaults(first, locale.code))
                    }
                }
            }
        }
        if default.is_none() {
            return Err(CatalogError::MissingDefault);
        }

        for &(alias, target) in &self.aliases {
            if self.is_supported(alias) {
                return Err(CatalogError::AliasShadowsLocale(alias));
            }
            if !self.is_supported(target) {
                return Err(CatalogError::UnknownAliasTarget { alias, target });
            }
        }

        Ok(())
    }
}

/// The locales the site publishes in. English is the default.
fn supported_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_default: true,
        },
        LocaleConfig {
            code: "pt",
            name: "Portuguese",
            native_name: "Português",
            is_default: false,
        },
        LocaleConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            is_default: false,
        },
        LocaleConfig {
            code: "de",
            name: "German",
            native_name: "Deutsch",
            is_default: false,
        },
        LocaleConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            is_default: false,
        },
        LocaleConfig {
            code: "it",
            name: "Italian",
            native_name: "Italiano",
            is_default: false,
        },
        LocaleConfig {
            code: "fil",
            name: "Filipino",
            native_name: "Filipino",
            is_default: false,
        },
    ]
}

/// Country-style path shorthands. Each must target a supported locale.
fn locale_aliases() -> Vec<(&'static str, &'static str)> {
    vec![("br", "pt"), ("ph", "fil"), ("us", "en")]
}
