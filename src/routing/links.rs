//! Link generation.
//!
//! Personalization lives here, not in the request resolver: a stored
//! preference or geolocation signal decides which locale a bare link points
//! to before the link is ever followed, so concrete requests stay
//! deterministic. Also builds the per-post alternate-language URL map used
//! by canonical link tags and the language switcher.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::content::TranslationGraph;
use crate::locales::{Locale, Preference};

/// The locale bare links should target for this reader.
///
/// A manual choice always wins, a live auto-detected locale comes next, and
/// with no signal the default stands.
pub fn preferred_locale(preference: &Preference, now: DateTime<Utc>) -> Locale {
    preference
        .effective_locale(now)
        .unwrap_or_else(Locale::default_locale)
}

/// Prefix a locale onto a locale-less path. The root maps to the bare
/// locale prefix.
pub fn localized_path(locale: Locale, rest: &str) -> String {
    if rest.is_empty() || rest == "/" {
        format!("/{}", locale.code())
    } else if rest.starts_with('/') {
        format!("/{}{}", locale.code(), rest)
    } else {
        format!("/{}/{}", locale.code(), rest)
    }
}

/// Split a path into its locale prefix (if any) and the remainder.
pub fn strip_locale(path: &str) -> (Option<Locale>, String) {
    let trimmed = path.trim_start_matches('/');
    let (first, rest) = match trimmed.split_once('/') {
        Some((first, rest)) => (first, format!("/{}", rest)),
        None => (trimmed, String::from("/")),
    };

    match Locale::from_code(first) {
        Some(locale) => (Some(locale), rest),
        None => (None, normalized(path)),
    }
}

/// Canonical detail path for a post.
pub fn post_path(locale: Locale, slug: &str) -> String {
    format!("/{}/posts/{}", locale.code(), slug)
}

/// The same page in another language.
///
/// Post detail paths are mapped through the translation graph so the link
/// lands directly on the translated slug; when the graph has no mapping the
/// slug is kept as-is and request-time resolution repairs or 404s it. Other
/// paths just swap the locale prefix.
pub fn switch_language_path(graph: &TranslationGraph, path: &str, target: Locale) -> String {
    let (current, rest) = strip_locale(path);

    if let (Some(current), Some(slug)) = (current, rest.strip_prefix("/posts/")) {
        if !slug.is_empty() && !slug.contains('/') {
            let mapped = graph
                .identity_of(current, slug)
                .and_then(|id| graph.slugged_locales(id).get(&target).cloned());
            return post_path(target, mapped.as_deref().unwrap_or(slug));
        }
    }

    localized_path(target, &rest)
}

/// Per-locale URLs for all known versions of a post, in catalog locale
/// order. The requested version is always present, even for a post with no
/// translations at all.
pub fn alternate_urls(
    graph: &TranslationGraph,
    locale: Locale,
    slug: &str,
) -> BTreeMap<Locale, String> {
    let mut urls = BTreeMap::new();

    if let Some(id) = graph.identity_of(locale, slug) {
        for (other, other_slug) in graph.slugged_locales(id) {
            urls.insert(*other, post_path(*other, other_slug));
        }
    }
    urls.insert(locale, post_path(locale, slug));

    urls
}

fn normalized(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
