//! Request locale resolution.
//!
//! Every inbound path goes through [`resolve_request`] before any content
//! lookup. The rules run in order and the first match wins, so each request
//! gets exactly one of pass-through or redirect:
//!
//! 1. alias prefix (`/br/...`) → permanent redirect to the canonical locale
//! 2. excluded system path → pass through, locale logic does not apply
//! 3. already locale-prefixed → pass through (the explicit URL wins)
//! 4. no locale prefix → redirect to the default-locale-prefixed path
//!
//! Preference and geolocation signals never influence these decisions; they
//! only inform which locale a bare link should point to at generation time
//! (the link-generation helpers next door). Server redirects stay
//! deterministic and cache-friendly.

use crate::locales::LocaleRegistry;

/// The single outcome of routing one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Serve the path as requested.
    PassThrough,
    /// Send the client elsewhere. `permanent` selects 301 over 307.
    Redirect { location: String, permanent: bool },
}

/// Decide what to do with a request path, preserving the query string on
/// redirects.
pub fn resolve_request(path: &str, query: Option<&str>) -> RouteDecision {
    let registry = LocaleRegistry::get();
    let path = normalized(path);
    let first = first_segment(&path);

    // Aliases are stable identities, canonicalized before anything else.
    if let Some(locale) = registry.alias_target(first) {
        let rest = &path[1 + first.len()..];
        let location = with_query(format!("/{}{}", locale.code(), rest), query);
        return RouteDecision::Redirect {
            location,
            permanent: true,
        };
    }

    if is_excluded_path(&path) {
        return RouteDecision::PassThrough;
    }

    if registry.is_supported(first) {
        return RouteDecision::PassThrough;
    }

    // No locale segment: prefix the default. Root maps to the bare default.
    let default = registry.default_locale();
    let suffix = if path == "/" { "" } else { path.as_str() };
    let location = with_query(format!("/{}{}", default.code(), suffix), query);
    RouteDecision::Redirect {
        location,
        permanent: false,
    }
}

/// System paths that bypass locale handling entirely: API and feed
/// namespaces, underscore-prefixed internals, well-known files, and anything
/// with a file extension in it.
pub fn is_excluded_path(path: &str) -> bool {
    let path = normalized(path);

    if path == "/api" || path.starts_with("/api/") || path.starts_with("/rss") {
        return true;
    }
    if path == "/robots.txt" || path == "/sitemap.xml" {
        return true;
    }

    path.trim_start_matches('/')
        .split('/')
        .any(|segment| segment.starts_with('_') || segment.contains('.'))
}

fn normalized(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

fn first_segment(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or("")
}

fn with_query(location: String, query: Option<&str>) -> String {
    match query {
        Some(query) if !query.is_empty() => format!("{}?{}", location, query),
        _ => location,
    }
}
