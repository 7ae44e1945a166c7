//! HTTP surface: wires the locale resolver and post resolution into axum.
//!
//! The locale middleware runs on every request and either passes through or
//! answers with the redirect the resolver decided. Handlers under `/api/`
//! are reached untouched because the resolver excludes that namespace.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::content::{ContentStore, PostResolver, Resolution, TranslationGraph};
use crate::locales::{CookiePreferenceStore, GeoClient, Locale, LocaleRegistry, PreferenceStore};
use crate::routing::{self, RouteDecision};

/// Shared read-only state: config, the indexed corpus, its translation
/// graph, and the geolocation client.
pub struct AppState {
    pub config: Config,
    pub store: ContentStore,
    pub graph: TranslationGraph,
    pub geo: GeoClient,
}

/// Build the router with the locale middleware applied to every route.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/:lang", get(locale_home))
        .route("/:lang/posts", get(list_posts))
        .route("/:lang/posts/:slug", get(show_post))
        .route("/api/language", post(switch_language).delete(reset_language))
        .route("/api/detect", get(detect_language))
        .fallback(fallback)
        .layer(middleware::from_fn(locale_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Apply the request locale rules before routing.
async fn locale_middleware(request: Request, next: Next) -> Response {
    let decision = routing::resolve_request(request.uri().path(), request.uri().query());
    match decision {
        RouteDecision::PassThrough => next.run(request).await,
        RouteDecision::Redirect {
            location,
            permanent,
        } => redirect_response(&location, permanent),
    }
}

fn redirect_response(location: &str, permanent: bool) -> Response {
    let status = if permanent {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::TEMPORARY_REDIRECT
    };
    let mut response = status.into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

/// Attach any pending preference cookies to a response.
fn with_preference_cookies(mut response: Response, store: &CookiePreferenceStore) -> Response {
    for cookie in store.set_cookie_headers() {
        if let Ok(value) = HeaderValue::from_str(cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

fn cookie_store(headers: &HeaderMap) -> CookiePreferenceStore {
    let header = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());
    CookiePreferenceStore::from_cookie_header(header)
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "not found" })),
    )
        .into_response()
}

/// Unrouted paths that survived the locale middleware (excluded system
/// paths, pages this service does not serve) end here.
async fn fallback() -> Response {
    not_found()
}

// ==================== Content Routes ====================

#[derive(Debug, Serialize)]
struct PostSummary {
    slug: String,
    title: String,
    tags: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PostDetail {
    locale: Locale,
    slug: String,
    title: String,
    tags: Vec<String>,
    alternates: BTreeMap<Locale, String>,
    related: Vec<PostSummary>,
}

async fn locale_home(Path(lang): Path<String>) -> Response {
    match Locale::from_code(&lang) {
        Some(locale) => Json(serde_json::json!({
            "locale": locale.code(),
            "name": locale.native_name(),
        }))
        .into_response(),
        None => not_found(),
    }
}

async fn list_posts(State(state): State<Arc<AppState>>, Path(lang): Path<String>) -> Response {
    let Some(locale) = Locale::from_code(&lang) else {
        return not_found();
    };

    let posts: Vec<PostSummary> = state
        .store
        .posts_in(locale)
        .map(|post| PostSummary {
            slug: post.slug.clone(),
            title: post.title.clone(),
            tags: post.tags.clone(),
        })
        .collect();

    Json(posts).into_response()
}

async fn show_post(
    State(state): State<Arc<AppState>>,
    Path((lang, slug)): Path<(String, String)>,
) -> Response {
    let Some(locale) = Locale::from_code(&lang) else {
        return not_found();
    };

    let resolver = PostResolver::new(&state.store, &state.graph);
    match resolver.resolve(locale, &slug) {
        Resolution::Found(found) => {
            let related = state
                .store
                .related_posts(locale, &found.slug, 2)
                .into_iter()
                .map(|related| PostSummary {
                    slug: related.slug.clone(),
                    title: related.title.clone(),
                    tags: related.tags.clone(),
                })
                .collect();

            Json(PostDetail {
                locale,
                slug: found.slug.clone(),
                title: found.title.clone(),
                tags: found.tags.clone(),
                alternates: routing::alternate_urls(&state.graph, locale, &found.slug),
                related,
            })
            .into_response()
        }
        Resolution::Redirect { locale, slug } => {
            redirect_response(&routing::post_path(locale, &slug), false)
        }
        Resolution::NotFound => not_found(),
    }
}

// ==================== Preference Routes ====================

#[derive(Debug, Deserialize)]
struct SwitchRequest {
    locale: String,
    #[serde(default)]
    path: String,
}

#[derive(Debug, Serialize)]
struct SwitchResponse {
    locale: Locale,
    redirect_to: String,
}

/// Record a manual language choice and answer with the equivalent path in
/// the chosen language.
async fn switch_language(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SwitchRequest>,
) -> Response {
    let Some(locale) = LocaleRegistry::get().canonicalize(&body.locale) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "unsupported locale" })),
        )
            .into_response();
    };

    let mut prefs = cookie_store(&headers);
    prefs.write_manual(locale);

    let path = if body.path.is_empty() { "/" } else { &body.path };
    let redirect_to = routing::switch_language_path(&state.graph, path, locale);

    info!("Language switched to '{}'", locale);
    let response = Json(SwitchResponse {
        locale,
        redirect_to,
    })
    .into_response();
    with_preference_cookies(response, &prefs)
}

/// Reset to auto-detect: clear both preference cookies.
async fn reset_language(headers: HeaderMap) -> Response {
    let mut prefs = cookie_store(&headers);
    prefs.clear();

    let response = Json(serde_json::json!({ "redirect_to": "/" })).into_response();
    with_preference_cookies(response, &prefs)
}

#[derive(Debug, Serialize)]
struct DetectResponse {
    detected: Option<Locale>,
}

/// Deferred geolocation detection.
///
/// Skipped entirely while a manual choice or a live prior detection exists;
/// otherwise asks the providers and records the result. Failures are no
/// signal, never an error.
async fn detect_language(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let mut prefs = cookie_store(&headers);
    if prefs.read().suppresses_detection(Utc::now()) {
        return Json(DetectResponse { detected: None }).into_response();
    }

    let detected = state.geo.detect_locale().await;
    if let Some(locale) = detected {
        prefs.write_auto_detected(locale);
        info!("Auto-detected language '{}'", locale);
    }

    let response = Json(DetectResponse { detected }).into_response();
    with_preference_cookies(response, &prefs)
}
