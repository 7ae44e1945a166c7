//! Routing subsystem.
//!
//! - `resolver`: the per-request locale decision (alias redirect, excluded
//!   pass-through, locale pass-through, default-prefix redirect)
//! - `links`: locale-aware link generation, where preference and detection
//!   signals are allowed to matter

mod links;
mod resolver;

pub use links::{
    alternate_urls, localized_path, post_path, preferred_locale, strip_locale,
    switch_language_path,
};
pub use resolver::{is_excluded_path, resolve_request, RouteDecision};
