//! Locale-aware content router for a multilingual blog.
//!
//! Given an inbound request path, decide the language, keep URLs on
//! canonical locale prefixes, and when a post slug does not exist in the
//! requested language, find the same article's slug there instead of
//! answering 404.
//!
//! The crate is organized around three subsystems:
//!
//! - [`locales`]: the locale catalog, aliases, geolocation mapping, and the
//!   persisted reader preference
//! - [`routing`]: the per-request locale decision and locale-aware link
//!   generation
//! - [`content`]: the post corpus, its cross-language translation graph, and
//!   slug resolution
//!
//! [`server`] exposes the whole thing over HTTP.

pub mod config;
pub mod content;
pub mod locales;
pub mod routing;
pub mod server;
