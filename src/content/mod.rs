//! Content subsystem: the post corpus, its translation graph, and slug
//! resolution.
//!
//! - `post`: per-locale post records and their validated runtime form
//! - `store`: the indexed read-only corpus, loaded once at startup
//! - `graph`: union-find grouping of posts into locale-independent identities
//! - `resolution`: the exact → translation → reverse-scan → 404 chain

mod graph;
mod post;
mod resolution;
mod store;

pub use graph::{PostId, TranslationGraph};
pub use post::{Post, PostFile};
pub use resolution::{PostResolver, Resolution};
pub use store::{ContentStore, StoreError};
