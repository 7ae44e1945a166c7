//! Content store: the indexed post corpus across all locales.
//!
//! Posts are loaded from a per-locale directory layout (`<dir>/<locale>/*.json`)
//! once at startup and read-only afterwards. Catalog iteration order is
//! locale order from the registry, then file name order within a locale, so
//! scans and tie-breaks are stable across runs.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{info, warn};

use crate::content::post::{Post, PostFile};
use crate::locales::{Locale, LocaleRegistry};

/// Data errors in the post corpus. These are hard build failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate slug '{slug}' in locale '{locale}'")]
    DuplicateSlug { locale: Locale, slug: String },
}

/// Read-only, indexed post corpus.
pub struct ContentStore {
    posts: Vec<Post>,
    by_key: HashMap<(Locale, String), usize>,
}

impl ContentStore {
    /// Index a corpus of posts.
    ///
    /// Within one locale, slugs must be unique; a collision is a data error
    /// reported here rather than a runtime surprise later.
    pub fn from_posts(posts: Vec<Post>) -> Result<Self, StoreError> {
        let mut by_key = HashMap::with_capacity(posts.len());
        for (index, post) in posts.iter().enumerate() {
            let key = (post.locale, post.slug.clone());
            if by_key.insert(key, index).is_some() {
                return Err(StoreError::DuplicateSlug {
                    locale: post.locale,
                    slug: post.slug.clone(),
                });
            }
        }
        Ok(Self { posts, by_key })
    }

    /// Load the corpus from a per-locale directory layout.
    ///
    /// Subdirectories that are not supported locale codes are skipped with a
    /// warning, as are files that fail to parse; a duplicate slug within one
    /// locale aborts the load.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut posts = Vec::new();

        for locale_config in LocaleRegistry::get().list() {
            let locale = Locale::from_code(locale_config.code)
                .expect("registry codes are supported");
            let locale_dir = dir.join(locale_config.code);
            if !locale_dir.is_dir() {
                continue;
            }

            let mut files: Vec<_> = std::fs::read_dir(&locale_dir)
                .context(format!("Failed to read {}", locale_dir.display()))?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .collect();
            files.sort();

            for path in files {
                let raw = std::fs::read_to_string(&path)
                    .context(format!("Failed to read {}", path.display()))?;
                match serde_json::from_str::<PostFile>(&raw) {
                    Ok(file) => posts.push(Post::from_file(locale, file)),
                    Err(e) => {
                        warn!("Skipping unparsable post record {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Flag stray directories that look like content but are not locales.
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.filter_map(|entry| entry.ok()) {
                let path = entry.path();
                if path.is_dir() {
                    let name = entry.file_name();
                    let name = name.to_string_lossy();
                    if !LocaleRegistry::get().is_supported(&name) {
                        warn!("Ignoring content directory for unsupported locale '{}'", name);
                    }
                }
            }
        }

        let store = Self::from_posts(posts)?;
        info!("Loaded {} posts from {}", store.posts.len(), dir.display());
        Ok(store)
    }

    /// Look up a post by its exact locale and slug.
    pub fn get(&self, locale: Locale, slug: &str) -> Option<&Post> {
        self.by_key
            .get(&(locale, slug.to_string()))
            .map(|&index| &self.posts[index])
    }

    /// All posts in catalog iteration order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Posts published in one locale, in catalog iteration order.
    pub fn posts_in(&self, locale: Locale) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(move |post| post.locale == locale)
    }

    /// Same-locale posts sharing at least one tag with the given post,
    /// ranked by shared-tag count, capped at `limit`. The post itself is
    /// excluded.
    pub fn related_posts(&self, locale: Locale, slug: &str, limit: usize) -> Vec<&Post> {
        let Some(post) = self.get(locale, slug) else {
            return Vec::new();
        };

        let mut related: Vec<(usize, &Post)> = self
            .posts_in(locale)
            .filter(|candidate| candidate.slug != post.slug)
            .map(|candidate| (candidate.shared_tag_count(&post.tags), candidate))
            .filter(|(shared, _)| *shared > 0)
            .collect();

        // Stable sort keeps catalog order among equal-ranked candidates.
        related.sort_by(|a, b| b.0.cmp(&a.0));
        related
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate)
            .collect()
    }
}
