//! Post resolution: turn a requested `(locale, slug)` into a post, a
//! redirect, or a deliberate 404.
//!
//! Translation links are hand-authored and may be declared on only one side
//! of a pair, so a miss is not immediately a 404. Resolution runs an ordered
//! list of strategies, each returning a tagged result, and the first hit
//! wins:
//!
//! 1. exact match in the requested locale
//! 2. forward translation: the slug is published under another locale and
//!    that identity has a slug in the requested locale
//! 3. reverse scan: a post already published in the requested locale claims
//!    this slug as one of its translations
//! 4. not found

use tracing::warn;

use crate::content::{ContentStore, Post, TranslationGraph};
use crate::locales::Locale;

/// Outcome of resolving `(locale, slug)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The post exists at exactly this locale and slug.
    Found(&'a Post),
    /// The article exists in this locale under a different slug.
    Redirect { locale: Locale, slug: String },
    /// No plausible same-identity post exists; terminal 404.
    NotFound,
}

/// Resolver over the read-only corpus and its translation graph.
pub struct PostResolver<'a> {
    store: &'a ContentStore,
    graph: &'a TranslationGraph,
}

impl<'a> PostResolver<'a> {
    pub fn new(store: &'a ContentStore, graph: &'a TranslationGraph) -> Self {
        Self { store, graph }
    }

    pub fn resolve(&self, locale: Locale, slug: &str) -> Resolution<'a> {
        self.exact(locale, slug)
            .or_else(|| self.forward_translation(locale, slug))
            .or_else(|| self.reverse_scan(locale, slug))
            .unwrap_or(Resolution::NotFound)
    }

    fn exact(&self, locale: Locale, slug: &str) -> Option<Resolution<'a>> {
        self.store.get(locale, slug).map(Resolution::Found)
    }

    /// The requested slug is published under some other locale; follow that
    /// identity back into the requested locale.
    fn forward_translation(&self, locale: Locale, slug: &str) -> Option<Resolution<'a>> {
        for other in self.store.posts() {
            if other.locale == locale || other.slug != slug {
                continue;
            }
            let Some(id) = self.graph.identity_of(other.locale, slug) else {
                continue;
            };
            if let Some(target_slug) = self.graph.slugged_locales(id).get(&locale) {
                if target_slug != slug {
                    return Some(Resolution::Redirect {
                        locale,
                        slug: target_slug.clone(),
                    });
                }
            }
        }
        None
    }

    /// A post already published in the requested locale lists this slug as a
    /// translation value; send the reader to that post's own slug. Repairs
    /// links declared only on the other side.
    fn reverse_scan(&self, locale: Locale, slug: &str) -> Option<Resolution<'a>> {
        let mut candidates = self
            .store
            .posts_in(locale)
            .filter(|post| post.translations.values().any(|declared| declared == slug));

        let first = candidates.next()?;
        let extra = candidates.count();
        if extra > 0 {
            warn!(
                "Slug '{}' is claimed as a translation by {} posts in locale '{}', \
                 using '{}'",
                slug,
                extra + 1,
                locale,
                first.slug
            );
        }

        Some(Resolution::Redirect {
            locale,
            slug: first.slug.clone(),
        })
    }
}
