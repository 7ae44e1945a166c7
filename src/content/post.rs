//! Post records: the per-locale content unit the router works with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::locales::Locale;

/// On-disk shape of a post record, one JSON file per post.
///
/// The `translations` field maps other locale codes to the slug of the same
/// article in that locale. It is hand-authored and may be declared on only
/// one side of a pair; the resolution layer tolerates that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFile {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

/// A post record bound to the locale it was published in, with translation
/// keys validated against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub locale: Locale,
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
    pub translations: BTreeMap<Locale, String>,
}

impl Post {
    /// Bind a raw record to its locale.
    ///
    /// Translation entries keyed by unsupported locale codes, or pointing a
    /// post at its own locale, are dropped with a warning rather than
    /// rejected; one bad hand-authored key should not take the post down.
    pub fn from_file(locale: Locale, file: PostFile) -> Post {
        let mut translations = BTreeMap::new();
        for (code, slug) in file.translations {
            match Locale::from_code(&code) {
                Some(target) if target == locale => {
                    warn!(
                        "Post '{}/{}' declares a translation into its own locale, ignoring",
                        locale, file.slug
                    );
                }
                Some(target) => {
                    translations.insert(target, slug);
                }
                None => {
                    warn!(
                        "Post '{}/{}' declares a translation for unsupported locale '{}', ignoring",
                        locale, file.slug, code
                    );
                }
            }
        }

        Post {
            locale,
            slug: file.slug,
            title: file.title,
            tags: file.tags,
            translations,
        }
    }

    /// Number of tags shared with the given set.
    pub fn shared_tag_count(&self, tags: &[String]) -> usize {
        self.tags.iter().filter(|tag| tags.contains(tag)).count()
    }
}
