//! Content translation graph.
//!
//! Groups post records into locale-independent identities by following the
//! hand-authored `translations` relation transitively: if the English post
//! links the Portuguese one and the Portuguese post links the Spanish one,
//! all three are one identity even though English and Spanish never mention
//! each other. A disjoint-set union over `(locale, slug)` keys makes the
//! grouping order-independent, so loading locales in any order yields the
//! same identities.
//!
//! Built once from the full corpus and read-only thereafter. Input comes
//! from a validated [`ContentStore`](crate::content::ContentStore), so slugs
//! are unique per locale; declared translation targets that have no post
//! behind them still become graph nodes, which is what lets the resolver
//! repair one-sided links.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::warn;

use crate::content::post::Post;
use crate::locales::Locale;

/// Stable handle for one post identity (one connected component).
///
/// Valid for the graph that produced it; identities are not comparable
/// across two differently built graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(usize);

/// Read-only translation graph over the whole corpus.
pub struct TranslationGraph {
    groups: Vec<BTreeMap<Locale, String>>,
    id_by_key: HashMap<(Locale, String), PostId>,
}

impl TranslationGraph {
    /// Group the corpus into identities.
    ///
    /// Asymmetric links (declared on one side only, or disagreeing about the
    /// slug) are tolerated and reported as data-quality warnings; the
    /// resolution layer repairs them at request time.
    pub fn build(posts: &[Post]) -> TranslationGraph {
        let mut nodes: Vec<(Locale, String)> = Vec::new();
        let mut node_index: HashMap<(Locale, String), usize> = HashMap::new();
        let mut real: HashSet<usize> = HashSet::new();

        // Intern real posts first so catalog order decides node numbering.
        for post in posts {
            let index = intern(
                &mut nodes,
                &mut node_index,
                (post.locale, post.slug.clone()),
            );
            real.insert(index);
        }

        let mut parent: Vec<usize> = (0..nodes.len()).collect();

        for post in posts {
            let from = node_index[&(post.locale, post.slug.clone())];
            for (&target_locale, target_slug) in &post.translations {
                let to = intern(
                    &mut nodes,
                    &mut node_index,
                    (target_locale, target_slug.clone()),
                );
                if to >= parent.len() {
                    parent.extend(parent.len()..=to);
                }
                union(&mut parent, from, to);
            }
        }

        // Freeze components into locale→slug maps. Real posts come before
        // dangling declared targets so a published slug wins, and nodes are
        // visited in key order so the result does not depend on corpus load
        // order.
        let mut group_of_root: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<BTreeMap<Locale, String>> = Vec::new();
        let mut id_by_key: HashMap<(Locale, String), PostId> = HashMap::new();

        let ordered: Vec<usize> = {
            let mut indices: Vec<usize> = (0..nodes.len()).collect();
            indices.sort_by(|&a, &b| {
                let real_a = real.contains(&a);
                let real_b = real.contains(&b);
                real_b.cmp(&real_a).then_with(|| nodes[a].cmp(&nodes[b]))
            });
            indices
        };

        for index in ordered {
            let root = find(&mut parent, index);
            let group = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(BTreeMap::new());
                groups.len() - 1
            });

            let (locale, slug) = &nodes[index];
            match groups[group].get(locale) {
                None => {
                    groups[group].insert(*locale, slug.clone());
                }
                Some(existing) if existing != slug && real.contains(&index) => {
                    warn!(
                        "Translation group already maps locale '{}' to '{}', ignoring '{}'",
                        locale, existing, slug
                    );
                }
                Some(_) => {}
            }

            if real.contains(&index) {
                id_by_key.insert((*locale, slug.clone()), PostId(group));
            }
        }

        warn_on_asymmetric_links(posts);

        TranslationGraph { groups, id_by_key }
    }

    /// Identity of a published post, if one exists at `(locale, slug)`.
    ///
    /// Dangling translation targets are not published posts and resolve to
    /// `None` here.
    pub fn identity_of(&self, locale: Locale, slug: &str) -> Option<PostId> {
        self.id_by_key.get(&(locale, slug.to_string())).copied()
    }

    /// The per-locale slugs of one identity, in catalog locale order.
    ///
    /// Includes declared-but-unpublished slugs, matching what the posts
    /// themselves claim.
    pub fn slugged_locales(&self, id: PostId) -> &BTreeMap<Locale, String> {
        &self.groups[id.0]
    }

    /// All identity groupings. Order is an implementation detail; the set of
    /// groupings is stable across corpus load orders.
    pub fn groups(&self) -> &[BTreeMap<Locale, String>] {
        &self.groups
    }
}

fn intern(
    nodes: &mut Vec<(Locale, String)>,
    node_index: &mut HashMap<(Locale, String), usize>,
    key: (Locale, String),
) -> usize {
    if let Some(&index) = node_index.get(&key) {
        return index;
    }
    let index = nodes.len();
    nodes.push(key.clone());
    node_index.insert(key, index);
    index
}

fn find(parent: &mut [usize], node: usize) -> usize {
    let mut root = node;
    while parent[root] != root {
        root = parent[root];
    }
    // Path compression.
    let mut current = node;
    while parent[current] != root {
        let next = parent[current];
        parent[current] = root;
        current = next;
    }
    root
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let root_a = find(parent, a);
    let root_b = find(parent, b);
    if root_a != root_b {
        // Attach the larger root under the smaller to keep node numbering
        // (and with it group discovery order) deterministic.
        let (low, high) = if root_a < root_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        parent[high] = low;
    }
}

/// Report translation links that are declared on only one side or disagree
/// about the slug. These are tolerated, not fatal.
fn warn_on_asymmetric_links(posts: &[Post]) {
    let by_key: HashMap<(Locale, &str), &Post> = posts
        .iter()
        .map(|post| ((post.locale, post.slug.as_str()), post))
        .collect();

    for post in posts {
        for (&target_locale, target_slug) in &post.translations {
            match by_key.get(&(target_locale, target_slug.as_str())) {
                None => {
                    warn!(
                        "Post '{}/{}' declares translation '{}/{}' which does not exist",
                        post.locale, post.slug, target_locale, target_slug
                    );
                }
                Some(target) => {
                    if target.translations.get(&post.locale) != Some(&post.slug) {
                        warn!(
                            "Translation link '{}/{}' -> '{}/{}' is not declared back",
                            post.locale, post.slug, target_locale, target_slug
                        );
                    }
                }
            }
        }
    }
}
