//! Reconciling cached tags with freshly fetched ones

use std::collections::HashSet;

use crate::TagSet;
use crate::natural;

/// What reconciling `old` with `new` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// Nothing to store: the fetch was empty or identical to the cache
    Unchanged(TagSet),
    /// The cache was empty and takes the fetched list as is
    Adopted(TagSet),
    /// Both lists share tags, so their union is kept, newest first
    Merged(TagSet),
    /// The lists share nothing (rewritten history), the fetched list wins
    Replaced(TagSet),
}

impl Reconciled {
    pub fn tags(&self) -> &TagSet {
        match self {
            Reconciled::Unchanged(tags)
            | Reconciled::Adopted(tags)
            | Reconciled::Merged(tags)
            | Reconciled::Replaced(tags) => tags,
        }
    }

    /// Whether the result differs from the cached list and must be stored.
    pub fn is_changed(&self) -> bool {
        !matches!(self, Reconciled::Unchanged(_))
    }

    pub fn latest(&self) -> Option<&str> {
        self.tags().latest()
    }
}

/// Reconcile cached tags `old` with fetched tags `new`.
///
/// An empty fetch never clears the cache.
pub fn reconcile(old: &TagSet, new: &TagSet) -> Reconciled {
    if new.is_empty() || old == new {
        tracing::debug!("Fetched tag list adds nothing to the known list");
        return Reconciled::Unchanged(old.clone());
    }
    if old.is_empty() {
        return Reconciled::Adopted(new.clone());
    }

    let known: HashSet<&str> = old.iter().collect();
    if !new.iter().any(|tag| known.contains(tag)) {
        tracing::debug!(
            old = old.len(),
            new = new.len(),
            "Fetched tags share nothing with known tags, replacing"
        );
        return Reconciled::Replaced(new.clone());
    }

    let mut union: Vec<String> = TagSet::new(old.iter().chain(new.iter())).into();
    natural::sort_descending(&mut union);
    Reconciled::Merged(TagSet::from(union))
}
