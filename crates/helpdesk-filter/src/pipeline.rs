use std::cmp::Ordering;
use std::collections::BTreeSet;

use helpdesk_core::record::Record;

/// A per-view categorical restriction.
pub trait Criterion<R: ?Sized> {
    fn matches(&self, record: &R) -> bool;

    /// `false` when this criterion lets every record through.
    fn is_restrictive(&self) -> bool;
}

/// A named ordering. Implementations must be total; equal keys keep input order.
pub trait SortKey<R: ?Sized> {
    fn compare(&self, a: &R, b: &R) -> Ordering;
}

/// Text, category, tag and sort selection for one list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<C, K> {
    pub text: String,
    pub category: C,
    pub tags: BTreeSet<String>,
    pub sort: K,
}

impl<C, K> Query<C, K> {
    pub fn new(category: C, sort: K) -> Self {
        Self { text: String::new(), category, tags: BTreeSet::new(), sort }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Select `tag` if unselected, otherwise deselect it.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
    }

    /// Whether any restriction is active (sorting does not count).
    pub fn is_filtered<R: ?Sized>(&self) -> bool
    where
        C: Criterion<R>,
    {
        !self.text.is_empty() || self.category.is_restrictive() || !self.tags.is_empty()
    }
}

/// Case-insensitive substring match over the record's searchable fields.
pub fn matches_text<R: Record + ?Sized>(record: &R, needle_lower: &str) -> bool {
    needle_lower.is_empty()
        || record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle_lower))
}

/// At least one shared tag, or no tags selected.
pub fn matches_tags<R: Record + ?Sized>(record: &R, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || record.tags().iter().any(|t| selected.contains(t))
}

/// Filter then stable-sort `records` by `query`. The input is left untouched.
pub fn filter_and_sort<R, C, K>(records: &[R], query: &Query<C, K>) -> Vec<R>
where
    R: Record + Clone,
    C: Criterion<R>,
    K: SortKey<R>,
{
    let needle = query.text.to_lowercase();
    let mut kept: Vec<R> = records
        .iter()
        .filter(|r| matches_text(*r, &needle))
        .filter(|r| query.category.matches(r))
        .filter(|r| matches_tags(*r, &query.tags))
        .cloned()
        .collect();
    // slice::sort_by is stable
    kept.sort_by(|a, b| query.sort.compare(a, b));
    tracing::debug!(total = records.len(), kept = kept.len(), "filtered list");
    kept
}
