//! Category index derived from the quote store.

use super::{normalize_category, Quote, ALL_CATEGORIES};
use std::collections::BTreeSet;

/// Sorted, distinct, normalized categories of a set of quotes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    categories: Vec<String>,
}

impl CategoryIndex {
    /// Recompute the index from the current quotes
    pub fn build(quotes: &[Quote]) -> Self {
        let categories: BTreeSet<String> = quotes
            .iter()
            .map(|q| normalize_category(&q.category))
            .collect();

        Self {
            categories: categories.into_iter().collect(),
        }
    }

    /// Real categories, sorted
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Selectable options: `all` first, then every category
    pub fn options(&self) -> Vec<&str> {
        std::iter::once(ALL_CATEGORIES)
            .chain(self.categories.iter().map(String::as_str))
            .collect()
    }

    /// True for `all` and for every indexed category
    pub fn contains(&self, category: &str) -> bool {
        let category = normalize_category(category);
        category == ALL_CATEGORIES || self.categories.binary_search(&category).is_ok()
    }
}

/// A selection over [`CategoryIndex::options`].
///
/// The selection is held by value so it survives index rebuilds; when the
/// selected category disappears it falls back to `all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySelector {
    selected: String,
}

impl Default for CategorySelector {
    fn default() -> Self {
        Self {
            selected: ALL_CATEGORIES.to_string(),
        }
    }
}

impl CategorySelector {
    /// Start on `category` if the index knows it, otherwise on `all`
    pub fn new(index: &CategoryIndex, category: &str) -> Self {
        let mut selector = Self::default();
        selector.select(index, category);
        selector
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Position of the selection in `index.options()`
    pub fn position(&self, index: &CategoryIndex) -> usize {
        index
            .options()
            .iter()
            .position(|c| *c == self.selected)
            .unwrap_or(0)
    }

    /// Select `category`; unknown categories select `all`. Returns true if the
    /// selection changed.
    pub fn select(&mut self, index: &CategoryIndex, category: &str) -> bool {
        let category = normalize_category(category);
        let next = if index.contains(&category) {
            category
        } else {
            ALL_CATEGORIES.to_string()
        };
        let changed = next != self.selected;
        self.selected = next;
        changed
    }

    /// Re-validate the selection after the index was rebuilt
    pub fn refresh(&mut self, index: &CategoryIndex) -> bool {
        let current = self.selected.clone();
        self.select(index, &current)
    }

    pub fn next(&mut self, index: &CategoryIndex) -> bool {
        let options = index.options();
        let pos = (self.position(index) + 1) % options.len();
        self.select(index, options[pos])
    }

    pub fn previous(&mut self, index: &CategoryIndex) -> bool {
        let options = index.options();
        let pos = self.position(index);
        let pos = if pos == 0 { options.len() - 1 } else { pos - 1 };
        self.select(index, options[pos])
    }
}
