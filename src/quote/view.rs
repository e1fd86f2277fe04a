//! # Quote Views
//!
//! Pure projections from the store (plus a category filter) to display
//! models. Nothing here touches the terminal; [`crate::ui::render`] draws the
//! models produced here.

use super::{normalize_category, Quote, QuoteStore, ALL_CATEGORIES};
use rand::Rng;

/// Shown when a random pick has nothing to choose from
pub const NO_QUOTES_MESSAGE: &str = "No quotes available in this category.";

/// Shown when the list view is empty
pub const EMPTY_LIST_MESSAGE: &str = "No quotes to show. Add one with [a].";

/// What the random-quote panel displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteView {
    /// Nothing has been displayed yet
    Placeholder,
    Quote(Quote),
    Empty { category: String, message: String },
}

/// What the list panel displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub category: String,
    pub quotes: Vec<Quote>,
    /// Set when `quotes` is empty
    pub empty_message: Option<String>,
}

/// Uniformly pick an index in `[0, len)`; `None` when `len` is zero
pub fn random_index<R: Rng>(len: usize, rng: &mut R) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

/// Pick a random quote from `category` and project it
pub fn random_view<R: Rng>(store: &QuoteStore, category: &str, rng: &mut R) -> QuoteView {
    let candidates = store.by_category(category);
    match random_index(candidates.len(), rng) {
        Some(i) => QuoteView::Quote(candidates[i].clone()),
        None => QuoteView::Empty {
            category: normalize_category(category),
            message: NO_QUOTES_MESSAGE.to_string(),
        },
    }
}

/// Project every quote of `category`, in store order
pub fn list_view(store: &QuoteStore, category: &str) -> ListView {
    let quotes: Vec<Quote> = store.by_category(category).into_iter().cloned().collect();
    let empty_message = quotes.is_empty().then(|| EMPTY_LIST_MESSAGE.to_string());

    ListView {
        category: normalize_category(category),
        quotes,
        empty_message,
    }
}

impl ListView {
    /// Heading such as `All quotes (3)` or `life (1)`
    pub fn title(&self) -> String {
        if self.category == ALL_CATEGORIES {
            format!("All quotes ({})", self.quotes.len())
        } else {
            format!("{} ({})", self.category, self.quotes.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn store() -> QuoteStore {
        QuoteStore::with_quotes(
            Arc::new(MemoryStore::new()),
            vec![
                Quote::new("A", "x").unwrap(),
                Quote::new("B", "y").unwrap(),
                Quote::new("C", "x").unwrap(),
            ],
        )
    }

    #[test]
    fn test_random_index_bounds_and_coverage() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut hits = [0usize; 5];

        for _ in 0..1000 {
            let i = random_index(5, &mut rng).unwrap();
            assert!(i < 5);
            hits[i] += 1;
        }

        assert!(hits.iter().all(|&h| h > 0), "every index reachable: {hits:?}");
        assert_eq!(random_index(0, &mut rng), None);
    }

    #[test]
    fn test_random_view_respects_category() {
        let store = store();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..50 {
            match random_view(&store, "x", &mut rng) {
                QuoteView::Quote(q) => assert_eq!(q.category, "x"),
                other => panic!("unexpected view: {other:?}"),
            }
        }
    }

    #[test]
    fn test_random_view_empty_category() {
        let store = store();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            random_view(&store, "Nothing", &mut rng),
            QuoteView::Empty {
                category: "nothing".to_string(),
                message: NO_QUOTES_MESSAGE.to_string(),
            }
        );
    }

    #[test]
    fn test_list_view_keeps_order() {
        let view = list_view(&store(), "x");
        let texts: Vec<&str> = view.quotes.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "C"]);
        assert_eq!(view.empty_message, None);
        assert_eq!(view.title(), "x (2)");
        assert_eq!(list_view(&store(), "all").title(), "All quotes (3)");
    }

    #[test]
    fn test_list_view_empty_state() {
        let view = list_view(&store(), "z");
        assert!(view.quotes.is_empty());
        assert_eq!(view.empty_message.as_deref(), Some(EMPTY_LIST_MESSAGE));
    }
}
