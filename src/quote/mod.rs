//! # Quote Module
//!
//! The quote model and everything derived from it.
//!
//! ## Components
//!
//! - [`Quote`] - A single immutable quotation
//! - [`QuoteStore`] - Ordered, persisted collection of quotes
//! - [`CategoryIndex`] - Sorted distinct categories, with the synthetic `all` entry
//! - [`view`] - Pure projections of the store into display models
//! - [`transfer`] - JSON file import and export
//!
//! ## Data Format
//!
//! ```json
//! [
//!   { "text": "The best way to predict the future is to create it.", "category": "inspiration" }
//! ]
//! ```

pub mod category;
pub mod store;
pub mod transfer;
pub mod view;

pub use category::{CategoryIndex, CategorySelector};
pub use store::{ImportReport, QuoteStore};

use crate::error::QuoteError;
use serde::{Deserialize, Serialize};

/// Synthetic category matching every quote
pub const ALL_CATEGORIES: &str = "all";

/// A quotation and the category it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl Quote {
    /// Build a quote from raw user input.
    ///
    /// Both fields are trimmed and must be non-empty; the category is lowercased
    /// and may not be the reserved `all`.
    pub fn new(text: &str, category: &str) -> Result<Self, QuoteError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QuoteError::Validation(
                "quote text must not be empty".to_string(),
            ));
        }
        let category = normalize_category(category);
        if category.is_empty() {
            return Err(QuoteError::Validation(
                "category must not be empty".to_string(),
            ));
        }
        if category == ALL_CATEGORIES {
            return Err(QuoteError::Validation(format!(
                "\"{ALL_CATEGORIES}\" is reserved and cannot be used as a category"
            )));
        }

        Ok(Self {
            text: text.to_string(),
            category,
        })
    }

    /// Identity used for deduplication during import and sync
    pub fn key(&self) -> (&str, &str) {
        (&self.text, &self.category)
    }

    /// True when this quote belongs to `category` (or `category` is `all`)
    pub fn matches(&self, category: &str) -> bool {
        let category = normalize_category(category);
        category == ALL_CATEGORIES || self.category == category
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.category)
    }
}

/// Trim and lowercase a category for comparison and storage
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

/// Quotes used when nothing valid is persisted yet
pub fn seed_quotes() -> Vec<Quote> {
    [
        (
            "The best way to predict the future is to create it.",
            "inspiration",
        ),
        (
            "Life is what happens when you're busy making other plans.",
            "life",
        ),
        (
            "Do not watch the clock. Do what it does. Keep going.",
            "motivation",
        ),
        (
            "Simplicity is the soul of efficiency.",
            "programming",
        ),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
    .collect()
}
