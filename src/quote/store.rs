//! # Quote Store
//!
//! Ordered, in-memory list of quotes mirrored to a [`KeyValueStore`] under the
//! [`QUOTES_KEY`] key.
//!
//! The persisted copy is read once by [`QuoteStore::load`] and rewritten after
//! every mutation. A failed write rolls the in-memory mutation back, so memory
//! and storage never disagree.

use super::{normalize_category, seed_quotes, Quote};
use crate::error::QuoteError;
use crate::storage::{KeyValueStore, QUOTES_KEY};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Where the quotes of a freshly loaded store came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// A valid persisted array was found
    Persisted,
    /// Nothing was persisted yet; the seed set is in use
    Seeded,
    /// The persisted copy was unreadable; the seed set is in use
    Recovered(QuoteError),
}

/// Outcome of importing a JSON payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Quotes that were not already present and were appended
    pub added: usize,
    /// Array elements that were not `{text, category}` objects
    pub skipped: usize,
}

pub struct QuoteStore {
    quotes: Vec<Quote>,
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for QuoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteStore")
            .field("quotes", &self.quotes)
            .finish_non_exhaustive()
    }
}

impl QuoteStore {
    /// Load the persisted quotes, falling back to the seed set when they are
    /// missing or malformed.
    pub fn load(backend: Arc<dyn KeyValueStore>) -> (Self, LoadSource) {
        let (quotes, source) = match read_persisted(backend.as_ref()) {
            Ok(Some(quotes)) => (quotes, LoadSource::Persisted),
            Ok(None) => (seed_quotes(), LoadSource::Seeded),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "persisted quotes unreadable, using seed set");
                (seed_quotes(), LoadSource::Recovered(QuoteError::storage(&e)))
            }
        };

        tracing::info!(count = quotes.len(), source = ?source, "quote store loaded");
        (Self { quotes, backend }, source)
    }

    /// Create a store with explicit contents (nothing is read from `backend`)
    pub fn with_quotes(backend: Arc<dyn KeyValueStore>, quotes: Vec<Quote>) -> Self {
        Self { quotes, backend }
    }

    /// Validate, normalize and append a quote. Duplicates are allowed here.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote, QuoteError> {
        let quote = Quote::new(text, category)?;
        self.quotes.push(quote.clone());

        if let Err(e) = self.persist() {
            self.quotes.pop();
            return Err(QuoteError::storage(&e));
        }

        tracing::info!(category = %quote.category, "quote added");
        Ok(quote)
    }

    /// Append every candidate whose `(text, category)` is not present yet.
    ///
    /// Returns the number of quotes appended. Storage is only written when
    /// something was appended.
    pub fn merge<I>(&mut self, candidates: I) -> Result<usize, QuoteError>
    where
        I: IntoIterator<Item = Quote>,
    {
        let previous_len = self.quotes.len();
        let mut seen: HashSet<Quote> = self.quotes.iter().cloned().collect();

        for candidate in candidates {
            if seen.insert(candidate.clone()) {
                self.quotes.push(candidate);
            }
        }

        let added = self.quotes.len() - previous_len;
        if added > 0 {
            if let Err(e) = self.persist() {
                self.quotes.truncate(previous_len);
                return Err(QuoteError::storage(&e));
            }
            tracing::debug!(added, total = self.quotes.len(), "quotes merged");
        }

        Ok(added)
    }

    /// Every quote, in insertion order
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    /// Quotes in `category`; `all` yields the full sequence
    pub fn by_category(&self, category: &str) -> Vec<&Quote> {
        let category = normalize_category(category);
        self.quotes.iter().filter(|q| q.matches(&category)).collect()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// The full sequence as pretty-printed JSON
    pub fn export(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.quotes).context("Failed to serialize quotes")
    }

    /// Merge quotes from a JSON payload.
    ///
    /// The payload must be a JSON array. Elements that are not objects with
    /// non-empty string `text` and `category` fields are skipped and counted;
    /// the remaining ones are merged with the same rule as [`merge`](Self::merge).
    pub fn import(&mut self, bytes: &[u8]) -> Result<ImportReport, QuoteError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| QuoteError::Format(format!("not valid JSON: {e}")))?;

        let Value::Array(elements) = value else {
            return Err(QuoteError::Format(
                "expected a top-level JSON array".to_string(),
            ));
        };

        let total = elements.len();
        let candidates: Vec<Quote> = elements.iter().filter_map(parse_element).collect();
        let skipped = total - candidates.len();

        let added = self.merge(candidates)?;
        tracing::info!(added, skipped, "quotes imported");

        Ok(ImportReport { added, skipped })
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.quotes).context("Failed to serialize quotes")?;
        self.backend
            .set(QUOTES_KEY, &json)
            .with_context(|| format!("Failed to write storage key: {QUOTES_KEY}"))
    }
}

/// Read the persisted array. `Ok(None)` when nothing was stored; an error
/// when the array holds no valid quote at all.
fn read_persisted(backend: &dyn KeyValueStore) -> Result<Option<Vec<Quote>>> {
    let Some(content) = backend
        .get(QUOTES_KEY)
        .with_context(|| format!("Failed to read storage key: {QUOTES_KEY}"))?
    else {
        return Ok(None);
    };

    let quotes: Vec<Quote> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse storage key: {QUOTES_KEY}"))?;

    if quotes.is_empty() {
        return Ok(None);
    }

    // Older writers may have stored mixed-case categories
    let total = quotes.len();
    let valid: Vec<Quote> = quotes
        .into_iter()
        .filter_map(|q| Quote::new(&q.text, &q.category).ok())
        .collect();

    let dropped = total - valid.len();
    if dropped > 0 {
        tracing::warn!(dropped, total, "invalid persisted quotes dropped");
    }
    if valid.is_empty() {
        anyhow::bail!("No valid quotes in storage key: {QUOTES_KEY}");
    }

    Ok(Some(valid))
}

fn parse_element(element: &Value) -> Option<Quote> {
    let text = element.get("text")?.as_str()?;
    let category = element.get("category")?.as_str()?;
    Quote::new(text, category).ok()
}
