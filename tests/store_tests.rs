//! Quote store tests
//!
//! Tests for adding, filtering, merging, import/export and persistence of
//! quotes across store instances.

use quotebook::error::QuoteError;
use quotebook::quote::store::LoadSource;
use quotebook::quote::transfer::{export_to_file, import_from_file};
use quotebook::quote::{seed_quotes, CategoryIndex, Quote, QuoteStore};
use quotebook::storage::{FileStore, KeyValueStore, MemoryStore, Storage, QUOTES_KEY};
use std::sync::Arc;
use tempfile::TempDir;

fn memory_backend() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}

fn store_with(quotes: &[(&str, &str)]) -> QuoteStore {
    let quotes = quotes
        .iter()
        .map(|(text, category)| Quote::new(text, category).unwrap())
        .collect();
    QuoteStore::with_quotes(memory_backend(), quotes)
}

#[test]
fn test_add_then_filter_by_lowercased_category() {
    let mut store = store_with(&[(
        "The best way to predict the future is to create it.",
        "inspiration",
    )]);

    store.add("Test quote", "Test").unwrap();

    let matches = store.by_category("test");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].text, "Test quote");
    assert_eq!(matches[0].category, "test");
    assert_eq!(store.by_category("all").len(), 2);
}

#[test]
fn test_add_rejects_blank_input_without_mutation() {
    let mut store = store_with(&[("A", "x")]);

    let result = store.add("   ", "life");
    assert!(matches!(result, Err(QuoteError::Validation(_))));

    let result = store.add("Text", "");
    assert!(matches!(result, Err(QuoteError::Validation(_))));

    assert_eq!(store.len(), 1);
}

#[test]
fn test_import_duplicates_and_invalid_entries_adds_nothing() {
    let mut store = store_with(&[("A", "x")]);
    let payload = br#"[{"text":"A","category":"x"},{"text":"A","category":"x"},{"not":"valid"}]"#;

    let report = store.import(payload).unwrap();

    assert_eq!(report.added, 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_import_rejects_non_array_payloads() {
    let mut store = store_with(&[("A", "x")]);

    assert!(matches!(
        store.import(b"{\"text\":\"B\",\"category\":\"y\"}"),
        Err(QuoteError::Format(_))
    ));
    assert!(matches!(store.import(b"not json"), Err(QuoteError::Format(_))));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_merge_is_idempotent() {
    let mut store = store_with(&[("A", "x")]);
    let batch = vec![
        Quote::new("B", "y").unwrap(),
        Quote::new("C", "y").unwrap(),
        Quote::new("A", "x").unwrap(),
    ];

    assert_eq!(store.merge(batch.clone()).unwrap(), 2);
    assert_eq!(store.merge(batch).unwrap(), 0);
    assert_eq!(store.len(), 3);
}

#[test]
fn test_merge_treats_same_text_in_other_category_as_new() {
    let mut store = store_with(&[("A", "x")]);

    let added = store.merge(vec![Quote::new("A", "Y").unwrap()]).unwrap();

    assert_eq!(added, 1);
    assert_eq!(store.by_category("y").len(), 1);
}

#[test]
fn test_export_then_import_into_empty_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("quotes.json");
    let source = store_with(&[("A", "x"), ("B", "y"), ("C", "x")]);

    assert_eq!(export_to_file(&source, &path).unwrap(), 3);

    let mut target = QuoteStore::with_quotes(memory_backend(), Vec::new());
    let report = import_from_file(&mut target, &path).unwrap();

    assert_eq!(report.added, 3);
    assert_eq!(target.all(), source.all());
}

#[test]
fn test_import_missing_file_is_format_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = store_with(&[("A", "x")]);

    let result = import_from_file(&mut store, &temp_dir.path().join("missing.json"));
    assert!(matches!(result, Err(QuoteError::Format(_))));
}

#[test]
fn test_file_store_persists_across_loads() {
    let temp_dir = TempDir::new().unwrap();
    let backend: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(temp_dir.path()).unwrap());

    let (mut store, source) = QuoteStore::load(Arc::clone(&backend));
    assert_eq!(source, LoadSource::Seeded);
    store.add("Persist me", "Saved").unwrap();

    let (reloaded, source) = QuoteStore::load(backend);
    assert_eq!(source, LoadSource::Persisted);
    assert_eq!(reloaded.len(), seed_quotes().len() + 1);
    assert_eq!(reloaded.by_category("saved")[0].text, "Persist me");
}

#[test]
fn test_corrupt_persisted_quotes_fall_back_to_seed() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Storage::open(temp_dir.path()).unwrap();
    storage.local.set(QUOTES_KEY, "{ definitely not an array").unwrap();

    let (store, source) = QuoteStore::load(Arc::clone(&storage.local));

    assert!(matches!(source, LoadSource::Recovered(QuoteError::Storage(_))));
    assert_eq!(store.all(), seed_quotes().as_slice());
}

#[test]
fn test_category_index_tracks_store() {
    let mut store = store_with(&[("A", "life"), ("B", "art")]);
    let index = CategoryIndex::build(store.all());
    assert_eq!(index.options(), vec!["all", "art", "life"]);

    store.add("C", "Zen").unwrap();
    let index = CategoryIndex::build(store.all());
    assert!(index.contains("zen"));
    assert_eq!(index.categories().len(), 3);
}

#[test]
fn test_import_skips_reserved_category() {
    let mut store = store_with(&[("A", "x")]);

    let report = store
        .import(br#"[{"text":"B","category":"ALL"},{"text":"C","category":"y"}]"#)
        .unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(
        CategoryIndex::build(store.all()).options(),
        vec!["all", "x", "y"]
    );
}
