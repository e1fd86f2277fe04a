//! Keyboard event handling tests
//!
//! Tests for keyboard input handling including quit keys, the add-quote form,
//! the import/export prompt, picker navigation and the help overlay.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use quotebook::config::Config;
use quotebook::storage::{KeyValueStore, Storage, SELECTED_CATEGORY_KEY};
use quotebook::ui::app::{DisplayMode, FocusPane, FormField, InputMode, NotificationLevel};
use quotebook::ui::{App, Effect};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

/// Helper to create a key event
fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

/// Helper to type a string into the app
fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
}

fn create_test_app(storage: &Storage) -> App {
    App::with_rng(storage, &Config::default(), StdRng::seed_from_u64(1))
}

#[test]
fn test_quit_keys() {
    let storage = Storage::in_memory();

    let mut app = create_test_app(&storage);
    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit);

    let mut app = create_test_app(&storage);
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
}

#[test]
fn test_ctrl_c_quits_from_add_form() {
    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);

    app.handle_key(key(KeyCode::Char('a')));
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));

    assert!(app.should_quit);
}

#[test]
fn test_add_form_submits_quote() {
    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);

    app.handle_key(key(KeyCode::Char('a')));
    assert!(matches!(app.input, InputMode::AddQuote(_)));

    // 'q' is text while the form is open
    type_text(&mut app, "Be quick");
    app.handle_key(key(KeyCode::Tab));
    type_text(&mut app, "Speed");
    let effect = app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.input, InputMode::Normal);
    assert!(!app.should_quit);
    let added = app.store.by_category("speed");
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].text, "Be quick");
    assert!(app.index.contains("speed"));
    assert!(matches!(effect, Some(Effect::Push(q)) if q.text == "Be quick"));
}

#[test]
fn test_add_form_keeps_input_on_validation_error() {
    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);
    let before = app.store.len();

    app.handle_key(key(KeyCode::Char('a')));
    type_text(&mut app, "No category");
    let effect = app.handle_key(key(KeyCode::Enter));

    assert!(effect.is_none());
    assert_eq!(app.store.len(), before);
    match &app.input {
        InputMode::AddQuote(form) => {
            assert_eq!(form.text, "No category");
            assert_eq!(form.field, FormField::Text);
        }
        other => panic!("expected the form to stay open, got {other:?}"),
    }
    assert_eq!(
        app.latest_notification().unwrap().level,
        NotificationLevel::Error
    );
}

#[test]
fn test_add_form_escape_and_backspace() {
    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);
    let before = app.store.len();

    app.handle_key(key(KeyCode::Char('a')));
    type_text(&mut app, "abc");
    app.handle_key(key(KeyCode::Backspace));
    if let InputMode::AddQuote(form) = &app.input {
        assert_eq!(form.text, "ab");
    }

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.input, InputMode::Normal);
    assert_eq!(app.store.len(), before);
}

#[test]
fn test_push_disabled_returns_no_effect() {
    let storage = Storage::in_memory();
    let config = Config {
        push_on_add: false,
        ..Config::default()
    };
    let mut app = App::with_rng(&storage, &config, StdRng::seed_from_u64(1));

    app.handle_key(key(KeyCode::Char('a')));
    type_text(&mut app, "Offline");
    app.handle_key(key(KeyCode::Tab));
    type_text(&mut app, "local");

    assert!(app.handle_key(key(KeyCode::Enter)).is_none());
    assert_eq!(app.store.by_category("local").len(), 1);
}

#[test]
fn test_sync_key_returns_effect() {
    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);

    assert_eq!(app.handle_key(key(KeyCode::Char('s'))), Some(Effect::SyncNow));
}

#[test]
fn test_filter_navigation_persists_selection() {
    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);

    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.focus, FocusPane::FilterPicker);

    // all -> inspiration
    app.handle_key(key(KeyCode::Char('j')));
    assert_eq!(app.filter_selector.selected(), "inspiration");
    assert_eq!(app.mode, DisplayMode::List);
    assert_eq!(
        storage.local.get(SELECTED_CATEGORY_KEY).unwrap().as_deref(),
        Some("\"inspiration\"")
    );

    // inspiration -> all
    app.handle_key(key(KeyCode::Up));
    assert_eq!(app.filter_selector.selected(), "all");
}

#[test]
fn test_random_picker_navigation_wraps() {
    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);

    app.handle_key(key(KeyCode::Char('k')));
    assert_eq!(app.random_selector.selected(), "programming");

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.mode, DisplayMode::Random);
    match &app.current {
        quotebook::quote::view::QuoteView::Quote(q) => assert_eq!(q.category, "programming"),
        other => panic!("expected a quote, got {other:?}"),
    }
}

#[test]
fn test_help_overlay_swallows_keys() {
    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);

    app.handle_key(key(KeyCode::Char('?')));
    assert!(app.show_help);

    app.handle_key(key(KeyCode::Char('q')));
    assert!(!app.should_quit);

    app.handle_key(key(KeyCode::Esc));
    assert!(!app.show_help);
}

#[test]
fn test_export_prompt_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);
    let path = temp_dir.path().join("export.json");
    app.export_path = path.clone();

    app.handle_key(key(KeyCode::Char('e')));
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.input, InputMode::Normal);
    assert!(path.exists());
    assert_eq!(
        app.latest_notification().unwrap().level,
        NotificationLevel::Success
    );
}

#[test]
fn test_import_prompt_requires_path() {
    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);

    app.handle_key(key(KeyCode::Char('i')));
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.input, InputMode::Path(_)));
    assert_eq!(
        app.latest_notification().unwrap().message,
        "Please enter a file path"
    );

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.input, InputMode::Normal);
}

#[test]
fn test_import_prompt_merges_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("in.json");
    std::fs::write(
        &path,
        r#"[{"text":"Imported","category":"Files"},{"bogus":true}]"#,
    )
    .unwrap();

    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);

    app.handle_key(key(KeyCode::Char('i')));
    type_text(&mut app, &path.display().to_string());
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.store.by_category("files").len(), 1);
    assert!(app.index.contains("files"));
    assert_eq!(
        app.latest_notification().unwrap().message,
        "Imported 1 new quote (1 invalid entry skipped)"
    );
}

#[test]
fn test_failed_export_keeps_previous_path() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let good_path = temp_dir.path().join("good.json");

    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);
    app.export_path = good_path.clone();

    app.handle_key(key(KeyCode::Char('e')));
    for _ in 0..good_path.display().to_string().len() {
        app.handle_key(key(KeyCode::Backspace));
    }
    type_text(&mut app, &blocker.join("out.json").display().to_string());
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.export_path, good_path);
    assert_eq!(
        app.latest_notification().unwrap().level,
        NotificationLevel::Error
    );
}

#[test]
fn test_reserved_category_is_rejected_and_pickers_keep_moving() {
    let storage = Storage::in_memory();
    let mut app = create_test_app(&storage);
    let before = app.store.len();

    app.handle_key(key(KeyCode::Char('a')));
    type_text(&mut app, "Mine");
    app.handle_key(key(KeyCode::Tab));
    type_text(&mut app, "All");
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.input, InputMode::AddQuote(_)));
    assert_eq!(app.store.len(), before);
    assert_eq!(app.index.options().iter().filter(|c| **c == "all").count(), 1);

    app.handle_key(key(KeyCode::Esc));
    app.handle_key(key(KeyCode::Char('j')));
    assert_eq!(app.random_selector.selected(), "inspiration");
}
