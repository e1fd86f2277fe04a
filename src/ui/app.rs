use crate::config::Config;
use crate::error::QuoteError;
use crate::quote::store::LoadSource;
use crate::quote::transfer::{describe_import, export_to_file, import_from_file};
use crate::quote::view::{self, ListView, QuoteView};
use crate::quote::{CategoryIndex, CategorySelector, Quote, QuoteStore};
use crate::storage::{KeyValueStore, Storage, LAST_QUOTE_KEY, SELECTED_CATEGORY_KEY};
use crate::sync::{apply_fetch, SyncMessage, SyncState};
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPane {
    RandomPicker,
    FilterPicker,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayMode {
    Random,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Text,
    Category,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddForm {
    pub text: String,
    pub category: String,
    pub field: FormField,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathAction {
    Import,
    Export,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathPrompt {
    pub action: PathAction,
    pub buffer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    AddQuote(AddForm),
    Path(PathPrompt),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: DateTime<Utc>,
}

/// Side effects the event loop performs on behalf of the app
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SyncNow,
    Push(Quote),
}

pub struct App {
    pub store: QuoteStore,
    pub index: CategoryIndex,
    pub random_selector: CategorySelector,
    pub filter_selector: CategorySelector,
    pub focus: FocusPane,
    pub mode: DisplayMode,
    pub input: InputMode,
    pub current: QuoteView,
    pub notifications: Vec<Notification>,
    pub sync_state: SyncState,
    pub should_quit: bool,
    pub show_help: bool,
    pub push_on_add: bool,
    pub export_path: PathBuf,
    notification_ttl: chrono::Duration,
    local: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    rng: StdRng,
}

impl App {
    pub fn new(storage: &Storage, config: &Config) -> Self {
        Self::with_rng(storage, config, StdRng::from_entropy())
    }

    /// Build an app with a fixed random source (for deterministic tests)
    pub fn with_rng(storage: &Storage, config: &Config, rng: StdRng) -> Self {
        let (store, source) = QuoteStore::load(Arc::clone(&storage.local));
        let mut app = Self {
            index: CategoryIndex::default(),
            random_selector: CategorySelector::default(),
            filter_selector: CategorySelector::default(),
            store,
            focus: FocusPane::RandomPicker,
            mode: DisplayMode::Random,
            input: InputMode::Normal,
            current: QuoteView::Placeholder,
            notifications: Vec::new(),
            sync_state: SyncState::Idle,
            should_quit: false,
            show_help: false,
            push_on_add: config.push_on_add,
            export_path: config.export_file.clone(),
            notification_ttl: config.notification_ttl(),
            local: Arc::clone(&storage.local),
            session: Arc::clone(&storage.session),
            rng,
        };
        app.restore(&source);
        app
    }

    /// Re-read everything from storage, as a page reload would
    pub fn reload(&mut self) {
        let (store, source) = QuoteStore::load(Arc::clone(&self.local));
        self.store = store;
        self.input = InputMode::Normal;
        self.restore(&source);
        self.notify(NotificationLevel::Info, "Reloaded from storage");
    }

    fn restore(&mut self, source: &LoadSource) {
        if let LoadSource::Recovered(e) = source {
            self.notify(
                NotificationLevel::Error,
                format!("{e}. Starting from the default quotes."),
            );
        }

        self.index = CategoryIndex::build(self.store.all());
        self.random_selector = CategorySelector::default();

        let saved_filter = self.read_selected_category();
        self.filter_selector = CategorySelector::new(&self.index, &saved_filter);

        match self.read_last_quote() {
            Some(quote) => {
                self.current = QuoteView::Quote(quote);
                self.mode = DisplayMode::Random;
            }
            None => self.show_random(),
        }
    }

    fn read_selected_category(&self) -> String {
        match self.local.get(SELECTED_CATEGORY_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<String>(&raw).unwrap_or_else(|_| raw),
            Ok(None) => crate::quote::ALL_CATEGORIES.to_string(),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "selected category unreadable");
                crate::quote::ALL_CATEGORIES.to_string()
            }
        }
    }

    fn read_last_quote(&self) -> Option<Quote> {
        let raw = self.session.get(LAST_QUOTE_KEY).ok().flatten()?;
        let quote: Quote = serde_json::from_str(&raw).ok()?;
        Quote::new(&quote.text, &quote.category).ok()
    }

    fn persist_selected_category(&mut self) {
        let value = serde_json::Value::String(self.filter_selector.selected().to_string());
        if let Err(e) = self.local.set(SELECTED_CATEGORY_KEY, &value.to_string()) {
            tracing::warn!(error = %format!("{e:#}"), "failed to persist selected category");
            self.notify(
                NotificationLevel::Error,
                QuoteError::storage(&e).to_string(),
            );
        }
    }

    fn persist_last_quote(&self, quote: &Quote) {
        let result = serde_json::to_string(quote)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.session.set(LAST_QUOTE_KEY, &json));
        if let Err(e) = result {
            tracing::warn!(error = %format!("{e:#}"), "failed to persist last quote");
        }
    }

    /// Rebuild the category index and re-validate both selections
    pub fn refresh_categories(&mut self) {
        self.index = CategoryIndex::build(self.store.all());
        self.random_selector.refresh(&self.index);
        if self.filter_selector.refresh(&self.index) {
            self.persist_selected_category();
        }
    }

    /// Draw a random quote from the random picker's category
    pub fn show_random(&mut self) {
        let category = self.random_selector.selected().to_string();
        self.current = view::random_view(&self.store, &category, &mut self.rng);
        if let QuoteView::Quote(quote) = &self.current {
            self.persist_last_quote(quote);
        }
        self.mode = DisplayMode::Random;
    }

    pub fn show_list(&mut self) {
        self.mode = DisplayMode::List;
    }

    /// The list panel's content for the current filter
    pub fn list_view(&self) -> ListView {
        view::list_view(&self.store, self.filter_selector.selected())
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::RandomPicker => FocusPane::FilterPicker,
            FocusPane::FilterPicker => FocusPane::RandomPicker,
        };
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn next(&mut self) {
        match self.focus {
            FocusPane::RandomPicker => {
                self.random_selector.next(&self.index);
            }
            FocusPane::FilterPicker => {
                self.filter_selector.next(&self.index);
                self.on_filter_changed();
            }
        }
    }

    pub fn previous(&mut self) {
        match self.focus {
            FocusPane::RandomPicker => {
                self.random_selector.previous(&self.index);
            }
            FocusPane::FilterPicker => {
                self.filter_selector.previous(&self.index);
                self.on_filter_changed();
            }
        }
    }

    /// Select a filter category by name; unknown names select `all`
    pub fn set_filter(&mut self, category: &str) {
        self.filter_selector.select(&self.index, category);
        self.on_filter_changed();
    }

    fn on_filter_changed(&mut self) {
        self.persist_selected_category();
        self.mode = DisplayMode::List;
    }

    /// Add a quote from user input. Returns a push effect on success when
    /// pushing is enabled.
    pub fn add_quote(&mut self, text: &str, category: &str) -> Result<Option<Effect>, QuoteError> {
        match self.store.add(text, category) {
            Ok(quote) => {
                self.refresh_categories();
                self.notify(NotificationLevel::Success, "Quote added");
                Ok(self.push_on_add.then_some(Effect::Push(quote)))
            }
            Err(e) => {
                self.notify(NotificationLevel::Error, e.to_string());
                Err(e)
            }
        }
    }

    /// Export the store to `path`. Returns true on success.
    pub fn export_to(&mut self, path: &Path) -> bool {
        match export_to_file(&self.store, path) {
            Ok(count) => {
                self.notify(
                    NotificationLevel::Success,
                    format!("Exported {count} quotes to {}", path.display()),
                );
                true
            }
            Err(e) => {
                self.notify(NotificationLevel::Error, format!("Export failed: {e:#}"));
                false
            }
        }
    }

    pub fn import_from(&mut self, path: &Path) {
        match import_from_file(&mut self.store, path) {
            Ok(report) => {
                if report.added > 0 {
                    self.refresh_categories();
                }
                self.notify(NotificationLevel::Success, describe_import(&report));
            }
            Err(e) => self.notify(NotificationLevel::Error, e.to_string()),
        }
    }

    pub fn on_sync_started(&mut self) {
        self.notify(NotificationLevel::Info, "Syncing with server...");
    }

    /// Apply the result of a finished network task
    pub fn apply_sync_message(&mut self, message: SyncMessage) {
        match message {
            SyncMessage::Fetched(result) => match apply_fetch(&mut self.store, result) {
                Ok(report) if report.added > 0 => {
                    self.refresh_categories();
                    let noun = if report.added == 1 { "quote" } else { "quotes" };
                    self.notify(
                        NotificationLevel::Success,
                        format!("Synced {} new {noun} from server", report.added),
                    );
                }
                Ok(_) => self.notify(NotificationLevel::Info, "Already up to date with server"),
                Err(e) => self.notify(NotificationLevel::Error, format!("Sync failed: {e}")),
            },
            SyncMessage::Pushed { quote, result } => match result {
                Ok(()) => {
                    tracing::info!(category = %quote.category, "quote pushed");
                    self.notify(NotificationLevel::Success, "Quote sent to server");
                }
                Err(e) => self.notify(
                    NotificationLevel::Error,
                    format!("Quote saved locally, but sending to server failed: {e}"),
                ),
            },
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification {
            message: message.into(),
            level,
            created_at: Utc::now(),
        });
    }

    /// Drop notifications older than the configured lifetime
    pub fn prune_notifications(&mut self, now: DateTime<Utc>) {
        let ttl = self.notification_ttl;
        self.notifications.retain(|n| now - n.created_at < ttl);
    }

    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Translate a key press into state changes. Returns an effect for the
    /// event loop when the key needs network work.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        match std::mem::replace(&mut self.input, InputMode::Normal) {
            InputMode::AddQuote(form) => self.handle_form_key(form, key),
            InputMode::Path(prompt) => {
                self.handle_prompt_key(prompt, key);
                None
            }
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Effect> {
        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.toggle_help();
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Tab => self.toggle_focus(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Enter => match self.focus {
                FocusPane::RandomPicker => self.show_random(),
                FocusPane::FilterPicker => self.show_list(),
            },
            KeyCode::Char('n') => self.show_random(),
            KeyCode::Char('l') => self.show_list(),
            KeyCode::Char('a') => {
                self.input = InputMode::AddQuote(AddForm {
                    text: String::new(),
                    category: String::new(),
                    field: FormField::Text,
                });
            }
            KeyCode::Char('e') => {
                self.input = InputMode::Path(PathPrompt {
                    action: PathAction::Export,
                    buffer: self.export_path.display().to_string(),
                });
            }
            KeyCode::Char('i') => {
                self.input = InputMode::Path(PathPrompt {
                    action: PathAction::Import,
                    buffer: String::new(),
                });
            }
            KeyCode::Char('s') => return Some(Effect::SyncNow),
            KeyCode::Char('R') => self.reload(),
            _ => {}
        }
        None
    }

    fn handle_form_key(&mut self, mut form: AddForm, key: KeyEvent) -> Option<Effect> {
        match key.code {
            KeyCode::Esc => return None,
            KeyCode::Tab | KeyCode::BackTab => {
                form.field = match form.field {
                    FormField::Text => FormField::Category,
                    FormField::Category => FormField::Text,
                };
            }
            KeyCode::Backspace => {
                active_field(&mut form).pop();
            }
            KeyCode::Enter => {
                // A failed add keeps the form open so the input is not lost
                return match self.add_quote(&form.text, &form.category) {
                    Ok(effect) => effect,
                    Err(_) => {
                        self.input = InputMode::AddQuote(form);
                        None
                    }
                };
            }
            KeyCode::Char(c) => active_field(&mut form).push(c),
            _ => {}
        }
        self.input = InputMode::AddQuote(form);
        None
    }

    fn handle_prompt_key(&mut self, mut prompt: PathPrompt, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => return,
            KeyCode::Backspace => {
                prompt.buffer.pop();
            }
            KeyCode::Enter => {
                let path = prompt.buffer.trim();
                if path.is_empty() {
                    self.notify(NotificationLevel::Error, "Please enter a file path");
                } else {
                    let path = PathBuf::from(path);
                    match prompt.action {
                        PathAction::Export => {
                            if self.export_to(&path) {
                                self.export_path = path;
                            }
                        }
                        PathAction::Import => self.import_from(&path),
                    }
                    return;
                }
            }
            KeyCode::Char(c) => prompt.buffer.push(c),
            _ => {}
        }
        self.input = InputMode::Path(prompt);
    }
}

fn active_field(form: &mut AddForm) -> &mut String {
    match form.field {
        FormField::Text => &mut form.text,
        FormField::Category => &mut form.category,
    }
}
