//! # Quotebook CLI Entry Point
//!
//! This is the main entry point for the Quotebook TUI application.
//!
//! ## Usage
//!
//! ```bash
//! # Start the TUI
//! quotebook
//!
//! # Use another remote endpoint, without periodic sync
//! quotebook --endpoint http://localhost:3000/posts --no-sync
//!
//! # Non-interactive helpers
//! quotebook --export quotes.json
//! quotebook --import quotes.json
//! quotebook --list life
//! quotebook --sync-once
//! ```
//!
//! ## Key Bindings
//!
//! - `q` - Quit
//! - `Tab` - Switch between the "random from" and "filter list" pickers
//! - `j` / `k` / arrows - Change the category of the focused picker
//! - `Enter` / `n` - Show a random quote; `l` - show the filtered list
//! - `a` - Add a quote
//! - `e` / `i` - Export / import a JSON file
//! - `s` - Sync with the server now
//! - `R` - Reload from storage
//! - `?` - Help

use quotebook::config::Config;
use quotebook::logging;
use quotebook::quote::transfer::{describe_import, export_to_file, import_from_file};
use quotebook::quote::view::list_view;
use quotebook::quote::QuoteStore;
use quotebook::storage::{self, Storage};
use quotebook::sync::{apply_fetch, Clock, HttpTransport, SyncAgent, SystemClock, Transport};
use quotebook::ui::{self, App, Effect};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(
                event::read().context("Failed to read keyboard event")?,
            ))
        } else {
            Ok(None)
        }
    }
}

/// Quotebook - collect, filter and sync quotations from the terminal
#[derive(Parser, Debug)]
#[command(name = "quotebook")]
#[command(author = "Luckystrike561")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Collect, filter and sync quotations", long_about = None)]
struct Args {
    /// Path to a config file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for stored quotes, session state and logs
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Remote endpoint used for sync and push
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Disable the periodic sync (manual sync still works)
    #[arg(long)]
    no_sync: bool,

    /// Seconds between periodic syncs
    #[arg(long, value_name = "SECS")]
    sync_interval: Option<u64>,

    /// Write all quotes to FILE and exit
    #[arg(long, value_name = "FILE", conflicts_with_all = ["import", "list", "sync_once"])]
    export: Option<PathBuf>,

    /// Merge quotes from FILE and exit
    #[arg(long, value_name = "FILE", conflicts_with_all = ["list", "sync_once"])]
    import: Option<PathBuf>,

    /// Print quotes (optionally of one CATEGORY) and exit
    #[arg(long, value_name = "CATEGORY", num_args = 0..=1, default_missing_value = "all", conflicts_with = "sync_once")]
    list: Option<String>,

    /// Fetch from the remote endpoint once, merge, and exit
    #[arg(long)]
    sync_once: bool,
}

impl Args {
    /// Load the config file and apply command-line overrides
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if self.no_sync {
            config.sync_enabled = false;
        }
        if let Some(secs) = self.sync_interval {
            config.sync_interval_secs = secs;
        }

        Ok(config)
    }

    fn is_interactive(&self) -> bool {
        self.export.is_none() && self.import.is_none() && self.list.is_none() && !self.sync_once
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Try to restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);

        // Call the original panic hook
        original_hook(panic_info);
    }));

    // Run the application and ensure cleanup happens
    let result = run_application(args).await;

    // Restore panic hook
    let _ = panic::take_hook();

    result
}

async fn run_application(args: Args) -> Result<()> {
    let data_dir = match &args.data_dir {
        Some(dir) => dir.clone(),
        None => storage::default_data_dir()?,
    };

    if let Err(e) = logging::init_logging(&data_dir) {
        eprintln!("Warning: Could not initialize logging: {e:#}");
    }

    let config = args.resolve_config()?;
    let storage = Storage::open(&data_dir)
        .with_context(|| format!("Failed to open data directory: {}", data_dir.display()))?;

    if !args.is_interactive() {
        return run_batch(&args, &config, &storage).await;
    }

    let transport = HttpTransport::new(&config.endpoint, config.request_timeout())
        .context("Failed to create HTTP client")?;
    tracing::info!(
        endpoint = transport.endpoint(),
        sync_enabled = config.sync_enabled,
        "session started"
    );
    let mut agent = SyncAgent::new(transport, &config);
    let mut app = App::new(&storage, &config);

    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut event_reader = CrosstermEventReader;
    let run_result = run_app(
        &mut terminal,
        &mut app,
        &mut agent,
        &SystemClock,
        &mut event_reader,
    )
    .await;

    let cleanup_result = cleanup_terminal(&mut terminal);

    if let Err(e) = storage.end_session() {
        tracing::warn!(error = %format!("{e:#}"), "failed to clear session storage");
    }
    tracing::info!("session ended");

    run_result?;
    cleanup_result?;

    Ok(())
}

/// Non-interactive modes: export, import, list, sync-once
async fn run_batch(args: &Args, config: &Config, storage: &Storage) -> Result<()> {
    let (mut store, _) = QuoteStore::load(Arc::clone(&storage.local));

    if let Some(path) = &args.export {
        let count = export_to_file(&store, path)?;
        println!("Exported {} quotes to {}", count, path.display());
    } else if let Some(path) = &args.import {
        let report = import_from_file(&mut store, path)?;
        println!("{}", describe_import(&report));
    } else if let Some(category) = &args.list {
        print_list(&store, category);
    } else if args.sync_once {
        let transport = HttpTransport::new(&config.endpoint, config.request_timeout())
            .context("Failed to create HTTP client")?;
        let agent = SyncAgent::new(transport, config);
        let report = apply_fetch(&mut store, agent.fetch().await)
            .with_context(|| format!("Sync with {} failed", config.endpoint))?;
        println!(
            "Fetched {} records, added {} new quotes",
            report.fetched, report.added
        );
    }

    Ok(())
}

fn print_list(store: &QuoteStore, category: &str) {
    let view = list_view(store, category);
    println!("{}", view.title());
    if let Some(message) = &view.empty_message {
        println!("  {message}");
    }
    for quote in &view.quotes {
        println!("  {quote}");
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}

/// Drive one app session: apply finished network work, run scheduled syncs,
/// draw, and dispatch key presses.
async fn run_app<B, T, C>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    agent: &mut SyncAgent<T>,
    clock: &C,
    event_reader: &mut dyn EventReader,
) -> Result<()>
where
    B: ratatui::backend::Backend,
    B::Error: Send + Sync + 'static,
    T: Transport,
    C: Clock,
{
    loop {
        while let Some(message) = agent.try_recv() {
            app.apply_sync_message(message);
        }

        if agent.tick(clock.now()) {
            app.on_sync_started();
        }
        app.sync_state = agent.state();
        app.prune_notifications(chrono::Utc::now());

        terminal
            .draw(|f| ui::render(f, app))
            .context("Failed to draw terminal UI")?;

        // Short timeout so sync results and ticks are picked up promptly
        let event = match event_reader.read_event(Duration::from_millis(100))? {
            Some(e) => e,
            None => {
                // Let spawned network tasks make progress between polls
                tokio::task::yield_now().await;
                continue;
            }
        };

        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.handle_key(key) {
                Some(Effect::SyncNow) => {
                    agent.start_sync();
                    app.on_sync_started();
                }
                Some(Effect::Push(quote)) => agent.start_push(quote),
                None => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
