//! # Sync Agent
//!
//! Fetches remote records on a schedule and pushes newly added quotes.
//!
//! Network work runs on spawned tokio tasks that never touch the store; their
//! results come back as [`SyncMessage`]s over a channel and are applied by the
//! owner of the store (the event loop). Overlapping fetches are allowed: each
//! carries its own snapshot and merging is idempotent.

use super::transport::{OutgoingRecord, RemoteRecord, Transport};
use crate::config::Config;
use crate::error::QuoteError;
use crate::quote::{Quote, QuoteStore};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Whether a fetch is currently in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
}

/// Source of the current time for the sync schedule
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Fixed-interval schedule. The first poll is always due (sync at startup).
#[derive(Debug, Clone)]
pub struct SyncSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl SyncSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true when a run is due at `now`, and schedules the next one
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now < due => false,
            _ => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }

    /// Time left before the next run (zero if one is due)
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or_default()
    }
}

/// Result of a network task, delivered to the store owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncMessage {
    /// A fetch finished; `Ok` holds the mapped candidates
    Fetched(Result<Vec<Quote>, QuoteError>),
    /// A push finished
    Pushed {
        quote: Quote,
        result: Result<(), QuoteError>,
    },
}

/// Outcome of merging one fetched snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub fetched: usize,
    pub added: usize,
}

/// Map remote records to quotes: `title` becomes the text, `category` is fixed.
///
/// At most `limit` records are considered; records with a blank title are dropped.
pub fn map_records(records: Vec<RemoteRecord>, limit: usize, category: &str) -> Vec<Quote> {
    records
        .into_iter()
        .take(limit)
        .filter_map(|r| Quote::new(&r.title, category).ok())
        .collect()
}

/// Merge a fetched snapshot into the store
pub fn apply_fetch(
    store: &mut QuoteStore,
    fetched: Result<Vec<Quote>, QuoteError>,
) -> Result<SyncReport, QuoteError> {
    let candidates = fetched?;
    let fetched = candidates.len();
    let added = store.merge(candidates)?;
    tracing::info!(fetched, added, "sync merged");
    Ok(SyncReport { fetched, added })
}

pub struct SyncAgent<T: Transport> {
    transport: Arc<T>,
    limit: usize,
    category: String,
    schedule: Option<SyncSchedule>,
    in_flight: usize,
    tx: UnboundedSender<SyncMessage>,
    rx: UnboundedReceiver<SyncMessage>,
}

impl<T: Transport> SyncAgent<T> {
    /// Build an agent from config. The schedule is disabled when
    /// `sync_enabled` is false; manual syncs still work.
    pub fn new(transport: T, config: &Config) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            transport: Arc::new(transport),
            limit: config.max_remote_records,
            category: config.remote_category.clone(),
            schedule: config
                .sync_enabled
                .then(|| SyncSchedule::new(config.sync_interval())),
            in_flight: 0,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> SyncState {
        if self.in_flight > 0 {
            SyncState::Syncing
        } else {
            SyncState::Idle
        }
    }

    pub fn schedule(&self) -> Option<&SyncSchedule> {
        self.schedule.as_ref()
    }

    /// Fetch and map remote records without touching any store
    pub async fn fetch(&self) -> Result<Vec<Quote>, QuoteError> {
        fetch_quotes(self.transport.as_ref(), self.limit, &self.category).await
    }

    /// Start a fetch if the schedule says one is due. Returns true if started.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = self
            .schedule
            .as_mut()
            .is_some_and(|schedule| schedule.poll(now));
        if due {
            self.start_sync();
        }
        due
    }

    /// Spawn a fetch task. Must be called inside a tokio runtime.
    pub fn start_sync(&mut self) {
        self.in_flight += 1;
        tracing::debug!(in_flight = self.in_flight, "sync started");

        let transport = Arc::clone(&self.transport);
        let limit = self.limit;
        let category = self.category.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = fetch_quotes(transport.as_ref(), limit, &category).await;
            // Receiver gone means the app is shutting down
            let _ = tx.send(SyncMessage::Fetched(result));
        });
    }

    /// Spawn a best-effort push of `quote`. Must be called inside a tokio runtime.
    pub fn start_push(&self, quote: Quote) {
        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let record = OutgoingRecord::from(&quote);
            let result = transport.submit_record(&record).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "push failed");
            }
            let _ = tx.send(SyncMessage::Pushed { quote, result });
        });
    }

    /// Next finished task, if any, without waiting
    pub fn try_recv(&mut self) -> Option<SyncMessage> {
        let message = self.rx.try_recv().ok()?;
        self.account(&message);
        Some(message)
    }

    /// Wait for the next finished task
    pub async fn recv(&mut self) -> Option<SyncMessage> {
        let message = self.rx.recv().await?;
        self.account(&message);
        Some(message)
    }

    fn account(&mut self, message: &SyncMessage) {
        if matches!(message, SyncMessage::Fetched(_)) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
    }
}

async fn fetch_quotes<T: Transport>(
    transport: &T,
    limit: usize,
    category: &str,
) -> Result<Vec<Quote>, QuoteError> {
    match transport.fetch_records().await {
        Ok(records) => Ok(map_records(records, limit, category)),
        Err(e) => {
            tracing::warn!(error = %e, "sync fetch failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> RemoteRecord {
        RemoteRecord {
            id: None,
            title: title.to_string(),
            body: None,
            user_id: None,
        }
    }

    #[test]
    fn test_schedule_first_poll_is_due() {
        let start = Instant::now();
        let mut schedule = SyncSchedule::new(Duration::from_secs(30));

        assert!(schedule.poll(start));
        assert!(!schedule.poll(start + Duration::from_secs(29)));
        assert_eq!(
            schedule.remaining(start + Duration::from_secs(10)),
            Duration::from_secs(20)
        );
        assert!(schedule.poll(start + Duration::from_secs(30)));
        assert!(!schedule.poll(start + Duration::from_secs(31)));
    }

    #[test]
    fn test_map_records_limits_and_labels() {
        let records = vec![record("one"), record("  "), record("three"), record("four")];
        let quotes = map_records(records, 3, "server");

        assert_eq!(
            quotes,
            vec![
                Quote::new("one", "server").unwrap(),
                Quote::new("three", "server").unwrap(),
            ]
        );
    }

    #[test]
    fn test_apply_fetch_error_leaves_store_unchanged() {
        let mut store = QuoteStore::with_quotes(
            Arc::new(crate::storage::MemoryStore::new()),
            vec![Quote::new("A", "x").unwrap()],
        );

        let result = apply_fetch(&mut store, Err(QuoteError::Network("offline".to_string())));
        assert_eq!(result, Err(QuoteError::Network("offline".to_string())));
        assert_eq!(store.len(), 1);
    }
}
