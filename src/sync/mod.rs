//! # Sync Module
//!
//! Keeps the local quote store in step with a remote endpoint.
//!
//! ## Protocol
//!
//! 1. `GET <endpoint>` returns a list of records with at least a `title`
//! 2. Up to `max_remote_records` records become quotes in the `server` category
//! 3. Unseen quotes are merged into the store (dedup by `(text, category)`)
//! 4. `POST <endpoint>` with `{title, body, userId}` pushes a locally added quote
//!
//! Fetches run once at startup and then on a fixed interval.

pub mod agent;
pub mod transport;

pub use agent::{
    apply_fetch, map_records, Clock, SyncAgent, SyncMessage, SyncReport, SyncSchedule, SyncState,
    SystemClock,
};
pub use transport::{HttpTransport, OutgoingRecord, RemoteRecord, Transport};
