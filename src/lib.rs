//! Quotebook - A small TUI for collecting, filtering and syncing quotations
//!
//! This library provides the quote store and its persistence, the category
//! index, pure display projections, JSON import/export, and a sync agent that
//! keeps the store in step with a remote endpoint.

pub mod config;
pub mod error;
pub mod logging;
pub mod quote;
pub mod storage;
pub mod sync;
pub mod ui;
