//! # UI Module
//!
//! This module provides the terminal user interface components for Quotebook.
//!
//! ## Components
//!
//! - [`App`] - Application state (store, category pickers, input modes, notifications)
//! - [`mod@render`] - Rendering functions that draw the app with ratatui
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Header (count, sync state)          │
//! ├─────────────────────┬───────────────────────────┤
//! │  Random-from picker │                           │
//! │                     │   Quote panel             │
//! ├─────────────────────┤   (random quote or        │
//! │  Filter-list picker │    filtered list)         │
//! │                     │                           │
//! ├─────────────────────┴───────────────────────────┤
//! │           Footer (notification or key hints)     │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod render;

pub use app::{App, Effect};
pub use render::render;
