//! unisearch - universal search session controller.
//!
//! Keeps a user's search settings in step with a settings store, runs the
//! universal and per-vertical fetches against a search backend and exposes a
//! render-ready view model to the CLI and terminal front ends.

pub mod app;
pub mod breakpoint;
pub mod cli;
pub mod config;
pub mod error;
pub mod highlight;
pub mod modal;
pub mod reactive;
pub mod session;
pub mod settings;
pub mod task;
pub mod teaser;
pub mod test_utils;
pub mod transport;
pub mod tui;
pub mod vertical;

pub use error::{Result, SearchError};
