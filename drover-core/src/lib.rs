//! Drover core library — progress reporting for long-running operations.
//!
//! The main entry point is [`select::select`], which picks one
//! [`progress::ProgressReporter`] for the current environment. Hosts that
//! want motion while opaque work runs drive it from a [`ticker::Ticker`].

pub mod config;
pub mod error;
pub mod format;
pub mod output;
pub mod progress;
pub mod render;
pub mod select;
pub mod ticker;
