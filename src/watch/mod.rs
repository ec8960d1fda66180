// src/watch/mod.rs

//! File watching and rebuild debouncing.
//!
//! This module is responsible for:
//! - Observing the config file and every source directory.
//! - Keeping the directory registry in sync as directories come and go.
//! - Collapsing event bursts into at most one rebuild in flight
//!   (`state::RebuildGate`).
//!
//! It does not know anything about tasks or actions; a rebuild re-runs the
//! whole chain from config loading onwards.

pub mod state;
pub mod watcher;

pub use state::RebuildGate;
pub use watcher::run_watch_loop;
