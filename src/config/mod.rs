// src/config/mod.rs

//! Configuration loading and validation for webforge.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like target-chain correctness (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ActionConfig, ActionKind, ActionOptions, Config, TargetConfig, TaskConfig};
pub use validate::validate_config;
