// src/resolve/mod.rs

//! File-set resolution for a build target.
//!
//! Three stages, each independently testable:
//! - `target`: walk a target's single-parent dependency chain into an
//!   ordered list of layers.
//! - `glob`: translate shell-style glob strings into regexes and apply
//!   inclusion/exclusion over the precomputed source index.
//! - `overlay`: merge per-layer glob results so more specific layers
//!   override same-named files from the base layers.

pub mod glob;
pub mod overlay;
pub mod target;

pub use glob::{compile_glob, resolve_globs};
pub use overlay::{overlay_files, overlay_task_files};
pub use target::resolve_chain;
