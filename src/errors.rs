// src/errors.rs

//! Structured errors for the setup-fatal failure class.
//!
//! Everything else in the crate propagates through `anyhow`; these variants
//! exist so the CLI exit path (and tests) can tell setup failures apart from
//! ordinary task noise.

use std::path::PathBuf;

use thiserror::Error;

pub use anyhow::Result;

/// Failures that abort a run before any task starts.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("target '{0}' is not defined in the configuration")]
    TargetNotFound(String),

    #[error("cyclic target dependency detected at '{0}'")]
    CyclicTargetDependency(String),

    #[error("source directory {0:?} does not exist")]
    MissingSourceDir(PathBuf),

    #[error("source directory cannot be the same as the build directory ({0:?})")]
    SourceEqualsBuild(PathBuf),
}
