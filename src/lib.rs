// src/lib.rs

pub mod actions;
pub mod archive;
pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod resolve;
pub mod watch;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::cli::{CliArgs, Command};
use crate::context::BuildContext;
use crate::errors::SetupError;

/// Build settings taken from the CLI rather than the config file.
#[derive(Debug, Clone, Default)]
pub struct BuildOverrides {
    /// Target name overriding the one in the config file.
    pub target: Option<String>,
    /// Where to write a zip archive of the build dir, if anywhere.
    pub zip: Option<PathBuf>,
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - build context setup (clean + source scan)
/// - the task orchestrator
/// - optional zip archiving
/// - (optional) the file watcher
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);

    if let Some(Command::Clean) = args.command {
        return clean(&config_path);
    }

    let overrides = BuildOverrides {
        target: args.target.clone(),
        zip: args.zip.as_deref().map(PathBuf::from),
    };

    // Setup-fatal errors from the first build propagate and exit non-zero;
    // the watcher only takes over after one successful build.
    let ctx = build_once(&config_path, &overrides).await?;

    if args.watch {
        watch::run_watch_loop(config_path, overrides, ctx).await?;
    }

    Ok(())
}

/// Run one full build: load config, apply overrides, prepare a fresh
/// context, run every task concurrently and optionally archive the result.
///
/// The watcher calls this again for every rebuild; nothing is shared with
/// previous runs.
pub async fn build_once(
    config_path: &Path,
    overrides: &BuildOverrides,
) -> Result<Arc<BuildContext>> {
    let start = Instant::now();

    let mut cfg = config::load_and_validate(config_path)?;

    if let Some(target) = &overrides.target {
        if !cfg.targets.contains_key(target) {
            return Err(SetupError::TargetNotFound(target.clone()).into());
        }
        cfg.target = target.clone();
    }

    let ctx = Arc::new(BuildContext::prepare(&cfg).await?);

    info!(target = %ctx.target, "building target");
    engine::run_tasks(Arc::clone(&ctx), &cfg.tasks).await;
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "build completed"
    );

    if let Some(zip_path) = &overrides.zip {
        if let Err(err) = archive::create_zip(&ctx, zip_path) {
            error!(error = %err, "could not create build archive");
        }
    }

    Ok(ctx)
}

/// `clean` subcommand: remove the build directory and exit.
///
/// Uses the raw loader since only `build_dir` matters here.
fn clean(config_path: &Path) -> Result<()> {
    let cfg = config::load_from_path(config_path)?;

    match fs::remove_dir_all(&cfg.build_dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("clearing build directory '{}'", cfg.build_dir))
        }
    }
}
