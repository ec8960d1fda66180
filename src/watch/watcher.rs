// src/watch/watcher.rs

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::BuildOverrides;
use crate::context::BuildContext;
use crate::watch::state::RebuildGate;

/// Watch the config file and every source directory, triggering full
/// rebuilds on change.
///
/// The event loop is single-threaded; rebuilds run as separate tokio tasks
/// and signal completion through a channel, so at most one rebuild is in
/// flight at any time. The loop runs until ctrl-c.
pub async fn run_watch_loop(
    config_path: PathBuf,
    overrides: BuildOverrides,
    ctx: Arc<BuildContext>,
) -> Result<()> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if event_tx.send(res).is_err() {
                // Loop is gone; nothing useful left to do in the callback.
                eprintln!("webforge: watch loop closed, dropping event");
            }
        },
        Config::default(),
    )?;

    let config_abs = std::path::absolute(&config_path)
        .with_context(|| format!("resolving config path {:?}", config_path))?;
    watcher
        .watch(&config_abs, RecursiveMode::NonRecursive)
        .with_context(|| format!("watching config file {:?}", config_abs))?;

    // The registry is owned by this loop exclusively; directory creations
    // and removals mutate it as events arrive.
    let mut registry: HashSet<PathBuf> = HashSet::new();
    for dir in &ctx.src_dirs {
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("watching source directory {:?}", dir))?;
        registry.insert(dir.clone());
    }

    info!(dirs = registry.len(), "watching source tree for changes");

    let (done_tx, mut done_rx) = mpsc::channel::<()>(1);
    let mut gate = RebuildGate::new();

    loop {
        tokio::select! {
            maybe_event = event_rx.recv() => {
                let Some(res) = maybe_event else {
                    debug!("watch event channel closed");
                    break;
                };

                match res {
                    Ok(event) => {
                        handle_directory_event(&mut watcher, &mut registry, &event);

                        if gate.try_start() {
                            spawn_rebuild(config_path.clone(), overrides.clone(), done_tx.clone());
                        }
                    }
                    Err(err) => error!(error = %err, "file watch error"),
                }
            }
            _ = done_rx.recv() => {
                gate.finish();
                debug!("rebuild finished, watcher idle again");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down watch mode");
                break;
            }
        }
    }

    Ok(())
}

/// Keep the watch registry in sync with directory churn: newly created
/// directories are subscribed, removed directories are evicted.
fn handle_directory_event(
    watcher: &mut RecommendedWatcher,
    registry: &mut HashSet<PathBuf>,
    event: &Event,
) {
    for path in &event.paths {
        match event.kind {
            EventKind::Create(_) => {
                if path.is_dir() && !registry.contains(path) {
                    if let Err(err) = watcher.watch(path, RecursiveMode::NonRecursive) {
                        warn!(dir = ?path, error = %err, "could not watch new directory");
                        continue;
                    }
                    registry.insert(path.clone());
                    debug!(dir = ?path, "added directory to watch registry");
                }
            }
            EventKind::Remove(_) => {
                if registry.remove(path) {
                    let _ = watcher.unwatch(path);
                    debug!(dir = ?path, "evicted directory from watch registry");
                }
            }
            _ => {}
        }
    }
}

/// Launch one asynchronous full rebuild; `done_tx` flips the gate back to
/// idle when it completes, successfully or not.
fn spawn_rebuild(config_path: PathBuf, overrides: BuildOverrides, done_tx: mpsc::Sender<()>) {
    info!("source change detected, rebuilding");
    tokio::spawn(async move {
        if let Err(err) = crate::build_once(&config_path, &overrides).await {
            error!(error = %err, "rebuild failed");
        }
        let _ = done_tx.send(()).await;
    });
}
