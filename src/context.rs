// src/context.rs

//! Per-run build context.
//!
//! Constructed from scratch for every run, including every watcher-triggered
//! rebuild; nothing here survives across rebuilds. Read-only once built and
//! shared between tasks behind an `Arc`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::model::Config;
use crate::errors::SetupError;
use crate::resolve::glob::path_str;
use crate::resolve::target::resolve_chain;

/// Process-scoped, read-only state for one build run.
#[derive(Debug)]
pub struct BuildContext {
    /// Absolute source directory.
    pub src_dir: PathBuf,
    /// Absolute build directory.
    pub build_dir: PathBuf,
    /// Active target name.
    pub target: String,
    /// Resolved target chain, base layer first, active target last.
    pub chain: Vec<String>,
    /// Every file under `src_dir`, captured once at setup.
    pub src_files: Vec<PathBuf>,
    /// Every directory under `src_dir` (including the root), for the watcher.
    pub src_dirs: Vec<PathBuf>,

    /// Matches `<src_dir>/(<target>|...)`; stripped from input paths when
    /// computing build-tree output paths.
    target_path_re: Regex,
}

impl BuildContext {
    /// Build a context from a validated config: absolutize directories,
    /// verify the source tree exists, clear the build directory and scan the
    /// source index concurrently.
    pub async fn prepare(cfg: &Config) -> Result<Self> {
        // The chain resolves before any file I/O happens, so a bad target
        // never touches the disk.
        let chain = resolve_chain(&cfg.target, &cfg.targets)?;

        if !Path::new(&cfg.src_dir).is_dir() {
            return Err(SetupError::MissingSourceDir(cfg.src_dir.clone().into()).into());
        }

        // Relative paths in the config (../..) must not leak into path
        // arithmetic later on.
        let src_dir = std::path::absolute(&cfg.src_dir)
            .with_context(|| format!("resolving source directory '{}'", cfg.src_dir))?;
        let build_dir = std::path::absolute(&cfg.build_dir)
            .with_context(|| format!("resolving build directory '{}'", cfg.build_dir))?;

        if src_dir == build_dir {
            return Err(SetupError::SourceEqualsBuild(src_dir).into());
        }

        let (clean_res, scan_res) = tokio::join!(
            tokio::task::spawn_blocking({
                let build_dir = build_dir.clone();
                move || clean_dir(&build_dir)
            }),
            tokio::task::spawn_blocking({
                let src_dir = src_dir.clone();
                move || scan_tree(&src_dir)
            }),
        );
        clean_res.context("build directory cleanup task panicked")??;
        let (src_files, src_dirs) = scan_res.context("source scan task panicked")??;

        debug!(
            files = src_files.len(),
            dirs = src_dirs.len(),
            "source index captured"
        );

        Self::assemble(src_dir, build_dir, cfg, chain, src_files, src_dirs)
    }

    /// Assemble a context from already-resolved parts. Pure; split out of
    /// [`prepare`] so resolution logic can be exercised without a filesystem.
    pub fn assemble(
        src_dir: PathBuf,
        build_dir: PathBuf,
        cfg: &Config,
        chain: Vec<String>,
        src_files: Vec<PathBuf>,
        src_dirs: Vec<PathBuf>,
    ) -> Result<Self> {
        let target_path_re = target_path_regex(&src_dir, cfg.targets.keys())?;

        Ok(Self {
            src_dir,
            build_dir,
            target: cfg.target.clone(),
            chain,
            src_files,
            src_dirs,
            target_path_re,
        })
    }

    /// Remove every `<src_dir>/<target>` segment from a rendered path,
    /// leaving the part that parallels the build tree.
    pub fn strip_target_path(&self, rendered: &str) -> String {
        self.target_path_re.replace_all(rendered, "").into_owned()
    }

    /// Build directory rendered with forward slashes, for path arithmetic.
    pub fn build_dir_str(&self) -> String {
        path_str(&self.build_dir)
    }
}

/// Regex matching the source dir followed by any configured target name.
fn target_path_regex<'a>(
    src_dir: &Path,
    targets: impl Iterator<Item = &'a String>,
) -> Result<Regex> {
    let names: Vec<String> = targets.map(|name| regex::escape(name)).collect();
    let pattern = format!(
        "{}/({})",
        regex::escape(&path_str(src_dir)),
        names.join("|")
    );
    Regex::new(&pattern).context("building target path regex")
}

/// Remove the build directory if it exists.
fn clean_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("clearing build directory {:?}", dir)),
    }
}

/// Walk the source tree, skipping dot-prefixed files and directories,
/// returning the file index and the directory list.
fn scan_tree(root: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    // Lexical order keeps the file index, and with it glob match order,
    // deterministic across runs.
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry.with_context(|| format!("scanning source tree at {:?}", root))?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        } else {
            files.push(entry.into_path());
        }
    }

    Ok((files, dirs))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_string_lossy()
            .starts_with('.')
}
