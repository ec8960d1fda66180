// src/actions/sass.rs

//! Compile stylesheets: relocate inputs into the build tree, compile each
//! one independently, then remove the intermediate source files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::error;

use crate::config::model::ActionOptions;
use crate::context::BuildContext;
use crate::resolve::glob::path_str;

use super::collate;

/// Relocate inputs via the collate action, then fan out one compile unit per
/// relocated file. Each unit removes any stale companion source map, invokes
/// the compiler and writes the `.css` output adjacent to its input.
///
/// The relocated source files (and their maps) are deleted afterwards
/// regardless of compile success, so source-format files never leak into the
/// build tree.
pub async fn run(
    files: Vec<PathBuf>,
    options: &ActionOptions,
    ctx: &Arc<BuildContext>,
) -> Vec<PathBuf> {
    if files.is_empty() {
        return files;
    }

    let relocated = collate::run(files, options, ctx);

    let mut handles = Vec::with_capacity(relocated.len());
    for file in relocated.clone() {
        handles.push(tokio::task::spawn_blocking(move || compile_file(&file)));
    }

    let mut output = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(Ok(path)) => output.push(path),
            Ok(Err(err)) => error!(error = %err, "stylesheet compilation failed"),
            Err(err) => error!(error = %err, "sass worker panicked"),
        }
    }

    for file in &relocated {
        let _ = fs::remove_file(file);
        let _ = fs::remove_file(source_map_path(file));
    }

    output
}

fn compile_file(file: &Path) -> Result<PathBuf> {
    // A stale map from a previous run must not shadow this compile.
    let _ = fs::remove_file(source_map_path(file));

    let css = compile_stylesheet(file)?;

    let dest = file.with_extension("css");
    fs::write(&dest, css).with_context(|| format!("writing {:?}", dest))?;
    Ok(dest)
}

/// Delegated compiler boundary.
fn compile_stylesheet(file: &Path) -> Result<String> {
    grass::from_path(file, &grass::Options::default())
        .map_err(|err| anyhow!("compiling {:?}: {err}", file))
}

fn source_map_path(file: &Path) -> PathBuf {
    PathBuf::from(format!("{}.map", path_str(file)))
}
