// src/resolve/overlay.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::context::BuildContext;
use crate::resolve::glob::{path_str, resolve_globs};

/// Merge per-layer glob results across a target chain.
///
/// For each layer in chain order (base first), globs are resolved rooted at
/// `src_dir/<layer>` and each match is keyed by its path relative to that
/// root. The first layer to produce a key fixes its position in the output;
/// every later layer producing the same key replaces the stored absolute
/// path. The result is "base template with per-target overrides".
pub fn overlay_files(
    chain: &[String],
    src_dir: &Path,
    index: &[PathBuf],
    globs: &[String],
) -> Vec<PathBuf> {
    let mut by_key: HashMap<String, PathBuf> = HashMap::new();
    let mut key_order: Vec<String> = Vec::new();

    for layer in chain {
        let layer_root = src_dir.join(layer);
        let root_rendered = path_str(&layer_root);

        for file in resolve_globs(globs, &layer_root, index) {
            let rendered = path_str(&file);
            let key = rendered
                .strip_prefix(&root_rendered)
                .unwrap_or(&rendered)
                .to_string();

            if !by_key.contains_key(&key) {
                key_order.push(key.clone());
            }
            by_key.insert(key, file);
        }
    }

    key_order
        .iter()
        .map(|key| by_key[key].clone())
        .collect()
}

/// Resolve the initial file list for one task against the active context.
pub fn overlay_task_files(ctx: &BuildContext, globs: &[String]) -> Vec<PathBuf> {
    overlay_files(&ctx.chain, &ctx.src_dir, &ctx.src_files, globs)
}
