// src/resolve/glob.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::error;

/// Placeholder so the single-star replacement doesn't eat `**`.
const DOUBLE_STAR_PLACEHOLDER: &str = "__double-star-placeholder__";

/// Path rendered with forward slashes, the form all matching works on.
pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Translate a shell-style glob into an anchored [`Regex`].
///
/// Rules, applied in order:
/// - literal `.` is escaped
/// - `**` matches any run of characters, including path separators
/// - a remaining single `*` matches any run of characters excluding `/`
/// - the pattern is anchored at the end of the string
///
/// A leading `!` (exclusion) must be stripped by the caller before
/// translation.
pub fn compile_glob(pattern: &str) -> Result<Regex> {
    let mut translated = pattern.replace('.', "\\.");
    translated = translated.replace("**", DOUBLE_STAR_PLACEHOLDER);
    translated = translated.replace('*', "[^/]*");
    translated = translated.replace(DOUBLE_STAR_PLACEHOLDER, ".*");
    translated.push('$');

    Regex::new(&translated).with_context(|| format!("invalid glob pattern '{pattern}'"))
}

/// Apply an ordered glob list over the precomputed file index, rooted at
/// `base_dir`.
///
/// Inclusion globs append every index path that starts with `base_dir` and
/// whose suffix (relative to the base) matches. Exclusion globs (leading
/// `!`) remove matching paths from the results accumulated *so far in this
/// call* — an exclusion placed before its inclusion is a no-op, and that
/// ordering sensitivity is deliberate.
///
/// A glob that fails to compile is logged and skipped; resolution continues
/// with the remaining entries.
pub fn resolve_globs(globs: &[String], base_dir: &Path, index: &[PathBuf]) -> Vec<PathBuf> {
    let base = path_str(base_dir);
    let mut found: Vec<PathBuf> = Vec::new();

    for raw in globs {
        let (pattern, exclusion) = match raw.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (raw.as_str(), false),
        };

        let regex = match compile_glob(pattern) {
            Ok(r) => r,
            Err(err) => {
                error!(glob = %raw, error = %err, "skipping glob that does not compile");
                continue;
            }
        };

        if exclusion {
            found.retain(|path| {
                let rendered = path_str(path);
                match rendered.strip_prefix(&base) {
                    Some(suffix) => !regex.is_match(suffix),
                    None => true,
                }
            });
        } else {
            for path in index {
                let rendered = path_str(path);
                if let Some(suffix) = rendered.strip_prefix(&base) {
                    if !suffix.is_empty() && regex.is_match(suffix) {
                        found.push(path.clone());
                    }
                }
            }
        }
    }

    found
}
