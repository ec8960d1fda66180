// src/actions/collate.rs

//! Relocate matched source files into a parallel tree under the build
//! directory, copying bytes verbatim.

use std::fs;
use std::path::PathBuf;

use tracing::error;

use crate::config::model::ActionOptions;
use crate::context::BuildContext;
use crate::resolve::glob::path_str;

use super::opt_str;

/// For each input, strip the matched `src/<target>` segment, recompute the
/// path under the build directory (plus the optional `output` subdirectory),
/// create intervening directories and copy the file.
///
/// An input already inside the build directory is a configuration mistake;
/// it is logged and skipped. Per-file copy failures are likewise isolated.
pub fn run(files: Vec<PathBuf>, options: &ActionOptions, ctx: &BuildContext) -> Vec<PathBuf> {
    if files.is_empty() {
        return files;
    }

    let build_dir = ctx.build_dir_str();
    let output_root = match opt_str(options, "output") {
        Some(sub) => format!("{build_dir}{sub}"),
        None => build_dir.clone(),
    };

    let mut output = Vec::with_capacity(files.len());

    for file in files {
        let rendered = path_str(&file);
        if rendered.starts_with(&build_dir) {
            error!(
                file = %rendered,
                "cannot pass a build directory file to the collate action"
            );
            continue;
        }

        let relative = ctx.strip_target_path(&rendered);
        let dest = PathBuf::from(format!("{output_root}{relative}"));

        if let Some(parent) = dest.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                error!(dir = ?parent, error = %err, "could not create build subdirectory");
                continue;
            }
        }

        match fs::copy(&file, &dest) {
            Ok(_) => output.push(dest),
            Err(err) => {
                error!(file = %rendered, error = %err, "could not copy file into build tree");
            }
        }
    }

    output
}
