// src/archive.rs

//! Zip archiving of the final build output.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::FileOptions;

use crate::context::BuildContext;

/// Package the build directory into a zip archive at `out_path`, entry
/// names relative to the build dir. Any failure abandons the archive.
pub fn create_zip(ctx: &BuildContext, out_path: &Path) -> Result<()> {
    info!(archive = ?out_path, "creating build archive");

    let file = File::create(out_path)
        .with_context(|| format!("creating zip file at {:?}", out_path))?;
    let mut writer = ZipWriter::new(file);

    for entry in WalkDir::new(&ctx.build_dir) {
        let entry = entry.with_context(|| format!("walking {:?}", ctx.build_dir))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let data = fs::read(entry.path())
            .with_context(|| format!("reading {:?} for the archive", entry.path()))?;
        let name = entry
            .path()
            .strip_prefix(&ctx.build_dir)
            .with_context(|| format!("relativizing {:?}", entry.path()))?
            .to_string_lossy()
            .replace('\\', "/");

        writer
            .start_file(name.clone(), FileOptions::default())
            .with_context(|| format!("adding '{}' to the archive", name))?;
        writer
            .write_all(&data)
            .with_context(|| format!("writing '{}' to the archive", name))?;
    }

    writer.finish().context("finalizing the zip archive")?;
    info!(archive = ?out_path, "archive created");
    Ok(())
}
