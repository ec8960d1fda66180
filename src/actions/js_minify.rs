// src/actions/js_minify.rs

//! Minify each input file independently, fanning out one blocking unit per
//! file and joining in input order.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use minify_js::{Session, TopLevelMode, minify};
use tracing::error;

use crate::config::model::ActionOptions;
use crate::context::BuildContext;
use crate::resolve::glob::path_str;

use super::opt_str;

/// Minify every input into the build tree.
///
/// With exactly one input and an `output` option, the result is written to
/// that configured path; otherwise each file gets a derived `name.min.ext`
/// path under the build tree. Per-file failures are logged and simply omit
/// that file from the result; the rest still complete, in their original
/// relative order.
pub async fn run(
    files: Vec<PathBuf>,
    options: &ActionOptions,
    ctx: &Arc<BuildContext>,
) -> Vec<PathBuf> {
    if files.is_empty() {
        return files;
    }

    // The configured output path is only meaningful for a single input.
    let single_output = if files.len() == 1 {
        opt_str(options, "output")
    } else {
        None
    };

    let mut handles = Vec::with_capacity(files.len());
    for file in files {
        let ctx = Arc::clone(ctx);
        let output = single_output.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            minify_file(&file, output.as_deref(), &ctx)
        }));
    }

    let mut output = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(Ok(path)) => output.push(path),
            Ok(Err(err)) => error!(error = %err, "js-minify failed"),
            Err(err) => error!(error = %err, "js-minify worker panicked"),
        }
    }

    output
}

fn minify_file(file: &Path, output: Option<&str>, ctx: &BuildContext) -> Result<PathBuf> {
    let source = fs::read(file).with_context(|| format!("reading {:?}", file))?;
    let minified = minify_bytes(&source).with_context(|| format!("minifying {:?}", file))?;

    let dest = match output {
        Some(configured) => PathBuf::from(format!("{}{}", ctx.build_dir_str(), configured)),
        None => derived_min_path(file, ctx),
    };

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory for {:?}", dest))?;
    }

    fs::write(&dest, &minified).with_context(|| format!("writing {:?}", dest))?;
    Ok(dest)
}

/// Delegated minifier boundary; the pipeline only sees bytes in, bytes out.
fn minify_bytes(source: &[u8]) -> Result<Vec<u8>> {
    let session = Session::new();
    let mut out = Vec::new();
    minify(&session, TopLevelMode::Global, source, &mut out)
        .map_err(|err| anyhow!("minifier error: {err:?}"))?;
    Ok(out)
}

/// Derive `name.min.ext` under the build tree. The target path segment is
/// stripped, and so is any build-dir prefix, because minify can legitimately
/// receive build-tree files produced by an earlier action.
fn derived_min_path(file: &Path, ctx: &BuildContext) -> PathBuf {
    let build_dir = ctx.build_dir_str();
    let mut relative = ctx.strip_target_path(&path_str(file));
    relative = relative.replace(&build_dir, "");

    let (stem, ext) = split_extension(&relative);
    PathBuf::from(format!("{build_dir}{stem}.min{ext}"))
}

/// Split a rendered path into (everything before the extension, extension
/// including its dot). No extension yields an empty second half.
fn split_extension(path: &str) -> (&str, &str) {
    let last_slash = path.rfind('/').map_or(0, |i| i + 1);
    match path[last_slash..].rfind('.') {
        Some(dot) if dot > 0 => path.split_at(last_slash + dot),
        _ => (path, ""),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use crate::config::model::Config;

    use super::*;

    fn context_for(root: &Path) -> Arc<BuildContext> {
        let src = root.join("src");
        let build = root.join("build");
        let cfg: Config = toml::from_str(&format!(
            r#"
            src_dir = "{src}"
            build_dir = "{build}"
            target = "common"

            [targets.common]

            [tasks.scripts]
            globs = ["/**/*.js"]

            [[tasks.scripts.actions]]
            action = "js-minify"
            "#,
            src = path_str(&src),
            build = path_str(&build),
        ))
        .unwrap();

        Arc::new(
            BuildContext::assemble(src, build, &cfg, vec!["common".into()], vec![], vec![])
                .unwrap(),
        )
    }

    #[test]
    fn split_extension_keeps_the_dot_with_the_extension() {
        assert_eq!(split_extension("/js/app.js"), ("/js/app", ".js"));
        assert_eq!(split_extension("/js/Makefile"), ("/js/Makefile", ""));
        assert_eq!(split_extension("/js/a.b.js"), ("/js/a.b", ".js"));
    }

    #[tokio::test]
    async fn derives_min_path_under_the_build_tree() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_for(tmp.path());

        let input = ctx.src_dir.join("common/js/app.js");
        fs::create_dir_all(input.parent().unwrap()).unwrap();
        fs::write(&input, b"let answer = 40 + 2;").unwrap();

        let out = run(vec![input], &BTreeMap::new(), &ctx).await;

        assert_eq!(out, vec![ctx.build_dir.join("js/app.min.js")]);
        assert!(out[0].exists());
    }

    #[tokio::test]
    async fn per_file_failures_are_isolated_and_order_is_kept() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_for(tmp.path());

        let dir = ctx.src_dir.join("common/js");
        fs::create_dir_all(&dir).unwrap();
        let first = dir.join("a.js");
        let third = dir.join("c.js");
        fs::write(&first, b"let a = 1;").unwrap();
        fs::write(&third, b"let c = 3;").unwrap();
        let missing = dir.join("b.js");

        let out = run(vec![first, missing, third], &BTreeMap::new(), &ctx).await;

        assert_eq!(
            out,
            vec![
                ctx.build_dir.join("js/a.min.js"),
                ctx.build_dir.join("js/c.min.js"),
            ]
        );
    }

    #[tokio::test]
    async fn single_input_honours_the_configured_output() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_for(tmp.path());

        let input = ctx.src_dir.join("common/js/app.js");
        fs::create_dir_all(input.parent().unwrap()).unwrap();
        fs::write(&input, b"let x = 1;").unwrap();

        let mut opts = BTreeMap::new();
        opts.insert("output".to_string(), toml::Value::from("/app.packed.js"));

        let out = run(vec![input], &opts, &ctx).await;
        assert_eq!(out, vec![ctx.build_dir.join("app.packed.js")]);
    }
}
