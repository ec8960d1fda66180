// src/actions/mod.rs

//! The action pipeline and its built-in handlers.
//!
//! Every handler follows the same contract: `(input files, options) ->
//! output files`. Handlers may read and write the filesystem and may fail;
//! failures are logged and produce a best-effort (possibly empty or
//! pass-through) result so downstream actions still receive a usable list.
//! A failing action never aborts the surrounding task.

pub mod cmd;
pub mod collate;
pub mod concat;
pub mod js_minify;
pub mod sass;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::config::model::{ActionKind, ActionOptions, TaskConfig};
use crate::context::BuildContext;
use crate::resolve::overlay::overlay_task_files;

/// Run one task's pipeline: resolve its file list, then fold the actions in
/// declared order, each consuming the previous action's output.
pub async fn run_pipeline(ctx: Arc<BuildContext>, name: &str, task: &TaskConfig) -> Vec<PathBuf> {
    let start = Instant::now();

    let mut files = overlay_task_files(&ctx, &task.globs);

    for action in &task.actions {
        files = dispatch(action.action, files, &action.options, &ctx).await;
    }

    info!(
        task = %name,
        elapsed_ms = start.elapsed().as_millis() as u64,
        files = files.len(),
        "task completed"
    );
    files
}

/// Map an action kind to its handler.
pub async fn dispatch(
    kind: ActionKind,
    files: Vec<PathBuf>,
    options: &ActionOptions,
    ctx: &Arc<BuildContext>,
) -> Vec<PathBuf> {
    match kind {
        ActionKind::Collate => collate::run(files, options, ctx),
        ActionKind::Concat => concat::run(files, options, ctx),
        ActionKind::JsMinify => js_minify::run(files, options, ctx).await,
        ActionKind::Sass => sass::run(files, options, ctx).await,
        ActionKind::Cmd => cmd::run(files, options).await,
    }
}

/// String option, or `None` when absent or not a string.
pub(crate) fn opt_str(options: &ActionOptions, key: &str) -> Option<String> {
    options
        .get(key)
        .and_then(|value| value.as_str())
        .map(|s| s.to_string())
}

/// String-array option, or `None` when absent or when any element is not a
/// string.
pub(crate) fn opt_str_list(options: &ActionOptions, key: &str) -> Option<Vec<String>> {
    let values = options.get(key)?.as_array()?;
    values
        .iter()
        .map(|value| value.as_str().map(|s| s.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(raw: &str) -> ActionOptions {
        toml::from_str(raw).unwrap()
    }

    #[test]
    fn opt_str_rejects_non_strings() {
        let opts = options(r#"output = 3"#);
        assert_eq!(opt_str(&opts, "output"), None);
        assert_eq!(opt_str(&opts, "missing"), None);
    }

    #[test]
    fn opt_str_list_requires_all_strings() {
        let opts = options(r#"args = ["-a", "-b"]"#);
        assert_eq!(
            opt_str_list(&opts, "args"),
            Some(vec!["-a".to_string(), "-b".to_string()])
        );

        let mixed = options(r#"args = ["-a", 2]"#);
        assert_eq!(opt_str_list(&mixed, "args"), None);
    }
}
