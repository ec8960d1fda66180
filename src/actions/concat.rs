// src/actions/concat.rs

//! Join input file contents, in list order, into one output file under the
//! build directory.

use std::fs;
use std::path::PathBuf;

use tracing::error;

use crate::config::model::ActionOptions;
use crate::context::BuildContext;

use super::opt_str;

/// Concatenate all inputs with the configured `separator` (default newline)
/// into the `output` path, prefixed with the build directory.
///
/// - Empty input: nothing is written and the input passes through.
/// - Missing `output` option: logged, input passes through.
/// - Unreadable input: logged, the step yields an empty list.
/// - Directory/write failure on the output side: logged, input passes
///   through.
pub fn run(files: Vec<PathBuf>, options: &ActionOptions, ctx: &BuildContext) -> Vec<PathBuf> {
    if files.is_empty() {
        return files;
    }

    let separator = opt_str(options, "separator").unwrap_or_else(|| "\n".to_string());

    let Some(output) = opt_str(options, "output") else {
        error!("no output file defined for the concat action, skipping");
        return files;
    };
    let output = PathBuf::from(format!("{}{}", ctx.build_dir_str(), output));

    let mut joined: Vec<u8> = Vec::new();
    for (i, file) in files.iter().enumerate() {
        let content = match fs::read(file) {
            Ok(content) => content,
            Err(err) => {
                error!(file = ?file, error = %err, "could not read input for the concat action");
                return Vec::new();
            }
        };

        if i > 0 {
            joined.extend_from_slice(separator.as_bytes());
        }
        joined.extend_from_slice(&content);
    }

    if let Some(parent) = output.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            error!(dir = ?parent, error = %err, "could not create directory for concat output");
            return files;
        }
    }

    if let Err(err) = fs::write(&output, &joined) {
        error!(file = ?output, error = %err, "could not write concat output");
        return files;
    }

    vec![output]
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::Path;

    use tempfile::TempDir;

    use crate::config::model::Config;
    use crate::context::BuildContext;
    use crate::resolve::glob::path_str;

    use super::*;

    fn context_for(root: &Path) -> BuildContext {
        let src = root.join("src");
        let build = root.join("build");
        let cfg: Config = toml::from_str(&format!(
            r#"
            src_dir = "{src}"
            build_dir = "{build}"
            target = "common"

            [targets.common]

            [tasks.bundle]
            globs = ["/**/*"]

            [[tasks.bundle.actions]]
            action = "concat"
            "#,
            src = path_str(&src),
            build = path_str(&build),
        ))
        .unwrap();

        BuildContext::assemble(src, build, &cfg, vec!["common".into()], vec![], vec![]).unwrap()
    }

    fn output_opts(path: &str) -> ActionOptions {
        let mut opts = BTreeMap::new();
        opts.insert("output".to_string(), toml::Value::from(path));
        opts
    }

    #[test]
    fn joins_contents_with_default_newline_separator() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_for(tmp.path());

        let a = tmp.path().join("a.js");
        let b = tmp.path().join("b.js");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();

        let out = run(vec![a, b], &output_opts("/bundle.js"), &ctx);

        assert_eq!(out, vec![ctx.build_dir.join("bundle.js")]);
        assert_eq!(fs::read(&out[0]).unwrap(), b"a\nb");
    }

    #[test]
    fn custom_separator_is_used_between_entries() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_for(tmp.path());

        let a = tmp.path().join("a.js");
        let b = tmp.path().join("b.js");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();

        let mut opts = output_opts("/bundle.js");
        opts.insert("separator".to_string(), toml::Value::from(";"));

        let out = run(vec![a, b], &opts, &ctx);
        assert_eq!(fs::read(&out[0]).unwrap(), b"a;b");
    }

    #[test]
    fn empty_input_writes_nothing_and_passes_through() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_for(tmp.path());

        let out = run(Vec::new(), &output_opts("/bundle.js"), &ctx);
        assert!(out.is_empty());
        assert!(!ctx.build_dir.join("bundle.js").exists());
    }

    #[test]
    fn unreadable_input_empties_the_result() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_for(tmp.path());

        let missing = tmp.path().join("missing.js");
        let out = run(vec![missing], &output_opts("/bundle.js"), &ctx);
        assert!(out.is_empty());
    }

    #[test]
    fn missing_output_option_passes_input_through() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_for(tmp.path());

        let a = tmp.path().join("a.js");
        fs::write(&a, b"a").unwrap();

        let out = run(vec![a.clone()], &BTreeMap::new(), &ctx);
        assert_eq!(out, vec![a]);
    }
}
