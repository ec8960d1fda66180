// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Loosely typed options bag attached to each action.
///
/// Values are whatever TOML allows; actions pick out the strings and string
/// arrays they care about and log anything malformed.
pub type ActionOptions = BTreeMap<String, toml::Value>;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// src_dir = "src"
/// build_dir = "build"
/// target = "special"
///
/// [targets.common]
///
/// [targets.special]
/// dependency = "common"
///
/// [tasks.styles]
/// globs = ["/css/**/*.scss", "!/css/vendor/*.scss"]
///
/// [[tasks.styles.actions]]
/// action = "sass"
/// ```
///
/// Glob patterns are matched against paths relative to a target layer root,
/// so they start with a `/`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Source tree root; each target contributes the layer `src_dir/<name>`.
    pub src_dir: String,

    /// Output root. Cleared and regenerated on every run.
    pub build_dir: String,

    /// Name of the target to build. Must be a key of `targets`.
    pub target: String,

    /// All targets from `[targets.<name>]`.
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,

    /// All tasks from `[tasks.<name>]`.
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskConfig>,
}

/// `[targets.<name>]` section.
///
/// A target has at most one dependency, so targets form a chain rather than
/// a general graph: the dependency's layer is merged underneath this one.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TargetConfig {
    #[serde(default)]
    pub dependency: Option<String>,
}

/// `[tasks.<name>]` section: a glob-selected file set plus an ordered action
/// pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Ordered glob list. A leading `!` marks an exclusion, which only
    /// removes files matched by earlier entries in the same list.
    #[serde(default)]
    pub globs: Vec<String>,

    /// Actions executed in declared order; each receives the previous
    /// action's output file list.
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

/// One `[[tasks.<name>.actions]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionConfig {
    pub action: ActionKind,

    #[serde(default)]
    pub options: ActionOptions,
}

/// The fixed set of action kinds.
///
/// An unrecognised tag fails deserialization, so a typo in the config is a
/// load-time error rather than a silently skipped pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Relocate matched files into a parallel tree under the build dir.
    Collate,
    /// Join input file contents into one output file.
    Concat,
    /// Minify each input file independently.
    JsMinify,
    /// Compile stylesheets in place under the build tree.
    Sass,
    /// Run an external command with templated arguments.
    Cmd,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_tags_use_kebab_case() {
        let cfg: Config = toml::from_str(
            r#"
            src_dir = "src"
            build_dir = "build"
            target = "common"

            [targets.common]

            [tasks.scripts]
            globs = ["/js/**/*.js"]

            [[tasks.scripts.actions]]
            action = "js-minify"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.tasks["scripts"].actions[0].action, ActionKind::JsMinify);
    }

    #[test]
    fn unknown_action_kind_fails_deserialization() {
        let res: Result<Config, _> = toml::from_str(
            r#"
            src_dir = "src"
            build_dir = "build"
            target = "common"

            [targets.common]

            [tasks.scripts]

            [[tasks.scripts.actions]]
            action = "does-not-exist"
            "#,
        );

        assert!(res.is_err());
    }
}
