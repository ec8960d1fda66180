// src/actions/cmd.rs

//! Run an external command with a templated argument list.
//!
//! Two placeholder tokens are recognised: `{FILES}` expands to every input
//! file as separate arguments at that position, and `{FILE}` marks per-file
//! iteration, invoking the command once per input. The two modes are
//! mutually exclusive within one action.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use tracing::{error, warn};

use crate::config::model::ActionOptions;
use crate::resolve::glob::path_str;

use super::{opt_str, opt_str_list};

pub(crate) const FILES_TOKEN: &str = "{FILES}";
pub(crate) const FILE_TOKEN: &str = "{FILE}";

/// Resolve `name` and `args`, expand the argument template and run the
/// command. Process failures are logged; they do not abort the task. The
/// action always yields an empty list, so it is effectively a terminal
/// pipeline step.
pub async fn run(files: Vec<PathBuf>, options: &ActionOptions) -> Vec<PathBuf> {
    let Some(name) = opt_str(options, "name") else {
        error!("cmd action requires a 'name' string option");
        return Vec::new();
    };

    let Some(args) = opt_str_list(options, "args") else {
        error!("cmd action requires an 'args' array of strings");
        return Vec::new();
    };

    match expand_args(&args, &files) {
        Ok(Expansion::Single(argv)) => {
            run_command(&name, &argv).await;
        }
        Ok(Expansion::PerFile(template)) => {
            for file in &files {
                let argv: Vec<String> = template
                    .iter()
                    .map(|arg| {
                        if arg == FILE_TOKEN {
                            path_str(file)
                        } else {
                            arg.clone()
                        }
                    })
                    .collect();
                run_command(&name, &argv).await;
            }
        }
        Err(err) => error!(error = %err, "invalid cmd argument template"),
    }

    Vec::new()
}

/// How a templated argument list should be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Expansion {
    /// One invocation with the fully expanded argument list.
    Single(Vec<String>),
    /// One invocation per input file, substituting `{FILE}` each time.
    PerFile(Vec<String>),
}

/// Expand placeholder tokens in the argument template.
pub(crate) fn expand_args(args: &[String], files: &[PathBuf]) -> Result<Expansion> {
    let has_files = args.iter().any(|arg| arg == FILES_TOKEN);
    let has_file = args.iter().any(|arg| arg == FILE_TOKEN);

    if has_files && has_file {
        return Err(anyhow!(
            "{{FILES}} and {{FILE}} cannot be combined in one cmd action"
        ));
    }

    if has_file {
        return Ok(Expansion::PerFile(args.to_vec()));
    }

    let mut argv = Vec::with_capacity(args.len());
    for arg in args {
        if arg == FILES_TOKEN {
            argv.extend(files.iter().map(|file| path_str(file)));
        } else {
            argv.push(arg.clone());
        }
    }
    Ok(Expansion::Single(argv))
}

async fn run_command(name: &str, args: &[String]) {
    match tokio::process::Command::new(name).args(args).status().await {
        Ok(status) if !status.success() => {
            warn!(cmd = %name, code = ?status.code(), "command exited with failure");
        }
        Ok(_) => {}
        Err(err) => {
            error!(cmd = %name, error = %err, "could not run command");
        }
    }
}
