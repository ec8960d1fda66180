// src/config/validate.rs

use anyhow::{Result, anyhow};

use crate::config::model::Config;
use crate::errors::SetupError;
use crate::resolve::target::resolve_chain;

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - there is at least one task
/// - the source and build directories differ
/// - every target dependency refers to an existing target
/// - the configured target exists and its chain terminates without cycles
///
/// It does **not** touch the filesystem; whether `src_dir` exists is checked
/// when the build context is prepared.
pub fn validate_config(cfg: &Config) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_directories(cfg)?;
    validate_target_dependencies(cfg)?;
    resolve_chain(&cfg.target, &cfg.targets)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &Config) -> Result<()> {
    if cfg.tasks.is_empty() {
        return Err(anyhow!(
            "config must contain at least one [tasks.<name>] section"
        ));
    }
    Ok(())
}

fn validate_directories(cfg: &Config) -> Result<()> {
    if cfg.src_dir == cfg.build_dir {
        return Err(SetupError::SourceEqualsBuild(cfg.src_dir.clone().into()).into());
    }
    Ok(())
}

fn validate_target_dependencies(cfg: &Config) -> Result<()> {
    for (name, target) in cfg.targets.iter() {
        if let Some(dep) = &target.dependency {
            if !cfg.targets.contains_key(dep) {
                return Err(anyhow!(
                    "target '{}' has unknown dependency '{}'",
                    name,
                    dep
                ));
            }
            if dep == name {
                return Err(SetupError::CyclicTargetDependency(name.clone()).into());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config(target: &str) -> Config {
        toml::from_str(&format!(
            r#"
            src_dir = "src"
            build_dir = "build"
            target = "{target}"

            [targets.common]

            [targets.special]
            dependency = "common"

            [tasks.copy]
            globs = ["/**/*.txt"]
            "#
        ))
        .unwrap()
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate_config(&base_config("special")).is_ok());
    }

    #[test]
    fn missing_target_is_a_setup_error() {
        let err = validate_config(&base_config("nope")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::TargetNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn source_equals_build_is_rejected() {
        let mut cfg = base_config("common");
        cfg.build_dir = cfg.src_dir.clone();
        let err = validate_config(&cfg).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::SourceEqualsBuild(_))
        ));
    }

    #[test]
    fn unknown_dependency_is_rejected() {
        let mut cfg = base_config("common");
        cfg.targets.get_mut("special").unwrap().dependency = Some("ghost".into());
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn empty_task_set_is_rejected() {
        let mut cfg = base_config("common");
        cfg.tasks.clear();
        assert!(validate_config(&cfg).is_err());
    }
}
