// src/resolve/target.rs

use std::collections::{BTreeMap, HashSet};

use crate::config::model::TargetConfig;
use crate::errors::SetupError;

/// Resolve a target's dependency chain into an ordered list of layer names,
/// least specific first, the requested target last.
///
/// Each target has at most one dependency, so this is a linked-list walk
/// rather than a graph traversal. A visited set turns a cyclic chain into a
/// hard error instead of non-termination.
pub fn resolve_chain(
    target: &str,
    targets: &BTreeMap<String, TargetConfig>,
) -> Result<Vec<String>, SetupError> {
    if !targets.contains_key(target) {
        return Err(SetupError::TargetNotFound(target.to_string()));
    }

    let mut chain = vec![target.to_string()];
    let mut seen: HashSet<String> = HashSet::from([target.to_string()]);
    let mut current = target.to_string();

    while let Some(dep) = targets.get(&current).and_then(|t| t.dependency.clone()) {
        if !targets.contains_key(&dep) {
            return Err(SetupError::TargetNotFound(dep));
        }
        if !seen.insert(dep.clone()) {
            return Err(SetupError::CyclicTargetDependency(dep));
        }
        chain.insert(0, dep.clone());
        current = dep;
    }

    Ok(chain)
}
