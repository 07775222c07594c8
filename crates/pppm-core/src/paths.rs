//! Engine home layout and target module discovery

use crate::target_app::TARGET_MODULE_SUFFIX;
use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Returns the pppm home directory, or None if the user's home cannot be resolved.
///
/// `PPPM_HOME` overrides the default `~/.pppm`.
pub fn try_pppm_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("PPPM_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".pppm"))
}

/// Target application modules: <home>/targets
pub fn targets_dir(home: &Path) -> PathBuf {
    home.join("targets")
}

/// Module path of a target application known by short name:
/// <home>/targets/<name>.3pmTarget.psm1
pub fn target_module_path(home: &Path, short_name: &str) -> PathBuf {
    targets_dir(home).join(format!("{short_name}{TARGET_MODULE_SUFFIX}"))
}

/// Whether a path follows the target application module naming convention.
pub fn is_target_module(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| {
            n.len() > TARGET_MODULE_SUFFIX.len()
                && n.to_lowercase()
                    .ends_with(&TARGET_MODULE_SUFFIX.to_lowercase())
        })
}

/// Target application modules found in <home>/targets, sorted by path.
pub fn discover_target_modules(home: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(targets_dir(home)) else {
        return Vec::new();
    };
    let mut modules: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_target_module(p))
        .collect();
    modules.sort();
    modules
}
