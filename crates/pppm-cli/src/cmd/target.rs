//! Target command: initialize and activate a target application
use crate::cmd::{Engine, Globals};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use pppm_core::{TargetApp, paths};
use pppm_schema::Architecture;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct TargetReport {
    short_name: String,
    module: PathBuf,
    requires: String,
    default_repository: String,
    default_architecture: Architecture,
    architecture: Architecture,
    executable: PathBuf,
    app_root: PathBuf,
    version: Option<String>,
    working_directory: PathBuf,
    default_repositories: Vec<String>,
}

/// Resolve a module argument: an existing path, or a short name under the pppm home.
fn resolve_module(module: &str) -> Result<PathBuf> {
    let path = Path::new(module);
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    let home = paths::try_pppm_home().context("Cannot determine the pppm home directory")?;
    Ok(paths::target_module_path(&home, module))
}

/// Initialize the target application in `module`, make it current and report it
pub fn target(globals: &Globals, module: &str, json: bool) -> Result<()> {
    let path = resolve_module(module)?;
    let engine = Engine::open(globals);

    let app = Arc::new(TargetApp::hosted_in(&engine.session));
    app.initialize(&path)?;
    let app = app.activate()?;
    let architecture = app.get_architecture()?;
    let version = app.get_version().ok().map(|v| v.to_string());

    let report = TargetReport {
        short_name: app.short_name()?.to_string(),
        module: app.module_path()?.to_path_buf(),
        requires: app.requirement()?.to_string(),
        default_repository: app.default_repository_ref()?.to_string(),
        default_architecture: app.default_architecture()?,
        architecture,
        executable: app.executable()?.to_path_buf(),
        app_root: app.app_root()?.to_path_buf(),
        version,
        working_directory: engine.session.working_directory(),
        default_repositories: engine.repositories.defaults(),
    };
    tracing::debug!("{} sessions open", engine.registry.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let label_width = 14;
    println!();
    println!("{}", report.short_name.as_str().bold());
    println!();
    println!("{:<label_width$}{}", "Module:", report.module.display());
    println!("{:<label_width$}{}", "Requires:", report.requires);
    println!("{:<label_width$}{}", "Repository:", report.default_repository);
    println!("{:<label_width$}{}", "Architecture:", report.architecture);
    println!("{:<label_width$}{}", "Executable:", report.executable.display());
    println!("{:<label_width$}{}", "App root:", report.app_root.display());
    println!(
        "{:<label_width$}{}",
        "Version:",
        report.version.as_deref().unwrap_or("unknown")
    );
    println!(
        "{:<label_width$}{}",
        "Workdir:",
        report.working_directory.display()
    );
    println!();
    println!("{}", format!("{} is now the current target application", report.short_name).dark_grey());
    Ok(())
}
