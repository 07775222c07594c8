//! Check command: negotiate a script's declared standard
use crate::cmd::Globals;
use anyhow::{Context, Result, anyhow};
use crossterm::style::Stylize;
use pppm_core::{MetaDocument, compat};
use pppm_schema::ScriptUsage;
use std::path::Path;

/// Check a script against the engine's compatible standard
pub fn check(globals: &Globals, script: &Path, usage: ScriptUsage) -> Result<()> {
    let source = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read {}", script.display()))?;
    let meta = MetaDocument::from_script(&source)?
        .ok_or_else(|| anyhow!("{} doesn't contain a pppm meta comment", script.display()))?;

    let requirement = compat::negotiate_with(&meta, usage, globals.standard())?;
    tracing::debug!("{} requires {requirement}", script.display());

    println!(
        "{} {} requires {} (engine standard {})",
        "compatible".green(),
        script.display(),
        requirement,
        globals.standard()
    );
    Ok(())
}
