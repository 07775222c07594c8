//! Status command
use crate::cmd::Globals;
use anyhow::Result;
use crossterm::style::Stylize;
use pppm_core::paths;

/// Show engine version, script standard and installed target modules
pub fn status(globals: &Globals) -> Result<()> {
    let label_width = 12;
    let home = paths::try_pppm_home();
    let targets = home
        .as_deref()
        .map(paths::discover_target_modules)
        .unwrap_or_default();

    println!();
    println!("{}", "Engine status".dark_grey());
    println!();
    println!("{:<label_width$}{}", "Version:", env!("PPPM_VERSION"));
    println!("{:<label_width$}{}", "Engine:", pppm_core::ENGINE_VERSION);
    println!("{:<label_width$}{}", "Standard:", globals.standard());
    println!(
        "{:<label_width$}{}",
        "Home:",
        home.as_ref()
            .map_or_else(|| "unknown".to_string(), |h| h.display().to_string())
    );
    println!("{:<label_width$}{} found", "Targets:", targets.len());

    for module in &targets {
        let name = module
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.get(..n.len() - pppm_core::TARGET_MODULE_SUFFIX.len()))
            .unwrap_or_default();
        println!("  {} {}", name.cyan(), module.display().to_string().dark_grey());
    }
    println!();
    Ok(())
}
