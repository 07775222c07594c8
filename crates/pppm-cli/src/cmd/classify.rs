//! Classify command
use anyhow::{Result, bail};
use crossterm::style::Stylize;
use pppm_schema::VersionClass;

/// Print the class of each version string
pub fn classify(versions: &[String]) -> Result<()> {
    let width = versions.iter().map(String::len).max().unwrap_or(0) + 2;
    let mut failed = 0;

    for raw in versions {
        match VersionClass::classify(raw) {
            Ok(class) => {
                let (kind, comparable) = match &class {
                    VersionClass::Semantic(v) => ("semantic", v.to_string()),
                    VersionClass::Latest => ("latest", "newest available".to_string()),
                    VersionClass::Special(_) => ("special", "unordered".to_string()),
                };
                println!("{raw:<width$}{:<10}{}", kind.cyan(), comparable.dark_grey());
            }
            Err(e) => {
                failed += 1;
                eprintln!("{raw:<width$}{}", e.to_string().red());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} version string(s) could not be classified");
    }
    Ok(())
}
