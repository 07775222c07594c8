//! Probe command: inspect an executable
use anyhow::Result;
use pppm_core::probe;
use pppm_schema::Architecture;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct ProbeReport {
    path: PathBuf,
    machine: String,
    architecture: Option<Architecture>,
    version: Option<String>,
}

/// Print machine type, architecture and file version of `exe`
pub fn probe(exe: &Path, json: bool) -> Result<()> {
    let machine = probe::read_machine_type(exe)?;
    let architecture = Architecture::from_machine(machine);
    let version = match probe::read_file_version(exe) {
        Ok(v) => Some(v.to_string()),
        Err(e) => {
            tracing::debug!("{e}");
            None
        }
    };

    let report = ProbeReport {
        path: exe.to_path_buf(),
        machine: format!("{machine:#06x}"),
        architecture: (!architecture.is_native()).then_some(architecture),
        version,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let label_width = 14;
        println!("{:<label_width$}{}", "Machine:", report.machine);
        println!(
            "{:<label_width$}{}",
            "Architecture:",
            report
                .architecture
                .map_or("unknown", |a| a.as_str())
        );
        println!(
            "{:<label_width$}{}",
            "Version:",
            report.version.as_deref().unwrap_or("unknown")
        );
    }
    Ok(())
}
