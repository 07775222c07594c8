//! pppm - target application and script standard tooling
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Command-line front end over `pppm-core`. It plays the role of a host
//! shell: one process is one session, the console is the session's host.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.pppm/             # or $PPPM_HOME
//! └── targets/         # <name>.3pmTarget.psm1 target application modules
//! ```

pub mod cmd;
pub mod host;

use clap::{Parser, Subcommand};
use pppm_schema::{ScriptUsage, Version};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pppm")]
#[command(author, version = env!("PPPM_VERSION"), about = "pppm - package manager engine for host applications")]
pub struct Cli {
    /// Show verbose host messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Working directory override for the session
    #[arg(long, global = true)]
    pub workdir: Option<PathBuf>,

    /// Script standard the engine claims compatibility with
    #[arg(long, global = true, env = "PPPM_COMPATIBLE_STANDARD")]
    pub standard: Option<Version>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show engine version, standard and known target applications
    Status,
    /// Classify version strings as semantic, latest or special
    Classify {
        /// Version strings, e.g. 1.2, latest, develop
        #[arg(required = true)]
        versions: Vec<String>,
    },
    /// Check whether a script's declared standard is supported
    Check {
        /// Script file containing a pppm meta comment
        script: PathBuf,
        /// Usage the script is expected to declare
        #[arg(long, short, default_value = "App")]
        usage: ScriptUsage,
    },
    /// Read architecture and file version of an executable
    Probe {
        /// Executable to inspect
        exe: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Initialize and activate a target application
    Target {
        /// Module path, or short name of a module in $PPPM_HOME/targets
        module: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}
