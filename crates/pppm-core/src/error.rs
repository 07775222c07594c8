//! Domain-specific errors for the engine

use pppm_schema::{ScriptUsage, Version, VersionParseError};
use std::path::PathBuf;
use thiserror::Error;

/// The embedded meta comment of a script could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetaError {
    /// The Hjson block inside the comment is malformed.
    #[error("Invalid pppm meta comment: {0}")]
    Parse(String),
}

/// Why a script is not compatible with the engine's script standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompatibilityReason {
    /// No standard string at the expected metadata path.
    StandardUndeterminable,
    /// The standard string is not `<version> <usage>`, or the version does not parse.
    InvalidSyntax,
    /// The usage token is not a known usage tag.
    InvalidUsage,
    /// The script was written for a different usage.
    UsageMismatch {
        /// Usage declared by the script.
        specified: ScriptUsage,
        /// Usage the caller asked for.
        expected: ScriptUsage,
    },
    /// The engine's compatible standard does not satisfy the required one.
    UnsupportedStandard {
        /// Standard the engine is compatible with.
        compatible: Version,
        /// Standard the script requires.
        required: Version,
    },
}

/// A script's declared standard is not satisfied by this engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct IncompatibleScriptError {
    /// Machine-readable reason.
    pub reason: IncompatibilityReason,
    /// Human-readable explanation.
    pub message: String,
}

impl IncompatibleScriptError {
    /// Create an error from a reason and message.
    pub fn new(reason: IncompatibilityReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

/// Module system failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// No module at the given path.
    #[error("Module not found: {0}")]
    NotFound(PathBuf),

    /// The module exists but could not be loaded.
    #[error("Failed to load module {path}: {message}")]
    Load {
        /// Module path.
        path: PathBuf,
        /// Underlying cause.
        message: String,
    },

    /// Unloading a module that is not currently loaded.
    #[error("Module '{0}' is not loaded")]
    NotLoaded(String),
}

/// A target application could not be initialized.
///
/// Failures are permanent for the instance that produced them, so the error
/// is `Clone` and handed back on every later attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitializationError {
    /// The target application was created without a host session.
    #[error("The host session for this target application was not set before initialization")]
    NoHost,

    /// Empty path, wrong naming convention, or missing file.
    #[error("'{0}' does not point to a valid pppm target application module")]
    InvalidModulePath(PathBuf),

    /// The module file exists but could not be read.
    #[error("Failed to read target application module {path}: {message}")]
    Read {
        /// Module path.
        path: PathBuf,
        /// Underlying cause.
        message: String,
    },

    /// The module has no meta comment.
    #[error("Target application module {0} doesn't contain the required meta comment")]
    MissingMeta(PathBuf),

    /// The meta comment is malformed.
    #[error(transparent)]
    Meta(#[from] MetaError),

    /// The module targets an unsupported script standard.
    #[error(transparent)]
    Incompatible(#[from] IncompatibleScriptError),

    /// A required metadata field is absent or empty.
    #[error("Required meta field '{0}' is missing from the target application module")]
    MissingField(&'static str),

    /// The declared default repository could not be constructed.
    #[error("Cannot gather default repository '{reference}' for {app}")]
    Repository {
        /// Short name of the application.
        app: String,
        /// Repository reference from the metadata.
        reference: String,
    },

    /// The declared default architecture is not a known machine type.
    #[error("Invalid default architecture '{0}'")]
    InvalidArchitecture(String),

    /// Importing or unloading the module failed.
    #[error(transparent)]
    Module(#[from] ModuleError),

    /// The module does not export a required variable or function.
    #[error("The {export} {kind} was not exported from the {app} module")]
    MissingExport {
        /// Short name of the application.
        app: String,
        /// Export name as written in the module (`$executable`, `Get-InstalledPacks`).
        export: String,
        /// `variable` or `function`.
        kind: &'static str,
    },

    /// Queried before a successful `initialize`.
    #[error("Target application is not initialized")]
    NotInitialized,
}

/// Architecture or version detection failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The executable does not exist.
    #[error("Executable not found: {0}")]
    NotFound(PathBuf),

    /// The executable could not be read.
    #[error("Failed to read {path}: {message}")]
    Read {
        /// Executable path.
        path: PathBuf,
        /// Underlying cause.
        message: String,
    },

    /// The file ends before the header field being read.
    #[error("{path} is too small to contain a PE header ({len} bytes read, {needed} needed)")]
    Truncated {
        /// Executable path.
        path: PathBuf,
        /// Bytes available.
        len: usize,
        /// Bytes required to reach the field.
        needed: usize,
    },

    /// The executable has no embedded file version resource.
    #[error("{0} has no embedded file version")]
    NoVersionInfo(PathBuf),
}

/// Rejected session state mutations. Reported to the host, never raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Clearing the current target application.
    #[error("Trying to set current target application to nothing. Refused to do that.")]
    ClearCurrentApp,

    /// The working directory override could not be created.
    #[error(
        "Overriding working directory with {path} failed ({message}), previously set or default is used."
    )]
    WorkingDirectory {
        /// Requested directory.
        path: PathBuf,
        /// Underlying cause.
        message: String,
    },
}

/// Any engine error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed version string.
    #[error(transparent)]
    Version(#[from] VersionParseError),

    /// Malformed meta comment.
    #[error(transparent)]
    Meta(#[from] MetaError),

    /// Script standard negotiation failed.
    #[error(transparent)]
    Incompatible(#[from] IncompatibleScriptError),

    /// Target application initialization failed.
    #[error(transparent)]
    Initialization(#[from] InitializationError),

    /// Executable probing failed.
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Session state mutation rejected.
    #[error(transparent)]
    State(#[from] StateError),

    /// Module system failure.
    #[error(transparent)]
    Module(#[from] ModuleError),
}

/// Result alias for engine operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
