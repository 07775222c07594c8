//! Shared data model for pppm.
//!
//! Everything in this crate is pure: parsing, classification and ordering
//! over strings and small value types. Filesystem and session concerns live
//! in `pppm-core`.

pub mod arch;
pub mod scope;
pub mod types;
pub mod usage;
pub mod version;

// Re-exports
pub use arch::*;
pub use scope::{InstallScope, ScopeSet};
pub use types::*;
pub use usage::{ScriptRequirement, ScriptUsage, UsageParseError};
pub use version::{ClassifyError, Version, VersionClass, VersionParseError};
