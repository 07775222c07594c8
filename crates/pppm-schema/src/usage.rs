//! Script standard declarations.
//!
//! Every pppm script or module declares the standard it was written against
//! as `"<version> <usage>"`, e.g. `"1.0 App"`.

use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a script module is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScriptUsage {
    /// Unclassified script.
    #[default]
    Unknown,
    /// Package script.
    Pack,
    /// Target application module.
    App,
    /// Cached target application module.
    AppCache,
}

/// Returned when a usage token is not one of the known tags.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown script usage: '{0}'")]
pub struct UsageParseError(pub String);

impl ScriptUsage {
    /// Every known usage tag.
    pub const ALL: [Self; 4] = [Self::Unknown, Self::Pack, Self::App, Self::AppCache];

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Pack => "Pack",
            Self::App => "App",
            Self::AppCache => "AppCache",
        }
    }
}

impl fmt::Display for ScriptUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptUsage {
    type Err = UsageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|usage| usage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UsageParseError(s.to_string()))
    }
}

/// The standard a script requires: a version and the usage it was written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptRequirement {
    /// Required script standard version.
    pub version: Version,
    /// Declared usage.
    pub usage: ScriptUsage,
}

impl ScriptRequirement {
    /// Create a requirement from its parts.
    pub fn new(version: Version, usage: ScriptUsage) -> Self {
        Self { version, usage }
    }
}

impl fmt::Display for ScriptRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.version, self.usage)
    }
}
