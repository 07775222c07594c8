//! Installation scopes for packages.
//!
//! A concrete package lives in exactly one [`InstallScope`]. Queries and
//! enumeration take a [`ScopeSet`] so callers can ask for global and local
//! packages at once.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Where a single package is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallScope {
    /// Central location chosen by the target application, shared by the current user.
    Global,
    /// Specific to the current working directory, if the target application supports it.
    Local,
}

impl fmt::Display for InstallScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// A set of [`InstallScope`]s.
///
/// # Example
///
/// ```
/// use pppm_schema::{InstallScope, ScopeSet};
///
/// let both = InstallScope::Global | InstallScope::Local;
/// assert!(both.contains(InstallScope::Local));
/// assert_eq!(both, ScopeSet::ALL);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScopeSet {
    global: bool,
    local: bool,
}

impl ScopeSet {
    /// No scope.
    pub const NONE: Self = Self {
        global: false,
        local: false,
    };
    /// Global and local.
    pub const ALL: Self = Self {
        global: true,
        local: true,
    };

    /// Whether `scope` is part of the set.
    pub fn contains(self, scope: InstallScope) -> bool {
        match scope {
            InstallScope::Global => self.global,
            InstallScope::Local => self.local,
        }
    }

    /// Add a scope to the set.
    pub fn with(mut self, scope: InstallScope) -> Self {
        match scope {
            InstallScope::Global => self.global = true,
            InstallScope::Local => self.local = true,
        }
        self
    }

    /// Whether the set is empty.
    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

impl From<InstallScope> for ScopeSet {
    fn from(scope: InstallScope) -> Self {
        Self::NONE.with(scope)
    }
}

impl BitOr for ScopeSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            global: self.global || rhs.global,
            local: self.local || rhs.local,
        }
    }
}

impl BitOr for InstallScope {
    type Output = ScopeSet;

    fn bitor(self, rhs: Self) -> ScopeSet {
        ScopeSet::from(self).with(rhs)
    }
}

impl BitOr<InstallScope> for ScopeSet {
    type Output = Self;

    fn bitor(self, rhs: InstallScope) -> Self {
        self.with(rhs)
    }
}
