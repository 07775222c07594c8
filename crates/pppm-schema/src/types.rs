use crate::version::{Version, VersionClass};
use serde::{Deserialize, Serialize};

/// Package name, compared case-insensitively by storing it lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageName(String);

impl PackageName {
    /// Lowercase `name`.
    pub fn new(name: &str) -> Self {
        Self(name.to_lowercase())
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.to_lowercase()
    }
}

/// A package reference that may leave the version open: `vvvv.dx11` or
/// `vvvv.dx11@1.3`, `vvvv.dx11@latest`, `vvvv.dx11@develop`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartialPackageReference {
    /// Referred package.
    pub name: PackageName,
    /// Raw version text, if any.
    pub version: Option<String>,
}

impl PartialPackageReference {
    /// Reference a package by name only.
    pub fn new(name: &str) -> Self {
        Self {
            name: PackageName::new(name),
            version: None,
        }
    }

    /// Reference a package by name and raw version text.
    pub fn with_version(name: &str, version: &str) -> Self {
        Self {
            name: PackageName::new(name),
            version: Some(version.to_string()),
        }
    }

    /// Parse a reference like `name` or `name@version`.
    ///
    /// # Errors
    ///
    /// Returns an error string if the name or the version after `@` is empty.
    pub fn parse(spec: &str) -> Result<Self, String> {
        match spec.split_once('@') {
            Some((name, _)) if name.is_empty() => {
                Err("Invalid package reference: missing package name".to_string())
            }
            Some((_, version)) if version.is_empty() => {
                Err("Invalid package reference: missing version after @".to_string())
            }
            Some((name, version)) => Ok(Self::with_version(name, version)),
            None if spec.is_empty() => {
                Err("Invalid package reference: missing package name".to_string())
            }
            None => Ok(Self::new(spec)),
        }
    }

    /// Classification of the version, `None` when no version was given.
    pub fn version_class(&self) -> Option<VersionClass> {
        self.version
            .as_deref()
            .and_then(|v| VersionClass::classify(v).ok())
    }

    /// The semantic version of this reference, with `latest` mapped to the
    /// unbounded sentinel. `None` for special or missing versions.
    pub fn semantic_version(&self) -> Option<Version> {
        self.version_class().and_then(|class| class.version())
    }

    /// Does the reference point to the latest version?
    pub fn is_latest(&self) -> bool {
        self.version_class()
            .is_some_and(|class| class.is_latest())
    }

    /// Is the version an opaque, non-semantic tag?
    pub fn is_special_version(&self) -> bool {
        self.version_class()
            .is_some_and(|class| class.is_special())
    }
}

impl std::fmt::Display for PartialPackageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{v}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
