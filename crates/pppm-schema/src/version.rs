//! Version parsing and classification
//!
//! A raw version string falls into exactly one class:
//! - Semantic: `1`, `1.2`, `1.2.3` (dots or spaces between components)
//! - Latest: the literal `latest`, in any case
//! - Special: any other non-empty string (`nightly`, `v2-beta`), an opaque tag

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Errors produced by [`Version::parse`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    /// The input was empty or whitespace only.
    #[error("Empty version string")]
    Empty,

    /// A component is not a non-negative integer.
    #[error("Invalid version component '{component}' in '{input}'")]
    InvalidComponent {
        /// The full input string.
        input: String,
        /// The offending component.
        component: String,
    },

    /// More than three numeric components were given.
    #[error("Too many version components in '{0}' (expected at most major.minor.patch)")]
    TooManyComponents(String),
}

/// Errors produced by [`VersionClass::classify`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// Empty strings carry no version information and are rejected.
    #[error("Cannot classify an empty version string")]
    Empty,
}

/// A `major.minor.patch` triple, ordered numerically component by component.
///
/// # Example
///
/// ```
/// use pppm_schema::Version;
///
/// let v: Version = "1.2".parse().unwrap();
/// assert_eq!(v, Version::new(1, 2, 0));
/// assert!(v < Version::new(1, 10, 0));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Version {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch (build) component.
    pub patch: u32,
}

impl Version {
    /// Comparable stand-in for `latest`. It is only a comparison bound:
    /// whether a string meant `latest` is carried by [`VersionClass::Latest`].
    pub const LATEST: Self = Self::new(u32::MAX, 0, 0);

    /// Create a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse dot-or-space separated components. Missing minor/patch are zero.
    ///
    /// # Errors
    ///
    /// Returns [`VersionParseError`] if the string is empty, has a component
    /// that is not a non-negative integer, or has more than three components.
    pub fn parse(text: &str) -> Result<Self, VersionParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let mut parts = [0u32; 3];
        let mut count = 0;
        for component in trimmed.split(['.', ' ']).filter(|c| !c.is_empty()) {
            if count == parts.len() {
                return Err(VersionParseError::TooManyComponents(text.to_string()));
            }
            let invalid = || VersionParseError::InvalidComponent {
                input: text.to_string(),
                component: component.to_string(),
            };
            // u32::from_str would also accept a leading '+'
            if !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            parts[count] = component.parse().map_err(|_| invalid())?;
            count += 1;
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Classification of a raw version string.
///
/// Special versions are opaque: they only compare equal to the same raw
/// string and are never ordered against anything, so `partial_cmp` returns
/// `None` for any pair involving a special version unless both are identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionClass {
    /// Parses into a numeric triple.
    Semantic(Version),
    /// The literal `latest`.
    Latest,
    /// Any other non-empty tag, kept verbatim.
    Special(String),
}

impl VersionClass {
    /// Classify a raw version string.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Empty`] for empty or whitespace-only input.
    ///
    /// # Example
    ///
    /// ```
    /// use pppm_schema::VersionClass;
    ///
    /// assert!(VersionClass::classify("LATEST").unwrap().is_latest());
    /// assert!(VersionClass::classify("nightly").unwrap().is_special());
    /// ```
    pub fn classify(text: &str) -> Result<Self, ClassifyError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ClassifyError::Empty);
        }
        if let Ok(version) = Version::parse(trimmed) {
            return Ok(Self::Semantic(version));
        }
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        Ok(Self::Special(text.to_string()))
    }

    /// The comparable version, with `latest` mapped to [`Version::LATEST`].
    /// Special versions have none.
    pub fn version(&self) -> Option<Version> {
        match self {
            Self::Semantic(v) => Some(*v),
            Self::Latest => Some(Version::LATEST),
            Self::Special(_) => None,
        }
    }

    /// Whether the string parsed into a numeric triple.
    pub fn is_semantic(&self) -> bool {
        matches!(self, Self::Semantic(_))
    }

    /// Whether the string was the literal `latest`.
    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }

    /// Whether the string is an opaque tag.
    pub fn is_special(&self) -> bool {
        matches!(self, Self::Special(_))
    }
}

impl PartialOrd for VersionClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Special(a), Self::Special(b)) => (a == b).then_some(Ordering::Equal),
            (Self::Special(_), _) | (_, Self::Special(_)) => None,
            (Self::Latest, Self::Latest) => Some(Ordering::Equal),
            (Self::Latest, Self::Semantic(_)) => Some(Ordering::Greater),
            (Self::Semantic(_), Self::Latest) => Some(Ordering::Less),
            (Self::Semantic(a), Self::Semantic(b)) => Some(a.cmp(b)),
        }
    }
}

impl fmt::Display for VersionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Semantic(v) => write!(f, "{v}"),
            Self::Latest => f.write_str("latest"),
            Self::Special(tag) => f.write_str(tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_triple() {
        assert_eq!(Version::parse("1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(Version::parse("1.2.3").unwrap().to_string(), "1.2.3");
    }

    #[test]
    fn test_parse_partial_and_space_separated() {
        assert_eq!(Version::parse("1").unwrap(), Version::new(1, 0, 0));
        assert_eq!(Version::parse("1.0").unwrap(), Version::new(1, 0, 0));
        assert_eq!(Version::parse("4 2 1").unwrap(), Version::new(4, 2, 1));
        assert_eq!(Version::parse(" 2.5 ").unwrap().to_string(), "2.5.0");
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Version::parse(""), Err(VersionParseError::Empty));
        assert!(matches!(
            Version::parse("latest"),
            Err(VersionParseError::InvalidComponent { .. })
        ));
        assert!(Version::parse("1.x").is_err());
        assert!(Version::parse("-1.0").is_err());
        assert!(Version::parse("+1.0").is_err());
        assert!(matches!(
            Version::parse("1.2.3.4"),
            Err(VersionParseError::TooManyComponents(_))
        ));
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert!(Version::new(1, 10, 0) > Version::new(1, 9, 9));
        assert!(Version::new(2, 0, 0) > Version::new(1, 99, 99));
        assert!(Version::new(1, 0, 1) > Version::new(1, 0, 0));
    }

    #[test]
    fn test_classify_latest_any_case() {
        assert_eq!(VersionClass::classify("latest"), Ok(VersionClass::Latest));
        assert_eq!(VersionClass::classify("LATEST"), Ok(VersionClass::Latest));
        assert_eq!(VersionClass::classify("Latest"), Ok(VersionClass::Latest));
    }

    #[test]
    fn test_classify_semantic_and_special() {
        assert_eq!(
            VersionClass::classify("1.2"),
            Ok(VersionClass::Semantic(Version::new(1, 2, 0)))
        );
        assert_eq!(
            VersionClass::classify("nightly"),
            Ok(VersionClass::Special("nightly".to_string()))
        );
    }

    #[test]
    fn test_classify_empty_is_rejected() {
        assert_eq!(VersionClass::classify(""), Err(ClassifyError::Empty));
        assert_eq!(VersionClass::classify("   "), Err(ClassifyError::Empty));
    }

    #[test]
    fn test_latest_is_greater_than_semantic() {
        let latest = VersionClass::Latest;
        for v in ["0.0.1", "1.0", "999.999.999"] {
            let semantic = VersionClass::classify(v).unwrap();
            assert!(latest > semantic, "latest should beat {v}");
        }
        assert_eq!(VersionClass::Latest.version(), Some(Version::LATEST));
    }

    #[test]
    fn test_max_major_is_an_ordinary_version() {
        let v = Version::parse("4294967295.0.0").unwrap();
        assert_eq!(v.to_string(), "4294967295.0.0");
        assert_eq!(
            VersionClass::classify("4294967295.0.0"),
            Ok(VersionClass::Semantic(v))
        );
        assert!(VersionClass::Latest > VersionClass::Semantic(v));
    }

    #[test]
    fn test_special_is_unordered() {
        let special = VersionClass::classify("nightly").unwrap();
        let semantic = VersionClass::classify("1.0").unwrap();
        assert_eq!(special.partial_cmp(&semantic), None);
        assert_eq!(special.partial_cmp(&VersionClass::Latest), None);
        assert!(!(special < semantic) && !(special > semantic));

        let same = VersionClass::classify("nightly").unwrap();
        assert_eq!(special.partial_cmp(&same), Some(Ordering::Equal));
        let other = VersionClass::classify("beta").unwrap();
        assert_eq!(special.partial_cmp(&other), None);
    }
}
