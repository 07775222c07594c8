//! Package repositories
//!
//! Storage and transport of repositories are not the engine's business. It
//! only constructs a repository from a reference and toggles its
//! registration when the current target application changes.

use parking_lot::RwLock;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A package source.
pub trait PackageRepository: Send + Sync + fmt::Debug {
    /// Reference the repository was created from.
    fn reference(&self) -> &str;

    /// Make the repository available for lookups.
    fn register(&self);

    /// Register and mark as a default lookup source.
    fn register_as_default(&self);

    /// Drop the default mark. The repository stays registered.
    fn unregister_as_default(&self);
}

/// Constructs repositories from references.
pub trait RepositoryFactory: Send + Sync {
    /// Build a repository, or `None` if the reference is not understood.
    fn try_create(&self, reference: &str) -> Option<Arc<dyn PackageRepository>>;
}

/// Kind of repository a reference points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryKind {
    /// Remote git repository (`https://...`, `git@...`, `*.git`).
    Git,
    /// Existing local folder.
    Folder,
}

impl RepositoryKind {
    /// Detect the kind of a reference.
    ///
    /// # Example
    ///
    /// ```
    /// use pppm_core::RepositoryKind;
    ///
    /// assert_eq!(
    ///     RepositoryKind::detect("https://github.com/vvvv/packs.git"),
    ///     Some(RepositoryKind::Git)
    /// );
    /// assert_eq!(RepositoryKind::detect("no such thing"), None);
    /// ```
    pub fn detect(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        let lower = reference.to_lowercase();
        if lower.starts_with("https://")
            || lower.starts_with("http://")
            || lower.starts_with("git@")
            || lower.ends_with(".git")
        {
            return Some(Self::Git);
        }
        Path::new(reference).is_dir().then_some(Self::Folder)
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Git => f.write_str("git"),
            Self::Folder => f.write_str("folder"),
        }
    }
}

#[derive(Debug, Default)]
struct Registrations {
    registered: Vec<String>,
    defaults: Vec<String>,
}

/// Repository factory that records registrations in a shared table.
///
/// Registration is idempotent: registering twice keeps one entry.
#[derive(Debug, Clone, Default)]
pub struct RepositoryTable {
    state: Arc<RwLock<Registrations>>,
}

impl RepositoryTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// References of all registered repositories, in registration order.
    pub fn registered(&self) -> Vec<String> {
        self.state.read().registered.clone()
    }

    /// References of the repositories currently marked as default.
    pub fn defaults(&self) -> Vec<String> {
        self.state.read().defaults.clone()
    }

    /// Whether `reference` is currently a default repository.
    pub fn is_default(&self, reference: &str) -> bool {
        self.state.read().defaults.iter().any(|r| r == reference)
    }
}

impl RepositoryFactory for RepositoryTable {
    fn try_create(&self, reference: &str) -> Option<Arc<dyn PackageRepository>> {
        let kind = RepositoryKind::detect(reference)?;
        Some(Arc::new(TrackedRepository {
            reference: reference.trim().to_string(),
            kind,
            state: Arc::clone(&self.state),
        }))
    }
}

/// A repository created by a [`RepositoryTable`].
#[derive(Debug)]
pub struct TrackedRepository {
    reference: String,
    kind: RepositoryKind,
    state: Arc<RwLock<Registrations>>,
}

impl TrackedRepository {
    /// Kind of the repository.
    pub fn kind(&self) -> RepositoryKind {
        self.kind
    }
}

impl PackageRepository for TrackedRepository {
    fn reference(&self) -> &str {
        &self.reference
    }

    fn register(&self) {
        let mut state = self.state.write();
        if !state.registered.contains(&self.reference) {
            tracing::debug!("Registering {} repository {}", self.kind, self.reference);
            state.registered.push(self.reference.clone());
        }
    }

    fn register_as_default(&self) {
        self.register();
        let mut state = self.state.write();
        if !state.defaults.contains(&self.reference) {
            tracing::debug!("Using {} as default repository", self.reference);
            state.defaults.push(self.reference.clone());
        }
    }

    fn unregister_as_default(&self) {
        let mut state = self.state.write();
        state.defaults.retain(|r| r != &self.reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_git() {
        for r in [
            "https://github.com/vvvv/packs",
            "git@github.com:vvvv/packs.git",
            "file://server/share/packs.git",
        ] {
            assert_eq!(RepositoryKind::detect(r), Some(RepositoryKind::Git), "{r}");
        }
    }

    #[test]
    fn test_detect_folder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();
        assert_eq!(RepositoryKind::detect(path), Some(RepositoryKind::Folder));
        assert_eq!(RepositoryKind::detect(&format!("{path}/missing")), None);
        assert_eq!(RepositoryKind::detect("  "), None);
    }

    #[test]
    fn test_default_registration_is_idempotent() {
        let table = RepositoryTable::new();
        let repo = table.try_create("https://example.com/a.git").unwrap();
        repo.register_as_default();
        repo.register_as_default();
        assert_eq!(table.registered(), vec!["https://example.com/a.git"]);
        assert_eq!(table.defaults(), vec!["https://example.com/a.git"]);

        repo.unregister_as_default();
        assert!(!table.is_default("https://example.com/a.git"));
        assert_eq!(table.registered().len(), 1);
    }

    #[test]
    fn test_unknown_reference() {
        assert!(RepositoryTable::new().try_create("nowhere").is_none());
    }
}
