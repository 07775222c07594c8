//! Installed package queries
//!
//! A target application reports its installed packages through
//! [`InstalledPackages`]. Where the packages actually live is up to the
//! backing store; [`MemoryPackageStore`] keeps them in memory.

use parking_lot::RwLock;
use pppm_schema::{
    InstallScope, PackageName, PartialPackageReference, ScopeSet, Version, VersionClass,
};
use serde::Serialize;

/// An installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    /// Package name.
    pub name: PackageName,
    /// Raw version text.
    pub version: String,
    /// The one scope the package is installed in.
    pub scope: InstallScope,
    /// Short name of the target application the package belongs to.
    pub target_app: String,
}

impl Package {
    /// Create a package record.
    pub fn new(name: &str, version: &str, scope: InstallScope, target_app: &str) -> Self {
        Self {
            name: PackageName::new(name),
            version: version.to_string(),
            scope,
            target_app: target_app.to_string(),
        }
    }

    /// Semantic version of the package, if its version parses.
    pub fn semantic_version(&self) -> Option<Version> {
        Version::parse(&self.version).ok()
    }
}

/// Installed package queries of a target application.
pub trait InstalledPackages: Send + Sync {
    /// Find an installed package matching `reference` within `scope`.
    fn try_get_installed_package(
        &self,
        reference: &PartialPackageReference,
        scope: ScopeSet,
    ) -> Option<Package>;

    /// Visit installed packages within `scope` until `visitor` returns `false`.
    fn enumerate_installed_packages(
        &self,
        scope: ScopeSet,
        visitor: &mut dyn FnMut(&Package) -> bool,
    );
}

/// In-memory backing store. Packages are visited in insertion order.
#[derive(Debug, Default)]
pub struct MemoryPackageStore {
    packages: RwLock<Vec<Package>>,
}

impl MemoryPackageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an installed package, replacing one with the same name, version and scope.
    pub fn insert(&self, package: Package) {
        let mut packages = self.packages.write();
        packages.retain(|p| {
            !(p.name == package.name && p.version == package.version && p.scope == package.scope)
        });
        packages.push(package);
    }

    /// Number of recorded packages.
    pub fn len(&self) -> usize {
        self.packages.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.packages.read().is_empty()
    }
}

impl InstalledPackages for MemoryPackageStore {
    fn try_get_installed_package(
        &self,
        reference: &PartialPackageReference,
        scope: ScopeSet,
    ) -> Option<Package> {
        let packages = self.packages.read();
        let candidates: Vec<&Package> = packages
            .iter()
            .filter(|p| p.name == reference.name && scope.contains(p.scope))
            .collect();

        let found = match reference.version_class() {
            // No version or `latest`: the highest semantic version, else anything
            None | Some(VersionClass::Latest) => candidates
                .iter()
                .filter_map(|p| p.semantic_version().map(|v| (v, *p)))
                .max_by_key(|(v, _)| *v)
                .map(|(_, p)| p)
                .or_else(|| candidates.first().copied()),
            Some(VersionClass::Semantic(wanted)) => candidates
                .iter()
                .copied()
                .find(|p| p.semantic_version() == Some(wanted)),
            Some(VersionClass::Special(tag)) => {
                candidates.iter().copied().find(|p| p.version == tag)
            }
        };
        found.cloned()
    }

    fn enumerate_installed_packages(
        &self,
        scope: ScopeSet,
        visitor: &mut dyn FnMut(&Package) -> bool,
    ) {
        let packages = self.packages.read();
        for package in packages.iter().filter(|p| scope.contains(p.scope)) {
            if !visitor(package) {
                break;
            }
        }
    }
}
