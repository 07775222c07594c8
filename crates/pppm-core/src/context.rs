//! Shared engine context.
//!
//! Groups the collaborators every session needs (module system, repository
//! factory, compatible script standard) so they are injected once into the
//! [`SessionRegistry`](crate::SessionRegistry) instead of threaded through each call.

use crate::COMPATIBLE_SCRIPT_STANDARD;
use crate::module::ModuleSystem;
use crate::repository::RepositoryFactory;
use pppm_schema::Version;
use std::fmt;
use std::sync::Arc;

/// Collaborators shared by all sessions of a registry.
#[derive(Clone)]
pub struct EngineContext {
    /// Imports and unloads target application modules.
    pub modules: Arc<dyn ModuleSystem>,
    /// Builds default repositories from their references.
    pub repositories: Arc<dyn RepositoryFactory>,
    /// Script standard target application modules are negotiated against.
    pub compatible_standard: Version,
}

impl fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineContext")
            .field("compatible_standard", &self.compatible_standard)
            .finish_non_exhaustive()
    }
}

impl EngineContext {
    /// Context negotiating against [`COMPATIBLE_SCRIPT_STANDARD`].
    pub fn new(modules: Arc<dyn ModuleSystem>, repositories: Arc<dyn RepositoryFactory>) -> Self {
        Self {
            modules,
            repositories,
            compatible_standard: COMPATIBLE_SCRIPT_STANDARD,
        }
    }

    /// Negotiate modules against `standard` instead of the built-in one.
    pub fn with_compatible_standard(mut self, standard: Version) -> Self {
        self.compatible_standard = standard;
        self
    }
}
