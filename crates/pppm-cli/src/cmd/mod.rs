//! Command implementations

pub mod check;
pub mod classify;
pub mod probe;
pub mod status;
pub mod target;

use crate::host::ConsoleHost;
use pppm_core::{
    COMPATIBLE_SCRIPT_STANDARD, EngineContext, RepositoryTable, ScriptModuleSystem, Session,
    SessionKey, SessionRegistry,
};
use pppm_schema::Version;
use std::path::PathBuf;
use std::sync::Arc;

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub verbose: bool,
    pub workdir: Option<PathBuf>,
    pub standard: Option<Version>,
}

impl Globals {
    /// Standard to negotiate against.
    pub fn standard(&self) -> Version {
        self.standard.unwrap_or(COMPATIBLE_SCRIPT_STANDARD)
    }
}

/// Engine state for one CLI invocation: the process is the only session.
#[derive(Debug)]
pub struct Engine {
    pub registry: SessionRegistry,
    pub repositories: RepositoryTable,
    pub session: Arc<Session>,
}

impl Engine {
    pub fn open(globals: &Globals) -> Self {
        let repositories = RepositoryTable::new();
        let context = EngineContext::new(
            Arc::new(ScriptModuleSystem::new()),
            Arc::new(repositories.clone()),
        )
        .with_compatible_standard(globals.standard());
        let registry = SessionRegistry::new(context);
        let session = registry.get_or_create(
            SessionKey::new(u64::from(std::process::id())),
            Arc::new(ConsoleHost::new(globals.verbose)),
        );
        if let Some(dir) = &globals.workdir {
            session.set_working_directory(dir);
        }
        Self {
            registry,
            repositories,
            session,
        }
    }
}
