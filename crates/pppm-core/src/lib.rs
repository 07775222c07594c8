//! pppm engine core
//!
//! Session-scoped target application resolution and script standard
//! negotiation. Hosts drive everything through a [`SessionRegistry`]:
//!
//! ```text
//! SessionRegistry::get_or_create(key) -> Session
//!     TargetApp::hosted_in(session)
//!         .initialize(module)   meta comment -> negotiate -> repository -> exports
//!         .activate()           swap default repositories, mark current
//!         .get_architecture()   probe / declared default / prompt
//! ```

pub mod compat;
pub mod context;
pub mod error;
pub mod host;
pub mod meta;
pub mod module;
pub mod packages;
pub mod paths;
pub mod probe;
pub mod repository;
pub mod session;
pub mod target_app;

pub use context::EngineContext;
pub use error::{
    Error, IncompatibilityReason, IncompatibleScriptError, InitializationError, MetaError,
    ModuleError, ProbeError, Result, StateError,
};
pub use host::{Host, NullHost};
pub use meta::MetaDocument;
pub use module::{ExportedFunction, ModuleHandle, ModuleSystem, ScriptModuleSystem};
pub use packages::{InstalledPackages, MemoryPackageStore, Package};
pub use repository::{PackageRepository, RepositoryFactory, RepositoryKind, RepositoryTable};
pub use session::{Session, SessionKey, SessionRegistry};
pub use target_app::{TARGET_MODULE_SUFFIX, TargetApp};

use pppm_schema::Version;

/// Version of this engine.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Script standard this engine is compatible with, unless overridden in the
/// [`EngineContext`].
pub const COMPATIBLE_SCRIPT_STANDARD: Version = Version::new(1, 0, 0);
