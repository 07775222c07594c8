//! Target applications
//!
//! A target application is described by a `<name>.3pmTarget.psm1` module:
//! a meta comment declaring its standard, short name, default repository and
//! architecture, plus exported paths and functions. [`TargetApp::initialize`]
//! resolves all of that exactly once per instance; the result, success or
//! failure, is permanent.

use crate::compat;
use crate::error::{Error, InitializationError};
use crate::host::{Host, NullHost, prompt_for};
use crate::meta::MetaDocument;
use crate::module::{ExportedFunction, ModuleHandle};
use crate::packages::{InstalledPackages, Package};
use crate::paths;
use crate::probe;
use crate::repository::PackageRepository;
use crate::session::Session;
use parking_lot::Mutex;
use pppm_schema::{
    Architecture, PartialPackageReference, ScopeSet, ScriptRequirement, ScriptUsage, Version,
};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, Weak};

/// File name suffix of target application modules.
pub const TARGET_MODULE_SUFFIX: &str = ".3pmTarget.psm1";

const EXECUTABLE_EXPORT: &str = "executable";
const APP_ROOT_EXPORT: &str = "appRoot";
const FOLDER_FOR_PACK_EXPORT: &str = "Get-FolderForPack";
const INSTALLED_PACKS_EXPORT: &str = "Get-InstalledPacks";

/// Everything resolved by a successful initialization.
#[derive(Debug)]
struct Loaded {
    module_path: PathBuf,
    requirement: ScriptRequirement,
    short_name: String,
    default_repository_ref: String,
    default_repository: Arc<dyn PackageRepository>,
    default_architecture: Architecture,
    executable: PathBuf,
    app_root: PathBuf,
    get_folder_for_pack: ExportedFunction,
    get_installed_packs: ExportedFunction,
}

/// A host application that pppm manages packages for.
pub struct TargetApp {
    session: Option<Weak<Session>>,
    state: OnceLock<Result<Loaded, InitializationError>>,
    // Native means not resolved yet
    architecture: Mutex<Architecture>,
    packages: Option<Arc<dyn InstalledPackages>>,
}

impl Default for TargetApp {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TargetApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TargetApp");
        match self.state.get() {
            Some(Ok(loaded)) => s
                .field("short_name", &loaded.short_name)
                .field("module_path", &loaded.module_path),
            Some(Err(err)) => s.field("error", err),
            None => s.field("initialized", &false),
        };
        s.field("architecture", &*self.architecture.lock())
            .finish_non_exhaustive()
    }
}

impl TargetApp {
    /// A target application outside any session. It cannot be initialized.
    pub fn new() -> Self {
        Self {
            session: None,
            state: OnceLock::new(),
            architecture: Mutex::new(Architecture::Native),
            packages: None,
        }
    }

    /// A target application owned by `session`.
    pub fn hosted_in(session: &Arc<Session>) -> Self {
        Self {
            session: Some(Arc::downgrade(session)),
            ..Self::new()
        }
    }

    /// Back installed package queries with `store`.
    pub fn with_package_store(mut self, store: Arc<dyn InstalledPackages>) -> Self {
        self.packages = Some(store);
        self
    }

    /// The owning session, if it is still alive.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.session.as_ref()?.upgrade()
    }

    fn host(&self) -> Arc<dyn Host> {
        self.session()
            .map_or_else(|| Arc::new(NullHost) as Arc<dyn Host>, |s| Arc::clone(s.host()))
    }

    /// Load the target application from its module.
    ///
    /// Runs at most once per instance: later calls return the first result
    /// without touching the module again.
    ///
    /// # Errors
    ///
    /// Returns [`InitializationError::NoHost`] without a session, otherwise
    /// the first failing step of the load.
    pub fn initialize(&self, module_path: impl AsRef<Path>) -> Result<&Self, InitializationError> {
        if let Some(state) = self.state.get() {
            return state.as_ref().map(|_| self).map_err(Clone::clone);
        }
        let session = self.session().ok_or(InitializationError::NoHost)?;
        let path = module_path.as_ref();

        let state = self.state.get_or_init(|| {
            let loaded = load(&session, path);
            match &loaded {
                Ok(app) => tracing::debug!(
                    "Initialized target application {} from {}",
                    app.short_name,
                    path.display()
                ),
                Err(e) => tracing::debug!("Failed to initialize {}: {e}", path.display()),
            }
            loaded
        });
        state.as_ref().map(|_| self).map_err(Clone::clone)
    }

    /// Whether [`initialize`](Self::initialize) succeeded.
    pub fn is_initialized(&self) -> bool {
        matches!(self.state.get(), Some(Ok(_)))
    }

    fn loaded(&self) -> Result<&Loaded, InitializationError> {
        match self.state.get() {
            Some(Ok(loaded)) => Ok(loaded),
            Some(Err(err)) => Err(err.clone()),
            None => Err(InitializationError::NotInitialized),
        }
    }

    /// Path of the module the application was loaded from.
    pub fn module_path(&self) -> Result<&Path, InitializationError> {
        Ok(&self.loaded()?.module_path)
    }

    /// Standard the module requires.
    pub fn requirement(&self) -> Result<ScriptRequirement, InitializationError> {
        Ok(self.loaded()?.requirement)
    }

    /// Short name, e.g. `vvvv`.
    pub fn short_name(&self) -> Result<&str, InitializationError> {
        Ok(&self.loaded()?.short_name)
    }

    /// Reference of the default repository as declared.
    pub fn default_repository_ref(&self) -> Result<&str, InitializationError> {
        Ok(&self.loaded()?.default_repository_ref)
    }

    /// The default repository.
    pub fn default_repository(&self) -> Result<&Arc<dyn PackageRepository>, InitializationError> {
        Ok(&self.loaded()?.default_repository)
    }

    /// Architecture used when the executable cannot be probed.
    pub fn default_architecture(&self) -> Result<Architecture, InitializationError> {
        Ok(self.loaded()?.default_architecture)
    }

    /// Main executable of the application.
    pub fn executable(&self) -> Result<&Path, InitializationError> {
        Ok(&self.loaded()?.executable)
    }

    /// Installation root of the application.
    pub fn app_root(&self) -> Result<&Path, InitializationError> {
        Ok(&self.loaded()?.app_root)
    }

    /// Exported `Get-FolderForPack`.
    pub fn get_folder_for_pack(&self) -> Result<&ExportedFunction, InitializationError> {
        Ok(&self.loaded()?.get_folder_for_pack)
    }

    /// Exported `Get-InstalledPacks`.
    pub fn get_installed_packs(&self) -> Result<&ExportedFunction, InitializationError> {
        Ok(&self.loaded()?.get_installed_packs)
    }

    /// Make this the current target application of its session.
    ///
    /// The previous application's default repository is unregistered as
    /// default, this one's is registered, and the application is remembered
    /// by short name. Concurrent activations in one session are serialized.
    ///
    /// # Errors
    ///
    /// Returns [`InitializationError::NoHost`] without a live session and
    /// the initialization error if the application is not initialized.
    pub fn activate(self: &Arc<Self>) -> Result<Arc<Self>, InitializationError> {
        self.loaded()?;
        let session = self.session().ok_or(InitializationError::NoHost)?;
        session.switch_current(self, true)?;
        Ok(Arc::clone(self))
    }

    /// Whether this is the current target application of its session.
    pub fn is_active(&self) -> bool {
        self.session().is_some_and(|s| s.is_current(self))
    }

    /// Architecture of the application, resolved on first use and cached.
    ///
    /// The executable is probed if it exists, otherwise the declared default
    /// is used. If that still leaves it undetermined, the host is asked.
    /// A failed probe is not cached: the declared default is returned and
    /// the next call probes again.
    ///
    /// # Errors
    ///
    /// Fails only if the application is not initialized.
    pub fn get_architecture(&self) -> Result<Architecture, InitializationError> {
        let app = self.loaded()?;
        let mut architecture = self.architecture.lock();
        if !architecture.is_native() {
            return Ok(*architecture);
        }

        let host = self.host();
        let resolved = if app.executable.is_file() {
            match probe::probe_architecture(&app.executable) {
                Ok(probed) => {
                    host.verbose(&format!(
                        "Determining architecture of {} for the first time ({probed})",
                        app.short_name
                    ));
                    probed
                }
                Err(e) => {
                    host.warning(&format!(
                        "Couldn't determine the architecture of {}: {e}",
                        app.short_name
                    ));
                    if !app.default_architecture.is_native() {
                        return Ok(app.default_architecture);
                    }
                    Architecture::Native
                }
            }
        } else {
            app.default_architecture
        };

        *architecture = if resolved.is_native() {
            prompt_for(
                &*host,
                &format!("Please choose an architecture for {}:", app.short_name),
                &format!(
                    "Default architecture for {} was not specified and it can't be automatically determined.",
                    app.short_name
                ),
                &Architecture::SUPPORTED,
                Architecture::X64,
            )
        } else {
            resolved
        };
        tracing::debug!("{} architecture: {}", app.short_name, *architecture);
        Ok(*architecture)
    }

    /// File version of the executable.
    ///
    /// # Errors
    ///
    /// Returns an error if the application is not initialized or the
    /// executable has no readable version resource.
    pub fn get_version(&self) -> Result<Version, Error> {
        let app = self.loaded()?;
        Ok(probe::read_file_version(&app.executable)?)
    }
}

impl InstalledPackages for TargetApp {
    fn try_get_installed_package(
        &self,
        reference: &PartialPackageReference,
        scope: ScopeSet,
    ) -> Option<Package> {
        self.packages
            .as_ref()?
            .try_get_installed_package(reference, scope)
    }

    fn enumerate_installed_packages(
        &self,
        scope: ScopeSet,
        visitor: &mut dyn FnMut(&Package) -> bool,
    ) {
        if let Some(store) = &self.packages {
            store.enumerate_installed_packages(scope, visitor);
        }
    }
}

fn load(session: &Session, path: &Path) -> Result<Loaded, InitializationError> {
    if !paths::is_target_module(path) || !path.is_file() {
        return Err(InitializationError::InvalidModulePath(path.to_path_buf()));
    }
    let source = std::fs::read_to_string(path).map_err(|e| InitializationError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let meta = MetaDocument::from_script(&source)?
        .ok_or_else(|| InitializationError::MissingMeta(path.to_path_buf()))?;

    let context = session.context();
    let requirement = compat::negotiate_with(&meta, ScriptUsage::App, context.compatible_standard)?;

    let short_name = required_field(&meta, "ShortName")?;
    let default_repository_ref = required_field(&meta, "DefaultRepository")?;
    let default_repository = context
        .repositories
        .try_create(&default_repository_ref)
        .ok_or_else(|| InitializationError::Repository {
            app: short_name.clone(),
            reference: default_repository_ref.clone(),
        })?;
    let default_architecture = match meta.get("DefaultArchitecture") {
        Some(value) => parse_architecture(value)?,
        None => Architecture::X64,
    };

    let module = context.modules.import(path)?;
    let exports = Exports::capture(&module, &short_name);
    let unloaded = context.modules.unload(&module);
    let exports = exports?;
    unloaded?;

    Ok(Loaded {
        module_path: path.to_path_buf(),
        requirement,
        short_name,
        default_repository_ref,
        default_repository,
        default_architecture,
        executable: exports.executable,
        app_root: exports.app_root,
        get_folder_for_pack: exports.get_folder_for_pack,
        get_installed_packs: exports.get_installed_packs,
    })
}

fn required_field(meta: &MetaDocument, name: &'static str) -> Result<String, InitializationError> {
    meta.get_str(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(InitializationError::MissingField(name))
}

/// `DefaultArchitecture` is either a name (`x64`) or a raw machine type (`34404`).
fn parse_architecture(value: &Value) -> Result<Architecture, InitializationError> {
    match value {
        Value::String(name) => name
            .parse()
            .map_err(|_| InitializationError::InvalidArchitecture(name.clone())),
        Value::Number(n) => n
            .as_u64()
            .and_then(|m| u16::try_from(m).ok())
            .map(|m| (m, Architecture::from_machine(m)))
            .filter(|(m, arch)| *m == 0 || !arch.is_native())
            .map(|(_, arch)| arch)
            .ok_or_else(|| InitializationError::InvalidArchitecture(n.to_string())),
        other => Err(InitializationError::InvalidArchitecture(other.to_string())),
    }
}

struct Exports {
    executable: PathBuf,
    app_root: PathBuf,
    get_folder_for_pack: ExportedFunction,
    get_installed_packs: ExportedFunction,
}

impl Exports {
    fn capture(module: &ModuleHandle, app: &str) -> Result<Self, InitializationError> {
        let variable = |name: &str| {
            module
                .variable(name)
                .map(PathBuf::from)
                .ok_or_else(|| InitializationError::MissingExport {
                    app: app.to_string(),
                    export: format!("${name}"),
                    kind: "variable",
                })
        };
        let function = |name: &str| {
            module
                .function(name)
                .cloned()
                .ok_or_else(|| InitializationError::MissingExport {
                    app: app.to_string(),
                    export: name.to_string(),
                    kind: "function",
                })
        };
        Ok(Self {
            executable: variable(EXECUTABLE_EXPORT)?,
            app_root: variable(APP_ROOT_EXPORT)?,
            get_folder_for_pack: function(FOLDER_FOR_PACK_EXPORT)?,
            get_installed_packs: function(INSTALLED_PACKS_EXPORT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EngineContext;
    use crate::host::testing::RecordingHost;
    use crate::module::ScriptModuleSystem;
    use crate::packages::MemoryPackageStore;
    use crate::probe::tests::pe_image;
    use crate::repository::RepositoryTable;
    use crate::session::{SessionKey, SessionRegistry};
    use pppm_schema::InstallScope;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        modules: Arc<ScriptModuleSystem>,
        repositories: RepositoryTable,
        host: Arc<RecordingHost>,
        session: Arc<Session>,
        _registry: SessionRegistry,
    }

    fn fixture_with(host: RecordingHost) -> Fixture {
        let modules = Arc::new(ScriptModuleSystem::new());
        let repositories = RepositoryTable::new();
        let context = EngineContext::new(modules.clone(), Arc::new(repositories.clone()))
        .with_compatible_standard(Version::new(1, 1, 0));
        let registry = SessionRegistry::new(context);
        let host = Arc::new(host);
        let session = registry.get_or_create(SessionKey::new(1), host.clone());
        Fixture {
            dir: tempfile::tempdir().unwrap(),
            modules,
            repositories,
            host,
            session,
            _registry: registry,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(RecordingHost::default())
    }

    fn module_source(meta: &str) -> String {
        format!(
            r#"<#
{{
    pppm: "1.0 App"
{meta}
}}
#>
$executable = "$PSScriptRoot/bin/app.exe"
$appRoot = "$PSScriptRoot"

function Get-FolderForPack {{
    param($pack)
    "$appRoot/packs"
}}

function Get-InstalledPacks {{
    Get-ChildItem "$appRoot/packs"
}}
"#
        )
    }

    impl Fixture {
        fn write_module(&self, name: &str, meta: &str) -> PathBuf {
            let path = self.dir.path().join(format!("{name}{TARGET_MODULE_SUFFIX}"));
            std::fs::write(&path, module_source(meta)).unwrap();
            path
        }

        fn app(&self) -> Arc<TargetApp> {
            Arc::new(TargetApp::hosted_in(&self.session))
        }
    }

    const VVVV: &str = r#"    ShortName: vvvv
    DefaultRepository: "https://github.com/vvvv/packs.git""#;

    #[test]
    fn test_initialize_reads_meta_and_exports() {
        let fx = fixture();
        let path = fx.write_module("vvvv", VVVV);
        let app = fx.app();
        app.initialize(&path).unwrap();

        assert!(app.is_initialized());
        assert!(!fx.modules.is_loaded(&path));
        assert_eq!(app.short_name().unwrap(), "vvvv");
        assert_eq!(
            app.default_repository_ref().unwrap(),
            "https://github.com/vvvv/packs.git"
        );
        assert_eq!(app.default_architecture().unwrap(), Architecture::X64);
        assert_eq!(app.app_root().unwrap(), fx.dir.path());
        assert_eq!(
            app.executable().unwrap(),
            fx.dir.path().join("bin/app.exe")
        );
        assert_eq!(app.get_installed_packs().unwrap().name, "Get-InstalledPacks");
        assert_eq!(
            app.requirement().unwrap(),
            ScriptRequirement::new(Version::new(1, 0, 0), ScriptUsage::App)
        );
        // initialization alone registers nothing
        assert!(fx.repositories.registered().is_empty());
    }

    #[test]
    fn test_detached_app_cannot_initialize() {
        let fx = fixture();
        let path = fx.write_module("vvvv", VVVV);
        let app = TargetApp::new();
        assert_eq!(app.initialize(&path).unwrap_err(), InitializationError::NoHost);
        assert_eq!(app.short_name().unwrap_err(), InitializationError::NotInitialized);
    }

    #[test]
    fn test_invalid_module_paths() {
        let fx = fixture();
        let app = fx.app();
        assert!(matches!(
            app.initialize(""),
            Err(InitializationError::InvalidModulePath(_))
        ));

        let fx = fixture();
        let wrong_name = fx.dir.path().join("vvvv.psm1");
        std::fs::write(&wrong_name, module_source(VVVV)).unwrap();
        assert!(matches!(
            fx.app().initialize(&wrong_name),
            Err(InitializationError::InvalidModulePath(_))
        ));

        let missing = fx.dir.path().join(format!("gone{TARGET_MODULE_SUFFIX}"));
        assert!(matches!(
            fx.app().initialize(&missing),
            Err(InitializationError::InvalidModulePath(_))
        ));
    }

    #[test]
    fn test_failure_is_permanent() {
        let fx = fixture();
        let path = fx.dir.path().join(format!("bare{TARGET_MODULE_SUFFIX}"));
        std::fs::write(&path, "$executable = 'x'\n").unwrap();

        let app = fx.app();
        let first = app.initialize(&path).unwrap_err();
        assert!(matches!(first, InitializationError::MissingMeta(_)));

        // fixing the module does not help this instance
        std::fs::write(&path, module_source(VVVV)).unwrap();
        assert_eq!(app.initialize(&path).unwrap_err(), first);
        assert_eq!(app.short_name().unwrap_err(), first);
        assert!(fx.app().initialize(&path).is_ok());
    }

    #[test]
    fn test_second_initialize_is_a_no_op() {
        let fx = fixture();
        let vvvv = fx.write_module("vvvv", VVVV);
        let ue4 = fx.write_module(
            "ue4",
            "    ShortName: ue4\n    DefaultRepository: \"https://example.com/ue4.git\"",
        );
        let app = fx.app();
        app.initialize(&vvvv).unwrap();
        app.initialize(&ue4).unwrap();
        assert_eq!(app.short_name().unwrap(), "vvvv");
    }

    #[test]
    fn test_wrong_usage_is_incompatible() {
        let fx = fixture();
        let path = fx.dir.path().join(format!("pack{TARGET_MODULE_SUFFIX}"));
        std::fs::write(&path, module_source(VVVV).replace("1.0 App", "1.0 Pack")).unwrap();
        assert!(matches!(
            fx.app().initialize(&path),
            Err(InitializationError::Incompatible(_))
        ));
    }

    #[test]
    fn test_missing_fields() {
        let fx = fixture();
        let path = fx.write_module("noname", "    DefaultRepository: \"https://example.com/a.git\"");
        assert_eq!(
            fx.app().initialize(&path).unwrap_err(),
            InitializationError::MissingField("ShortName")
        );

        let path = fx.write_module("norepo", "    ShortName: norepo");
        assert_eq!(
            fx.app().initialize(&path).unwrap_err(),
            InitializationError::MissingField("DefaultRepository")
        );
    }

    #[test]
    fn test_unresolvable_repository() {
        let fx = fixture();
        let path = fx.write_module("vvvv", "    ShortName: vvvv\n    DefaultRepository: nowhere");
        assert_eq!(
            fx.app().initialize(&path).unwrap_err(),
            InitializationError::Repository {
                app: "vvvv".to_string(),
                reference: "nowhere".to_string(),
            }
        );
    }

    #[test]
    fn test_declared_architecture_by_name_and_number() {
        let fx = fixture();
        let named = fx.write_module("named", &format!("{VVVV}\n    DefaultArchitecture: x86"));
        let numbered = fx.write_module("numbered", &format!("{VVVV}\n    DefaultArchitecture: 34404"));
        let bogus = fx.write_module("bogus", &format!("{VVVV}\n    DefaultArchitecture: sparc"));

        assert_eq!(
            fx.app().initialize(&named).unwrap().default_architecture().unwrap(),
            Architecture::X86
        );
        assert_eq!(
            fx.app().initialize(&numbered).unwrap().default_architecture().unwrap(),
            Architecture::X64
        );
        assert_eq!(
            fx.app().initialize(&bogus).unwrap_err(),
            InitializationError::InvalidArchitecture("sparc".to_string())
        );
    }

    #[test]
    fn test_missing_export_still_unloads() {
        let fx = fixture();
        let path = fx.dir.path().join(format!("vvvv{TARGET_MODULE_SUFFIX}"));
        let source = module_source(VVVV).replace("$appRoot = \"$PSScriptRoot\"\n", "");
        std::fs::write(&path, source).unwrap();

        let err = fx.app().initialize(&path).unwrap_err();
        assert_eq!(
            err,
            InitializationError::MissingExport {
                app: "vvvv".to_string(),
                export: "$appRoot".to_string(),
                kind: "variable",
            }
        );
        assert!(!fx.modules.is_loaded(&path));
    }

    #[test]
    fn test_architecture_is_probed_and_cached() {
        let fx = fixture();
        let path = fx.write_module("vvvv", &format!("{VVVV}\n    DefaultArchitecture: x64"));
        std::fs::create_dir_all(fx.dir.path().join("bin")).unwrap();
        let exe = fx.dir.path().join("bin/app.exe");
        std::fs::write(&exe, pe_image(0x80, 0x014c)).unwrap();

        let app = fx.app();
        app.initialize(&path).unwrap();
        assert_eq!(app.get_architecture().unwrap(), Architecture::X86);

        // cached: a different executable is not probed again
        std::fs::write(&exe, pe_image(0x80, 0x8664)).unwrap();
        assert_eq!(app.get_architecture().unwrap(), Architecture::X86);
        assert_eq!(fx.host.verbose.lock().len(), 1);
    }

    #[test]
    fn test_missing_executable_uses_declared_default() {
        let fx = fixture();
        let path = fx.write_module("vvvv", &format!("{VVVV}\n    DefaultArchitecture: x86"));
        let app = fx.app();
        app.initialize(&path).unwrap();
        assert_eq!(app.get_architecture().unwrap(), Architecture::X86);
        assert_eq!(fx.host.prompt_count(), 0);
    }

    #[test]
    fn test_unprobeable_executable_warns_and_uses_default() {
        let fx = fixture();
        let path = fx.write_module("vvvv", &format!("{VVVV}\n    DefaultArchitecture: x86"));
        std::fs::create_dir_all(fx.dir.path().join("bin")).unwrap();
        std::fs::write(fx.dir.path().join("bin/app.exe"), b"MZ").unwrap();

        let app = fx.app();
        app.initialize(&path).unwrap();
        assert_eq!(app.get_architecture().unwrap(), Architecture::X86);
        assert_eq!(fx.host.warnings.lock().len(), 1);

        // not cached: once the executable is readable it is probed
        let exe = fx.dir.path().join("bin/app.exe");
        std::fs::write(&exe, pe_image(0x80, 0x8664)).unwrap();
        assert_eq!(app.get_architecture().unwrap(), Architecture::X64);
        assert_eq!(app.get_architecture().unwrap(), Architecture::X64);
        assert_eq!(fx.host.warnings.lock().len(), 1);
    }

    #[test]
    fn test_undetermined_architecture_prompts_once() {
        // option 1 of [x64, x86]
        let fx = fixture_with(RecordingHost::answering(1));
        let path = fx.write_module("vvvv", &format!("{VVVV}\n    DefaultArchitecture: native"));
        let app = fx.app();
        app.initialize(&path).unwrap();

        assert_eq!(app.get_architecture().unwrap(), Architecture::X86);
        assert_eq!(app.get_architecture().unwrap(), Architecture::X86);
        assert_eq!(fx.host.prompt_count(), 1);
    }

    #[test]
    fn test_activate_switches_default_repository() {
        let fx = fixture();
        let vvvv = fx.write_module("vvvv", VVVV);
        let ue4 = fx.write_module(
            "ue4",
            "    ShortName: ue4\n    DefaultRepository: \"https://example.com/ue4.git\"",
        );

        let a = fx.app();
        a.initialize(&vvvv).unwrap();
        a.activate().unwrap();
        assert!(a.is_active());
        assert_eq!(fx.repositories.defaults(), vec!["https://github.com/vvvv/packs.git"]);

        let b = fx.app();
        b.initialize(&ue4).unwrap();
        b.activate().unwrap();
        assert!(b.is_active());
        assert!(!a.is_active());
        assert_eq!(fx.repositories.defaults(), vec!["https://example.com/ue4.git"]);
        assert_eq!(fx.repositories.registered().len(), 2);
        assert_eq!(fx.session.known_app_names(), vec!["ue4", "vvvv"]);

        // switching back by name
        let back = fx.session.try_set_current_app("vvvv").unwrap();
        assert!(Arc::ptr_eq(&back, &a));
        assert_eq!(fx.repositories.defaults(), vec!["https://github.com/vvvv/packs.git"]);
    }

    #[test]
    fn test_uninitialized_app_cannot_activate() {
        let fx = fixture();
        assert_eq!(
            fx.app().activate().unwrap_err(),
            InitializationError::NotInitialized
        );
        assert!(fx.session.current_app().is_none());
    }

    #[test]
    fn test_get_version_without_resource() {
        let fx = fixture();
        let path = fx.write_module("vvvv", VVVV);
        let app = fx.app();
        app.initialize(&path).unwrap();
        assert!(matches!(
            app.get_version(),
            Err(Error::Probe(crate::error::ProbeError::NotFound(_)))
        ));
    }

    #[test]
    fn test_installed_packages_delegate_to_store() {
        let store = Arc::new(MemoryPackageStore::new());
        store.insert(Package::new("vl.skia", "1.0", InstallScope::Global, "vvvv"));
        let app = TargetApp::new().with_package_store(store);

        let reference = PartialPackageReference::parse("vl.skia").unwrap();
        assert!(app.try_get_installed_package(&reference, ScopeSet::ALL).is_some());
        assert!(
            TargetApp::new()
                .try_get_installed_package(&reference, ScopeSet::ALL)
                .is_none()
        );
    }
}
