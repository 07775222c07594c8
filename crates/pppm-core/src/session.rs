//! Per-session state
//!
//! Every hosting context gets its own [`Session`]: a working directory
//! override, the target applications it knows, and the current one. The
//! [`SessionRegistry`] hands sessions out by key and creates each one
//! exactly once, even when several threads ask for the same key.

use crate::context::EngineContext;
use crate::error::{InitializationError, StateError};
use crate::host::Host;
use crate::target_app::TargetApp;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Opaque identity of a hosting context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionKey(u64);

impl SessionKey {
    /// Create a key from a host-chosen identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The identifier.
    pub fn id(self) -> u64 {
        self.0
    }
}

impl From<u64> for SessionKey {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Hands out one [`Session`] per key.
#[derive(Debug)]
pub struct SessionRegistry {
    context: EngineContext,
    sessions: DashMap<SessionKey, Arc<Session>>,
}

impl SessionRegistry {
    /// Create a registry whose sessions share `context`.
    pub fn new(context: EngineContext) -> Self {
        Self {
            context,
            sessions: DashMap::new(),
        }
    }

    /// Get the session for `key`, creating it hosted in `host` if it does not exist yet.
    ///
    /// `host` is ignored when the session already exists.
    pub fn get_or_create(&self, key: SessionKey, host: Arc<dyn Host>) -> Arc<Session> {
        let entry = self.sessions.entry(key).or_insert_with(|| {
            tracing::debug!("Creating {key}");
            Arc::new(Session::new(key, host, self.context.clone()))
        });
        Arc::clone(entry.value())
    }

    /// The session for `key`, if one was created.
    pub fn get(&self, key: SessionKey) -> Option<Arc<Session>> {
        self.sessions.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    /// Forget the session for `key`, e.g. when its hosting context ends.
    pub fn remove(&self, key: SessionKey) -> Option<Arc<Session>> {
        self.sessions.remove(&key).map(|(_, session)| session)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session was created yet.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Isolated state of one hosting context.
pub struct Session {
    key: SessionKey,
    host: Arc<dyn Host>,
    context: EngineContext,
    working_directory: RwLock<Option<PathBuf>>,
    known_apps: DashMap<String, Arc<TargetApp>>,
    // Also serializes activation: unregister old, register new, update current.
    current_app: Mutex<Option<Arc<TargetApp>>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("key", &self.key)
            .field("working_directory", &*self.working_directory.read())
            .field("known_apps", &self.known_app_names())
            .finish_non_exhaustive()
    }
}

impl Session {
    fn new(key: SessionKey, host: Arc<dyn Host>, context: EngineContext) -> Self {
        Self {
            key,
            host,
            context,
            working_directory: RwLock::new(None),
            known_apps: DashMap::new(),
            current_app: Mutex::new(None),
        }
    }

    /// Key of this session.
    pub fn key(&self) -> SessionKey {
        self.key
    }

    /// Output sink of the hosting context.
    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// Collaborators shared with the registry.
    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    /// The working directory override, or the host's ambient directory when
    /// unset or no longer existing.
    pub fn working_directory(&self) -> PathBuf {
        self.working_directory
            .read()
            .clone()
            .filter(|dir| dir.is_dir())
            .unwrap_or_else(|| self.host.current_location())
    }

    /// Override the working directory, creating it if missing.
    ///
    /// If it cannot be created the previous value is kept, the host is told,
    /// and `false` is returned.
    pub fn set_working_directory(&self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if !path.is_dir() {
            self.host.warning(
                "Trying to override the working directory with one which doesn't exist. Creating it.",
            );
            if let Err(e) = std::fs::create_dir_all(&path) {
                self.report(&StateError::WorkingDirectory {
                    path,
                    message: e.to_string(),
                });
                return false;
            }
        }
        *self.working_directory.write() = Some(path);
        true
    }

    /// Target applications activated in this session.
    pub fn known_apps(&self) -> Vec<Arc<TargetApp>> {
        self.known_apps
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Short names of the known target applications, sorted.
    pub fn known_app_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.known_apps.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// A known target application by short name.
    pub fn try_get_known_app(&self, short_name: &str) -> Option<Arc<TargetApp>> {
        self.known_apps
            .get(short_name)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// The current target application.
    pub fn current_app(&self) -> Option<Arc<TargetApp>> {
        self.current_app.lock().clone()
    }

    /// Whether `app` is the current target application.
    pub fn is_current(&self, app: &TargetApp) -> bool {
        self.current_app
            .lock()
            .as_ref()
            .is_some_and(|current| std::ptr::eq(Arc::as_ptr(current), app))
    }

    /// Set the current target application without touching repositories.
    ///
    /// `None` is refused: the host is told, the previous value is kept, and
    /// `false` is returned.
    pub fn set_current_app(&self, app: Option<Arc<TargetApp>>) -> bool {
        let mut current = self.current_app.lock();
        self.replace_current(&mut current, app)
    }

    /// Make an already known target application current, swapping default
    /// repositories. `None` if no application is known by that name.
    pub fn try_set_current_app(&self, short_name: &str) -> Option<Arc<TargetApp>> {
        let app = self.try_get_known_app(short_name)?;
        self.switch_current(&app, false).ok()?;
        Some(app)
    }

    /// Swap the current application under the activation lock: unregister
    /// the previous default repository, register the new one, optionally
    /// remember the app by name, then mark it current.
    pub(crate) fn switch_current(
        &self,
        app: &Arc<TargetApp>,
        remember: bool,
    ) -> Result<(), InitializationError> {
        let short_name = app.short_name()?;
        let repository = app.default_repository()?;

        let mut current = self.current_app.lock();
        if let Some(previous) = current.as_ref() {
            if let Ok(previous_repository) = previous.default_repository() {
                previous_repository.unregister_as_default();
            }
        }
        repository.register_as_default();
        if remember {
            self.known_apps
                .insert(short_name.to_string(), Arc::clone(app));
        }
        self.replace_current(&mut current, Some(Arc::clone(app)));
        Ok(())
    }

    fn replace_current(
        &self,
        current: &mut Option<Arc<TargetApp>>,
        app: Option<Arc<TargetApp>>,
    ) -> bool {
        let Some(app) = app else {
            self.report(&StateError::ClearCurrentApp);
            return false;
        };
        let name = app.short_name().unwrap_or("<uninitialized>");
        tracing::debug!("{}: current target application is {name}", self.key);
        self.host
            .verbose(&format!("Set {name} as current target application"));
        *current = Some(app);
        true
    }

    fn report(&self, err: &StateError) {
        tracing::warn!("{}: {err}", self.key);
        self.host.error(&err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NullHost;
    use crate::host::testing::RecordingHost;
    use crate::module::ScriptModuleSystem;
    use crate::repository::RepositoryTable;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(EngineContext::new(
            Arc::new(ScriptModuleSystem::new()),
            Arc::new(RepositoryTable::new()),
        ))
    }

    #[test]
    fn test_get_or_create_returns_same_session() {
        let registry = registry();
        let a = registry.get_or_create(SessionKey::new(1), Arc::new(NullHost));
        let b = registry.get_or_create(SessionKey::new(1), Arc::new(NullHost));
        let c = registry.get_or_create(SessionKey::new(2), Arc::new(NullHost));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_get_or_create_is_exactly_once() {
        let registry = registry();
        let sessions: Vec<Arc<Session>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    scope.spawn(|| registry.get_or_create(SessionKey::new(7), Arc::new(NullHost)))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(sessions.iter().all(|s| Arc::ptr_eq(s, &sessions[0])));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_session() {
        let registry = registry();
        registry.get_or_create(SessionKey::new(3), Arc::new(NullHost));
        assert!(registry.get(SessionKey::new(3)).is_some());
        assert!(registry.remove(SessionKey::new(3)).is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_working_directory_defaults_to_ambient() {
        let session = registry().get_or_create(SessionKey::new(1), Arc::new(NullHost));
        assert_eq!(session.working_directory(), NullHost.current_location());
    }

    #[test]
    fn test_working_directory_is_created() {
        let host = Arc::new(RecordingHost::default());
        let session = registry().get_or_create(SessionKey::new(1), host.clone());
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("work");

        assert!(session.set_working_directory(&target));
        assert!(target.is_dir());
        assert_eq!(session.working_directory(), target);
        assert_eq!(host.warnings.lock().len(), 1);
        assert!(host.errors.lock().is_empty());
    }

    #[test]
    fn test_uncreatable_working_directory_keeps_previous() {
        let host = Arc::new(RecordingHost::default());
        let session = registry().get_or_create(SessionKey::new(1), host.clone());
        let dir = tempfile::tempdir().unwrap();
        assert!(session.set_working_directory(dir.path()));

        // A directory cannot be created below a regular file
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(!session.set_working_directory(file.join("sub")));

        assert_eq!(session.working_directory(), dir.path());
        assert_eq!(host.errors.lock().len(), 1);
        assert!(host.errors.lock()[0].contains("previously set or default is used"));
    }

    #[test]
    fn test_clearing_current_app_is_refused() {
        let host = Arc::new(RecordingHost::default());
        let session = registry().get_or_create(SessionKey::new(1), host.clone());
        let app = Arc::new(TargetApp::hosted_in(&session));

        assert!(session.set_current_app(Some(Arc::clone(&app))));
        assert!(!session.set_current_app(None));

        let current = session.current_app().unwrap();
        assert!(Arc::ptr_eq(&current, &app));
        assert!(session.is_current(&app));
        assert_eq!(host.errors.lock().len(), 1);
    }

    #[test]
    fn test_unknown_app_cannot_be_made_current() {
        let session = registry().get_or_create(SessionKey::new(1), Arc::new(NullHost));
        assert!(session.try_set_current_app("vvvv").is_none());
        assert!(session.current_app().is_none());
    }
}
