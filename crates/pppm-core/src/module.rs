//! Module system
//!
//! Target applications publish their paths and capabilities as exports of
//! a script module. The engine only needs `import` and `unload`, so that is
//! all [`ModuleSystem`] asks for; [`ScriptModuleSystem`] is the file-backed
//! implementation used by the CLI.

use crate::error::ModuleError;
use parking_lot::Mutex;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// An exported function. Opaque to the engine: it is captured, never run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFunction {
    /// Function name, e.g. `Get-InstalledPacks`.
    pub name: String,
    /// Module the function was exported from.
    pub module: PathBuf,
    /// Source of the function body.
    pub body: String,
}

/// Exports of an imported module.
#[derive(Debug, Clone, Default)]
pub struct ModuleHandle {
    name: String,
    path: PathBuf,
    variables: HashMap<String, String>,
    functions: HashMap<String, ExportedFunction>,
}

impl ModuleHandle {
    /// Create an empty handle for the module at `path`.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Add an exported variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Add an exported function.
    pub fn with_function(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        let name = name.into();
        let function = ExportedFunction {
            name: name.clone(),
            module: self.path.clone(),
            body: body.into(),
        };
        self.functions.insert(name, function);
        self
    }

    /// Module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value of an exported variable.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// An exported function.
    pub fn function(&self, name: &str) -> Option<&ExportedFunction> {
        self.functions.get(name)
    }

    /// Names of all exported variables.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Names of all exported functions.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

/// Loads and unloads modules.
pub trait ModuleSystem: Send + Sync {
    /// Import the module at `path` and return its exports.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleError`] if the module is missing or cannot be loaded.
    fn import(&self, path: &Path) -> Result<ModuleHandle, ModuleError>;

    /// Unload a previously imported module.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleError::NotLoaded`] if the module is not loaded.
    fn unload(&self, module: &ModuleHandle) -> Result<(), ModuleError>;
}

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\$(?:script:|global:)?([A-Za-z_]\w*)\s*=\s*(.+?)\s*;?\s*$")
        .expect("variable pattern is valid")
});

static FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^function\s+([A-Za-z_][\w-]*)\s*\{").expect("function pattern is valid")
});

/// Module system over script module files.
///
/// Top-level assignments (`$name = "value"`, unindented) are exported as
/// variables, with `$PSScriptRoot` expanded to the module's folder.
/// Unindented `function Name { ... }` declarations are exported as functions.
///
/// Imports are counted per path, so overlapping import/unload pairs on the
/// same module from different sessions balance out.
#[derive(Debug, Default)]
pub struct ScriptModuleSystem {
    loaded: Mutex<HashMap<PathBuf, usize>>,
}

impl ScriptModuleSystem {
    /// Create a module system with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the module at `path` is currently loaded.
    pub fn is_loaded(&self, path: &Path) -> bool {
        self.loaded.lock().contains_key(path)
    }

    /// Parse module source into its exports.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleError::Load`] when a function body is not closed.
    pub fn parse(path: &Path, source: &str) -> Result<ModuleHandle, ModuleError> {
        let root = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let mut module = ModuleHandle::new(module_name(path), path);

        for caps in VARIABLE.captures_iter(source) {
            let value = unquote(&caps[2]).replace("$PSScriptRoot", &root);
            module = module.with_variable(&caps[1], value);
        }

        for caps in FUNCTION.captures_iter(source) {
            let open = caps.get(0).map_or(0, |m| m.end());
            let body = function_body(&source[open..]).ok_or_else(|| ModuleError::Load {
                path: path.to_path_buf(),
                message: format!("unbalanced braces in function {}", &caps[1]),
            })?;
            module = module.with_function(&caps[1], body.trim());
        }

        Ok(module)
    }
}

impl ModuleSystem for ScriptModuleSystem {
    fn import(&self, path: &Path) -> Result<ModuleHandle, ModuleError> {
        if !path.is_file() {
            return Err(ModuleError::NotFound(path.to_path_buf()));
        }
        let source = std::fs::read_to_string(path).map_err(|e| ModuleError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let module = Self::parse(path, &source)?;
        *self.loaded.lock().entry(path.to_path_buf()).or_default() += 1;
        tracing::debug!(
            "Imported module {} ({} variables, {} functions)",
            module.name(),
            module.variables.len(),
            module.functions.len()
        );
        Ok(module)
    }

    fn unload(&self, module: &ModuleHandle) -> Result<(), ModuleError> {
        let mut loaded = self.loaded.lock();
        let Some(count) = loaded.get_mut(module.path()) else {
            return Err(ModuleError::NotLoaded(module.name().to_string()));
        };
        *count -= 1;
        if *count == 0 {
            loaded.remove(module.path());
            tracing::debug!("Unloaded module {}", module.name());
        }
        Ok(())
    }
}

/// `vvvv.3pmTarget.psm1` -> `vvvv.3pmTarget`
fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Text up to the brace closing an already opened block.
fn function_body(rest: &str) -> Option<&str> {
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[..i]);
                }
            }
            _ => {}
        }
    }
    None
}
