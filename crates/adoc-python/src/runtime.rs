//! Embedded interpreter state
//!
//! There is one interpreter per process. `sys.path` and `sys.modules` belong to
//! it, so every `RuntimeState` sees what any other one added or imported. A
//! state only keeps its own record of the paths it appended; most callers use
//! the process-wide [`RuntimeState::shared`] instance.

use crate::errors::BridgeError;
use adoc_config::venv_paths::resolve_site_packages;
use adoc_logger as logger;
use once_cell::sync::OnceCell;
use pyo3::prelude::*;
use pyo3::types::PyModule;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

static SHARED_STATE: OnceCell<Result<RuntimeState, BridgeError>> = OnceCell::new();

/// Handle on the process interpreter plus the search paths added through it
#[derive(Debug)]
pub struct RuntimeState {
    search_paths: Mutex<Vec<PathBuf>>,
}

impl RuntimeState {
    /// Get or initialize the process-wide runtime state
    pub fn shared() -> Result<&'static RuntimeState, BridgeError> {
        match SHARED_STATE.get_or_init(RuntimeState::new) {
            Ok(state) => Ok(state),
            Err(e) => Err(BridgeError::Initialization(format!("{}", e))),
        }
    }

    /// Initialize the interpreter if needed and return a new handle on it.
    ///
    /// The handle does not isolate anything: paths appended or modules imported
    /// through it are visible to every other state in the process.
    pub fn new() -> Result<RuntimeState, BridgeError> {
        let start_time = Instant::now();
        pyo3::Python::initialize();

        // The toolkit home may be read-only, keep bytecode out of it
        pyo3::Python::attach(|py| {
            let sys = PyModule::import(py, "sys")
                .map_err(|e| BridgeError::Initialization(format!("Failed to import sys: {}", e)))?;
            sys.setattr("dont_write_bytecode", true).map_err(|e| {
                BridgeError::Initialization(format!("Failed to disable bytecode generation: {}", e))
            })?;
            Ok::<(), BridgeError>(())
        })?;

        logger::debug(&format!(
            "Python runtime ready in {:?}",
            start_time.elapsed()
        ));

        Ok(RuntimeState {
            search_paths: Mutex::new(Vec::new()),
        })
    }

    /// Append `path` to `sys.path` unless it is already there
    pub fn add_search_path(&self, path: &Path) -> Result<(), BridgeError> {
        let path_str = path.to_string_lossy().into_owned();
        let added = pyo3::Python::attach(|py| {
            let sys = PyModule::import(py, "sys")?;
            let sys_path = sys.getattr("path")?;
            if sys_path.contains(path_str.as_str())? {
                return Ok::<bool, BridgeError>(false);
            }
            sys_path.call_method1("append", (path_str.as_str(),))?;
            Ok(true)
        })?;

        if added {
            logger::debug(&format!("Added {} to sys.path", path_str));
        }
        if let Ok(mut paths) = self.search_paths.lock() {
            if !paths.iter().any(|p| p == path) {
                paths.push(path.to_path_buf());
            }
        }
        Ok(())
    }

    /// Make the packages of a virtual environment importable
    pub fn add_venv(&self, venv_path: &Path) -> Result<PathBuf, BridgeError> {
        let site_packages = resolve_site_packages(venv_path)
            .map_err(|e| BridgeError::Initialization(e.to_string()))?;
        logger::debug(&format!(
            "site_packages: {}, exists: {}",
            site_packages.display(),
            site_packages.exists()
        ));

        let site_str = site_packages.to_string_lossy().into_owned();
        pyo3::Python::attach(|py| {
            let site = PyModule::import(py, "site")
                .map_err(|e| BridgeError::Python(format!("Failed to import site module: {}", e)))?;
            site.call_method1("addsitedir", (site_str.as_str(),))
                .map_err(|e| BridgeError::Python(format!("Failed to add site directory: {}", e)))?;
            Ok::<(), BridgeError>(())
        })?;

        if let Ok(mut paths) = self.search_paths.lock() {
            paths.push(site_packages.clone());
        }
        Ok(site_packages)
    }

    /// Paths added through this handle, in insertion order. Paths added by other
    /// handles are on `sys.path` too but are not listed here.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        self.search_paths
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }

    /// `major.minor` of the embedded interpreter
    pub fn python_version(&self) -> Result<String, BridgeError> {
        pyo3::Python::attach(|py| {
            let sys = PyModule::import(py, "sys")?;
            let version_info = sys.getattr("version_info")?;
            let major = version_info.getattr("major")?.extract::<i32>()?;
            let minor = version_info.getattr("minor")?.extract::<i32>()?;
            Ok(format!("{}.{}", major, minor))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_shared_state_is_reused() -> Result<(), BridgeError> {
        let first = RuntimeState::shared()?;
        let second = RuntimeState::shared()?;
        assert!(std::ptr::eq(first, second));
        Ok(())
    }

    #[test]
    fn test_add_search_path_once() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let state = RuntimeState::new()?;
        state.add_search_path(temp.path())?;
        state.add_search_path(temp.path())?;
        assert_eq!(state.search_paths(), vec![temp.path().to_path_buf()]);

        let occurrences = pyo3::Python::attach(|py| -> PyResult<usize> {
            let sys_path = PyModule::import(py, "sys")?.getattr("path")?;
            let target = temp.path().to_string_lossy().into_owned();
            sys_path
                .call_method1("count", (target.as_str(),))?
                .extract::<usize>()
        })?;
        assert_eq!(occurrences, 1);
        Ok(())
    }

    #[test]
    fn test_states_share_sys_path() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let first = RuntimeState::new()?;
        let second = RuntimeState::new()?;
        first.add_search_path(temp.path())?;

        let target = temp.path().to_string_lossy().into_owned();
        let visible = pyo3::Python::attach(|py| -> PyResult<bool> {
            PyModule::import(py, "sys")?
                .getattr("path")?
                .contains(target.as_str())
        })?;
        assert!(visible);
        assert!(!second.search_paths().contains(&temp.path().to_path_buf()));

        // already on sys.path, so nothing is appended twice
        second.add_search_path(temp.path())?;
        let occurrences = pyo3::Python::attach(|py| -> PyResult<usize> {
            PyModule::import(py, "sys")?
                .getattr("path")?
                .call_method1("count", (target.as_str(),))?
                .extract::<usize>()
        })?;
        assert_eq!(occurrences, 1);
        Ok(())
    }

    #[test]
    fn test_python_version_format() -> Result<(), BridgeError> {
        let version = RuntimeState::shared()?.python_version()?;
        assert!(version.starts_with('3'));
        assert_eq!(version.split('.').count(), 2);
        Ok(())
    }

    #[test]
    fn test_add_missing_venv_fails() -> Result<(), BridgeError> {
        let state = RuntimeState::shared()?;
        let result = state.add_venv(Path::new("/tmp/adoc_no_such_venv_987"));
        assert!(matches!(result, Err(BridgeError::Initialization(_))));
        Ok(())
    }
}
