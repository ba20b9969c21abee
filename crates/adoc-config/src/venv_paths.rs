//! Locating the site-packages directory of a Python virtual environment
//!
//! When a venv is configured its site-packages are added to the embedded
//! interpreter's search path, so the toolkit can import helpers installed there.

#[cfg(not(windows))]
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(windows)]
pub const PYTHON_LIB_DIR: &str = "Lib";
#[cfg(not(windows))]
pub const PYTHON_LIB_DIR: &str = "lib";

pub const SITE_PACKAGES: &str = "site-packages";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SitePackagesError {
    #[error("Virtual environment not found: {}", .0.display())]
    VenvNotFound(PathBuf),

    #[error("No site-packages under {}", .0.display())]
    Missing(PathBuf),
}

/// Resolve the site-packages path of the venv at `venv_path`
///
/// - Unix: `<venv>/lib/python3.X/site-packages`, highest `python*` dir first
/// - Windows: `<venv>\Lib\site-packages`
pub fn resolve_site_packages(venv_path: &Path) -> Result<PathBuf, SitePackagesError> {
    if !venv_path.is_dir() {
        return Err(SitePackagesError::VenvNotFound(venv_path.to_path_buf()));
    }
    let lib_dir = venv_path.join(PYTHON_LIB_DIR);

    #[cfg(windows)]
    let candidates = vec![lib_dir.join(SITE_PACKAGES)];

    #[cfg(not(windows))]
    let candidates = {
        let mut versions: Vec<PathBuf> = fs::read_dir(&lib_dir)
            .map_err(|_| SitePackagesError::Missing(lib_dir.clone()))?
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("python"))
            .map(|entry| entry.path().join(SITE_PACKAGES))
            .collect();
        // python3.12 before python3.9
        versions.sort_by_key(|path| std::cmp::Reverse((path.as_os_str().len(), path.clone())));
        versions
    };

    candidates
        .into_iter()
        .find(|path| path.is_dir())
        .ok_or(SitePackagesError::Missing(lib_dir))
}
