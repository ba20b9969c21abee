//! Finding the toolkit archive inside the package container

use crate::errors::BootstrapError;
use std::fs::File;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

pub const DEFAULT_PREFIX: &str = "asciidoc";
pub const DEFAULT_SUFFIX: &str = ".zip";

/// Name pattern an entry must match to be taken as the bundled toolkit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPattern {
    pub prefix: String,
    pub suffix: String,
}

impl Default for EntryPattern {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl EntryPattern {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        name.starts_with(&self.prefix) && name.ends_with(&self.suffix)
    }

    /// Entry name without the archive suffix, e.g. `asciidoc-8.6.8`
    pub fn stem<'a>(&self, name: &'a str) -> Option<&'a str> {
        if self.matches(name) {
            name.strip_suffix(self.suffix.as_str())
        } else {
            None
        }
    }
}

/// The matching entry and where its contents will live once extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredArchive {
    pub entry_name: String,
    pub index: usize,
    pub is_dir: bool,
    pub install_dir: PathBuf,
}

pub(crate) fn open_archive(path: &Path) -> Result<ZipArchive<File>, BootstrapError> {
    let unreadable = |message: String| BootstrapError::PackageUnreadable {
        path: path.to_path_buf(),
        message,
    };
    let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
    ZipArchive::new(file).map_err(|e| unreadable(e.to_string()))
}

/// Scan the package in central-directory order and stop at the first match.
///
/// Only entry names are read, so entries this build cannot decompress do not
/// get in the way.
pub fn find_bundled_archive(
    package: &Path,
    extract_root: &Path,
    pattern: &EntryPattern,
) -> Result<DiscoveredArchive, BootstrapError> {
    let archive = open_archive(package)?;

    for index in 0..archive.len() {
        let Some(name) = archive.name_for_index(index) else {
            continue;
        };
        if let Some(stem) = pattern.stem(name) {
            return Ok(DiscoveredArchive {
                install_dir: extract_root.join(stem),
                entry_name: name.to_string(),
                index,
                is_dir: name.ends_with('/'),
            });
        }
    }

    Err(BootstrapError::NoBundledArchive {
        path: package.to_path_buf(),
        prefix: pattern.prefix.clone(),
        suffix: pattern.suffix.clone(),
    })
}
