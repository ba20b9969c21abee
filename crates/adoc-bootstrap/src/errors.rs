use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating or extracting the bundled toolkit.
///
/// Only `DirectoryCreation` is fatal. Every other variant is logged and the
/// bootstrap carries on with whatever installation it can still offer.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Cannot read package container {path}: {message}")]
    PackageUnreadable { path: PathBuf, message: String },

    #[error("No entry matching '{prefix}*{suffix}' found in {path}")]
    NoBundledArchive {
        path: PathBuf,
        prefix: String,
        suffix: String,
    },

    #[error("Error while extracting '{entry}' from {archive}: {message}")]
    ExtractionIo {
        archive: PathBuf,
        entry: String,
        message: String,
    },

    #[error("Timed out waiting for extraction lock {0}")]
    LockTimeout(PathBuf),

    #[error("Can not create dir {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BootstrapError {
    /// A partial installation is worse than none, so a directory that cannot be
    /// created aborts the bootstrap instead of being logged.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BootstrapError::DirectoryCreation { .. })
    }

    pub fn is_discovery(&self) -> bool {
        matches!(
            self,
            BootstrapError::PackageUnreadable { .. } | BootstrapError::NoBundledArchive { .. }
        )
    }

    pub(crate) fn extraction(
        archive: impl Into<PathBuf>,
        entry: impl Into<String>,
        err: impl std::fmt::Display,
    ) -> Self {
        BootstrapError::ExtractionIo {
            archive: archive.into(),
            entry: entry.into(),
            message: err.to_string(),
        }
    }
}
