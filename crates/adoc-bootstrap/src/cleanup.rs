use std::fs;
use std::path::{Path, PathBuf};

/// Files removed when the owner is dropped.
///
/// Best-effort: nothing runs if the process aborts.
#[derive(Debug, Default)]
pub struct DeferredCleanup {
    paths: Vec<PathBuf>,
}

impl DeferredCleanup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    pub fn pending(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_pending(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

impl Drop for DeferredCleanup {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            let _ = fs::remove_file(&path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_registered_files_removed_on_drop() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let intermediate = temp.path().join("asciidoc-8.6.8.zip");
        fs::write(&intermediate, b"zip")?;

        let mut cleanup = DeferredCleanup::new();
        cleanup.register(&intermediate);
        cleanup.register(&intermediate);
        assert_eq!(cleanup.pending().len(), 1);
        assert!(cleanup.is_pending(&intermediate));
        assert!(intermediate.exists());

        drop(cleanup);
        assert!(!intermediate.exists());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let mut cleanup = DeferredCleanup::new();
        cleanup.register("/tmp/adoc-cleanup-does-not-exist.zip");
        drop(cleanup);
    }
}
