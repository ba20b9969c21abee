use crate::cleanup::DeferredCleanup;
use crate::discovery::{find_bundled_archive, open_archive, DiscoveredArchive, EntryPattern};
use crate::errors::BootstrapError;
use crate::extract::{create_dir, extract_archive, extract_entry, Extracted};
use crate::lock::InstallLock;
use adoc_logger::LogSink;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(120);

/// The extracted toolkit on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolkitInstallation {
    path: PathBuf,
    freshly_extracted: bool,
}

impl ToolkitInstallation {
    /// An installation that is already on disk (or configured by hand)
    pub fn existing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            freshly_extracted: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Whether the call that produced this value performed the extraction
    pub fn freshly_extracted(&self) -> bool {
        self.freshly_extracted
    }

    pub fn images_dir(&self) -> PathBuf {
        self.path.join("images")
    }
}

/// Locates the toolkit archive bundled in the package container and extracts it
/// next to the package, once.
///
/// Intermediate archive copies are deleted when the bootstrap is dropped, so a
/// host should keep it alive until shutdown.
#[derive(Debug)]
pub struct ArchiveBootstrap {
    package: PathBuf,
    extract_root: Option<PathBuf>,
    install_dir: Option<PathBuf>,
    pattern: EntryPattern,
    lock_timeout: Duration,
    cleanup: DeferredCleanup,
}

impl ArchiveBootstrap {
    pub fn new(package: impl Into<PathBuf>) -> Self {
        Self {
            package: package.into(),
            extract_root: None,
            install_dir: None,
            pattern: EntryPattern::default(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            cleanup: DeferredCleanup::new(),
        }
    }

    /// Use an installation that was configured explicitly
    pub fn with_install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.install_dir = Some(dir.into());
        self
    }

    /// Extract somewhere other than the package's parent directory
    pub fn with_extract_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.extract_root = Some(root.into());
        self
    }

    pub fn with_pattern(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.pattern = EntryPattern::new(prefix, suffix);
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn package(&self) -> &Path {
        &self.package
    }

    pub fn extract_root(&self) -> PathBuf {
        match self.extract_root {
            Some(ref root) => root.clone(),
            None => self
                .package
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn pending_cleanup(&self) -> &[PathBuf] {
        self.cleanup.pending()
    }

    /// Find the bundled archive without extracting anything.
    pub fn discover(&self) -> Result<DiscoveredArchive, BootstrapError> {
        find_bundled_archive(&self.package, &self.extract_root(), &self.pattern)
    }

    /// Resolve the toolkit home, extracting it on first use.
    ///
    /// Returns `Ok(None)` when nothing usable could be found; the reason has
    /// already been logged. Only a directory that cannot be created is
    /// returned as `Err`.
    pub fn resolve_installation(
        &mut self,
        log: &dyn LogSink,
    ) -> Result<Option<ToolkitInstallation>, BootstrapError> {
        if log.is_debug_enabled() {
            log.debug(&format!("Package container: {}", self.package.display()));
        }

        if let Some(ref dir) = self.install_dir {
            if dir.is_dir() {
                if log.is_info_enabled() {
                    log.info(&format!("Using configured toolkit home: {}", dir.display()));
                }
                return Ok(Some(ToolkitInstallation::existing(dir)));
            }
            if log.is_debug_enabled() {
                log.debug(&format!(
                    "Configured toolkit home {} does not exist, scanning package",
                    dir.display()
                ));
            }
        }

        match self.bootstrap(log) {
            Ok(installation) => {
                if log.is_info_enabled() {
                    log.info(&format!("Toolkit home: {}", installation.path().display()));
                }
                self.install_dir = Some(installation.path().to_path_buf());
                Ok(Some(installation))
            }
            // the caller reports fatal errors
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                log.error(&e.to_string());
                Ok(None)
            }
        }
    }

    fn bootstrap(&mut self, log: &dyn LogSink) -> Result<ToolkitInstallation, BootstrapError> {
        let discovered = self.discover()?;
        if log.is_info_enabled() {
            log.info(&format!("Found AsciiDoc in {}", discovered.entry_name));
        }

        let install_dir = discovered.install_dir.clone();
        if install_dir.is_dir() {
            return Ok(ToolkitInstallation::existing(install_dir));
        }

        let root = self.extract_root();
        create_dir(&root, log)?;
        if let Some(parent) = install_dir.parent() {
            create_dir(parent, log)?;
        }

        let _lock = InstallLock::acquire(&install_dir, self.lock_timeout, log)?;
        if install_dir.is_dir() {
            if log.is_debug_enabled() {
                log.debug(&format!(
                    "{} was extracted while waiting for the lock",
                    install_dir.display()
                ));
            }
            return Ok(ToolkitInstallation::existing(install_dir));
        }

        let intermediate = self.materialize(&discovered, &root, log)?;
        self.cleanup.register(&intermediate);

        match extract_archive(&intermediate, &root, log) {
            Ok(report) if !report.is_complete() => log.error(&format!(
                "Extraction of {} incomplete: {} failed, {} skipped",
                intermediate.display(),
                report.failed.len(),
                report.skipped.len()
            )),
            Ok(_) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => log.error(&e.to_string()),
        }

        Ok(ToolkitInstallation {
            path: install_dir,
            freshly_extracted: true,
        })
    }

    /// Copy the matched entry out of the package so it can be opened as an archive.
    fn materialize(
        &self,
        discovered: &DiscoveredArchive,
        root: &Path,
        log: &dyn LogSink,
    ) -> Result<PathBuf, BootstrapError> {
        let mut package = open_archive(&self.package)?;
        match extract_entry(&mut package, &self.package, discovered.index, root, log)? {
            Extracted::File(path) => Ok(path),
            Extracted::Directory(path) => Err(BootstrapError::extraction(
                &self.package,
                &discovered.entry_name,
                format!("{} is a directory, not an archive", path.display()),
            )),
            Extracted::Unsafe(name) => Err(BootstrapError::extraction(
                &self.package,
                name,
                "entry path escapes the extraction root",
            )),
        }
    }
}
