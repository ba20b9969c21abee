//! Mutual exclusion around check-then-extract
//!
//! The lock is an advisory OS lock on the sibling file `<install_dir>.lock`.
//! The OS drops it when the holder exits, so a crashed run never blocks the
//! next one. The file itself stays on disk: removing it would let a waiter
//! that still has the old file open and a newcomer both take "the" lock.

use crate::errors::BootstrapError;
use adoc_logger::LogSink;
use fslock::LockFile;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct InstallLock {
    lock: LockFile,
    path: PathBuf,
}

impl InstallLock {
    pub fn lock_path(install_dir: &Path) -> PathBuf {
        let mut name = install_dir
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        install_dir.with_file_name(name)
    }

    /// Poll `try_lock` until the lock is ours or `timeout` has passed
    pub fn acquire(
        install_dir: &Path,
        timeout: Duration,
        log: &dyn LogSink,
    ) -> Result<Self, BootstrapError> {
        let path = Self::lock_path(install_dir);
        let mut lock = LockFile::open(&path)
            .map_err(|source| BootstrapError::DirectoryCreation {
                path: path.clone(),
                source,
            })?;
        let start = Instant::now();
        let mut announced = false;

        loop {
            let acquired = lock.try_lock().map_err(|source| BootstrapError::DirectoryCreation {
                path: path.clone(),
                source,
            })?;
            if acquired {
                return Ok(Self { lock, path });
            }
            if start.elapsed() >= timeout {
                return Err(BootstrapError::LockTimeout(path));
            }
            if !announced && log.is_info_enabled() {
                log.info(&format!(
                    "Waiting for another extraction to release {}",
                    path.display()
                ));
                announced = true;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for InstallLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallLock").field("path", &self.path).finish()
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        let _ = self.lock.unlock();
    }
}
