//! Writing archive entries to disk

use crate::discovery::open_archive;
use crate::errors::BootstrapError;
use adoc_logger::LogSink;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Outcome of extracting one whole archive
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub files: usize,
    pub directories: usize,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

impl ExtractionReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// What a single entry turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    File(PathBuf),
    Directory(PathBuf),
    /// Entry name would escape the output directory
    Unsafe(String),
}

/// Create `dir` and its parents. Failure is fatal.
pub fn create_dir(dir: &Path, log: &dyn LogSink) -> Result<(), BootstrapError> {
    if dir.is_dir() {
        return Ok(());
    }
    if log.is_debug_enabled() {
        log.debug(&format!("Creating dir {}", dir.display()));
    }
    fs::create_dir_all(dir).map_err(|source| BootstrapError::DirectoryCreation {
        path: dir.to_path_buf(),
        source,
    })
}

/// Extract the entry at `index` below `output_dir`, keeping its relative path.
pub fn extract_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    archive_path: &Path,
    index: usize,
    output_dir: &Path,
    log: &dyn LogSink,
) -> Result<Extracted, BootstrapError> {
    let mut entry = archive
        .by_index(index)
        .map_err(|e| BootstrapError::extraction(archive_path, format!("#{}", index), e))?;
    let name = entry.name().to_string();

    let Some(relative) = entry.enclosed_name() else {
        return Ok(Extracted::Unsafe(name));
    };
    let target = output_dir.join(relative);

    if entry.is_dir() {
        create_dir(&target, log)?;
        return Ok(Extracted::Directory(target));
    }

    if let Some(parent) = target.parent() {
        create_dir(parent, log)?;
    }

    if log.is_debug_enabled() {
        log.debug(&format!("Extracting {}", name));
    }

    let file = File::create(&target).map_err(|e| BootstrapError::extraction(archive_path, &name, e))?;
    let mut writer = BufWriter::new(file);
    io::copy(&mut entry, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| BootstrapError::extraction(archive_path, &name, e))?;

    Ok(Extracted::File(target))
}

/// Extract every entry of the archive at `archive_path` into `output_dir`.
///
/// Entry level I/O failures are logged and recorded in the report; extraction
/// continues with the next entry. A directory that cannot be created stops
/// everything.
pub fn extract_archive(
    archive_path: &Path,
    output_dir: &Path,
    log: &dyn LogSink,
) -> Result<ExtractionReport, BootstrapError> {
    let mut archive = open_archive(archive_path).map_err(|e| {
        BootstrapError::extraction(archive_path, archive_path.display().to_string(), e)
    })?;
    let mut report = ExtractionReport::default();

    for index in 0..archive.len() {
        match extract_entry(&mut archive, archive_path, index, output_dir, log) {
            Ok(Extracted::File(_)) => report.files += 1,
            Ok(Extracted::Directory(_)) => report.directories += 1,
            Ok(Extracted::Unsafe(name)) => {
                log.error(&format!(
                    "Skipping entry '{}' in {}: path escapes {}",
                    name,
                    archive_path.display(),
                    output_dir.display()
                ));
                report.skipped.push(name);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                log.error(&e.to_string());
                let entry = match e {
                    BootstrapError::ExtractionIo { entry, .. } => entry,
                    other => other.to_string(),
                };
                report.failed.push(entry);
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adoc_logger::{Level, MemoryLog};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn write_archive(path: &Path, dirs: &[&str], files: &[(&str, &[u8])]) -> zip::result::ZipResult<()> {
        let mut zip = ZipWriter::new(File::create(path)?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for dir in dirs {
            zip.add_directory(*dir, options)?;
        }
        for (name, content) in files {
            zip.start_file(*name, options)?;
            zip.write_all(content)?;
        }
        zip.finish()?;
        Ok(())
    }

    #[test]
    fn test_escaping_entry_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let archive = temp.path().join("inner.zip");
        write_archive(&archive, &[], &[("../evil.txt", b"outside"), ("ok.txt", b"inside")])?;

        let root = temp.path().join("root");
        let out = root.join("out");
        let log = MemoryLog::new();
        let report = extract_archive(&archive, &out, &log)?;

        assert_eq!(report.skipped, vec!["../evil.txt".to_string()]);
        assert_eq!(report.files, 1);
        assert!(!report.is_complete());
        assert!(!root.join("evil.txt").exists());
        assert!(!temp.path().join("evil.txt").exists());
        assert_eq!(fs::read(out.join("ok.txt"))?, b"inside");
        assert!(log.contains(Level::Error, "path escapes"));
        Ok(())
    }

    #[test]
    fn test_extract_archive_preserves_tree() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let archive = temp.path().join("inner.zip");
        let content: &[u8] = b"AsciiDoc readme\n\x00\xff";
        write_archive(&archive, &["docs/"], &[("docs/readme.txt", content)])?;

        let out = temp.path().join("out");
        let log = MemoryLog::new();
        let report = extract_archive(&archive, &out, &log)?;

        assert!(out.join("docs").is_dir());
        assert_eq!(fs::read(out.join("docs/readme.txt"))?, content);
        assert_eq!(report.files, 1);
        assert_eq!(report.directories, 1);
        assert!(report.is_complete());
        assert!(log.contains(Level::Debug, "Extracting docs/readme.txt"));
        Ok(())
    }

    #[test]
    fn test_parent_directories_created_on_demand() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let archive = temp.path().join("inner.zip");
        write_archive(&archive, &[], &[("a/b/c/deep.txt", b"deep")])?;

        let out = temp.path().join("out");
        extract_archive(&archive, &out, &MemoryLog::new())?;
        assert_eq!(fs::read_to_string(out.join("a/b/c/deep.txt"))?, "deep");
        Ok(())
    }

    #[test]
    fn test_directory_blocked_by_file_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let archive = temp.path().join("inner.zip");
        write_archive(&archive, &["docs/"], &[("docs/readme.txt", b"x")])?;

        let out = temp.path().join("out");
        fs::create_dir_all(&out)?;
        fs::write(out.join("docs"), b"not a directory")?;

        let err = extract_archive(&archive, &out, &MemoryLog::new())
            .err()
            .ok_or("expected fatal error")?;
        assert!(err.is_fatal());
        assert!(out.join("docs").is_file());
        Ok(())
    }

    #[test]
    fn test_unopenable_archive_is_not_fatal() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let archive = temp.path().join("broken.zip");
        fs::write(&archive, b"PK but not really")?;

        let err = extract_archive(&archive, temp.path(), &MemoryLog::new())
            .err()
            .ok_or("expected extraction error")?;
        assert!(!err.is_fatal());
        assert!(matches!(err, BootstrapError::ExtractionIo { .. }));
        Ok(())
    }

    #[test]
    fn test_debug_messages_skipped_when_disabled() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let archive = temp.path().join("inner.zip");
        write_archive(&archive, &[], &[("file.txt", b"x")])?;

        let log = MemoryLog::without_debug();
        extract_archive(&archive, &temp.path().join("out"), &log)?;
        assert!(log.messages(Level::Debug).is_empty());
        Ok(())
    }
}
