//! Static assets shipped with the toolkit

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Copy the tree under `from` into `to`, creating directories as needed.
///
/// Existing files in `to` are overwritten. Returns the number of files copied.
pub fn copy_dir_recursive(from: &Path, to: &Path) -> io::Result<usize> {
    fs::create_dir_all(to)?;
    let mut copied = 0;

    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copies_nested_tree() -> io::Result<()> {
        let temp = TempDir::new()?;
        let from = temp.path().join("images");
        fs::create_dir_all(from.join("icons/callouts"))?;
        fs::write(from.join("icons/note.png"), b"note")?;
        fs::write(from.join("icons/callouts/1.png"), b"one")?;
        fs::create_dir_all(from.join("empty"))?;

        let to = temp.path().join("out/images");
        assert_eq!(copy_dir_recursive(&from, &to)?, 2);
        assert_eq!(fs::read(to.join("icons/note.png"))?, b"note");
        assert_eq!(fs::read(to.join("icons/callouts/1.png"))?, b"one");
        assert!(to.join("empty").is_dir());
        Ok(())
    }

    #[test]
    fn test_overwrites_existing_files() -> io::Result<()> {
        let temp = TempDir::new()?;
        let from = temp.path().join("images");
        fs::create_dir_all(&from)?;
        fs::write(from.join("logo.png"), b"new")?;

        let to = temp.path().join("out");
        fs::create_dir_all(&to)?;
        fs::write(to.join("logo.png"), b"old")?;

        copy_dir_recursive(&from, &to)?;
        assert_eq!(fs::read(to.join("logo.png"))?, b"new");
        Ok(())
    }

    #[test]
    fn test_missing_source_fails() -> io::Result<()> {
        let temp = TempDir::new()?;
        let result = copy_dir_recursive(&temp.path().join("nope"), &temp.path().join("out"));
        assert!(result.is_err());
        Ok(())
    }
}
