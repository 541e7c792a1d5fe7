use crate::core::Storage;
use crate::utils::error::Result;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Filesystem storage; relative paths resolve against `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    /// A path whose metadata cannot be read counts as present, so the read
    /// that follows reports the real cause.
    fn exists(&self, path: &str) -> bool {
        let full_path = self.resolve(path);
        match full_path.try_exists() {
            Ok(true) => full_path.is_file(),
            Ok(false) => false,
            Err(_) => true,
        }
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.resolve(path))?;
        Ok(data)
    }

    /// Replaces any existing file atomically.
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        replace_file(&self.resolve(path), |file| file.write_all(data))?;
        Ok(())
    }
}

/// Fills a temporary file next to `target` and renames it over `target`.
/// On any error the temporary file is removed and `target` is left untouched.
fn replace_file<F>(target: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    fill(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::load_table;
    use crate::utils::error::DeckError;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("nested/out.bin", b"abc").unwrap();

        assert!(storage.exists("nested/out.bin"));
        assert_eq!(storage.read_file("nested/out.bin").unwrap(), b"abc");
        assert_eq!(entries(&dir.path().join("nested")), vec!["out.bin"]);
    }

    #[test]
    fn test_existing_file_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("out.apkg", b"old contents").unwrap();
        storage.write_file("out.apkg", b"new").unwrap();

        assert_eq!(storage.read_file("out.apkg").unwrap(), b"new");
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.apkg");
        fs::write(&target, b"previous good deck").unwrap();

        let err = replace_file(&target, |file| {
            file.write_all(b"PK\x03\x04 partial")?;
            Err(io::Error::other("No space left on device"))
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "No space left on device");
        assert_eq!(fs::read(&target).unwrap(), b"previous good deck");
        assert_eq!(entries(dir.path()), vec!["out.apkg"]);
    }

    #[test]
    fn test_failed_write_without_previous_file_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.apkg");

        assert!(replace_file(&target, |_| Err(io::Error::other("disk full"))).is_err());

        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_directories_do_not_count_as_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("cartoes.csv")).unwrap();
        let storage = LocalStorage::new(dir.path());

        assert!(!storage.exists("cartoes.csv"));
        assert!(!storage.exists("missing.csv"));
    }

    #[test]
    fn test_unreadable_metadata_is_a_parse_error_not_missing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cartoes.csv"), "Frente,Verso\n").unwrap();
        let storage = LocalStorage::new(dir.path());

        // A regular file used as a directory fails with ENOTDIR, not NotFound.
        assert!(storage.exists("cartoes.csv/inner.csv"));

        let err = load_table(&storage, "cartoes.csv/inner.csv", b',').unwrap_err();
        assert!(matches!(err, DeckError::ParseError { .. }));
    }
}
