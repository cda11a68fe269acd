//! File-based store for the encrypted license blob.
//!
//! The blob is opaque at this layer. Writes go through a sibling temp file
//! followed by a rename.

use crate::LicenseError;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Store for the single encrypted license file.
#[derive(Debug, Clone)]
pub struct LicenseStore {
    /// Path of the license file.
    path: PathBuf,
}

impl LicenseStore {
    /// Create a store for the given path. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the license file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read the encrypted blob.
    ///
    /// Returns `Ok(None)` if the file does not exist. Every other I/O error
    /// is returned as [`LicenseError::StoreIO`] with the original error kept.
    pub fn read(&self) -> Result<Option<Vec<u8>>, LicenseError> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LicenseError::StoreIO(e)),
        }
    }

    /// Write the encrypted blob, replacing any previous file.
    pub fn write(&self, data: &[u8]) -> Result<(), LicenseError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        let written =
            fs::write(&temp_path, data).and_then(|_| fs::rename(&temp_path, &self.path));

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(LicenseError::StoreIO(e));
        }

        Ok(())
    }

    #[cfg(test)]
    fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::new(temp_dir.path().join("license.bin"));
        assert!(store.read().unwrap().is_none());
        assert!(!store.exists());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::new(temp_dir.path().join("license.bin"));

        store.write(&[0xde, 0xad, 0xbe, 0xef]).unwrap();
        assert_eq!(store.read().unwrap(), Some(vec![0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn test_write_replaces_previous() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::new(temp_dir.path().join("license.bin"));

        store.write(b"first version, longer").unwrap();
        store.write(b"second").unwrap();

        assert_eq!(store.read().unwrap().unwrap(), b"second");
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::new(temp_dir.path().join("a").join("b").join("license.bin"));

        store.write(b"blob").unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_read_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::new(temp_dir.path());

        let result = store.read();
        assert!(matches!(result, Err(LicenseError::StoreIO(_))));
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("license.bin");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupied"), b"x").unwrap();
        let store = LicenseStore::new(&target);

        let result = store.write(b"blob");
        assert!(matches!(result, Err(LicenseError::StoreIO(_))));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let store = LicenseStore::new("/var/lib/agent/license.bin");
        assert_eq!(
            store.temp_path(),
            PathBuf::from("/var/lib/agent/license.bin.tmp")
        );
    }
}
