use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem adapter for the storage port. Relative paths are resolved
/// under `base_path`; absolute paths are taken as given and leave the base
/// untouched, which lets config files point anywhere on disk.
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
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_relative_paths_resolve_under_base() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("nested/out.csv", b"ref\n").await.unwrap();

        assert!(dir.path().join("nested/out.csv").exists());
        let data = storage.read_file("nested/out.csv").await.unwrap();
        assert_eq!(data, b"ref\n");
    }

    #[tokio::test]
    async fn test_absolute_paths_ignore_base() {
        let base = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let storage = LocalStorage::new(base.path());

        let target = elsewhere.path().join("manifest.csv");
        let target = target.to_str().unwrap();
        storage.write_file(target, b"ref\n").await.unwrap();

        assert!(elsewhere.path().join("manifest.csv").exists());
        assert_eq!(storage.read_file(target).await.unwrap(), b"ref\n");
    }

    #[tokio::test]
    async fn test_read_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        assert!(storage.read_file("absent.csv").await.is_err());
    }
}
