//! Local filesystem object store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::ObjectStore;
use crate::error::{Error, Result};

/// Stores objects as files below a root directory.
#[derive(Debug, Clone)]
pub struct LocalFsStore {
    root: PathBuf,
}

impl LocalFsStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve `key` below the root, rejecting keys that could escape it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidObjectKey`] for empty, absolute, or `..` keys.
    pub fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(Error::InvalidObjectKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalFsStore {
    fn backend_tag(&self) -> &'static str {
        "localfs"
    }

    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        debug!("Writing {} bytes to {}", body.len(), path.display());
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| Error::storage_write(self.backend_tag(), key, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_object_creates_partitions() {
        let dir = TempDir::new().unwrap();
        let store = LocalFsStore::new(dir.path().to_path_buf());
        let key = "participants/yyyy=2024/mm=03/dd=07/hh=09/Ada_Lovelace_AE_1.json";

        store.put_object(key, b"{}".to_vec()).await.unwrap();

        let written = std::fs::read(dir.path().join(key)).unwrap();
        assert_eq!(written, b"{}");
    }

    #[test]
    fn test_resolve_rejects_escaping_keys() {
        let store = LocalFsStore::new(PathBuf::from("/srv/checkins"));
        for key in ["", "../x.json", "a/../../x.json", "/etc/passwd"] {
            assert!(
                matches!(store.resolve(key), Err(Error::InvalidObjectKey { .. })),
                "accepted {key:?}"
            );
        }
    }

    #[test]
    fn test_resolve_accepts_dots_inside_names() {
        let store = LocalFsStore::new(PathBuf::from("/srv/checkins"));
        let path = store.resolve("participants/Ada_..-..-etc_1.json").unwrap();
        assert_eq!(
            path,
            PathBuf::from("/srv/checkins/participants/Ada_..-..-etc_1.json")
        );
    }

    #[tokio::test]
    async fn test_put_object_rejected_key_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = LocalFsStore::new(dir.path().join("root"));
        let err = store.put_object("../escape.json", vec![1]).await.unwrap_err();
        assert!(err.is_storage_error());
        assert!(!dir.path().join("escape.json").exists());
    }
}
