use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use crate::files::{FileStore, FileStoreError};

/// Writes uploads beneath a local directory. Used when no bucket is configured.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        _content_type: &str,
    ) -> Result<String, FileStoreError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;

        info!("Stored upload at {}", path.display());
        Ok(format!("file://{}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_writes_file_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        let url = store
            .put("rfps/abc/documents/x-scope.txt", Bytes::from_static(b"scope"), "text/plain")
            .await
            .unwrap();

        let written = dir.path().join("rfps/abc/documents/x-scope.txt");
        assert_eq!(std::fs::read(&written).unwrap(), b"scope");
        assert!(url.starts_with("file://"));
    }
}
