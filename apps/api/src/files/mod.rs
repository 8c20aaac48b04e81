//! Object storage for uploaded technical documents and proposal files.
//! Only the returned URL is persisted on the owning document.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

pub mod extract;
pub mod local;
pub mod s3;

pub use local::LocalFileStore;
pub use s3::S3FileStore;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 upload failed: {0}")]
    S3(String),
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores `bytes` under `key` and returns a URL for the stored object.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str)
        -> Result<String, FileStoreError>;
}

/// Object key for a file attached to an RFP, e.g. `rfps/{id}/documents/{uuid}-spec.pdf`.
pub fn object_key(rfp_id: Uuid, folder: &str, filename: &str) -> String {
    format!(
        "rfps/{}/{}/{}-{}",
        rfp_id,
        folder,
        Uuid::new_v4(),
        sanitize_filename(filename)
    )
}

fn sanitize_filename(filename: &str) -> String {
    // Drop any client-supplied directory components.
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
