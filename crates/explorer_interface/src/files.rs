//! Remote file upload API seam.

use async_trait::async_trait;
use explorer_core::{RemoteFileHandle, UploadedAsset};
use explorer_error::UploadError;

/// A service that accepts attachment bytes and hands back file handles.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Transfer one attachment. The returned handle may still be processing.
    async fn upload(&self, asset: &UploadedAsset) -> Result<RemoteFileHandle, UploadError>;

    /// Fetch the current state of a previously uploaded file.
    async fn get_file(&self, name: &str) -> Result<RemoteFileHandle, UploadError>;
}
