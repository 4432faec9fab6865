//! Attachment upload with activation polling.

use explorer_core::{FileState, RemoteFileHandle, UploadedAsset};
use explorer_error::{UploadError, UploadErrorKind};
use explorer_interface::FileStore;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// How long and how often to wait for uploaded files to become active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters, derive_builder::Builder)]
#[builder(default)]
pub struct UploadPolicy {
    /// Delay between state checks
    poll_interval: Duration,
    /// Give up on a file that is still processing after this long
    timeout: Duration,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(200),
            timeout: Duration::from_secs(120),
        }
    }
}

impl UploadPolicy {
    /// Creates a policy from its bounds.
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }

    /// Returns a builder seeded with the defaults.
    pub fn builder() -> UploadPolicyBuilder {
        UploadPolicyBuilder::default()
    }
}

/// Transfers attachments and waits until each one can be referenced.
///
/// Bytes go straight to the remote service; nothing is staged on local
/// disk, so there is no transient copy to clean up on any path.
#[derive(Debug)]
pub struct AssetUploader<'a, F: FileStore + ?Sized> {
    store: &'a F,
    policy: UploadPolicy,
}

impl<'a, F: FileStore + ?Sized> AssetUploader<'a, F> {
    /// Creates an uploader over `store`.
    pub fn new(store: &'a F, policy: UploadPolicy) -> Self {
        Self { store, policy }
    }

    /// Upload every asset and block until all are active.
    ///
    /// Handles are returned in input order. An empty input makes no remote
    /// calls.
    ///
    /// # Errors
    ///
    /// Stops at the first asset that fails to upload, fails processing, or
    /// is still processing when the policy timeout runs out.
    #[instrument(skip_all, fields(count = assets.len()))]
    pub async fn upload_assets(
        &self,
        assets: &[UploadedAsset],
    ) -> Result<Vec<RemoteFileHandle>, UploadError> {
        let mut handles = Vec::with_capacity(assets.len());
        for asset in assets {
            let handle = self.store.upload(asset).await?;
            debug!(local = %asset.name(), remote = %handle.name(), "Uploaded attachment");
            handles.push(self.wait_until_active(handle).await?);
        }
        if !handles.is_empty() {
            info!(count = handles.len(), "All attachments active");
        }
        Ok(handles)
    }

    async fn wait_until_active(
        &self,
        mut handle: RemoteFileHandle,
    ) -> Result<RemoteFileHandle, UploadError> {
        let started = Instant::now();
        loop {
            match handle.state() {
                FileState::Active => return Ok(handle),
                FileState::Failed => {
                    warn!(remote = %handle.name(), "Remote processing failed");
                    return Err(UploadError::new(UploadErrorKind::ProcessingFailed(
                        handle.name().clone(),
                    )));
                }
                FileState::Processing => {
                    let waited = started.elapsed();
                    if waited >= *self.policy.timeout() {
                        warn!(remote = %handle.name(), waited_ms = waited.as_millis(), "Gave up waiting for file");
                        return Err(UploadError::new(UploadErrorKind::Timeout {
                            name: handle.name().clone(),
                            waited_secs: waited.as_secs(),
                        }));
                    }
                    tokio::time::sleep(*self.policy.poll_interval()).await;
                    handle = self.store.get_file(handle.name()).await?;
                }
            }
        }
    }
}
