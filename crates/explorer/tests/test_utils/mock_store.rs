//! Scripted remote file store.

use async_trait::async_trait;
use explorer_core::{FileState, RemoteFileHandle, UploadedAsset};
use explorer_error::{UploadError, UploadErrorKind};
use explorer_interface::FileStore;
use parking_lot::Mutex;
use std::collections::HashMap;

/// File store whose files become active after a fixed number of polls.
#[derive(Debug, Default)]
pub struct ScriptedFileStore {
    polls_until_active: usize,
    fail_processing: bool,
    reject_upload: Option<UploadErrorKind>,
    uploads: Mutex<Vec<String>>,
    polls: Mutex<HashMap<String, usize>>,
}

impl ScriptedFileStore {
    /// Files are active as soon as they are uploaded.
    pub fn instant() -> Self {
        Self::default()
    }

    /// Files stay processing for `polls` state checks.
    pub fn activating_after(polls: usize) -> Self {
        Self {
            polls_until_active: polls,
            ..Self::default()
        }
    }

    /// Files never leave the processing state.
    pub fn never_active() -> Self {
        Self::activating_after(usize::MAX)
    }

    /// Processing fails on the first state check.
    pub fn failing_processing() -> Self {
        Self {
            polls_until_active: 1,
            fail_processing: true,
            ..Self::default()
        }
    }

    /// Every upload is refused with `kind`.
    pub fn rejecting(kind: UploadErrorKind) -> Self {
        Self {
            reject_upload: Some(kind),
            ..Self::default()
        }
    }

    /// Local names of the uploaded assets, in upload order.
    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().clone()
    }

    /// State checks made for a remote file.
    pub fn polls_for(&self, remote_name: &str) -> usize {
        self.polls.lock().get(remote_name).copied().unwrap_or_default()
    }

    fn handle(name: &str, mime_type: &str, state: FileState) -> RemoteFileHandle {
        RemoteFileHandle::new(
            name,
            format!("https://files.example/{}", name),
            mime_type,
            state,
        )
    }
}

#[async_trait]
impl FileStore for ScriptedFileStore {
    async fn upload(&self, asset: &UploadedAsset) -> Result<RemoteFileHandle, UploadError> {
        if let Some(kind) = &self.reject_upload {
            return Err(UploadError::new(kind.clone()));
        }
        let mut uploads = self.uploads.lock();
        uploads.push(asset.name().clone());
        let remote_name = format!("files/{}-{}", uploads.len(), asset.name());
        let state = if self.polls_until_active == 0 {
            FileState::Active
        } else {
            FileState::Processing
        };
        Ok(Self::handle(&remote_name, asset.mime_type(), state))
    }

    async fn get_file(&self, name: &str) -> Result<RemoteFileHandle, UploadError> {
        let mut polls = self.polls.lock();
        let count = polls.entry(name.to_string()).or_default();
        *count += 1;
        let state = if self.fail_processing {
            FileState::Failed
        } else if *count >= self.polls_until_active {
            FileState::Active
        } else {
            FileState::Processing
        };
        Ok(Self::handle(name, "application/octet-stream", state))
    }
}
