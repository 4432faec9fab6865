//! Gemini Files API: resumable upload and state lookup.

use super::GeminiClient;
use super::conversions::{api_error_message, handle_from_wire};
use super::dto::{CreateFileRequest, FileMetadata, FileResource, UploadFileResponse};
use async_trait::async_trait;
use explorer_core::{RemoteFileHandle, UploadedAsset};
use explorer_error::{UploadError, UploadErrorKind};
use explorer_interface::FileStore;
use tracing::{debug, error, instrument};

impl GeminiClient {
    fn upload_request_error(&self, e: reqwest::Error) -> UploadError {
        error!(error = ?e, "Upload request failed");
        UploadError::new(UploadErrorKind::Request(e.to_string()))
    }

    async fn ensure_success(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, UploadError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = api_error_message(&body);
        error!(status = %status, error = %message, "Files API error");
        Err(UploadError::new(UploadErrorKind::Remote {
            status_code: status.as_u16(),
            message,
        }))
    }
}

#[async_trait]
impl FileStore for GeminiClient {
    /// Two-step resumable upload: announce size and type, then send the
    /// bytes to the session URL and finalize in one call.
    #[instrument(skip(self, asset), fields(name = %asset.name(), mime_type = %asset.mime_type(), size = asset.len()))]
    async fn upload(&self, asset: &UploadedAsset) -> Result<RemoteFileHandle, UploadError> {
        let start = self
            .http
            .post(self.upload_url())
            .timeout(*self.request_timeout())
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", asset.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", asset.mime_type().as_str())
            .json(&CreateFileRequest {
                file: FileMetadata {
                    display_name: asset.name().clone(),
                },
            })
            .send()
            .await
            .map_err(|e| self.upload_request_error(e))?;
        let start = self.ensure_success(start).await?;

        let session_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                UploadError::new(UploadErrorKind::InvalidResponse(
                    "missing x-goog-upload-url header".to_string(),
                ))
            })?;
        debug!("Upload session opened");

        let finish = self
            .http
            .post(session_url)
            .timeout(*self.request_timeout())
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(asset.bytes().clone())
            .send()
            .await
            .map_err(|e| self.upload_request_error(e))?;
        let finish = self.ensure_success(finish).await?;

        let uploaded: UploadFileResponse = finish.json().await.map_err(|e| {
            UploadError::new(UploadErrorKind::InvalidResponse(format!(
                "Failed to parse upload response: {}",
                e
            )))
        })?;

        let handle = handle_from_wire(uploaded.file);
        debug!(remote = %handle.name(), state = %handle.state(), "Upload finished");
        Ok(handle)
    }

    #[instrument(skip(self))]
    async fn get_file(&self, name: &str) -> Result<RemoteFileHandle, UploadError> {
        let response = self
            .http
            .get(self.api_url(name))
            .timeout(*self.request_timeout())
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| self.upload_request_error(e))?;
        let response = self.ensure_success(response).await?;

        let file: FileResource = response.json().await.map_err(|e| {
            UploadError::new(UploadErrorKind::InvalidResponse(format!(
                "Failed to parse file resource: {}",
                e
            )))
        })?;
        Ok(handle_from_wire(file))
    }
}
