use crate::domain::ports::ColdStorageUploader;
use crate::error::{ReconcileError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use std::path::Path;

const DRIVE_UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart&fields=id";

/// Cold-storage uploader backed by the Drive files API.
pub struct DriveUploader {
    client: reqwest::Client,
    token: String,
}

impl DriveUploader {
    pub fn new(client: reqwest::Client, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }
}

#[async_trait]
impl ColdStorageUploader for DriveUploader {
    async fn upload(&self, local_file: &Path, destination_folder: &str) -> Result<()> {
        let file_name = local_file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        let bytes = tokio::fs::read(local_file).await?;

        let metadata = json!({
            "name": file_name,
            "parents": [destination_folder]
        });
        let form = Form::new()
            .part(
                "metadata",
                Part::text(metadata.to_string()).mime_str("application/json")?,
            )
            .part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(DRIVE_UPLOAD_URL)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ReconcileError::Upload(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ReconcileError::Upload(format!(
                "drive API returned {}",
                response.status()
            )))
        }
    }
}
