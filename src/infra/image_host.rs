// Responsible for all communication with the external image host.
//
// The host exposes a small REST surface: a multipart upload that answers with
// the public URL and an asset identifier, and a delete-by-identifier call.
// Swapping providers only requires changing this module.

use serde::Deserialize;

use crate::infra::config;

/// Result of a successful upload on the external host.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    pub url: String,
    pub asset_id: String,
}

pub struct ImageHostClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ImageHostClient {
    /// Builds a client from `IMAGE_HOST_URL` / `IMAGE_HOST_API_KEY`.
    pub fn from_env() -> Self {
        Self::new(config::image_host_url(), config::image_host_api_key())
    }

    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Uploads raw file bytes and returns the hosted URL plus asset id.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: String,
        content_type: String,
    ) -> anyhow::Result<UploadedAsset> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/api/v1/upload", self.base_url))
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("image host upload failed with status {}", response.status());
        }

        Ok(response.json::<UploadedAsset>().await?)
    }

    /// Deletes a previously uploaded asset. Callers treat failures as
    /// best-effort: log and continue with the primary operation.
    pub async fn delete(&self, asset_id: &str) -> anyhow::Result<()> {
        let response = self
            .http
            .delete(format!("{}/api/v1/assets/{}", self.base_url, asset_id))
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("image host delete failed with status {}", response.status());
        }
        Ok(())
    }
}
