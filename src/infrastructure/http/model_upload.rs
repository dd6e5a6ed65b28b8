use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use tracing::debug;

use crate::{
    domain::{
        repositories::model_upload::ModelUploadClient,
        value_objects::uploads::{MODEL_FIELD_NAME, ModelFile, UPLOAD_MODEL_PATH, UploadResult},
    },
    infrastructure::http::api_client::TwinApiClient,
};

pub struct ModelUploadHttp {
    api: Arc<TwinApiClient>,
}

impl ModelUploadHttp {
    pub fn new(api: Arc<TwinApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ModelUploadClient for ModelUploadHttp {
    async fn upload_model(&self, file: ModelFile) -> Result<UploadResult> {
        let url = self.api.endpoint(UPLOAD_MODEL_PATH)?;
        let mime_type = file.mime_type();

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&mime_type)
            .context("invalid model mime type")?;
        let form = Form::new().part(MODEL_FIELD_NAME, part);

        let resp = self
            .api
            .http()
            .post(url)
            .multipart(form)
            .send()
            .await
            .context("model upload request failed")?;

        // Rejections come back as 4xx/5xx with an `error` body, so the
        // status alone says nothing about the outcome.
        let status = resp.status();
        debug!(status = %status, "upload_model: response received");

        let body = resp
            .text()
            .await
            .context("failed to read model upload response")?;

        serde_json::from_str::<UploadResult>(&body).with_context(|| {
            format!(
                "malformed model upload response (status {}): {}",
                status,
                body.chars().take(200).collect::<String>()
            )
        })
    }
}
