use anyhow::{Context, Result, anyhow};
use std::{path::Path, sync::Arc};
use tracing::{debug, error, info, warn};

use crate::domain::{
    repositories::{model_upload::ModelUploadClient, sinks::UserNotifier},
    value_objects::uploads::{ModelFile, UploadOutcome},
};

/// Sends a model file to the workbench server and tells the user how it went.
pub struct UploadModelUseCase<U, N>
where
    U: ModelUploadClient + Send + Sync + 'static,
    N: UserNotifier + Send + Sync + 'static,
{
    upload_client: Arc<U>,
    notifier: Arc<N>,
}

impl<U, N> UploadModelUseCase<U, N>
where
    U: ModelUploadClient + Send + Sync + 'static,
    N: UserNotifier + Send + Sync + 'static,
{
    pub fn new(upload_client: Arc<U>, notifier: Arc<N>) -> Self {
        Self {
            upload_client,
            notifier,
        }
    }

    pub async fn upload(&self, file: ModelFile) -> Result<UploadOutcome> {
        let file_name = file.file_name.clone();
        info!(
            %file_name,
            size_bytes = file.bytes.len(),
            "upload_model: uploading model"
        );

        let result = self
            .upload_client
            .upload_model(file)
            .await
            .map_err(|err| {
                error!(%file_name, error = ?err, "upload_model: request failed");
                err
            })?;

        if result.message.is_some() || result.details.is_some() {
            debug!(
                %file_name,
                message = result.message.as_deref().unwrap_or_default(),
                details = result.details.as_deref().unwrap_or_default(),
                "upload_model: server details"
            );
        }

        let outcome = UploadOutcome::from(result);
        match &outcome {
            UploadOutcome::Succeeded { asset_id } => {
                info!(%file_name, %asset_id, "upload_model: upload accepted");
            }
            UploadOutcome::Failed { error } => {
                warn!(%file_name, %error, "upload_model: upload rejected");
            }
        }

        self.notifier.notify(&outcome.notification());
        Ok(outcome)
    }

    pub async fn upload_path(&self, path: &Path) -> Result<UploadOutcome> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("model path has no file name: {}", path.display()))?
            .to_string();

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read model file {}", path.display()))?;

        self.upload(ModelFile::new(file_name, bytes)).await
    }
}
