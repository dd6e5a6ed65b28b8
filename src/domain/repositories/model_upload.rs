use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::uploads::{ModelFile, UploadResult};

#[automock]
#[async_trait]
pub trait ModelUploadClient {
    /// Sends one multipart POST and returns the decoded body, whatever the
    /// HTTP status was.
    async fn upload_model(&self, file: ModelFile) -> Result<UploadResult>;
}
