use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        repositories::code_execution::CodeExecutionClient,
        value_objects::executions::{EXECUTE_PATH, ExecuteRequest, ExecuteResponse},
    },
    infrastructure::http::api_client::TwinApiClient,
};

pub struct CodeExecutionHttp {
    api: Arc<TwinApiClient>,
}

impl CodeExecutionHttp {
    pub fn new(api: Arc<TwinApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CodeExecutionClient for CodeExecutionHttp {
    async fn execute(&self, request: ExecuteRequest) -> Result<ExecuteResponse> {
        let url = self.api.endpoint(EXECUTE_PATH)?;

        let resp = self
            .api
            .http()
            .post(url)
            .json(&request)
            .send()
            .await
            .context("code execution request failed")?;
        let resp = TwinApiClient::ensure_success(resp, "execute code").await?;

        resp.json::<ExecuteResponse>()
            .await
            .context("malformed code execution response")
    }
}
