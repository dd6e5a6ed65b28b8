use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        repositories::viewer_token::ViewerTokenSource,
        value_objects::viewer::{TokenResponse, VIEWER_TOKEN_PATH},
    },
    infrastructure::http::api_client::TwinApiClient,
};

pub struct ViewerTokenHttp {
    api: Arc<TwinApiClient>,
}

impl ViewerTokenHttp {
    pub fn new(api: Arc<TwinApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ViewerTokenSource for ViewerTokenHttp {
    async fn fetch_token(&self) -> Result<String> {
        let url = self.api.endpoint(VIEWER_TOKEN_PATH)?;

        let resp = self
            .api
            .http()
            .get(url)
            .send()
            .await
            .context("viewer token request failed")?;
        let resp = TwinApiClient::ensure_success(resp, "fetch viewer token").await?;

        let parsed: TokenResponse = resp
            .json()
            .await
            .context("malformed viewer token response")?;
        Ok(parsed.token)
    }
}
