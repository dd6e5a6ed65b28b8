use anyhow::{Context, Result};
use std::time::Duration;
use tracing::error;
use url::Url;

use crate::config::config_model::TwinApi;

const BODY_PREVIEW_CHARS: usize = 512;

/// Shared reqwest client for the workbench server's `/api` routes.
#[derive(Debug, Clone)]
pub struct TwinApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TwinApiClient {
    pub fn new(config: &TwinApi) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let http = builder.build().context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Resolves an absolute API path (`/api/...`) against the base URL,
    /// keeping any prefix the base URL carries.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("failed to build URL for {}", path))
    }

    pub async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let url = resp.url().to_string();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };
        let preview = body.chars().take(BODY_PREVIEW_CHARS).collect::<String>();

        error!(
            status = %status,
            url = %url,
            response_body = %preview,
            context = %context,
            "twin api request failed"
        );

        anyhow::bail!("Twin API request failed: {} (status {})", context, status);
    }
}
