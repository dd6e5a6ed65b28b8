use anyhow::{Context, Result};
use url::Url;

use super::{
    config_model::{DotEnvyConfig, TwinApi, Viewer},
    stage::Stage,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let base_url_raw =
        std::env::var("TWIN_API_BASE_URL").context("TWIN_API_BASE_URL is not set")?;

    let api = TwinApi {
        base_url: parse_base_url(&base_url_raw)?,
        timeout: optional_env("API_TIMEOUT_SECS")
            .map(|raw| raw.parse::<u64>())
            .transpose()
            .context("API_TIMEOUT_SECS is invalid")?,
    };

    let viewer = Viewer {
        access_token: optional_env("CESIUM_ION_TOKEN"),
        asset_id: optional_env("CESIUM_ASSET_ID"),
    };

    Ok(DotEnvyConfig {
        api,
        viewer,
        stage: get_stage(),
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

/// Parses the API base URL and forces a trailing slash so that
/// `Url::join` keeps any path prefix the server is mounted under.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    let url = Url::parse(&with_slash)
        .with_context(|| format!("TWIN_API_BASE_URL is invalid: {}", trimmed))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => anyhow::bail!("TWIN_API_BASE_URL must be http or https, got {}", other),
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
