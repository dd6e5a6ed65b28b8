use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    config::config_model::Viewer,
    domain::{repositories::viewer_token::ViewerTokenSource, value_objects::viewer::ViewerScene},
};

/// Builds the globe viewer configuration: one access token, one tileset.
pub struct ViewerConfigUseCase<T>
where
    T: ViewerTokenSource + Send + Sync + 'static,
{
    token_source: Arc<T>,
    settings: Viewer,
}

impl<T> ViewerConfigUseCase<T>
where
    T: ViewerTokenSource + Send + Sync + 'static,
{
    pub fn new(token_source: Arc<T>, settings: Viewer) -> Self {
        Self {
            token_source,
            settings,
        }
    }

    /// `asset_id` overrides the configured asset, e.g. with the id returned
    /// by a fresh upload.
    pub async fn resolve(&self, asset_id: Option<String>) -> Result<ViewerScene> {
        let asset_id = match non_blank(asset_id).or_else(|| self.settings.asset_id.clone()) {
            Some(asset_id) => asset_id,
            None => bail!("No tileset asset id: pass one or set CESIUM_ASSET_ID"),
        };

        let access_token = match self.settings.access_token.clone() {
            Some(token) => {
                debug!("viewer_config: using configured access token");
                token
            }
            None => self
                .token_source
                .fetch_token()
                .await
                .context("failed to fetch viewer access token")?,
        };

        if access_token.trim().is_empty() {
            bail!("Viewer access token is empty");
        }

        info!(%asset_id, "viewer_config: scene resolved");
        Ok(ViewerScene::new(access_token, asset_id))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::viewer_token::MockViewerTokenSource;

    fn settings(access_token: Option<&str>, asset_id: Option<&str>) -> Viewer {
        Viewer {
            access_token: access_token.map(str::to_string),
            asset_id: asset_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn configured_token_skips_the_server() {
        let mut source = MockViewerTokenSource::new();
        source.expect_fetch_token().never();

        let scene = ViewerConfigUseCase::new(Arc::new(source), settings(Some("tok"), Some("96188")))
            .resolve(None)
            .await
            .unwrap();

        assert_eq!(scene, ViewerScene::new("tok".to_string(), "96188".to_string()));
        assert_eq!(scene.terrain, "world");
        assert!(scene.enable_lighting);
    }

    #[tokio::test]
    async fn token_is_fetched_when_not_configured() {
        let mut source = MockViewerTokenSource::new();
        source
            .expect_fetch_token()
            .times(1)
            .returning(|| Ok("served-token".to_string()));

        let scene = ViewerConfigUseCase::new(Arc::new(source), settings(None, Some("1")))
            .resolve(Some("2871023".to_string()))
            .await
            .unwrap();

        assert_eq!(scene.access_token, "served-token");
        assert_eq!(scene.tileset_asset_id, "2871023");
    }

    #[tokio::test]
    async fn missing_asset_id_is_an_error() {
        let mut source = MockViewerTokenSource::new();
        source.expect_fetch_token().never();

        let result = ViewerConfigUseCase::new(Arc::new(source), settings(Some("tok"), None))
            .resolve(Some("   ".to_string()))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn blank_served_token_is_rejected() {
        let mut source = MockViewerTokenSource::new();
        source
            .expect_fetch_token()
            .times(1)
            .returning(|| Ok(String::new()));

        let result = ViewerConfigUseCase::new(Arc::new(source), settings(None, Some("1")))
            .resolve(None)
            .await;

        assert!(result.is_err());
    }
}
