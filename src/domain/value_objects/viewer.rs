use serde::{Deserialize, Serialize};

pub const VIEWER_TOKEN_PATH: &str = "/api/cesium_token";
pub const WORLD_TERRAIN: &str = "world";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
}

/// Everything the globe viewer needs: one token and one streamed tileset.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ViewerScene {
    pub access_token: String,
    pub terrain: String,
    pub enable_lighting: bool,
    pub tileset_asset_id: String,
}

impl ViewerScene {
    pub fn new(access_token: String, tileset_asset_id: String) -> Self {
        Self {
            access_token,
            terrain: WORLD_TERRAIN.to_string(),
            enable_lighting: true,
            tileset_asset_id,
        }
    }
}
