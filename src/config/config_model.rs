use url::Url;

use super::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub api: TwinApi,
    pub viewer: Viewer,
    pub stage: Stage,
}

#[derive(Debug, Clone)]
pub struct TwinApi {
    pub base_url: Url,
    /// Per-request timeout in seconds. `None` leaves requests unbounded.
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub access_token: Option<String>,
    pub asset_id: Option<String>,
}
