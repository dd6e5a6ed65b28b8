use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::{
    domain::{
        repositories::simulation::SimulationControl,
        value_objects::enums::simulation_channels::SimulationChannel,
    },
    infrastructure::http::api_client::TwinApiClient,
};

pub struct SimulationHttp {
    api: Arc<TwinApiClient>,
}

impl SimulationHttp {
    pub fn new(api: Arc<TwinApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SimulationControl for SimulationHttp {
    async fn start(&self, channel: SimulationChannel) -> Result<()> {
        let url = self.api.endpoint(channel.start_path())?;

        let resp = self
            .api
            .http()
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to start {} simulation", channel))?;
        let resp =
            TwinApiClient::ensure_success(resp, &format!("start {} simulation", channel)).await?;

        // The body is a snapshot of the simulator state; the live values
        // arrive over the event channel.
        debug!(%channel, status = %resp.status(), "simulation: start acknowledged");
        Ok(())
    }
}
