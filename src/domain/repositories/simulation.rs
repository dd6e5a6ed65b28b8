use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::enums::simulation_channels::SimulationChannel;

#[automock]
#[async_trait]
pub trait SimulationControl {
    /// Asks the server to start emitting events for `channel`.
    async fn start(&self, channel: SimulationChannel) -> Result<()>;
}
