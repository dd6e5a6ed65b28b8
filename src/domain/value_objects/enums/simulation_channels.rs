use std::fmt::Display;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// A server-side simulation whose state is pushed over the event channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SimulationChannel {
    Motor,
    Arm,
}

impl SimulationChannel {
    /// Name of the event the server emits for this simulation.
    pub fn event_name(&self) -> &'static str {
        match self {
            SimulationChannel::Motor => "motor_update",
            SimulationChannel::Arm => "arm_position",
        }
    }

    /// Path of the GET request that starts the simulation.
    pub fn start_path(&self) -> &'static str {
        match self {
            SimulationChannel::Motor => "/api/simulate_motor",
            SimulationChannel::Arm => "/api/move_arm",
        }
    }
}

impl Display for SimulationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let channel = match self {
            SimulationChannel::Motor => "motor",
            SimulationChannel::Arm => "arm",
        };
        write!(f, "{}", channel)
    }
}

impl TryFrom<&str> for SimulationChannel {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "motor" => Ok(SimulationChannel::Motor),
            "arm" => Ok(SimulationChannel::Arm),
            other => bail!("Unknown simulation channel: {}", other),
        }
    }
}
