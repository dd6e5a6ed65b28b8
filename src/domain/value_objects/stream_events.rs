use anyhow::{Context, Result};
use serde::Deserialize;

use super::enums::simulation_channels::SimulationChannel;

/// `motor_update` payload. The simulator sends more fields (status,
/// temperature); only `rpm` is displayed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MotorUpdate {
    pub rpm: f64,
}

/// `arm_position` payload.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ArmPosition {
    pub degrees: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Motor(MotorUpdate),
    Arm(ArmPosition),
}

impl StreamEvent {
    pub fn decode(channel: SimulationChannel, payload: serde_json::Value) -> Result<Self> {
        match channel {
            SimulationChannel::Motor => serde_json::from_value(payload)
                .map(StreamEvent::Motor)
                .context("invalid motor_update payload"),
            SimulationChannel::Arm => serde_json::from_value(payload)
                .map(StreamEvent::Arm)
                .context("invalid arm_position payload"),
        }
    }

    pub fn status_text(&self) -> String {
        match self {
            StreamEvent::Motor(update) => format!("Motor RPM: {}", format_number(update.rpm)),
            StreamEvent::Arm(position) => {
                let joined = position
                    .degrees
                    .iter()
                    .map(|degree| format_number(*degree))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Arm Position: {}", joined)
            }
        }
    }
}

/// Renders numbers the way the browser front end shows them: integral
/// values without a fractional part, never `-0`, and exponent form outside
/// `[1e-6, 1e21)`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }

    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn motor_status_text() {
        let event = StreamEvent::decode(
            SimulationChannel::Motor,
            json!({"motor_id": "M1", "rpm": 2000, "status": "spinning up"}),
        )
        .unwrap();
        assert_eq!(event.status_text(), "Motor RPM: 2000");
    }

    #[test]
    fn fractional_rpm_is_kept() {
        let event = StreamEvent::decode(SimulationChannel::Motor, json!({"rpm": 1500.5})).unwrap();
        assert_eq!(event.status_text(), "Motor RPM: 1500.5");
    }

    #[test]
    fn arm_status_text_joins_degrees() {
        let event =
            StreamEvent::decode(SimulationChannel::Arm, json!({"degrees": [10, 20, 30]})).unwrap();
        assert_eq!(event.status_text(), "Arm Position: 10, 20, 30");
    }

    #[test]
    fn empty_degrees_render_an_empty_list() {
        let event = StreamEvent::decode(SimulationChannel::Arm, json!({"degrees": []})).unwrap();
        assert_eq!(event.status_text(), "Arm Position: ");
    }

    #[test]
    fn payload_for_the_wrong_channel_is_rejected() {
        assert!(StreamEvent::decode(SimulationChannel::Arm, json!({"rpm": 10})).is_err());
        assert!(StreamEvent::decode(SimulationChannel::Motor, json!("fast")).is_err());
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-12.25), "-12.25");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_form() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(999999999999999900000.0), "999999999999999900000");
        assert_eq!(format_number(0.000001), "0.000001");
    }
}
