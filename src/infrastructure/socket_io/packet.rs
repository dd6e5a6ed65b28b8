//! Engine.IO v4 / Socket.IO v5 text framing.
//!
//! Engine.IO wraps everything in a one-character packet type. Socket.IO
//! packets travel inside Engine.IO `message` (`4`) packets:
//!
//! ```text
//! 0{"sid":"...","pingInterval":25000,"pingTimeout":20000}   open
//! 2 / 3                                                      ping / pong
//! 40                                                         connect "/"
//! 42["motor_update",{"rpm":400}]                             event
//! 42/admin,7["arm_position",{"degrees":[10,20]}]             namespaced, ack id 7
//! ```

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PacketError {
    #[error("empty packet")]
    Empty,

    #[error("unknown engine.io packet type {0:?}")]
    UnknownEngineType(char),

    #[error("unknown socket.io packet type {0:?}")]
    UnknownSocketType(char),

    #[error("binary socket.io packets are not supported")]
    BinaryUnsupported,

    #[error("invalid packet payload: {0}")]
    InvalidPayload(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OpenHandshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(OpenHandshake),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(text: &str) -> Result<Self, PacketError> {
        let mut chars = text.chars();
        let kind = chars.next().ok_or(PacketError::Empty)?;
        let data = chars.as_str();

        match kind {
            '0' => serde_json::from_str(data)
                .map(EnginePacket::Open)
                .map_err(|err| PacketError::InvalidPayload(err.to_string())),
            '1' => Ok(EnginePacket::Close),
            '2' => Ok(EnginePacket::Ping(data.to_string())),
            '3' => Ok(EnginePacket::Pong(data.to_string())),
            '4' => Ok(EnginePacket::Message(data.to_string())),
            '5' => Ok(EnginePacket::Upgrade),
            '6' => Ok(EnginePacket::Noop),
            other => Err(PacketError::UnknownEngineType(other)),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            // Only servers send open packets; the handshake is not re-encoded.
            EnginePacket::Open(_) => "0".to_string(),
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping(data) => format!("2{}", data),
            EnginePacket::Pong(data) => format!("3{}", data),
            EnginePacket::Message(data) => format!("4{}", data),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        ack_id: Option<u64>,
        name: String,
        payload: Value,
    },
    Ack {
        namespace: String,
        ack_id: u64,
        data: Value,
    },
    ConnectError {
        namespace: String,
        data: Value,
    },
}

pub const DEFAULT_NAMESPACE: &str = "/";

impl SocketPacket {
    pub fn connect() -> Self {
        SocketPacket::Connect {
            namespace: DEFAULT_NAMESPACE.to_string(),
            data: None,
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            SocketPacket::Connect { namespace, .. }
            | SocketPacket::Disconnect { namespace }
            | SocketPacket::Event { namespace, .. }
            | SocketPacket::Ack { namespace, .. }
            | SocketPacket::ConnectError { namespace, .. } => namespace,
        }
    }

    /// Decodes the payload of an Engine.IO message packet.
    pub fn decode(text: &str) -> Result<Self, PacketError> {
        let mut chars = text.chars();
        let kind = chars.next().ok_or(PacketError::Empty)?;
        let mut rest = chars.as_str();

        if matches!(kind, '5' | '6') {
            return Err(PacketError::BinaryUnsupported);
        }

        let namespace = if rest.starts_with('/') {
            match rest.find(',') {
                Some(idx) => {
                    let namespace = rest[..idx].to_string();
                    rest = &rest[idx + 1..];
                    namespace
                }
                None => {
                    let namespace = rest.to_string();
                    rest = "";
                    namespace
                }
            }
        } else {
            DEFAULT_NAMESPACE.to_string()
        };

        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        let ack_id = if digits > 0 {
            let id = rest[..digits]
                .parse::<u64>()
                .map_err(|err| PacketError::InvalidPayload(err.to_string()))?;
            rest = &rest[digits..];
            Some(id)
        } else {
            None
        };

        let data = if rest.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str::<Value>(rest)
                    .map_err(|err| PacketError::InvalidPayload(err.to_string()))?,
            )
        };

        match kind {
            '0' => Ok(SocketPacket::Connect { namespace, data }),
            '1' => Ok(SocketPacket::Disconnect { namespace }),
            '2' => {
                let (name, payload) = split_event(data)?;
                Ok(SocketPacket::Event {
                    namespace,
                    ack_id,
                    name,
                    payload,
                })
            }
            '3' => Ok(SocketPacket::Ack {
                namespace,
                ack_id: ack_id
                    .ok_or_else(|| PacketError::InvalidPayload("ack without id".to_string()))?,
                data: data.unwrap_or(Value::Null),
            }),
            '4' => Ok(SocketPacket::ConnectError {
                namespace,
                data: data.unwrap_or(Value::Null),
            }),
            other => Err(PacketError::UnknownSocketType(other)),
        }
    }

    pub fn encode(&self) -> String {
        let (kind, namespace, ack_id, data) = match self {
            SocketPacket::Connect { namespace, data } => ('0', namespace, None, data.clone()),
            SocketPacket::Disconnect { namespace } => ('1', namespace, None, None),
            SocketPacket::Event {
                namespace,
                ack_id,
                name,
                payload,
            } => {
                let mut args = vec![Value::String(name.clone())];
                if !payload.is_null() {
                    args.push(payload.clone());
                }
                ('2', namespace, *ack_id, Some(Value::Array(args)))
            }
            SocketPacket::Ack {
                namespace,
                ack_id,
                data,
            } => ('3', namespace, Some(*ack_id), Some(data.clone())),
            SocketPacket::ConnectError { namespace, data } => {
                ('4', namespace, None, Some(data.clone()))
            }
        };

        let mut out = String::new();
        out.push(kind);
        if namespace != DEFAULT_NAMESPACE {
            out.push_str(namespace);
            out.push(',');
        }
        if let Some(id) = ack_id {
            out.push_str(&id.to_string());
        }
        if let Some(data) = data {
            out.push_str(&data.to_string());
        }
        out
    }
}

// Event data is `["name", arg0, ...]`; only the first argument is kept.
fn split_event(data: Option<Value>) -> Result<(String, Value), PacketError> {
    let Some(Value::Array(mut args)) = data else {
        return Err(PacketError::InvalidPayload(
            "event data must be an array".to_string(),
        ));
    };
    if args.is_empty() {
        return Err(PacketError::InvalidPayload("event without name".to_string()));
    }

    let name = match args.remove(0) {
        Value::String(name) => name,
        other => {
            return Err(PacketError::InvalidPayload(format!(
                "event name must be a string, got {}",
                other
            )));
        }
    };
    let payload = if args.is_empty() {
        Value::Null
    } else {
        args.remove(0)
    };

    Ok((name, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_open_handshake() {
        let packet = EnginePacket::decode(
            r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#,
        )
        .unwrap();

        let EnginePacket::Open(handshake) = packet else {
            panic!("expected open packet");
        };
        assert_eq!(handshake.sid, "lv_VI97HAXpY6yYWAAAC");
        assert_eq!(handshake.ping_interval, 25000);
        assert_eq!(handshake.ping_timeout, 20000);
        assert_eq!(handshake.max_payload, Some(1000000));
    }

    #[test]
    fn ping_is_answered_with_matching_pong() {
        let EnginePacket::Ping(data) = EnginePacket::decode("2").unwrap() else {
            panic!("expected ping");
        };
        assert_eq!(EnginePacket::Pong(data).encode(), "3");
    }

    #[test]
    fn client_connect_frame() {
        assert_eq!(
            EnginePacket::Message(SocketPacket::connect().encode()).encode(),
            "40"
        );
    }

    #[test]
    fn decodes_event_on_default_namespace() {
        let EnginePacket::Message(inner) =
            EnginePacket::decode(r#"42["motor_update",{"rpm":400}]"#).unwrap()
        else {
            panic!("expected message");
        };

        assert_eq!(
            SocketPacket::decode(&inner).unwrap(),
            SocketPacket::Event {
                namespace: "/".to_string(),
                ack_id: None,
                name: "motor_update".to_string(),
                payload: json!({"rpm": 400}),
            }
        );
    }

    #[test]
    fn decodes_namespaced_event_with_ack_id() {
        let packet = SocketPacket::decode(r#"2/admin,7["arm_position",{"degrees":[10,20]}]"#).unwrap();
        assert_eq!(packet.namespace(), "/admin");
        assert_eq!(
            packet,
            SocketPacket::Event {
                namespace: "/admin".to_string(),
                ack_id: Some(7),
                name: "arm_position".to_string(),
                payload: json!({"degrees": [10, 20]}),
            }
        );
        assert_eq!(packet.encode(), r#"2/admin,7["arm_position",{"degrees":[10,20]}]"#);
    }

    #[test]
    fn event_without_arguments_has_null_payload() {
        let packet = SocketPacket::decode(r#"2["ping_sim"]"#).unwrap();
        let SocketPacket::Event { payload, .. } = packet else {
            panic!("expected event");
        };
        assert!(payload.is_null());
    }

    #[test]
    fn connect_ack_carries_sid() {
        let packet = SocketPacket::decode(r#"0{"sid":"wZX3oN0bSVIhsaknAAAI"}"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::Connect {
                namespace: "/".to_string(),
                data: Some(json!({"sid": "wZX3oN0bSVIhsaknAAAI"})),
            }
        );
    }

    #[test]
    fn connect_error_is_decoded() {
        let packet = SocketPacket::decode(r#"4{"message":"Not authorized"}"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::ConnectError {
                namespace: "/".to_string(),
                data: json!({"message": "Not authorized"}),
            }
        );
    }

    #[test]
    fn rejects_malformed_frames() {
        assert_eq!(EnginePacket::decode(""), Err(PacketError::Empty));
        assert_eq!(EnginePacket::decode("9"), Err(PacketError::UnknownEngineType('9')));
        assert_eq!(
            SocketPacket::decode(r#"51-["upload",{"_placeholder":true,"num":0}]"#),
            Err(PacketError::BinaryUnsupported)
        );
        assert!(matches!(
            SocketPacket::decode(r#"2{"rpm":1}"#),
            Err(PacketError::InvalidPayload(_))
        ));
        assert!(matches!(
            SocketPacket::decode(r#"2[42]"#),
            Err(PacketError::InvalidPayload(_))
        ));
    }
}
