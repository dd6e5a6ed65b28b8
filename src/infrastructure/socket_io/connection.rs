use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::{sync::mpsc, time::Instant};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::repositories::event_channel::EventChannel;

use super::packet::{EnginePacket, OpenHandshake, SocketPacket};

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
const EVENT_BUFFER: usize = 64;

/// Socket.IO client over a plain WebSocket transport, one connection per
/// subscription.
pub struct SocketIoChannel {
    endpoint: Url,
}

impl SocketIoChannel {
    pub fn new(base_url: &Url) -> Result<Self> {
        Ok(Self {
            endpoint: socket_url(base_url)?,
        })
    }
}

#[async_trait]
impl EventChannel for SocketIoChannel {
    async fn subscribe(&self, event_name: &str) -> Result<mpsc::Receiver<Value>> {
        let (ws, _) = connect_async(self.endpoint.as_str())
            .await
            .with_context(|| format!("failed to connect to {}", self.endpoint))?;
        let (mut sink, mut stream) = ws.split();

        let handshake = tokio::time::timeout(HANDSHAKE_TIMEOUT, open_session(&mut sink, &mut stream))
            .await
            .map_err(|_| anyhow!("socket.io handshake timed out"))??;

        info!(
            sid = %handshake.sid,
            event = %event_name,
            "socket_io: connected"
        );

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let event_name = event_name.to_string();
        tokio::spawn(async move {
            pump(sink, stream, tx, event_name, handshake).await;
        });

        Ok(rx)
    }
}

/// `http(s)://host/prefix/` -> `ws(s)://host/prefix/socket.io/?EIO=4&transport=websocket`
pub fn socket_url(base_url: &Url) -> Result<Url> {
    let mut url = base_url
        .join("socket.io/")
        .context("failed to build socket.io URL")?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => bail!("unsupported scheme for socket.io: {}", other),
    };
    url.set_scheme(scheme)
        .map_err(|_| anyhow!("failed to switch URL scheme to {}", scheme))?;
    url.set_query(Some("EIO=4&transport=websocket"));

    Ok(url)
}

async fn open_session<S, R>(sink: &mut S, stream: &mut R) -> Result<OpenHandshake>
where
    S: Sink<Message, Error = WsError> + Unpin,
    R: Stream<Item = Result<Message, WsError>> + Unpin,
{
    let handshake = loop {
        let text = next_text(stream).await?;
        match EnginePacket::decode(&text) {
            Ok(EnginePacket::Open(handshake)) => break handshake,
            Ok(other) => debug!(packet = ?other, "socket_io: ignoring packet before open"),
            Err(err) => bail!("invalid engine.io open packet: {}", err),
        }
    };

    let connect = EnginePacket::Message(SocketPacket::connect().encode()).encode();
    sink.send(Message::Text(connect))
        .await
        .context("failed to send socket.io connect")?;

    loop {
        let text = next_text(stream).await?;
        let Ok(EnginePacket::Message(inner)) = EnginePacket::decode(&text) else {
            continue;
        };
        match SocketPacket::decode(&inner) {
            Ok(SocketPacket::Connect { .. }) => return Ok(handshake),
            Ok(SocketPacket::ConnectError { data, .. }) => {
                bail!("socket.io connection refused: {}", data)
            }
            Ok(other) => debug!(packet = ?other, "socket_io: ignoring packet before connect"),
            Err(err) => warn!(error = %err, "socket_io: undecodable packet during connect"),
        }
    }
}

async fn next_text<R>(stream: &mut R) -> Result<String>
where
    R: Stream<Item = Result<Message, WsError>> + Unpin,
{
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => return Ok(text),
            Some(Ok(Message::Close(_))) | None => bail!("socket closed during handshake"),
            Some(Ok(_)) => continue,
            Some(Err(err)) => return Err(err).context("socket error during handshake"),
        }
    }
}

async fn pump<S, R>(
    mut sink: S,
    mut stream: R,
    tx: mpsc::Sender<Value>,
    event_name: String,
    handshake: OpenHandshake,
) where
    S: Sink<Message, Error = WsError> + Unpin,
    R: Stream<Item = Result<Message, WsError>> + Unpin,
{
    // The server pings every `ping_interval`; silence for longer than
    // interval + timeout means the connection is gone.
    let liveness = Duration::from_millis(handshake.ping_interval + handshake.ping_timeout);
    let mut deadline = Instant::now() + liveness;

    loop {
        tokio::select! {
            _ = tx.closed() => {
                debug!(sid = %handshake.sid, "socket_io: subscriber gone");
                break;
            }
            _ = tokio::time::sleep_until(deadline) => {
                warn!(sid = %handshake.sid, "socket_io: ping timeout");
                break;
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => match classify(&text, &event_name) {
                    FrameAction::Pong(data) => {
                        deadline = Instant::now() + liveness;
                        let pong = EnginePacket::Pong(data).encode();
                        if let Err(err) = sink.send(Message::Text(pong)).await {
                            warn!(sid = %handshake.sid, error = %err, "socket_io: failed to send pong");
                            break;
                        }
                    }
                    FrameAction::Deliver(payload) => {
                        if tx.send(payload).await.is_err() {
                            break;
                        }
                    }
                    FrameAction::Close => {
                        debug!(sid = %handshake.sid, "socket_io: server closed session");
                        break;
                    }
                    FrameAction::Ignore => {}
                },
                Some(Ok(Message::Close(_))) | None => {
                    debug!(sid = %handshake.sid, "socket_io: socket closed");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(sid = %handshake.sid, error = %err, "socket_io: socket error");
                    break;
                }
            }
        }
    }

    let _ = sink.close().await;
}

#[derive(Debug, PartialEq)]
enum FrameAction {
    Pong(String),
    Deliver(Value),
    Close,
    Ignore,
}

fn classify(text: &str, event_name: &str) -> FrameAction {
    let packet = match EnginePacket::decode(text) {
        Ok(packet) => packet,
        Err(err) => {
            warn!(error = %err, "socket_io: undecodable engine.io packet");
            return FrameAction::Ignore;
        }
    };

    match packet {
        EnginePacket::Ping(data) => FrameAction::Pong(data),
        EnginePacket::Close => FrameAction::Close,
        EnginePacket::Message(inner) => match SocketPacket::decode(&inner) {
            Ok(SocketPacket::Event { name, payload, .. }) if name == event_name => {
                FrameAction::Deliver(payload)
            }
            Ok(SocketPacket::Disconnect { .. }) => FrameAction::Close,
            Ok(_) => FrameAction::Ignore,
            Err(err) => {
                warn!(error = %err, "socket_io: undecodable socket.io packet");
                FrameAction::Ignore
            }
        },
        _ => FrameAction::Ignore,
    }
}
