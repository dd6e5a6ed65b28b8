use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use tokio::sync::mpsc;

/// A server-push event transport.
///
/// Every call to `subscribe` opens its own connection; the connection lives
/// as long as the returned receiver. Payloads of events named `event_name`
/// are delivered in the order the server sent them, everything else is
/// dropped.
#[automock]
#[async_trait]
pub trait EventChannel {
    async fn subscribe(&self, event_name: &str) -> Result<mpsc::Receiver<serde_json::Value>>;
}
