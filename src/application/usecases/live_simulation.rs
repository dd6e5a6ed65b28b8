use anyhow::{Result, anyhow};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{
    repositories::{event_channel::EventChannel, simulation::SimulationControl, sinks::StatusSink},
    value_objects::{enums::simulation_channels::SimulationChannel, stream_events::StreamEvent},
};

/// Subscribes to a simulation's event stream and kicks the simulation off.
///
/// Subscriptions are never deduplicated: every call opens a new connection
/// and keeps it until its handle is closed or the server hangs up.
pub struct LiveSimulationUseCase<E, S>
where
    E: EventChannel + Send + Sync + 'static,
    S: SimulationControl + Send + Sync + 'static,
{
    event_channel: Arc<E>,
    simulation: Arc<S>,
    open_subscriptions: Arc<AtomicUsize>,
}

impl<E, S> LiveSimulationUseCase<E, S>
where
    E: EventChannel + Send + Sync + 'static,
    S: SimulationControl + Send + Sync + 'static,
{
    pub fn new(event_channel: Arc<E>, simulation: Arc<S>) -> Self {
        Self {
            event_channel,
            simulation,
            open_subscriptions: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn open_subscriptions(&self) -> usize {
        self.open_subscriptions.load(Ordering::SeqCst)
    }

    pub async fn subscribe_and_start<H>(
        &self,
        channel: SimulationChannel,
        handler: Arc<H>,
    ) -> Result<SubscriptionHandle>
    where
        H: StatusSink + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        info!(%channel, subscription_id = %id, "live_simulation: subscribing");

        let mut events = self
            .event_channel
            .subscribe(channel.event_name())
            .await
            .map_err(|err| {
                error!(%channel, error = ?err, "live_simulation: failed to open event channel");
                err
            })?;

        let guard = OpenSubscriptionGuard::acquire(Arc::clone(&self.open_subscriptions));
        let task = tokio::spawn(async move {
            let _guard = guard;
            while let Some(payload) = events.recv().await {
                match StreamEvent::decode(channel, payload) {
                    Ok(event) => handler.write(&event.status_text()),
                    Err(err) => {
                        warn!(%channel, subscription_id = %id, error = ?err, "live_simulation: dropping event");
                    }
                }
            }
            debug!(%channel, subscription_id = %id, "live_simulation: event stream ended");
        });

        let handle = SubscriptionHandle {
            id,
            channel,
            task: Some(task),
        };

        if let Err(err) = self.simulation.start(channel).await {
            error!(%channel, subscription_id = %id, error = ?err, "live_simulation: failed to start simulation");
            handle.close().await;
            return Err(err);
        }

        info!(%channel, subscription_id = %id, "live_simulation: simulation started");
        Ok(handle)
    }
}

/// Owns the reader task of one subscription.
///
/// Dropping the handle leaves the subscription running; call `close` to
/// tear the connection down.
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: Uuid,
    channel: SimulationChannel,
    task: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn channel(&self) -> SimulationChannel {
        self.channel
    }

    /// True once the stream has ended or `wait` has returned.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    pub async fn close(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        info!(channel = %self.channel, subscription_id = %self.id, "live_simulation: subscription closed");
    }

    /// Waits until the server ends the stream.
    pub async fn join(mut self) -> Result<()> {
        self.wait().await
    }

    /// Like `join`, but keeps the handle. Returns immediately once the
    /// stream has already been waited for.
    pub async fn wait(&mut self) -> Result<()> {
        let Some(task) = self.task.as_mut() else {
            return Ok(());
        };
        let result = task.await;
        self.task = None;
        match result {
            Ok(()) => Ok(()),
            Err(err) if err.is_cancelled() => Ok(()),
            Err(err) => Err(anyhow!("subscription {} panicked: {}", self.id, err)),
        }
    }
}

struct OpenSubscriptionGuard {
    counter: Arc<AtomicUsize>,
}

impl OpenSubscriptionGuard {
    fn acquire(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for OpenSubscriptionGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}
