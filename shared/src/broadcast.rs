//! Fan-out boundary. The pipeline publishes through the [`Broadcaster`]
//! trait so its logic is testable without a live transport; deployments
//! plug in [`NatsBroadcaster`].

use async_trait::async_trait;

/// Channel carrying every accepted position update.
pub const POSITIONS_CHANNEL: &str = "fleet.positions";
/// Channel carrying newly recorded deviations, distinct from plain updates.
pub const DEVIATIONS_CHANNEL: &str = "fleet.deviations";

/// Fire-and-forget publisher; at-most-once delivery from the core's view.
/// Retry policy, if any, lives on the other side of this trait.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn publish(&self, channel: &str, payload: &[u8]) -> anyhow::Result<()>;
}

pub struct NatsBroadcaster {
    client: async_nats::Client,
}

impl NatsBroadcaster {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let client = async_nats::ConnectOptions::new()
            .retry_on_initial_connect()
            .max_reconnects(None)
            .event_callback(|event| async move {
                match event {
                    async_nats::Event::Disconnected => tracing::warn!("NATS disconnected"),
                    async_nats::Event::Connected => tracing::info!("NATS reconnected"),
                    _ => {}
                }
            })
            .connect(url)
            .await?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Broadcaster for NatsBroadcaster {
    async fn publish(&self, channel: &str, payload: &[u8]) -> anyhow::Result<()> {
        // Log subject and size only, never payload bodies.
        tracing::debug!(
            channel = %channel,
            payload_size = payload.len(),
            "publishing message"
        );
        self.client
            .publish(channel.to_string(), payload.to_vec().into())
            .await?;
        Ok(())
    }
}
