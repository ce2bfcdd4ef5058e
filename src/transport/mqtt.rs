use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Packet, QoS};
use tracing::{info, warn};

use crate::config::BrokerSettings;
use crate::daemon::RunState;
use crate::ingress::{IngressQueue, Message};
use crate::utils::error::LoggerError;

/// Capacity of the client's outgoing request channel.
const REQUEST_CAP: usize = 64;

/// How reconnection delays grow after the connection is lost.
///
/// The delay for attempt `n` is `first × 2^n`, clamped to `max`. After
/// `max_attempts` consecutive failures the transport gives up and the daemon
/// shuts down. The attempt counter resets on every successful connect.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    /// Delay before the first retry.
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Consecutive failed attempts tolerated before giving up.
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            first: Duration::from_secs(1),
            max: Duration::from_secs(30),
            max_attempts: 20,
        }
    }
}

impl ReconnectPolicy {
    /// Delay for the given attempt (0-indexed), or `None` once the attempts
    /// are exhausted.
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let doubled = self.first.saturating_mul(2u32.saturating_pow(attempt.min(31)));
        Some(doubled.min(self.max))
    }
}

/// Owns the MQTT connection and feeds received messages into the ingress
/// queue.
///
/// On every successful connect it issues the configured subscription, so a
/// reconnect renews the subscription without extra bookkeeping. Receiving a
/// message only enqueues and signals; the wire path stays cheap.
pub struct MqttSource {
    client: AsyncClient,
    eventloop: EventLoop,
    queue: Arc<IngressQueue>,
    run: Arc<RunState>,
    topic: String,
    reconnect: ReconnectPolicy,
}

impl MqttSource {
    /// Builds the MQTT session from the broker settings. No network traffic
    /// happens until [`MqttSource::run`] starts polling.
    pub fn connect(
        broker: &BrokerSettings,
        queue: Arc<IngressQueue>,
        run: Arc<RunState>,
    ) -> Self {
        let client_id = format!("mqttlog-{}", uuid::Uuid::new_v4());
        let mut options = MqttOptions::new(client_id, broker.host.as_str(), broker.port);
        options.set_keep_alive(Duration::from_secs(broker.keepalive));
        if let Some(user) = &broker.username {
            options.set_credentials(user.clone(), broker.password.clone().unwrap_or_default());
        }

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAP);

        Self {
            client,
            eventloop,
            queue,
            run,
            topic: broker.topic.clone(),
            reconnect: ReconnectPolicy::default(),
        }
    }

    /// A clonable handle to the underlying client, used by the shutdown path
    /// to disconnect.
    pub fn handle(&self) -> AsyncClient {
        self.client.clone()
    }

    /// Drives the connection until shutdown or a fatal error.
    ///
    /// A poll error before the first successful connect is fatal: a daemon
    /// that cannot reach its broker at startup has nothing to do. After a
    /// successful connect, lost connections are retried with backoff until
    /// the policy is exhausted.
    pub async fn run(mut self) -> Result<(), LoggerError> {
        let mut connected_once = false;
        let mut attempt: u32 = 0;

        while self.run.is_running() {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    if ack.code == ConnectReturnCode::Success {
                        info!("connected to MQTT broker, waiting for messages");
                        connected_once = true;
                        attempt = 0;
                        // Subscribing on ConnAck means a reconnect renews the
                        // subscription as well.
                        self.client
                            .subscribe(self.topic.clone(), QoS::AtMostOnce)
                            .await
                            .map_err(|e| {
                                LoggerError::Connection(format!("subscribe failed: {}", e))
                            })?;
                    } else {
                        return Err(LoggerError::Connection(format!(
                            "broker refused connection: {:?}",
                            ack.code
                        )));
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    self.queue.enqueue(Message::from(publish));
                    self.queue.signal();
                }
                Ok(Event::Incoming(Packet::Disconnect)) => {
                    warn!("broker requested disconnect");
                }
                Ok(_) => {}
                Err(e) => {
                    if !self.run.is_running() {
                        break;
                    }
                    if !connected_once {
                        return Err(LoggerError::Connection(format!(
                            "could not connect to MQTT broker: {}",
                            e
                        )));
                    }
                    match self.reconnect.delay(attempt) {
                        Some(delay) => {
                            attempt += 1;
                            warn!(
                                "lost connection to broker ({}); retry {} in {:?}",
                                e, attempt, delay
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            return Err(LoggerError::Connection(format!(
                                "reconnect attempts exhausted: {}",
                                e
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
