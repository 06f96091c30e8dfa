use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::FutureExt;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{error, info, warn};

use super::connection::{GatewayConnectionHandler, WebSocketConnection};
use super::constants::{
    GatewayIntents, MAX_RECONNECT_ATTEMPTS, RECONNECT_DELAY_BASE, RECONNECT_DELAY_MAX,
    RECONNECT_JITTER_MAX,
};
use super::error::{GatewayError, GatewayResult};
use super::events::{GatewayCommand, GatewayEventKind};
use super::heartbeat::HeartbeatManager;
use super::payloads::PresenceData;
use super::session::SessionInfo;

pub struct GatewayClientConfig {
    pub intents: GatewayIntents,
    pub presence: PresenceData,
    pub auto_reconnect: bool,
    pub max_reconnect_attempts: u32,
}

impl GatewayClientConfig {
    /// Bot intents, announcing `activity` as "Listening to ...".
    #[must_use]
    pub fn new(activity: impl Into<String>) -> Self {
        Self {
            intents: GatewayIntents::bot(),
            presence: PresenceData::listening(activity),
            auto_reconnect: true,
            max_reconnect_attempts: MAX_RECONNECT_ATTEMPTS,
        }
    }

    #[must_use]
    pub const fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    #[must_use]
    pub const fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }
}

pub struct GatewayClient {
    config: GatewayClientConfig,
    running: Arc<AtomicBool>,
    command_tx: Option<mpsc::UnboundedSender<GatewayCommand>>,
}

impl GatewayClient {
    #[must_use]
    pub fn new(config: GatewayClientConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            command_tx: None,
        }
    }

    /// Starts the gateway task and returns its event stream.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::AlreadyConnected` if connection is already active.
    pub fn connect(
        &mut self,
        token: &str,
    ) -> GatewayResult<mpsc::UnboundedReceiver<GatewayEventKind>> {
        if self.running.load(Ordering::SeqCst) {
            return Err(GatewayError::AlreadyConnected);
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        self.command_tx = Some(command_tx);

        let config = GatewayLoopConfig {
            token: token.to_string(),
            intents: self.config.intents,
            presence: self.config.presence.clone(),
            auto_reconnect: self.config.auto_reconnect,
            max_attempts: self.config.max_reconnect_attempts,
        };
        let running = self.running.clone();

        running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            let result = std::panic::AssertUnwindSafe(run_gateway_loop(
                config,
                event_tx.clone(),
                command_rx,
                running.clone(),
            ));

            if let Err(panic_info) = result.catch_unwind().await {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };

                error!(panic = %panic_msg, "Gateway task panicked");
                running.store(false, Ordering::SeqCst);
                let _ = event_tx.send(GatewayEventKind::Error {
                    message: format!("Gateway task panicked: {panic_msg}"),
                    recoverable: false,
                });
            }
        });

        Ok(event_rx)
    }

    /// Queues a command for the live connection; dropped when not connected.
    pub fn send_command(&self, command: GatewayCommand) {
        if let Some(tx) = &self.command_tx
            && tx.send(command).is_err()
        {
            warn!("Gateway command channel closed");
        }
    }

    pub fn disconnect(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

struct GatewayLoopConfig {
    token: String,
    intents: GatewayIntents,
    presence: PresenceData,
    auto_reconnect: bool,
    max_attempts: u32,
}

async fn run_gateway_loop(
    config: GatewayLoopConfig,
    event_tx: mpsc::UnboundedSender<GatewayEventKind>,
    mut command_rx: mpsc::UnboundedReceiver<GatewayCommand>,
    running: Arc<AtomicBool>,
) {
    let mut reconnect_attempts: u32 = 0;
    let mut session = SessionInfo::new();

    while running.load(Ordering::SeqCst) {
        let (outbound_tx, outbound_rx) = mpsc::channel(32);

        let mut handler = GatewayConnectionHandler::new(
            Box::new(WebSocketConnection::new()),
            config.token.clone(),
            config.intents,
            config.presence.clone(),
            session.clone(),
            event_tx.clone(),
            outbound_rx,
        );

        let result = match handler.connect().await {
            Ok(()) => {
                info!("Gateway connected");
                reconnect_attempts = 0;

                let interval = handler.heartbeat_interval().unwrap_or(41_250);
                let heartbeat = HeartbeatManager::new(interval, handler.session().sequence());
                handler.attach_heartbeat(heartbeat.tracker());
                let _heartbeat_handle = heartbeat.start(outbound_tx);

                let run_result = run_connection_loop(&mut handler, &mut command_rx, &running).await;
                heartbeat.stop();
                run_result
            }
            Err(e) => {
                error!(error = %e, "Failed to connect to gateway");
                Err(e)
            }
        };

        handler.close().await;
        session = handler.session().clone();

        if let Err(e) = result {
            warn!(error = %e, "Gateway connection ended");

            if !e.can_resume() {
                session.clear();
            }

            let _ = event_tx.send(GatewayEventKind::Disconnected {
                reason: e.to_string(),
                can_resume: session.can_resume(),
            });

            if !e.should_reconnect() {
                let _ = event_tx.send(GatewayEventKind::Error {
                    message: e.to_string(),
                    recoverable: false,
                });
                break;
            }
            reconnect_attempts += 1;
        }

        if !running.load(Ordering::SeqCst) {
            break;
        }

        if !config.auto_reconnect {
            break;
        }

        if reconnect_attempts >= config.max_attempts {
            error!(
                attempts = reconnect_attempts,
                "Max reconnection attempts exceeded"
            );
            let _ = event_tx.send(GatewayEventKind::Error {
                message: format!(
                    "Max reconnection attempts ({}) exceeded",
                    config.max_attempts
                ),
                recoverable: false,
            });
            break;
        }

        let delay = calculate_backoff_delay(reconnect_attempts);
        info!(
            attempt = reconnect_attempts,
            delay_ms = delay.as_millis(),
            "Reconnecting to gateway"
        );

        let _ = event_tx.send(GatewayEventKind::Reconnecting {
            attempt: reconnect_attempts,
        });

        sleep(delay).await;
    }

    running.store(false, Ordering::SeqCst);
    info!("Gateway loop terminated");
}

async fn run_connection_loop(
    handler: &mut GatewayConnectionHandler,
    commands: &mut mpsc::UnboundedReceiver<GatewayCommand>,
    running: &Arc<AtomicBool>,
) -> GatewayResult<()> {
    while running.load(Ordering::SeqCst) && handler.state().connection().is_connected() {
        handler.run(commands).await?;
    }

    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn calculate_backoff_delay(attempt: u32) -> Duration {
    let base_delay = RECONNECT_DELAY_BASE.as_millis() as u64;
    let max_delay = RECONNECT_DELAY_MAX.as_millis() as u64;
    let jitter_max = RECONNECT_JITTER_MAX.as_millis() as u64;

    let exponential_delay = base_delay.saturating_mul(2_u64.saturating_pow(attempt.min(6)));
    let capped_delay = exponential_delay.min(max_delay);

    let jitter = rand::rng().random_range(0..jitter_max);
    Duration::from_millis(capped_delay.saturating_add(jitter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = GatewayClientConfig::new("r/ help")
            .with_auto_reconnect(false)
            .with_max_reconnect_attempts(5);

        assert!(!config.auto_reconnect);
        assert_eq!(config.max_reconnect_attempts, 5);
        assert_eq!(config.intents, GatewayIntents::bot());
        assert_eq!(config.presence.activities[0].name, "r/ help");
    }

    #[test]
    fn test_backoff_delay() {
        let delay0 = calculate_backoff_delay(0);
        let delay2 = calculate_backoff_delay(2);

        assert!(delay0 < RECONNECT_DELAY_BASE + RECONNECT_JITTER_MAX);
        assert!(delay2 >= RECONNECT_DELAY_BASE * 4);

        let delay_max = calculate_backoff_delay(100);
        assert!(delay_max <= RECONNECT_DELAY_MAX + RECONNECT_JITTER_MAX);
    }

    #[test]
    fn test_client_initial_state() {
        let client = GatewayClient::new(GatewayClientConfig::new("r/ help"));
        assert!(!client.is_running());
        client.send_command(GatewayCommand::RefreshPresence);
    }
}
