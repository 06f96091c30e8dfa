//! Gateway event loop driving the message handler.

use std::collections::HashSet;
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use crate::application::use_cases::{HandleMessageUseCase, MessageRoute};
use crate::domain::entities::{BotToken, GuildId, InboundMessage};
use crate::infrastructure::{
    DispatchEvent, GatewayClient, GatewayCommand, GatewayEventKind, TopGgReporter,
};

/// How often the presence is re-announced.
pub const PRESENCE_REFRESH_INTERVAL: Duration = Duration::from_secs(4 * 60 * 60);

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Connects to the gateway and routes every inbound message through [`HandleMessageUseCase`].
pub struct BotRunner {
    handler: HandleMessageUseCase,
    gateway: GatewayClient,
    reporter: Option<TopGgReporter>,
    guilds: HashSet<GuildId>,
    guild_count_tx: watch::Sender<usize>,
    tasks: JoinSet<()>,
}

impl BotRunner {
    /// Creates a runner; `reporter` starts once the bot user is known.
    #[must_use]
    pub fn new(
        handler: HandleMessageUseCase,
        gateway: GatewayClient,
        reporter: Option<TopGgReporter>,
    ) -> Self {
        let (guild_count_tx, _) = watch::channel(0);
        Self {
            handler,
            gateway,
            reporter,
            guilds: HashSet::new(),
            guild_count_tx,
            tasks: JoinSet::new(),
        }
    }

    /// Runs until Ctrl-C or a fatal gateway error.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway cannot be started or fails for good.
    pub async fn run(mut self, token: &BotToken) -> Result<()> {
        let mut events = self
            .gateway
            .connect(token.as_str())
            .map_err(|e| eyre!("failed to start gateway: {e}"))?;
        let result = self.event_loop(&mut events).await;

        self.gateway.disconnect();
        let in_flight = self.tasks.len();
        if in_flight > 0 {
            info!(in_flight, "Waiting for in-flight messages");
        }
        while self.tasks.join_next().await.is_some() {}
        result
    }

    async fn event_loop(
        &mut self,
        events: &mut mpsc::UnboundedReceiver<GatewayEventKind>,
    ) -> Result<()> {
        let mut presence = interval(PRESENCE_REFRESH_INTERVAL);
        presence.set_missed_tick_behavior(MissedTickBehavior::Delay);
        presence.tick().await;

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        return Err(eyre!("gateway event stream ended"));
                    };
                    if self.handle_gateway_event(event) == Flow::Stop {
                        return Err(eyre!("gateway stopped after a fatal error"));
                    }
                }
                _ = presence.tick() => {
                    debug!("Refreshing presence");
                    self.gateway.send_command(GatewayCommand::RefreshPresence);
                }
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Message handler panicked");
                    }
                }
                signal = &mut shutdown => {
                    if let Err(e) = signal {
                        warn!(error = %e, "Failed to listen for Ctrl-C");
                    }
                    info!("Shutting down");
                    return Ok(());
                }
            }
        }
    }

    fn handle_gateway_event(&mut self, event: GatewayEventKind) -> Flow {
        match event {
            GatewayEventKind::Connected { session_id, .. } => {
                info!(session_id = %session_id, "Gateway connected");
            }
            GatewayEventKind::Disconnected { reason, can_resume } => {
                warn!(reason = %reason, can_resume, "Gateway disconnected");
            }
            GatewayEventKind::Reconnecting { attempt } => {
                info!(attempt, "Gateway reconnecting");
            }
            GatewayEventKind::Resumed => {
                info!("Gateway session resumed");
            }
            GatewayEventKind::Dispatch(dispatch) => self.handle_dispatch_event(dispatch),
            GatewayEventKind::Error {
                message,
                recoverable,
            } => {
                if recoverable {
                    warn!(error = %message, "Recoverable gateway error");
                } else {
                    error!(error = %message, "Fatal gateway error");
                    return Flow::Stop;
                }
            }
        }
        Flow::Continue
    }

    fn handle_dispatch_event(&mut self, event: DispatchEvent) {
        match event {
            DispatchEvent::Ready { user, guilds, .. } => {
                info!(user = %user.username(), guilds = guilds.len(), "Logged in");
                self.guilds = guilds.iter().map(|guild| guild.id).collect();
                self.publish_guild_count();
                if let Some(reporter) = self.reporter.take() {
                    reporter.spawn(user.id(), self.guild_count_tx.subscribe());
                }
            }
            DispatchEvent::GuildCreate { guild_id, .. } => {
                if self.guilds.insert(guild_id) {
                    info!(guild_id = %guild_id, "Joined guild");
                    self.publish_guild_count();
                }
            }
            DispatchEvent::GuildDelete {
                guild_id,
                unavailable,
            } => {
                if unavailable {
                    debug!(guild_id = %guild_id, "Guild outage");
                } else if self.guilds.remove(&guild_id) {
                    info!(guild_id = %guild_id, "Left guild");
                    self.publish_guild_count();
                }
            }
            DispatchEvent::MessageCreate { message } => self.spawn_handler(message),
            DispatchEvent::Unknown { event_type } => {
                debug!(event_type = %event_type, "Ignoring dispatch");
            }
        }
    }

    fn spawn_handler(&mut self, message: InboundMessage) {
        let handler = self.handler.clone();
        self.tasks.spawn(async move {
            match handler.execute(&message).await {
                MessageRoute::Ignored => {}
                route => debug!(message_id = %message.id(), route = ?route, "Handled message"),
            }
        });
    }

    fn publish_guild_count(&self) {
        self.guild_count_tx.send_replace(self.guilds.len());
    }

    /// Number of guilds the bot is currently in.
    #[must_use]
    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }
}
