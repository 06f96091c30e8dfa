use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};

use super::codec::{EventParser, GatewayCodec};
use super::constants::{
    CONNECTION_TIMEOUT, GATEWAY_URL, GatewayIntents, GatewayOpcode, HELLO_TIMEOUT,
    IDENTIFY_TIMEOUT,
};
use super::error::{GatewayError, GatewayResult};
use super::events::{DispatchEvent, GatewayCommand, GatewayEventKind};
use super::heartbeat::{HeartbeatTracker, Outbound};
use super::payloads::{GatewayMessage, GatewayPayload, PresenceData};
use super::session::SessionInfo;
use super::state::{ConnectionState, GatewayState};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, WsMessage>;
type WsReader = SplitStream<WsStream>;

#[async_trait]
pub trait GatewayConnection: Send + Sync {
    async fn connect(&mut self, gateway_url: Option<&str>) -> GatewayResult<()>;
    async fn disconnect(&mut self) -> GatewayResult<()>;
    async fn send(&mut self, payload: &GatewayPayload) -> GatewayResult<()>;
    async fn receive(&mut self) -> GatewayResult<Option<GatewayMessage>>;
}

pub struct WebSocketConnection {
    writer: Option<WsWriter>,
    reader: Option<WsReader>,
    codec: GatewayCodec,
}

impl WebSocketConnection {
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: None,
            reader: None,
            codec: GatewayCodec::new(),
        }
    }
}

impl Default for WebSocketConnection {
    fn default() -> Self {
        Self::new()
    }
}

/// Resume URLs come without query parameters; the versioned query is appended.
fn gateway_url_with_query(resume_url: Option<&str>) -> String {
    match resume_url {
        Some(base) => {
            let query = GATEWAY_URL.split_once('?').map_or("", |(_, q)| q);
            format!("{}/?{query}", base.trim_end_matches('/'))
        }
        None => GATEWAY_URL.to_string(),
    }
}

#[async_trait]
impl GatewayConnection for WebSocketConnection {
    async fn connect(&mut self, gateway_url: Option<&str>) -> GatewayResult<()> {
        let url = gateway_url_with_query(gateway_url);
        let (ws_stream, _) = timeout(CONNECTION_TIMEOUT, connect_async(url.as_str()))
            .await
            .map_err(|_| GatewayError::timeout("connection"))?
            .map_err(|e| GatewayError::connection_failed(e.to_string()))?;

        let (writer, reader) = ws_stream.split();
        self.writer = Some(writer);
        self.reader = Some(reader);
        self.codec.reset();

        Ok(())
    }

    async fn disconnect(&mut self) -> GatewayResult<()> {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.close().await;
        }
        self.reader = None;
        self.codec.reset();
        debug!("WebSocket connection closed");
        Ok(())
    }

    async fn send(&mut self, payload: &GatewayPayload) -> GatewayResult<()> {
        let writer = self.writer.as_mut().ok_or(GatewayError::NotConnected)?;

        let json = serde_json::to_string(payload)
            .map_err(|e| GatewayError::serialization(e.to_string()))?;

        writer
            .send(WsMessage::Text(json.into()))
            .await
            .map_err(|e| GatewayError::websocket(e.to_string()))
    }

    async fn receive(&mut self) -> GatewayResult<Option<GatewayMessage>> {
        let reader = self.reader.as_mut().ok_or(GatewayError::NotConnected)?;

        loop {
            match reader.next().await {
                Some(Ok(WsMessage::Binary(data))) => {
                    if let Some(json) = self.codec.decode_binary(&data)? {
                        return EventParser::parse_message(&json).map(Some);
                    }
                }
                Some(Ok(WsMessage::Text(text))) => {
                    return EventParser::parse_message(&text).map(Some);
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    let (code, reason) = frame.map_or_else(
                        || (1000, "Normal closure".to_string()),
                        |f| (f.code.into(), f.reason.to_string()),
                    );
                    return Err(GatewayError::ConnectionClosed { code, reason });
                }
                Some(Ok(WsMessage::Ping(data))) => {
                    if let Some(writer) = self.writer.as_mut() {
                        let _ = writer.send(WsMessage::Pong(data)).await;
                    }
                }
                Some(Ok(WsMessage::Pong(_) | WsMessage::Frame(_))) => {}
                Some(Err(e)) => return Err(GatewayError::websocket(e.to_string())),
                None => {
                    return Err(GatewayError::ConnectionClosed {
                        code: 1000,
                        reason: "Stream ended".to_string(),
                    });
                }
            }
        }
    }
}

/// Drives one connection through hello, identify or resume, and dispatch.
pub struct GatewayConnectionHandler {
    connection: Box<dyn GatewayConnection>,
    state: GatewayState,
    session: SessionInfo,
    token: String,
    intents: GatewayIntents,
    presence: PresenceData,
    event_tx: mpsc::UnboundedSender<GatewayEventKind>,
    outbound_rx: mpsc::Receiver<Outbound>,
    heartbeat: Option<HeartbeatTracker>,
}

impl GatewayConnectionHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connection: Box<dyn GatewayConnection>,
        token: String,
        intents: GatewayIntents,
        presence: PresenceData,
        session: SessionInfo,
        event_tx: mpsc::UnboundedSender<GatewayEventKind>,
        outbound_rx: mpsc::Receiver<Outbound>,
    ) -> Self {
        Self {
            connection,
            state: GatewayState::new(),
            session,
            token,
            intents,
            presence,
            event_tx,
            outbound_rx,
            heartbeat: None,
        }
    }

    pub async fn connect(&mut self) -> GatewayResult<()> {
        self.state.transition_to(ConnectionState::Connecting);

        let resume_url = if self.session.can_resume() {
            self.session.resume_gateway_url().map(String::from)
        } else {
            None
        };
        self.connection.connect(resume_url.as_deref()).await?;

        self.state.transition_to(ConnectionState::WaitingForHello);
        self.await_hello().await?;

        if self.session.can_resume() {
            self.resume().await
        } else {
            self.identify().await
        }
    }

    pub fn attach_heartbeat(&mut self, tracker: HeartbeatTracker) {
        self.heartbeat = Some(tracker);
    }

    async fn receive_within(
        &mut self,
        limit: std::time::Duration,
        what: &str,
    ) -> GatewayResult<GatewayMessage> {
        timeout(limit, self.connection.receive())
            .await
            .map_err(|_| GatewayError::timeout(what))?
            .map_err(|e| GatewayError::connection_failed(format!("Failed to receive {what}: {e}")))?
            .ok_or_else(|| GatewayError::protocol(format!("Expected {what} message")))
    }

    async fn await_hello(&mut self) -> GatewayResult<()> {
        let message = self.receive_within(HELLO_TIMEOUT, "Hello").await?;

        let opcode = GatewayOpcode::from_u8(message.op);
        if opcode != Some(GatewayOpcode::Hello) {
            return Err(GatewayError::UnexpectedOpcode { opcode });
        }

        let data = message
            .d
            .ok_or_else(|| GatewayError::protocol("Hello missing data"))?;

        let hello = EventParser::parse_hello(&data)?;
        self.state.set_heartbeat_interval(hello.heartbeat_interval);

        debug!(
            interval_ms = hello.heartbeat_interval,
            "Received Hello from gateway"
        );

        Ok(())
    }

    async fn identify(&mut self) -> GatewayResult<()> {
        self.state.transition_to(ConnectionState::Identifying);

        let payload = GatewayPayload::identify(&self.token, self.intents.as_u32(), &self.presence);
        self.connection.send(&payload).await?;

        self.await_ready().await
    }

    async fn resume(&mut self) -> GatewayResult<()> {
        self.state.transition_to(ConnectionState::Resuming);

        let session_id = self
            .session
            .session_id()
            .ok_or_else(|| GatewayError::protocol("No session to resume"))?
            .to_string();

        let sequence = self
            .session
            .sequence()
            .ok_or_else(|| GatewayError::protocol("No sequence to resume"))?;

        let payload = GatewayPayload::resume(&self.token, &session_id, sequence);
        self.connection.send(&payload).await?;

        debug!(session_id = %session_id, sequence = sequence, "Sent Resume payload");

        self.await_resumed().await
    }

    async fn await_ready(&mut self) -> GatewayResult<()> {
        let message = self.receive_within(IDENTIFY_TIMEOUT, "Ready").await?;

        match GatewayOpcode::from_u8(message.op) {
            Some(GatewayOpcode::Dispatch) if message.t.as_deref() == Some("READY") => {
                self.handle_ready_event(message)?;
                self.state.transition_to(ConnectionState::Connected);
                Ok(())
            }
            Some(GatewayOpcode::InvalidSession) => {
                self.session.clear();
                Err(GatewayError::SessionInvalidated { resumable: false })
            }
            _ => Err(GatewayError::protocol("Expected Ready event")),
        }
    }

    async fn await_resumed(&mut self) -> GatewayResult<()> {
        // Missed events are replayed before RESUMED arrives.
        loop {
            let message = self.receive_within(IDENTIFY_TIMEOUT, "Resumed").await?;
            self.session.update_sequence(message.s);

            match GatewayOpcode::from_u8(message.op) {
                Some(GatewayOpcode::Dispatch) if message.t.as_deref() == Some("RESUMED") => {
                    info!("Session resumed successfully");
                    self.state.transition_to(ConnectionState::Connected);
                    let _ = self.event_tx.send(GatewayEventKind::Resumed);
                    return Ok(());
                }
                Some(GatewayOpcode::Dispatch) => {
                    if let Some(event_type) = message.t.as_deref() {
                        self.handle_dispatch(event_type, message.d);
                    }
                }
                Some(GatewayOpcode::InvalidSession) => {
                    let resumable = message.d.and_then(|d| d.as_bool()).unwrap_or(false);
                    if !resumable {
                        self.session.clear();
                    }
                    return Err(GatewayError::SessionInvalidated { resumable });
                }
                _ => return Err(GatewayError::protocol("Expected Resumed event")),
            }
        }
    }

    fn handle_ready_event(&mut self, message: GatewayMessage) -> GatewayResult<()> {
        self.session.update_sequence(message.s);

        let dispatch = EventParser::parse_dispatch("READY", message.d)?;

        if let DispatchEvent::Ready {
            session_id,
            resume_gateway_url,
            user,
            ..
        } = &dispatch
        {
            self.session
                .set_session(session_id.clone(), resume_gateway_url.clone());

            info!(session_id = %session_id, user = %user.username(), "Gateway ready");

            let _ = self.event_tx.send(GatewayEventKind::Connected {
                session_id: session_id.clone(),
                resume_url: resume_gateway_url.clone(),
            });

            let _ = self.event_tx.send(GatewayEventKind::Dispatch(dispatch));
        }

        Ok(())
    }

    pub async fn run(
        &mut self,
        commands: &mut mpsc::UnboundedReceiver<GatewayCommand>,
    ) -> GatewayResult<()> {
        while self.state.connection().is_connected() {
            tokio::select! {
                result = self.connection.receive() => {
                    if let Some(message) = result? {
                        self.handle_message(message).await?;
                    }
                }

                Some(outbound) = self.outbound_rx.recv() => {
                    match outbound {
                        Outbound::Payload(payload) => self.connection.send(&payload).await?,
                        Outbound::HeartbeatMissed => return Err(GatewayError::HeartbeatTimeout),
                    }
                }

                Some(command) = commands.recv() => {
                    match command {
                        GatewayCommand::RefreshPresence => {
                            debug!("Refreshing presence");
                            let payload = GatewayPayload::presence_update(&self.presence);
                            if let Err(e) = self.connection.send(&payload).await {
                                warn!(error = %e, "Failed to send presence update");
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }

    async fn handle_message(&mut self, message: GatewayMessage) -> GatewayResult<()> {
        self.session.update_sequence(message.s);
        if let (Some(tracker), Some(seq)) = (&self.heartbeat, message.s) {
            tracker.record_sequence(seq);
        }

        match GatewayOpcode::from_u8(message.op) {
            Some(GatewayOpcode::Dispatch) => {
                if let Some(event_type) = message.t.as_deref() {
                    trace!(event = event_type, "Raw dispatch received");
                    self.handle_dispatch(event_type, message.d);
                }
            }
            Some(GatewayOpcode::HeartbeatAck) => {
                if let Some(tracker) = &self.heartbeat {
                    tracker.record_ack();
                }
            }
            Some(GatewayOpcode::Heartbeat) => {
                debug!("Gateway requested immediate heartbeat");
                let payload = GatewayPayload::heartbeat(self.session.sequence());
                self.connection.send(&payload).await?;
            }
            Some(GatewayOpcode::Reconnect) => {
                info!("Gateway requested reconnect");
                return Err(GatewayError::ConnectionClosed {
                    code: 4000,
                    reason: "Reconnect requested".to_string(),
                });
            }
            Some(GatewayOpcode::InvalidSession) => {
                let resumable = message.d.and_then(|d| d.as_bool()).unwrap_or(false);

                warn!(resumable = resumable, "Session invalidated");

                if !resumable {
                    self.session.clear();
                }

                return Err(GatewayError::SessionInvalidated { resumable });
            }
            opcode => {
                debug!(opcode = ?opcode, "Unhandled opcode");
            }
        }

        Ok(())
    }

    fn handle_dispatch(&self, event_type: &str, data: Option<serde_json::Value>) {
        match EventParser::parse_dispatch(event_type, data) {
            Ok(DispatchEvent::Unknown { .. }) => {}
            Ok(event) => {
                debug!(event = event_type, "Dispatching event");
                let _ = self.event_tx.send(GatewayEventKind::Dispatch(event));
            }
            Err(e) => {
                warn!(event = event_type, error = %e, "Failed to parse dispatch event");
            }
        }
    }

    pub async fn close(&mut self) {
        debug!(state = %self.state.connection(), "Closing gateway connection");
        self.state.transition_to(ConnectionState::Disconnected);
        let _ = self.connection.disconnect().await;
    }

    #[must_use]
    pub const fn session(&self) -> &SessionInfo {
        &self.session
    }

    #[must_use]
    pub const fn state(&self) -> &GatewayState {
        &self.state
    }

    #[must_use]
    pub const fn heartbeat_interval(&self) -> Option<u64> {
        self.state.heartbeat_interval_ms()
    }
}
