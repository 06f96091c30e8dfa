#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    WaitingForHello,
    Identifying,
    Resuming,
    Connected,
}

impl ConnectionState {
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::WaitingForHello => write!(f, "Waiting for Hello"),
            Self::Identifying => write!(f, "Identifying"),
            Self::Resuming => write!(f, "Resuming"),
            Self::Connected => write!(f, "Connected"),
        }
    }
}

#[derive(Debug, Default)]
pub struct GatewayState {
    connection: ConnectionState,
    heartbeat_interval_ms: Option<u64>,
}

impl GatewayState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            heartbeat_interval_ms: None,
        }
    }

    #[must_use]
    pub const fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub const fn transition_to(&mut self, state: ConnectionState) {
        self.connection = state;
    }

    pub const fn set_heartbeat_interval(&mut self, interval_ms: u64) {
        self.heartbeat_interval_ms = Some(interval_ms);
    }

    #[must_use]
    pub const fn heartbeat_interval_ms(&self) -> Option<u64> {
        self.heartbeat_interval_ms
    }
}
