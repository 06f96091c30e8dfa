mod client;
mod codec;
mod connection;
mod constants;
mod error;
mod events;
mod heartbeat;
mod payloads;
mod session;
mod state;

pub use client::{GatewayClient, GatewayClientConfig};
pub use constants::{GatewayIntent, GatewayIntents};
pub use error::{GatewayError, GatewayResult};
pub use events::{DispatchEvent, GatewayCommand, GatewayEventKind, UnavailableGuild};
