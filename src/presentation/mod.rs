//! Presentation layer: the gateway-driven bot loop.

/// Gateway event loop.
pub mod bot;

pub use bot::{BotRunner, PRESENCE_REFRESH_INTERVAL};
