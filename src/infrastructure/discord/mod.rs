//! Discord REST and gateway adapters.

mod client;
mod dto;
pub mod gateway;

pub use client::DiscordClient;
pub use gateway::{
    DispatchEvent, GatewayClient, GatewayClientConfig, GatewayCommand, GatewayEventKind,
};
