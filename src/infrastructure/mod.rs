//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Discord REST and gateway clients.
pub mod discord;
/// top.gg reporting.
pub mod listing;
/// Reddit API client.
pub mod reddit;
/// Destination settings persistence.
pub mod settings_store;
/// Plain HTTP access.
pub mod web;

pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager};
pub use discord::{
    DiscordClient, DispatchEvent, GatewayClient, GatewayClientConfig, GatewayCommand,
    GatewayEventKind,
};
pub use listing::TopGgReporter;
pub use reddit::RedditClient;
pub use settings_store::FileSettingsStore;
pub use web::ReqwestWebClient;
