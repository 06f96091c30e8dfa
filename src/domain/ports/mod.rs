//! Port definitions.

mod chat_port;
mod content_port;
mod settings_port;
mod web_port;

pub use chat_port::ChatPort;
pub use content_port::ContentPort;
pub use settings_port::SettingsPort;
pub use web_port::WebPort;
