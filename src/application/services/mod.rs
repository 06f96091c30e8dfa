//! Application services used by the use cases.

pub mod attachment_sender;
pub mod comment_renderer;
pub mod media_classifier;
pub mod notices;
pub mod rate_limiter;
pub mod settings_service;
pub mod text_format;
pub mod trigger_parser;
pub mod url_resolver;

pub use attachment_sender::AttachmentSender;
pub use comment_renderer::CommentRenderer;
pub use media_classifier::{MediaClassifier, MediaKind};
pub use rate_limiter::ChannelRateLimiter;
pub use settings_service::SettingsService;
pub use trigger_parser::TriggerParser;
pub use url_resolver::UrlResolver;
