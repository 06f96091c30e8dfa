//! Application context shared by every use case.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::ChannelRateLimiter;
use crate::domain::entities::SettingsPairing;
use crate::domain::ports::{ChatPort, ContentPort, SettingsPort, WebPort};

/// Tunables of the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Cooldown window of the per-channel rate limiter.
    pub rate_limit: Duration,
    /// How long the placeholder waits for enrichment lookups.
    pub enrichment_budget: Duration,
    /// Delay before the trigger message's preview is suppressed.
    pub suppress_delay: Duration,
    /// Largest file the bot will download and upload.
    pub max_upload_bytes: usize,
    /// How paired settings toggles affect each other.
    pub pairing: SettingsPairing,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rate_limit: Duration::from_millis(1500),
            enrichment_budget: Duration::from_millis(1000),
            suppress_delay: Duration::from_millis(100),
            max_upload_bytes: 8 * 1024 * 1024,
            pairing: SettingsPairing::Complementary,
        }
    }
}

/// Ports and configuration, built once at startup and passed by reference.
#[derive(Clone)]
pub struct AppContext {
    pub(crate) content: Arc<dyn ContentPort>,
    pub(crate) chat: Arc<dyn ChatPort>,
    pub(crate) settings: Arc<dyn SettingsPort>,
    pub(crate) web: Arc<dyn WebPort>,
    pub(crate) rate_limiter: ChannelRateLimiter,
    pub(crate) config: RenderConfig,
    pub(crate) prefix: String,
}

impl AppContext {
    /// Creates new context.
    #[must_use]
    pub fn new(
        content: Arc<dyn ContentPort>,
        chat: Arc<dyn ChatPort>,
        settings: Arc<dyn SettingsPort>,
        web: Arc<dyn WebPort>,
        config: RenderConfig,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            content,
            chat,
            settings,
            web,
            rate_limiter: ChannelRateLimiter::new(config.rate_limit),
            config,
            prefix: prefix.into(),
        }
    }

    /// Command prefix users type.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }
}
