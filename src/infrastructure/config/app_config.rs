//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::application::RenderConfig;
use crate::domain::entities::{BotToken, SettingsPairing};

pub(crate) const APP_NAME: &str = "ember";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "ember-bot";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Bot configuration, read once at startup.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Discord bot token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Command prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// top.gg API token; server count reporting is off without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topgg_token: Option<String>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Destination settings file. Defaults to the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_path: Option<PathBuf>,

    /// Render pipeline tunables.
    #[serde(default)]
    pub render: RenderSection,
}

/// `[render]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSection {
    /// Cooldown per channel, in milliseconds.
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,

    /// Time the placeholder card waits for lookups, in milliseconds.
    #[serde(default = "default_enrichment_budget_ms")]
    pub enrichment_budget_ms: u64,

    /// Delay before the link preview is suppressed, in milliseconds.
    #[serde(default = "default_suppress_delay_ms")]
    pub suppress_delay_ms: u64,

    /// Timeout of every outbound HTTP request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Largest attachment that is downloaded and re-uploaded.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// How the `posts` and `clean` toggles affect each other.
    #[serde(default)]
    pub settings_pairing: SettingsPairing,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            rate_limit_ms: default_rate_limit_ms(),
            enrichment_budget_ms: default_enrichment_budget_ms(),
            suppress_delay_ms: default_suppress_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
            settings_pairing: SettingsPairing::default(),
        }
    }
}

impl RenderSection {
    /// Converts to the pipeline configuration.
    #[must_use]
    pub const fn to_render_config(&self) -> RenderConfig {
        RenderConfig {
            rate_limit: Duration::from_millis(self.rate_limit_ms),
            enrichment_budget: Duration::from_millis(self.enrichment_budget_ms),
            suppress_delay: Duration::from_millis(self.suppress_delay_ms),
            max_upload_bytes: self.max_upload_bytes,
            pairing: self.settings_pairing,
        }
    }

    /// Timeout for outbound HTTP requests.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_prefix() -> String {
    "r/".to_string()
}

const fn default_rate_limit_ms() -> u64 {
    1500
}

const fn default_enrichment_budget_ms() -> u64 {
    1000
}

const fn default_suppress_delay_ms() -> u64 {
    100
}

const fn default_request_timeout_secs() -> u64 {
    15
}

const fn default_max_upload_bytes() -> usize {
    8 * 1024 * 1024
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(token) = args.token {
            self.token = Some(token);
        }
        if let Some(prefix) = args.prefix {
            self.prefix = prefix;
        }
        if let Some(topgg_token) = args.topgg_token {
            self.topgg_token = Some(topgg_token);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(settings_path) = args.settings_path {
            self.settings_path = Some(settings_path);
        }
    }

    /// Returns the validated bot token, if one is configured.
    #[must_use]
    pub fn bot_token(&self) -> Option<BotToken> {
        self.token.as_deref().and_then(BotToken::new)
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default settings file path.
    #[must_use]
    pub fn default_settings_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("settings.toml"))
    }

    /// Returns effective settings path.
    #[must_use]
    pub fn effective_settings_path(&self) -> Option<PathBuf> {
        self.settings_path
            .clone()
            .or_else(Self::default_settings_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            token: None,
            prefix: default_prefix(),
            topgg_token: None,
            log_path: None,
            log_level: LogLevel::Info,
            settings_path: None,
            render: RenderSection::default(),
        }
    }
}
