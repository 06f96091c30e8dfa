use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ember::application::{AppContext, HandleMessageUseCase};
use ember::infrastructure::{
    AppConfig, CliArgs, ConfigError, DiscordClient, FileSettingsStore, GatewayClient,
    GatewayClientConfig, RedditClient, ReqwestWebClient, StorageManager, TopGgReporter,
};
use ember::presentation::BotRunner;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

async fn create_runner(config: &AppConfig) -> Result<BotRunner> {
    let token = config.bot_token().ok_or(ConfigError::MissingToken)?;
    let timeout = config.render.request_timeout();

    let settings_path = config
        .effective_settings_path()
        .ok_or(ConfigError::ConfigDirNotFound)?;
    let settings = FileSettingsStore::open(&settings_path)
        .await
        .wrap_err_with(|| format!("failed to open settings at {}", settings_path.display()))?;

    let content = RedditClient::new(timeout)?;
    let chat = DiscordClient::new(token, timeout)?;
    let web = ReqwestWebClient::new(timeout)?;

    let ctx = AppContext::new(
        Arc::new(content),
        Arc::new(chat),
        Arc::new(settings),
        Arc::new(web),
        config.render.to_render_config(),
        config.prefix.clone(),
    );

    let reporter = match &config.topgg_token {
        Some(topgg_token) => Some(TopGgReporter::new(topgg_token.clone(), timeout)?),
        None => {
            warn!("No top.gg token configured, server count will not be reported");
            None
        }
    };

    let gateway = GatewayClient::new(GatewayClientConfig::new(format!(
        "{} help",
        config.prefix
    )));

    Ok(BotRunner::new(
        HandleMessageUseCase::new(ctx),
        gateway,
        reporter,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(eyre!("failed to load .env file: {e}"));
    }

    let config = load_config()?;
    init_logging(&config)?;

    info!(version = ember::VERSION, prefix = %config.prefix, "Starting Ember");

    let token = config.bot_token().ok_or(ConfigError::MissingToken)?;
    let runner = create_runner(&config).await?;
    runner.run(&token).await
}
