use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "ember",
    version,
    about = "Discord bot that turns pasted Reddit links into post summaries",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Discord bot token.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Command prefix.
    #[arg(long)]
    pub prefix: Option<String>,

    /// top.gg API token.
    #[arg(long, env = "TOPGG_TOKEN", hide_env_values = true)]
    pub topgg_token: Option<String>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Destination settings file path.
    #[arg(long, value_name = "PATH")]
    pub settings_path: Option<PathBuf>,
}
