//! Inbound message routing.

use tracing::{debug, info, warn};

use crate::application::context::AppContext;
use crate::application::dto::{BotCommand, RenderOutcome};
use crate::application::services::notices::{
    error_card, help_card, include_comments_sentence, missing_permissions_card,
    missing_permissions_text, send_summary_sentence, settings_summary, suppress_preview_sentence,
};
use crate::application::services::{SettingsService, TriggerParser};
use crate::domain::entities::{ChannelId, DestinationId, GuildId, InboundMessage, Permissions};
use crate::domain::errors::{ChatError, StoreError};

use super::RenderSubmissionUseCase;

/// What an inbound message turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageRoute {
    /// Sent by a bot, outside a guild, or not addressed to us.
    Ignored,
    /// A prefix command.
    Command(BotCommand),
    /// A Reddit link, with the render result.
    Link(RenderOutcome),
}

/// Routes inbound messages to commands or the render pipeline.
#[derive(Clone)]
pub struct HandleMessageUseCase {
    ctx: AppContext,
    render: RenderSubmissionUseCase,
    settings: SettingsService,
}

impl HandleMessageUseCase {
    /// Creates new message handler.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        let render = RenderSubmissionUseCase::new(ctx.clone());
        let settings = SettingsService::new(ctx.settings.clone(), ctx.config.pairing);
        Self {
            ctx,
            render,
            settings,
        }
    }

    /// Handles one inbound message.
    pub async fn execute(&self, message: &InboundMessage) -> MessageRoute {
        if message.is_from_bot() {
            return MessageRoute::Ignored;
        }
        let Some(guild) = message.guild_id() else {
            return MessageRoute::Ignored;
        };

        let content = message.content().trim_start();
        if let Some(rest) = content.strip_prefix(self.ctx.prefix()) {
            let command = BotCommand::parse(rest);
            debug!(command = ?command, channel_id = %message.channel_id(), "Handling command");
            if let Err(e) = self.run_command(message, guild, &command).await {
                warn!(command = ?command, error = %e, "Command failed");
            }
            return MessageRoute::Command(command);
        }

        if TriggerParser::is_reddit_link(content) {
            return MessageRoute::Link(self.render.execute(message, guild).await);
        }

        MessageRoute::Ignored
    }

    async fn run_command(
        &self,
        message: &InboundMessage,
        guild: GuildId,
        command: &BotCommand,
    ) -> Result<(), ChatError> {
        let channel = message.channel_id();
        let chat = &self.ctx.chat;

        let permissions = chat.channel_permissions(channel, guild).await?;
        if !permissions.has_required() {
            info!(channel_id = %channel, permissions = ?permissions, "Missing permissions in channel");
            if permissions.contains(Permissions::EMBED_LINKS) {
                chat.send_card(channel, &missing_permissions_card()).await?;
            } else {
                chat.send_text(channel, missing_permissions_text()).await?;
            }
        }

        if command.is_settings_change() {
            let author_permissions = chat
                .member_permissions(channel, guild, message.author().id)
                .await?;
            if !author_permissions.contains(Permissions::MANAGE_GUILD) {
                chat.send_card(
                    channel,
                    &error_card(
                        "Not allowed",
                        "You need the **Manage Server** permission to change my settings.",
                    ),
                )
                .await?;
                return Ok(());
            }
        }

        let destination = DestinationId::from(guild);
        match command {
            BotCommand::Help => {
                chat.send_card(channel, &help_card(self.ctx.prefix())).await?;
            }
            BotCommand::ShowSettings => match self.settings.get(destination).await {
                Ok(settings) => {
                    chat.send_text(channel, &settings_summary(&settings)).await?;
                }
                Err(e) => self.report_store_error(channel, &e).await?,
            },
            BotCommand::SetSendSummary(enabled) => {
                let result = self.settings.set_send_summary(destination, *enabled).await;
                self.confirm(channel, result, send_summary_sentence(*enabled))
                    .await?;
            }
            BotCommand::SetIncludeComments(enabled) => {
                let result = self
                    .settings
                    .set_include_comments(destination, *enabled)
                    .await;
                self.confirm(channel, result, include_comments_sentence(*enabled))
                    .await?;
            }
            BotCommand::SetSuppressPreview(enabled) => {
                let result = self
                    .settings
                    .set_suppress_preview(destination, *enabled)
                    .await;
                self.confirm(channel, result, suppress_preview_sentence(*enabled))
                    .await?;
            }
            BotCommand::Unknown(raw) => {
                debug!(command = %raw, "Unknown command");
            }
        }
        Ok(())
    }

    async fn confirm<T>(
        &self,
        channel: ChannelId,
        result: Result<T, StoreError>,
        sentence: String,
    ) -> Result<(), ChatError> {
        match result {
            Ok(_) => {
                self.ctx.chat.send_text(channel, &sentence).await?;
                Ok(())
            }
            Err(e) => self.report_store_error(channel, &e).await,
        }
    }

    async fn report_store_error(
        &self,
        channel: ChannelId,
        error: &StoreError,
    ) -> Result<(), ChatError> {
        warn!(channel_id = %channel, error = %error, "Settings store failed");
        self.ctx
            .chat
            .send_card(
                channel,
                &error_card("Settings unavailable", "Could not access the server settings."),
            )
            .await?;
        Ok(())
    }
}
