//! Cards and texts the bot answers users with.

use crate::domain::entities::{DestinationSettings, RichCard};
use crate::domain::errors::ContentErrorKind;

/// Accent color of error, warning and help cards.
pub const NOTICE_COLOR: u32 = 0xFF_43_01;

/// Reply to a link that names no post.
pub const INVALID_URL_TEXT: &str = "Invalid Reddit url.";

/// Prefix of the link posted when an upload fails.
pub const UPLOAD_FALLBACK_TEXT: &str = "⚠️ Could not upload to Discord, take a link instead:";

const MISSING_PERMISSIONS_TITLE: &str = "No Discord permissions";
const MISSING_PERMISSIONS_TEXT: &str = "You disabled my powers! Please allow me to **send messages**, \
     **manage messages**, **embed links**, **add reactions** and **attach files**.";

/// Builds an error card.
#[must_use]
pub fn error_card(title: &str, message: &str) -> RichCard {
    RichCard::new()
        .with_title(format!("❌ {title}"))
        .with_description(message)
        .with_color(NOTICE_COLOR)
}

/// Builds a warning card.
#[must_use]
pub fn warning_card(title: &str, message: &str) -> RichCard {
    RichCard::new()
        .with_title(format!("⚠️ {title}"))
        .with_description(message)
        .with_color(NOTICE_COLOR)
}

/// Card explaining why a post could not be fetched.
#[must_use]
pub fn content_error_card(kind: ContentErrorKind) -> RichCard {
    error_card(kind.notice_title(), kind.notice_body())
}

/// Card listing what the bot lacks in a channel.
#[must_use]
pub fn missing_permissions_card() -> RichCard {
    error_card(MISSING_PERMISSIONS_TITLE, MISSING_PERMISSIONS_TEXT)
}

/// Plain text variant of [`missing_permissions_card`] for channels without embeds.
#[must_use]
pub const fn missing_permissions_text() -> &'static str {
    MISSING_PERMISSIONS_TEXT
}

/// Help card for the given command prefix.
#[must_use]
pub fn help_card(prefix: &str) -> RichCard {
    let description = format!(
        "**Paste a reddit url and I will embed the content of the post into the channel!**\n\n\
         `{prefix} help` shows this message.\n\
         `{prefix} settings` shows what I do in this server.\n\
         `{prefix} posts on|off` toggles the post summary.\n\
         `{prefix} comments on|off` toggles comments in the summary.\n\
         `{prefix} clean on|off` toggles removing Discord's own link preview."
    );
    RichCard::new()
        .with_title("Reddit Bot Help")
        .with_description(description)
        .with_color(NOTICE_COLOR)
}

/// Sentence confirming the summary toggle.
#[must_use]
pub fn send_summary_sentence(enabled: bool) -> String {
    format!(
        "Ember will {} send post information replies.",
        if enabled { "now" } else { "no longer" }
    )
}

/// Sentence confirming the comments toggle.
#[must_use]
pub fn include_comments_sentence(enabled: bool) -> String {
    format!(
        "Ember will {} comments in the post description.",
        if enabled { "show" } else { "not show" }
    )
}

/// Sentence confirming the preview suppression toggle.
#[must_use]
pub fn suppress_preview_sentence(enabled: bool) -> String {
    format!(
        "Ember will {} the discord auto embeds in the users message.",
        if enabled { "clean" } else { "leave" }
    )
}

/// All three sentences, one per line.
#[must_use]
pub fn settings_summary(settings: &DestinationSettings) -> String {
    format!(
        "{}\n{}\n{}\n",
        send_summary_sentence(settings.send_summary),
        include_comments_sentence(settings.include_comments),
        suppress_preview_sentence(settings.suppress_preview)
    )
}
