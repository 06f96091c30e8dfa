//! Per-destination bot settings.

use serde::{Deserialize, Serialize};

/// How enabling one toggle affects its paired toggle.
///
/// Summaries and preview suppression are paired: when summaries are posted the
/// platform preview is redundant, and when they are not the preview is the only
/// thing left to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsPairing {
    /// Setting summaries sets preview suppression to the opposite value, and vice versa.
    #[default]
    Complementary,
    /// Every toggle only changes itself.
    Independent,
}

/// Toggles that shape what the bot posts for a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct DestinationSettings {
    /// Post the rich summary card.
    #[serde(rename = "post_message", default = "default_true")]
    pub send_summary: bool,
    /// Append the comment section to the summary.
    #[serde(default)]
    pub include_comments: bool,
    /// Remove the platform's own link preview from the triggering message.
    #[serde(rename = "suppress_web_embed", default = "default_true")]
    pub suppress_preview: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for DestinationSettings {
    fn default() -> Self {
        Self {
            send_summary: true,
            include_comments: false,
            suppress_preview: true,
        }
    }
}

impl DestinationSettings {
    /// Returns a copy with the summary toggle set.
    #[must_use]
    pub const fn with_send_summary(mut self, enabled: bool, pairing: SettingsPairing) -> Self {
        self.send_summary = enabled;
        if matches!(pairing, SettingsPairing::Complementary) {
            self.suppress_preview = !enabled;
        }
        self
    }

    /// Returns a copy with the comments toggle set.
    #[must_use]
    pub const fn with_include_comments(mut self, enabled: bool) -> Self {
        self.include_comments = enabled;
        self
    }

    /// Returns a copy with the preview suppression toggle set.
    #[must_use]
    pub const fn with_suppress_preview(mut self, enabled: bool, pairing: SettingsPairing) -> Self {
        self.suppress_preview = enabled;
        if matches!(pairing, SettingsPairing::Complementary) {
            self.send_summary = !enabled;
        }
        self
    }

    /// Returns a copy with preview suppression off and nothing else touched.
    #[must_use]
    pub const fn without_preview_suppression(mut self) -> Self {
        self.suppress_preview = false;
        self
    }
}
