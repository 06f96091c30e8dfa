//! Domain entity definitions.

mod card;
mod channel;
mod comment;
mod community;
mod message;
mod permissions;
mod settings;
mod submission;
mod token;
mod user;

pub use card::{CardAuthor, CardFooter, FileUpload, RichCard};
pub use channel::{ChannelId, DestinationId, GuildId};
pub use comment::CommentNode;
pub use community::{
    AccentColor, CommunityInfo, RedditUser, UNSET_COMMUNITY_COLOR, random_default_avatar,
};
pub use message::{InboundMessage, MessageAuthor, MessageId};
pub use permissions::{GuildMember, PermissionOverwrite, Permissions, Role};
pub use settings::{DestinationSettings, SettingsPairing};
pub use submission::{Submission, SubmissionId, SubmissionThread};
pub use token::BotToken;
pub use user::{BotUser, UserId};

#[cfg(test)]
pub(crate) use submission::fixtures;
