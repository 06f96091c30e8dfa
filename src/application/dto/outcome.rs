//! Results reported by the render pipeline.

use crate::domain::entities::MessageId;
use crate::domain::errors::ContentErrorKind;

/// How the attachment of an out-link post was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentDispatch {
    /// Downloaded and uploaded as a video file.
    Video,
    /// Downloaded and uploaded as an image file.
    Image,
    /// Upload failed, the link was posted with a warning instead.
    LinkFallback,
    /// Not media, the link was posted as text.
    Link,
}

/// What happened to the platform's own preview of the trigger message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    /// Suppression was not requested for the destination.
    Kept,
    /// A suppression request was scheduled.
    SuppressionScheduled,
    /// The bot may not manage messages; the setting was turned off.
    SettingDisabled,
}

/// Summary card messages produced by one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryReport {
    /// The placeholder message.
    pub message_id: MessageId,
    /// Whether the placeholder was edited with refined content.
    pub refined: bool,
}

/// Everything a completed render did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    /// Present when a summary card was sent.
    pub summary: Option<SummaryReport>,
    /// Present when the post links out.
    pub attachment: Option<AttachmentDispatch>,
    /// Preview handling of the trigger message.
    pub preview: PreviewAction,
}

/// Terminal state of one render invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The destination is cooling down.
    Rejected,
    /// The link did not contain a post identifier.
    InvalidUrl,
    /// The post could not be fetched; a notice was sent.
    FetchFailed(ContentErrorKind),
    /// The post was rendered.
    Rendered(RenderReport),
}
