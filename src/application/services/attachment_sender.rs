//! Delivery of a post's attachment to a channel.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::media_classifier::MediaKind;
use super::notices::UPLOAD_FALLBACK_TEXT;
use super::text_format::spoiler;
use crate::application::dto::AttachmentDispatch;
use crate::domain::entities::{ChannelId, FileUpload};
use crate::domain::errors::ChatError;
use crate::domain::ports::{ChatPort, WebPort};

const SPOILER_PREFIX: &str = "SPOILER_";

/// Stable file name stem for an attachment URL.
#[must_use]
pub fn url_hash(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..16])
}

/// Upload file name in the form `[SPOILER_]<kind>-<hash>.<ext>`.
#[must_use]
pub fn attachment_filename(kind: MediaKind, url: &str, as_spoiler: bool) -> String {
    let (stem, ext) = match kind {
        MediaKind::Video => ("video", "mp4"),
        MediaKind::Image | MediaKind::Link => ("image", "png"),
    };
    let prefix = if as_spoiler { SPOILER_PREFIX } else { "" };
    format!("{prefix}{stem}-{}.{ext}", url_hash(url))
}

/// Sends attachments as files, falling back to plain links.
#[derive(Clone)]
pub struct AttachmentSender {
    chat: Arc<dyn ChatPort>,
    web: Arc<dyn WebPort>,
    max_upload_bytes: usize,
}

impl AttachmentSender {
    /// Creates new sender.
    #[must_use]
    pub fn new(chat: Arc<dyn ChatPort>, web: Arc<dyn WebPort>, max_upload_bytes: usize) -> Self {
        Self {
            chat,
            web,
            max_upload_bytes,
        }
    }

    /// Delivers `url` to the channel the way `kind` asks for.
    ///
    /// # Errors
    /// Returns error only if even the plain link could not be posted.
    pub async fn dispatch(
        &self,
        channel: ChannelId,
        url: &str,
        kind: MediaKind,
        as_spoiler: bool,
    ) -> Result<AttachmentDispatch, ChatError> {
        let uploaded = match kind {
            MediaKind::Link => {
                self.send_link(channel, url, as_spoiler).await?;
                return Ok(AttachmentDispatch::Link);
            }
            MediaKind::Video => self.upload(channel, url, kind, "video/mp4", as_spoiler).await,
            MediaKind::Image => self.upload(channel, url, kind, "image/png", as_spoiler).await,
        };

        if uploaded {
            return Ok(match kind {
                MediaKind::Video => AttachmentDispatch::Video,
                _ => AttachmentDispatch::Image,
            });
        }

        let link = if as_spoiler { spoiler(url) } else { url.to_string() };
        self.chat
            .send_text(channel, &format!("{UPLOAD_FALLBACK_TEXT} {link}"))
            .await?;
        Ok(AttachmentDispatch::LinkFallback)
    }

    async fn send_link(&self, channel: ChannelId, url: &str, as_spoiler: bool) -> Result<(), ChatError> {
        let text = if as_spoiler { spoiler(url) } else { url.to_string() };
        self.chat.send_text(channel, &text).await.map(|_| ())
    }

    async fn upload(
        &self,
        channel: ChannelId,
        url: &str,
        kind: MediaKind,
        content_type: &str,
        as_spoiler: bool,
    ) -> bool {
        let data = match self.web.fetch_bytes(url, self.max_upload_bytes).await {
            Ok(data) => data,
            Err(e) => {
                warn!(url = %url, error = %e, "Could not download attachment");
                return false;
            }
        };

        let file = FileUpload::new(
            attachment_filename(kind, url, as_spoiler),
            content_type,
            data,
        );
        debug!(channel_id = %channel, filename = %file.filename(), size = file.len(), "Uploading attachment");

        match self.chat.send_file(channel, file, None).await {
            Ok(_) => true,
            Err(e) => {
                warn!(url = %url, error = %e, "Could not upload attachment, sending link instead");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    use crate::domain::errors::WebError;
    use crate::domain::ports::mocks::{ChatAction, MockWebPort, RecordingChatPort};

    const CHANNEL: u64 = 10;

    fn sender(web: MockWebPort) -> (AttachmentSender, Arc<RecordingChatPort>) {
        let chat = Arc::new(RecordingChatPort::new());
        (
            AttachmentSender::new(chat.clone(), Arc::new(web), 1024),
            chat,
        )
    }

    fn serving_bytes() -> MockWebPort {
        let mut web = MockWebPort::new();
        web.expect_fetch_bytes()
            .returning(|_, _| Ok(Bytes::from_static(b"data")));
        web
    }

    #[test]
    fn test_filename_shape() {
        let hash = url_hash("https://i.redd.it/a.png");
        assert_eq!(hash.len(), 32);
        assert_eq!(
            attachment_filename(MediaKind::Image, "https://i.redd.it/a.png", false),
            format!("image-{hash}.png")
        );
        assert_eq!(
            attachment_filename(MediaKind::Video, "https://i.redd.it/a.png", true),
            format!("SPOILER_video-{hash}.mp4")
        );
    }

    #[tokio::test]
    async fn test_image_is_uploaded() {
        let (sender, chat) = sender(serving_bytes());
        let url = "https://i.redd.it/a.png";

        let result = sender
            .dispatch(ChannelId::from(CHANNEL), url, MediaKind::Image, false)
            .await
            .unwrap();

        assert_eq!(result, AttachmentDispatch::Image);
        assert_eq!(
            chat.actions(),
            vec![ChatAction::SendFile(
                ChannelId::from(CHANNEL),
                attachment_filename(MediaKind::Image, url, false)
            )]
        );
    }

    #[tokio::test]
    async fn test_failed_download_falls_back_to_link() {
        let mut web = MockWebPort::new();
        web.expect_fetch_bytes()
            .returning(|url, limit| Err(WebError::too_large(url, limit)));
        let (sender, chat) = sender(web);

        let result = sender
            .dispatch(ChannelId::from(CHANNEL), "https://v.redd.it/x", MediaKind::Video, true)
            .await
            .unwrap();

        assert_eq!(result, AttachmentDispatch::LinkFallback);
        assert_eq!(
            chat.actions(),
            vec![ChatAction::SendText(
                ChannelId::from(CHANNEL),
                format!("{UPLOAD_FALLBACK_TEXT} ||https://v.redd.it/x||")
            )]
        );
    }

    #[tokio::test]
    async fn test_failed_upload_falls_back_to_link() {
        let (sender, chat) = sender(serving_bytes());
        chat.set_fail_uploads(true);

        let result = sender
            .dispatch(ChannelId::from(CHANNEL), "https://i.redd.it/a.png", MediaKind::Image, false)
            .await
            .unwrap();

        assert_eq!(result, AttachmentDispatch::LinkFallback);
        assert!(matches!(&chat.actions()[..], [ChatAction::SendText(_, text)] if text.ends_with("https://i.redd.it/a.png")));
    }

    #[tokio::test]
    async fn test_link_is_posted_as_spoiler() {
        let (sender, chat) = sender(MockWebPort::new());

        let result = sender
            .dispatch(ChannelId::from(CHANNEL), "https://example.com", MediaKind::Link, true)
            .await
            .unwrap();

        assert_eq!(result, AttachmentDispatch::Link);
        assert_eq!(
            chat.actions(),
            vec![ChatAction::SendText(
                ChannelId::from(CHANNEL),
                "||https://example.com||".to_string()
            )]
        );
    }
}
