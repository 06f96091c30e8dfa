//! Render submission use case implementation.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::application::context::AppContext;
use crate::application::dto::{
    AttachmentDispatch, PreviewAction, RenderOutcome, RenderReport, SummaryReport,
};
use crate::application::services::notices::{INVALID_URL_TEXT, content_error_card};
use crate::application::services::text_format::{score_badge, truncate};
use crate::application::services::{
    AttachmentSender, CommentRenderer, MediaClassifier, SettingsService, TriggerParser,
    UrlResolver,
};
use crate::domain::entities::{
    ChannelId, CommentNode, CommunityInfo, DestinationId, DestinationSettings, GuildId,
    InboundMessage, MessageId, Permissions, RichCard, Submission, SubmissionId,
    random_default_avatar,
};
use crate::domain::ports::ContentPort;

/// Card color when the subreddit could not be looked up.
pub const DEFAULT_CARD_COLOR: u32 = 0x2f_31_36;

const TITLE_MAX_CHARS: usize = 200;
const BODY_MAX_CHARS: usize = 1000;
const COMMENTS_MAX_CHARS: usize = 1000;
const SUBMISSION_DEPTH: u8 = 2;
const COMMENTS_DEPTH: u8 = 3;
const THREADS_WITH_ATTACHMENT: usize = 2;
const THREADS_WITHOUT_ATTACHMENT: usize = 5;

/// A best-effort lookup that either settled before the placeholder or is still running.
enum Lookup<T> {
    Settled(Option<T>),
    Pending(JoinHandle<Option<T>>),
}

impl<T> Lookup<T> {
    /// Waits for the task until `deadline`.
    async fn settle_until(mut handle: JoinHandle<Option<T>>, deadline: Instant) -> Self {
        match tokio::time::timeout_at(deadline, &mut handle).await {
            Ok(joined) => Self::Settled(joined.ok().flatten()),
            Err(_) => Self::Pending(handle),
        }
    }

    const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    fn settled(&self) -> Option<&T> {
        match self {
            Self::Settled(value) => value.as_ref(),
            Self::Pending(_) => None,
        }
    }

    async fn finish(self) -> Option<T> {
        match self {
            Self::Settled(value) => value,
            Self::Pending(handle) => handle.await.ok().flatten(),
        }
    }
}

/// Fields of the summary card that arrive asynchronously.
#[derive(Debug, Clone, Copy)]
struct Enrichment<'a> {
    author_icon: Option<&'a str>,
    community: Option<&'a CommunityInfo>,
    comments: Option<&'a [CommentNode]>,
}

/// Everything fixed about one render before the card is composed.
struct SummaryInput<'a> {
    submission: &'a Submission,
    include_comments: bool,
    max_threads: usize,
}

impl SummaryInput<'_> {
    fn compose(&self, enrichment: &Enrichment<'_>) -> RichCard {
        let submission = self.submission;

        let mut description = score_badge(submission.score);
        description.push('\n');
        description.push_str(&truncate(&submission.body, BODY_MAX_CHARS));
        if self.include_comments
            && let Some(comments) = enrichment.comments
        {
            description.push_str(&CommentRenderer::render(
                comments,
                self.max_threads,
                COMMENTS_MAX_CHARS,
            ));
        }

        let author_icon = enrichment
            .author_icon
            .map_or_else(random_default_avatar, str::to_string);

        let mut card = RichCard::new()
            .with_title(truncate(&submission.title, TITLE_MAX_CHARS))
            .with_url(submission.permalink_url())
            .with_description(description)
            .with_color(enrichment.community.map_or(DEFAULT_CARD_COLOR, |c| c.color.rgb()))
            .with_author(
                submission.author.clone(),
                Some(author_icon),
                Some(submission.author_url()),
            )
            .with_footer(
                format!("On r/{}", submission.community),
                enrichment.community.and_then(|c| c.icon_url.clone()),
            );
        if let Some(created) = submission.created_at() {
            card = card.with_timestamp(created);
        }
        card
    }
}

/// Fetches a linked post and renders it into the channel it was linked in.
#[derive(Clone)]
pub struct RenderSubmissionUseCase {
    ctx: AppContext,
    resolver: UrlResolver,
    sender: AttachmentSender,
    settings: SettingsService,
}

impl RenderSubmissionUseCase {
    /// Creates new render use case.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        let resolver = UrlResolver::new(Arc::clone(&ctx.web));
        let sender = AttachmentSender::new(
            Arc::clone(&ctx.chat),
            Arc::clone(&ctx.web),
            ctx.config.max_upload_bytes,
        );
        let settings = SettingsService::new(Arc::clone(&ctx.settings), ctx.config.pairing);
        Self {
            ctx,
            resolver,
            sender,
            settings,
        }
    }

    /// Runs the whole pipeline for a message that links to a post in `guild`.
    ///
    /// Every failure is reported in the channel or logged; nothing propagates.
    pub async fn execute(&self, message: &InboundMessage, guild: GuildId) -> RenderOutcome {
        let channel = message.channel_id();

        if !self.ctx.rate_limiter.try_admit(channel) {
            info!(channel_id = %channel, content = %message.content(), "Ignoring link, channel is rate limited");
            return RenderOutcome::Rejected;
        }

        let Some(trigger) = TriggerParser::parse(message.content()) else {
            debug!(content = %message.content(), "Link names no post");
            if let Err(e) = self
                .ctx
                .chat
                .reply_text(channel, message.id(), INVALID_URL_TEXT)
                .await
            {
                warn!(error = %e, "Failed to send invalid url reply");
            }
            return RenderOutcome::InvalidUrl;
        };
        debug!(submission_id = %trigger.submission_id, community = ?trigger.community, "Rendering submission");

        let submission = match self
            .ctx
            .content
            .fetch_submission(&trigger.submission_id, SUBMISSION_DEPTH)
            .await
        {
            Ok(thread) => thread.submission,
            Err(e) => {
                warn!(submission_id = %trigger.submission_id, error = %e, "Failed to fetch submission");
                let kind = e.kind();
                if let Err(e) = self.ctx.chat.send_card(channel, &content_error_card(kind)).await {
                    warn!(error = %e, "Failed to send fetch error notice");
                }
                return RenderOutcome::FetchFailed(kind);
            }
        };

        let destination = DestinationId::from(guild);
        let settings = self.settings.get(destination).await.unwrap_or_else(|e| {
            warn!(destination = %destination, error = %e, "Failed to read settings, using defaults");
            DestinationSettings::default()
        });

        let preview = self
            .handle_preview(message, guild, destination, settings)
            .await;

        let is_attachment = submission.is_attachment();
        let as_spoiler = submission.is_spoiler();

        let resolving = is_attachment.then(|| {
            let resolver = self.resolver.clone();
            let url = submission.url.clone();
            tokio::spawn(async move { resolver.resolve(&url).await })
        });

        let summary = if settings.send_summary {
            let input = SummaryInput {
                submission: &submission,
                include_comments: settings.include_comments,
                max_threads: if is_attachment {
                    THREADS_WITH_ATTACHMENT
                } else {
                    THREADS_WITHOUT_ATTACHMENT
                },
            };
            self.send_summary(channel, &input).await
        } else {
            debug!(destination = %destination, "Summary disabled for destination");
            None
        };

        let attachment = match resolving {
            Some(handle) => {
                let url = handle.await.unwrap_or_else(|e| {
                    warn!(error = %e, "Attachment resolution task failed");
                    submission.url.clone()
                });
                self.dispatch_attachment(channel, &url, &submission, as_spoiler)
                    .await
            }
            None => None,
        };

        RenderOutcome::Rendered(RenderReport {
            summary,
            attachment,
            preview,
        })
    }

    /// Sends the placeholder card and, if lookups were still running, edits it once.
    async fn send_summary(
        &self,
        channel: ChannelId,
        input: &SummaryInput<'_>,
    ) -> Option<SummaryReport> {
        let submission = input.submission;
        let deadline = Instant::now() + self.ctx.config.enrichment_budget;

        let user_task = {
            let content = Arc::clone(&self.ctx.content);
            let author = submission.author.clone();
            tokio::spawn(async move {
                match content.fetch_user(&author).await {
                    Ok(user) => user.icon_url,
                    Err(e) => {
                        debug!(author = %author, error = %e, "Author icon unavailable");
                        None
                    }
                }
            })
        };
        let community_task = {
            let content = Arc::clone(&self.ctx.content);
            let name = submission.community.clone();
            tokio::spawn(async move {
                content
                    .fetch_community(&name)
                    .await
                    .inspect_err(|e| debug!(community = %name, error = %e, "Community info unavailable"))
                    .ok()
            })
        };
        let comments_task = input.include_comments.then(|| {
            let content = Arc::clone(&self.ctx.content);
            let id = SubmissionId::new(submission.id.clone());
            tokio::spawn(async move { fetch_comments(content, id).await })
        });

        let user = Lookup::settle_until(user_task, deadline).await;
        let community = Lookup::settle_until(community_task, deadline).await;
        let comments = match comments_task {
            Some(task) => Lookup::settle_until(task, deadline).await,
            None => Lookup::Settled(None),
        };

        let placeholder = input.compose(&Enrichment {
            author_icon: user.settled().map(String::as_str),
            community: community.settled(),
            comments: comments.settled().map(Vec::as_slice),
        });
        let message_id = match self.ctx.chat.send_card(channel, &placeholder).await {
            Ok(id) => id,
            Err(e) => {
                warn!(channel_id = %channel, error = %e, "Failed to send summary card");
                return None;
            }
        };

        if !(user.is_pending() || community.is_pending() || comments.is_pending()) {
            return Some(SummaryReport {
                message_id,
                refined: false,
            });
        }

        debug!(message_id = %message_id, "Waiting for outstanding lookups");
        let (user, community, comments) =
            tokio::join!(user.finish(), community.finish(), comments.finish());

        let refined = input.compose(&Enrichment {
            author_icon: user.as_deref(),
            community: community.as_ref(),
            comments: comments.as_deref(),
        });
        let refined = self.edit_summary(channel, message_id, &refined).await;
        Some(SummaryReport {
            message_id,
            refined,
        })
    }

    async fn edit_summary(&self, channel: ChannelId, message: MessageId, card: &RichCard) -> bool {
        match self.ctx.chat.edit_card(channel, message, card).await {
            Ok(()) => true,
            Err(e) => {
                warn!(message_id = %message, error = %e, "Failed to refine summary card");
                false
            }
        }
    }

    async fn dispatch_attachment(
        &self,
        channel: ChannelId,
        url: &str,
        submission: &Submission,
        as_spoiler: bool,
    ) -> Option<AttachmentDispatch> {
        let kind = MediaClassifier::classify(url, submission.is_video);
        debug!(url = %url, kind = ?kind, spoiler = as_spoiler, "Dispatching attachment");
        match self.sender.dispatch(channel, url, kind, as_spoiler).await {
            Ok(dispatch) => Some(dispatch),
            Err(e) => {
                warn!(channel_id = %channel, error = %e, "Failed to send attachment");
                None
            }
        }
    }

    /// Schedules removal of the platform preview, or turns the setting off when
    /// the bot may not manage messages.
    async fn handle_preview(
        &self,
        message: &InboundMessage,
        guild: GuildId,
        destination: DestinationId,
        settings: DestinationSettings,
    ) -> PreviewAction {
        if !settings.suppress_preview {
            return PreviewAction::Kept;
        }

        let channel = message.channel_id();
        let permissions = match self.ctx.chat.channel_permissions(channel, guild).await {
            Ok(permissions) => permissions,
            Err(e) => {
                warn!(channel_id = %channel, error = %e, "Could not check permissions, keeping preview");
                return PreviewAction::Kept;
            }
        };

        if !permissions.contains(Permissions::MANAGE_MESSAGES) {
            if let Err(e) = self.settings.disable_preview_suppression(destination).await {
                warn!(destination = %destination, error = %e, "Failed to disable preview suppression");
            }
            return PreviewAction::SettingDisabled;
        }

        let chat = Arc::clone(&self.ctx.chat);
        let delay = self.ctx.config.suppress_delay;
        let message_id = message.id();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = chat.suppress_embeds(channel, message_id).await {
                warn!(message_id = %message_id, error = %e, "Failed to suppress link preview");
            }
        });
        PreviewAction::SuppressionScheduled
    }
}

async fn fetch_comments(
    content: Arc<dyn ContentPort>,
    id: Option<SubmissionId>,
) -> Option<Vec<CommentNode>> {
    let id = id?;
    match content.fetch_submission(&id, COMMENTS_DEPTH).await {
        Ok(thread) => Some(thread.comments),
        Err(e) => {
            debug!(submission_id = %id, error = %e, "Comments unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::application::context::RenderConfig;
    use crate::application::services::attachment_sender::attachment_filename;
    use crate::application::services::MediaKind;
    use crate::domain::entities::fixtures::{link_post, self_post};
    use crate::domain::entities::{AccentColor, MessageAuthor, UserId};
    use crate::domain::errors::ContentErrorKind;
    use crate::domain::ports::mocks::{
        ChatAction, MemorySettingsStore, MockWebPort, RecordingChatPort, ScriptedContentPort,
    };
    use bytes::Bytes;

    const CHANNEL: u64 = 10;
    const GUILD: u64 = 20;
    const TRIGGER: &str = "https://www.reddit.com/r/test/comments/abc123";
    const ICON: &str = "https://styles.redditmedia.com/icon.png";

    struct Harness {
        use_case: RenderSubmissionUseCase,
        chat: Arc<RecordingChatPort>,
        content: Arc<ScriptedContentPort>,
        store: Arc<MemorySettingsStore>,
    }

    fn harness(content: ScriptedContentPort, settings: DestinationSettings, web: MockWebPort) -> Harness {
        let chat = Arc::new(RecordingChatPort::new());
        let content = Arc::new(content);
        let store = Arc::new(MemorySettingsStore::with(
            DestinationId::from(GuildId::from(GUILD)),
            settings,
        ));
        let ctx = AppContext::new(
            content.clone(),
            chat.clone(),
            store.clone(),
            Arc::new(web),
            RenderConfig::default(),
            "r/",
        );
        Harness {
            use_case: RenderSubmissionUseCase::new(ctx),
            chat,
            content,
            store,
        }
    }

    fn message(content: &str) -> InboundMessage {
        InboundMessage::new(
            MessageId::from(1),
            ChannelId::from(CHANNEL),
            Some(GuildId::from(GUILD)),
            MessageAuthor {
                id: UserId::from(5),
                username: "someone".into(),
                bot: false,
            },
            content,
        )
    }

    fn summary_only() -> DestinationSettings {
        DestinationSettings {
            send_summary: true,
            include_comments: false,
            suppress_preview: false,
        }
    }

    fn cards(actions: &[ChatAction]) -> Vec<&ChatAction> {
        actions
            .iter()
            .filter(|a| matches!(a, ChatAction::SendCard(..) | ChatAction::EditCard(..)))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_self_post_with_fast_lookups_is_not_edited() {
        let content = ScriptedContentPort::new(self_post())
            .with_user_icon(ICON)
            .with_community(AccentColor::Primary(0x12_34_56), Some(ICON.into()));
        let h = harness(content, summary_only(), MockWebPort::new());

        let outcome = h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;

        let RenderOutcome::Rendered(report) = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert_eq!(report.attachment, None);
        assert_eq!(report.preview, PreviewAction::Kept);
        assert!(!report.summary.unwrap().refined);

        let actions = h.chat.actions();
        assert_eq!(actions.len(), 1);
        let ChatAction::SendCard(_, card) = &actions[0] else {
            panic!("expected a card");
        };
        assert_eq!(card.title(), Some("A test post"));
        assert_eq!(card.color(), Some(0x12_34_56));
        assert_eq!(card.author().unwrap().icon_url.as_deref(), Some(ICON));
        assert_eq!(card.footer().unwrap().text, "On r/test");
        assert!(card.description().unwrap().starts_with("⬆️ 4\u{20E3}2\u{20E3}\nHello world"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_lookups_refine_placeholder_once() {
        let content = ScriptedContentPort::new(self_post())
            .with_user_icon(ICON)
            .with_community(AccentColor::Primary(0x12_34_56), None)
            .with_lookup_delay(Duration::from_secs(5));
        let h = harness(content, summary_only(), MockWebPort::new());

        let outcome = h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;

        let RenderOutcome::Rendered(report) = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert!(report.summary.unwrap().refined);

        let actions = h.chat.actions();
        let cards = cards(&actions);
        assert_eq!(cards.len(), 2);
        let ChatAction::SendCard(_, placeholder) = cards[0] else {
            panic!("placeholder must come first");
        };
        let ChatAction::EditCard(_, edited_id, refined) = cards[1] else {
            panic!("refinement must be an edit");
        };
        assert_eq!(*edited_id, report.summary.unwrap().message_id);
        assert_eq!(placeholder.color(), Some(DEFAULT_CARD_COLOR));
        assert_ne!(placeholder.author().unwrap().icon_url.as_deref(), Some(ICON));
        assert_eq!(refined.color(), Some(0x12_34_56));
        assert_eq!(refined.author().unwrap().icon_url.as_deref(), Some(ICON));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_comments_are_only_added_in_edit() {
        let content = ScriptedContentPort::new(self_post())
            .with_comments(vec![CommentNode::new("alice", "nice post", 3)])
            .with_lookup_delay(Duration::from_secs(2));
        let settings = DestinationSettings {
            include_comments: true,
            ..summary_only()
        };
        let h = harness(content, settings, MockWebPort::new());

        h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;

        let actions = h.chat.actions();
        let cards = cards(&actions);
        let (ChatAction::SendCard(_, placeholder), ChatAction::EditCard(_, _, refined)) =
            (cards[0], cards[1])
        else {
            panic!("expected placeholder and edit");
        };
        assert!(!placeholder.description().unwrap().contains("alice"));
        assert!(refined.description().unwrap().contains("> **🔺3** __alice__\n> nice post\n"));
    }

    fn with_comments() -> DestinationSettings {
        DestinationSettings {
            include_comments: true,
            ..summary_only()
        }
    }

    fn rendered_threads(card: &RichCard) -> usize {
        card.description().unwrap_or_default().matches("__commenter").count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_timely_comments_are_in_placeholder_without_edit() {
        let content = ScriptedContentPort::new(self_post())
            .with_comments(vec![CommentNode::new("alice", "nice post", 3)]);
        let h = harness(content, with_comments(), MockWebPort::new());

        let outcome = h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;

        let RenderOutcome::Rendered(report) = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert!(!report.summary.unwrap().refined);
        assert_eq!(h.content.submission_calls(), 2);

        let actions = h.chat.actions();
        let cards = cards(&actions);
        assert_eq!(cards.len(), 1);
        let ChatAction::SendCard(_, card) = cards[0] else {
            panic!("expected a single placeholder");
        };
        assert!(card.description().unwrap().contains("> **🔺3** __alice__\n> nice post\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_thread_count_depends_on_attachment() {
        let comments: Vec<CommentNode> = (0..6)
            .map(|i| CommentNode::new(format!("commenter{i}"), format!("comment {i}"), i))
            .collect();

        let h = harness(
            ScriptedContentPort::new(self_post()).with_comments(comments.clone()),
            with_comments(),
            MockWebPort::new(),
        );
        h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;
        let actions = h.chat.actions();
        let ChatAction::SendCard(_, card) = cards(&actions)[0] else {
            panic!("expected a card");
        };
        assert_eq!(rendered_threads(card), THREADS_WITHOUT_ATTACHMENT);

        let mut web = MockWebPort::new();
        web.expect_fetch_bytes()
            .returning(|_, _| Ok(Bytes::from_static(b"png")));
        let h = harness(
            ScriptedContentPort::new(link_post("https://i.redd.it/pic.png")).with_comments(comments),
            with_comments(),
            web,
        );
        h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;
        let actions = h.chat.actions();
        let ChatAction::SendCard(_, card) = cards(&actions)[0] else {
            panic!("expected a card");
        };
        assert_eq!(rendered_threads(card), THREADS_WITH_ATTACHMENT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_comments_are_left_out_when_disabled() {
        let content = ScriptedContentPort::new(self_post())
            .with_comments(vec![CommentNode::new("alice", "nice post", 3)]);
        let h = harness(content, summary_only(), MockWebPort::new());

        h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;

        assert_eq!(h.content.submission_calls(), 1);
        let actions = h.chat.actions();
        let ChatAction::SendCard(_, card) = &actions[0] else {
            panic!("expected a card");
        };
        assert!(!card.description().unwrap().contains("alice"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_summary_disabled_only_dispatches_attachment() {
        let mut web = MockWebPort::new();
        web.expect_fetch_bytes()
            .times(1)
            .returning(|_, _| Ok(Bytes::from_static(b"png")));
        let url = "https://i.redd.it/pic.png";
        let content = ScriptedContentPort::new(link_post(url));
        let settings = DestinationSettings {
            send_summary: false,
            ..summary_only()
        };
        let h = harness(content, settings, web);

        let outcome = h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;

        let RenderOutcome::Rendered(report) = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert_eq!(report.summary, None);
        assert_eq!(report.attachment, Some(AttachmentDispatch::Image));
        assert_eq!(
            h.chat.actions(),
            vec![ChatAction::SendFile(
                ChannelId::from(CHANNEL),
                attachment_filename(MediaKind::Image, url, false)
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_mp4_attachment_takes_video_path_after_summary() {
        let mut web = MockWebPort::new();
        web.expect_fetch_bytes()
            .returning(|_, _| Ok(Bytes::from_static(b"mp4")));
        let url = "https://i.redd.it/clip.mp4";
        let mut post = link_post(url);
        post.spoiler = true;
        let h = harness(ScriptedContentPort::new(post), summary_only(), web);

        let outcome = h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;

        let RenderOutcome::Rendered(report) = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert_eq!(report.attachment, Some(AttachmentDispatch::Video));
        let actions = h.chat.actions();
        assert!(matches!(actions[0], ChatAction::SendCard(..)));
        assert_eq!(
            actions.last(),
            Some(&ChatAction::SendFile(
                ChannelId::from(CHANNEL),
                attachment_filename(MediaKind::Video, url, true)
            ))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_url_replies_without_fetching() {
        let h = harness(
            ScriptedContentPort::new(self_post()),
            summary_only(),
            MockWebPort::new(),
        );

        let outcome = h
            .use_case
            .execute(&message("https://www.reddit.com/comments/"), GuildId::from(GUILD))
            .await;

        assert_eq!(outcome, RenderOutcome::InvalidUrl);
        assert_eq!(h.content.submission_calls(), 0);
        assert_eq!(
            h.chat.actions(),
            vec![ChatAction::ReplyText(
                ChannelId::from(CHANNEL),
                MessageId::from(1),
                INVALID_URL_TEXT.to_string()
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_trigger_in_window_is_rejected() {
        let h = harness(
            ScriptedContentPort::new(self_post()),
            summary_only(),
            MockWebPort::new(),
        );

        let first = h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;
        let second = h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;

        assert!(matches!(first, RenderOutcome::Rendered(_)));
        assert_eq!(second, RenderOutcome::Rejected);
        assert_eq!(h.content.submission_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_sends_category_notice() {
        let h = harness(
            ScriptedContentPort::failing(ContentErrorKind::Private),
            summary_only(),
            MockWebPort::new(),
        );

        let outcome = h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;

        assert_eq!(outcome, RenderOutcome::FetchFailed(ContentErrorKind::Private));
        assert_eq!(
            h.chat.actions(),
            vec![ChatAction::SendCard(
                ChannelId::from(CHANNEL),
                content_error_card(ContentErrorKind::Private)
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_keeps_preview() {
        let settings = DestinationSettings {
            suppress_preview: true,
            ..summary_only()
        };
        let h = harness(
            ScriptedContentPort::failing(ContentErrorKind::NotFound),
            settings,
            MockWebPort::new(),
        );

        h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(
            !h.chat
                .actions()
                .iter()
                .any(|a| matches!(a, ChatAction::SuppressEmbeds(..)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_is_suppressed_after_delay() {
        let settings = DestinationSettings {
            suppress_preview: true,
            ..summary_only()
        };
        let h = harness(ScriptedContentPort::new(self_post()), settings, MockWebPort::new());

        let outcome = h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;
        let RenderOutcome::Rendered(report) = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert_eq!(report.preview, PreviewAction::SuppressionScheduled);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(h.chat.actions().contains(&ChatAction::SuppressEmbeds(
            ChannelId::from(CHANNEL),
            MessageId::from(1)
        )));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_manage_messages_disables_suppression() {
        let settings = DestinationSettings {
            suppress_preview: true,
            ..summary_only()
        };
        let h = harness(ScriptedContentPort::new(self_post()), settings, MockWebPort::new());
        h.chat
            .set_permissions(Permissions::all() - Permissions::MANAGE_MESSAGES);

        let outcome = h.use_case.execute(&message(TRIGGER), GuildId::from(GUILD)).await;
        let RenderOutcome::Rendered(report) = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert_eq!(report.preview, PreviewAction::SettingDisabled);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!h
            .chat
            .actions()
            .iter()
            .any(|a| matches!(a, ChatAction::SuppressEmbeds(..))));
        let stored = h.store.peek(DestinationId::from(GuildId::from(GUILD))).unwrap();
        assert!(!stored.suppress_preview);
        assert!(stored.send_summary);
    }
}
