/// A comment and its replies, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct CommentNode {
    pub author: String,
    pub body: String,
    pub score: i64,
    pub score_hidden: bool,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    #[must_use]
    pub fn new(author: impl Into<String>, body: impl Into<String>, score: i64) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
            score,
            score_hidden: false,
            replies: Vec::new(),
        }
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.score_hidden = true;
        self
    }

    #[must_use]
    pub fn with_reply(mut self, reply: Self) -> Self {
        self.replies.push(reply);
        self
    }

    /// First reply, which is the only branch followed when drilling down a thread.
    #[must_use]
    pub fn first_reply(&self) -> Option<&Self> {
        self.replies.first()
    }
}
