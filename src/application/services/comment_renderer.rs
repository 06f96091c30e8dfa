//! Quoted, indented rendering of comment threads.

use super::text_format::{score_inline, truncate};
use crate::domain::entities::CommentNode;

/// Characters a single comment body may take before it is cut.
const MAX_COMMENT_CHARS: usize = 400;
/// Width of a card line at depth 0.
const LINE_WIDTH: usize = 76;
/// Width lost per nesting level.
const WIDTH_STEP: usize = 5;
/// Non-breaking spaces per nesting level.
const INDENT: &str = "\u{A0}\u{A0}\u{A0}\u{A0}\u{A0}\u{A0}\u{A0}\u{A0}\u{A0}";

/// Renders the comment section appended to a summary card.
pub struct CommentRenderer;

impl CommentRenderer {
    /// Renders up to `max_threads` visible top-level comments, each followed by its
    /// first-reply chain, and cuts the result to `max_chars`.
    ///
    /// Comments with a hidden score are skipped without using up a thread.
    #[must_use]
    pub fn render(comments: &[CommentNode], max_threads: usize, max_chars: usize) -> String {
        let mut out = String::from("\n");

        for comment in comments
            .iter()
            .filter(|c| !c.score_hidden)
            .take(max_threads)
        {
            let mut level = 0;
            let mut current = Some(comment);
            while let Some(node) = current.filter(|n| !n.body.is_empty()) {
                out.push_str(&Self::render_level(node, level));
                level += 1;
                current = node.first_reply();
            }
        }

        truncate(&out, max_chars)
    }

    fn render_level(comment: &CommentNode, level: usize) -> String {
        let header = format!("**{}** __{}__", score_inline(comment.score), comment.author);
        let body = truncate(&comment.body, MAX_COMMENT_CHARS).replace('\n', " ");

        if level == 0 {
            return format!("> {header}\n> {body}\n");
        }

        let indent = INDENT.repeat(level);
        let width = LINE_WIDTH.saturating_sub(level * WIDTH_STEP).max(1);
        let chars: Vec<char> = body.chars().collect();

        let mut out = format!("> {indent}{header}\n");
        for chunk in chars.chunks(width) {
            out.push_str("> ");
            out.push_str(&indent);
            out.extend(chunk);
            out.push('\n');
        }
        out
    }
}
