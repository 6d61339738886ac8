//! Comment queries with block-depth-aware re-indentation.
//!
//! The level is driven by the caller (typically a [`crate::walk`] visitor)
//! so a comment lifted out of a nested block can be re-indented for the
//! depth it will be printed at.

use crate::session::ParseSession;
use crate::token::Channel;
use crate::trivia;

pub struct Comments {
    level: usize,
    indent: String,
}

impl Comments {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            level: 0,
            indent: indent.into(),
        }
    }

    pub fn on_enter_block(&mut self) {
        self.level += 1;
    }

    pub fn on_exit_block(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Comment tokens in the trivia run immediately left of `token`,
    /// in source order. A blank line does not end the run; the first code
    /// token to the left does.
    pub fn comment_tokens_to_left(&self, session: &ParseSession, token: u32) -> Vec<u32> {
        let mut comments = Vec::new();
        let mut index = token;
        while index > 0 {
            index -= 1;
            match session.token(index) {
                Some(t) => match t.channel() {
                    Channel::Blank | Channel::Newline => {}
                    Channel::LineComment | Channel::BlockComment => comments.push(index),
                    Channel::Code => break,
                },
                None => break,
            }
        }
        comments.reverse();
        comments
    }

    /// The comments to the left of `token` joined by newlines, each comment
    /// trimmed and indented for the current level. `None` when there are no
    /// comments.
    pub fn comments_to_left(&self, session: &ParseSession, token: u32) -> Option<String> {
        let tokens = self.comment_tokens_to_left(session, token);
        if tokens.is_empty() {
            return None;
        }
        let prefix = self.indent.repeat(self.level);
        let joined = tokens
            .iter()
            .map(|&t| format!("{prefix}{}", session.token_text(t).trim()))
            .collect::<Vec<_>>()
            .join("\n");
        Some(joined)
    }

    /// All comment tokens strictly inside `block`'s token extent.
    pub fn comment_tokens_in_block(
        &self,
        session: &ParseSession,
        block: crate::cst::NodeId,
    ) -> Vec<u32> {
        let Some(first) = session.first_token(block) else {
            return Vec::new();
        };
        let Some(last) = session.last_token(block) else {
            return Vec::new();
        };
        (first..=last)
            .filter(|&i| {
                session
                    .token(i)
                    .is_some_and(|t| t.kind.is_comment())
            })
            .collect()
    }
}

impl Default for Comments {
    fn default() -> Self {
        Self::new(trivia::DEFAULT_INDENT)
    }
}

