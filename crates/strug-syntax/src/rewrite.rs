//! Token-addressed rewrite buffer.
//!
//! Edits are queued against token indices and applied in a single rendering
//! pass; the original session is never mutated, so several candidate edits
//! can be built from one parse. Range edits are conflict-checked when queued:
//! overlapping ranges are rejected unless they are the exact same edit
//! (re-deleting an already deleted range is a no-op).
//!
//! Rendering replays the token stream in order, so unedited tokens come out
//! byte-for-byte; edited output additionally has its end-of-file shape
//! pinned with [`trivia::trim_gently`].

use std::collections::HashMap;

use crate::session::ParseSession;
use crate::token::Channel;
use crate::trivia;
use crate::{Error, Result};

/// One queued range edit: tokens `first..=last` are replaced by `text`
/// (empty text deletes them).
#[derive(Debug, Clone, PartialEq, Eq)]
struct RangeEdit {
    first: u32,
    last: u32,
    text: String,
}

pub struct RewriteBuffer<'a> {
    session: &'a ParseSession,
    ranges: Vec<RangeEdit>,
    inserts_before: HashMap<u32, String>,
    inserts_after: HashMap<u32, String>,
}

impl<'a> RewriteBuffer<'a> {
    pub fn new(session: &'a ParseSession) -> Self {
        Self {
            session,
            ranges: Vec::new(),
            inserts_before: HashMap::new(),
            inserts_after: HashMap::new(),
        }
    }

    #[inline]
    pub fn session(&self) -> &'a ParseSession {
        self.session
    }

    /// Queues `text` to appear immediately before `token`. Repeated inserts
    /// at the same point concatenate in call order. The one-past-the-end
    /// token index appends at end of file.
    pub fn insert_before(&mut self, token: u32, text: impl AsRef<str>) {
        self.inserts_before
            .entry(token)
            .or_default()
            .push_str(text.as_ref());
    }

    /// Queues `text` to appear immediately after `token`.
    pub fn insert_after(&mut self, token: u32, text: impl AsRef<str>) {
        self.inserts_after
            .entry(token)
            .or_default()
            .push_str(text.as_ref());
    }

    /// Replaces tokens `first..=last` with `text`.
    pub fn replace(&mut self, first: u32, last: u32, text: impl Into<String>) -> Result<()> {
        self.push_range(RangeEdit {
            first,
            last,
            text: text.into(),
        })
    }

    pub fn replace_token(&mut self, token: u32, text: impl Into<String>) -> Result<()> {
        self.replace(token, token, text)
    }

    /// Deletes tokens `first..=last`.
    pub fn delete(&mut self, first: u32, last: u32) -> Result<()> {
        self.push_range(RangeEdit {
            first,
            last,
            text: String::new(),
        })
    }

    pub fn delete_token(&mut self, token: u32) -> Result<()> {
        self.delete(token, token)
    }

    fn push_range(&mut self, edit: RangeEdit) -> Result<()> {
        for existing in &self.ranges {
            let disjoint = edit.last < existing.first || edit.first > existing.last;
            if disjoint {
                continue;
            }
            if *existing == edit {
                return Ok(());
            }
            return Err(Error::EditConflict(format!(
                "tokens {}..={} already edited (new edit {}..={})",
                existing.first, existing.last, edit.first, edit.last
            )));
        }
        self.ranges.push(edit);
        Ok(())
    }

    fn delete_run(&mut self, run: Vec<u32>) -> Result<()> {
        for token in run {
            self.delete_token(token)?;
        }
        Ok(())
    }

    /// Deletes the whole blank-space run (blanks and newlines) left of `token`.
    pub fn delete_blank_space_to_left(&mut self, token: u32) -> Result<()> {
        self.delete_run(trivia::blank_space_to_left(self.session, token))
    }

    pub fn delete_blank_space_to_right(&mut self, token: u32) -> Result<()> {
        self.delete_run(trivia::blank_space_to_right(self.session, token))
    }

    /// Deletes horizontal whitespace left of `token`, stopping at a newline.
    pub fn delete_whitespace_to_left(&mut self, token: u32) -> Result<()> {
        self.delete_run(trivia::whitespace_to_left(self.session, token))
    }

    pub fn delete_whitespace_to_right(&mut self, token: u32) -> Result<()> {
        self.delete_run(trivia::whitespace_to_right(self.session, token))
    }

    /// Deletes the first newline left of `token`, skipping over blanks.
    pub fn delete_newline_to_left(&mut self, token: u32) -> Result<()> {
        let mut index = token;
        while index > 0 {
            index -= 1;
            match self.session.token(index).map(|t| t.channel()) {
                Some(Channel::Blank) => {}
                Some(Channel::Newline) => return self.delete_token(index),
                _ => break,
            }
        }
        Ok(())
    }

    pub fn delete_newline_to_right(&mut self, token: u32) -> Result<()> {
        let mut index = token + 1;
        while let Some(t) = self.session.token(index) {
            match t.channel() {
                Channel::Blank => index += 1,
                Channel::Newline => return self.delete_token(index),
                _ => break,
            }
        }
        Ok(())
    }

    /// Deletes the comments attached left of `token`, leaving the blank space
    /// between them in place.
    pub fn delete_comments_to_left(&mut self, token: u32) -> Result<()> {
        let comments = crate::comments::Comments::default();
        for t in comments.comment_tokens_to_left(self.session, token) {
            self.delete_token(t)?;
        }
        Ok(())
    }

    /// Deletes comments right of `token` on the same line.
    pub fn delete_comments_to_right(&mut self, token: u32) -> Result<()> {
        let mut index = token + 1;
        while let Some(t) = self.session.token(index) {
            match t.channel() {
                Channel::Blank => index += 1,
                Channel::LineComment | Channel::BlockComment => {
                    self.delete_token(index)?;
                    index += 1;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Deletes the blank-space run left of `token`, plus any comment lines
    /// directly attached above it, each with its indentation and terminator.
    /// A blank line breaks attachment, so comments separated from `token`
    /// by one stay put.
    ///
    /// Used when removing a whole statement: the statement keeps its own
    /// trailing newline, this removes everything that made up the lines
    /// above it, so the surrounding lines close ranks exactly.
    pub fn delete_comments_and_blank_space_to_left(&mut self, token: u32) -> Result<()> {
        let mut doomed = trivia::blank_space_to_left(self.session, token);
        let newlines = doomed
            .iter()
            .filter(|&&i| {
                self.session
                    .token(i)
                    .is_some_and(|t| t.channel() == Channel::Newline)
            })
            .count();
        let mut index = doomed.first().copied().unwrap_or(token);
        while newlines <= 1 {
            let Some(candidate) = index.checked_sub(1) else {
                break;
            };
            let Some(t) = self.session.token(candidate) else {
                break;
            };
            if !t.kind.is_comment() {
                break;
            }
            // Only full comment lines are attached; a comment trailing code
            // on the line above belongs to that code, not to `token`.
            let indentation = trivia::whitespace_to_left(self.session, candidate);
            let line_start = indentation.first().copied().unwrap_or(candidate);
            let owns_line = match line_start.checked_sub(1) {
                None => true,
                Some(i) => self
                    .session
                    .token(i)
                    .is_some_and(|t| t.channel() == Channel::Newline),
            };
            if !owns_line {
                break;
            }
            doomed.push(candidate);
            doomed.extend(indentation);
            index = line_start;
            // Terminator of the line above; also covers the newline over the
            // topmost comment, keeping line accounting exact.
            match index.checked_sub(1) {
                Some(i)
                    if self
                        .session
                        .token(i)
                        .is_some_and(|t| t.channel() == Channel::Newline) =>
                {
                    doomed.push(i);
                    index = i;
                }
                _ => break,
            }
        }
        for t in doomed {
            self.delete_token(t)?;
        }
        Ok(())
    }

    /// Deletes blanks and comments right of `token` up to (not including) the
    /// line terminator, so a trailing `// note` disappears with its statement.
    pub fn delete_comments_and_blank_space_to_right(&mut self, token: u32) -> Result<()> {
        let mut doomed = Vec::new();
        let mut index = token + 1;
        while let Some(t) = self.session.token(index) {
            match t.channel() {
                Channel::Blank | Channel::LineComment | Channel::BlockComment => {
                    doomed.push(index);
                    index += 1;
                }
                _ => break,
            }
        }
        for t in doomed {
            self.delete_token(t)?;
        }
        Ok(())
    }

    /// Applies all queued edits and renders the script.
    ///
    /// Fails with [`Error::Syntax`] when the underlying parse had errors;
    /// rewriting a broken tree would silently corrupt the script.
    pub fn render(&self) -> Result<String> {
        self.session.check()?;

        let mut ranges = self.ranges.clone();
        ranges.sort_by_key(|r| r.first);

        let mut out = String::new();
        let mut active: Option<&RangeEdit> = None;
        let len = self.session.tokens().len() as u32;
        for index in 0..len {
            if let Some(text) = self.inserts_before.get(&index) {
                out.push_str(text);
            }
            if let Some(range) = active
                && index > range.last
            {
                active = None;
            }
            if active.is_none()
                && let Some(range) = ranges.iter().find(|r| r.first == index)
            {
                out.push_str(&range.text);
                active = Some(range);
            }
            if active.is_none() {
                out.push_str(self.session.token_text(index));
            }
            if let Some(text) = self.inserts_after.get(&index) {
                out.push_str(text);
            }
        }
        if let Some(text) = self.inserts_before.get(&len) {
            out.push_str(text);
        }

        // An unedited replay is byte-exact; only edited output gets its
        // end-of-file shape re-pinned.
        if self.ranges.is_empty() && self.inserts_before.is_empty() && self.inserts_after.is_empty()
        {
            return Ok(out);
        }
        let terminal = trivia::count_terminal_newlines(self.session);
        Ok(trivia::trim_gently(&out, terminal))
    }
}

