//! Whitespace and newline queries over the token stream.
//!
//! Terminology: *whitespace* is horizontal (spaces and tabs) only;
//! *blank space* also includes newlines. The distinction matters for edits
//! that must keep statement terminators intact.

use crate::session::ParseSession;
use crate::token::Channel;

/// Fallback indentation when a token has no leading whitespace to copy.
pub const DEFAULT_INDENT: &str = "  ";

/// Indices of the contiguous run of blank-space tokens (blanks and newlines)
/// immediately left of `token`, in source order.
pub fn blank_space_to_left(session: &ParseSession, token: u32) -> Vec<u32> {
    run_to_left(session, token, |c| {
        matches!(c, Channel::Blank | Channel::Newline)
    })
}

pub fn blank_space_to_right(session: &ParseSession, token: u32) -> Vec<u32> {
    run_to_right(session, token, |c| {
        matches!(c, Channel::Blank | Channel::Newline)
    })
}

/// Indices of the contiguous run of horizontal-whitespace tokens immediately
/// left of `token`, in source order. Stops at a newline.
pub fn whitespace_to_left(session: &ParseSession, token: u32) -> Vec<u32> {
    run_to_left(session, token, |c| c == Channel::Blank)
}

pub fn whitespace_to_right(session: &ParseSession, token: u32) -> Vec<u32> {
    run_to_right(session, token, |c| c == Channel::Blank)
}

fn run_to_left(
    session: &ParseSession,
    token: u32,
    matches: impl Fn(Channel) -> bool,
) -> Vec<u32> {
    let mut run = Vec::new();
    let mut index = token;
    while index > 0 {
        index -= 1;
        match session.token(index) {
            Some(t) if matches(t.channel()) => run.push(index),
            _ => break,
        }
    }
    run.reverse();
    run
}

fn run_to_right(
    session: &ParseSession,
    token: u32,
    matches: impl Fn(Channel) -> bool,
) -> Vec<u32> {
    let mut run = Vec::new();
    let mut index = token + 1;
    while let Some(t) = session.token(index) {
        if !matches(t.channel()) {
            break;
        }
        run.push(index);
        index += 1;
    }
    run
}

/// Number of newline tokens at the very end of the script, ignoring trailing
/// horizontal whitespace. Used to restore the original end-of-file shape
/// after rendering.
pub fn count_terminal_newlines(session: &ParseSession) -> usize {
    let mut count = 0;
    for token in session.tokens().iter().rev() {
        match token.channel() {
            Channel::Newline => count += 1,
            Channel::Blank => {}
            _ => break,
        }
    }
    count
}

/// Indentation in effect at `token`: the whitespace run starting its line,
/// or [`DEFAULT_INDENT`] when the token is flush left.
pub fn compute_indent(session: &ParseSession, token: u32) -> String {
    let run = whitespace_to_left(session, token);
    match run.first() {
        Some(&first) => session.token_text(first).to_string(),
        None => DEFAULT_INDENT.to_string(),
    }
}

/// Trims trailing whitespace and pins the number of trailing newlines.
/// Leading whitespace belongs to the script and is left alone.
pub fn trim_gently(text: &str, terminal_newlines: usize) -> String {
    let mut out = text.trim_end().to_string();
    for _ in 0..terminal_newlines {
        out.push('\n');
    }
    out
}

