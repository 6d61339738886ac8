//! Lossless parsing and rewriting for the Gradle Kotlin DSL build-script
//! subset.
//!
//! The pipeline is source-faithful end to end: the lexer assigns every byte to a
//! token on one of five channels, the parser builds a token-addressable CST
//! over the code and newline tokens, and [`RewriteBuffer`] replays the token
//! stream with queued edits to produce output that differs from the input
//! only where edits say so.
//!
//! Entry point is [`ParseSession::parse`]; navigation lives in [`blocks`] and
//! [`walk`], trivia queries in [`trivia`] and [`comments`], and expression
//! shape queries in [`expr`].

pub mod blocks;
pub mod comments;
pub mod cst;
pub mod diagnostics;
pub mod expr;
pub mod lexer;
mod parser;
pub mod rewrite;
pub mod session;
pub mod token;
pub mod trivia;
pub mod walk;

#[cfg(test)]
mod blocks_tests;
#[cfg(test)]
mod comments_tests;
#[cfg(test)]
mod rewrite_tests;

pub use cst::{Cst, CstNode, Element, NodeId, NodeKind};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use rewrite::RewriteBuffer;
pub use session::ParseSession;
pub use token::{Channel, Token, TokenKind};

/// Failures surfaced by this crate. Parsing itself never fails; these arise
/// when building on top of a broken parse or conflicting edits.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("script has syntax errors:\n{0}")]
    Syntax(Diagnostics),

    #[error("conflicting edits: {0}")]
    EditConflict(String),
}

pub type Result<T> = std::result::Result<T, Error>;
