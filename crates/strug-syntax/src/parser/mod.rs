//! Recursive-descent parser producing the lossless CST.
//!
//! The parser walks the token stream by index and never materializes text.
//! Hidden-channel tokens (blanks, comments) are skipped transparently and are
//! not attached to nodes. Newlines are significant statement terminators at
//! statement level; inside parenthesized or bracketed regions they are
//! ignored like blanks (`newline_ignore_depth` tracks that).
//!
//! Errors never abort: the parser records a diagnostic, wraps skipped tokens
//! in [`NodeKind::Error`] nodes where needed, and keeps going. Every code and
//! newline token either lands in the tree or is deliberately consumed by an
//! opaque scan, so token extents stay contiguous.

mod grammar;

use crate::cst::{Cst, Element, NodeId, NodeKind};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::token::{Channel, Token, TokenKind};

/// Parses the token stream for `source` into a CST plus parser diagnostics.
pub(crate) fn parse(source: &str, tokens: &[Token]) -> (Cst, Diagnostics) {
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        newline_ignore_depth: 0,
        cst: Cst::default(),
        diagnostics: Diagnostics::default(),
    };
    parser.parse_script();
    (parser.cst, parser.diagnostics)
}

pub(crate) struct Parser<'s> {
    source: &'s str,
    tokens: &'s [Token],
    pos: usize,
    /// When non-zero, newline tokens are skipped like hidden trivia.
    newline_ignore_depth: u32,
    cst: Cst,
    diagnostics: Diagnostics,
}

impl Parser<'_> {
    /// Advances `pos` past tokens the grammar never sees.
    fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            let hidden = match token.channel() {
                Channel::Blank | Channel::LineComment | Channel::BlockComment => true,
                Channel::Newline => self.newline_ignore_depth > 0,
                Channel::Code => false,
            };
            if !hidden {
                break;
            }
            self.pos += 1;
        }
    }

    /// Current significant token, if any.
    fn current(&mut self) -> Option<Token> {
        self.skip_trivia();
        self.tokens.get(self.pos).copied()
    }

    fn current_kind(&mut self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    fn at(&mut self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    /// Consumes the current significant token into `children`.
    fn bump(&mut self, children: &mut Vec<Element>) {
        self.skip_trivia();
        if self.pos < self.tokens.len() {
            children.push(Element::Token(self.pos as u32));
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: TokenKind, children: &mut Vec<Element>) -> bool {
        if self.at(kind) {
            self.bump(children);
            true
        } else {
            self.error_here(format!("expected {kind:?}"));
            false
        }
    }

    fn error_here(&mut self, message: impl Into<String>) {
        let (line, column) = match self.current() {
            Some(token) => (token.line, token.column),
            None => self
                .tokens
                .last()
                .map(|t| (t.line, t.column))
                .unwrap_or((1, 1)),
        };
        self.diagnostics.push(Diagnostic::new(line, column, message));
    }

    /// Significant (non-hidden) tokens from the current position on, without
    /// advancing. Newlines are included regardless of ignore depth; lookahead
    /// routines decide what they mean.
    fn lookahead(&self) -> impl Iterator<Item = (usize, TokenKind)> + '_ {
        self.tokens[self.pos..]
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                !matches!(
                    t.channel(),
                    Channel::Blank | Channel::LineComment | Channel::BlockComment
                )
            })
            .map(|(i, t)| (self.pos + i, t.kind))
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.cst.alloc(kind)
    }

    fn finish(&mut self, id: NodeId, children: Vec<Element>) -> NodeId {
        self.cst.finish(id, children);
        id
    }
}
