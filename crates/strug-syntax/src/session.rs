//! Parse session: source, token stream, CST and diagnostics in one place.
//!
//! The session owns the source text; tokens and nodes reference it by span.
//! All higher layers (trivia queries, block navigation, rewriting,
//! extraction) read through the session.

use std::ops::Range;

use crate::cst::{Cst, Element, NodeId};
use crate::diagnostics::Diagnostics;
use crate::token::Token;
use crate::{Error, Result, lexer, parser};

pub struct ParseSession {
    source: String,
    tokens: Vec<Token>,
    cst: Cst,
    diagnostics: Diagnostics,
}

impl ParseSession {
    /// Lexes and parses `source`. Never fails; problems are collected as
    /// diagnostics and the CST covers as much of the input as possible.
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let (tokens, mut diagnostics) = lexer::lex(&source);
        let (cst, parse_diagnostics) = parser::parse(&source, &tokens);
        diagnostics.0.extend(parse_diagnostics.0);
        Self {
            source,
            tokens,
            cst,
            diagnostics,
        }
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[inline]
    pub fn cst(&self) -> &Cst {
        &self.cst
    }

    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    #[inline]
    pub fn is_error_free(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Fails with [`Error::Syntax`] when the parse produced diagnostics.
    pub fn check(&self) -> Result<()> {
        if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(Error::Syntax(self.diagnostics.clone()))
        }
    }

    #[inline]
    pub fn token(&self, index: u32) -> Option<Token> {
        self.tokens.get(index as usize).copied()
    }

    /// Text of the token at `index`. Empty for an out-of-range index.
    pub fn token_text(&self, index: u32) -> &str {
        match self.tokens.get(index as usize) {
            Some(token) => token.text(&self.source),
            None => "",
        }
    }

    /// Byte range covered by `node`, hidden tokens inside it included.
    pub fn node_span(&self, node: NodeId) -> Range<usize> {
        let node = self.cst.node(node);
        if node.first_token == u32::MAX {
            return 0..0;
        }
        let first = &self.tokens[node.first_token as usize];
        let last = &self.tokens[node.last_token as usize];
        first.start as usize..last.end as usize
    }

    /// Full source text of `node`, comments and blank space inside included.
    pub fn node_text(&self, node: NodeId) -> &str {
        &self.source[self.node_span(node)]
    }

    /// First token index of `node`, if it has any tokens.
    pub fn first_token(&self, node: NodeId) -> Option<u32> {
        let node = self.cst.node(node);
        (node.first_token != u32::MAX).then_some(node.first_token)
    }

    pub fn last_token(&self, node: NodeId) -> Option<u32> {
        let node = self.cst.node(node);
        (node.first_token != u32::MAX).then_some(node.last_token)
    }

    /// Renders the tree structure for tests: one element per line, nodes by
    /// kind, tokens as kind plus text.
    pub fn dump_cst(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.cst.root(), 0, &mut out);
        out
    }

    fn dump_node(&self, node: NodeId, depth: usize, out: &mut String) {
        use std::fmt::Write;
        let _ = writeln!(out, "{:indent$}{:?}", "", self.cst.kind(node), indent = depth * 2);
        for child in &self.cst.node(node).children {
            match *child {
                Element::Node(n) => self.dump_node(n, depth + 1, out),
                Element::Token(t) => {
                    let _ = writeln!(
                        out,
                        "{:indent$}{:?} {:?}",
                        "",
                        self.tokens[t as usize].kind,
                        self.token_text(t),
                        indent = (depth + 1) * 2
                    );
                }
            }
        }
    }
}

