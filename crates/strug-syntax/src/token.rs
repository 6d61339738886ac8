//! Token kinds and the channel model.
//!
//! Every byte of the input ends up in exactly one token, including whitespace,
//! newlines and comments. Tokens carry a [`Channel`] instead of being dropped:
//! the parser only consumes [`Channel::Code`] and [`Channel::Newline`] tokens,
//! while the rest stay in the token stream for lossless rendering and for
//! trivia-aware edits.

use logos::Logos;
use serde::Serialize;
use std::ops::Range;

use crate::lexer::LexerState;

/// Routing of a token with respect to the parser.
///
/// `Newline` is split out of the hidden channels because newlines terminate
/// statements, so the parser must see them, while blanks and comments are
/// invisible to the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    /// Structural token the parser consumes.
    Code,
    /// Horizontal whitespace (spaces, tabs).
    Blank,
    /// `\n` or `\r\n`.
    Newline,
    /// `// ...` up to but not including the newline.
    LineComment,
    /// `/* ... */`, nesting-aware, may span lines.
    BlockComment,
}

/// A lexed token: kind plus byte span plus 1-based position.
///
/// Text is not stored; it is sliced from the source on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: u32,
    pub end: u32,
    /// 1-based line of the token's first byte.
    pub line: u32,
    /// 1-based column of the token's first byte.
    pub column: u32,
}

impl Token {
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    #[inline]
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.span()]
    }

    #[inline]
    pub fn channel(&self) -> Channel {
        self.kind.channel()
    }
}

/// All token kinds of the Gradle Kotlin DSL subset.
///
/// The lexer is deliberately permissive: anything it cannot classify becomes
/// an [`TokenKind::Unrecognized`] token rather than being dropped, so the
/// stream always concatenates back to the original source.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[logos(extras = LexerState)]
pub enum TokenKind {
    // Hidden channels.
    #[regex(r"[ \t]+")]
    Blank,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex(r"//[^\n\r]*", allow_greedy = true)]
    LineComment,

    #[token("/*", crate::lexer::scan_block_comment)]
    BlockComment,

    // Literals. Strings are scanned by callback to honor `\` escapes and
    // `${...}` templates.
    #[token("\"\"\"", crate::lexer::scan_multiline_string)]
    MultilineString,

    #[token("\"", crate::lexer::scan_line_string)]
    LineString,

    #[regex(r"'([^'\\\n\r]|\\[^\n\r])*'")]
    CharLiteral,

    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9]+)?[uULfF]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+[uUL]*")]
    Number,

    // Names. Keywords are matched first by exact token patterns.
    #[token("val")]
    KwVal,
    #[token("var")]
    KwVar,
    #[token("fun")]
    KwFun,
    #[token("class")]
    KwClass,
    #[token("object")]
    KwObject,
    #[token("import")]
    KwImport,
    #[token("for")]
    KwFor,
    #[token("while")]
    KwWhile,
    #[token("do")]
    KwDo,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("when")]
    KwWhen,
    #[token("try")]
    KwTry,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,
    #[token("null")]
    KwNull,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    /// Escaped identifier: `` `anything but backtick or newline` ``.
    #[regex(r"`[^`\n\r]+`")]
    BacktickIdent,

    // Punctuation and operators.
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,

    #[token("..")]
    DotDot,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("->")]
    Arrow,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("!!")]
    BangBang,
    #[token("!")]
    Bang,
    #[token("?:")]
    Elvis,
    #[token("?.")]
    QuestionDot,
    #[token("?")]
    Question,
    #[token("@")]
    At,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    /// Bytes the lexer could not classify, kept verbatim for losslessness.
    Unrecognized,
}

impl TokenKind {
    #[inline]
    pub fn channel(self) -> Channel {
        match self {
            TokenKind::Blank => Channel::Blank,
            TokenKind::Newline => Channel::Newline,
            TokenKind::LineComment => Channel::LineComment,
            TokenKind::BlockComment => Channel::BlockComment,
            _ => Channel::Code,
        }
    }

    /// Token is invisible to the grammar (everything but code and newlines).
    #[inline]
    pub fn is_hidden(self) -> bool {
        !matches!(self.channel(), Channel::Code | Channel::Newline)
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Keyword that opens a local declaration statement.
    #[inline]
    pub fn starts_declaration(self) -> bool {
        matches!(
            self,
            TokenKind::KwVal
                | TokenKind::KwVar
                | TokenKind::KwFun
                | TokenKind::KwClass
                | TokenKind::KwObject
                | TokenKind::KwImport
        )
    }

    /// Keyword that opens a loop statement.
    #[inline]
    pub fn starts_loop(self) -> bool {
        matches!(self, TokenKind::KwFor | TokenKind::KwWhile | TokenKind::KwDo)
    }

    /// Token usable as an infix function name (`version`, `apply`, `to`, ...).
    /// Plain operators also participate so binary expressions parse uniformly.
    #[inline]
    pub fn is_infix_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::BacktickIdent
                | TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Le
                | TokenKind::Ge
                | TokenKind::AmpAmp
                | TokenKind::PipePipe
                | TokenKind::Elvis
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::DotDot
                | TokenKind::Amp
                | TokenKind::Pipe
        )
    }
}
