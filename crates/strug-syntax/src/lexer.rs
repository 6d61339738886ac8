//! Lossless lexer.
//!
//! Produces span-based tokens covering every byte of the input; text is sliced
//! from source only when needed. Consecutive unclassifiable bytes are
//! coalesced into single [`TokenKind::Unrecognized`] tokens so the stream
//! still concatenates back to the original source, and each such run is also
//! reported as a diagnostic.

use logos::Logos;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::token::{Token, TokenKind};

/// Mutable state threaded through Logos callbacks.
///
/// Strings and block comments need hand-rolled scanning (escapes, `${...}`
/// templates, nested comments); when a scan runs off the end of the input the
/// error is recorded here with its byte offset.
#[derive(Debug, Default)]
pub struct LexerState {
    pub errors: Vec<(usize, String)>,
}

/// Tokenizes `source`, returning the token stream and any lexer diagnostics.
///
/// The concatenation of all token texts is exactly `source`.
pub fn lex(source: &str) -> (Vec<Token>, Diagnostics) {
    let line_starts = line_starts(source);
    let position = |offset: usize| -> (u32, u32) {
        let line = line_starts.partition_point(|&s| s <= offset);
        let column = source[line_starts[line - 1]..offset].chars().count() + 1;
        (line as u32, column as u32)
    };

    let mut tokens = Vec::new();
    let mut diagnostics = Diagnostics::default();
    let mut lexer = TokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    let mut push = |kind: TokenKind, start: usize, end: usize, tokens: &mut Vec<Token>| {
        let (line, column) = position(start);
        tokens.push(Token {
            kind,
            start: start as u32,
            end: end as u32,
            line,
            column,
        });
    };

    loop {
        let next = lexer.next();

        // Flush a pending run of unrecognized bytes before the next token.
        if !matches!(next, Some(Err(())))
            && let Some(start) = error_start.take()
        {
            let end = match next {
                Some(_) => lexer.span().start,
                None => source.len(),
            };
            push(TokenKind::Unrecognized, start, end, &mut tokens);
            let (line, column) = position(start);
            diagnostics.push(Diagnostic::new(
                line,
                column,
                format!("unrecognized input `{}`", &source[start..end]),
            ));
        }

        match next {
            Some(Ok(kind)) => {
                let span = lexer.span();
                push(kind, span.start, span.end, &mut tokens);
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => break,
        }
    }

    for (offset, message) in std::mem::take(&mut lexer.extras.errors) {
        let (line, column) = position(offset);
        diagnostics.push(Diagnostic::new(line, column, message));
    }
    diagnostics.0.sort_by_key(|d| (d.line, d.column));

    (tokens, diagnostics)
}

fn line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in source.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// Scans past a `/*` opener, honoring nesting. Unterminated comments consume
/// the rest of the input and record an error.
pub(crate) fn scan_block_comment(lex: &mut logos::Lexer<TokenKind>) {
    let bytes = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            depth += 1;
            i += 2;
        } else if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
            depth -= 1;
            i += 2;
            if depth == 0 {
                lex.bump(i);
                return;
            }
        } else {
            i += 1;
        }
    }
    let start = lex.span().start;
    lex.bump(bytes.len());
    lex.extras
        .errors
        .push((start, "unterminated block comment".to_string()));
}

/// Scans a single-line string after its opening quote.
///
/// Handles `\` escapes and `${...}` templates; template bodies may contain
/// nested strings and braces. A bare newline outside a template ends the scan
/// and records an unterminated-string error.
pub(crate) fn scan_line_string(lex: &mut logos::Lexer<TokenKind>) {
    let bytes = lex.remainder().as_bytes();
    let mut template_depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 1;
                // Escaped char is ASCII in every form we care about (\" \\ \$ \u).
                if i < bytes.len() && bytes[i].is_ascii() {
                    i += 1;
                }
            }
            b'"' if template_depth == 0 => {
                lex.bump(i + 1);
                return;
            }
            b'"' => {
                // Nested string inside a template expression.
                i += 1;
                while i < bytes.len() {
                    match bytes[i] {
                        b'\\' => i += 2.min(bytes.len() - i),
                        b'"' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
            }
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                template_depth += 1;
                i += 2;
            }
            b'{' if template_depth > 0 => {
                template_depth += 1;
                i += 1;
            }
            b'}' if template_depth > 0 => {
                template_depth -= 1;
                i += 1;
            }
            b'\n' | b'\r' if template_depth == 0 => break,
            _ => i += 1,
        }
    }
    let start = lex.span().start;
    lex.bump(i);
    lex.extras
        .errors
        .push((start, "unterminated string literal".to_string()));
}

/// Scans a `"""` string after its opening delimiter.
pub(crate) fn scan_multiline_string(lex: &mut logos::Lexer<TokenKind>) {
    let rem = lex.remainder();
    match rem.find("\"\"\"") {
        Some(pos) => lex.bump(pos + 3),
        None => {
            let start = lex.span().start;
            lex.bump(rem.len());
            lex.extras
                .errors
                .push((start, "unterminated multiline string".to_string()));
        }
    }
}

