//! Statement-level productions.
//!
//! A script is a sequence of statements separated by newlines or semicolons.
//! Statement dispatch is by first token: declaration and loop keywords open
//! opaque runs, `name {` opens a named block, a lookahead finds assignments,
//! and everything else is an expression statement.

use crate::cst::{Element, NodeId, NodeKind};
use crate::parser::Parser;
use crate::token::TokenKind;

impl Parser<'_> {
    pub(crate) fn parse_script(&mut self) {
        let root = self.alloc(NodeKind::Script);
        let mut children = Vec::new();
        loop {
            self.bump_terminators(&mut children);
            let Some(kind) = self.current_kind() else {
                break;
            };
            if kind == TokenKind::BraceClose {
                self.error_here("unexpected `}`");
                let error = self.alloc(NodeKind::Error);
                let mut error_children = Vec::new();
                self.bump(&mut error_children);
                let error = self.finish(error, error_children);
                children.push(Element::Node(error));
                continue;
            }
            let statement = self.parse_statement();
            children.push(Element::Node(statement));
        }
        self.finish(root, children);
    }

    /// Consumes newline and semicolon terminators between statements.
    fn bump_terminators(&mut self, children: &mut Vec<Element>) {
        while matches!(
            self.current_kind(),
            Some(TokenKind::Newline | TokenKind::Semicolon)
        ) {
            self.bump(children);
        }
    }

    fn parse_statement(&mut self) -> NodeId {
        let statement = self.alloc(NodeKind::Statement);
        let kind = self.current_kind();
        let inner = match kind {
            Some(k) if k.starts_declaration() => self.parse_declaration(),
            Some(k) if k.starts_loop() => self.parse_loop(),
            Some(TokenKind::KwIf | TokenKind::KwWhen | TokenKind::KwTry | TokenKind::At) => {
                self.parse_opaque_expression()
            }
            _ => {
                if self.named_block_ahead() {
                    self.parse_named_block()
                } else if self.assignment_ahead() {
                    self.parse_assignment()
                } else {
                    self.parse_expression()
                }
            }
        };
        self.finish(statement, vec![Element::Node(inner)])
    }

    /// `name {` on one line opens a named block.
    fn named_block_ahead(&mut self) -> bool {
        self.skip_trivia();
        let mut ahead = self.lookahead();
        matches!(
            ahead.next(),
            Some((_, TokenKind::Ident | TokenKind::BacktickIdent))
        ) && matches!(ahead.next(), Some((_, TokenKind::BraceOpen)))
    }

    fn parse_named_block(&mut self) -> NodeId {
        let block = self.alloc(NodeKind::NamedBlock);
        let mut children = Vec::new();
        self.bump(&mut children); // name
        self.expect(TokenKind::BraceOpen, &mut children);
        loop {
            self.bump_terminators(&mut children);
            match self.current_kind() {
                Some(TokenKind::BraceClose) => {
                    self.bump(&mut children);
                    break;
                }
                None => {
                    self.error_here("missing `}` to close block");
                    break;
                }
                Some(_) => {
                    let statement = self.parse_statement();
                    children.push(Element::Node(statement));
                }
            }
        }
        self.finish(block, children)
    }

    /// Scans ahead for `lhs = rhs` (or compound assignment) before a newline.
    ///
    /// The left-hand side is a dotted or indexed path; anything else rules
    /// the statement out as an assignment.
    fn assignment_ahead(&mut self) -> bool {
        self.skip_trivia();
        let mut ahead = self.lookahead();
        match ahead.next() {
            Some((_, TokenKind::Ident | TokenKind::BacktickIdent)) => {}
            _ => return false,
        }
        let mut bracket_depth = 0u32;
        for (_, kind) in ahead {
            match kind {
                _ if bracket_depth > 0 => match kind {
                    TokenKind::BracketOpen => bracket_depth += 1,
                    TokenKind::BracketClose => bracket_depth -= 1,
                    _ => {}
                },
                TokenKind::BracketOpen => bracket_depth += 1,
                TokenKind::Dot | TokenKind::Ident | TokenKind::BacktickIdent => {}
                TokenKind::Eq
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq => return true,
                _ => return false,
            }
        }
        false
    }

    fn parse_assignment(&mut self) -> NodeId {
        let assignment = self.alloc(NodeKind::Assignment);
        let mut children = Vec::new();
        let lhs = self.parse_postfix_expr();
        children.push(Element::Node(lhs));
        self.bump(&mut children); // assignment operator, guaranteed by lookahead
        while self.at(TokenKind::Newline) {
            // The value may start on the next line.
            self.bump(&mut children);
        }
        let rhs = self.parse_expression();
        children.push(Element::Node(rhs));
        self.finish(assignment, children)
    }

    fn parse_declaration(&mut self) -> NodeId {
        let declaration = self.alloc(NodeKind::Declaration);
        let mut children = Vec::new();
        self.opaque_run(&mut children);
        self.finish(declaration, children)
    }

    fn parse_loop(&mut self) -> NodeId {
        let looped = self.alloc(NodeKind::Loop);
        let mut children = Vec::new();
        self.opaque_run(&mut children);
        self.finish(looped, children)
    }

    /// `if`/`when`/`try`/annotation statements are kept opaque: their tokens
    /// are collected without further structure.
    fn parse_opaque_expression(&mut self) -> NodeId {
        let expression = self.alloc(NodeKind::Expression);
        let mut children = Vec::new();
        self.opaque_run(&mut children);
        self.finish(expression, children)
    }

    /// Consumes a balanced run of tokens up to a statement boundary.
    ///
    /// Stops at a newline or semicolon at bracket depth zero, at a `}` that
    /// would close the enclosing block, or at end of input. A newline is not
    /// a boundary when the next code token continues the construct (`else`,
    /// `catch`, `finally`, `while`, or a chained `.`).
    fn opaque_run(&mut self, children: &mut Vec<Element>) {
        let mut depth = 0u32;
        loop {
            let Some(token) = self.current() else {
                if depth > 0 {
                    self.error_here("unbalanced brackets at end of input");
                }
                return;
            };
            match token.kind {
                TokenKind::Newline if depth == 0 => {
                    if !self.continues_statement() {
                        return;
                    }
                    self.bump(children);
                }
                TokenKind::Semicolon if depth == 0 => return,
                TokenKind::ParenOpen | TokenKind::BracketOpen | TokenKind::BraceOpen => {
                    depth += 1;
                    self.bump(children);
                }
                TokenKind::ParenClose | TokenKind::BracketClose | TokenKind::BraceClose => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.bump(children);
                }
                _ => self.bump(children),
            }
        }
    }

    /// True when the first code token after the current newline run keeps the
    /// statement going.
    pub(crate) fn continues_statement(&mut self) -> bool {
        for (index, kind) in self.lookahead() {
            match kind {
                TokenKind::Newline => continue,
                TokenKind::KwElse
                | TokenKind::KwWhile
                | TokenKind::Dot
                | TokenKind::QuestionDot
                | TokenKind::Elvis => return true,
                TokenKind::Ident => {
                    let text = self.tokens[index].text(self.source);
                    return text == "catch" || text == "finally";
                }
                _ => return false,
            }
        }
        false
    }
}
