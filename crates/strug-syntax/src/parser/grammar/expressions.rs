//! Expression productions: postfix chains, call suffixes, argument lists,
//! lambdas and infix calls.
//!
//! The expression grammar is only as deep as extraction needs. Primaries,
//! suffix chains, argument lists and infix calls are structured; lambda
//! bodies and control-flow expressions are collected as opaque token runs.

use crate::cst::{Element, NodeId, NodeKind};
use crate::parser::Parser;
use crate::token::TokenKind;

impl Parser<'_> {
    /// Expression: a postfix chain, optionally extended into an infix call
    /// (`id("x") version "1.0" apply false`).
    pub(crate) fn parse_expression(&mut self) -> NodeId {
        let first = self.parse_postfix_expr();
        if !self.at_infix_operator() {
            return first;
        }
        let infix = self.alloc(NodeKind::InfixCall);
        let mut children = vec![Element::Node(first)];
        while self.at_infix_operator() {
            self.bump(&mut children); // function name or operator
            let operand = self.parse_postfix_expr();
            children.push(Element::Node(operand));
        }
        self.finish(infix, children)
    }

    fn at_infix_operator(&mut self) -> bool {
        self.current_kind().is_some_and(|k| k.is_infix_operator())
    }

    pub(crate) fn parse_postfix_expr(&mut self) -> NodeId {
        let node = self.alloc(NodeKind::PostfixExpr);
        let mut children = Vec::new();
        self.parse_primary(&mut children);
        loop {
            match self.current_kind() {
                Some(TokenKind::Dot | TokenKind::QuestionDot | TokenKind::ColonColon)
                    if self.navigation_ahead() =>
                {
                    let nav = self.parse_navigation_suffix();
                    children.push(Element::Node(nav));
                }
                Some(
                    TokenKind::ParenOpen | TokenKind::BraceOpen | TokenKind::BracketOpen,
                ) => {
                    let call = self.parse_call_suffix();
                    children.push(Element::Node(call));
                }
                Some(TokenKind::Lt) if self.type_arguments_ahead() => {
                    let type_args = self.parse_type_arguments();
                    children.push(Element::Node(type_args));
                }
                Some(TokenKind::BangBang) => self.bump(&mut children),
                // The chain may continue on the next line with a leading dot.
                Some(TokenKind::Newline) if self.navigation_ahead() => {
                    self.bump(&mut children);
                }
                _ => break,
            }
        }
        self.finish(node, children)
    }

    fn parse_primary(&mut self, children: &mut Vec<Element>) {
        // Prefix operators, including spread `*` in argument position.
        while matches!(
            self.current_kind(),
            Some(TokenKind::Minus | TokenKind::Plus | TokenKind::Bang | TokenKind::Star)
        ) {
            self.bump(children);
        }
        match self.current_kind() {
            Some(TokenKind::ParenOpen) => {
                let parens = self.parse_parenthesized();
                children.push(Element::Node(parens));
            }
            Some(TokenKind::BraceOpen) => {
                let lambda = self.parse_lambda();
                children.push(Element::Node(lambda));
            }
            Some(
                TokenKind::LineString
                | TokenKind::MultilineString
                | TokenKind::CharLiteral
                | TokenKind::Number
                | TokenKind::KwTrue
                | TokenKind::KwFalse
                | TokenKind::KwNull
                | TokenKind::Ident
                | TokenKind::BacktickIdent,
            ) => self.bump(children),
            Some(
                TokenKind::KwIf | TokenKind::KwWhen | TokenKind::KwTry | TokenKind::KwObject,
            ) => self.opaque_primary(children),
            Some(_) => {
                self.error_here("expected expression");
                self.bump(children);
            }
            None => self.error_here("unexpected end of input"),
        }
    }

    /// Control-flow used in expression position stays unstructured; tokens are
    /// consumed balanced up to the argument or statement boundary.
    fn opaque_primary(&mut self, children: &mut Vec<Element>) {
        let mut depth = 0u32;
        loop {
            let Some(token) = self.current() else { return };
            match token.kind {
                TokenKind::Comma | TokenKind::Semicolon if depth == 0 => return,
                TokenKind::Newline if depth == 0 => {
                    if !self.continues_statement() {
                        return;
                    }
                    self.bump(children);
                }
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

    /// `.name`, `?.name` or `::name` with a name actually following.
    fn navigation_ahead(&mut self) -> bool {
        let mut ahead = self
            .lookahead()
            .filter(|(_, k)| *k != TokenKind::Newline)
            .map(|(_, k)| k);
        matches!(
            ahead.next(),
            Some(TokenKind::Dot | TokenKind::QuestionDot | TokenKind::ColonColon)
        ) && matches!(
            ahead.next(),
            Some(TokenKind::Ident | TokenKind::BacktickIdent | TokenKind::KwClass)
        )
    }

    fn parse_navigation_suffix(&mut self) -> NodeId {
        let node = self.alloc(NodeKind::NavigationSuffix);
        let mut children = Vec::new();
        self.bump(&mut children); // . ?. ::
        self.bump(&mut children); // name, guaranteed by navigation_ahead
        self.finish(node, children)
    }

    /// `(args)` with an optional trailing lambda, a bare trailing lambda, or
    /// `[index]`.
    fn parse_call_suffix(&mut self) -> NodeId {
        let node = self.alloc(NodeKind::CallSuffix);
        let mut children = Vec::new();
        match self.current_kind() {
            Some(TokenKind::ParenOpen) => {
                let args = self.parse_value_arguments(TokenKind::ParenOpen, TokenKind::ParenClose);
                children.push(Element::Node(args));
                if self.at(TokenKind::BraceOpen) {
                    let lambda = self.parse_lambda();
                    children.push(Element::Node(lambda));
                }
            }
            Some(TokenKind::BracketOpen) => {
                let args =
                    self.parse_value_arguments(TokenKind::BracketOpen, TokenKind::BracketClose);
                children.push(Element::Node(args));
            }
            _ => {
                let lambda = self.parse_lambda();
                children.push(Element::Node(lambda));
            }
        }
        self.finish(node, children)
    }

    fn parse_value_arguments(&mut self, open: TokenKind, close: TokenKind) -> NodeId {
        let node = self.alloc(NodeKind::ValueArguments);
        let mut children = Vec::new();
        self.expect(open, &mut children);
        self.newline_ignore_depth += 1;
        loop {
            match self.current_kind() {
                Some(k) if k == close => {
                    self.bump(&mut children);
                    break;
                }
                None => {
                    self.error_here("unclosed argument list");
                    break;
                }
                Some(TokenKind::Comma) => {
                    // Stray or trailing comma.
                    self.bump(&mut children);
                }
                Some(_) => {
                    let argument = self.parse_value_argument();
                    children.push(Element::Node(argument));
                    match self.current_kind() {
                        Some(TokenKind::Comma) => self.bump(&mut children),
                        Some(k) if k == close => {}
                        None => {}
                        Some(_) => {
                            self.error_here("expected `,` or closing delimiter");
                            self.recover_argument(close, &mut children);
                        }
                    }
                }
            }
        }
        self.newline_ignore_depth -= 1;
        self.finish(node, children)
    }

    /// Skips balanced tokens until a comma or the closing delimiter.
    fn recover_argument(&mut self, close: TokenKind, children: &mut Vec<Element>) {
        let mut depth = 0u32;
        loop {
            let Some(token) = self.current() else { return };
            match token.kind {
                TokenKind::Comma if depth == 0 => return,
                k if k == close && depth == 0 => return,
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

    fn parse_value_argument(&mut self) -> NodeId {
        let node = self.alloc(NodeKind::ValueArgument);
        let mut children = Vec::new();
        let named = {
            let mut ahead = self
                .lookahead()
                .filter(|(_, k)| *k != TokenKind::Newline)
                .map(|(_, k)| k);
            matches!(ahead.next(), Some(TokenKind::Ident))
                && matches!(ahead.next(), Some(TokenKind::Eq))
        };
        if named {
            self.bump(&mut children); // argument name
            self.bump(&mut children); // =
        }
        let value = self.parse_expression();
        children.push(Element::Node(value));
        self.finish(node, children)
    }

    fn parse_parenthesized(&mut self) -> NodeId {
        let node = self.alloc(NodeKind::Parenthesized);
        let mut children = Vec::new();
        self.bump(&mut children); // (
        self.newline_ignore_depth += 1;
        if !self.at(TokenKind::ParenClose) {
            let inner = self.parse_expression();
            children.push(Element::Node(inner));
        }
        if !self.at(TokenKind::ParenClose) {
            self.error_here("expected `)`");
            self.recover_argument(TokenKind::ParenClose, &mut children);
        }
        if self.at(TokenKind::ParenClose) {
            self.bump(&mut children);
        }
        self.newline_ignore_depth -= 1;
        self.finish(node, children)
    }

    /// Lambda bodies are opaque: tokens are consumed up to the matching `}`.
    fn parse_lambda(&mut self) -> NodeId {
        let node = self.alloc(NodeKind::Lambda);
        let mut children = Vec::new();
        self.bump(&mut children); // {
        let mut depth = 1u32;
        loop {
            let Some(token) = self.current() else {
                self.error_here("missing `}` to close lambda");
                break;
            };
            match token.kind {
                TokenKind::BraceOpen => {
                    depth += 1;
                    self.bump(&mut children);
                }
                TokenKind::BraceClose => {
                    depth -= 1;
                    self.bump(&mut children);
                    if depth == 0 {
                        break;
                    }
                }
                _ => self.bump(&mut children),
            }
        }
        self.finish(node, children)
    }

    /// `<...>` counts as type arguments only when the balanced run contains
    /// nothing but type-ish tokens and is immediately followed by `(`.
    fn type_arguments_ahead(&mut self) -> bool {
        let mut depth = 0u32;
        for (_, kind) in self.lookahead() {
            match kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        continue;
                    }
                }
                _ if depth == 0 => return kind == TokenKind::ParenOpen,
                TokenKind::Newline
                | TokenKind::Ident
                | TokenKind::BacktickIdent
                | TokenKind::Dot
                | TokenKind::Comma
                | TokenKind::Question
                | TokenKind::Star
                | TokenKind::BracketOpen
                | TokenKind::BracketClose => {}
                _ => return false,
            }
        }
        false
    }

    fn parse_type_arguments(&mut self) -> NodeId {
        let node = self.alloc(NodeKind::TypeArguments);
        let mut children = Vec::new();
        let mut depth = 0u32;
        loop {
            let Some(token) = self.current() else {
                self.error_here("unclosed type arguments");
                break;
            };
            match token.kind {
                TokenKind::Lt => {
                    depth += 1;
                    self.bump(&mut children);
                }
                TokenKind::Gt => {
                    depth -= 1;
                    self.bump(&mut children);
                    if depth == 0 {
                        break;
                    }
                }
                _ => self.bump(&mut children),
            }
        }
        self.finish(node, children)
    }
}
