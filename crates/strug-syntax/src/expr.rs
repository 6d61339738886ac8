//! Shape queries over expression nodes.
//!
//! Extractors mostly ask "is this a call, and of what" rather than walking
//! child vectors by hand; these helpers answer that against the CST.

use crate::cst::{Element, NodeId, NodeKind};
use crate::session::ParseSession;
use crate::token::{Channel, TokenKind};

/// Leaf-descends `node` and returns it when it is a postfix expression.
pub fn as_postfix(session: &ParseSession, node: NodeId) -> Option<NodeId> {
    let leaf = session.cst().leaf(node);
    (session.cst().kind(leaf) == NodeKind::PostfixExpr).then_some(leaf)
}

/// The primary token of a postfix expression, when the primary is a single
/// token (identifier, literal, keyword).
pub fn primary_token(session: &ParseSession, postfix: NodeId) -> Option<u32> {
    match session.cst().node(postfix).children.first() {
        Some(&Element::Token(t)) => Some(t),
        _ => None,
    }
}

pub fn primary_text<'s>(session: &'s ParseSession, postfix: NodeId) -> Option<&'s str> {
    primary_token(session, postfix).map(|t| session.token_text(t))
}

/// Suffix nodes of a postfix expression, in order.
pub fn suffixes(session: &ParseSession, postfix: NodeId) -> Vec<NodeId> {
    session
        .cst()
        .child_nodes(postfix)
        .filter(|&n| {
            matches!(
                session.cst().kind(n),
                NodeKind::CallSuffix | NodeKind::NavigationSuffix | NodeKind::TypeArguments
            )
        })
        .collect()
}

/// `node` is a plain identifier with nothing attached: `gav`, `proj`.
pub fn bare_identifier<'s>(session: &'s ParseSession, node: NodeId) -> Option<&'s str> {
    let leaf = session.cst().leaf(node);
    if session.cst().kind(leaf) != NodeKind::PostfixExpr {
        return None;
    }
    let children = &session.cst().node(leaf).children;
    match children.as_slice() {
        [Element::Token(t)] => {
            let token = session.token(*t)?;
            matches!(token.kind, TokenKind::Ident | TokenKind::BacktickIdent)
                .then(|| session.token_text(*t))
        }
        _ => None,
    }
}

/// A call with a single identifier callee: `project(":x")`, `platform(m)`,
/// `id("org.jetbrains")`. Navigation before the call disqualifies it;
/// suffixes after the first call land in `trailing` (chained plugin
/// configuration reads them).
pub struct Call<'s> {
    pub callee: &'s str,
    /// The parenthesized argument list; absent for a bare trailing lambda.
    pub value_arguments: Option<NodeId>,
    /// `ValueArgument` nodes, in order.
    pub arguments: Vec<NodeId>,
    pub lambda: Option<NodeId>,
    /// Suffix nodes after the call suffix itself.
    pub trailing: Vec<NodeId>,
}

pub fn as_call<'s>(session: &'s ParseSession, node: NodeId) -> Option<Call<'s>> {
    let postfix = as_postfix(session, node)?;
    let callee_token = primary_token(session, postfix)?;
    let token = session.token(callee_token)?;
    if !matches!(token.kind, TokenKind::Ident | TokenKind::BacktickIdent) {
        return None;
    }
    let mut suffix_nodes = suffixes(session, postfix).into_iter();
    let mut call = suffix_nodes.next()?;
    // Explicit type arguments may sit between callee and arguments.
    if session.cst().kind(call) == NodeKind::TypeArguments {
        call = suffix_nodes.next()?;
    }
    if session.cst().kind(call) != NodeKind::CallSuffix {
        return None;
    }
    let mut value_arguments = None;
    let mut lambda = None;
    for child in session.cst().child_nodes(call) {
        match session.cst().kind(child) {
            NodeKind::ValueArguments => value_arguments = Some(child),
            NodeKind::Lambda => lambda = Some(child),
            _ => {}
        }
    }
    let arguments = match value_arguments {
        Some(args) => session
            .cst()
            .child_nodes(args)
            .filter(|&n| session.cst().kind(n) == NodeKind::ValueArgument)
            .collect(),
        None => Vec::new(),
    };
    Some(Call {
        callee: session.token_text(callee_token),
        value_arguments,
        arguments,
        lambda,
        trailing: suffix_nodes.collect(),
    })
}

/// Splits a `ValueArgument` into its optional name and its value expression.
pub fn argument_parts<'s>(
    session: &'s ParseSession,
    argument: NodeId,
) -> (Option<&'s str>, Option<NodeId>) {
    let mut name = None;
    let mut value = None;
    for child in &session.cst().node(argument).children {
        match *child {
            Element::Token(t) => {
                if session.token(t).is_some_and(|tok| {
                    matches!(tok.kind, TokenKind::Ident | TokenKind::BacktickIdent)
                }) {
                    name = Some(session.token_text(t));
                }
            }
            Element::Node(n) => value = Some(n),
        }
    }
    (name, value)
}

/// Value expression of an argument, named or not.
pub fn argument_value(session: &ParseSession, argument: NodeId) -> Option<NodeId> {
    argument_parts(session, argument).1
}

/// String literal content of `node`, quotes stripped: `":core"` gives `:core`.
pub fn literal_text<'s>(session: &'s ParseSession, node: NodeId) -> Option<&'s str> {
    let leaf = session.cst().leaf(node);
    if session.cst().kind(leaf) != NodeKind::PostfixExpr {
        return None;
    }
    let children = &session.cst().node(leaf).children;
    let [Element::Token(t)] = children.as_slice() else {
        return None;
    };
    let token = session.token(*t)?;
    let text = session.token_text(*t);
    match token.kind {
        TokenKind::LineString => text.strip_prefix('"')?.strip_suffix('"'),
        TokenKind::MultilineString => text.strip_prefix("\"\"\"")?.strip_suffix("\"\"\""),
        _ => None,
    }
}

/// `true`/`false` literal value of `node`.
pub fn literal_boolean(session: &ParseSession, node: NodeId) -> Option<bool> {
    let leaf = session.cst().leaf(node);
    if session.cst().kind(leaf) != NodeKind::PostfixExpr {
        return None;
    }
    let [Element::Token(t)] = session.cst().node(leaf).children.as_slice() else {
        return None;
    };
    match session.token(*t)?.kind {
        TokenKind::KwTrue => Some(true),
        TokenKind::KwFalse => Some(false),
        _ => None,
    }
}

/// Dotted accessor path with no calls attached: `libs.androidx.core` gives
/// its code text. A call anywhere in the chain disqualifies it.
pub fn navigation_text(session: &ParseSession, node: NodeId) -> Option<String> {
    let postfix = as_postfix(session, node)?;
    primary_token(session, postfix)?;
    let suffix_nodes = suffixes(session, postfix);
    if suffix_nodes.is_empty()
        || suffix_nodes
            .iter()
            .any(|&n| session.cst().kind(n) != NodeKind::NavigationSuffix)
    {
        return None;
    }
    Some(code_text(session, postfix))
}

/// Code-channel text of `node`'s extent, concatenated without the blanks,
/// newlines and comments in between. The analogue of a parse-tree `text`.
pub fn code_text(session: &ParseSession, node: NodeId) -> String {
    let Some(first) = session.first_token(node) else {
        return String::new();
    };
    let Some(last) = session.last_token(node) else {
        return String::new();
    };
    let mut out = String::new();
    for index in first..=last {
        if let Some(token) = session.token(index)
            && token.channel() == Channel::Code
        {
            out.push_str(session.token_text(index));
        }
    }
    out
}

/// A chain of infix calls: `first name operand (name operand)*`.
pub struct Infix {
    pub first: NodeId,
    /// Pairs of function-name token and operand node.
    pub pairs: Vec<(u32, NodeId)>,
}

pub fn as_infix(session: &ParseSession, node: NodeId) -> Option<Infix> {
    let leaf = session.cst().leaf(node);
    if session.cst().kind(leaf) != NodeKind::InfixCall {
        return None;
    }
    let children = &session.cst().node(leaf).children;
    let mut iter = children.iter();
    let first = match iter.next() {
        Some(&Element::Node(n)) => n,
        _ => return None,
    };
    let mut pairs = Vec::new();
    while let Some(element) = iter.next() {
        let &Element::Token(name) = element else {
            return None;
        };
        let Some(&Element::Node(operand)) = iter.next() else {
            return None;
        };
        pairs.push((name, operand));
    }
    Some(Infix { first, pairs })
}

