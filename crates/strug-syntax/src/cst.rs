//! Token-addressable concrete syntax tree.
//!
//! Nodes live in a flat arena and reference tokens by their index in the
//! session's token stream. Hidden-channel tokens are never attached to nodes;
//! they stay in the stream between the code tokens a node does reference, so
//! a node's token range (`first_token..=last_token`) still covers them. This
//! is what lets edits address "the comment to the left of this call" without
//! the tree having to model trivia.

use serde::Serialize;

/// Index of a node in the [`Cst`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Grammar role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    /// Root: a sequence of statements.
    Script,
    /// One statement, wrapping exactly one of the kinds below.
    Statement,
    /// `name { statements }`.
    NamedBlock,
    /// `lhs = rhs`, `lhs += rhs`, ...
    Assignment,
    /// `val`/`var`/`fun`/`class`/`object`/`import ...`, kept opaque.
    Declaration,
    /// `for`/`while`/`do ...`, kept opaque.
    Loop,
    /// Expression statement, or an opaque construct (`if`, `when`, `try`, annotations).
    Expression,
    /// Primary plus a chain of suffixes, possibly followed by infix calls.
    PostfixExpr,
    /// `(args)` with optional trailing lambda, or a bare trailing lambda.
    CallSuffix,
    /// `.name`, `?.name`, `::name`.
    NavigationSuffix,
    /// `<...>` between a callee and its arguments.
    TypeArguments,
    /// Parenthesized argument list.
    ValueArguments,
    /// One argument, optionally named (`path = ":x"`).
    ValueArgument,
    /// `{ ... }`, contents opaque.
    Lambda,
    /// `operand name operand (name operand)*`.
    InfixCall,
    /// `( expression )`.
    Parenthesized,
    /// Tokens skipped during error recovery.
    Error,
}

/// A child slot: either a sub-node or a token index into the session stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Element {
    Node(NodeId),
    Token(u32),
}

/// Arena node. `first_token..=last_token` are indices into the token stream
/// and bound every token (hidden ones included) inside the node's extent.
#[derive(Debug, Clone, Serialize)]
pub struct CstNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<Element>,
    pub first_token: u32,
    pub last_token: u32,
}

/// The tree itself: an arena of nodes, root first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cst {
    nodes: Vec<CstNode>,
}

impl Cst {
    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(CstNode {
            kind,
            parent: None,
            children: Vec::new(),
            first_token: u32::MAX,
            last_token: 0,
        });
        id
    }

    /// Installs `children` on `id` and computes its token extent.
    pub(crate) fn finish(&mut self, id: NodeId, children: Vec<Element>) {
        let mut first = u32::MAX;
        let mut last = 0;
        for child in &children {
            let (lo, hi) = match *child {
                Element::Token(t) => (t, t),
                Element::Node(n) => {
                    self.nodes[n.index()].parent = Some(id);
                    let n = &self.nodes[n.index()];
                    (n.first_token, n.last_token)
                }
            };
            first = first.min(lo);
            last = last.max(hi);
        }
        let node = &mut self.nodes[id.index()];
        node.children = children;
        node.first_token = first;
        node.last_token = last;
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &CstNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// The root node. Parsing always allocates the script node first.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child nodes of `id`, skipping token children.
    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().filter_map(|c| match c {
            Element::Node(n) => Some(*n),
            Element::Token(_) => None,
        })
    }

    /// Child token indices of `id`, skipping node children.
    pub fn child_tokens(&self, id: NodeId) -> impl Iterator<Item = u32> + '_ {
        self.node(id).children.iter().filter_map(|c| match c {
            Element::Token(t) => Some(*t),
            Element::Node(_) => None,
        })
    }

    /// Direct statement children (of the script or of a named block body).
    pub fn statements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.child_nodes(id)
            .filter(|&n| self.kind(n) == NodeKind::Statement)
    }

    /// Descends through sole-node-child wrappers to the most specific node.
    ///
    /// A `Statement` holding just a `NamedBlock` leafs to the block; a
    /// `PostfixExpr` with suffixes is its own leaf.
    pub fn leaf(&self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            let node = self.node(current);
            if node.children.len() != 1 {
                return current;
            }
            match node.children[0] {
                Element::Node(n) => current = n,
                Element::Token(_) => return current,
            }
        }
    }

    /// Nearest ancestor of `id` with the given kind, including `id` itself.
    pub fn ancestor_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.kind(node) == kind {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }
}
