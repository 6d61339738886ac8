//! Named-block navigation: `plugins { ... }`, `dependencies { ... }` and
//! friends.

use crate::cst::{NodeId, NodeKind};
use crate::session::ParseSession;

pub const ALLPROJECTS: &str = "allprojects";
pub const BUILDSCRIPT: &str = "buildscript";
pub const DEPENDENCIES: &str = "dependencies";
pub const DEPENDENCY_RESOLUTION_MANAGEMENT: &str = "dependencyResolutionManagement";
pub const PLUGINS: &str = "plugins";
pub const REPOSITORIES: &str = "repositories";
pub const SUBPROJECTS: &str = "subprojects";

/// Name of a [`NodeKind::NamedBlock`], with backticks kept as written.
pub fn block_name<'s>(session: &'s ParseSession, block: NodeId) -> Option<&'s str> {
    if session.cst().kind(block) != NodeKind::NamedBlock {
        return None;
    }
    session
        .cst()
        .child_tokens(block)
        .next()
        .map(|t| session.token_text(t))
}

pub fn is_named(session: &ParseSession, block: NodeId, name: &str) -> bool {
    block_name(session, block) == Some(name)
}

/// True when some strict ancestor of `node` is a named block, optionally
/// requiring a name.
pub fn is_in_named_block(session: &ParseSession, node: NodeId, name: Option<&str>) -> bool {
    enclosing_named_block(session, node, name).is_some()
}

/// True when `node` sits outside every named block.
pub fn is_top_level(session: &ParseSession, node: NodeId) -> bool {
    enclosing_named_block(session, node, None).is_none()
}

/// The `plugins` block counts only when it sits at the top level of the
/// script; a nested block of the same name is somebody else's DSL.
pub fn is_plugins_block(session: &ParseSession, block: NodeId) -> bool {
    is_named(session, block, PLUGINS) && is_top_level(session, block)
}

/// Nearest named block strictly above `node`, optionally requiring a name.
pub fn enclosing_named_block(
    session: &ParseSession,
    node: NodeId,
    name: Option<&str>,
) -> Option<NodeId> {
    let cst = session.cst();
    let mut current = cst.parent(node);
    while let Some(candidate) = current {
        if cst.kind(candidate) == NodeKind::NamedBlock
            && name.is_none_or(|n| is_named(session, candidate, n))
        {
            return Some(candidate);
        }
        current = cst.parent(candidate);
    }
    None
}

/// The top of the wrapper chain around `node`.
///
/// Starting from the named block containing `node` (or `node` itself when it
/// is one), walks outward while each enclosing block's statement list holds
/// exactly one statement, so deleting the returned block deletes no sibling
/// content. `subprojects { buildscript { repositories {} } }` collapses to
/// `subprojects` when nothing else lives at any level; a level with siblings
/// stops the walk below it.
pub fn outermost_block(session: &ParseSession, node: NodeId) -> Option<NodeId> {
    let cst = session.cst();
    let mut current = if cst.kind(node) == NodeKind::NamedBlock {
        node
    } else {
        enclosing_named_block(session, node, None)?
    };
    while let Some(enclosing) = enclosing_named_block(session, current, None) {
        if cst.statements(enclosing).count() != 1 {
            break;
        }
        current = enclosing;
    }
    Some(current)
}

/// Named blocks directly inside `list` (the script root or a block body),
/// optionally filtered by name. Does not recurse.
pub fn child_blocks<'s>(
    session: &'s ParseSession,
    list: NodeId,
    name: Option<&'s str>,
) -> impl Iterator<Item = NodeId> + 's {
    session
        .cst()
        .statements(list)
        .map(|statement| session.cst().leaf(statement))
        .filter(move |&leaf| {
            session.cst().kind(leaf) == NodeKind::NamedBlock
                && name.is_none_or(|n| is_named(session, leaf, n))
        })
}

/// Calls `f` for every named block in the script, in source order, nested
/// blocks included.
pub fn for_each_named_block(session: &ParseSession, mut f: impl FnMut(&ParseSession, NodeId)) {
    fn visit(
        session: &ParseSession,
        node: NodeId,
        f: &mut impl FnMut(&ParseSession, NodeId),
    ) {
        let cst = session.cst();
        if cst.kind(node) == NodeKind::NamedBlock {
            f(session, node);
        }
        for child in cst.child_nodes(node) {
            visit(session, child, f);
        }
    }
    visit(session, session.cst().root(), &mut f);
}

/// Stack of enclosing block names maintained by a walking visitor; innermost
/// name last.
#[derive(Debug, Default, Clone)]
pub struct BlockStack {
    names: Vec<String>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    pub fn pop(&mut self) {
        self.names.pop();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn innermost(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }
}

