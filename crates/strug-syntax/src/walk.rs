//! Visitor-style traversal over the statement structure.
//!
//! The walk recurses only into statement lists (the script itself and named
//! block bodies); expression internals are left to [`crate::expr`] queries.

use crate::cst::{NodeId, NodeKind};
use crate::session::ParseSession;

/// Callbacks fired while walking a script. All have empty defaults, so a
/// visitor implements only what it cares about.
pub trait ScriptVisitor {
    fn enter_script(&mut self, _session: &ParseSession, _script: NodeId) {}
    fn exit_script(&mut self, _session: &ParseSession, _script: NodeId) {}

    /// Fired for every statement at every depth, before its contents.
    fn enter_statement(&mut self, _session: &ParseSession, _statement: NodeId) {}
    fn exit_statement(&mut self, _session: &ParseSession, _statement: NodeId) {}

    fn enter_named_block(&mut self, _session: &ParseSession, _block: NodeId) {}
    fn exit_named_block(&mut self, _session: &ParseSession, _block: NodeId) {}
}

pub fn walk<V: ScriptVisitor>(session: &ParseSession, visitor: &mut V) {
    let root = session.cst().root();
    visitor.enter_script(session, root);
    walk_statements(session, root, visitor);
    visitor.exit_script(session, root);
}

fn walk_statements<V: ScriptVisitor>(session: &ParseSession, list: NodeId, visitor: &mut V) {
    let statements: Vec<NodeId> = session.cst().statements(list).collect();
    for statement in statements {
        visitor.enter_statement(session, statement);
        let leaf = session.cst().leaf(statement);
        if session.cst().kind(leaf) == NodeKind::NamedBlock {
            visitor.enter_named_block(session, leaf);
            walk_statements(session, leaf, visitor);
            visitor.exit_named_block(session, leaf);
        }
        visitor.exit_statement(session, statement);
    }
}

/// Depth counter for visitors that only care whether a statement sits at the
/// top level of the script.
#[derive(Debug, Default)]
pub struct Statements {
    depth: usize,
}

impl Statements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter_block(&mut self) {
        self.depth += 1;
    }

    pub fn on_exit_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn is_top_level(&self) -> bool {
        self.depth == 0
    }
}
