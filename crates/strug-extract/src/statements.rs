//! Ordered listing of a script's top-level statements, for report tooling
//! that checks build scripts against an allow-list of declarative shapes.

use strug_syntax::blocks;
use strug_syntax::cst::{NodeId, NodeKind};
use strug_syntax::session::ParseSession;

use crate::model::{Position, Statement};

/// The script's top-level statements, in source order. Error-recovery nodes
/// are skipped.
pub fn top_level_statements(session: &ParseSession) -> Vec<Statement> {
    let root = session.cst().root();
    session
        .cst()
        .statements(root)
        .filter_map(|statement| to_statement(session, statement))
        .collect()
}

fn to_statement(session: &ParseSession, statement: NodeId) -> Option<Statement> {
    let leaf = session.cst().leaf(statement);
    let start = position_of(session, session.first_token(statement)?)?;
    let stop = position_of(session, session.last_token(statement)?)?;

    match session.cst().kind(leaf) {
        NodeKind::NamedBlock => Some(Statement::NamedBlock {
            name: blocks::block_name(session, leaf)?.to_string(),
            start,
            stop,
        }),
        NodeKind::Assignment => Some(Statement::Assignment {
            first_line: first_line(session, statement)?,
            start,
            stop,
        }),
        NodeKind::Declaration => Some(Statement::Declaration {
            first_line: first_line(session, statement)?,
            start,
            stop,
        }),
        NodeKind::Loop => Some(Statement::Loop {
            first_line: first_line(session, statement)?,
            start,
            stop,
        }),
        NodeKind::Error => None,
        _ => Some(Statement::Expression {
            first_line: first_line(session, statement)?,
            start,
            stop,
        }),
    }
}

/// First non-blank line of the statement's text, e.g. `tasks.jar {`.
fn first_line(session: &ParseSession, statement: NodeId) -> Option<String> {
    session
        .node_text(statement)
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(str::to_string)
}

fn position_of(session: &ParseSession, token: u32) -> Option<Position> {
    session.token(token).map(|t| Position {
        line: t.line,
        column: t.column,
    })
}
