//! Top-level statement listings for report tooling.

use serde::Serialize;

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// A top-level statement, reduced to what a report needs: its shape, its
/// name or first line, and where it sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Statement {
    /// `plugins { ... }`, `dependencies { ... }` and the like.
    NamedBlock {
        name: String,
        start: Position,
        stop: Position,
    },
    Assignment {
        first_line: String,
        start: Position,
        stop: Position,
    },
    Declaration {
        first_line: String,
        start: Position,
        stop: Position,
    },
    Expression {
        first_line: String,
        start: Position,
        stop: Position,
    },
    Loop {
        first_line: String,
        start: Position,
        stop: Position,
    },
}

impl Statement {
    /// The block name or first line, whichever the statement carries.
    pub fn text(&self) -> &str {
        match self {
            Statement::NamedBlock { name, .. } => name,
            Statement::Assignment { first_line, .. }
            | Statement::Declaration { first_line, .. }
            | Statement::Expression { first_line, .. }
            | Statement::Loop { first_line, .. } => first_line,
        }
    }

    pub fn start(&self) -> Position {
        match self {
            Statement::NamedBlock { start, .. }
            | Statement::Assignment { start, .. }
            | Statement::Declaration { start, .. }
            | Statement::Expression { start, .. }
            | Statement::Loop { start, .. } => *start,
        }
    }

    pub fn stop(&self) -> Position {
        match self {
            Statement::NamedBlock { stop, .. }
            | Statement::Assignment { stop, .. }
            | Statement::Declaration { stop, .. }
            | Statement::Expression { stop, .. }
            | Statement::Loop { stop, .. } => *stop,
        }
    }
}
