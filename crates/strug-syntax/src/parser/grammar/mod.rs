//! Grammar productions, split by level: statements and below-statement
//! expressions.

mod expressions;
mod statements;
