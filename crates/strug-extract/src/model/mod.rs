//! Entity models produced by the extractors.

mod dependency;
mod plugin;
mod statement;

pub use dependency::{
    Capability, DependencyContainer, DependencyDeclaration, DependencyElement, DependencyKind,
    Identifier,
};
pub use plugin::{Plugin, PluginKind};
pub use statement::{Position, Statement};
