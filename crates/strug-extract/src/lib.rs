//! Typed views over parsed build scripts.
//!
//! Built on `strug-syntax`: the dependency extractor classifies the contents
//! of `dependencies` blocks, the plugin extractor reads `plugins` blocks and
//! script-level `apply(...)` calls, and the statement extractor lists a
//! script's top-level statements for reporting.

pub mod dependencies;
pub mod model;
pub mod plugins;
pub mod statements;

#[cfg(test)]
mod dependencies_tests;
#[cfg(test)]
mod statements_tests;

pub use dependencies::DependencyExtractor;
pub use model::{
    Capability, DependencyContainer, DependencyDeclaration, DependencyElement, DependencyKind,
    Identifier, Plugin, PluginKind, Position, Statement,
};
pub use plugins::PluginFinder;

/// Extraction refuses to guess: a statement it cannot map safely fails with
/// the offending source text, so a caller can skip or report that one
/// statement instead of shipping a wrong classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("could not determine dependency identifier in `{statement}`")]
    UnresolvableIdentifier { statement: String },
    #[error("unsupported argument shape in `{statement}`")]
    UnsupportedArguments { statement: String },
    #[error("plugin takes at most one `version` and one `apply`, got more in `{statement}`")]
    OverSpecifiedPlugin { statement: String },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
