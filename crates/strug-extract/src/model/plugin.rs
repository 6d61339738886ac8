//! Plugin declarations.

use serde::Serialize;

/// A plugin declaration found in a build script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Plugin {
    pub kind: PluginKind,
    pub id: String,
    /// Quoted when the version was a string literal; raw source text when it
    /// was an expression like `libs.foo.get().version`.
    pub version: Option<String>,
    /// `false` only for `apply false` configuration.
    pub applied: bool,
}

impl Plugin {
    pub fn new(kind: PluginKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            version: None,
            applied: true,
        }
    }

    /// The form this plugin takes inside a `plugins` block, without any
    /// version or apply configuration. `None` for script-applied plugins,
    /// which have no block form.
    pub fn as_id_string(&self) -> Option<String> {
        match self.kind {
            PluginKind::Apply => None,
            PluginKind::BlockAlias => Some(format!("alias({})", self.id)),
            PluginKind::BlockBacktick => Some(format!("`{}`", self.id)),
            PluginKind::BlockId => Some(format!("id(\"{}\")", self.id)),
            PluginKind::BlockKotlin => Some(format!("kotlin(\"{}\")", self.id)),
            PluginKind::BlockSimple => Some(self.id.clone()),
        }
    }
}

/// How the plugin was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PluginKind {
    /// `apply(plugin = "x")` or `apply(mapOf("plugin" to "x"))`, outside any
    /// plugins block.
    Apply,
    /// `alias(libs.plugins.x)`
    BlockAlias,
    /// `` `kotlin-dsl` ``
    BlockBacktick,
    /// `id("x")`
    BlockId,
    /// `kotlin("jvm")`
    BlockKotlin,
    /// `application`
    BlockSimple,
}

impl PluginKind {
    /// The kind declared by a call with the given callee, for the call-shaped
    /// forms. Bare and backtick identifiers have no callee.
    pub fn of_callee(name: &str) -> Option<Self> {
        match name {
            "alias" => Some(Self::BlockAlias),
            "id" => Some(Self::BlockId),
            "kotlin" => Some(Self::BlockKotlin),
            _ => None,
        }
    }
}
