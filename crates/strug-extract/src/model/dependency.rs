//! Dependency declarations as they appear in a `dependencies` block.

use std::fmt;

use serde::Serialize;
use strug_syntax::cst::NodeId;

/// Names a dependency target.
///
/// The quotation marks are part of how the dependency is declared: `"g:a:v"`
/// is a quoted coordinate, `libs.gav` a version-catalog accessor, and the
/// distinction matters when the declaration is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier {
    pub path: String,
    /// Producer-side configuration, from `project(":x", configuration = "y")`.
    pub configuration: Option<String>,
    /// The path was written as a named argument: `project(path = ":x")`.
    pub explicit_path: bool,
}

impl Identifier {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            configuration: None,
            explicit_path: false,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Component capability requested by a wrapper call around the identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Capability {
    #[default]
    Default,
    EnforcedPlatform,
    Platform,
    TestFixtures,
}

impl Capability {
    /// Maps a wrapper-call name to its capability: `platform(...)`,
    /// `enforcedPlatform(...)` or `testFixtures(...)`.
    pub fn from_wrapper(name: &str) -> Option<Self> {
        match name {
            "enforcedPlatform" => Some(Self::EnforcedPlatform),
            "platform" => Some(Self::Platform),
            "testFixtures" => Some(Self::TestFixtures),
            _ => None,
        }
    }
}

const GRADLE_DISTRIBUTIONS: [&str; 3] = ["gradleApi()", "gradleTestKit()", "localGroovy()"];

/// What kind of target the declaration points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum DependencyKind {
    #[default]
    Module,
    Project,
    File,
    Files,
    FileTree,
    GradleDistribution,
}

impl DependencyKind {
    /// Promotes to [`DependencyKind::GradleDistribution`] when the identifier
    /// is one of the well-known distribution calls, like `gradleApi()`.
    pub fn refine(self, identifier: &Identifier) -> Self {
        if GRADLE_DISTRIBUTIONS.contains(&identifier.path.as_str()) {
            Self::GradleDistribution
        } else {
            self
        }
    }
}

/// One parsed dependency declaration, like `implementation("g:a:v")` or
/// `testImplementation(testFixtures(project(":path")))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDeclaration {
    /// The consuming configuration: `api`, `implementation`, `classpath`...
    pub configuration: String,
    pub identifier: Identifier,
    pub capability: Capability,
    pub kind: DependencyKind,
    /// Original source text of the whole statement.
    pub full_text: String,
    /// Comment block immediately above the declaration, if any.
    pub preceding_comment: Option<String>,
    /// From the named-argument form only.
    pub classifier: Option<String>,
    pub ext: Option<String>,
    /// The declaration was written with named arguments
    /// (`group = ..., name = ..., version = ...`).
    pub is_complex: bool,
}

impl DependencyDeclaration {
    pub fn producer_configuration(&self) -> Option<&str> {
        self.identifier.configuration.as_deref()
    }
}

/// A classified statement from a `dependencies` block.
#[derive(Debug, Clone)]
pub enum DependencyElement {
    /// A statement recognized as a dependency declaration.
    Declaration {
        declaration: DependencyDeclaration,
        statement: NodeId,
    },
    /// Anything else, retained as-is: property declarations, `if` guards,
    /// calls like `add("extraImplementation", ...)`.
    Other { statement: NodeId },
}

/// The ordered, classified contents of a `dependencies` block. Ordered, not
/// sorted: elements appear as written.
#[derive(Debug, Clone, Default)]
pub struct DependencyContainer {
    pub elements: Vec<DependencyElement>,
}

impl DependencyContainer {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &DependencyDeclaration> {
        self.declarations_with_context().map(|(d, _)| d)
    }

    /// Declarations paired with their statement nodes, for rewriting.
    pub fn declarations_with_context(
        &self,
    ) -> impl Iterator<Item = (&DependencyDeclaration, NodeId)> {
        self.elements.iter().filter_map(|e| match e {
            DependencyElement::Declaration {
                declaration,
                statement,
            } => Some((declaration, *statement)),
            DependencyElement::Other { .. } => None,
        })
    }

    /// Statement nodes that are not dependency declarations.
    pub fn statements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.elements.iter().filter_map(|e| match e {
            DependencyElement::Other { statement } => Some(*statement),
            DependencyElement::Declaration { .. } => None,
        })
    }
}
