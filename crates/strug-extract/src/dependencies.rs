//! Classifies the statements of a `dependencies` block.
//!
//! Classification is conservative: a statement shape that is not positively
//! recognized as a dependency declaration is kept as an opaque statement
//! rather than guessed at, and a recognized declaration whose identifier
//! cannot be resolved is a hard error. Guessing risks corrupting a rewrite
//! downstream.

use strug_syntax::blocks::{self, BUILDSCRIPT, DEPENDENCIES};
use strug_syntax::comments::Comments;
use strug_syntax::cst::NodeId;
use strug_syntax::expr::{self, Call};
use strug_syntax::session::ParseSession;

use crate::model::{
    Capability, DependencyContainer, DependencyDeclaration, DependencyElement, DependencyKind,
    Identifier,
};
use crate::{ExtractError, Result};

/// Keys accepted in the named-argument declaration form.
const COMPLEX_KEYS: [&str; 6] = ["group", "name", "version", "configuration", "classifier", "ext"];

pub struct DependencyExtractor<'s> {
    session: &'s ParseSession,
    comments: Comments,
}

impl<'s> DependencyExtractor<'s> {
    pub fn new(session: &'s ParseSession) -> Self {
        Self {
            session,
            comments: Comments::default(),
        }
    }

    pub fn with_indent(session: &'s ParseSession, indent: impl Into<String>) -> Self {
        Self {
            session,
            comments: Comments::new(indent),
        }
    }

    /// To be called when the surrounding walk enters a named block, so that
    /// lifted comments are re-indented for the current nesting level.
    pub fn on_enter_block(&mut self) {
        self.comments.on_enter_block();
    }

    pub fn on_exit_block(&mut self) {
        self.comments.on_exit_block();
    }

    /// Collects and classifies every statement of `block`, a `dependencies`
    /// block, in source order.
    pub fn collect(&self, block: NodeId) -> Result<DependencyContainer> {
        let mut elements = Vec::new();
        for statement in self.session.cst().statements(block) {
            elements.push(self.classify(statement)?);
        }
        Ok(DependencyContainer { elements })
    }

    /// Collects the classpath declarations of a
    /// `buildscript { dependencies { ... } }` block. Returns an empty
    /// container when `block` is any other dependencies block; opaque
    /// statements are dropped.
    pub fn collect_classpath(&self, block: NodeId) -> Result<DependencyContainer> {
        let in_buildscript = blocks::is_named(self.session, block, DEPENDENCIES)
            && blocks::enclosing_named_block(self.session, block, None).is_some_and(|outer| {
                blocks::is_named(self.session, outer, BUILDSCRIPT)
                    && blocks::enclosing_named_block(self.session, outer, None).is_none()
            });
        if !in_buildscript {
            return Ok(DependencyContainer::default());
        }
        let container = self.collect(block)?;
        Ok(DependencyContainer {
            elements: container
                .elements
                .into_iter()
                .filter(|e| matches!(e, DependencyElement::Declaration { .. }))
                .collect(),
        })
    }

    fn classify(&self, statement: NodeId) -> Result<DependencyElement> {
        let Some(call) = expr::as_call(self.session, statement) else {
            return Ok(DependencyElement::Other { statement });
        };
        // Navigation or further calls after the argument list mean this is
        // not a declaration (`tasks.withType<Foo>().configureEach { ... }`).
        if !call.trailing.is_empty() {
            return Ok(DependencyElement::Other { statement });
        }
        let declaration = match call.arguments.len() {
            1 => self.declaration(statement, &call)?,
            n if n >= 2 => match self.complex_declaration(statement, &call)? {
                Some(declaration) => declaration,
                None => return Ok(DependencyElement::Other { statement }),
            },
            _ => return Ok(DependencyElement::Other { statement }),
        };
        Ok(DependencyElement::Declaration {
            declaration,
            statement,
        })
    }

    /// Parses the single-argument form. The argument is unwrapped innermost
    /// first: capability wrappers, then a special function or the identifier
    /// itself.
    fn declaration(&self, statement: NodeId, call: &Call) -> Result<DependencyDeclaration> {
        let mut capability = Capability::Default;
        let mut kind = DependencyKind::Module;
        let mut value = expr::argument_value(self.session, call.arguments[0])
            .ok_or_else(|| self.unresolvable(statement))?;

        let identifier = loop {
            if let Some(text) = expr::literal_text(self.session, value) {
                break Identifier::new(format!("\"{text}\""));
            }
            if let Some(name) = expr::bare_identifier(self.session, value) {
                break Identifier::new(name);
            }
            if let Some(path) = expr::navigation_text(self.session, value) {
                break Identifier::new(path);
            }
            let inner = expr::as_call(self.session, value)
                .ok_or_else(|| self.unresolvable(statement))?;
            if let Some(wrapped) = Capability::from_wrapper(inner.callee) {
                capability = wrapped;
                value = inner
                    .arguments
                    .first()
                    .and_then(|&a| expr::argument_value(self.session, a))
                    .ok_or_else(|| self.unresolvable(statement))?;
                continue;
            }
            match inner.callee {
                "project" => kind = DependencyKind::Project,
                "file" => kind = DependencyKind::File,
                "files" => kind = DependencyKind::Files,
                "fileTree" => kind = DependencyKind::FileTree,
                name if inner.arguments.is_empty() && inner.value_arguments.is_some() => {
                    // e.g. `gradleApi()`, a call that is its own identifier.
                    break Identifier::new(format!("{name}()"));
                }
                _ => {}
            }
            break self
                .find_identifier(&inner)
                .ok_or_else(|| self.unresolvable(statement))?;
        };

        Ok(DependencyDeclaration {
            configuration: call.callee.to_string(),
            kind: kind.refine(&identifier),
            identifier,
            capability,
            full_text: self.full_text(statement),
            preceding_comment: self.preceding_comment(statement),
            classifier: None,
            ext: None,
            is_complex: false,
        })
    }

    /// Resolves the identifier from a special function's own argument list:
    /// `project(":x")`, `project(path = ":x")`, or the two-argument
    /// `project(":x", configuration = "y")` form in either order.
    fn find_identifier(&self, call: &Call) -> Option<Identifier> {
        match call.arguments.as_slice() {
            [argument] => {
                let (name, value) = expr::argument_parts(self.session, *argument);
                let value = value?;
                match name {
                    None => {
                        if let Some(quoted) = self.quoted(value) {
                            Some(Identifier::new(quoted))
                        } else {
                            expr::bare_identifier(self.session, value).map(Identifier::new)
                        }
                    }
                    Some("path") => Some(Identifier {
                        path: self.quoted(value)?,
                        configuration: None,
                        explicit_path: true,
                    }),
                    Some(_) => None,
                }
            }
            [first, second] => {
                let (first_key, first_value) = expr::argument_parts(self.session, *first);
                let (second_key, second_value) = expr::argument_parts(self.session, *second);
                let first_value = self.quoted(first_value?)?;
                let second_value = self.quoted(second_value?)?;
                let explicit_path = first_key == Some("path") || second_key == Some("path");

                let (path, configuration) = match (first_key, second_key) {
                    (Some("path") | None, Some("configuration")) => (first_value, second_value),
                    (Some("configuration"), Some("path")) => (second_value, first_value),
                    _ => return None,
                };
                Some(Identifier {
                    path,
                    configuration: Some(configuration),
                    explicit_path,
                })
            }
            _ => None,
        }
    }

    /// Parses the named-argument form:
    /// `runtimeOnly(group = "foo", name = "bar", version = "2.0")`.
    ///
    /// `group` and `name` are mandatory and the identifier is synthesized as
    /// a quoted GAV coordinate; a non-literal version is rendered with string
    /// interpolation syntax. Anonymous multi-argument calls are not
    /// declarations; a named shape outside this form is an error.
    fn complex_declaration(
        &self,
        statement: NodeId,
        call: &Call,
    ) -> Result<Option<DependencyDeclaration>> {
        let mut group = None;
        let mut name = None;
        let mut version = None;
        let mut producer_configuration = None;
        let mut classifier = None;
        let mut ext = None;
        let mut named = 0usize;

        for &argument in &call.arguments {
            let (key, value) = expr::argument_parts(self.session, argument);
            let Some(key) = key else { continue };
            named += 1;
            if !COMPLEX_KEYS.contains(&key) {
                return Err(self.unsupported(statement));
            }
            let Some(value) = value else {
                return Err(self.unsupported(statement));
            };
            let literal = expr::literal_text(self.session, value);
            let slot = match key {
                "group" => &mut group,
                "name" => &mut name,
                "version" => {
                    version = Some(match literal {
                        Some(v) => v.to_string(),
                        // e.g. `version = libs.versions.bar.get()`
                        None => format!("${{{}}}", expr::code_text(self.session, value)),
                    });
                    continue;
                }
                "configuration" => &mut producer_configuration,
                "classifier" => &mut classifier,
                _ => &mut ext,
            };
            *slot = Some(
                literal
                    .ok_or_else(|| self.unsupported(statement))?
                    .to_string(),
            );
        }

        if named == 0 {
            // e.g. `add("extraImplementation", libs.fortyTwo)`
            return Ok(None);
        }
        if named != call.arguments.len() {
            return Err(self.unsupported(statement));
        }
        let (Some(group), Some(name)) = (group, name) else {
            return Err(self.unsupported(statement));
        };

        let path = match &version {
            Some(version) => format!("\"{group}:{name}:{version}\""),
            None => format!("\"{group}:{name}\""),
        };
        let identifier = Identifier {
            path,
            configuration: producer_configuration,
            explicit_path: false,
        };

        Ok(Some(DependencyDeclaration {
            configuration: call.callee.to_string(),
            kind: DependencyKind::Module.refine(&identifier),
            identifier,
            capability: Capability::Default,
            full_text: self.full_text(statement),
            preceding_comment: self.preceding_comment(statement),
            classifier,
            ext,
            is_complex: true,
        }))
    }

    /// Literal text of `node` with its quotation marks restored, or `None`
    /// when it is not a string literal.
    fn quoted(&self, node: NodeId) -> Option<String> {
        expr::literal_text(self.session, node).map(|text| format!("\"{text}\""))
    }

    fn full_text(&self, statement: NodeId) -> String {
        self.session.node_text(statement).to_string()
    }

    fn preceding_comment(&self, statement: NodeId) -> Option<String> {
        let first = self.session.first_token(statement)?;
        self.comments.comments_to_left(self.session, first)
    }

    fn unresolvable(&self, statement: NodeId) -> ExtractError {
        ExtractError::UnresolvableIdentifier {
            statement: self.full_text(statement),
        }
    }

    fn unsupported(&self, statement: NodeId) -> ExtractError {
        ExtractError::UnsupportedArguments {
            statement: self.full_text(statement),
        }
    }
}
