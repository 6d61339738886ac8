//! Plugin declarations from `plugins` blocks and script-level `apply` calls.

use indexmap::IndexSet;
use strug_syntax::blocks::{self, ALLPROJECTS, BlockStack};
use strug_syntax::cst::{NodeId, NodeKind};
use strug_syntax::expr;
use strug_syntax::session::ParseSession;
use strug_syntax::walk::{self, ScriptVisitor};

use crate::model::{Plugin, PluginKind};
use crate::{ExtractError, Result};

/// True at the top level of a script, or inside `allprojects` only; the two
/// places where `apply(plugin = ...)` applies a plugin to the script itself.
pub fn script_like_context(stack: &BlockStack) -> bool {
    stack.is_empty() || (stack.depth() == 1 && stack.contains(ALLPROJECTS))
}

/// Extracts a plugin declaration from one statement of a `plugins` block.
///
/// Recognizes the bare (`application`), backtick (`` `kotlin-dsl` ``) and
/// call (`id("x")`, `kotlin("jvm")`, `alias(libs.plugins.x)`) forms, each
/// optionally configured with a version and an apply flag, chained
/// (`id("x").version("1").apply(false)`) or infix
/// (`id("x") version "1" apply false`). Returns `Ok(None)` for statements
/// that are not plugin declarations.
pub fn extract_from_block(session: &ParseSession, statement: NodeId) -> Result<Option<Plugin>> {
    if let Some(infix) = expr::as_infix(session, statement) {
        let Some(mut plugin) = base_plugin(session, infix.first)? else {
            return Ok(None);
        };
        let mut config = PluginConfig::default();
        for &(name, operand) in &infix.pairs {
            config.record(session, statement, session.token_text(name), operand)?;
        }
        config.finish_into(&mut plugin);
        return Ok(Some(plugin));
    }
    base_plugin(session, statement)
}

/// The base plugin declaration, with chained configuration applied when the
/// statement carries trailing `.version(...)`/`.apply(...)` calls.
fn base_plugin(session: &ParseSession, node: NodeId) -> Result<Option<Plugin>> {
    if let Some(name) = expr::bare_identifier(session, node) {
        let plugin = match name.strip_prefix('`').and_then(|n| n.strip_suffix('`')) {
            Some(backticked) => Plugin::new(PluginKind::BlockBacktick, backticked),
            None => Plugin::new(PluginKind::BlockSimple, name),
        };
        return Ok(Some(plugin));
    }

    let Some(call) = expr::as_call(session, node) else {
        return Ok(None);
    };
    let Some(kind) = PluginKind::of_callee(call.callee) else {
        return Ok(None);
    };
    let [argument] = call.arguments.as_slice() else {
        return Ok(None);
    };
    let Some(value) = expr::argument_value(session, *argument) else {
        return Ok(None);
    };
    let id = match expr::literal_text(session, value) {
        Some(literal) => literal.to_string(),
        // the alias form names its plugin by accessor, e.g. libs.plugins.x
        None => match expr::navigation_text(session, value) {
            Some(accessor) => accessor,
            None => return Ok(None),
        },
    };

    let mut plugin = Plugin::new(kind, id);
    let mut config = PluginConfig::default();
    // Chained configuration arrives as (navigation, call) suffix pairs.
    let mut trailing = call.trailing.iter();
    while let Some(&nav) = trailing.next() {
        if session.cst().kind(nav) != NodeKind::NavigationSuffix {
            break;
        }
        let Some(name_token) = session.cst().child_tokens(nav).nth(1) else {
            break;
        };
        let Some(&suffix) = trailing.next() else {
            break;
        };
        if session.cst().kind(suffix) != NodeKind::CallSuffix {
            break;
        }
        let Some(args) = session
            .cst()
            .child_nodes(suffix)
            .next()
            .filter(|&n| session.cst().kind(n) == NodeKind::ValueArguments)
        else {
            break;
        };
        let Some(value) = session
            .cst()
            .child_nodes(args)
            .next()
            .and_then(|arg| expr::argument_value(session, arg))
        else {
            break;
        };
        config.record(session, node, session.token_text(name_token), value)?;
    }
    config.finish_into(&mut plugin);
    Ok(Some(plugin))
}

/// Accumulates at most one `version` and one `apply` configuration.
#[derive(Default)]
struct PluginConfig {
    version: Option<String>,
    applied: Option<bool>,
}

impl PluginConfig {
    fn record(
        &mut self,
        session: &ParseSession,
        statement: NodeId,
        name: &str,
        value: NodeId,
    ) -> Result<()> {
        let over_specified = || ExtractError::OverSpecifiedPlugin {
            statement: session.node_text(statement).to_string(),
        };
        match name {
            "version" => {
                if self.version.is_some() {
                    return Err(over_specified());
                }
                // A literal keeps its quotes; anything else is raw source
                // text, e.g. `libs.foo.get().version`.
                self.version = Some(match expr::literal_text(session, value) {
                    Some(literal) => format!("\"{literal}\""),
                    None => expr::code_text(session, value),
                });
            }
            "apply" => {
                if self.applied.is_some() {
                    return Err(over_specified());
                }
                self.applied = expr::literal_boolean(session, value);
                if self.applied.is_none() {
                    return Err(over_specified());
                }
            }
            _ => return Err(over_specified()),
        }
        Ok(())
    }

    fn finish_into(self, plugin: &mut Plugin) {
        plugin.version = self.version;
        plugin.applied = self.applied.unwrap_or(true);
    }
}

/// Extracts a script-level plugin application from one statement:
/// `apply(plugin = "x")` or `apply(mapOf("plugin" to "x"))`. The caller is
/// responsible for checking [`script_like_context`].
pub fn extract_from_script(session: &ParseSession, statement: NodeId) -> Option<Plugin> {
    let call = expr::as_call(session, statement)?;
    if call.callee != "apply" || !call.trailing.is_empty() {
        return None;
    }
    let [argument] = call.arguments.as_slice() else {
        return None;
    };
    let (name, value) = expr::argument_parts(session, *argument);
    let value = value?;
    match name {
        Some("plugin") => {
            let id = expr::literal_text(session, value)?;
            Some(Plugin::new(PluginKind::Apply, id))
        }
        Some(_) => None,
        None => plugin_from_map(session, value),
    }
}

/// `apply(mapOf("plugin" to "x"))`.
fn plugin_from_map(session: &ParseSession, value: NodeId) -> Option<Plugin> {
    let map = expr::as_call(session, value)?;
    if map.callee != "mapOf" {
        return None;
    }
    let [entry] = map.arguments.as_slice() else {
        return None;
    };
    let entry = expr::argument_value(session, *entry)?;
    let infix = expr::as_infix(session, entry)?;
    if expr::literal_text(session, infix.first) != Some("plugin") {
        return None;
    }
    let [(to, id)] = infix.pairs.as_slice() else {
        return None;
    };
    if session.token_text(*to) != "to" {
        return None;
    }
    let id = expr::literal_text(session, *id)?;
    Some(Plugin::new(PluginKind::Apply, id))
}

/// Scans a whole script and accumulates its deduplicated, ordered plugin set.
#[derive(Default)]
pub struct PluginFinder {
    stack: BlockStack,
    plugins: IndexSet<Plugin>,
    error: Option<ExtractError>,
}

impl PluginFinder {
    pub fn find(session: &ParseSession) -> Result<IndexSet<Plugin>> {
        let mut finder = Self::default();
        walk::walk(session, &mut finder);
        match finder.error {
            Some(error) => Err(error),
            None => Ok(finder.plugins),
        }
    }
}

impl ScriptVisitor for PluginFinder {
    fn enter_statement(&mut self, session: &ParseSession, statement: NodeId) {
        if !script_like_context(&self.stack) {
            return;
        }
        if let Some(plugin) = extract_from_script(session, statement) {
            self.plugins.insert(plugin);
        }
    }

    fn enter_named_block(&mut self, session: &ParseSession, block: NodeId) {
        if blocks::is_plugins_block(session, block) {
            for statement in session.cst().statements(block) {
                match extract_from_block(session, statement) {
                    Ok(Some(plugin)) => {
                        self.plugins.insert(plugin);
                    }
                    Ok(None) => {}
                    Err(error) => {
                        if self.error.is_none() {
                            self.error = Some(error);
                        }
                    }
                }
            }
        }
        if let Some(name) = blocks::block_name(session, block) {
            self.stack.push(name);
        }
    }

    fn exit_named_block(&mut self, _session: &ParseSession, _block: NodeId) {
        self.stack.pop();
    }
}
