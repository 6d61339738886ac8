use indoc::indoc;

use crate::blocks::{
    self, BlockStack, DEPENDENCIES, PLUGINS, SUBPROJECTS,
};
use crate::cst::NodeId;
use crate::session::ParseSession;
use crate::walk::{self, ScriptVisitor, Statements};

fn find_block(session: &ParseSession, name: &str) -> NodeId {
    let mut found = None;
    blocks::for_each_named_block(session, |session, block| {
        if found.is_none() && blocks::is_named(session, block, name) {
            found = Some(block);
        }
    });
    found.unwrap()
}

fn first_statement(session: &ParseSession, block: NodeId) -> NodeId {
    session.cst().statements(block).next().unwrap()
}

const NESTED: &str = indoc! {r#"
    subprojects {
        dependencies {
            api("a:b:1")
        }
    }

    someOtherBlock {
        version = "1"
    }
"#};

#[test]
fn blocks_are_visited_in_source_order() {
    let session = ParseSession::parse(NESTED);
    let mut names = Vec::new();
    blocks::for_each_named_block(&session, |session, block| {
        names.push(blocks::block_name(session, block).unwrap().to_string());
    });
    assert_eq!(names, ["subprojects", "dependencies", "someOtherBlock"]);
}

#[test]
fn enclosing_block_is_the_nearest_strict_ancestor() {
    let session = ParseSession::parse(NESTED);
    let dependencies = find_block(&session, DEPENDENCIES);
    let api = first_statement(&session, dependencies);

    assert_eq!(
        blocks::enclosing_named_block(&session, api, None),
        Some(dependencies)
    );
    let subprojects = blocks::enclosing_named_block(&session, api, Some(SUBPROJECTS));
    assert_eq!(subprojects, Some(find_block(&session, SUBPROJECTS)));
    assert_eq!(blocks::enclosing_named_block(&session, api, Some(PLUGINS)), None);

    // The block itself is not its own ancestor.
    assert_eq!(
        blocks::enclosing_named_block(&session, dependencies, None),
        subprojects
    );
}

#[test]
fn outermost_block_tops_the_chain() {
    let session = ParseSession::parse(NESTED);
    let dependencies = find_block(&session, DEPENDENCIES);
    let api = first_statement(&session, dependencies);
    let subprojects = find_block(&session, SUBPROJECTS);

    assert_eq!(blocks::outermost_block(&session, api), Some(subprojects));
    assert_eq!(
        blocks::outermost_block(&session, dependencies),
        Some(subprojects)
    );
    // A top-level block is its own outermost block.
    assert_eq!(
        blocks::outermost_block(&session, subprojects),
        Some(subprojects)
    );
}

#[test]
fn wrapper_chain_collapses_across_three_levels() {
    let session = ParseSession::parse(indoc! {r#"
        subprojects {
            buildscript {
                repositories {
                }
            }
        }
    "#});
    let repositories = find_block(&session, blocks::REPOSITORIES);
    let subprojects = find_block(&session, SUBPROJECTS);
    assert_eq!(
        blocks::outermost_block(&session, repositories),
        Some(subprojects)
    );
}

#[test]
fn sibling_statements_stop_the_wrapper_chain() {
    let session = ParseSession::parse(indoc! {r#"
        subprojects {
            buildscript {
                repositories {
                }
            }
            version = "1"
        }
    "#});
    let repositories = find_block(&session, blocks::REPOSITORIES);
    let buildscript = find_block(&session, blocks::BUILDSCRIPT);
    assert_eq!(
        blocks::outermost_block(&session, repositories),
        Some(buildscript)
    );
}

#[test]
fn containment_predicates_agree_with_ancestry() {
    let session = ParseSession::parse(NESTED);
    let dependencies = find_block(&session, DEPENDENCIES);
    let api = first_statement(&session, dependencies);
    let subprojects = find_block(&session, SUBPROJECTS);

    assert!(blocks::is_in_named_block(&session, api, None));
    assert!(blocks::is_in_named_block(&session, api, Some(SUBPROJECTS)));
    assert!(!blocks::is_in_named_block(&session, api, Some(PLUGINS)));
    assert!(!blocks::is_top_level(&session, api));
    assert!(blocks::is_top_level(&session, subprojects));
}

#[test]
fn child_blocks_lists_direct_children_only() {
    let session = ParseSession::parse(NESTED);
    let root = session.cst().root();

    let top: Vec<_> = blocks::child_blocks(&session, root, None)
        .filter_map(|b| blocks::block_name(&session, b))
        .collect();
    assert_eq!(top, ["subprojects", "someOtherBlock"]);

    let subprojects = find_block(&session, SUBPROJECTS);
    let inner: Vec<_> = blocks::child_blocks(&session, subprojects, Some(DEPENDENCIES)).collect();
    assert_eq!(inner, [find_block(&session, DEPENDENCIES)]);
    assert_eq!(
        blocks::child_blocks(&session, root, Some(DEPENDENCIES)).count(),
        0
    );
}

#[test]
fn plugins_block_only_counts_at_the_top_level() {
    let session = ParseSession::parse(indoc! {r#"
        plugins {
            id("com.example")
        }

        allprojects {
            plugins {
                id("nested.example")
            }
        }
    "#});
    let mut verdicts = Vec::new();
    blocks::for_each_named_block(&session, |session, block| {
        if blocks::is_named(session, block, PLUGINS) {
            verdicts.push(blocks::is_plugins_block(session, block));
        }
    });
    assert_eq!(verdicts, [true, false]);
}

#[test]
fn block_stack_tracks_nesting() {
    let mut stack = BlockStack::new();
    assert!(stack.is_empty());
    stack.push(SUBPROJECTS);
    stack.push(DEPENDENCIES);
    assert_eq!(stack.depth(), 2);
    assert!(stack.contains(SUBPROJECTS));
    assert_eq!(stack.innermost(), Some(DEPENDENCIES));
    stack.pop();
    assert_eq!(stack.innermost(), Some(SUBPROJECTS));
}

#[test]
fn walk_fires_statement_and_block_callbacks() {
    struct Counter {
        depth: Statements,
        top_level: usize,
        nested: usize,
        blocks: Vec<String>,
    }

    impl ScriptVisitor for Counter {
        fn enter_statement(&mut self, _session: &ParseSession, _statement: NodeId) {
            if self.depth.is_top_level() {
                self.top_level += 1;
            } else {
                self.nested += 1;
            }
        }

        fn enter_named_block(&mut self, session: &ParseSession, block: NodeId) {
            self.depth.on_enter_block();
            if let Some(name) = blocks::block_name(session, block) {
                self.blocks.push(name.to_string());
            }
        }

        fn exit_named_block(&mut self, _session: &ParseSession, _block: NodeId) {
            self.depth.on_exit_block();
        }
    }

    let session = ParseSession::parse(NESTED);
    let mut counter = Counter {
        depth: Statements::new(),
        top_level: 0,
        nested: 0,
        blocks: Vec::new(),
    };
    walk::walk(&session, &mut counter);

    assert_eq!(counter.top_level, 2);
    assert_eq!(counter.nested, 3);
    assert_eq!(counter.blocks, ["subprojects", "dependencies", "someOtherBlock"]);
}
