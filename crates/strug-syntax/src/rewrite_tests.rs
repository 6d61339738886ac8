use indoc::indoc;

use crate::cst::NodeId;
use crate::rewrite::RewriteBuffer;
use crate::session::ParseSession;
use crate::Error;

/// First statement inside the first top-level named block.
fn first_nested_statement(session: &ParseSession) -> NodeId {
    let root = session.cst().root();
    let block_statement = session.cst().statements(root).next().unwrap();
    let block = session.cst().leaf(block_statement);
    session.cst().statements(block).next().unwrap()
}

fn statement_extent(session: &ParseSession, statement: NodeId) -> (u32, u32) {
    (
        session.first_token(statement).unwrap(),
        session.last_token(statement).unwrap(),
    )
}

#[test]
fn unedited_render_reproduces_source() {
    let source = indoc! {r#"
        plugins {
            id("com.example") version "1.0"
        }

        dependencies {
            // pinned
            api("g:a:1") // trailing
            implementation(libs.core)
        }
    "#};
    let session = ParseSession::parse(source);
    let buffer = RewriteBuffer::new(&session);
    assert_eq!(buffer.render().unwrap(), source);
}

#[test]
fn removing_a_statement_takes_its_line() {
    let session = ParseSession::parse(indoc! {r#"
        dependencies {
            implementation("a:b:1")
            api("c:d:2")
        }
    "#});
    let statement = first_nested_statement(&session);
    let (first, last) = statement_extent(&session, statement);

    let mut buffer = RewriteBuffer::new(&session);
    buffer.delete(first, last).unwrap();
    buffer.delete_comments_and_blank_space_to_left(first).unwrap();

    assert_eq!(
        buffer.render().unwrap(),
        indoc! {r#"
            dependencies {
                api("c:d:2")
            }
        "#}
    );
}

#[test]
fn unedited_render_keeps_leading_blank_space() {
    let source = "\nplugins {\n    id(\"x\")\n}\n";
    let session = ParseSession::parse(source);
    let buffer = RewriteBuffer::new(&session);
    assert_eq!(buffer.render().unwrap(), source);
}

#[test]
fn blank_space_primitive_deletes_the_whole_run() {
    let session = ParseSession::parse("dependencies {\n\n    api(\"a:b:1\")\n}\n");
    let statement = first_nested_statement(&session);
    let (first, last) = statement_extent(&session, statement);

    let mut buffer = RewriteBuffer::new(&session);
    buffer.delete(first, last).unwrap();
    buffer.delete_blank_space_to_left(first).unwrap();

    assert_eq!(buffer.render().unwrap(), "dependencies {\n}\n");
}

#[test]
fn whitespace_primitives_stop_at_newlines() {
    let session = ParseSession::parse("dependencies {\n    api(\"a:b:1\")    \n}\n");
    let statement = first_nested_statement(&session);
    let (first, last) = statement_extent(&session, statement);

    let mut buffer = RewriteBuffer::new(&session);
    buffer.delete(first, last).unwrap();
    buffer.delete_whitespace_to_left(first).unwrap();
    buffer.delete_whitespace_to_right(last).unwrap();

    // Both newlines stay; only the horizontal runs go.
    assert_eq!(buffer.render().unwrap(), "dependencies {\n\n}\n");
}

#[test]
fn removing_a_statement_takes_attached_comments() {
    let session = ParseSession::parse(indoc! {r#"
        dependencies {
            // remove me
            // and me
            implementation("a:b:1")
            api("c:d:2")
        }
    "#});
    let statement = first_nested_statement(&session);
    let (first, last) = statement_extent(&session, statement);

    let mut buffer = RewriteBuffer::new(&session);
    buffer.delete(first, last).unwrap();
    buffer.delete_comments_and_blank_space_to_left(first).unwrap();

    assert_eq!(
        buffer.render().unwrap(),
        indoc! {r#"
            dependencies {
                api("c:d:2")
            }
        "#}
    );
}

#[test]
fn blank_line_separated_comments_survive() {
    let session = ParseSession::parse(indoc! {r#"
        dependencies {
            // unrelated note

            implementation("a:b:1")
            api("c:d:2")
        }
    "#});
    let statement = first_nested_statement(&session);
    let (first, last) = statement_extent(&session, statement);

    let mut buffer = RewriteBuffer::new(&session);
    buffer.delete(first, last).unwrap();
    buffer.delete_comments_and_blank_space_to_left(first).unwrap();

    let rendered = buffer.render().unwrap();
    assert!(rendered.contains("// unrelated note"), "{rendered}");
}

#[test]
fn removing_a_statement_takes_its_trailing_comment() {
    let session = ParseSession::parse(indoc! {r#"
        dependencies {
            api("a:b:1") // bye
            implementation("c:d:2")
        }
    "#});
    let statement = first_nested_statement(&session);
    let (first, last) = statement_extent(&session, statement);

    let mut buffer = RewriteBuffer::new(&session);
    buffer.delete(first, last).unwrap();
    buffer.delete_comments_and_blank_space_to_right(last).unwrap();
    buffer.delete_comments_and_blank_space_to_left(first).unwrap();

    assert_eq!(
        buffer.render().unwrap(),
        indoc! {r#"
            dependencies {
                implementation("c:d:2")
            }
        "#}
    );
}

#[test]
fn replacing_a_statement_in_place() {
    let session = ParseSession::parse(indoc! {r#"
        dependencies {
            implementation(group = "foo", name = "bar", version = "2.0")
        }
    "#});
    let statement = first_nested_statement(&session);
    let (first, last) = statement_extent(&session, statement);

    let mut buffer = RewriteBuffer::new(&session);
    buffer.replace(first, last, "implementation(\"foo:bar:2.0\")").unwrap();

    assert_eq!(
        buffer.render().unwrap(),
        indoc! {r#"
            dependencies {
                implementation("foo:bar:2.0")
            }
        "#}
    );
}

#[test]
fn inserting_after_the_block_opener() {
    let session = ParseSession::parse(indoc! {r#"
        dependencies {
            api("a:b:1")
        }
    "#});
    let root = session.cst().root();
    let block = session
        .cst()
        .leaf(session.cst().statements(root).next().unwrap());
    let brace = session
        .cst()
        .child_tokens(block)
        .nth(1)
        .unwrap();

    let mut buffer = RewriteBuffer::new(&session);
    buffer.insert_after(brace, "\n    testImplementation(\"x:y:1\")");

    assert_eq!(
        buffer.render().unwrap(),
        indoc! {r#"
            dependencies {
                testImplementation("x:y:1")
                api("a:b:1")
            }
        "#}
    );
}

#[test]
fn inserting_past_the_last_token_appends() {
    let session = ParseSession::parse("plugins {\n    id(\"x\")\n}\n");
    let end = session.tokens().len() as u32;

    let mut buffer = RewriteBuffer::new(&session);
    buffer.insert_before(end, "\ndependencies {\n}\n");

    assert_eq!(
        buffer.render().unwrap(),
        "plugins {\n    id(\"x\")\n}\n\ndependencies {\n}\n"
    );
}

#[test]
fn overlapping_edits_conflict() {
    let session = ParseSession::parse("dependencies {\n    api(\"a:b:1\")\n}\n");
    let statement = first_nested_statement(&session);
    let (first, last) = statement_extent(&session, statement);

    let mut buffer = RewriteBuffer::new(&session);
    buffer.delete(first, last).unwrap();
    let clash = buffer.replace_token(first, "implementation");
    assert!(matches!(clash, Err(Error::EditConflict(_))));

    // Re-issuing the identical delete is a no-op, not a conflict.
    buffer.delete(first, last).unwrap();
}

#[test]
fn composite_deletions_are_idempotent() {
    let session = ParseSession::parse(indoc! {r#"
        dependencies {
            // gone
            api("a:b:1")
        }
    "#});
    let statement = first_nested_statement(&session);
    let (first, last) = statement_extent(&session, statement);

    let mut buffer = RewriteBuffer::new(&session);
    buffer.delete(first, last).unwrap();
    buffer.delete_comments_and_blank_space_to_left(first).unwrap();
    buffer.delete_comments_and_blank_space_to_left(first).unwrap();

    assert_eq!(buffer.render().unwrap(), "dependencies {\n}\n");
}

#[test]
fn render_refuses_broken_syntax() {
    let session = ParseSession::parse("dependencies {\n    api(\"a:b:1\")\n");
    let buffer = RewriteBuffer::new(&session);
    assert!(matches!(buffer.render(), Err(Error::Syntax(_))));
}
