use indoc::indoc;

use crate::comments::Comments;
use crate::session::ParseSession;

fn first_token(session: &ParseSession, text: &str) -> u32 {
    session
        .tokens()
        .iter()
        .position(|t| t.text(session.source()) == text)
        .unwrap() as u32
}

#[test]
fn line_comments_join_without_indent_at_level_zero() {
    let session = ParseSession::parse(indoc! {r#"
        plugins {
            // This is a
            // comment
            id("foo")
        }
    "#});
    let comments = Comments::default();
    let id = first_token(&session, "id");
    assert_eq!(
        comments.comments_to_left(&session, id),
        Some("// This is a\n// comment".to_string())
    );
}

#[test]
fn level_reindents_lifted_comments() {
    let session = ParseSession::parse(indoc! {r#"
        plugins {
            // lifted
            id("foo")
        }
    "#});
    let mut comments = Comments::new("    ");
    comments.on_enter_block();
    let id = first_token(&session, "id");
    assert_eq!(
        comments.comments_to_left(&session, id),
        Some("    // lifted".to_string())
    );
    comments.on_exit_block();
    assert_eq!(
        comments.comments_to_left(&session, id),
        Some("// lifted".to_string())
    );
}

#[test]
fn block_comment_text_is_preserved() {
    let session = ParseSession::parse(indoc! {r#"
        dependencies {
            /* keep
               me */
            api("a:b:1")
        }
    "#});
    let comments = Comments::default();
    let api = first_token(&session, "api");
    assert_eq!(
        comments.comments_to_left(&session, api),
        Some("/* keep\n       me */".to_string())
    );
}

#[test]
fn comments_stop_at_code() {
    let session = ParseSession::parse(indoc! {r#"
        // header
        foo()
        bar()
    "#});
    let comments = Comments::default();
    let bar = first_token(&session, "bar");
    assert_eq!(comments.comments_to_left(&session, bar), None);

    let foo = first_token(&session, "foo");
    assert_eq!(
        comments.comments_to_left(&session, foo),
        Some("// header".to_string())
    );
}

#[test]
fn comments_inside_a_block_extent() {
    let session = ParseSession::parse(indoc! {r#"
        dependencies {
            // one
            api("a:b:1") // two
        }
    "#});
    let comments = Comments::default();
    let root = session.cst().root();
    let block = session.cst().leaf(session.cst().statements(root).next().unwrap());
    let found = comments.comment_tokens_in_block(&session, block);
    assert_eq!(found.len(), 2);
}
