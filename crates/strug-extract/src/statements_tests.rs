use indoc::indoc;
use strug_syntax::session::ParseSession;

use crate::model::{Position, Statement};
use crate::statements::top_level_statements;

#[test]
fn lists_top_level_statements_in_order() {
    let session = ParseSession::parse(indoc! {r#"
        import java.util.concurrent.TimeUnit

        plugins {
            id("com.example")
        }

        val namespace = "com.squareup"

        tasks.jar {
            enabled = false
        }

        group = "com.example"

        for (i in 1..3) {
            println(i)
        }
    "#});
    let statements = top_level_statements(&session);

    let texts: Vec<&str> = statements.iter().map(|s| s.text()).collect();
    assert_eq!(
        texts,
        [
            "import java.util.concurrent.TimeUnit",
            "plugins",
            "val namespace = \"com.squareup\"",
            "tasks.jar {",
            "group = \"com.example\"",
            "for (i in 1..3) {",
        ]
    );

    assert!(matches!(statements[0], Statement::Declaration { .. }));
    assert!(matches!(statements[1], Statement::NamedBlock { .. }));
    assert!(matches!(statements[2], Statement::Declaration { .. }));
    assert!(matches!(statements[3], Statement::Expression { .. }));
    assert!(matches!(statements[4], Statement::Assignment { .. }));
    assert!(matches!(statements[5], Statement::Loop { .. }));
}

#[test]
fn positions_are_one_based_token_spans() {
    let session = ParseSession::parse(indoc! {r#"
        group = "com.example"

        plugins {
            id("com.example")
        }
    "#});
    let statements = top_level_statements(&session);

    assert_eq!(statements[0].start(), Position { line: 1, column: 1 });
    assert_eq!(statements[0].stop(), Position { line: 1, column: 9 });
    assert_eq!(statements[1].start(), Position { line: 3, column: 1 });
    assert_eq!(statements[1].stop(), Position { line: 5, column: 1 });
}

#[test]
fn nested_statements_are_not_listed() {
    let session = ParseSession::parse(indoc! {r#"
        subprojects {
            apply(plugin = "kotlin")
        }
    "#});
    let statements = top_level_statements(&session);
    assert_eq!(statements.len(), 1);
    assert!(matches!(
        statements[0],
        Statement::NamedBlock { ref name, .. } if name == "subprojects"
    ));
}
