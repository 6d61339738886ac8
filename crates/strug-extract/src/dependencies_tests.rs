use indoc::indoc;
use strug_syntax::blocks::{self, DEPENDENCIES};
use strug_syntax::cst::NodeId;
use strug_syntax::session::ParseSession;

use crate::ExtractError;
use crate::dependencies::DependencyExtractor;
use crate::model::{Capability, DependencyContainer, DependencyDeclaration, DependencyKind};

fn dependencies_block(session: &ParseSession) -> NodeId {
    let mut found = None;
    blocks::for_each_named_block(session, |session, block| {
        if found.is_none() && blocks::is_named(session, block, DEPENDENCIES) {
            found = Some(block);
        }
    });
    found.unwrap()
}

fn try_collect(source: &str) -> crate::Result<DependencyContainer> {
    let session = ParseSession::parse(source);
    let block = dependencies_block(&session);
    DependencyExtractor::new(&session).collect(block)
}

fn collect(source: &str) -> DependencyContainer {
    try_collect(source).unwrap()
}

fn single(declaration: &str) -> DependencyDeclaration {
    let source = format!("dependencies {{\n    {declaration}\n}}\n");
    let container = collect(&source);
    let mut declarations: Vec<_> = container.declarations().cloned().collect();
    assert_eq!(declarations.len(), 1, "expected one declaration: {declaration}");
    declarations.remove(0)
}

struct Case {
    full_text: &'static str,
    configuration: &'static str,
    identifier: &'static str,
    capability: Capability,
    kind: DependencyKind,
}

#[test]
fn classifies_declarations() {
    let cases = [
        Case {
            full_text: r#"api("g:a:v")"#,
            configuration: "api",
            identifier: r#""g:a:v""#,
            capability: Capability::Default,
            kind: DependencyKind::Module,
        },
        // val gav = "g:a:v", defined elsewhere
        Case {
            full_text: "api(gav)",
            configuration: "api",
            identifier: "gav",
            capability: Capability::Default,
            kind: DependencyKind::Module,
        },
        Case {
            full_text: "api(platform(gav))",
            configuration: "api",
            identifier: "gav",
            capability: Capability::Platform,
            kind: DependencyKind::Module,
        },
        Case {
            full_text: "api(platform(project(proj)))",
            configuration: "api",
            identifier: "proj",
            capability: Capability::Platform,
            kind: DependencyKind::Project,
        },
        Case {
            full_text: "implementation(libs.gAV)",
            configuration: "implementation",
            identifier: "libs.gAV",
            capability: Capability::Default,
            kind: DependencyKind::Module,
        },
        Case {
            full_text: r#"testFixturesApi(project(":has-test-fixtures"))"#,
            configuration: "testFixturesApi",
            identifier: r#"":has-test-fixtures""#,
            capability: Capability::Default,
            kind: DependencyKind::Project,
        },
        Case {
            full_text: r#"testImplementation(testFixtures(project(":has-test-fixtures")))"#,
            configuration: "testImplementation",
            identifier: r#"":has-test-fixtures""#,
            capability: Capability::TestFixtures,
            kind: DependencyKind::Project,
        },
        Case {
            full_text: "implementation(platform(libs.bigBom))",
            configuration: "implementation",
            identifier: "libs.bigBom",
            capability: Capability::Platform,
            kind: DependencyKind::Module,
        },
        Case {
            full_text: "implementation(enforcedPlatform(libs.bigBom))",
            configuration: "implementation",
            identifier: "libs.bigBom",
            capability: Capability::EnforcedPlatform,
            kind: DependencyKind::Module,
        },
        Case {
            full_text: "api(gradleApi())",
            configuration: "api",
            identifier: "gradleApi()",
            capability: Capability::Default,
            kind: DependencyKind::GradleDistribution,
        },
        Case {
            full_text: "testImplementation(gradleTestKit())",
            configuration: "testImplementation",
            identifier: "gradleTestKit()",
            capability: Capability::Default,
            kind: DependencyKind::GradleDistribution,
        },
    ];

    for case in cases {
        let declaration = single(case.full_text);
        assert_eq!(declaration.configuration, case.configuration, "{}", case.full_text);
        assert_eq!(declaration.identifier.path, case.identifier, "{}", case.full_text);
        assert_eq!(declaration.capability, case.capability, "{}", case.full_text);
        assert_eq!(declaration.kind, case.kind, "{}", case.full_text);
        assert_eq!(declaration.full_text, case.full_text);
        assert!(!declaration.is_complex, "{}", case.full_text);
    }
}

#[test]
fn named_argument_form_synthesizes_coordinates() {
    let declaration = single(r#"runtimeOnly(group = "foo", name = "bar", version = "2.0")"#);
    assert!(declaration.is_complex);
    assert_eq!(declaration.identifier.path, r#""foo:bar:2.0""#);
    assert_eq!(declaration.configuration, "runtimeOnly");
    assert_eq!(declaration.kind, DependencyKind::Module);
}

#[test]
fn non_literal_version_renders_as_interpolation() {
    let declaration =
        single(r#"compileOnly(group = "foo", name = "bar", version = libs.versions.bar.get())"#);
    assert!(declaration.is_complex);
    assert_eq!(
        declaration.identifier.path,
        r#""foo:bar:${libs.versions.bar.get()}""#
    );
}

#[test]
fn classifier_is_recorded_without_joining_coordinates() {
    let declaration = single(
        r#"devImplementation(group = "io.netty", name = "netty-transport-native-kqueue", classifier = "osx-x86_64")"#,
    );
    assert!(declaration.is_complex);
    assert_eq!(declaration.classifier.as_deref(), Some("osx-x86_64"));
    assert_eq!(
        declaration.identifier.path,
        r#""io.netty:netty-transport-native-kqueue""#
    );
}

#[test]
fn project_named_argument_forms() {
    let declaration = single(r#"implementation(project(path = ":x"))"#);
    assert_eq!(declaration.kind, DependencyKind::Project);
    assert_eq!(declaration.identifier.path, r#"":x""#);
    assert!(declaration.identifier.explicit_path);

    let declaration = single(r#"implementation(project(":x", configuration = "shadow"))"#);
    assert_eq!(declaration.identifier.path, r#"":x""#);
    assert_eq!(declaration.producer_configuration(), Some(r#""shadow""#));
    assert!(!declaration.identifier.explicit_path);
}

#[test]
fn file_dependencies_take_their_kind_from_the_call() {
    let declaration = single(r#"implementation(files("lib/magic.jar"))"#);
    assert_eq!(declaration.kind, DependencyKind::Files);
    assert_eq!(declaration.identifier.path, r#""lib/magic.jar""#);
}

#[test]
fn unrecognized_statements_stay_opaque() {
    let container = collect(indoc! {r#"
        dependencies {
            api(libs.magic)

            add("extraImplementation", libs.fortyTwo)

            val complex = "a:complex:$expression"

            if (isSpecial()) {
                testImplementation("io.special:special:1.0")
            }
        }
    "#});

    let declarations: Vec<_> = container.declarations().collect();
    assert_eq!(declarations.len(), 1);
    assert_eq!(declarations[0].identifier.path, "libs.magic");
    assert_eq!(container.statements().count(), 3);
}

#[test]
fn trailing_lambda_does_not_disturb_classification() {
    let container = collect(indoc! {r#"
        dependencies {
            implementation("g:a:v") {
                isTransitive = false
            }
        }
    "#});
    let declaration = container.declarations().next().unwrap();
    assert_eq!(declaration.identifier.path, r#""g:a:v""#);
}

#[test]
fn preceding_comments_are_captured() {
    let container = collect(indoc! {r#"
        dependencies {
            // why we need this
            // and more context
            api("g:a:v")
            implementation("uncommented:one:1.0")
        }
    "#});
    let declarations: Vec<_> = container.declarations().collect();
    assert_eq!(
        declarations[0].preceding_comment.as_deref(),
        Some("// why we need this\n// and more context")
    );
    assert_eq!(declarations[1].preceding_comment, None);
}

#[test]
fn unresolvable_identifier_is_an_error() {
    let result = try_collect(indoc! {r#"
        dependencies {
            implementation(weird.call())
        }
    "#});
    assert!(matches!(
        result,
        Err(ExtractError::UnresolvableIdentifier { .. })
    ));
}

#[test]
fn mixed_named_and_positional_arguments_are_an_error() {
    let result = try_collect(indoc! {r#"
        dependencies {
            implementation(group = "g", "artifact")
        }
    "#});
    assert!(matches!(
        result,
        Err(ExtractError::UnsupportedArguments { .. })
    ));
}

#[test]
fn classpath_collection_requires_buildscript() {
    let session = ParseSession::parse(indoc! {r#"
        buildscript {
            dependencies {
                classpath("com.example:plugin:1.0")
            }
        }

        dependencies {
            api("g:a:v")
        }
    "#});
    let extractor = DependencyExtractor::new(&session);

    let mut containers = Vec::new();
    blocks::for_each_named_block(&session, |session, block| {
        if blocks::is_named(session, block, DEPENDENCIES) {
            containers.push(extractor.collect_classpath(block).unwrap());
        }
    });

    assert_eq!(containers.len(), 2);
    let classpath: Vec<_> = containers[0].declarations().collect();
    assert_eq!(classpath.len(), 1);
    assert_eq!(classpath[0].configuration, "classpath");
    assert!(containers[1].is_empty());
}
