//! End-to-end tests: source roots on disk through `RootDocBuilder`.

use std::fs;
use std::path::{Path, PathBuf};

use grovedoc::builder::FileOutcome;
use grovedoc::{
    CollisionPolicy, DiagnosticCategory, Diagnostics, GrovedocConfig, RootDoc, RootDocBuilder,
    SearchPolicy,
};
use grovedoc_core::root::BuildState;
use tempfile::TempDir;

const FOO_JAVA: &str = r#"package pkg.a;

/** A foo from Java. */
public class Foo {
    public String name() { return "foo"; }
}
"#;

const BAR_GROOVY: &str = r#"package pkg.a

/** A bar from Groovy. */
class Bar extends Foo {
    String label
    def greet() { "hi" }
}
"#;

const PACKAGE_HTML: &str = r#"<html>
<head><title>pkg.a</title></head>
<body>
  Shared <b>things</b> for both languages.
</body>
</html>
"#;

fn write(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    write(&src, "pkg/a/Foo.java", FOO_JAVA);
    write(&src, "pkg/a/Bar.groovy", BAR_GROOVY);
    write(&src, "pkg/a/package.html", PACKAGE_HTML);
    dir
}

fn settings(roots: Vec<PathBuf>) -> GrovedocConfig {
    GrovedocConfig {
        source_path: roots,
        ..GrovedocConfig::default()
    }
}

fn build(settings: GrovedocConfig, files: &[&str]) -> (RootDoc, Diagnostics) {
    let mut builder = RootDocBuilder::new(settings);
    let mut diagnostics = Diagnostics::new();
    builder.build_tree(files, &mut diagnostics).unwrap();
    (builder.into_root_doc(), diagnostics)
}

fn class_names(root: &RootDoc, package: &str) -> Vec<String> {
    root.package_named(package)
        .map(|p| p.class_names().map(str::to_string).collect())
        .unwrap_or_default()
}

mod end_to_end {
    use super::*;

    #[test]
    fn mixed_package_with_description() {
        let dir = project();
        let (root, diagnostics) = build(
            settings(vec![dir.path().join("src")]),
            &["pkg/a/Foo.java", "pkg/a/Bar.groovy", "pkg/a/package.html"],
        );

        assert!(diagnostics.is_empty());
        assert!(root.is_resolved());
        assert_eq!(root.package_count(), 1);
        assert_eq!(class_names(&root, "pkg/a"), vec!["Bar", "Foo"]);
        let package = root.package_named("pkg/a").unwrap();
        assert_eq!(package.description(), "Shared things for both languages.");
        root.check_consistency().unwrap();
    }

    #[test]
    fn groovy_superclass_resolves_to_java_class() {
        let dir = project();
        let (root, _) = build(
            settings(vec![dir.path().join("src")]),
            &["pkg/a/Bar.groovy", "pkg/a/Foo.java"],
        );
        let bar = root.class_named("pkg.a.Bar").unwrap();
        let superclass = bar.superclass.as_ref().unwrap();
        assert_eq!(superclass.name, "Foo");
        assert_eq!(superclass.resolved, root.class_id("pkg.a.Foo"));
    }

    #[test]
    fn bad_file_is_skipped_with_one_diagnostic() {
        let dir = project();
        let src = dir.path().join("src");
        write(&src, "pkg/a/Bad.java", "public class Bad { int x }\n");

        let (root, diagnostics) = build(
            settings(vec![src]),
            &["pkg/a/Foo.java", "pkg/a/Bad.java", "pkg/a/Bar.groovy"],
        );

        assert_eq!(diagnostics.len(), 1);
        let entry = &diagnostics.entries()[0];
        assert_eq!(entry.file, "pkg/a/Bad.java");
        assert_eq!(entry.category, DiagnosticCategory::Grammar);
        assert_eq!(root.class_count(), 2);
        assert_eq!(class_names(&root, "pkg/a"), vec!["Bar", "Foo"]);
    }

    #[test]
    fn unterminated_string_is_token_stream_diagnostic() {
        let dir = project();
        let src = dir.path().join("src");
        write(&src, "pkg/b/Broken.groovy", "class Broken {\n  def s = \"open\n}\n");

        let (root, diagnostics) = build(settings(vec![src]), &["pkg/b/Broken.groovy"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.entries()[0].category,
            DiagnosticCategory::TokenStream
        );
        assert_eq!(root.package_count(), 0);
    }

    #[test]
    fn unicode_escaped_java_is_documented() {
        let mut builder = RootDocBuilder::new(GrovedocConfig::default());
        let mut diagnostics = Diagnostics::new();
        let outcome = builder
            .process_source(
                "pkg/a/Esc.java",
                r"/** Caf\u00e9 au lait. */ public class \u0045sc {}",
                &mut diagnostics,
            )
            .unwrap();
        assert!(matches!(outcome, FileOutcome::Classes(ref ids) if ids.len() == 1));
        assert!(diagnostics.is_empty());
        let esc = builder.root().class_named("pkg.a.Esc").unwrap();
        assert_eq!(esc.comment.first_sentence, "Café au lait.");
    }

    #[test]
    fn dot_prefixed_name_uses_the_plain_package() {
        let dir = project();
        let (root, diagnostics) = build(
            settings(vec![dir.path().join("src")]),
            &["./pkg/a/Foo.java"],
        );
        assert!(diagnostics.is_empty());
        assert_eq!(class_names(&root, "pkg/a"), vec!["Foo"]);
        assert!(root.class_named("pkg.a.Foo").is_some());
    }

    #[test]
    fn runaway_class_nesting_is_a_grammar_diagnostic() {
        let depth = 300;
        let mut source = String::new();
        for i in 0..depth {
            source.push_str(&format!("class N{i} {{\n"));
        }
        source.push_str(&"}\n".repeat(depth));

        let mut builder = RootDocBuilder::new(GrovedocConfig::default());
        let mut diagnostics = Diagnostics::new();
        let outcome = builder
            .process_source("pkg/deep/N0.groovy", &source, &mut diagnostics)
            .unwrap();
        assert_eq!(outcome, FileOutcome::Skipped);
        assert_eq!(
            diagnostics.entries()[0].category,
            DiagnosticCategory::Grammar
        );
        assert_eq!(builder.root().package_count(), 0);
    }

    #[test]
    fn file_missing_everywhere_is_silently_skipped() {
        let dir = project();
        let (root, diagnostics) = build(
            settings(vec![dir.path().join("src")]),
            &["pkg/a/Foo.java", "pkg/a/Gone.java"],
        );
        assert!(diagnostics.is_empty());
        assert_eq!(class_names(&root, "pkg/a"), vec!["Foo"]);
    }
}

mod aggregation {
    use super::*;

    #[test]
    fn package_contents_do_not_depend_on_order() {
        let dir = project();
        let roots = vec![dir.path().join("src")];
        let (forward, _) = build(settings(roots.clone()), &["pkg/a/Foo.java", "pkg/a/Bar.groovy"]);
        let (backward, _) = build(settings(roots), &["pkg/a/Bar.groovy", "pkg/a/Foo.java"]);
        assert_eq!(class_names(&forward, "pkg/a"), class_names(&backward, "pkg/a"));
        assert_eq!(class_names(&forward, "pkg/a"), vec!["Bar", "Foo"]);
    }

    #[test]
    fn failed_file_leaves_root_unchanged() {
        let mut builder = RootDocBuilder::new(GrovedocConfig::default());
        let mut diagnostics = Diagnostics::new();
        builder
            .process_source("pkg/a/Foo.java", FOO_JAVA, &mut diagnostics)
            .unwrap();

        let before: Vec<_> = builder.root().classes().map(|(_, c)| c.clone()).collect();
        let packages_before = builder.root().package_count();

        let outcome = builder
            .process_source("pkg/z/Bad.java", "class Bad {", &mut diagnostics)
            .unwrap();
        assert_eq!(outcome, FileOutcome::Skipped);

        let after: Vec<_> = builder.root().classes().map(|(_, c)| c.clone()).collect();
        assert_eq!(before, after);
        assert_eq!(builder.root().package_count(), packages_before);
        assert!(builder.root().package_named("pkg/z").is_none());
        assert_eq!(builder.root().state(), BuildState::Accumulating);
    }

    #[test]
    fn description_before_classes() {
        let mut builder = RootDocBuilder::new(GrovedocConfig::default());
        let mut diagnostics = Diagnostics::new();
        let outcome = builder
            .process_source("pkg/a/package.html", PACKAGE_HTML, &mut diagnostics)
            .unwrap();
        assert_eq!(outcome, FileOutcome::Description);
        assert!(builder.root().package_named("pkg/a").unwrap().is_empty());

        builder
            .process_source("pkg/a/Foo.java", FOO_JAVA, &mut diagnostics)
            .unwrap();
        let root = builder.root_doc();
        let package = root.package_named("pkg/a").unwrap();
        assert_eq!(package.description(), "Shared things for both languages.");
        assert_eq!(package.class_names().collect::<Vec<_>>(), vec!["Foo"]);
    }

    #[test]
    fn later_definition_wins_in_both_indices() {
        let mut builder = RootDocBuilder::new(GrovedocConfig::default());
        let mut diagnostics = Diagnostics::new();
        builder
            .process_source("pkg/a/One.groovy", "class A { int first }\n", &mut diagnostics)
            .unwrap();
        builder
            .process_source("pkg/a/Two.groovy", "class A { int second }\n", &mut diagnostics)
            .unwrap();

        let root = builder.into_root_doc();
        assert!(diagnostics.is_empty());
        assert_eq!(root.class_count(), 1);
        let flat = root.class_named("pkg.a.A").unwrap();
        assert_eq!(flat.source_file, "pkg/a/Two.groovy");
        let id = root.package_named("pkg/a").unwrap().class_id("A").unwrap();
        assert_eq!(Some(id), root.class_id("pkg.a.A"));
        assert_eq!(root.class(id).unwrap().source_file, "pkg/a/Two.groovy");
    }

    #[test]
    fn keep_first_collision_policy_reports() {
        let config = GrovedocConfig {
            collision_policy: CollisionPolicy::KeepFirst,
            ..GrovedocConfig::default()
        };
        let mut builder = RootDocBuilder::new(config);
        let mut diagnostics = Diagnostics::new();
        builder
            .process_source("pkg/a/One.groovy", "class A {}\n", &mut diagnostics)
            .unwrap();
        builder
            .process_source("pkg/a/Two.groovy", "class A {}\n", &mut diagnostics)
            .unwrap();

        let root = builder.into_root_doc();
        assert_eq!(root.class_named("pkg.a.A").unwrap().source_file, "pkg/a/One.groovy");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.entries()[0].category,
            DiagnosticCategory::ClassCollision
        );
    }

    #[test]
    fn resolve_twice_is_resolve_once() {
        let dir = project();
        let mut builder = RootDocBuilder::new(settings(vec![dir.path().join("src")]));
        let mut diagnostics = Diagnostics::new();
        builder
            .build_tree(&["pkg/a/Foo.java", "pkg/a/Bar.groovy"], &mut diagnostics)
            .unwrap();

        let first = builder.resolve();
        let snapshot: Vec<_> = builder.root().classes().map(|(_, c)| c.clone()).collect();
        let second = builder.resolve();
        let again: Vec<_> = builder.root().classes().map(|(_, c)| c.clone()).collect();
        assert_eq!(first, second);
        assert_eq!(snapshot, again);
        assert_eq!(builder.root().state(), BuildState::Resolved);
    }
}

mod search_policies {
    use super::*;

    fn two_roots() -> (TempDir, Vec<PathBuf>) {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        write(&first, "pkg/A.groovy", "/** First copy. */\nclass A {}\n");
        write(&second, "pkg/A.groovy", "/** Second copy. */\nclass A {}\n");
        write(&second, "pkg/B.groovy", "class B {}\n");
        (dir, vec![first, second])
    }

    fn with_policy(roots: Vec<PathBuf>, policy: SearchPolicy) -> GrovedocConfig {
        GrovedocConfig {
            search_policy: policy,
            ..settings(roots)
        }
    }

    #[test]
    fn first_match_reads_earliest_root() {
        let (_dir, roots) = two_roots();
        let (root, diagnostics) = build(
            with_policy(roots, SearchPolicy::FirstMatch),
            &["pkg/A.groovy", "pkg/B.groovy"],
        );
        assert!(diagnostics.is_empty());
        let a = root.class_named("pkg.A").unwrap();
        assert_eq!(a.comment.first_sentence, "First copy.");
        assert!(root.class_named("pkg.B").is_some());
    }

    #[test]
    fn last_match_lets_later_root_win() {
        let (_dir, roots) = two_roots();
        let (root, diagnostics) =
            build(with_policy(roots, SearchPolicy::LastMatch), &["pkg/A.groovy"]);
        assert!(diagnostics.is_empty());
        let a = root.class_named("pkg.A").unwrap();
        assert_eq!(a.comment.first_sentence, "Second copy.");
        assert_eq!(root.class_count(), 1);
    }

    #[test]
    fn error_policy_skips_ambiguous_names() {
        let (_dir, roots) = two_roots();
        let (root, diagnostics) = build(
            with_policy(roots, SearchPolicy::Error),
            &["pkg/A.groovy", "pkg/B.groovy"],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.entries()[0].category,
            DiagnosticCategory::AmbiguousSource
        );
        assert!(root.class_named("pkg.A").is_none());
        assert!(root.class_named("pkg.B").is_some());
    }
}
