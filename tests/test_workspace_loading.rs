//! Loading source trees from disk into a workspace.

use std::fs;
use std::path::Path;

use rstest::rstest;
use tempfile::TempDir;
use jdox::project::{Severity, Workspace, WorkspaceOptions, codes};

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn sample_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "com/acme/shapes/Shape.java",
        "package com.acme.shapes;\n\n/** Anything with an area. */\npublic interface Shape { double area(); }\n",
    );
    write(
        dir.path(),
        "com/acme/shapes/Circle.java",
        "package com.acme.shapes;\n\npublic class Circle implements Shape {\n    private final double radius;\n    public Circle(double radius) { this.radius = radius; }\n    public double area() { return Math.PI * radius * radius; }\n}\n",
    );
    write(
        dir.path(),
        "com/acme/app/Main.java",
        "package com.acme.app;\n\nimport com.acme.shapes.*;\n\nclass Main { Shape shape; }\n",
    );
    write(dir.path(), "README.md", "not source");
    dir
}

#[rstest]
#[case::parallel(true)]
#[case::sequential(false)]
fn test_load_tree(#[case] parallel: bool) {
    let dir = sample_tree();
    let ws = Workspace::new(WorkspaceOptions::new().with_parallel(parallel));
    let report = ws.add_source_tree(dir.path()).unwrap();

    assert_eq!(report.files, 3);
    assert_eq!(report.units.len(), 3);
    assert!(report.is_clean());
    assert_eq!(ws.packages(), vec!["com.acme.app", "com.acme.shapes"]);

    let circle = ws.class("com.acme.shapes.Circle").unwrap();
    assert_eq!(ws.resolve(&circle.interfaces[0]), "com.acme.shapes.Shape");
    let shape = ws.class("com.acme.shapes.Shape").unwrap();
    assert_eq!(shape.doc.as_deref(), Some("Anything with an area."));

    let main = ws.class("com.acme.app.Main").unwrap();
    assert_eq!(ws.resolve(&main.fields[0].ty), "com.acme.shapes.Shape");
    assert!(ws.library().is_a(&circle, "com.acme.shapes.Shape"));
}

#[test]
fn test_units_registered_in_path_order() {
    let dir = sample_tree();
    let ws = Workspace::default();
    let report = ws.add_source_tree(dir.path()).unwrap();
    let paths: Vec<_> = report
        .units
        .iter()
        .map(|u| u.path().strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        paths,
        vec![
            Path::new("com/acme/app/Main.java"),
            Path::new("com/acme/shapes/Circle.java"),
            Path::new("com/acme/shapes/Shape.java"),
        ]
    );
}

#[test]
fn test_broken_file_becomes_diagnostic() {
    let dir = sample_tree();
    write(dir.path(), "com/acme/Broken.java", "package com.acme;\nclass Broken {\n  int ;\n}\n");
    let ws = Workspace::default();
    let report = ws.add_source_tree(dir.path()).unwrap();

    assert_eq!(report.files, 4);
    assert_eq!(report.units.len(), 3);
    assert_eq!(report.diagnostics.len(), 1);
    let diag = &report.diagnostics[0];
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.code.as_deref(), Some(codes::PARSE_ERROR));
    assert_eq!(diag.line, 3);
    assert!(diag.path.ends_with("com/acme/Broken.java"));
    assert!(ws.class("com.acme.shapes.Circle").is_some());
}

#[test]
fn test_broken_file_aborts_when_not_continuing() {
    let dir = sample_tree();
    write(dir.path(), "com/acme/Broken.java", "class Broken { String s = \"open; }");
    let ws = Workspace::new(WorkspaceOptions::new().with_continue_on_error(false));
    assert!(ws.add_source_tree(dir.path()).is_err());
}

#[test]
fn test_duplicate_class_warns_and_keeps_first() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a/Dup.java", "package p; class Dup { int first; }");
    write(dir.path(), "b/Dup.java", "package p; class Dup { int second; }");
    let ws = Workspace::default();
    let report = ws.add_source_tree(dir.path()).unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].code.as_deref(), Some(codes::DUPLICATE_CLASS));
    assert_eq!(report.diagnostics[0].severity, Severity::Warning);
    assert!(ws.class("p.Dup").unwrap().field("first").is_some());
    assert_eq!(ws.classes().len(), 1);
}

#[test]
fn test_source_roots_load_on_demand() {
    let dir = sample_tree();
    let ws = Workspace::new(WorkspaceOptions::new().with_source_root(dir.path()));
    ws.add_source(
        "Client.java",
        "package client; import com.acme.shapes.Circle; class Client extends Circle {}",
    )
    .unwrap();
    assert_eq!(ws.sources().len(), 1);

    let client = ws.class("client.Client").unwrap();
    let parent = ws.library().superclass_of(&client).unwrap();
    assert_eq!(parent.fqn, "com.acme.shapes.Circle");
    assert!(parent.constructor(&["double"], ws.library()).is_some());
    assert!(ws.sources().len() > 1);
}

#[test]
fn test_add_source_file_reports_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::default();
    let err = ws.add_source_file(dir.path().join("Nope.java")).unwrap_err();
    assert!(matches!(err, jdox::Error::Io { .. }));
}

#[test]
fn test_check_reports_unresolved_types() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "p/C.java", "package p;\nclass C { Unknown u; String s; }\n");
    let ws = Workspace::default();
    ws.add_source_tree(dir.path()).unwrap();

    let diagnostics = ws.check();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::UNRESOLVED_TYPE));
    assert!(diagnostics[0].message.contains("Unknown"));
}
