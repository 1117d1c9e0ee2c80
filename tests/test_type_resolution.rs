//! End-to-end type resolution through a class library chain.
//!
//! Each test parses one or more sources into a fresh library and checks the
//! fully-qualified names that `TypeRef::resolve` produces.

use std::sync::Arc;

use once_cell::sync::Lazy;
use rstest::rstest;
use jdox::library::{ClassLibrary, ClassStructure, MemoryRegistry};
use jdox::model::{SourceSet, parse_unit};
use jdox::{ClassDescriptor, Error};

/// `q.R` and a few collection types, shared across tests.
static EXTRA: Lazy<Arc<MemoryRegistry>> = Lazy::new(|| {
    Arc::new(
        MemoryRegistry::new()
            .with(ClassStructure::class("q.R"))
            .with(ClassStructure::interface("java.util.List"))
            .with(ClassStructure::interface("java.util.Map"))
            .with(ClassStructure::class("java.util.ArrayList").implements("java.util.List")),
    )
});

fn library(stub: bool) -> ClassLibrary {
    let builder = ClassLibrary::builder(Arc::new(SourceSet::new()))
        .append_parsed_sources()
        .append_registry(MemoryRegistry::java_lang())
        .append_shared_registry(EXTRA.clone());
    let builder = if stub { builder.append_stub() } else { builder };
    builder.build()
}

fn add(lib: &ClassLibrary, path: &str, text: &str) {
    let sources = lib.sources();
    let unit = parse_unit(sources.reserve_id(), path, text).unwrap();
    sources.insert(unit);
}

fn class(lib: &ClassLibrary, fqn: &str) -> Arc<ClassDescriptor> {
    lib.class(fqn).unwrap_or_else(|| panic!("class {fqn} not found"))
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_explicit_import_superclass() {
    let lib = library(false);
    add(&lib, "p/C.java", "package p; import q.R; class C extends R {}");
    let c = class(&lib, "p.C");
    assert_eq!(c.superclass.as_ref().unwrap().resolve(&lib), "q.R");
}

#[test]
fn test_imported_class_from_source() {
    let lib = ClassLibrary::builder(Arc::new(SourceSet::new()))
        .append_parsed_sources()
        .build();
    add(&lib, "p/C.java", "package p; import q.R; class C extends R {}");
    add(&lib, "q/R.java", "package q; public class R {}");
    let c = class(&lib, "p.C");
    assert_eq!(c.superclass.as_ref().unwrap().resolve(&lib), "q.R");
    assert_eq!(lib.superclass_of(&c).unwrap().fqn, "q.R");
}

#[test]
fn test_forward_reference_across_sources() {
    let lib = library(false);
    add(&lib, "p/A.java", "package p; class A { B partner; }");
    let a = class(&lib, "p.A");
    let partner = &a.fields[0].ty;
    assert!(!partner.is_resolved());

    add(&lib, "p/B.java", "package p; class B { A partner; }");
    assert_eq!(partner.resolve(&lib), "p.B");
    assert_eq!(class(&lib, "p.B").fields[0].ty.resolve(&lib), "p.A");
}

#[test]
fn test_unresolved_without_stub() {
    let lib = library(false);
    add(&lib, "C.java", "package p; class C { Missing m; }");
    let c = class(&lib, "p.C");
    let ty = &c.fields[0].ty;
    assert_eq!(ty.resolve(&lib), "Missing");
    assert!(!ty.is_resolved());
    assert!(lib.class("p.Missing").is_none());
}

#[test]
fn test_stub_does_not_make_names_resolve() {
    let lib = library(true);
    add(&lib, "C.java", "package p; class C { Missing m; }");
    let c = class(&lib, "p.C");
    assert_eq!(c.fields[0].ty.resolve(&lib), "Missing");
    assert!(lib.class("p.Missing").unwrap().is_stub());
}

#[test]
fn test_resolution_is_memoized() {
    let lib = library(false);
    add(&lib, "C.java", "package p; import java.util.*; class C { List<String> names; }");
    let c = class(&lib, "p.C");
    let ty = &c.fields[0].ty;
    let first = ty.resolve(&lib).to_string();
    let before = lib.stats();
    assert_eq!(ty.resolve(&lib), first);
    assert_eq!(ty.resolve(&lib), "java.util.List");
    assert_eq!(lib.stats(), before);
}

#[test]
fn test_array_dimensions_preserved() {
    let lib = library(false);
    add(&lib, "C.java", "package p; class C { String[][] grid; int values[]; }");
    let c = class(&lib, "p.C");
    let grid = &c.fields[0].ty;
    assert_eq!(grid.resolve(&lib), "java.lang.String");
    assert_eq!(grid.dimensions(), 2);
    assert_eq!(grid.generic_value(&lib), "java.lang.String[][]");
    let values = &c.fields[1].ty;
    assert_eq!(values.resolve(&lib), "int");
    assert_eq!(values.dimensions(), 1);
}

#[test]
fn test_generic_value_resolves_arguments() {
    let lib = library(false);
    add(
        &lib,
        "C.java",
        "package p; import java.util.Map; class C<T> { Map<String, ? extends T> index; }",
    );
    let c = class(&lib, "p.C");
    assert_eq!(
        c.fields[0].ty.generic_value(&lib),
        "java.util.Map<java.lang.String, ? extends T>"
    );
}

#[test]
fn test_nested_shadows_imports() {
    let lib = library(false);
    add(
        &lib,
        "Outer.java",
        "package p; import q.*; class Outer { static class R {} R local; q.R remote; }",
    );
    let outer = class(&lib, "p.Outer");
    assert_eq!(outer.fields[0].ty.resolve(&lib), "p.Outer.R");
    assert_eq!(outer.fields[1].ty.resolve(&lib), "q.R");
}

#[test]
fn test_nested_class_fqn_round_trip() {
    let lib = library(false);
    add(&lib, "Outer.java", "package p; class Outer { class Inner { class Deep {} } }");
    for fqn in ["p.Outer", "p.Outer.Inner", "p.Outer.Inner.Deep"] {
        assert_eq!(class(&lib, fqn).fqn, fqn);
    }
    let deep = class(&lib, "p.Outer.Inner.Deep");
    assert_eq!(deep.name, "Deep");
    assert!(deep.is_nested());
}

#[rstest]
#[case::explicit_over_wildcard("import q.*; import z.R;", "z.R")]
#[case::wildcard("import q.*;", "q.R")]
#[case::implicit_package("", "java.lang.String")]
fn test_precedence(#[case] imports: &str, #[case] expected: &str) {
    let lib = library(false);
    let name = expected.rsplit('.').next().unwrap();
    add(&lib, "C.java", &format!("package p; {imports} class C {{ {name} f; }}"));
    let c = class(&lib, "p.C");
    assert_eq!(c.fields[0].ty.resolve(&lib), expected);
}

#[test]
fn test_same_package_beats_wildcard() {
    let lib = library(false);
    add(&lib, "p/R.java", "package p; class R {}");
    add(&lib, "p/C.java", "package p; import q.*; class C { R f; }");
    let c = class(&lib, "p.C");
    assert_eq!(c.fields[0].ty.resolve(&lib), "p.R");
}

#[test]
fn test_method_signature_lookup() {
    let lib = library(false);
    add(
        &lib,
        "C.java",
        "package p; class C { C(int n) {} void put(String key, Object[] values) {} }",
    );
    let c = class(&lib, "p.C");
    assert!(c.method("put", &["java.lang.String", "java.lang.Object[]"], &lib).is_some());
    assert!(c.method("put", &["java.lang.String"], &lib).is_none());
    assert!(c.constructor(&["int"], &lib).is_some());
}

#[test]
fn test_registry_class_members() {
    let lib = library(false);
    let object = class(&lib, "java.lang.Object");
    assert!(object.superclass.is_none());
    assert!(lib.superclass_of(&object).is_none());
    let list = class(&lib, "java.util.ArrayList");
    assert!(lib.is_a(&list, "java.util.List"));
}

#[test]
fn test_unterminated_string_is_lexical_error() {
    let lib = library(false);
    let sources = lib.sources();
    let err = parse_unit(sources.reserve_id(), "Bad.java", "class Bad { String s = \"open; }")
        .unwrap_err();
    match err {
        Error::Lexical(lexical) => {
            assert_eq!(u32::from(lexical.offset), 23);
            assert_eq!(lexical.position.line_one_indexed(), 1);
        }
        other => panic!("expected a lexical error, got {other:?}"),
    }
    assert!(sources.is_empty());
}
