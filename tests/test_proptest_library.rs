//! Property-based tests for the class library chain and the parser.
//!
//! - the stub fallback answers every syntactically valid qualified name
//! - declared classes are found under exactly the name they were declared with
//! - array dimensions survive parsing and resolution

use std::sync::Arc;

use proptest::prelude::*;
use jdox::library::ClassLibrary;
use jdox::model::{SourceSet, parse_unit};

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

/// Lowercase package segment that is never a Java keyword.
fn arb_package_segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,6}".prop_map(|s| format!("x{s}"))
}

/// Capitalized class name.
fn arb_class_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9_]{0,12}"
}

fn arb_qualified_name() -> impl Strategy<Value = String> {
    (prop::collection::vec(arb_package_segment(), 1..4), arb_class_name())
        .prop_map(|(package, class)| format!("{}.{class}", package.join(".")))
}

fn stub_library() -> ClassLibrary {
    ClassLibrary::builder(Arc::new(SourceSet::new()))
        .append_parsed_sources()
        .append_stub()
        .build()
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn stub_never_misses_valid_names(name in arb_qualified_name()) {
        let lib = stub_library();
        let class = lib.class(&name).expect("stub answers valid names");
        prop_assert!(class.is_stub());
        prop_assert_eq!(class.fqn.as_str(), name.as_str());
        prop_assert!(!lib.has_class(&name));
    }

    #[test]
    fn stub_rejects_names_with_empty_segments(name in arb_qualified_name()) {
        let lib = stub_library();
        let broken = format!("{name}..Tail");
        prop_assert!(lib.class(&broken).is_none());
    }

    #[test]
    fn declared_names_round_trip(
        package in prop::collection::vec(arb_package_segment(), 1..3),
        outer in arb_class_name(),
        inner in arb_class_name(),
    ) {
        prop_assume!(outer != inner);
        let lib = stub_library();
        let package = package.join(".");
        let text = format!("package {package}; class {outer} {{ static class {inner} {{}} }}");
        let sources = lib.sources();
        sources.insert(parse_unit(sources.reserve_id(), "Gen.java", &text).unwrap());

        let outer_fqn = format!("{package}.{outer}");
        let inner_fqn = format!("{outer_fqn}.{inner}");
        prop_assert!(lib.has_class(&outer_fqn));
        prop_assert!(lib.has_class(&inner_fqn));
        let found = lib.class(&inner_fqn).unwrap();
        prop_assert!(!found.is_stub());
        prop_assert_eq!(found.fqn.as_str(), inner_fqn.as_str());
    }

    #[test]
    fn array_dimensions_preserved(dims in 0u32..5) {
        let lib = stub_library();
        let brackets = "[]".repeat(dims as usize);
        let text = format!("package p; class C {{ String{brackets} value; }}");
        let sources = lib.sources();
        let unit = sources.insert(parse_unit(sources.reserve_id(), "C.java", &text).unwrap()).unit;

        let ty = &unit.classes()[0].fields[0].ty;
        prop_assert_eq!(ty.dimensions(), dims);
        prop_assert_eq!(ty.resolve(&lib), "String");
        prop_assert_eq!(ty.dimensions(), dims);
    }
}
