//! Helpers for dotted Java names.

/// Check that `name` is a syntactically valid identifier.
///
/// Java also allows `$` anywhere and `_` as a start character.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '$' || c == '_' || unicode_ident::is_xid_start(c) => {}
        _ => return false,
    }
    chars.all(|c| c == '$' || unicode_ident::is_xid_continue(c))
}

/// Check that `name` is a dot-separated sequence of identifiers.
pub fn is_qualified_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_identifier)
}

/// "a.b.C" -> "C"; "C" -> "C".
pub fn simple_name(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, simple)| simple)
}

/// "a.b.C" -> Some("a.b"); "C" -> None.
pub fn qualifier(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(qualifier, _)| qualifier)
}

/// Guess the package of a fully-qualified class name by convention: the
/// leading segments before the first capitalised one.
///
/// "java.util.Map.Entry" -> Some("java.util"); "Foo" -> None.
pub fn package_of(name: &str) -> Option<&str> {
    let mut end = None;
    let mut offset = 0;
    for segment in name.split('.') {
        if segment.starts_with(|c: char| c.is_uppercase()) {
            break;
        }
        end = Some(offset + segment.len());
        offset += segment.len() + 1;
    }
    match end {
        // The whole name is lowercase: treat the last segment as the class.
        Some(end) if end == name.len() => qualifier(name),
        Some(end) => Some(&name[..end]),
        None => None,
    }
}

/// Join a package (or enclosing class name) and a simple name.
pub fn join(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}.{name}"),
        _ => name.to_string(),
    }
}

/// Split trailing `[]` pairs off a type string: "int[][]" -> ("int", 2).
pub fn split_dimensions(type_name: &str) -> (&str, u32) {
    let mut base = type_name.trim();
    let mut dims = 0;
    while let Some(stripped) = base.strip_suffix("[]") {
        base = stripped.trim_end();
        dims += 1;
    }
    (base, dims)
}

/// Primitive type keywords, plus `void`.
pub const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("Foo"));
        assert!(is_identifier("$proxy1"));
        assert!(is_identifier("_x"));
        assert!(is_identifier("Größe"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }

    #[test]
    fn test_qualified_names() {
        assert!(is_qualified_name("java.util.Map.Entry"));
        assert!(is_qualified_name("Foo"));
        assert!(!is_qualified_name("java..util"));
        assert!(!is_qualified_name("java.util."));
        assert!(!is_qualified_name(""));
    }

    #[test]
    fn test_name_parts() {
        assert_eq!(simple_name("a.b.C"), "C");
        assert_eq!(qualifier("a.b.C"), Some("a.b"));
        assert_eq!(qualifier("C"), None);
        assert_eq!(join(Some("a.b"), "C"), "a.b.C");
        assert_eq!(join(None, "C"), "C");
        assert_eq!(join(Some(""), "C"), "C");
    }

    #[test]
    fn test_package_of() {
        assert_eq!(package_of("java.util.Map.Entry"), Some("java.util"));
        assert_eq!(package_of("Foo"), None);
        assert_eq!(package_of("Outer.Inner"), None);
        assert_eq!(package_of("a.b.c"), Some("a.b"));
    }

    #[test]
    fn test_split_dimensions() {
        assert_eq!(split_dimensions("int[][]"), ("int", 2));
        assert_eq!(split_dimensions("java.lang.String"), ("java.lang.String", 0));
        assert_eq!(split_dimensions("byte [] "), ("byte", 1));
    }
}
