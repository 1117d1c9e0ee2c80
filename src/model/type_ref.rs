//! Deferred-resolution type references.

use std::fmt;
use std::sync::OnceLock;

use smol_str::SmolStr;
use tracing::trace;

use super::ids::ClassId;
use super::resolve::ClassLookup;
use crate::base::SourceId;
use crate::parser::WildcardBound;

/// Where a [`TypeRef`] gets its meaning from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeOrigin {
    /// A name written in source; resolved against the owning unit's
    /// imports and package, starting from `class` for nested lookups.
    Context {
        source: SourceId,
        class: Option<ClassId>,
    },
    /// Already fully qualified: primitives, registry types, stubs.
    Qualified,
    /// A type variable; it resolves to itself.
    Variable,
}

/// One entry of a type argument list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeArgument {
    Type(TypeRef),
    Wildcard {
        bound: Option<(WildcardBound, TypeRef)>,
    },
}

/// A name used at some site (field type, superclass, parameter, ...).
///
/// Resolution is computed on first request and memoized in a single-assignment
/// cell. A failed attempt is not memoized, so a reference can still resolve
/// once the class it names has been loaded.
///
/// Equality compares the current value (resolved or as written) and the
/// array dimensions; identity and origin do not matter.
#[derive(Clone)]
pub struct TypeRef {
    name: SmolStr,
    dimensions: u32,
    arguments: Vec<TypeArgument>,
    origin: TypeOrigin,
    resolved: OnceLock<SmolStr>,
}

impl TypeRef {
    /// A reference that is already fully qualified.
    pub fn qualified(name: impl Into<SmolStr>) -> Self {
        let name = name.into();
        Self {
            resolved: OnceLock::from(name.clone()),
            name,
            dimensions: 0,
            arguments: Vec::new(),
            origin: TypeOrigin::Qualified,
        }
    }

    /// A type variable such as `T`.
    pub fn variable(name: impl Into<SmolStr>) -> Self {
        let name = name.into();
        Self {
            resolved: OnceLock::from(name.clone()),
            name,
            dimensions: 0,
            arguments: Vec::new(),
            origin: TypeOrigin::Variable,
        }
    }

    /// A name as written in `source`, resolved lazily.
    pub fn in_context(name: impl Into<SmolStr>, source: SourceId, class: Option<ClassId>) -> Self {
        Self {
            name: name.into(),
            dimensions: 0,
            arguments: Vec::new(),
            origin: TypeOrigin::Context { source, class },
            resolved: OnceLock::new(),
        }
    }

    pub fn with_dimensions(mut self, dimensions: u32) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_arguments(mut self, arguments: Vec<TypeArgument>) -> Self {
        self.arguments = arguments;
        self
    }

    /// The name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved name if known, else the name as written.
    pub fn value(&self) -> &str {
        self.resolved().unwrap_or(&self.name)
    }

    pub fn resolved(&self) -> Option<&str> {
        self.resolved.get().map(SmolStr::as_str)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    pub fn dimensions(&self) -> u32 {
        self.dimensions
    }

    pub fn is_array(&self) -> bool {
        self.dimensions > 0
    }

    pub fn arguments(&self) -> &[TypeArgument] {
        &self.arguments
    }

    pub fn origin(&self) -> TypeOrigin {
        self.origin
    }

    pub fn is_variable(&self) -> bool {
        self.origin == TypeOrigin::Variable
    }

    /// Resolve to a fully-qualified name, or return the name as written if
    /// nothing matches. The search runs at most once per successful result.
    pub fn resolve(&self, lookup: &dyn ClassLookup) -> &str {
        if let Some(resolved) = self.resolved.get() {
            return resolved;
        }
        let TypeOrigin::Context { source, class } = self.origin else {
            return &self.name;
        };
        let Some(unit) = lookup.source(source) else {
            trace!(name = %self.name, %source, "owning source unit not registered");
            return &self.name;
        };
        match unit.resolve_name(&self.name, class, lookup) {
            Some(fqn) => self.resolved.get_or_init(|| fqn),
            None => &self.name,
        }
    }

    /// Resolve this reference and every type argument, rendering the full
    /// generic form: `java.util.Map<K, java.lang.String>[]`.
    pub fn generic_value(&self, lookup: &dyn ClassLookup) -> String {
        let mut out = String::from(self.resolve(lookup));
        if !self.arguments.is_empty() {
            out.push('<');
            for (i, argument) in self.arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match argument {
                    TypeArgument::Type(ty) => out.push_str(&ty.generic_value(lookup)),
                    TypeArgument::Wildcard { bound: None } => out.push('?'),
                    TypeArgument::Wildcard {
                        bound: Some((bound, ty)),
                    } => {
                        out.push_str(match bound {
                            WildcardBound::Extends => "? extends ",
                            WildcardBound::Super => "? super ",
                        });
                        out.push_str(&ty.generic_value(lookup));
                    }
                }
            }
            out.push('>');
        }
        for _ in 0..self.dimensions {
            out.push_str("[]");
        }
        out
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value() && self.dimensions == other.dimensions
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef")
            .field("name", &self.name)
            .field("resolved", &self.resolved.get())
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())?;
        for _ in 0..self.dimensions {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_is_resolved() {
        let ty = TypeRef::qualified("java.lang.String").with_dimensions(2);
        assert!(ty.is_resolved());
        assert!(ty.is_array());
        assert_eq!(ty.to_string(), "java.lang.String[][]");
    }

    #[test]
    fn test_variable_resolves_to_itself() {
        let ty = TypeRef::variable("T");
        assert!(ty.is_variable());
        assert_eq!(ty.value(), "T");
    }

    #[test]
    fn test_context_reference_starts_unresolved() {
        let ty = TypeRef::in_context("List", SourceId::new(0), None);
        assert!(!ty.is_resolved());
        assert_eq!(ty.value(), "List");
        assert!(!ty.is_array());
    }

    #[test]
    fn test_equality_ignores_origin() {
        let a = TypeRef::qualified("Foo");
        let b = TypeRef::in_context("Foo", SourceId::new(3), None);
        assert_eq!(a, b);
        assert_ne!(a, TypeRef::qualified("Foo").with_dimensions(1));
    }
}
