//! Class descriptors.

use smol_str::SmolStr;

use super::ids::ClassId;
use super::member::{Annotation, FieldDescriptor, MethodDescriptor, TypeParameter};
use super::modifiers::Modifiers;
use super::resolve::ClassLookup;
use super::type_ref::TypeRef;
use crate::base::{SourceId, names};
use crate::parser::ClassKind;

pub const OBJECT: &str = "java.lang.Object";

/// Where a descriptor came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassOrigin {
    /// Declared in a parsed source unit.
    Source(ClassId),
    /// Mirrored from a structural registry.
    Registry,
    /// Synthesized for a name nothing else could resolve.
    Stub,
}

/// Structural model of one class, interface, enum, annotation type or record.
///
/// Descriptors are built once and shared behind `Arc`; nothing in here
/// changes afterwards except the memo cells inside its [`TypeRef`]s.
#[derive(Clone, Debug)]
pub struct ClassDescriptor {
    pub name: SmolStr,
    pub fqn: SmolStr,
    pub package: Option<SmolStr>,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParameter>,
    /// Explicit `extends` of a class. Interfaces list theirs in `interfaces`.
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub permits: Vec<TypeRef>,
    pub fields: Vec<FieldDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    pub constructors: Vec<MethodDescriptor>,
    pub nested: Vec<ClassId>,
    pub enclosing: Option<ClassId>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub line: u32,
    pub origin: ClassOrigin,
}

impl ClassDescriptor {
    /// An empty descriptor with the given kind; used by the registry and
    /// stub strategies.
    pub fn synthetic(fqn: impl Into<SmolStr>, kind: ClassKind, origin: ClassOrigin) -> Self {
        let fqn = fqn.into();
        Self {
            name: SmolStr::new(names::simple_name(&fqn)),
            package: names::package_of(&fqn).map(SmolStr::new),
            fqn,
            kind,
            modifiers: Modifiers::empty(),
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            permits: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            nested: Vec::new(),
            enclosing: None,
            annotations: Vec::new(),
            doc: None,
            line: 0,
            origin,
        }
    }

    /// A memberless stand-in for an unknown class.
    pub fn stub(fqn: impl Into<SmolStr>) -> Self {
        Self::synthetic(fqn, ClassKind::Class, ClassOrigin::Stub)
    }

    pub fn id(&self) -> Option<ClassId> {
        match self.origin {
            ClassOrigin::Source(id) => Some(id),
            _ => None,
        }
    }

    /// The source unit that declares this class.
    pub fn source(&self) -> Option<SourceId> {
        self.id().map(|id| id.source)
    }

    pub fn is_stub(&self) -> bool {
        self.origin == ClassOrigin::Stub
    }

    pub fn is_interface(&self) -> bool {
        self.kind.is_interface()
    }

    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    pub fn is_nested(&self) -> bool {
        self.enclosing.is_some()
    }

    /// Superclass implied when none is written.
    pub fn implicit_superclass(&self) -> Option<&'static str> {
        if self.superclass.is_some() || self.is_interface() || self.is_stub() || self.fqn == OBJECT {
            return None;
        }
        Some(match self.kind {
            ClassKind::Enum => "java.lang.Enum",
            ClassKind::Record => "java.lang.Record",
            _ => OBJECT,
        })
    }

    /// The explicit superclass resolved through `lookup`, else the implicit one.
    pub fn effective_superclass(&self, lookup: &dyn ClassLookup) -> Option<SmolStr> {
        match &self.superclass {
            Some(ty) => Some(SmolStr::new(ty.resolve(lookup))),
            None => self.implicit_superclass().map(SmolStr::new_static),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn enum_constants(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.enum_constant)
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodDescriptor> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// Find a method by name and resolved parameter types.
    pub fn method(
        &self,
        name: &str,
        parameter_types: &[&str],
        lookup: &dyn ClassLookup,
    ) -> Option<&MethodDescriptor> {
        self.methods
            .iter()
            .find(|m| m.has_signature(name, parameter_types, lookup))
    }

    pub fn constructor(&self, parameter_types: &[&str], lookup: &dyn ClassLookup) -> Option<&MethodDescriptor> {
        self.constructors
            .iter()
            .find(|c| c.has_signature(&self.name, parameter_types, lookup))
    }

    /// Every type reference the class declares, with the line it sits on,
    /// in declaration order.
    pub fn type_refs(&self) -> Vec<(TypeSite<'_>, u32, &TypeRef)> {
        let mut refs = Vec::new();
        let line = self.line;
        annotation_refs(&mut refs, &self.name, line, &self.annotations);
        bound_refs(&mut refs, line, &self.type_params);
        if let Some(superclass) = &self.superclass {
            refs.push((TypeSite::Superclass, line, superclass));
        }
        refs.extend(self.interfaces.iter().map(|ty| (TypeSite::Interface, line, ty)));
        refs.extend(self.permits.iter().map(|ty| (TypeSite::Permits, line, ty)));
        for field in &self.fields {
            annotation_refs(&mut refs, &field.name, field.line, &field.annotations);
            refs.push((TypeSite::Field(&field.name), field.line, &field.ty));
        }
        for method in self.constructors.iter().chain(&self.methods) {
            let line = method.line;
            annotation_refs(&mut refs, &method.name, line, &method.annotations);
            bound_refs(&mut refs, line, &method.type_params);
            if let Some(ret) = &method.return_type {
                refs.push((TypeSite::Return(&method.name), line, ret));
            }
            for param in &method.parameters {
                let owner = param.name.as_deref().unwrap_or(method.name.as_str());
                annotation_refs(&mut refs, owner, line, &param.annotations);
                refs.push((TypeSite::Parameter(&method.name), line, &param.ty));
            }
            for exception in &method.exceptions {
                refs.push((TypeSite::Exception(&method.name), line, exception));
            }
        }
        refs
    }
}

fn annotation_refs<'a>(
    refs: &mut Vec<(TypeSite<'a>, u32, &'a TypeRef)>,
    owner: &'a str,
    line: u32,
    annotations: &'a [Annotation],
) {
    refs.extend(annotations.iter().map(|a| (TypeSite::Annotation(owner), line, &a.ty)));
}

fn bound_refs<'a>(refs: &mut Vec<(TypeSite<'a>, u32, &'a TypeRef)>, line: u32, params: &'a [TypeParameter]) {
    for param in params {
        refs.extend(param.bounds.iter().map(|ty| (TypeSite::Bound(&param.name), line, ty)));
    }
}

/// Where in a class a [`TypeRef`] appears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeSite<'a> {
    Superclass,
    Interface,
    Permits,
    Field(&'a str),
    Return(&'a str),
    Parameter(&'a str),
    Exception(&'a str),
    /// Bound of the named type parameter.
    Bound(&'a str),
    /// Annotation on the named element.
    Annotation(&'a str),
}

impl std::fmt::Display for TypeSite<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeSite::Superclass => f.write_str("superclass"),
            TypeSite::Interface => f.write_str("interface"),
            TypeSite::Permits => f.write_str("permitted subclass"),
            TypeSite::Field(name) => write!(f, "type of field '{name}'"),
            TypeSite::Return(name) => write!(f, "return type of '{name}'"),
            TypeSite::Parameter(name) => write!(f, "parameter of '{name}'"),
            TypeSite::Exception(name) => write!(f, "exception of '{name}'"),
            TypeSite::Bound(name) => write!(f, "bound of type parameter '{name}'"),
            TypeSite::Annotation(name) => write!(f, "annotation on '{name}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_shape() {
        let stub = ClassDescriptor::stub("com.acme.Widget");
        assert_eq!(stub.name, "Widget");
        assert_eq!(stub.package.as_deref(), Some("com.acme"));
        assert!(stub.is_stub());
        assert!(stub.fields.is_empty() && stub.methods.is_empty());
        assert_eq!(stub.implicit_superclass(), None);
    }

    #[test]
    fn test_implicit_superclass() {
        let enum_ = ClassDescriptor::synthetic("p.Color", ClassKind::Enum, ClassOrigin::Registry);
        assert_eq!(enum_.implicit_superclass(), Some("java.lang.Enum"));
        let record = ClassDescriptor::synthetic("p.Point", ClassKind::Record, ClassOrigin::Registry);
        assert_eq!(record.implicit_superclass(), Some("java.lang.Record"));
        let iface = ClassDescriptor::synthetic("p.Shape", ClassKind::Interface, ClassOrigin::Registry);
        assert_eq!(iface.implicit_superclass(), None);
        let object = ClassDescriptor::synthetic(OBJECT, ClassKind::Class, ClassOrigin::Registry);
        assert_eq!(object.implicit_superclass(), None);
        let plain = ClassDescriptor::synthetic("p.Plain", ClassKind::Class, ClassOrigin::Registry);
        assert_eq!(plain.implicit_superclass(), Some(OBJECT));
    }
}
