//! Structural registry: class shapes known without source.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::names;
use crate::model::{
    ClassDescriptor, ClassKind, ClassOrigin, FieldDescriptor, MethodDescriptor, Modifiers,
    Parameter, TypeRef,
};

/// Read-only source of class structure, keyed by fully-qualified name.
///
/// Absence from the registry is definitive.
pub trait ClassRegistry: Send + Sync {
    fn structure(&self, name: &str) -> Option<ClassStructure>;
}

/// `name: type` with modifiers. Types are fully qualified, arrays as `[]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSignature {
    pub name: SmolStr,
    pub ty: SmolStr,
    pub modifiers: Modifiers,
}

impl FieldSignature {
    pub fn new(name: impl Into<SmolStr>, ty: impl Into<SmolStr>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers,
        }
    }
}

/// A method or constructor signature. Constructors have no return type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: SmolStr,
    pub return_type: Option<SmolStr>,
    pub parameters: Vec<SmolStr>,
    pub exceptions: Vec<SmolStr>,
    pub modifiers: Modifiers,
}

impl MethodSignature {
    pub fn method(name: impl Into<SmolStr>, return_type: impl Into<SmolStr>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            return_type: Some(return_type.into()),
            parameters: Vec::new(),
            exceptions: Vec::new(),
            modifiers,
        }
    }

    pub fn constructor(modifiers: Modifiers) -> Self {
        Self {
            name: SmolStr::default(),
            return_type: None,
            parameters: Vec::new(),
            exceptions: Vec::new(),
            modifiers,
        }
    }

    pub fn param(mut self, ty: impl Into<SmolStr>) -> Self {
        self.parameters.push(ty.into());
        self
    }

    pub fn throws(mut self, ty: impl Into<SmolStr>) -> Self {
        self.exceptions.push(ty.into());
        self
    }
}

/// Structure of one class as a registry reports it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassStructure {
    pub name: SmolStr,
    pub package: Option<SmolStr>,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub superclass: Option<SmolStr>,
    pub interfaces: Vec<SmolStr>,
    pub fields: Vec<FieldSignature>,
    pub methods: Vec<MethodSignature>,
    pub constructors: Vec<MethodSignature>,
}

impl ClassStructure {
    pub fn new(name: impl Into<SmolStr>, kind: ClassKind) -> Self {
        let name = name.into();
        Self {
            package: names::package_of(&name).map(SmolStr::new),
            name,
            kind,
            modifiers: Modifiers::PUBLIC,
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn class(name: impl Into<SmolStr>) -> Self {
        Self::new(name, ClassKind::Class)
    }

    pub fn interface(name: impl Into<SmolStr>) -> Self {
        Self::new(name, ClassKind::Interface).modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn extends(mut self, superclass: impl Into<SmolStr>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<SmolStr>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn field(mut self, field: FieldSignature) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodSignature) -> Self {
        self.methods.push(method);
        self
    }

    pub fn constructor(mut self, constructor: MethodSignature) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Mirror this structure as a read-only descriptor.
    pub fn to_descriptor(&self) -> ClassDescriptor {
        let mut class = ClassDescriptor::synthetic(self.name.clone(), self.kind, ClassOrigin::Registry);
        class.package = self.package.clone();
        class.modifiers = self.modifiers;
        class.superclass = self.superclass.as_deref().map(qualified_type);
        class.interfaces = self.interfaces.iter().map(|i| qualified_type(i)).collect();
        class.fields = self
            .fields
            .iter()
            .map(|f| FieldDescriptor {
                name: f.name.clone(),
                modifiers: f.modifiers,
                ty: qualified_type(&f.ty),
                initializer: None,
                enum_constant: false,
                annotations: Vec::new(),
                doc: None,
                line: 0,
                declaring_class: self.name.clone(),
            })
            .collect();
        class.methods = self.methods.iter().map(|m| self.member(m)).collect();
        class.constructors = self
            .constructors
            .iter()
            .map(|c| {
                let mut ctor = self.member(c);
                ctor.name = class.name.clone();
                ctor
            })
            .collect();
        class
    }

    fn member(&self, signature: &MethodSignature) -> MethodDescriptor {
        MethodDescriptor {
            name: signature.name.clone(),
            modifiers: signature.modifiers,
            type_params: Vec::new(),
            return_type: signature.return_type.as_deref().map(qualified_type),
            parameters: signature
                .parameters
                .iter()
                .map(|ty| Parameter {
                    name: None,
                    ty: qualified_type(ty),
                    modifiers: Modifiers::empty(),
                    annotations: Vec::new(),
                    varargs: false,
                })
                .collect(),
            exceptions: signature.exceptions.iter().map(|e| qualified_type(e)).collect(),
            body: None,
            default_value: None,
            annotations: Vec::new(),
            doc: None,
            line: 0,
            declaring_class: self.name.clone(),
        }
    }
}

fn qualified_type(text: &str) -> TypeRef {
    let (base, dims) = names::split_dimensions(text);
    TypeRef::qualified(base).with_dimensions(dims)
}

/// In-memory registry in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryRegistry {
    classes: IndexMap<SmolStr, ClassStructure>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, structure: ClassStructure) {
        self.classes.insert(structure.name.clone(), structure);
    }

    pub fn with(mut self, structure: ClassStructure) -> Self {
        self.insert(structure);
        self
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(SmolStr::as_str)
    }

    /// The core `java.lang` types most sources lean on.
    pub fn java_lang() -> Self {
        const PUBLIC: Modifiers = Modifiers::PUBLIC;
        const FINAL: Modifiers = Modifiers::PUBLIC.union(Modifiers::FINAL);
        const ABSTRACT: Modifiers = Modifiers::PUBLIC.union(Modifiers::ABSTRACT);
        const STATIC: Modifiers = Modifiers::PUBLIC.union(Modifiers::STATIC);
        const OBJECT: &str = "java.lang.Object";
        const STRING: &str = "java.lang.String";

        let mut registry = Self::new()
            .with(
                ClassStructure::class(OBJECT)
                    .constructor(MethodSignature::constructor(PUBLIC))
                    .method(MethodSignature::method("equals", "boolean", PUBLIC).param(OBJECT))
                    .method(MethodSignature::method("hashCode", "int", PUBLIC))
                    .method(MethodSignature::method("toString", STRING, PUBLIC))
                    .method(MethodSignature::method("getClass", "java.lang.Class", FINAL)),
            )
            .with(
                ClassStructure::class(STRING)
                    .modifiers(FINAL)
                    .extends(OBJECT)
                    .implements("java.lang.CharSequence")
                    .implements("java.lang.Comparable")
                    .constructor(MethodSignature::constructor(PUBLIC))
                    .method(MethodSignature::method("length", "int", PUBLIC))
                    .method(MethodSignature::method("isEmpty", "boolean", PUBLIC))
                    .method(MethodSignature::method("charAt", "char", PUBLIC).param("int"))
                    .method(
                        MethodSignature::method("substring", STRING, PUBLIC)
                            .param("int")
                            .param("int"),
                    )
                    .method(MethodSignature::method("valueOf", STRING, STATIC).param(OBJECT)),
            )
            .with(ClassStructure::interface("java.lang.CharSequence"))
            .with(ClassStructure::interface("java.lang.Comparable"))
            .with(ClassStructure::interface("java.lang.Iterable"))
            .with(ClassStructure::interface("java.lang.Runnable"))
            .with(ClassStructure::interface("java.lang.AutoCloseable"))
            .with(ClassStructure::interface("java.lang.Cloneable"))
            .with(
                ClassStructure::class("java.lang.Enum")
                    .modifiers(ABSTRACT)
                    .extends(OBJECT)
                    .implements("java.lang.Comparable")
                    .method(MethodSignature::method("name", STRING, FINAL))
                    .method(MethodSignature::method("ordinal", "int", FINAL)),
            )
            .with(ClassStructure::class("java.lang.Record").modifiers(ABSTRACT).extends(OBJECT))
            .with(ClassStructure::class("java.lang.Class").modifiers(FINAL).extends(OBJECT))
            .with(ClassStructure::class("java.lang.Number").modifiers(ABSTRACT).extends(OBJECT))
            .with(ClassStructure::class("java.lang.Math").modifiers(FINAL).extends(OBJECT))
            .with(ClassStructure::class("java.lang.System").modifiers(FINAL).extends(OBJECT))
            .with(ClassStructure::class("java.lang.Thread").extends(OBJECT).implements("java.lang.Runnable"))
            .with(
                ClassStructure::class("java.lang.StringBuilder")
                    .modifiers(FINAL)
                    .extends(OBJECT)
                    .implements("java.lang.CharSequence"),
            )
            .with(ClassStructure::class("java.lang.Void").modifiers(FINAL).extends(OBJECT));

        for boxed in ["Integer", "Long", "Short", "Byte", "Float", "Double"] {
            registry.insert(
                ClassStructure::class(format!("java.lang.{boxed}"))
                    .modifiers(FINAL)
                    .extends("java.lang.Number")
                    .implements("java.lang.Comparable"),
            );
        }
        for boxed in ["Boolean", "Character"] {
            registry.insert(
                ClassStructure::class(format!("java.lang.{boxed}"))
                    .modifiers(FINAL)
                    .extends(OBJECT)
                    .implements("java.lang.Comparable"),
            );
        }

        let throwables = [
            ("java.lang.Throwable", OBJECT),
            ("java.lang.Exception", "java.lang.Throwable"),
            ("java.lang.Error", "java.lang.Throwable"),
            ("java.lang.RuntimeException", "java.lang.Exception"),
            ("java.lang.IllegalArgumentException", "java.lang.RuntimeException"),
            ("java.lang.IllegalStateException", "java.lang.RuntimeException"),
            ("java.lang.NullPointerException", "java.lang.RuntimeException"),
            ("java.lang.UnsupportedOperationException", "java.lang.RuntimeException"),
            ("java.lang.IndexOutOfBoundsException", "java.lang.RuntimeException"),
            ("java.lang.ClassCastException", "java.lang.RuntimeException"),
            ("java.lang.InterruptedException", "java.lang.Exception"),
            ("java.lang.CloneNotSupportedException", "java.lang.Exception"),
        ];
        for (name, parent) in throwables {
            registry.insert(
                ClassStructure::class(name)
                    .extends(parent)
                    .constructor(MethodSignature::constructor(PUBLIC))
                    .constructor(MethodSignature::constructor(PUBLIC).param(STRING))
                    .method(MethodSignature::method("getMessage", STRING, PUBLIC)),
            );
        }

        for annotation in [
            "Override",
            "Deprecated",
            "SuppressWarnings",
            "FunctionalInterface",
            "SafeVarargs",
        ] {
            registry.insert(
                ClassStructure::new(format!("java.lang.{annotation}"), ClassKind::Annotation)
                    .modifiers(ABSTRACT),
            );
        }

        registry
    }
}

impl ClassRegistry for MemoryRegistry {
    fn structure(&self, name: &str) -> Option<ClassStructure> {
        self.classes.get(name).cloned()
    }
}

impl<R: ClassRegistry + ?Sized> ClassRegistry for Arc<R> {
    fn structure(&self, name: &str) -> Option<ClassStructure> {
        (**self).structure(name)
    }
}
