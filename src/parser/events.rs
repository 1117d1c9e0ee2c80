//! Build events: the seam between the grammar and whatever consumes it.
//!
//! The parser never allocates model entities. It reports what it saw through
//! [`Builder`], carrying raw type syntax ([`TypeSyntax`]) that the consumer is
//! free to interpret. [`EventLog`] is a consumer that just records events.

use std::fmt;

use smol_str::SmolStr;

/// The flavour of a type declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    /// `@interface`
    Annotation,
    Record,
}

impl ClassKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Annotation => "@interface",
            ClassKind::Record => "record",
        }
    }

    pub fn is_interface(self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::Annotation)
    }
}

/// A type as written: `java.util.Map<K, ? extends V>[]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeSyntax {
    /// Dotted name; for `Outer<A>.Inner<B>` this is `Outer.Inner`.
    pub name: SmolStr,
    /// Type arguments of the last segment.
    pub arguments: Vec<TypeArgSyntax>,
    pub dimensions: u32,
}

impl TypeSyntax {
    pub fn simple(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            dimensions: 0,
        }
    }

    pub fn with_dimensions(mut self, extra: u32) -> Self {
        self.dimensions += extra;
        self
    }
}

impl fmt::Display for TypeSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                match arg {
                    TypeArgSyntax::Type(ty) => write!(f, "{ty}")?,
                    TypeArgSyntax::Wildcard(None) => f.write_str("?")?,
                    TypeArgSyntax::Wildcard(Some((WildcardBound::Extends, ty))) => {
                        write!(f, "? extends {ty}")?
                    }
                    TypeArgSyntax::Wildcard(Some((WildcardBound::Super, ty))) => {
                        write!(f, "? super {ty}")?
                    }
                }
            }
            f.write_str(">")?;
        }
        for _ in 0..self.dimensions {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Extends,
    Super,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeArgSyntax {
    Type(TypeSyntax),
    Wildcard(Option<(WildcardBound, TypeSyntax)>),
}

/// `<T extends A & B>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamSyntax {
    pub name: SmolStr,
    pub bounds: Vec<TypeSyntax>,
}

/// `@Name(args)`; arguments are kept as raw text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationSyntax {
    pub name: SmolStr,
    pub arguments: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageDecl {
    pub name: SmolStr,
    pub annotations: Vec<AnnotationSyntax>,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    /// Imported name without the trailing `.*`.
    pub name: SmolStr,
    pub is_static: bool,
    pub is_wildcard: bool,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDecl {
    pub kind: ClassKind,
    pub name: SmolStr,
    pub modifiers: Vec<SmolStr>,
    pub annotations: Vec<AnnotationSyntax>,
    pub type_params: Vec<TypeParamSyntax>,
    /// For interfaces these are the extended interfaces.
    pub extends: Vec<TypeSyntax>,
    pub implements: Vec<TypeSyntax>,
    pub permits: Vec<TypeSyntax>,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: SmolStr,
    pub modifiers: Vec<SmolStr>,
    pub annotations: Vec<AnnotationSyntax>,
    pub ty: TypeSyntax,
    pub initializer: Option<String>,
    pub enum_constant: bool,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamSyntax {
    pub name: Option<SmolStr>,
    pub ty: TypeSyntax,
    pub modifiers: Vec<SmolStr>,
    pub annotations: Vec<AnnotationSyntax>,
    pub varargs: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: SmolStr,
    pub modifiers: Vec<SmolStr>,
    pub annotations: Vec<AnnotationSyntax>,
    pub type_params: Vec<TypeParamSyntax>,
    /// `None` for constructors.
    pub return_type: Option<TypeSyntax>,
    pub params: Vec<ParamSyntax>,
    pub exceptions: Vec<TypeSyntax>,
    /// Raw body text between the braces.
    pub body: Option<String>,
    /// Annotation member `default` value, raw.
    pub default_value: Option<String>,
    pub line: u32,
}

impl MethodDecl {
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }
}

/// Which declaration a documentation comment precedes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocTarget {
    Package,
    Class(SmolStr),
    Field(SmolStr),
    Method(SmolStr),
    Constructor(SmolStr),
}

/// Receiver of build events, in source order.
///
/// A documentation comment is reported immediately before the begin event of
/// the declaration it belongs to.
pub trait Builder {
    fn begin_source(&mut self);
    fn package(&mut self, decl: PackageDecl);
    fn import(&mut self, decl: ImportDecl);
    fn doc_comment(&mut self, text: &str, target: DocTarget);
    fn begin_class(&mut self, decl: ClassDecl);
    fn end_class(&mut self);
    fn begin_field(&mut self, decl: FieldDecl);
    fn end_field(&mut self);
    fn begin_method(&mut self, decl: MethodDecl);
    fn end_method(&mut self);
    fn end_source(&mut self);
}

/// One recorded build event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    BeginSource,
    Package(PackageDecl),
    Import(ImportDecl),
    DocComment { text: String, target: DocTarget },
    BeginClass(ClassDecl),
    EndClass,
    BeginField(FieldDecl),
    EndField,
    BeginMethod(MethodDecl),
    EndMethod,
    EndSource,
}

/// A [`Builder`] that records every event; handy for grammar tests.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.events.iter().filter_map(|e| match e {
            Event::BeginClass(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.events.iter().filter_map(|e| match e {
            Event::BeginField(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.events.iter().filter_map(|e| match e {
            Event::BeginMethod(decl) => Some(decl),
            _ => None,
        })
    }
}

impl Builder for EventLog {
    fn begin_source(&mut self) {
        self.events.push(Event::BeginSource);
    }

    fn package(&mut self, decl: PackageDecl) {
        self.events.push(Event::Package(decl));
    }

    fn import(&mut self, decl: ImportDecl) {
        self.events.push(Event::Import(decl));
    }

    fn doc_comment(&mut self, text: &str, target: DocTarget) {
        self.events.push(Event::DocComment {
            text: text.to_string(),
            target,
        });
    }

    fn begin_class(&mut self, decl: ClassDecl) {
        self.events.push(Event::BeginClass(decl));
    }

    fn end_class(&mut self) {
        self.events.push(Event::EndClass);
    }

    fn begin_field(&mut self, decl: FieldDecl) {
        self.events.push(Event::BeginField(decl));
    }

    fn end_field(&mut self) {
        self.events.push(Event::EndField);
    }

    fn begin_method(&mut self, decl: MethodDecl) {
        self.events.push(Event::BeginMethod(decl));
    }

    fn end_method(&mut self) {
        self.events.push(Event::EndMethod);
    }

    fn end_source(&mut self) {
        self.events.push(Event::EndSource);
    }
}
