//! Assembles a [`SourceUnit`] from parser events.

use std::io::Read;
use std::path::PathBuf;

use smol_str::SmolStr;
use tracing::debug;

use super::class::{ClassDescriptor, ClassOrigin};
use super::ids::{ClassId, LocalClassId};
use super::member::{Annotation, FieldDescriptor, MethodDescriptor, Parameter, TypeParameter};
use super::modifiers::Modifiers;
use super::source::{Import, SourceUnit, SourceUnitParts};
use super::type_ref::{TypeArgument, TypeRef};
use crate::base::{SourceId, names};
use crate::error::{Error, Result};
use crate::parser::{
    self, AnnotationSyntax, Builder, ClassDecl, ClassKind, DocTarget, FieldDecl, ImportDecl,
    MethodDecl, PackageDecl, ParamSyntax, TypeArgSyntax, TypeParamSyntax, TypeSyntax,
};

/// Parse `text` into a source unit registered under `id`.
pub fn parse_unit(id: SourceId, path: impl Into<PathBuf>, text: &str) -> Result<SourceUnit> {
    let path = path.into();
    debug!(%id, path = %path.display(), "parsing source unit");
    let mut builder = ModelBuilder::new(id, path);
    parser::parse(text, &mut builder)?;
    let unit = builder.finish();
    debug!(
        %id,
        package = unit.package().unwrap_or(""),
        classes = unit.classes().len(),
        "parsed source unit"
    );
    Ok(unit)
}

/// Read `reader` to the end as UTF-8, then parse it.
pub fn parse_reader(id: SourceId, path: impl Into<PathBuf>, mut reader: impl Read) -> Result<SourceUnit> {
    let path = path.into();
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(&path, e))?;
    parse_unit(id, path, &text)
}

/// [`Builder`] that materializes descriptors.
///
/// Keeps a stack of open classes mirroring the begin/end events. Every type
/// written in source becomes a [`TypeRef`] bound to this unit and the
/// innermost open class; nothing is resolved while building, so forward
/// references and inheritance cycles never get in the way.
#[derive(Debug)]
pub struct ModelBuilder {
    id: SourceId,
    path: PathBuf,
    parts: SourceUnitParts,
    /// Open classes, innermost last.
    stack: Vec<LocalClassId>,
    /// Type parameter names in scope, one frame per open class or method.
    type_scopes: Vec<Vec<SmolStr>>,
    pending_doc: Option<(String, DocTarget)>,
}

impl ModelBuilder {
    pub fn new(id: SourceId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
            parts: SourceUnitParts::default(),
            stack: Vec::new(),
            type_scopes: Vec::new(),
            pending_doc: None,
        }
    }

    pub fn finish(self) -> SourceUnit {
        SourceUnit::new(self.id, self.path, self.parts)
    }

    fn current(&self) -> Option<ClassId> {
        self.stack.last().map(|local| ClassId::new(self.id, *local))
    }

    fn current_mut(&mut self) -> Option<&mut ClassDescriptor> {
        let local = self.stack.last()?;
        self.parts.classes.get_mut(local.index() as usize)
    }

    fn take_doc(&mut self, target: &DocTarget) -> Option<String> {
        match self.pending_doc.take() {
            Some((text, pending)) if &pending == target => Some(text),
            _ => None,
        }
    }

    fn is_type_variable(&self, name: &str) -> bool {
        self.type_scopes
            .iter()
            .rev()
            .any(|scope| scope.iter().any(|p| p == name))
    }

    fn type_ref(&self, syntax: &TypeSyntax) -> TypeRef {
        let name = syntax.name.clone();
        let base = if names::is_primitive(&name) {
            TypeRef::qualified(name)
        } else if self.is_type_variable(&name) {
            TypeRef::variable(name)
        } else {
            TypeRef::in_context(name, self.id, self.current())
        };
        let arguments = syntax
            .arguments
            .iter()
            .map(|arg| match arg {
                TypeArgSyntax::Type(ty) => TypeArgument::Type(self.type_ref(ty)),
                TypeArgSyntax::Wildcard(bound) => TypeArgument::Wildcard {
                    bound: bound
                        .as_ref()
                        .map(|(kind, ty)| (*kind, self.type_ref(ty))),
                },
            })
            .collect();
        base.with_dimensions(syntax.dimensions).with_arguments(arguments)
    }

    fn type_refs(&self, syntax: &[TypeSyntax]) -> Vec<TypeRef> {
        syntax.iter().map(|ty| self.type_ref(ty)).collect()
    }

    fn annotations(&self, syntax: Vec<AnnotationSyntax>) -> Vec<Annotation> {
        syntax
            .into_iter()
            .map(|a| Annotation {
                ty: self.type_ref(&TypeSyntax::simple(a.name)),
                arguments: a.arguments,
            })
            .collect()
    }

    fn type_params(&self, syntax: &[TypeParamSyntax]) -> Vec<TypeParameter> {
        syntax
            .iter()
            .map(|p| TypeParameter {
                name: p.name.clone(),
                bounds: self.type_refs(&p.bounds),
            })
            .collect()
    }

    fn parameter(&self, syntax: ParamSyntax) -> Parameter {
        Parameter {
            ty: self.type_ref(&syntax.ty),
            name: syntax.name,
            modifiers: Modifiers::from_keywords(&syntax.modifiers),
            annotations: self.annotations(syntax.annotations),
            varargs: syntax.varargs,
        }
    }
}

impl Builder for ModelBuilder {
    fn begin_source(&mut self) {}

    fn package(&mut self, decl: PackageDecl) {
        self.parts.package_doc = self.take_doc(&DocTarget::Package);
        self.parts.package_annotations = self.annotations(decl.annotations);
        self.parts.package = Some(decl.name);
    }

    fn import(&mut self, decl: ImportDecl) {
        self.parts.imports.push(Import {
            name: decl.name,
            is_static: decl.is_static,
            is_wildcard: decl.is_wildcard,
            line: decl.line,
        });
    }

    fn doc_comment(&mut self, text: &str, target: DocTarget) {
        self.pending_doc = Some((text.to_string(), target));
    }

    fn begin_class(&mut self, decl: ClassDecl) {
        let local = LocalClassId::new(self.parts.classes.len() as u32);
        let id = ClassId::new(self.id, local);
        let enclosing = self.current();
        let fqn: SmolStr = match enclosing.and_then(|e| self.parts.classes.get(e.local.index() as usize)) {
            Some(outer) => format!("{}.{}", outer.fqn, decl.name).into(),
            None => names::join(self.parts.package.as_deref(), &decl.name).into(),
        };
        let doc = self.take_doc(&DocTarget::Class(decl.name.clone()));

        // The class is open while its header types are converted, so its
        // own type parameters and nested classes are in scope.
        self.stack.push(local);
        self.type_scopes
            .push(decl.type_params.iter().map(|p| p.name.clone()).collect());

        let (superclass, mut interfaces) = if decl.kind == ClassKind::Interface {
            (None, self.type_refs(&decl.extends))
        } else {
            (decl.extends.first().map(|ty| self.type_ref(ty)), Vec::new())
        };
        interfaces.extend(self.type_refs(&decl.implements));

        let class = ClassDescriptor {
            fqn,
            package: self.parts.package.clone(),
            kind: decl.kind,
            modifiers: Modifiers::from_keywords(&decl.modifiers),
            type_params: self.type_params(&decl.type_params),
            superclass,
            interfaces,
            permits: self.type_refs(&decl.permits),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            nested: Vec::new(),
            enclosing,
            annotations: self.annotations(decl.annotations),
            doc,
            line: decl.line,
            origin: ClassOrigin::Source(id),
            name: decl.name,
        };
        self.parts.classes.push(class);

        match enclosing.and_then(|e| self.parts.classes.get_mut(e.local.index() as usize)) {
            Some(outer) => outer.nested.push(id),
            None => self.parts.top_level.push(id),
        }
    }

    fn end_class(&mut self) {
        self.stack.pop();
        self.type_scopes.pop();
    }

    fn begin_field(&mut self, decl: FieldDecl) {
        let doc = self.take_doc(&DocTarget::Field(decl.name.clone()));
        let ty = self.type_ref(&decl.ty);
        let annotations = self.annotations(decl.annotations);
        let Some(class) = self.current_mut() else { return };
        let field = FieldDescriptor {
            name: decl.name,
            modifiers: Modifiers::from_keywords(&decl.modifiers),
            ty,
            initializer: decl.initializer,
            enum_constant: decl.enum_constant,
            annotations,
            doc,
            line: decl.line,
            declaring_class: class.fqn.clone(),
        };
        class.fields.push(field);
    }

    fn end_field(&mut self) {}

    fn begin_method(&mut self, decl: MethodDecl) {
        let target = if decl.is_constructor() {
            DocTarget::Constructor(decl.name.clone())
        } else {
            DocTarget::Method(decl.name.clone())
        };
        let doc = self.take_doc(&target);

        self.type_scopes
            .push(decl.type_params.iter().map(|p| p.name.clone()).collect());
        let type_params = self.type_params(&decl.type_params);
        let return_type = decl.return_type.as_ref().map(|ty| self.type_ref(ty));
        let parameters = decl.params.into_iter().map(|p| self.parameter(p)).collect();
        let exceptions = self.type_refs(&decl.exceptions);
        let annotations = self.annotations(decl.annotations);
        self.type_scopes.pop();

        let Some(class) = self.current_mut() else { return };
        let method = MethodDescriptor {
            name: decl.name,
            modifiers: Modifiers::from_keywords(&decl.modifiers),
            type_params,
            return_type,
            parameters,
            exceptions,
            body: decl.body,
            default_value: decl.default_value,
            annotations,
            doc,
            line: decl.line,
            declaring_class: class.fqn.clone(),
        };
        if method.is_constructor() {
            class.constructors.push(method);
        } else {
            class.methods.push(method);
        }
    }

    fn end_method(&mut self) {}

    fn end_source(&mut self) {
        self.pending_doc = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(text: &str) -> SourceUnit {
        parse_unit(SourceId::new(0), "Test.java", text).unwrap()
    }

    #[test]
    fn test_qualified_names_follow_nesting() {
        let unit = unit("package a.b; class Outer { class Mid { enum Deep {} } } interface Other {}");
        let fqns: Vec<_> = unit.classes().iter().map(|c| c.fqn.as_str()).collect();
        assert_eq!(fqns, vec!["a.b.Outer", "a.b.Outer.Mid", "a.b.Outer.Mid.Deep", "a.b.Other"]);
        assert_eq!(unit.top_level_classes().count(), 2);

        let mid = &unit.classes()[1];
        assert_eq!(mid.enclosing, unit.classes()[0].id());
        assert_eq!(unit.classes()[0].nested, vec![mid.id().unwrap()]);
    }

    #[test]
    fn test_imports_and_package_recorded() {
        let unit = unit("/** Pkg. */ package p; import a.B; import c.*; class C {}");
        assert_eq!(unit.package(), Some("p"));
        assert_eq!(unit.package_doc(), Some("Pkg."));
        assert_eq!(unit.imports().len(), 2);
        assert!(unit.imports()[1].is_wildcard);
    }

    #[test]
    fn test_types_are_not_resolved_while_building() {
        let unit = unit("class C extends Base implements Runnable { Missing m; }");
        let class = &unit.classes()[0];
        assert!(!class.superclass.as_ref().unwrap().is_resolved());
        assert!(!class.fields[0].ty.is_resolved());
        assert_eq!(class.interfaces[0].name(), "Runnable");
    }

    #[test]
    fn test_primitives_and_type_variables() {
        let unit = unit("class Box<T> { T value; int[] counts; <U> U map(T t) { return null; } }");
        let class = &unit.classes()[0];
        assert!(class.fields[0].ty.is_variable());
        assert!(class.fields[1].ty.is_resolved());
        assert_eq!(class.fields[1].ty.dimensions(), 1);
        let method = &class.methods[0];
        assert!(method.return_type.as_ref().unwrap().is_variable());
        assert!(method.parameters[0].ty.is_variable());
        assert_eq!(method.declaring_class, "Box");
    }

    #[test]
    fn test_interface_extends_become_interfaces() {
        let unit = unit("interface I extends A, B {}");
        let class = &unit.classes()[0];
        assert!(class.superclass.is_none());
        assert_eq!(class.interfaces.len(), 2);
    }

    #[test]
    fn test_members_and_docs() {
        let unit = unit(
            "class C {\n  /** The count. */\n  private static int count = 0;\n  /** Makes one. */\n  public C() {}\n  /** Runs. */\n  void run() throws Exception {}\n}",
        );
        let class = &unit.classes()[0];
        let field = class.field("count").unwrap();
        assert_eq!(field.doc.as_deref(), Some("The count."));
        assert_eq!(field.modifiers, Modifiers::PRIVATE | Modifiers::STATIC);
        assert_eq!(field.initializer.as_deref(), Some("0"));
        assert_eq!(field.line, 3);
        assert_eq!(class.constructors[0].doc.as_deref(), Some("Makes one."));
        assert_eq!(class.methods[0].doc.as_deref(), Some("Runs."));
        assert_eq!(class.methods[0].exceptions[0].name(), "Exception");
    }

    #[test]
    fn test_enum_constants_and_record_components() {
        let unit = unit("enum E { A, B(2); } record R(String name) {}");
        let e = &unit.classes()[0];
        assert_eq!(e.enum_constants().count(), 2);
        assert_eq!(e.fields[0].ty.name(), "E");
        let r = &unit.classes()[1];
        assert_eq!(r.fields[0].modifiers, Modifiers::PRIVATE | Modifiers::FINAL);
        assert_eq!(r.constructors[0].parameters.len(), 1);
    }

    #[test]
    fn test_parse_failure_yields_no_unit() {
        let err = parse_unit(SourceId::new(0), "Bad.java", "class {").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_parse_reader_reports_io_errors() {
        struct Closed;
        impl Read for Closed {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
        }
        let err = parse_reader(SourceId::new(0), "Closed.java", Closed).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
