//! Field, method and constructor descriptors.

use smol_str::SmolStr;

use super::modifiers::Modifiers;
use super::resolve::ClassLookup;
use super::type_ref::TypeRef;

/// `@Name(args)` on a declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub ty: TypeRef,
    /// Raw text between the parentheses.
    pub arguments: Option<String>,
}

/// A declared type parameter: `T extends Comparable<T>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: SmolStr,
    pub bounds: Vec<TypeRef>,
}

#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub name: SmolStr,
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    /// Raw initializer text; enum constant arguments for enum constants.
    pub initializer: Option<String>,
    pub enum_constant: bool,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub line: u32,
    /// Fully-qualified name of the owning class.
    pub declaring_class: SmolStr,
}

#[derive(Clone, Debug)]
pub struct Parameter {
    /// Absent for members synthesized from a structural registry.
    pub name: Option<SmolStr>,
    pub ty: TypeRef,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub varargs: bool,
}

/// A method or constructor. Constructors have no return type.
#[derive(Clone, Debug)]
pub struct MethodDescriptor {
    pub name: SmolStr,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParameter>,
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<Parameter>,
    pub exceptions: Vec<TypeRef>,
    /// Raw body text; `None` for abstract, native and interface methods.
    pub body: Option<String>,
    /// Annotation member default value, raw.
    pub default_value: Option<String>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub line: u32,
    pub declaring_class: SmolStr,
}

impl MethodDescriptor {
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn is_varargs(&self) -> bool {
        self.parameters.last().is_some_and(|p| p.varargs)
    }

    /// Resolved parameter types, arrays as `[]` and varargs as `...`.
    pub fn parameter_types(&self, lookup: &dyn ClassLookup) -> Vec<String> {
        self.parameters
            .iter()
            .map(|p| {
                let mut ty = p.ty.resolve(lookup).to_string();
                for _ in 0..p.ty.dimensions() {
                    ty.push_str("[]");
                }
                if p.varargs {
                    ty.push_str("...");
                }
                ty
            })
            .collect()
    }

    /// `name(java.lang.String, int[])`
    pub fn signature(&self, lookup: &dyn ClassLookup) -> String {
        format!("{}({})", self.name, self.parameter_types(lookup).join(", "))
    }

    /// Match by name and resolved parameter types.
    pub fn has_signature(&self, name: &str, parameter_types: &[&str], lookup: &dyn ClassLookup) -> bool {
        self.name == name
            && self.parameters.len() == parameter_types.len()
            && self
                .parameter_types(lookup)
                .iter()
                .zip(parameter_types)
                .all(|(actual, expected)| actual == expected)
    }
}
