//! The class model: source units, class and member descriptors, and
//! lazily-resolved type references.
//!
//! ## Ownership
//!
//! ```text
//! SourceSet ──owns──▶ SourceUnit ──owns──▶ ClassDescriptor ──owns──▶ members
//!                          ▲                    │  │
//!                          └──── SourceId ──────┘  └── ClassId (enclosing / nested)
//! ```
//!
//! Back-references are ids, never pointers. A [`TypeRef`] remembers the
//! [`SourceId`](crate::base::SourceId) it was written in and asks a
//! [`ClassLookup`] for that unit when it is first resolved.

mod builder;
mod class;
mod ids;
mod member;
mod modifiers;
mod resolve;
mod source;
mod source_set;
mod type_ref;

pub use builder::{ModelBuilder, parse_reader, parse_unit};
pub use class::{ClassDescriptor, ClassOrigin, OBJECT, TypeSite};
pub use ids::{ClassId, LocalClassId};
pub use member::{Annotation, FieldDescriptor, MethodDescriptor, Parameter, TypeParameter};
pub use modifiers::Modifiers;
pub use resolve::{ClassLookup, ImportVisibility, Resolver};
pub use source::{Import, SourceUnit};
pub use source_set::{Registered, SourceSet};
pub use type_ref::{TypeArgument, TypeOrigin, TypeRef};

pub use crate::parser::{ClassKind, WildcardBound};
