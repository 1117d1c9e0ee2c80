//! Declaration parser for Java source.
//!
//! - [`Lexer`] - lazy token stream (logos), fails on the first malformed token
//! - [`parse`] - recursive-descent grammar driving a [`Builder`]
//! - [`EventLog`] - a builder that records events, mostly for tests
//!
//! The parser knows nothing about the class model. The model layer implements
//! [`Builder`] to turn events into descriptors.
//!
//! This module depends only on [`crate::base`].

mod error;
mod events;
mod grammar;
mod lexer;

pub use error::ParseError;
pub use events::{
    AnnotationSyntax, Builder, ClassDecl, ClassKind, DocTarget, Event, EventLog, FieldDecl,
    ImportDecl, MethodDecl, PackageDecl, ParamSyntax, TypeArgSyntax, TypeParamSyntax, TypeSyntax,
    WildcardBound,
};
pub use grammar::{clean_doc, parse};
pub use lexer::{CommentKind, LexErrorKind, Lexer, LexicalError, Token, TokenKind};
