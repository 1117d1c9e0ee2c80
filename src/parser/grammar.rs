//! Recursive-descent declaration grammar.
//!
//! Walks package/import/type declarations and member signatures, reporting
//! each to a [`Builder`]. Method bodies, field initializers and annotation
//! arguments are not parsed; their raw text is captured by balancing
//! delimiters.

use smol_str::SmolStr;

use super::error::ParseError;
use super::events::{
    AnnotationSyntax, Builder, ClassDecl, ClassKind, DocTarget, FieldDecl, ImportDecl, MethodDecl,
    PackageDecl, ParamSyntax, TypeArgSyntax, TypeParamSyntax, TypeSyntax, WildcardBound,
};
use super::lexer::{Lexer, Token, TokenKind};
use crate::base::{LineIndex, TextRange, TextSize};

type PResult<T> = std::result::Result<T, ParseError>;

/// A significant token plus the doc comment directly preceding it.
#[derive(Clone, Copy, Debug)]
struct Sig<'a> {
    token: Token<'a>,
    doc: Option<&'a str>,
}

/// Parse one source unit, reporting build events to `builder`.
///
/// Lexical errors surface before any event is emitted; a parse error stops
/// event emission at the point of failure.
pub fn parse<B: Builder + ?Sized>(text: &str, builder: &mut B) -> crate::Result<()> {
    let lexer = Lexer::new(text);
    let line_index = lexer.line_index().clone();

    let mut tokens = Vec::new();
    let mut doc = None;
    for token in lexer {
        let token = token?;
        if token.kind.is_doc_comment() {
            doc = Some(token.text);
        } else if !token.kind.is_trivia() {
            tokens.push(Sig {
                token,
                doc: doc.take(),
            });
        }
    }

    let mut parser = Parser {
        source: text,
        tokens,
        pos: 0,
        line_index,
        builder,
    };
    parser.compilation_unit()?;
    Ok(())
}

/// Strip the comment delimiters and leading `*` gutters from a doc comment.
pub fn clean_doc(raw: &str) -> String {
    let inner = raw.strip_prefix("/**").unwrap_or(raw);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);
    inner
        .lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn describe(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::LBrace => "'{'",
        TokenKind::RBrace => "'}'",
        TokenKind::LParen => "'('",
        TokenKind::RParen => "')'",
        TokenKind::LBracket => "'['",
        TokenKind::RBracket => "']'",
        TokenKind::Lt => "'<'",
        TokenKind::Gt => "'>'",
        TokenKind::Semicolon => "';'",
        _ => "token",
    }
}

/// Tokens that may appear inside a type argument list.
fn in_type_arguments(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::Primitive
            | TokenKind::Dot
            | TokenKind::Comma
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Question
            | TokenKind::Extends
            | TokenKind::Super
            | TokenKind::Amp
            | TokenKind::At
            | TokenKind::LBracket
            | TokenKind::RBracket
    )
}

struct Parser<'a, 'b, B: ?Sized> {
    source: &'a str,
    tokens: Vec<Sig<'a>>,
    pos: usize,
    line_index: LineIndex,
    builder: &'b mut B,
}

impl<'a, B: Builder + ?Sized> Parser<'a, '_, B> {
    // ------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------

    fn nth(&self, n: usize) -> Option<Token<'a>> {
        self.tokens.get(self.pos + n).map(|sig| sig.token)
    }

    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.nth(n).map(|t| t.kind)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.nth_kind(0)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn nth_is(&self, n: usize, kind: TokenKind, text: &str) -> bool {
        matches!(self.nth(n), Some(t) if t.kind == kind && t.text == text)
    }

    fn at_ident(&self, text: &str) -> bool {
        self.nth_is(0, TokenKind::Ident, text)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.nth(0);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> PResult<Token<'a>> {
        match self.nth(0) {
            Some(t) if t.kind == kind => {
                self.pos += 1;
                Ok(t)
            }
            _ => Err(self.error(expected)),
        }
    }

    fn expect_ident(&mut self, expected: &str) -> PResult<SmolStr> {
        self.expect(TokenKind::Ident, expected)
            .map(|t| SmolStr::new(t.text))
    }

    fn error(&self, expected: &str) -> ParseError {
        let (offset, found) = match self.nth(0) {
            Some(t) => (t.range.start(), format!("'{}'", t.text)),
            None => (TextSize::of(self.source), "end of input".to_string()),
        };
        ParseError {
            offset,
            position: self.line_index.line_col(offset),
            expected: expected.to_string(),
            found,
        }
    }

    /// Doc comment attached to the current token.
    fn doc(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).and_then(|sig| sig.doc)
    }

    /// 1-indexed line of the current token.
    fn line(&self) -> u32 {
        self.nth(0)
            .map(|t| self.line_index.line_col(t.range.start()).line_one_indexed())
            .unwrap_or(0)
    }

    fn emit_doc(&mut self, doc: Option<&str>, target: DocTarget) {
        if let Some(doc) = doc {
            self.builder.doc_comment(&clean_doc(doc), target);
        }
    }

    // ------------------------------------------------------------------
    // Compilation unit
    // ------------------------------------------------------------------

    fn compilation_unit(&mut self) -> PResult<()> {
        self.builder.begin_source();

        let start = self.pos;
        let doc = self.doc();
        let line = self.line();
        let annotations = self.annotations()?;
        if self.at(TokenKind::Package) {
            let doc = doc.or(self.doc());
            self.emit_doc(doc, DocTarget::Package);
            self.bump();
            let name = self.qualified_name()?;
            self.expect(TokenKind::Semicolon, "';' after the package name")?;
            self.builder.package(PackageDecl {
                name,
                annotations,
                line,
            });
        } else {
            // Those annotations belong to the first type declaration.
            self.pos = start;
        }

        while self.at(TokenKind::Import) {
            self.import()?;
        }

        while self.nth(0).is_some() {
            if self.eat(TokenKind::Semicolon) {
                continue;
            }
            if self.at_module_declaration() {
                self.skip_module()?;
                continue;
            }
            self.type_declaration()?;
        }

        self.builder.end_source();
        Ok(())
    }

    fn import(&mut self) -> PResult<()> {
        let line = self.line();
        self.bump();
        let is_static = self.eat(TokenKind::Static);
        let mut name = String::from(self.expect_ident("an imported name")?.as_str());
        let mut is_wildcard = false;
        while self.eat(TokenKind::Dot) {
            if self.nth_is(0, TokenKind::Operator, "*") {
                self.bump();
                is_wildcard = true;
                break;
            }
            name.push('.');
            name.push_str(&self.expect_ident("an identifier or '*'")?);
        }
        self.expect(TokenKind::Semicolon, "';' after the import")?;
        self.builder.import(ImportDecl {
            name: name.into(),
            is_static,
            is_wildcard,
            line,
        });
        Ok(())
    }

    fn at_module_declaration(&self) -> bool {
        let mut n = 0;
        while self.nth_kind(n) == Some(TokenKind::At) {
            // Annotations on a module declaration are rare; only skip simple ones.
            n += 2;
        }
        self.nth_is(n, TokenKind::Ident, "module")
            || (self.nth_is(n, TokenKind::Ident, "open") && self.nth_is(n + 1, TokenKind::Ident, "module"))
    }

    fn skip_module(&mut self) -> PResult<()> {
        while !self.at(TokenKind::LBrace) {
            if self.bump().is_none() {
                return Err(self.error("'{' to open the module declaration"));
            }
        }
        self.capture_delimited(TokenKind::LBrace, TokenKind::RBrace)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Type declarations
    // ------------------------------------------------------------------

    fn type_declaration(&mut self) -> PResult<()> {
        let doc = self.doc();
        let line = self.line();
        let (modifiers, annotations) = self.modifiers()?;
        match self.declaration_kind() {
            Some(kind) => self.class_declaration(kind, modifiers, annotations, doc, line),
            None => Err(self.error("a class, interface, enum, record or @interface declaration")),
        }
    }

    fn declaration_kind(&self) -> Option<ClassKind> {
        match self.peek_kind()? {
            TokenKind::Class => Some(ClassKind::Class),
            TokenKind::Interface => Some(ClassKind::Interface),
            TokenKind::Enum => Some(ClassKind::Enum),
            TokenKind::At if self.nth_kind(1) == Some(TokenKind::Interface) => {
                Some(ClassKind::Annotation)
            }
            TokenKind::Ident
                if self.at_ident("record")
                    && self.nth_kind(1) == Some(TokenKind::Ident)
                    && matches!(self.nth_kind(2), Some(TokenKind::LParen | TokenKind::Lt)) =>
            {
                Some(ClassKind::Record)
            }
            _ => None,
        }
    }

    fn modifiers(&mut self) -> PResult<(Vec<SmolStr>, Vec<AnnotationSyntax>)> {
        let mut modifiers = Vec::new();
        let mut annotations = Vec::new();
        loop {
            let Some(token) = self.nth(0) else { break };
            match token.kind {
                TokenKind::At if self.nth_kind(1) != Some(TokenKind::Interface) => {
                    annotations.push(self.annotation()?);
                }
                kind if kind.is_modifier() => {
                    modifiers.push(SmolStr::new(token.text));
                    self.bump();
                }
                TokenKind::Ident
                    if token.text == "sealed"
                        && self.nth_kind(1).is_some_and(|next| {
                            next.is_modifier()
                                || matches!(
                                    next,
                                    TokenKind::Class | TokenKind::Interface | TokenKind::Ident | TokenKind::At
                                )
                        }) =>
                {
                    modifiers.push(SmolStr::new_static("sealed"));
                    self.bump();
                }
                TokenKind::Ident
                    if token.text == "non"
                        && self.nth_kind(1) == Some(TokenKind::Minus)
                        && self.nth_is(2, TokenKind::Ident, "sealed") =>
                {
                    modifiers.push(SmolStr::new_static("non-sealed"));
                    self.pos += 3;
                }
                _ => break,
            }
        }
        Ok((modifiers, annotations))
    }

    fn annotations(&mut self) -> PResult<Vec<AnnotationSyntax>> {
        let mut annotations = Vec::new();
        while self.at(TokenKind::At) && self.nth_kind(1) != Some(TokenKind::Interface) {
            annotations.push(self.annotation()?);
        }
        Ok(annotations)
    }

    fn annotation(&mut self) -> PResult<AnnotationSyntax> {
        self.expect(TokenKind::At, "'@'")?;
        let name = self.qualified_name()?;
        let arguments = if self.at(TokenKind::LParen) {
            Some(self.capture_delimited(TokenKind::LParen, TokenKind::RParen)?)
        } else {
            None
        };
        Ok(AnnotationSyntax { name, arguments })
    }

    fn qualified_name(&mut self) -> PResult<SmolStr> {
        let mut name = String::from(self.expect_ident("a name")?.as_str());
        while self.at(TokenKind::Dot) && self.nth_kind(1) == Some(TokenKind::Ident) {
            self.bump();
            name.push('.');
            name.push_str(&self.expect_ident("an identifier")?);
        }
        Ok(name.into())
    }

    fn class_declaration(
        &mut self,
        kind: ClassKind,
        modifiers: Vec<SmolStr>,
        annotations: Vec<AnnotationSyntax>,
        doc: Option<&'a str>,
        line: u32,
    ) -> PResult<()> {
        // `@interface` is two tokens.
        if kind == ClassKind::Annotation {
            self.bump();
        }
        self.bump();

        let name = self.expect_ident("a type name")?;
        let type_params = if self.at(TokenKind::Lt) {
            self.type_parameters()?
        } else {
            Vec::new()
        };
        let components = if kind == ClassKind::Record {
            self.formal_parameters()?
        } else {
            Vec::new()
        };

        let mut extends = Vec::new();
        match kind {
            ClassKind::Class if self.eat(TokenKind::Extends) => extends.push(self.parse_type()?),
            ClassKind::Interface if self.eat(TokenKind::Extends) => extends = self.type_list()?,
            _ => {}
        }
        let implements = if self.eat(TokenKind::Implements) {
            self.type_list()?
        } else {
            Vec::new()
        };
        let permits = if self.at_ident("permits") {
            self.bump();
            self.type_list()?
        } else {
            Vec::new()
        };

        self.emit_doc(doc, DocTarget::Class(name.clone()));
        self.builder.begin_class(ClassDecl {
            kind,
            name: name.clone(),
            modifiers,
            annotations,
            type_params,
            extends,
            implements,
            permits,
            line,
        });
        if kind == ClassKind::Record {
            self.record_components(&name, components, line);
        }
        self.class_body(kind, &name)?;
        self.builder.end_class();
        Ok(())
    }

    /// Record components become private final fields plus a canonical constructor.
    fn record_components(&mut self, record: &SmolStr, components: Vec<ParamSyntax>, line: u32) {
        for component in &components {
            let Some(name) = component.name.clone() else { continue };
            self.builder.begin_field(FieldDecl {
                name,
                modifiers: vec![SmolStr::new_static("private"), SmolStr::new_static("final")],
                annotations: component.annotations.clone(),
                ty: component.ty.clone(),
                initializer: None,
                enum_constant: false,
                line,
            });
            self.builder.end_field();
        }
        self.builder.begin_method(MethodDecl {
            name: record.clone(),
            modifiers: vec![SmolStr::new_static("public")],
            annotations: Vec::new(),
            type_params: Vec::new(),
            return_type: None,
            params: components,
            exceptions: Vec::new(),
            body: None,
            default_value: None,
            line,
        });
        self.builder.end_method();
    }

    fn class_body(&mut self, kind: ClassKind, class_name: &SmolStr) -> PResult<()> {
        self.expect(TokenKind::LBrace, "'{' to open the class body")?;
        if kind == ClassKind::Enum {
            self.enum_constants(class_name)?;
        }
        loop {
            match self.peek_kind() {
                None => return Err(self.error("'}' to close the class body")),
                Some(TokenKind::RBrace) => {
                    self.bump();
                    return Ok(());
                }
                Some(TokenKind::Semicolon) => {
                    self.bump();
                }
                Some(TokenKind::LBrace) => {
                    self.capture_delimited(TokenKind::LBrace, TokenKind::RBrace)?;
                }
                Some(TokenKind::Static) if self.nth_kind(1) == Some(TokenKind::LBrace) => {
                    self.bump();
                    self.capture_delimited(TokenKind::LBrace, TokenKind::RBrace)?;
                }
                Some(_) => self.member(kind, class_name)?,
            }
        }
    }

    fn enum_constants(&mut self, enum_name: &SmolStr) -> PResult<()> {
        loop {
            match self.peek_kind() {
                Some(TokenKind::Semicolon) => {
                    self.bump();
                    return Ok(());
                }
                Some(TokenKind::RBrace) | None => return Ok(()),
                _ => {}
            }

            let doc = self.doc();
            let line = self.line();
            let annotations = self.annotations()?;
            let name = self.expect_ident("an enum constant")?;
            let initializer = if self.at(TokenKind::LParen) {
                Some(self.capture_delimited(TokenKind::LParen, TokenKind::RParen)?)
            } else {
                None
            };
            if self.at(TokenKind::LBrace) {
                self.capture_delimited(TokenKind::LBrace, TokenKind::RBrace)?;
            }

            self.emit_doc(doc, DocTarget::Field(name.clone()));
            self.builder.begin_field(FieldDecl {
                name,
                modifiers: vec![
                    SmolStr::new_static("public"),
                    SmolStr::new_static("static"),
                    SmolStr::new_static("final"),
                ],
                annotations,
                ty: TypeSyntax::simple(enum_name.clone()),
                initializer,
                enum_constant: true,
                line,
            });
            self.builder.end_field();

            if !self.eat(TokenKind::Comma) {
                return match self.peek_kind() {
                    Some(TokenKind::Semicolon) => {
                        self.bump();
                        Ok(())
                    }
                    Some(TokenKind::RBrace) => Ok(()),
                    _ => Err(self.error("',', ';' or '}' after an enum constant")),
                };
            }
        }
    }

    fn member(&mut self, owner: ClassKind, class_name: &SmolStr) -> PResult<()> {
        let doc = self.doc();
        let line = self.line();
        let (modifiers, annotations) = self.modifiers()?;

        if let Some(kind) = self.declaration_kind() {
            return self.class_declaration(kind, modifiers, annotations, doc, line);
        }

        let type_params = if self.at(TokenKind::Lt) {
            self.type_parameters()?
        } else {
            Vec::new()
        };

        if self.nth_is(0, TokenKind::Ident, class_name) {
            match self.nth_kind(1) {
                Some(TokenKind::LParen) => {
                    self.bump();
                    let head = MemberHead {
                        name: class_name.clone(),
                        modifiers,
                        annotations,
                        type_params,
                        doc,
                        line,
                    };
                    return self.method_rest(head, None);
                }
                // Compact canonical constructor of a record.
                Some(TokenKind::LBrace) if owner == ClassKind::Record => {
                    self.bump();
                    self.capture_delimited(TokenKind::LBrace, TokenKind::RBrace)?;
                    return Ok(());
                }
                _ => {}
            }
        }

        let ty = self.parse_type()?;
        let name = self.expect_ident("a member name")?;
        let head = MemberHead {
            name,
            modifiers,
            annotations,
            type_params,
            doc,
            line,
        };
        if self.at(TokenKind::LParen) {
            self.method_rest(head, Some(ty))
        } else {
            self.field_declarators(head, ty)
        }
    }

    fn method_rest(&mut self, head: MemberHead<'a>, return_type: Option<TypeSyntax>) -> PResult<()> {
        let params = self.formal_parameters()?;
        let extra = self.dimensions();
        let return_type = return_type.map(|ty| ty.with_dimensions(extra));
        let exceptions = if self.eat(TokenKind::Throws) {
            self.type_list()?
        } else {
            Vec::new()
        };
        let default_value = if self.eat(TokenKind::Default) {
            Some(self.capture_until_terminator()?)
        } else {
            None
        };
        let body = if self.at(TokenKind::LBrace) {
            Some(self.capture_delimited(TokenKind::LBrace, TokenKind::RBrace)?)
        } else {
            self.expect(TokenKind::Semicolon, "a method body or ';'")?;
            None
        };

        let target = if return_type.is_some() {
            DocTarget::Method(head.name.clone())
        } else {
            DocTarget::Constructor(head.name.clone())
        };
        self.emit_doc(head.doc, target);
        self.builder.begin_method(MethodDecl {
            name: head.name,
            modifiers: head.modifiers,
            annotations: head.annotations,
            type_params: head.type_params,
            return_type,
            params,
            exceptions,
            body,
            default_value,
            line: head.line,
        });
        self.builder.end_method();
        Ok(())
    }

    fn field_declarators(&mut self, head: MemberHead<'a>, ty: TypeSyntax) -> PResult<()> {
        let mut name = head.name;
        loop {
            let dims = self.dimensions();
            let initializer = if self.eat(TokenKind::Eq) {
                Some(self.capture_until_terminator()?)
            } else {
                None
            };

            self.emit_doc(head.doc, DocTarget::Field(name.clone()));
            self.builder.begin_field(FieldDecl {
                name,
                modifiers: head.modifiers.clone(),
                annotations: head.annotations.clone(),
                ty: ty.clone().with_dimensions(dims),
                initializer,
                enum_constant: false,
                line: head.line,
            });
            self.builder.end_field();

            if !self.eat(TokenKind::Comma) {
                self.expect(TokenKind::Semicolon, "';' after the field declaration")?;
                return Ok(());
            }
            name = self.expect_ident("a field name")?;
        }
    }

    // ------------------------------------------------------------------
    // Types and parameters
    // ------------------------------------------------------------------

    fn type_parameters(&mut self) -> PResult<Vec<TypeParamSyntax>> {
        self.expect(TokenKind::Lt, "'<'")?;
        let mut params = Vec::new();
        loop {
            self.annotations()?;
            let name = self.expect_ident("a type parameter name")?;
            let mut bounds = Vec::new();
            if self.eat(TokenKind::Extends) {
                bounds.push(self.parse_type()?);
                while self.eat(TokenKind::Amp) {
                    bounds.push(self.parse_type()?);
                }
            }
            params.push(TypeParamSyntax { name, bounds });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt, "'>' to close the type parameters")?;
        Ok(params)
    }

    fn parse_type(&mut self) -> PResult<TypeSyntax> {
        self.annotations()?;
        let mut ty = match self.nth(0) {
            Some(t) if t.kind == TokenKind::Primitive => {
                self.bump();
                TypeSyntax::simple(t.text)
            }
            Some(t) if t.kind == TokenKind::Ident => {
                self.bump();
                let mut name = String::from(t.text);
                let mut arguments = self.type_arguments()?;
                while self.at(TokenKind::Dot)
                    && matches!(self.nth_kind(1), Some(TokenKind::Ident | TokenKind::At))
                {
                    self.bump();
                    self.annotations()?;
                    name.push('.');
                    name.push_str(&self.expect_ident("a type name")?);
                    arguments = self.type_arguments()?;
                }
                TypeSyntax {
                    name: name.into(),
                    arguments,
                    dimensions: 0,
                }
            }
            _ => return Err(self.error("a type")),
        };
        ty.dimensions = self.dimensions();
        Ok(ty)
    }

    /// Optional `<...>`; the diamond `<>` yields no arguments.
    fn type_arguments(&mut self) -> PResult<Vec<TypeArgSyntax>> {
        if !self.eat(TokenKind::Lt) {
            return Ok(Vec::new());
        }
        let mut arguments = Vec::new();
        if self.eat(TokenKind::Gt) {
            return Ok(arguments);
        }
        loop {
            self.annotations()?;
            if self.eat(TokenKind::Question) {
                let bound = if self.eat(TokenKind::Extends) {
                    Some((WildcardBound::Extends, self.parse_type()?))
                } else if self.eat(TokenKind::Super) {
                    Some((WildcardBound::Super, self.parse_type()?))
                } else {
                    None
                };
                arguments.push(TypeArgSyntax::Wildcard(bound));
            } else {
                arguments.push(TypeArgSyntax::Type(self.parse_type()?));
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt, "'>' to close the type arguments")?;
        Ok(arguments)
    }

    fn type_list(&mut self) -> PResult<Vec<TypeSyntax>> {
        let mut types = vec![self.parse_type()?];
        while self.eat(TokenKind::Comma) {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }

    /// Count `[]` pairs.
    fn dimensions(&mut self) -> u32 {
        let mut dims = 0;
        while self.at(TokenKind::LBracket) && self.nth_kind(1) == Some(TokenKind::RBracket) {
            self.pos += 2;
            dims += 1;
        }
        dims
    }

    fn formal_parameters(&mut self) -> PResult<Vec<ParamSyntax>> {
        self.expect(TokenKind::LParen, "'(' to open the parameter list")?;
        let mut params = Vec::new();
        if self.eat(TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            let (modifiers, annotations) = self.modifiers()?;
            let mut ty = self.parse_type()?;
            self.annotations()?;
            let varargs = self.eat(TokenKind::Ellipsis);

            if self.nth_is(0, TokenKind::Keyword, "this") {
                // Receiver parameter: `Foo this`.
                self.bump();
            } else if self.at(TokenKind::Ident)
                && self.nth_kind(1) == Some(TokenKind::Dot)
                && self.nth_is(2, TokenKind::Keyword, "this")
            {
                self.pos += 3;
            } else {
                let name = self.expect_ident("a parameter name")?;
                ty.dimensions += self.dimensions();
                params.push(ParamSyntax {
                    name: Some(name),
                    ty,
                    modifiers,
                    annotations,
                    varargs,
                });
            }

            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')' to close the parameter list")?;
        Ok(params)
    }

    // ------------------------------------------------------------------
    // Raw text capture
    // ------------------------------------------------------------------

    /// Consume a balanced `open ... close` group and return the text inside.
    fn capture_delimited(&mut self, open: TokenKind, close: TokenKind) -> PResult<String> {
        let first = self.expect(open, describe(open))?;
        let mut depth = 1usize;
        while let Some(token) = self.bump() {
            if token.kind == open {
                depth += 1;
            } else if token.kind == close {
                depth -= 1;
                if depth == 0 {
                    let inner = TextRange::new(first.range.end(), token.range.start());
                    return Ok(self.source[inner].trim().to_string());
                }
            }
        }
        Err(self.error(&format!("{} to match the one opened earlier", describe(close))))
    }

    /// Consume an expression up to (not including) a top-level `,` or `;`.
    fn capture_until_terminator(&mut self) -> PResult<String> {
        let Some(first) = self.nth(0) else {
            return Err(self.error("an expression"));
        };
        let start = first.range.start();
        let mut end = start;
        let mut depth = 0usize;
        while let Some(token) = self.nth(0) {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Lt => {
                    if let Some(close) = self.type_arguments_end() {
                        if let Some(gt) = self.nth(close) {
                            end = gt.range.end();
                        }
                        self.pos += close + 1;
                        continue;
                    }
                }
                TokenKind::Semicolon | TokenKind::Comma if depth == 0 => break,
                _ => {}
            }
            end = token.range.end();
            self.bump();
        }
        if self.nth(0).is_none() {
            return Err(self.error("';'"));
        }
        if start == end {
            return Err(self.error("an expression"));
        }
        Ok(self.source[TextRange::new(start, end)].to_string())
    }

    /// With the cursor on `<`, the offset of the `>` closing it when the pair
    /// reads as type arguments (`new Map<K, V>()`, `Util.<T>id(x)`) rather
    /// than a comparison.
    fn type_arguments_end(&self) -> Option<usize> {
        let before = self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))?;
        if !matches!(before.token.kind, TokenKind::Ident | TokenKind::Dot) {
            return None;
        }
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            let kind = self.nth_kind(n)?;
            if !in_type_arguments(kind) {
                return None;
            }
            match kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            n += 1;
        }
        match self.nth_kind(n + 1) {
            None
            | Some(
                TokenKind::LParen
                | TokenKind::ColonColon
                | TokenKind::Dot
                | TokenKind::Ident
                | TokenKind::Comma
                | TokenKind::Semicolon,
            ) => Some(n),
            _ => None,
        }
    }
}

/// The part of a member declaration read before we know whether it is a
/// field or a method.
struct MemberHead<'a> {
    name: SmolStr,
    modifiers: Vec<SmolStr>,
    annotations: Vec<AnnotationSyntax>,
    type_params: Vec<TypeParamSyntax>,
    doc: Option<&'a str>,
    line: u32,
}
