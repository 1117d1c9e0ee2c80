//! Tokenizer built on logos.
//!
//! Whitespace is skipped; comments are kept as tokens so the parser can pick
//! up documentation comments. `>` is always lexed on its own so that nested
//! type arguments (`Map<K, List<V>>`) close one level at a time.

use std::fmt;

use logos::Logos;
use thiserror::Error;

use crate::base::{LineCol, LineIndex, TextRange, TextSize};

/// What went wrong while lexing a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LexErrorKind {
    #[default]
    InvalidCharacter,
    UnterminatedString,
    UnterminatedTextBlock,
    UnterminatedChar,
    UnterminatedComment,
    InvalidEscape,
}

impl LexErrorKind {
    /// The expectation that was not met.
    pub fn expected(self) -> &'static str {
        match self {
            LexErrorKind::InvalidCharacter => "expected a valid token",
            LexErrorKind::UnterminatedString => "expected closing '\"' before end of line",
            LexErrorKind::UnterminatedTextBlock => "expected closing '\"\"\"'",
            LexErrorKind::UnterminatedChar => "expected closing '\\''",
            LexErrorKind::UnterminatedComment => "expected closing '*/'",
            LexErrorKind::InvalidEscape => "expected a valid escape sequence",
        }
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.expected())
    }
}

/// A malformed token.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{position}: {kind}, found {found:?}")]
pub struct LexicalError {
    pub kind: LexErrorKind,
    /// Byte offset where the bad token starts.
    pub offset: TextSize,
    pub position: LineCol,
    /// The offending text, truncated.
    pub found: String,
}

/// Block comment flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommentKind {
    Doc,
    Block,
}

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\x0C]+")]
pub enum TokenKind {
    // Declarations
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("implements")]
    Implements,
    #[token("throws")]
    Throws,
    #[token("default")]
    Default,
    #[token("super")]
    Super,

    // Modifiers
    #[token("public")]
    Public,
    #[token("protected")]
    Protected,
    #[token("private")]
    Private,
    #[token("static")]
    Static,
    #[token("abstract")]
    Abstract,
    #[token("final")]
    Final,
    #[token("native")]
    Native,
    #[token("synchronized")]
    Synchronized,
    #[token("transient")]
    Transient,
    #[token("volatile")]
    Volatile,
    #[token("strictfp")]
    Strictfp,

    // Primitive types
    #[token("boolean")]
    #[token("byte")]
    #[token("char")]
    #[token("short")]
    #[token("int")]
    #[token("long")]
    #[token("float")]
    #[token("double")]
    #[token("void")]
    Primitive,

    // Reserved words the declaration grammar never looks at
    #[token("if")]
    #[token("else")]
    #[token("for")]
    #[token("while")]
    #[token("do")]
    #[token("switch")]
    #[token("case")]
    #[token("break")]
    #[token("continue")]
    #[token("return")]
    #[token("new")]
    #[token("this")]
    #[token("throw")]
    #[token("try")]
    #[token("catch")]
    #[token("finally")]
    #[token("instanceof")]
    #[token("assert")]
    #[token("goto")]
    #[token("const")]
    Keyword,

    #[token("true")]
    #[token("false")]
    #[token("null")]
    LiteralKeyword,

    #[regex(r"[a-zA-Z_$\u{80}-\u{10FFFF}][a-zA-Z0-9_$\u{80}-\u{10FFFF}]*")]
    Ident,

    #[regex(r"(0[xX][0-9a-fA-F_]+|0[bB][01_]+|[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?)[lLfFdD]?")]
    Number,

    #[token("\"", string_literal)]
    StringLiteral,

    #[token("'", char_literal)]
    CharLiteral,

    // Comments
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment(CommentKind),

    // Punctuation
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("@")]
    At,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("?")]
    Question,
    #[token("&")]
    Amp,
    #[token("=")]
    Eq,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token("->")]
    Arrow,
    #[token("-")]
    Minus,
    #[regex(r"[+*/%!~^|]")]
    Operator,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment(_))
    }

    pub fn is_doc_comment(self) -> bool {
        self == TokenKind::BlockComment(CommentKind::Doc)
    }

    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::Public
                | TokenKind::Protected
                | TokenKind::Private
                | TokenKind::Static
                | TokenKind::Abstract
                | TokenKind::Final
                | TokenKind::Native
                | TokenKind::Synchronized
                | TokenKind::Transient
                | TokenKind::Volatile
                | TokenKind::Strictfp
                | TokenKind::Default
        )
    }
}

fn string_literal(lex: &mut logos::Lexer<TokenKind>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    if let Some(body) = rest.strip_prefix("\"\"") {
        // Text block: `"""` must be followed by a line terminator.
        if body.trim_start_matches([' ', '\t', '\x0C']).starts_with(['\n', '\r']) {
            return text_block(lex);
        }
    }
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                lex.bump(i + 1);
                return Ok(());
            }
            '\\' => match chars.next() {
                Some((_, e)) if is_escape(e) => {}
                Some((j, '\n')) | Some((j, '\r')) => {
                    lex.bump(j);
                    return Err(LexErrorKind::UnterminatedString);
                }
                Some((j, e)) => {
                    lex.bump(j + e.len_utf8());
                    return Err(LexErrorKind::InvalidEscape);
                }
                None => break,
            },
            '\n' | '\r' => {
                lex.bump(i);
                return Err(LexErrorKind::UnterminatedString);
            }
            _ => {}
        }
    }
    lex.bump(rest.len());
    Err(LexErrorKind::UnterminatedString)
}

fn text_block(lex: &mut logos::Lexer<TokenKind>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    let body = &rest[2..];
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' if body[i..].starts_with("\"\"\"") => {
                lex.bump(2 + i + 3);
                return Ok(());
            }
            _ => {}
        }
    }
    lex.bump(rest.len());
    Err(LexErrorKind::UnterminatedTextBlock)
}

fn char_literal(lex: &mut logos::Lexer<TokenKind>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    let mut chars = rest.char_indices();
    let mut seen = 0;
    while let Some((i, c)) = chars.next() {
        match c {
            '\'' if seen > 0 => {
                lex.bump(i + 1);
                return Ok(());
            }
            '\\' => match chars.next() {
                Some((_, e)) if is_escape(e) => seen += 1,
                Some((j, e)) => {
                    lex.bump(j + e.len_utf8());
                    return Err(LexErrorKind::InvalidEscape);
                }
                None => break,
            },
            '\n' | '\r' => {
                lex.bump(i);
                return Err(LexErrorKind::UnterminatedChar);
            }
            _ => seen += 1,
        }
    }
    lex.bump(rest.len());
    Err(LexErrorKind::UnterminatedChar)
}

/// Octal and unicode escapes only need their first character checked here.
fn is_escape(c: char) -> bool {
    matches!(
        c,
        'b' | 's' | 't' | 'n' | 'f' | 'r' | '"' | '\'' | '\\' | 'u' | '0'..='7'
    )
}

fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> Result<CommentKind, LexErrorKind> {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(end) => {
            // `/**/` is an empty ordinary comment, not a doc comment.
            let kind = if end > 0 && rest.starts_with('*') {
                CommentKind::Doc
            } else {
                CommentKind::Block
            };
            lex.bump(end + 2);
            Ok(kind)
        }
        None => {
            lex.bump(rest.len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

/// A lexed token with its text and byte range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

/// Lazy token stream over source text.
///
/// Yields `Err` once for the first malformed token and then stops; the
/// stream is finite and can be restarted by cloning it before iteration.
#[derive(Clone)]
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    line_index: LineIndex,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(text),
            line_index: LineIndex::new(text),
            failed: false,
        }
    }

    pub fn source(&self) -> &'a str {
        self.inner.source()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    fn error(&self, kind: LexErrorKind, start: usize, end: usize) -> LexicalError {
        let offset = TextSize::from(start as u32);
        let found: String = self.source()[start..end].chars().take(24).collect();
        LexicalError {
            kind,
            offset,
            position: self.line_index.line_col(offset),
            found,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let kind = self.inner.next()?;
        let span = self.inner.span();
        match kind {
            Ok(kind) => Some(Ok(Token {
                kind,
                text: self.inner.slice(),
                range: TextRange::new((span.start as u32).into(), (span.end as u32).into()),
            })),
            Err(kind) => {
                self.failed = true;
                Some(Err(self.error(kind, span.start, span.end)))
            }
        }
    }
}
