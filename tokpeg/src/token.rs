// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Types for the lexical units consumed by grammars.

use std::fmt;
use std::sync::Arc;

/// A category of terminal symbols.
///
/// Token types are compared by identity of their name, value and skip flag. They are cheap to
/// copy and are usually declared as constants next to the lexer producing them.
///
/// ```
/// # use tokpeg::TokenType;
/// const SEMICOLON: TokenType = TokenType::new("SEMICOLON", ";");
/// const COMMENT: TokenType = TokenType::new("COMMENT", "//").skipped();
///
/// assert_eq!(SEMICOLON.name(), "SEMICOLON");
/// assert!(COMMENT.has_to_be_skipped_from_ast());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TokenType {
    name: &'static str,
    value: &'static str,
    skipped: bool,
}

impl TokenType {
    /// Creates a token type which produces AST leaves when matched.
    pub const fn new(name: &'static str, value: &'static str) -> TokenType {
        TokenType {
            name,
            value,
            skipped: false,
        }
    }

    /// Returns the same token type, but matching it leaves no node in the syntax tree.
    pub const fn skipped(self) -> TokenType {
        TokenType {
            skipped: true,
            ..self
        }
    }

    /// Name used for AST nodes and diagnostics.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Canonical textual value, e.g. `;` for a punctuator.
    #[inline]
    pub fn value(&self) -> &'static str {
        self.value
    }

    #[inline]
    pub fn has_to_be_skipped_from_ast(&self) -> bool {
        self.skipped
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Token types shared by most lexers.
pub mod generic {
    use super::TokenType;

    /// End-of-stream sentinel. Lexers append exactly one at the end of their output.
    pub const EOF: TokenType = TokenType::new("EOF", "EOF");
    pub const IDENTIFIER: TokenType = TokenType::new("IDENTIFIER", "IDENTIFIER");
    pub const LITERAL: TokenType = TokenType::new("LITERAL", "LITERAL");
    pub const CONSTANT: TokenType = TokenType::new("CONSTANT", "CONSTANT");
    pub const COMMENT: TokenType = TokenType::new("COMMENT", "COMMENT");
    pub const UNKNOWN_CHAR: TokenType = TokenType::new("UNKNOWN_CHAR", "UNKNOWN_CHAR");
}

/// Kind of a piece of trivia attached to a token.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TriviaKind {
    Comment,
    PreprocessorDirective,
    SkippedText,
}

/// Text skipped by the lexer before a token, kept so tools can recover it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Trivia {
    kind: TriviaKind,
    tokens: Vec<Token>,
}

impl Trivia {
    pub fn new(kind: TriviaKind, tokens: Vec<Token>) -> Trivia {
        Trivia { kind, tokens }
    }

    pub fn comment(token: Token) -> Trivia {
        Trivia::new(TriviaKind::Comment, vec![token])
    }

    #[inline]
    pub fn kind(&self) -> TriviaKind {
        self.kind
    }

    #[inline]
    pub fn is_comment(&self) -> bool {
        self.kind == TriviaKind::Comment
    }

    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// First token of the trivia, if any.
    pub fn token(&self) -> Option<&Token> {
        self.tokens.first()
    }
}

/// Origin of a token which was pulled in from another source, e.g. through an include
/// directive.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct IncludedFrom {
    pub uri: Arc<str>,
    pub line: usize,
}

/// A lexical unit: a token type, the matched text and its position.
///
/// Lines are 1-based and columns 0-based, counted in characters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    ty: TokenType,
    value: String,
    uri: Option<Arc<str>>,
    line: usize,
    column: usize,
    trivia: Vec<Trivia>,
    included_from: Option<IncludedFrom>,
}

impl Token {
    /// Creates a token at line 1, column 0 with no source attached.
    ///
    /// ```
    /// # use tokpeg::{generic, Token};
    /// let token = Token::new(generic::IDENTIFIER, "foo").with_position(3, 4);
    ///
    /// assert_eq!(token.value(), "foo");
    /// assert_eq!((token.line(), token.column()), (3, 4));
    /// ```
    pub fn new(ty: TokenType, value: impl Into<String>) -> Token {
        Token {
            ty,
            value: value.into(),
            uri: None,
            line: 1,
            column: 0,
            trivia: Vec::new(),
            included_from: None,
        }
    }

    pub fn with_position(mut self, line: usize, column: usize) -> Token {
        self.line = line;
        self.column = column;
        self
    }

    pub fn with_uri(mut self, uri: Arc<str>) -> Token {
        self.uri = Some(uri);
        self
    }

    pub fn with_trivia(mut self, trivia: Vec<Trivia>) -> Token {
        self.trivia = trivia;
        self
    }

    pub fn with_included_from(mut self, uri: Arc<str>, line: usize) -> Token {
        self.included_from = Some(IncludedFrom { uri, line });
        self
    }

    #[inline]
    pub fn ty(&self) -> TokenType {
        self.ty
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Column right after the last character of the token, assuming it spans one line.
    pub fn end_column(&self) -> usize {
        self.column + self.value.chars().count()
    }

    #[inline]
    pub fn trivia(&self) -> &[Trivia] {
        &self.trivia
    }

    #[inline]
    pub fn has_trivia(&self) -> bool {
        !self.trivia.is_empty()
    }

    /// Returns `true` if the token was pulled in from another source.
    #[inline]
    pub fn is_included(&self) -> bool {
        self.included_from.is_some()
    }

    #[inline]
    pub fn included_from(&self) -> Option<&IncludedFrom> {
        self.included_from.as_ref()
    }

    #[inline]
    pub fn is(&self, ty: TokenType) -> bool {
        self.ty == ty
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(feature = "json")]
impl serde::Serialize for Token {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut ser = serializer.serialize_struct("Token", 5)?;
        ser.serialize_field("type", self.ty.name())?;
        ser.serialize_field("value", &self.value)?;
        ser.serialize_field("line", &self.line)?;
        ser.serialize_field("column", &self.column)?;
        ser.serialize_field("uri", &self.uri.as_deref())?;
        ser.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUS: TokenType = TokenType::new("PLUS", "+");

    #[test]
    fn skipped_type_is_distinct() {
        let skipped = PLUS.skipped();

        assert_eq!(skipped.name(), "PLUS");
        assert!(skipped.has_to_be_skipped_from_ast());
        assert!(!PLUS.has_to_be_skipped_from_ast());
        assert_ne!(PLUS, skipped);
    }

    #[test]
    fn end_column_counts_chars() {
        let token = Token::new(generic::LITERAL, "\"héllo\"").with_position(2, 3);

        assert_eq!(token.end_column(), 10);
    }

    #[test]
    fn included_tokens() {
        let token = Token::new(PLUS, "+").with_included_from("header.h".into(), 12);

        assert!(token.is_included());
        assert_eq!(token.included_from().map(|i| i.line), Some(12));
    }

    #[test]
    fn trivia() {
        let comment = Token::new(generic::COMMENT, "// hi");
        let token = Token::new(PLUS, "+").with_trivia(vec![Trivia::comment(comment.clone())]);

        assert!(token.has_trivia());
        assert!(token.trivia()[0].is_comment());
        assert_eq!(token.trivia()[0].token(), Some(&comment));
    }

    #[cfg(feature = "json")]
    #[test]
    fn token_json() {
        let token = Token::new(PLUS, "+").with_position(1, 2);

        assert_eq!(
            serde_json::to_string(&token).unwrap(),
            r#"{"type":"PLUS","value":"+","line":1,"column":2,"uri":null}"#
        );
    }
}
