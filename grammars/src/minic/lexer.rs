// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::mem;
use std::sync::Arc;

use logos::Logos;

use tokpeg::generic::{COMMENT, EOF, IDENTIFIER};
use tokpeg::{Lexer, LexerError, Token, TokenType, Trivia, TriviaKind};

use super::keywords::*;
use super::punctuators::*;
use super::{INTEGER, PREPROCESSOR};
use crate::{token, Positions};

#[derive(Logos, Clone, Copy, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Lexeme {
    #[regex(r"//[^\n]*", allow_greedy = true)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,
    #[token("/*")]
    UnterminatedComment,
    #[regex(r"#[^\n]*", allow_greedy = true)]
    Directive,

    #[token("struct")]
    Struct,
    #[token("int")]
    Int,
    #[token("void")]
    Void,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("continue")]
    Continue,
    #[token("break")]
    Break,

    #[regex("[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex("[0-9]+")]
    Integer,

    #[token("(")]
    ParenL,
    #[token(")")]
    ParenR,
    #[token("{")]
    BraceL,
    #[token("}")]
    BraceR,
    #[token("=")]
    Eq,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("==")]
    EqEq,
    #[token("!=")]
    Ne,
    #[token("<")]
    Lt,
    #[token("<=")]
    Lte,
    #[token(">")]
    Gt,
    #[token(">=")]
    Gte,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
}

impl Lexeme {
    fn token_type(self) -> Option<TokenType> {
        let ty = match self {
            Lexeme::Comment | Lexeme::UnterminatedComment | Lexeme::Directive => return None,
            Lexeme::Struct => STRUCT,
            Lexeme::Int => INT,
            Lexeme::Void => VOID,
            Lexeme::Return => RETURN,
            Lexeme::If => IF,
            Lexeme::Else => ELSE,
            Lexeme::While => WHILE,
            Lexeme::Continue => CONTINUE,
            Lexeme::Break => BREAK,
            Lexeme::Identifier => IDENTIFIER,
            Lexeme::Integer => INTEGER,
            Lexeme::ParenL => PAREN_L,
            Lexeme::ParenR => PAREN_R,
            Lexeme::BraceL => BRACE_L,
            Lexeme::BraceR => BRACE_R,
            Lexeme::Eq => EQ,
            Lexeme::Comma => COMMA,
            Lexeme::Semicolon => SEMICOLON,
            Lexeme::Add => ADD,
            Lexeme::Sub => SUB,
            Lexeme::Mul => MUL,
            Lexeme::Div => DIV,
            Lexeme::EqEq => EQEQ,
            Lexeme::Ne => NE,
            Lexeme::Lt => LT,
            Lexeme::Lte => LTE,
            Lexeme::Gt => GT,
            Lexeme::Gte => GTE,
            Lexeme::Inc => INC,
            Lexeme::Dec => DEC,
        };

        Some(ty)
    }
}

/// Lexer of Mini-C sources.
///
/// ```
/// # use tokpeg::Lexer;
/// # use tokpeg_grammars::minic::MiniCLexer;
/// let tokens = MiniCLexer.lex("// answer\nint a = 42;").unwrap();
///
/// assert_eq!(tokens[0].value(), "int");
/// assert!(tokens[0].trivia()[0].is_comment());
/// assert_eq!(tokens[3].ty().name(), "INTEGER");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MiniCLexer;

impl Lexer for MiniCLexer {
    fn lex_with_uri(&self, source: &str, uri: Option<&str>) -> Result<Vec<Token>, LexerError> {
        let uri: Option<Arc<str>> = uri.map(Arc::from);
        let mut positions = Positions::new(source);
        let mut lexer = Lexeme::lexer(source);
        let mut tokens = vec![];
        let mut trivia = vec![];

        while let Some(lexeme) = lexer.next() {
            let position = positions.at(lexer.span().start);
            let value = lexer.slice();

            match lexeme {
                Ok(Lexeme::Comment) => {
                    trivia.push(Trivia::comment(token(COMMENT, value, position, &uri)));
                }
                Ok(Lexeme::Directive) => trivia.push(Trivia::new(
                    TriviaKind::PreprocessorDirective,
                    vec![token(PREPROCESSOR, value, position, &uri)],
                )),
                Ok(Lexeme::UnterminatedComment) => {
                    return Err(LexerError::Unterminated {
                        what: "comment",
                        line: position.0,
                        column: position.1,
                    })
                }
                Ok(lexeme) => {
                    if let Some(ty) = lexeme.token_type() {
                        tokens.push(
                            token(ty, value, position, &uri).with_trivia(mem::take(&mut trivia)),
                        );
                    }
                }
                Err(()) => {
                    return Err(LexerError::UnexpectedCharacter {
                        found: value.chars().next().unwrap_or_default(),
                        line: position.0,
                        column: position.1,
                        uri: uri.as_deref().map(str::to_owned),
                    })
                }
            }
        }

        let eof = token(EOF, "EOF", positions.at(source.len()), &uri).with_trivia(trivia);
        tokens.push(eof);

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(source: &str) -> Vec<&'static str> {
        MiniCLexer
            .lex(source)
            .unwrap()
            .iter()
            .map(|token| token.ty().name())
            .collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            types("int integer; while whilex"),
            vec!["INT", "IDENTIFIER", "SEMICOLON", "WHILE", "IDENTIFIER", "EOF"]
        );
    }

    #[test]
    fn longest_operators() {
        assert_eq!(
            types("a<=b==c++ - --d"),
            vec!["IDENTIFIER", "LTE", "IDENTIFIER", "EQEQ", "IDENTIFIER", "INC", "SUB", "DEC", "IDENTIFIER", "EOF"]
        );
    }

    #[test]
    fn trivia_goes_to_next_token() {
        let tokens = MiniCLexer
            .lex("#define SIZE\n/* block\n comment */ int a; // tail")
            .unwrap();

        assert_eq!(tokens[0].value(), "int");
        assert_eq!((tokens[0].line(), tokens[0].column()), (3, 12));
        assert_eq!(tokens[0].trivia().len(), 2);
        assert_eq!(
            tokens[0].trivia()[0].kind(),
            TriviaKind::PreprocessorDirective
        );
        assert!(tokens[0].trivia()[1].is_comment());

        let eof = tokens.last().unwrap();
        assert!(eof.is(EOF));
        assert_eq!(eof.trivia()[0].token().map(Token::value), Some("// tail"));
    }

    #[test]
    fn unterminated_comment() {
        match MiniCLexer.lex("int a; /* never closed") {
            Err(LexerError::Unterminated { what, line, column }) => {
                assert_eq!((what, line, column), ("comment", 1, 7))
            }
            result => panic!("unexpected {:?}", result),
        }
    }

    #[test]
    fn unexpected_character() {
        match MiniCLexer.lex_with_uri("int a = $;", Some("main.c")) {
            Err(error) => assert_eq!(
                error.to_string(),
                "unexpected character '$' at line 1, column 8 in 'main.c'"
            ),
            Ok(tokens) => panic!("unexpected {:?}", tokens),
        }
    }
}
