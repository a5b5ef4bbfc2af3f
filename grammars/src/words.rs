// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Whitespace separated words.
//!
//! Every word made of `[A-Za-z0-9_<>]` becomes an [`IDENTIFIER`] token; any other
//! non-whitespace character is a lexical error.

use std::sync::Arc;

use logos::Logos;
use once_cell::sync::Lazy;

use tokpeg::generic::{EOF, IDENTIFIER};
use tokpeg::{Lexer, LexerError, Token};
use tokpeg_meta::{and, o2n, unwrap_or_report, Grammar, GrammarBuilder, GrammarError};

use crate::{token, Positions};

#[derive(Logos, Clone, Copy, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Lexeme {
    #[regex("[A-Za-z0-9_<>]+")]
    Word,
}

/// Lexer of whitespace separated words.
///
/// ```
/// # use tokpeg::Lexer;
/// # use tokpeg_grammars::words::WordLexer;
/// let tokens = WordLexer.lex("hello\n  world").unwrap();
///
/// assert_eq!(tokens.len(), 3);
/// assert_eq!((tokens[1].line(), tokens[1].column()), (2, 2));
/// assert_eq!(tokens[2].value(), "EOF");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct WordLexer;

impl Lexer for WordLexer {
    fn lex_with_uri(&self, source: &str, uri: Option<&str>) -> Result<Vec<Token>, LexerError> {
        let uri: Option<Arc<str>> = uri.map(Arc::from);
        let mut positions = Positions::new(source);
        let mut lexer = Lexeme::lexer(source);
        let mut tokens = vec![];

        while let Some(lexeme) = lexer.next() {
            let position = positions.at(lexer.span().start);

            match lexeme {
                Ok(Lexeme::Word) => tokens.push(token(IDENTIFIER, lexer.slice(), position, &uri)),
                Err(()) => {
                    return Err(LexerError::UnexpectedCharacter {
                        found: lexer.slice().chars().next().unwrap_or_default(),
                        line: position.0,
                        column: position.1,
                        uri: uri.as_deref().map(str::to_owned),
                    })
                }
            }
        }

        tokens.push(token(EOF, "EOF", positions.at(source.len()), &uri));

        Ok(tokens)
    }
}

static GRAMMAR: Lazy<Arc<Grammar>> = Lazy::new(|| Arc::new(unwrap_or_report(build())));

/// `text := IDENTIFIER* EOF`
pub fn grammar() -> Arc<Grammar> {
    Arc::clone(&GRAMMAR)
}

fn build() -> Result<Grammar, Vec<GrammarError>> {
    let mut g = GrammarBuilder::new();
    let text = g.rule("text");

    g.define(text)
        .is(and!(o2n!(IDENTIFIER), EOF))
        .map_err(|error| vec![error])?;
    g.set_root(text);

    g.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_and_positions() {
        let tokens = WordLexer.lex_with_uri("a <b>\n c_1", Some("words.txt")).unwrap();

        let values: Vec<_> = tokens.iter().map(Token::value).collect();
        assert_eq!(values, vec!["a", "<b>", "c_1", "EOF"]);
        assert_eq!((tokens[2].line(), tokens[2].column()), (2, 1));
        assert_eq!((tokens[3].line(), tokens[3].column()), (2, 4));
        assert_eq!(tokens[0].uri(), Some("words.txt"));
        assert!(tokens[3].is(EOF));
    }

    #[test]
    fn empty_source() {
        let tokens = WordLexer.lex("").unwrap();

        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is(EOF));
    }

    #[test]
    fn unexpected_character() {
        match WordLexer.lex("ok .") {
            Err(LexerError::UnexpectedCharacter {
                found,
                line,
                column,
                ..
            }) => assert_eq!((found, line, column), ('.', 1, 3)),
            result => panic!("unexpected {:?}", result),
        }
    }

    #[test]
    fn grammar_ebnf() {
        assert_eq!(grammar().to_ebnf(), "text := IDENTIFIER* EOF");
    }
}
