// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::fs;
use std::io;
use std::path::Path;

use crate::token::Token;

/// Errors raised while turning source text into tokens.
#[derive(Debug, thiserror::Error)]
pub enum LexerError {
    /// A character no token can start with.
    #[error("unexpected character {found:?} at line {line}, column {column}{}", in_uri(.uri))]
    UnexpectedCharacter {
        found: char,
        line: usize,
        column: usize,
        uri: Option<String>,
    },
    /// A token that was started but never finished, e.g. an unterminated comment.
    #[error("unterminated {what} starting at line {line}, column {column}")]
    Unterminated {
        what: &'static str,
        line: usize,
        column: usize,
    },
    /// Source text was requested but no lexer was configured.
    #[error("no lexer configured")]
    NotConfigured,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn in_uri(uri: &Option<String>) -> String {
    match uri {
        Some(uri) => format!(" in '{}'", uri),
        None => String::new(),
    }
}

/// A source of tokens.
///
/// Implementations must end their output with exactly one
/// [`generic::EOF`](crate::generic::EOF) token.
pub trait Lexer: Send + Sync {
    /// Splits `source` into tokens, tagging each with `uri` when one is given.
    fn lex_with_uri(&self, source: &str, uri: Option<&str>) -> Result<Vec<Token>, LexerError>;

    fn lex(&self, source: &str) -> Result<Vec<Token>, LexerError> {
        self.lex_with_uri(source, None)
    }

    fn lex_file(&self, path: &Path) -> Result<Vec<Token>, LexerError> {
        let source = fs::read_to_string(path)?;
        let uri = path.to_string_lossy();

        self.lex_with_uri(&source, Some(&uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let error = LexerError::UnexpectedCharacter {
            found: '.',
            line: 1,
            column: 4,
            uri: Some("a.txt".to_owned()),
        };

        assert_eq!(
            error.to_string(),
            "unexpected character '.' at line 1, column 4 in 'a.txt'"
        );
    }
}
