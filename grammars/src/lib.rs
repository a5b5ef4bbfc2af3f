// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! # tokpeg grammars
//!
//! Contains a series of default lexers and grammars, looked up by name with [`language`].

#![doc(html_root_url = "https://docs.rs/tokpeg_grammars")]
#![warn(missing_debug_implementations, rust_2018_idioms, unused_qualifications)]

use std::sync::Arc;

use tokpeg::{Lexer, Token, TokenType};
use tokpeg_meta::Grammar;

pub mod minic;
pub mod words;

/// Names of the languages available through [`language`].
pub const LANGUAGES: &[&str] = &["minic", "words"];

/// Grammar and lexer of a language known to this crate.
pub fn language(name: &str) -> Option<(Arc<Grammar>, Arc<dyn Lexer>)> {
    match name {
        "minic" => Some((minic::grammar(), Arc::new(minic::MiniCLexer))),
        "words" => Some((words::grammar(), Arc::new(words::WordLexer))),
        _ => None,
    }
}

// Line and column of byte offsets, computed incrementally as a lexer moves forward.
pub(crate) struct Positions<'s> {
    source: &'s str,
    scanned: usize,
    line: usize,
    line_start: usize,
}

impl<'s> Positions<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        Positions {
            source,
            scanned: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// Offsets must not decrease between calls.
    pub(crate) fn at(&mut self, offset: usize) -> (usize, usize) {
        for (i, c) in self.source[self.scanned..offset].char_indices() {
            if c == '\n' {
                self.line += 1;
                self.line_start = self.scanned + i + 1;
            }
        }
        self.scanned = offset;

        (self.line, self.source[self.line_start..offset].chars().count())
    }
}

pub(crate) fn token(
    ty: TokenType,
    value: &str,
    (line, column): (usize, usize),
    uri: &Option<Arc<str>>,
) -> Token {
    let token = Token::new(ty, value).with_position(line, column);

    match uri {
        Some(uri) => token.with_uri(Arc::clone(uri)),
        None => token,
    }
}
