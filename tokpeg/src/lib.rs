// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.
//! # tokpeg
//!
//! Building blocks shared by every tokpeg crate: the [`Token`] model produced by lexers, the
//! [`Lexer`] contract, and the [`AstNode`] syntax tree built by successful parses.
//!
//! Grammars are defined with `tokpeg_meta` and run with `tokpeg_vm`.
#![warn(missing_debug_implementations, rust_2018_idioms, unused_qualifications)]

mod ast;
mod lexer;
mod token;
mod xml;

pub use crate::ast::{AstNode, AstNodeType, AstSkip, Descendants};
pub use crate::lexer::{Lexer, LexerError};
pub use crate::token::{generic, IncludedFrom, Token, TokenType, Trivia, TriviaKind};
pub use crate::xml::AstXmlPrinter;
