// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Mini-C, a small C-like language: integer and void types, structs, functions, `if`,
//! `while`, and the usual arithmetic and relational operators.
//!
//! ```c
//! struct point {
//!     int x;
//!     int y;
//! }
//!
//! int distance(int a, int b) {
//!     int d = a - b;
//!     if (d < 0) d = 0 - d;
//!     return d;
//! }
//! ```
//!
//! Comments and `#` directives are not tokens: they are attached as trivia to the token that
//! follows them.

mod grammar;
mod lexer;

pub use self::grammar::{build, grammar};
pub use self::lexer::MiniCLexer;

/// Keyword token types.
pub mod keywords {
    use tokpeg::TokenType;

    pub const STRUCT: TokenType = TokenType::new("STRUCT", "struct");
    pub const INT: TokenType = TokenType::new("INT", "int");
    pub const VOID: TokenType = TokenType::new("VOID", "void");
    pub const RETURN: TokenType = TokenType::new("RETURN", "return");
    pub const IF: TokenType = TokenType::new("IF", "if");
    pub const ELSE: TokenType = TokenType::new("ELSE", "else");
    pub const WHILE: TokenType = TokenType::new("WHILE", "while");
    pub const CONTINUE: TokenType = TokenType::new("CONTINUE", "continue");
    pub const BREAK: TokenType = TokenType::new("BREAK", "break");
}

/// Punctuator token types.
pub mod punctuators {
    use tokpeg::TokenType;

    pub const PAREN_L: TokenType = TokenType::new("PAREN_L", "(");
    pub const PAREN_R: TokenType = TokenType::new("PAREN_R", ")");
    pub const BRACE_L: TokenType = TokenType::new("BRACE_L", "{");
    pub const BRACE_R: TokenType = TokenType::new("BRACE_R", "}");
    pub const EQ: TokenType = TokenType::new("EQ", "=");
    pub const COMMA: TokenType = TokenType::new("COMMA", ",");
    pub const SEMICOLON: TokenType = TokenType::new("SEMICOLON", ";");
    pub const ADD: TokenType = TokenType::new("ADD", "+");
    pub const SUB: TokenType = TokenType::new("SUB", "-");
    pub const MUL: TokenType = TokenType::new("MUL", "*");
    pub const DIV: TokenType = TokenType::new("DIV", "/");
    pub const EQEQ: TokenType = TokenType::new("EQEQ", "==");
    pub const NE: TokenType = TokenType::new("NE", "!=");
    pub const LT: TokenType = TokenType::new("LT", "<");
    pub const LTE: TokenType = TokenType::new("LTE", "<=");
    pub const GT: TokenType = TokenType::new("GT", ">");
    pub const GTE: TokenType = TokenType::new("GTE", ">=");
    pub const INC: TokenType = TokenType::new("INC", "++");
    pub const DEC: TokenType = TokenType::new("DEC", "--");
}

/// Integer literals.
pub const INTEGER: tokpeg::TokenType = tokpeg::TokenType::new("INTEGER", "INTEGER");

/// Tokens of a `#` directive, kept in trivia.
pub const PREPROCESSOR: tokpeg::TokenType = tokpeg::TokenType::new("PREPROCESSOR", "#");
