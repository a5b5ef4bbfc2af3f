// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.
//! # tokpeg. Grammar definition
//!
//! Grammars are written in Rust with the combinators of [`functions`] and the
//! [`GrammarBuilder`], which enforces the rule definition lifecycle. Building validates the
//! rules and compiles them into an immutable [`Grammar`] that `tokpeg_vm` runs.
#![warn(missing_debug_implementations, rust_2018_idioms, unused_qualifications)]

pub mod ast;
mod builder;
mod error;
pub mod functions;
mod grammar;
mod printer;
mod validator;

use std::fmt::Display;

pub use crate::ast::{Expr, RuleId};
pub use crate::builder::{GrammarBuilder, RuleDefinition, RuleState};
pub use crate::error::GrammarError;
pub use crate::grammar::{Grammar, GrammarRule, Matcher, MatcherId};

/// Unwraps the result of a grammar build, panicking with every reported error otherwise.
///
/// Meant for grammars defined in code, where an invalid grammar is a programming error.
pub fn unwrap_or_report<T, E>(res: Result<T, E>) -> T
where
    E: IntoIterator,
    E::Item: Display,
{
    res.unwrap_or_else(|e| {
        panic!(
            "{}",
            "grammar error\n\n".to_owned()
                + &e.into_iter()
                    .map(|error| format!("{}", error))
                    .collect::<Vec<_>>()
                    .join("\n\n")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "grammar error\n\nThe grammar has no root rule.")]
    fn report_build_errors() {
        unwrap_or_report(GrammarBuilder::new().build());
    }
}
