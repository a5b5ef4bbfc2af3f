// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Combinator functions used to write rule definitions.
//!
//! String arguments stand for token values, [`TokenType`]s for token types and
//! [`RuleId`](crate::RuleId)s for rule references. The variadic combinators have macro
//! counterparts accepting a mix of those:
//!
//! ```
//! # use tokpeg::generic::{EOF, IDENTIFIER};
//! # use tokpeg_meta::{and, o2n, or, GrammarBuilder};
//! let mut g = GrammarBuilder::new();
//! let list = g.rule("list");
//! g.define(list)
//!     .is(and!("(", o2n!(or!(IDENTIFIER, ",")), ")", EOF))
//!     .unwrap();
//!
//! assert_eq!(g.ebnf(list), "list := ( (IDENTIFIER | ,)* ) EOF");
//! ```

use tokpeg::TokenType;

use crate::ast::Expr;

fn collect<I, E>(exprs: I) -> Vec<Expr>
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    exprs.into_iter().map(Into::into).collect()
}

fn single_or<F>(mut exprs: Vec<Expr>, wrap: F) -> Expr
where
    F: FnOnce(Vec<Expr>) -> Expr,
{
    if exprs.len() == 1 {
        exprs.remove(0)
    } else {
        wrap(exprs)
    }
}

/// Sequence; a single element is returned as is.
pub fn and<I, E>(exprs: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    single_or(collect(exprs), Expr::Sequence)
}

/// Ordered choice; a single element is returned as is.
pub fn or<I, E>(exprs: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    single_or(collect(exprs), Expr::Choice)
}

pub fn opt<I, E>(exprs: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::Opt(Box::new(and(exprs)))
}

pub fn o2n<I, E>(exprs: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::ZeroOrMore(Box::new(and(exprs)))
}

pub fn one2n<I, E>(exprs: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::OneOrMore(Box::new(and(exprs)))
}

pub fn not(expr: impl Into<Expr>) -> Expr {
    Expr::Not(Box::new(expr.into()))
}

pub fn next(expr: impl Into<Expr>) -> Expr {
    Expr::Next(Box::new(expr.into()))
}

/// Token value which leaves no node in the syntax tree.
pub fn skipped(value: impl Into<String>) -> Expr {
    Expr::TokenValue {
        value: value.into(),
        skipped: true,
    }
}

pub fn any_token() -> Expr {
    Expr::AnyToken
}

pub fn any_token_but_not(expr: impl Into<Expr>) -> Expr {
    Expr::AnyTokenButNot(Box::new(expr.into()))
}

pub fn is_one_of_them(types: &[TokenType]) -> Expr {
    Expr::TokenTypes(types.to_vec())
}

/// Consumes tokens up to and including the first match of `expr`.
pub fn till(expr: impl Into<Expr>) -> Expr {
    Expr::InclusiveTill(Box::new(expr.into()))
}

/// Consumes tokens up to, but excluding, the first match of any of `exprs`.
pub fn exclusive_till<I, E>(exprs: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::ExclusiveTill(collect(exprs))
}

pub fn till_new_line() -> Expr {
    Expr::TillNewLine
}

/// Balanced region from a `from` token to its matching `to` token, nesting included.
pub fn bridge(from: TokenType, to: TokenType) -> Expr {
    Expr::Bridge(from, to)
}

pub fn adjacent(expr: impl Into<Expr>) -> Expr {
    Expr::Adjacent(Box::new(expr.into()))
}

#[doc(hidden)]
#[macro_export]
macro_rules! __exprs {
    ( $( $e:expr ),* ) => {
        {
            let exprs: ::std::vec::Vec<$crate::Expr> = ::std::vec![ $( $crate::Expr::from($e) ),* ];
            exprs
        }
    };
}

/// Variadic [`and`](crate::functions::and).
#[macro_export]
macro_rules! and {
    ( $( $e:expr ),* $(,)? ) => {
        $crate::functions::and($crate::__exprs!($( $e ),*))
    };
}

/// Variadic [`or`](crate::functions::or).
#[macro_export]
macro_rules! or {
    ( $( $e:expr ),* $(,)? ) => {
        $crate::functions::or($crate::__exprs!($( $e ),*))
    };
}

/// Variadic [`opt`](crate::functions::opt).
#[macro_export]
macro_rules! opt {
    ( $( $e:expr ),* $(,)? ) => {
        $crate::functions::opt($crate::__exprs!($( $e ),*))
    };
}

/// Variadic [`o2n`](crate::functions::o2n).
#[macro_export]
macro_rules! o2n {
    ( $( $e:expr ),* $(,)? ) => {
        $crate::functions::o2n($crate::__exprs!($( $e ),*))
    };
}

/// Variadic [`one2n`](crate::functions::one2n).
#[macro_export]
macro_rules! one2n {
    ( $( $e:expr ),* $(,)? ) => {
        $crate::functions::one2n($crate::__exprs!($( $e ),*))
    };
}

/// Variadic [`exclusive_till`](crate::functions::exclusive_till).
#[macro_export]
macro_rules! exclusive_till {
    ( $( $e:expr ),* $(,)? ) => {
        $crate::functions::exclusive_till($crate::__exprs!($( $e ),*))
    };
}

#[cfg(test)]
mod tests {
    use tokpeg::generic::{EOF, IDENTIFIER};

    use super::*;

    #[test]
    fn single_element_is_unwrapped() {
        assert_eq!(and(["a"]), Expr::from("a"));
        assert_eq!(or([IDENTIFIER]), Expr::TokenType(IDENTIFIER));
        assert_eq!(
            opt(["a"]),
            Expr::Opt(Box::new(Expr::from("a")))
        );
    }

    #[test]
    fn macros_accept_mixed_arguments() {
        let expr = and!("a", IDENTIFIER, or!("b", EOF));

        assert_eq!(
            expr,
            Expr::Sequence(vec![
                Expr::from("a"),
                Expr::TokenType(IDENTIFIER),
                Expr::Choice(vec![Expr::from("b"), Expr::TokenType(EOF)]),
            ])
        );
        assert_eq!(and!(), Expr::Sequence(vec![]));
        assert_eq!(
            exclusive_till!("a", EOF),
            Expr::ExclusiveTill(vec![Expr::from("a"), Expr::TokenType(EOF)])
        );
    }

    #[test]
    fn skipped_values() {
        assert_eq!(
            skipped(";"),
            Expr::TokenValue {
                value: ";".to_owned(),
                skipped: true
            }
        );
    }
}
