// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Grammar expressions as written by grammar authors.

use tokpeg::TokenType;

/// Handle to a rule of a [`GrammarBuilder`](crate::GrammarBuilder) or of the
/// [`Grammar`](crate::Grammar) built from it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RuleId(pub(crate) usize);

impl RuleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    /// Matches one token of the given type, e.g. `IDENTIFIER`
    TokenType(TokenType),
    /// Matches one token with the given value, e.g. `"class"`
    TokenValue { value: String, skipped: bool },
    /// Matches one token of any of the given types
    TokenTypes(Vec<TokenType>),
    /// Matches any single token except the end-of-stream sentinel
    AnyToken,
    /// Matches the rule, e.g. `classBody`
    Rule(RuleId),
    /// Matches all expressions in order, e.g. `e1 e2 e3`
    Sequence(Vec<Expr>),
    /// Matches the first expression that succeeds, e.g. `(e1 | e2)`
    Choice(Vec<Expr>),
    /// Optionally matches an expression, e.g. `e?`
    Opt(Box<Expr>),
    /// Matches an expression zero or more times, e.g. `e*`
    ZeroOrMore(Box<Expr>),
    /// Matches an expression one or more times, e.g. `e+`
    OneOrMore(Box<Expr>),
    /// Negative lookahead; matches if expression doesn't match, without making progress
    Not(Box<Expr>),
    /// Positive lookahead; matches expression without making progress
    Next(Box<Expr>),
    /// Matches one token the expression doesn't match
    AnyTokenButNot(Box<Expr>),
    /// Consumes tokens up to and including a match of the expression
    InclusiveTill(Box<Expr>),
    /// Consumes tokens until one of the expressions matches, without consuming that match
    ExclusiveTill(Vec<Expr>),
    /// Consumes the remaining tokens of the current line
    TillNewLine,
    /// Matches a balanced region opened by the first type and closed by the second one
    Bridge(TokenType, TokenType),
    /// Matches the expression only if it starts right after the previous token, with no
    /// whitespace in between
    Adjacent(Box<Expr>),
}

impl Expr {
    /// Visits `self` and every nested expression, parents first.
    pub fn walk_top_down<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a Expr),
    {
        fn walk_internal<'a, F>(expr: &'a Expr, f: &mut F)
        where
            F: FnMut(&'a Expr),
        {
            f(expr);

            match expr {
                Expr::Sequence(exprs) | Expr::Choice(exprs) | Expr::ExclusiveTill(exprs) => {
                    for expr in exprs {
                        walk_internal(expr, f);
                    }
                }
                Expr::Opt(expr)
                | Expr::ZeroOrMore(expr)
                | Expr::OneOrMore(expr)
                | Expr::Not(expr)
                | Expr::Next(expr)
                | Expr::AnyTokenButNot(expr)
                | Expr::InclusiveTill(expr)
                | Expr::Adjacent(expr) => walk_internal(expr, f),
                _ => (),
            }
        }

        walk_internal(self, &mut f)
    }

    /// Rules referenced anywhere in the expression, in order of appearance.
    pub fn referenced_rules(&self) -> Vec<RuleId> {
        let mut rules = vec![];

        self.walk_top_down(|expr| {
            if let Expr::Rule(rule) = expr {
                rules.push(*rule);
            }
        });

        rules
    }

    /// Returns `true` for a sequence or choice with nothing to match.
    pub fn is_empty_combinator(&self) -> bool {
        match self {
            Expr::Sequence(exprs) | Expr::Choice(exprs) | Expr::ExclusiveTill(exprs) => {
                exprs.is_empty()
            }
            Expr::TokenTypes(types) => types.is_empty(),
            _ => false,
        }
    }

    /// Combinator name used in diagnostics and in the matcher tree printer.
    pub fn combinator_name(&self) -> &'static str {
        match self {
            Expr::TokenType(_) => "token_type",
            Expr::TokenValue { .. } => "token_value",
            Expr::TokenTypes(_) => "is_one_of_them",
            Expr::AnyToken => "any_token",
            Expr::Rule(_) => "rule",
            Expr::Sequence(_) => "and",
            Expr::Choice(_) => "or",
            Expr::Opt(_) => "opt",
            Expr::ZeroOrMore(_) => "o2n",
            Expr::OneOrMore(_) => "one2n",
            Expr::Not(_) => "not",
            Expr::Next(_) => "next",
            Expr::AnyTokenButNot(_) => "any_token_but_not",
            Expr::InclusiveTill(_) => "till",
            Expr::ExclusiveTill(_) => "exclusive_till",
            Expr::TillNewLine => "till_new_line",
            Expr::Bridge(..) => "bridge",
            Expr::Adjacent(_) => "adjacent",
        }
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Expr {
        Expr::TokenValue {
            value: value.to_owned(),
            skipped: false,
        }
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Expr {
        Expr::TokenValue {
            value,
            skipped: false,
        }
    }
}

impl From<TokenType> for Expr {
    fn from(ty: TokenType) -> Expr {
        Expr::TokenType(ty)
    }
}

impl From<RuleId> for Expr {
    fn from(rule: RuleId) -> Expr {
        Expr::Rule(rule)
    }
}

#[cfg(test)]
mod tests {
    use tokpeg::generic;

    use super::*;

    #[test]
    fn walk_visits_parents_first() {
        let expr = Expr::Choice(vec![
            Expr::Sequence(vec![Expr::Rule(RuleId(0)), Expr::from("b")]),
            Expr::Next(Box::new(Expr::Not(Box::new(Expr::ZeroOrMore(Box::new(
                Expr::OneOrMore(Box::new(Expr::Opt(Box::new(Expr::ExclusiveTill(vec![
                    Expr::TokenType(generic::EOF),
                    Expr::Rule(RuleId(1)),
                ]))))),
            )))))),
        ]);

        let mut names = vec![];
        expr.walk_top_down(|expr| names.push(expr.combinator_name()));

        assert_eq!(
            names,
            vec![
                "or",
                "and",
                "rule",
                "token_value",
                "next",
                "not",
                "o2n",
                "one2n",
                "opt",
                "exclusive_till",
                "token_type",
                "rule"
            ]
        );
        assert_eq!(expr.referenced_rules(), vec![RuleId(0), RuleId(1)]);
    }

    #[test]
    fn empty_combinators() {
        assert!(Expr::Sequence(vec![]).is_empty_combinator());
        assert!(Expr::Choice(vec![]).is_empty_combinator());
        assert!(!Expr::Sequence(vec![Expr::AnyToken]).is_empty_combinator());
        assert!(!Expr::TillNewLine.is_empty_combinator());
    }
}
