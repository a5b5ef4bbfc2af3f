// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Compiled, immutable grammars.

use std::collections::HashMap;
use std::sync::Arc;

use tokpeg::{AstSkip, TokenType};

use crate::ast::{Expr, RuleId};
use crate::builder::RuleSlot;
use crate::printer;

/// Index of a matcher in its [`Grammar`]. Memoization and diagnostics are keyed on it.
pub type MatcherId = usize;

/// A node of the compiled grammar. Children are referenced by id; a grammar is a graph
/// whose cycles only go through [`Matcher::Rule`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Matcher {
    TokenType(TokenType),
    TokenValue { value: String, skipped: bool },
    TokenTypes(Vec<TokenType>),
    AnyToken,
    Rule(RuleId),
    Sequence(Vec<MatcherId>),
    Choice(Vec<MatcherId>),
    Opt(MatcherId),
    ZeroOrMore(MatcherId),
    OneOrMore(MatcherId),
    Not(MatcherId),
    Next(MatcherId),
    AnyTokenButNot(MatcherId),
    InclusiveTill(MatcherId),
    ExclusiveTill(Vec<MatcherId>),
    TillNewLine,
    Bridge(TokenType, TokenType),
    Adjacent(MatcherId),
}

impl Matcher {
    /// Matchers whose results are worth caching per position: rule references and the
    /// combinators that scan an unbounded number of tokens.
    pub fn is_memoizable(&self) -> bool {
        matches!(
            self,
            Matcher::Rule(_)
                | Matcher::AnyTokenButNot(_)
                | Matcher::InclusiveTill(_)
                | Matcher::ExclusiveTill(_)
                | Matcher::Bridge(..)
        )
    }

    pub fn is_token_type(&self) -> bool {
        matches!(self, Matcher::TokenType(_) | Matcher::TokenTypes(_))
    }
}

/// A rule of a compiled grammar.
#[derive(Clone, Debug)]
pub struct GrammarRule {
    name: Arc<str>,
    body: Option<MatcherId>,
    skip: AstSkip,
}

impl GrammarRule {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name, as stored in syntax tree nodes.
    #[inline]
    pub fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    /// Definition of the rule. Only rules of grammars rendered before being validated can
    /// lack one.
    #[inline]
    pub fn body(&self) -> Option<MatcherId> {
        self.body
    }

    #[inline]
    pub fn skip(&self) -> AstSkip {
        self.skip
    }
}

/// An immutable grammar: an arena of matchers plus the rules pointing into it.
///
/// Grammars are obtained from [`GrammarBuilder::build`](crate::GrammarBuilder::build) and can
/// be shared between threads and parsers.
#[derive(Clone, Debug)]
pub struct Grammar {
    matchers: Vec<Matcher>,
    rules: Vec<GrammarRule>,
    names: HashMap<Arc<str>, RuleId>,
    root: RuleId,
}

impl Grammar {
    pub(crate) fn compile(slots: &[RuleSlot], root: RuleId) -> Grammar {
        // The matcher referencing rule `i` has id `i`, so that every reference to a rule
        // shares one memo entry per position.
        let mut matchers: Vec<Matcher> = (0..slots.len()).map(|i| Matcher::Rule(RuleId(i))).collect();
        let mut rules = Vec::with_capacity(slots.len());
        let mut names = HashMap::with_capacity(slots.len());

        for (i, slot) in slots.iter().enumerate() {
            let body = slot
                .definition
                .as_ref()
                .map(|expr| compile_expr(&mut matchers, expr));
            let name: Arc<str> = Arc::from(slot.name.as_str());

            names.insert(Arc::clone(&name), RuleId(i));
            rules.push(GrammarRule {
                name,
                body,
                skip: slot.skip,
            });
        }

        Grammar {
            matchers,
            rules,
            names,
            root,
        }
    }

    #[inline]
    pub fn matcher(&self, id: MatcherId) -> &Matcher {
        &self.matchers[id]
    }

    #[inline]
    pub fn matcher_count(&self) -> usize {
        self.matchers.len()
    }

    /// # Panics
    ///
    /// Panics if `rule` belongs to another grammar.
    #[inline]
    pub fn rule(&self, rule: RuleId) -> &GrammarRule {
        &self.rules[rule.0]
    }

    /// Id of the matcher referencing `rule`.
    #[inline]
    pub fn rule_matcher(&self, rule: RuleId) -> MatcherId {
        rule.0
    }

    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &GrammarRule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleId(i), rule))
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.names.get(name).copied()
    }

    #[inline]
    pub fn root(&self) -> RuleId {
        self.root
    }

    /// EBNF form of one rule, e.g. `list := ( IDENTIFIER* )`.
    pub fn ebnf(&self, rule: RuleId) -> String {
        printer::rule_ebnf(self, rule)
    }

    /// EBNF form of every rule, one per line, in definition order.
    pub fn to_ebnf(&self) -> String {
        self.rules()
            .map(|(id, _)| printer::rule_ebnf(self, id))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// EBNF form of any matcher, as used in diagnostics.
    pub fn matcher_ebnf(&self, id: MatcherId) -> String {
        printer::matcher_ebnf(self, id)
    }

    /// Definition of `rule` in combinator syntax, e.g. `foo.is(or("foo", "FOO"))`.
    pub fn matcher_tree(&self, rule: RuleId) -> String {
        printer::rule_tree(self, rule)
    }
}

fn compile_expr(matchers: &mut Vec<Matcher>, expr: &Expr) -> MatcherId {
    let matcher = match expr {
        Expr::Rule(rule) => return rule.0,
        Expr::TokenType(ty) => Matcher::TokenType(*ty),
        Expr::TokenValue { value, skipped } => Matcher::TokenValue {
            value: value.clone(),
            skipped: *skipped,
        },
        Expr::TokenTypes(types) => Matcher::TokenTypes(types.clone()),
        Expr::AnyToken => Matcher::AnyToken,
        Expr::Sequence(exprs) => Matcher::Sequence(compile_all(matchers, exprs)),
        Expr::Choice(exprs) => Matcher::Choice(compile_all(matchers, exprs)),
        Expr::Opt(expr) => Matcher::Opt(compile_expr(matchers, expr)),
        Expr::ZeroOrMore(expr) => Matcher::ZeroOrMore(compile_expr(matchers, expr)),
        Expr::OneOrMore(expr) => Matcher::OneOrMore(compile_expr(matchers, expr)),
        Expr::Not(expr) => Matcher::Not(compile_expr(matchers, expr)),
        Expr::Next(expr) => Matcher::Next(compile_expr(matchers, expr)),
        Expr::AnyTokenButNot(expr) => Matcher::AnyTokenButNot(compile_expr(matchers, expr)),
        Expr::InclusiveTill(expr) => Matcher::InclusiveTill(compile_expr(matchers, expr)),
        Expr::ExclusiveTill(exprs) => Matcher::ExclusiveTill(compile_all(matchers, exprs)),
        Expr::TillNewLine => Matcher::TillNewLine,
        Expr::Bridge(from, to) => Matcher::Bridge(*from, *to),
        Expr::Adjacent(expr) => Matcher::Adjacent(compile_expr(matchers, expr)),
    };

    matchers.push(matcher);
    matchers.len() - 1
}

fn compile_all(matchers: &mut Vec<Matcher>, exprs: &[Expr]) -> Vec<MatcherId> {
    exprs
        .iter()
        .map(|expr| compile_expr(matchers, expr))
        .collect()
}
