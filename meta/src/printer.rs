// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Textual forms of grammars.
//!
//! The EBNF form is meant for humans and diagnostics: token values are printed bare, token
//! types and rules by name. The tree form mirrors the combinator calls that define a rule.

use crate::ast::RuleId;
use crate::grammar::{Grammar, Matcher, MatcherId};

pub(crate) fn rule_ebnf(grammar: &Grammar, rule: RuleId) -> String {
    let definition = grammar.rule(rule);

    match definition.body() {
        Some(body) => format!("{} := {}", definition.name(), matcher_ebnf(grammar, body)),
        None => format!("{} :=", definition.name()),
    }
}

pub(crate) fn matcher_ebnf(grammar: &Grammar, id: MatcherId) -> String {
    let all = |ids: &[MatcherId]| ids.iter().map(|&id| matcher_ebnf(grammar, id)).collect::<Vec<_>>();

    match grammar.matcher(id) {
        Matcher::TokenType(ty) => ty.name().to_owned(),
        Matcher::TokenValue { value, .. } => value.clone(),
        Matcher::TokenTypes(types) => format!(
            "({})",
            types.iter().map(|ty| ty.name()).collect::<Vec<_>>().join(" | ")
        ),
        Matcher::AnyToken => "anyToken".to_owned(),
        Matcher::Rule(rule) => grammar.rule(*rule).name().to_owned(),
        Matcher::Sequence(ids) => all(ids).join(" "),
        Matcher::Choice(ids) => format!("({})", all(ids).join(" | ")),
        Matcher::Opt(id) => format!("{}?", grouped_ebnf(grammar, *id)),
        Matcher::ZeroOrMore(id) => format!("{}*", grouped_ebnf(grammar, *id)),
        Matcher::OneOrMore(id) => format!("{}+", grouped_ebnf(grammar, *id)),
        Matcher::Not(id) => format!("!{}", grouped_ebnf(grammar, *id)),
        Matcher::Next(id) => format!("&{}", grouped_ebnf(grammar, *id)),
        Matcher::AnyTokenButNot(id) => format!("anyTokenButNot({})", matcher_ebnf(grammar, *id)),
        Matcher::InclusiveTill(id) => format!("till({})", matcher_ebnf(grammar, *id)),
        Matcher::ExclusiveTill(ids) => format!("exclusiveTill({})", all(ids).join(", ")),
        Matcher::TillNewLine => "tillNewLine()".to_owned(),
        Matcher::Bridge(from, to) => format!("bridge({}, {})", from.name(), to.name()),
        Matcher::Adjacent(id) => format!("adjacent({})", matcher_ebnf(grammar, *id)),
    }
}

// Sequences need parentheses when a suffix or prefix operator applies to all of them.
fn grouped_ebnf(grammar: &Grammar, id: MatcherId) -> String {
    match grammar.matcher(id) {
        Matcher::Sequence(ids) if ids.len() > 1 => format!("({})", matcher_ebnf(grammar, id)),
        _ => matcher_ebnf(grammar, id),
    }
}

pub(crate) fn rule_tree(grammar: &Grammar, rule: RuleId) -> String {
    let definition = grammar.rule(rule);

    match definition.body() {
        Some(body) => format!("{}.is({})", definition.name(), matcher_tree(grammar, body)),
        None => format!("{}.is()", definition.name()),
    }
}

fn matcher_tree(grammar: &Grammar, id: MatcherId) -> String {
    let call = |name: &str, ids: &[MatcherId]| {
        format!(
            "{}({})",
            name,
            ids.iter()
                .map(|&id| matcher_tree(grammar, id))
                .collect::<Vec<_>>()
                .join(", ")
        )
    };

    match grammar.matcher(id) {
        Matcher::TokenType(ty) => ty.name().to_owned(),
        Matcher::TokenValue { value, skipped: false } => format!("{:?}", value),
        Matcher::TokenValue { value, skipped: true } => format!("skipped({:?})", value),
        Matcher::TokenTypes(types) => format!(
            "is_one_of_them({})",
            types.iter().map(|ty| ty.name()).collect::<Vec<_>>().join(", ")
        ),
        Matcher::AnyToken => "any_token()".to_owned(),
        Matcher::Rule(rule) => grammar.rule(*rule).name().to_owned(),
        Matcher::Sequence(ids) => call("and", ids),
        Matcher::Choice(ids) => call("or", ids),
        Matcher::Opt(id) => call("opt", &[*id]),
        Matcher::ZeroOrMore(id) => call("o2n", &[*id]),
        Matcher::OneOrMore(id) => call("one2n", &[*id]),
        Matcher::Not(id) => call("not", &[*id]),
        Matcher::Next(id) => call("next", &[*id]),
        Matcher::AnyTokenButNot(id) => call("any_token_but_not", &[*id]),
        Matcher::InclusiveTill(id) => call("till", &[*id]),
        Matcher::ExclusiveTill(ids) => call("exclusive_till", ids),
        Matcher::TillNewLine => "till_new_line()".to_owned(),
        Matcher::Bridge(from, to) => format!("bridge({}, {})", from.name(), to.name()),
        Matcher::Adjacent(id) => call("adjacent", &[*id]),
    }
}
