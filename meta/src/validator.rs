// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use tokpeg::generic;

use crate::ast::RuleId;
use crate::builder::{RuleSlot, RuleState};
use crate::error::GrammarError;

// Names already given to syntax tree nodes by tokens and combinators.
static RESERVED_NODE_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        generic::EOF.name(),
        generic::IDENTIFIER.name(),
        generic::LITERAL.name(),
        generic::CONSTANT.name(),
        generic::COMMENT.name(),
        generic::UNKNOWN_CHAR.name(),
        "till",
        "exclusive_till",
        "bridge",
        "any_token_but_not",
    ]
    .iter()
    .cloned()
    .collect()
});

pub(crate) fn validate_rules(rules: &[RuleSlot], root: RuleId) -> Vec<GrammarError> {
    let mut errors = vec![];

    errors.extend(validate_undefined(rules, root));
    errors.extend(validate_empty_combinators(rules));

    warn_reserved_names(rules);

    errors
}

/// Rules which are the root or are referenced by a defined rule, but have no definition.
pub(crate) fn validate_undefined(rules: &[RuleSlot], root: RuleId) -> Vec<GrammarError> {
    let mut errors = vec![];
    let mut reported = HashSet::new();

    let called_rules = rules
        .iter()
        .filter_map(|rule| rule.definition.as_ref())
        .flat_map(|expr| expr.referenced_rules());

    for rule in std::iter::once(root).chain(called_rules) {
        let slot = &rules[rule.0];

        if slot.state == RuleState::Undefined && reported.insert(rule) {
            errors.push(GrammarError::UndefinedRule(slot.name.clone()));
        }
    }

    errors
}

pub(crate) fn validate_empty_combinators(rules: &[RuleSlot]) -> Vec<GrammarError> {
    let mut errors = vec![];

    for rule in rules {
        if let Some(expr) = &rule.definition {
            expr.walk_top_down(|expr| {
                if expr.is_empty_combinator() {
                    errors.push(GrammarError::EmptyCombinator {
                        rule: rule.name.clone(),
                        combinator: expr.combinator_name(),
                    });
                }
            });
        }
    }

    errors
}

fn warn_reserved_names(rules: &[RuleSlot]) {
    for rule in rules {
        if RESERVED_NODE_NAMES.contains(rule.name.as_str()) {
            log::warn!(
                "rule '{}' has the same name as a token or combinator node, syntax trees will be ambiguous",
                rule.name
            );
        }
    }
}
