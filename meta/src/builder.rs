// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::collections::HashMap;

use tokpeg::AstSkip;

use crate::ast::{Expr, RuleId};
use crate::error::GrammarError;
use crate::functions;
use crate::grammar::Grammar;
use crate::validator;

/// Lifecycle of a rule definition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RuleState {
    /// Declared, possibly referenced, but without a definition.
    Undefined,
    /// Defined once with `is`, possibly extended with `or`.
    Defined,
    /// Replaced with `override_definition` or `mock`; `is` is refused from now on.
    Overridden,
}

#[derive(Clone, Debug)]
pub(crate) struct RuleSlot {
    pub(crate) name: String,
    pub(crate) state: RuleState,
    pub(crate) definition: Option<Expr>,
    pub(crate) skip: AstSkip,
}

/// Collects rule definitions and builds them into a [`Grammar`].
///
/// Rules are declared by name first, so that they can reference each other in any order:
///
/// ```
/// # use tokpeg::generic::{EOF, IDENTIFIER};
/// # use tokpeg_meta::{and, o2n, GrammarBuilder};
/// let mut g = GrammarBuilder::new();
/// let list = g.rule("list");
/// let item = g.rule("item");
///
/// g.define(list).is(and!(item, o2n!(",", item), EOF)).unwrap();
/// g.define(item).is(IDENTIFIER).unwrap();
/// g.set_root(list);
///
/// let grammar = g.build().unwrap();
/// assert_eq!(grammar.ebnf(list), "list := item (, item)* EOF");
/// ```
#[derive(Clone, Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<RuleSlot>,
    names: HashMap<String, RuleId>,
    root: Option<RuleId>,
}

impl GrammarBuilder {
    pub fn new() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    /// Returns the rule called `name`, declaring it if needed.
    pub fn rule(&mut self, name: &str) -> RuleId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }

        let id = RuleId(self.rules.len());
        self.rules.push(RuleSlot {
            name: name.to_owned(),
            state: RuleState::Undefined,
            definition: None,
            skip: AstSkip::Never,
        });
        self.names.insert(name.to_owned(), id);

        id
    }

    /// Starts (re)defining `rule`.
    ///
    /// Rule ids are plain indices in declaration order. An id obtained from another builder
    /// designates the rule declared at the same position in this one.
    ///
    /// # Panics
    ///
    /// Panics if no rule of this builder has the index of `rule`.
    pub fn define(&mut self, rule: RuleId) -> RuleDefinition<'_> {
        assert!(rule.0 < self.rules.len(), "unknown rule {:?}", rule);

        RuleDefinition { builder: self, rule }
    }

    pub fn set_root(&mut self, rule: RuleId) -> &mut GrammarBuilder {
        self.root = Some(rule);
        self
    }

    pub fn name(&self, rule: RuleId) -> &str {
        &self.rules[rule.0].name
    }

    pub fn state(&self, rule: RuleId) -> RuleState {
        self.rules[rule.0].state
    }

    pub fn skip(&self, rule: RuleId) -> AstSkip {
        self.rules[rule.0].skip
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.names.get(name).copied()
    }

    /// EBNF form of `rule` as currently defined; see [`Grammar::ebnf`].
    pub fn ebnf(&self, rule: RuleId) -> String {
        Grammar::compile(&self.rules, rule).ebnf(rule)
    }

    /// Current definition of `rule` in combinator syntax; see [`Grammar::matcher_tree`].
    pub fn matcher_tree(&self, rule: RuleId) -> String {
        Grammar::compile(&self.rules, rule).matcher_tree(rule)
    }

    /// Validates the definitions and compiles them.
    ///
    /// All problems found are reported at once.
    pub fn build(self) -> Result<Grammar, Vec<GrammarError>> {
        let root = match self.root {
            Some(root) => root,
            None => return Err(vec![GrammarError::MissingRoot]),
        };

        let errors = validator::validate_rules(&self.rules, root);
        if !errors.is_empty() {
            return Err(errors);
        }

        let grammar = Grammar::compile(&self.rules, root);
        log::debug!(
            "built grammar with {} rules and {} matchers, root '{}'",
            self.rules.len(),
            grammar.matcher_count(),
            self.rules[root.0].name
        );

        Ok(grammar)
    }
}

/// Definition in progress of one rule, obtained from [`GrammarBuilder::define`].
///
/// Every call returns the definition again so that calls can be chained with `?`.
#[derive(Debug)]
pub struct RuleDefinition<'g> {
    builder: &'g mut GrammarBuilder,
    rule: RuleId,
}

impl<'g> RuleDefinition<'g> {
    fn slot(&mut self) -> &mut RuleSlot {
        &mut self.builder.rules[self.rule.0]
    }

    fn name(&self) -> String {
        self.builder.rules[self.rule.0].name.clone()
    }

    #[inline]
    pub fn id(&self) -> RuleId {
        self.rule
    }

    /// Gives the rule its definition. Fails if the rule already has one.
    pub fn is(mut self, expr: impl Into<Expr>) -> Result<RuleDefinition<'g>, GrammarError> {
        let expr = expr.into();

        if self.slot().state != RuleState::Undefined {
            return Err(GrammarError::AlreadyDefined(self.name()));
        }
        if expr.is_empty_combinator() {
            return Err(GrammarError::EmptyDefinition(self.name()));
        }

        log::trace!("defining rule '{}'", self.name());
        let slot = self.slot();
        slot.definition = Some(expr);
        slot.state = RuleState::Defined;

        Ok(self)
    }

    /// Same as `is(or(alternatives))`.
    pub fn is_or<I, E>(self, alternatives: I) -> Result<RuleDefinition<'g>, GrammarError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.is(functions::or(alternatives))
    }

    /// Adds an alternative after the current definition: `a` becomes `(a | expr)`.
    pub fn or(mut self, expr: impl Into<Expr>) -> Result<RuleDefinition<'g>, GrammarError> {
        let expr = expr.into();

        if expr.is_empty_combinator() {
            return Err(GrammarError::EmptyDefinition(self.name()));
        }

        let name = self.name();
        let slot = self.slot();
        match slot.definition.take() {
            Some(previous) => {
                slot.definition = Some(Expr::Choice(vec![previous, expr]));
                Ok(self)
            }
            None => Err(GrammarError::AlternativeBeforeDefinition(name)),
        }
    }

    /// Replaces the definition, whatever the current state.
    pub fn override_definition(
        mut self,
        expr: impl Into<Expr>,
    ) -> Result<RuleDefinition<'g>, GrammarError> {
        let expr = expr.into();

        if expr.is_empty_combinator() {
            return Err(GrammarError::EmptyDefinition(self.name()));
        }

        log::trace!("overriding rule '{}'", self.name());
        let slot = self.slot();
        slot.definition = Some(expr);
        slot.state = RuleState::Overridden;

        Ok(self)
    }

    /// Replaces the definition by a choice between the rule name and its upper-case form,
    /// so that the rule can be tested in isolation.
    pub fn mock(mut self) -> RuleDefinition<'g> {
        let name = self.name();
        let slot = self.slot();
        slot.definition = Some(functions::or([name.clone(), name.to_uppercase()]));
        slot.state = RuleState::Overridden;

        self
    }

    /// The rule's node is replaced by its children in the syntax tree.
    pub fn skip(mut self) -> RuleDefinition<'g> {
        self.slot().skip = AstSkip::Always;
        self
    }

    /// The rule's node is replaced by its only child when it has exactly one.
    pub fn skip_if_one_child(mut self) -> RuleDefinition<'g> {
        self.slot().skip = AstSkip::IfOneChild;
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokpeg::generic::IDENTIFIER;

    use super::*;
    use crate::{and, opt, or};

    #[test]
    fn foreign_ids_are_positional() {
        let mut other = GrammarBuilder::new();
        let first = other.rule("first");

        let mut g = GrammarBuilder::new();
        let a = g.rule("a");
        g.define(first).is("x").unwrap();

        assert_eq!(g.state(a), RuleState::Defined);
        assert_eq!(g.ebnf(a), "a := x");
    }

    #[test]
    #[should_panic(expected = "unknown rule")]
    fn foreign_id_out_of_range() {
        let mut other = GrammarBuilder::new();
        other.rule("first");
        let second = other.rule("second");

        let mut g = GrammarBuilder::new();
        g.rule("a");
        let _ = g.define(second);
    }

    #[test]
    fn rule_is_declared_once() {
        let mut g = GrammarBuilder::new();
        let a = g.rule("a");

        assert_eq!(g.rule("a"), a);
        assert_ne!(g.rule("b"), a);
        assert_eq!(g.state(a), RuleState::Undefined);
    }

    #[test]
    fn empty_is() {
        let mut g = GrammarBuilder::new();
        let rule = g.rule("MyRule");

        assert_eq!(
            g.define(rule).is(and!()).unwrap_err().to_string(),
            "The rule 'MyRule' should at least contains one matcher."
        );
        assert_eq!(
            g.define(rule).is_or(Vec::<Expr>::new()).unwrap_err(),
            GrammarError::EmptyDefinition("MyRule".to_owned())
        );
        assert_eq!(g.state(rule), RuleState::Undefined);
    }

    #[test]
    fn more_than_one_definition() {
        let mut g = GrammarBuilder::new();
        let rule = g.rule("MyRule");

        g.define(rule).is("option1").unwrap();

        assert_eq!(
            g.define(rule).is("option2").unwrap_err().to_string(),
            "The rule 'MyRule' has already been defined somewhere in the grammar."
        );
        assert_eq!(g.matcher_tree(rule), "MyRule.is(\"option1\")");
    }

    #[test]
    fn override_definition() {
        let mut g = GrammarBuilder::new();
        let rule = g.rule("MyRule");

        g.define(rule).is("option1").unwrap();
        assert_eq!(g.matcher_tree(rule), "MyRule.is(\"option1\")");

        g.define(rule).override_definition("option2").unwrap();
        assert_eq!(g.matcher_tree(rule), "MyRule.is(\"option2\")");
        assert_eq!(g.state(rule), RuleState::Overridden);

        assert_eq!(
            g.define(rule).is("option3").unwrap_err(),
            GrammarError::AlreadyDefined("MyRule".to_owned())
        );
    }

    #[test]
    fn override_undefined_rule() {
        let mut g = GrammarBuilder::new();
        let rule = g.rule("MyRule");

        g.define(rule).override_definition("option1").unwrap();

        assert_eq!(g.matcher_tree(rule), "MyRule.is(\"option1\")");
    }

    #[test]
    fn mock() {
        let mut g = GrammarBuilder::new();
        let rule = g.rule("foo");

        g.define(rule).mock();

        assert_eq!(g.matcher_tree(rule), "foo.is(or(\"foo\", \"FOO\"))");
        assert_eq!(
            g.define(rule).is("bar").unwrap_err().to_string(),
            "The rule 'foo' has already been defined somewhere in the grammar."
        );
    }

    #[test]
    fn or_nests_previous_definition() {
        let mut g = GrammarBuilder::new();
        let rule = g.rule("MyRule");

        g.define(rule)
            .is("option1")
            .and_then(|d| d.or("option2"))
            .and_then(|d| d.or(and!("option3", "option4")))
            .unwrap();

        assert_eq!(
            g.ebnf(rule),
            "MyRule := ((option1 | option2) | option3 option4)"
        );
    }

    #[test]
    fn or_before_is() {
        let mut g = GrammarBuilder::new();
        let rule = g.rule("MyRule");

        assert_eq!(
            g.define(rule).or("option1").unwrap_err(),
            GrammarError::AlternativeBeforeDefinition("MyRule".to_owned())
        );
    }

    #[test]
    fn is_or() {
        let mut g = GrammarBuilder::new();
        let rule = g.rule("MyRule");

        g.define(rule).is_or(["a", "b"]).unwrap();

        assert_eq!(g.ebnf(rule), "MyRule := (a | b)");
    }

    #[test]
    fn skip_policies() {
        let mut g = GrammarBuilder::new();
        let a = g.rule("a");
        let b = g.rule("b");

        g.define(a).is(opt!(IDENTIFIER)).unwrap().skip();
        g.define(b).is(or!(a, "x")).unwrap().skip_if_one_child();

        assert_eq!(g.skip(a), AstSkip::Always);
        assert_eq!(g.skip(b), AstSkip::IfOneChild);
    }

    #[test]
    fn build_without_root() {
        let mut g = GrammarBuilder::new();
        let a = g.rule("a");
        g.define(a).is("a").unwrap();

        assert_eq!(g.build().unwrap_err(), vec![GrammarError::MissingRoot]);
    }
}
