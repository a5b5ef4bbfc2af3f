// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! # tokpeg. Token-stream PEG parsing
//!
//! This crate interprets [`Grammar`]s built with `tokpeg_meta` over token streams. It is a
//! memoizing (packrat) recursive descent interpreter: ordered choice, backtracking and
//! furthest-failure tracking, producing either an [`AstNode`] tree or a positioned report.
//!
//! ```
//! use tokpeg::generic::{EOF, IDENTIFIER};
//! use tokpeg::Token;
//! use tokpeg_meta::{and, o2n, GrammarBuilder};
//! use tokpeg_vm::Parser;
//!
//! let mut g = GrammarBuilder::new();
//! let list = g.rule("list");
//! g.define(list).is(and!(IDENTIFIER, o2n!(",", IDENTIFIER), EOF)).unwrap();
//! g.set_root(list);
//!
//! let parser = Parser::builder(g.build().unwrap()).build();
//! let tokens = vec![
//!     Token::new(IDENTIFIER, "a"),
//!     Token::new(IDENTIFIER, ",").with_position(1, 1),
//!     Token::new(IDENTIFIER, "b").with_position(1, 2),
//!     Token::new(EOF, "EOF").with_position(1, 3),
//! ];
//!
//! let ast = parser.parse(tokens).unwrap();
//! assert_eq!(ast.name(), "list");
//! assert_eq!(ast.number_of_children(), 4);
//! ```

#![doc(html_root_url = "https://docs.rs/tokpeg_vm")]
#![warn(missing_debug_implementations, rust_2018_idioms, unused_qualifications)]

use tokpeg::generic::EOF;
use tokpeg::{AstNode, AstNodeType, Token, TokenType};
use tokpeg_meta::{Grammar, Matcher, MatcherId, RuleId};

use std::sync::Arc;

mod config;
mod error;
mod listener;
mod macros;
mod parser;
mod stack_trace;
mod state;

pub use crate::config::{ParserConfig, SOURCE_CODE_TOKENS_WINDOW};
pub use crate::error::{RecognitionError, RecognitionReport};
pub use crate::listener::ParsingEventListener;
pub use crate::parser::{Parser, ParserBuilder};
pub use crate::stack_trace::{ExtendedStackTrace, ParsingStackTrace, RuleFrame, TraceEntry};
pub use crate::state::{Expectation, NoMatch, Outpost, ParseResult, ParsingState, Statistics};

/// Interpreter of one grammar. Holds no per-parse data: all of it lives in the
/// [`ParsingState`] passed to every call.
#[derive(Clone, Copy, Debug)]
pub struct Vm<'g> {
    grammar: &'g Grammar,
}

impl<'g> Vm<'g> {
    pub fn new(grammar: &'g Grammar) -> Vm<'g> {
        Vm { grammar }
    }

    #[inline]
    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// Matches `rule` at the cursor and returns its node.
    ///
    /// The node is returned even when the rule is configured to be skipped from the tree;
    /// skipping only applies when a node is attached to a parent.
    pub fn parse_rule(&self, rule: RuleId, state: &mut ParsingState<'_>) -> ParseResult<AstNode> {
        let mut nodes = self.parse_matcher(self.grammar.rule_matcher(rule), state)?;

        nodes.pop().ok_or(NoMatch)
    }

    /// Matches the matcher `id` at the cursor. On success the cursor is after the matched
    /// tokens and the returned nodes are the contribution of the matcher to its parent; on
    /// failure the cursor is unchanged.
    pub fn parse_matcher(
        &self,
        id: MatcherId,
        state: &mut ParsingState<'_>,
    ) -> ParseResult<Vec<AstNode>> {
        match self.grammar.matcher(id) {
            Matcher::Rule(rule) => self.parse_rule_reference(id, *rule, state),
            matcher if matcher.is_memoizable() => {
                state.memoized(id, |state| self.dispatch(id, state))
            }
            _ => self.dispatch(id, state),
        }
    }

    fn parse_rule_reference(
        &self,
        id: MatcherId,
        rule: RuleId,
        state: &mut ParsingState<'_>,
    ) -> ParseResult<Vec<AstNode>> {
        let name = self.grammar.rule(rule).name();
        let start = state.cursor();

        state.enter_rule(rule, name);
        let result = state.memoized(id, |state| self.parse_rule_body(rule, state));
        state.exit_rule(name, start, result.is_ok());

        result
    }

    fn parse_rule_body(
        &self,
        rule: RuleId,
        state: &mut ParsingState<'_>,
    ) -> ParseResult<Vec<AstNode>> {
        state.count_evaluation();

        let definition = self.grammar.rule(rule);
        let body = definition.body().ok_or(NoMatch)?;
        let start = state.cursor();
        let token = state.peek().cloned();

        let children = state.sequence(|state| self.parse_matcher(body, state))?;

        let mut node = AstNode::new(
            AstNodeType::Rule(Arc::clone(definition.shared_name())),
            token,
            start,
        )
        .with_skip(definition.skip());
        node.add_children(children);
        node.set_to_index(state.cursor());

        Ok(vec![node])
    }

    fn dispatch(&self, id: MatcherId, state: &mut ParsingState<'_>) -> ParseResult<Vec<AstNode>> {
        state.count_evaluation();

        match self.grammar.matcher(id) {
            Matcher::TokenType(ty) => self.terminal(id, state, false, |token| token.is(*ty)),
            Matcher::TokenValue { value, skipped } => {
                self.terminal(id, state, *skipped, |token| token.value() == value.as_str())
            }
            Matcher::TokenTypes(types) => {
                self.terminal(id, state, false, |token| types.contains(&token.ty()))
            }
            Matcher::AnyToken => self.terminal(id, state, false, |token| !token.is(EOF)),
            Matcher::Rule(rule) => self.parse_rule_reference(id, *rule, state),
            Matcher::Sequence(ids) => state.sequence(|state| {
                let mut nodes = vec![];

                for &child in ids {
                    nodes.append(&mut self.parse_matcher(child, state)?);
                }

                Ok(nodes)
            }),
            Matcher::Choice(ids) => {
                for &child in ids {
                    if let Ok(nodes) = state.sequence(|state| self.parse_matcher(child, state)) {
                        return Ok(nodes);
                    }
                }

                Err(NoMatch)
            }
            Matcher::Opt(child) => state.optional(|state| self.parse_matcher(*child, state)),
            Matcher::ZeroOrMore(child) => {
                Ok(state.repeat(|state| self.parse_matcher(*child, state)))
            }
            Matcher::OneOrMore(child) => state.sequence(|state| {
                let start = state.cursor();
                let mut nodes = self.parse_matcher(*child, state)?;

                if state.cursor() > start {
                    nodes.append(&mut state.repeat(|state| self.parse_matcher(*child, state)));
                }

                Ok(nodes)
            }),
            Matcher::Not(child) => {
                if state.probe(|state| self.parse_matcher(*child, state)) {
                    state.record_failure(Expectation::Matcher(id));
                    Err(NoMatch)
                } else {
                    Ok(vec![])
                }
            }
            Matcher::Next(child) => state
                .lookahead(|state| self.parse_matcher(*child, state))
                .map(|_| vec![]),
            Matcher::AnyTokenButNot(child) => {
                if state.at_end() || state.probe(|state| self.parse_matcher(*child, state)) {
                    state.record_failure(Expectation::Matcher(id));
                    return Err(NoMatch);
                }

                Ok(state
                    .advance()
                    .map(|(index, token)| token_node(index, token))
                    .unwrap_or_default())
            }
            Matcher::InclusiveTill(child) => self.inclusive_till(*child, state),
            Matcher::ExclusiveTill(ids) => self.exclusive_till(ids, state),
            Matcher::TillNewLine => {
                let start = state.cursor();
                let line = match start {
                    0 => 1,
                    _ => state.token(start - 1).map_or(1, |token| token.line()),
                };

                while let Some(token) = state.peek() {
                    if token.line() != line || token.is(EOF) {
                        break;
                    }
                    state.advance();
                }

                Ok(vec![])
            }
            Matcher::Bridge(from, to) => self.bridge(id, *from, *to, state),
            Matcher::Adjacent(child) => {
                let cursor = state.cursor();
                let adjacent = cursor > 0
                    && match (state.token(cursor - 1), state.peek()) {
                        (Some(previous), Some(next)) => {
                            previous.line() == next.line()
                                && previous.end_column() == next.column()
                        }
                        _ => false,
                    };

                if !adjacent {
                    state.record_failure(Expectation::Matcher(id));
                    return Err(NoMatch);
                }

                self.parse_matcher(*child, state)
            }
        }
    }

    fn terminal<F>(
        &self,
        id: MatcherId,
        state: &mut ParsingState<'_>,
        skipped: bool,
        matches: F,
    ) -> ParseResult<Vec<AstNode>>
    where
        F: FnOnce(&Token) -> bool,
    {
        if state.peek().map_or(false, |token| matches(&**token)) {
            if let Some((index, token)) = state.advance() {
                return Ok(if skipped {
                    vec![]
                } else {
                    token_node(index, token)
                });
            }
        }

        state.record_failure(Expectation::Matcher(id));
        Err(NoMatch)
    }

    fn inclusive_till(
        &self,
        child: MatcherId,
        state: &mut ParsingState<'_>,
    ) -> ParseResult<Vec<AstNode>> {
        let start = state.cursor();
        let mut node = AstNode::new(AstNodeType::Synthetic("till"), state.peek().cloned(), start);

        loop {
            match self.parse_matcher(child, state) {
                Ok(nodes) => {
                    node.add_children(nodes);
                    node.set_to_index(state.cursor());

                    return Ok(vec![node]);
                }
                Err(NoMatch) => match state.advance() {
                    Some((index, token)) => node.add_children(token_node(index, token)),
                    None => {
                        state.set_cursor(start);

                        return Err(NoMatch);
                    }
                },
            }
        }
    }

    fn exclusive_till(
        &self,
        ids: &[MatcherId],
        state: &mut ParsingState<'_>,
    ) -> ParseResult<Vec<AstNode>> {
        let start = state.cursor();
        let mut node = AstNode::new(
            AstNodeType::Synthetic("exclusive_till"),
            state.peek().cloned(),
            start,
        );

        loop {
            let at_end = state.peek().map_or(true, |token| token.is(EOF));

            if at_end
                || ids
                    .iter()
                    .any(|&id| state.probe(|state| self.parse_matcher(id, state)))
            {
                break;
            }

            if let Some((index, token)) = state.advance() {
                node.add_children(token_node(index, token));
            }
        }

        node.set_to_index(state.cursor());

        Ok(vec![node])
    }

    fn bridge(
        &self,
        id: MatcherId,
        from: TokenType,
        to: TokenType,
        state: &mut ParsingState<'_>,
    ) -> ParseResult<Vec<AstNode>> {
        let start = state.cursor();

        if !state.peek().map_or(false, |token| token.is(from)) {
            state.record_failure(Expectation::Matcher(id));
            return Err(NoMatch);
        }

        let mut node = AstNode::new(AstNodeType::Synthetic("bridge"), state.peek().cloned(), start);
        let mut depth = 0usize;

        while let Some((index, token)) = state.advance() {
            if token.is(from) {
                depth += 1;
            } else if token.is(to) {
                depth -= 1;
            }

            node.add_children(token_node(index, token));

            if depth == 0 {
                node.set_to_index(state.cursor());

                return Ok(vec![node]);
            }
        }

        state.set_cursor(start);
        state.record_failure(Expectation::Matcher(id));

        Err(NoMatch)
    }
}

// Leaf for a consumed token, unless its type is skipped from the tree.
fn token_node(index: usize, token: Arc<Token>) -> Vec<AstNode> {
    if token.ty().has_to_be_skipped_from_ast() {
        vec![]
    } else {
        vec![AstNode::from_token(token, index)]
    }
}

#[cfg(test)]
mod tests {
    use tokpeg::generic::IDENTIFIER;
    use tokpeg_meta::{and, o2n, opt, or, GrammarBuilder};

    use super::*;

    fn words(words: &str) -> Vec<Token> {
        let mut tokens: Vec<_> = words
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| Token::new(IDENTIFIER, word).with_position(1, i * 2))
            .collect();
        tokens.push(Token::new(EOF, "EOF").with_position(2, 0));
        tokens
    }

    #[test]
    fn choice_is_ordered() {
        let mut g = GrammarBuilder::new();
        let root = g.rule("root");
        g.define(root).is(or!(and!("a"), and!("a", "b"))).unwrap();
        g.set_root(root);
        let grammar = g.build().unwrap();

        let vm = Vm::new(&grammar);
        let mut state = ParsingState::new(words("a b"));
        let node = vm.parse_rule(root, &mut state).unwrap();

        assert_eq!(node.number_of_children(), 1);
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn zero_width_repetition_stops() {
        let mut g = GrammarBuilder::new();
        let root = g.rule("root");
        g.define(root).is(and!(o2n!(opt!("x")), EOF)).unwrap();
        g.set_root(root);
        let grammar = g.build().unwrap();

        let vm = Vm::new(&grammar);
        let mut state = ParsingState::new(words(""));

        assert!(vm.parse_rule(root, &mut state).is_ok());
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn failure_restores_cursor() {
        let mut g = GrammarBuilder::new();
        let root = g.rule("root");
        g.define(root).is(and!("a", "c")).unwrap();
        g.set_root(root);
        let grammar = g.build().unwrap();

        let vm = Vm::new(&grammar);
        let mut state = ParsingState::new(words("a b"));

        assert_eq!(vm.parse_rule(root, &mut state), Err(NoMatch));
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.outpost().map(|outpost| outpost.index), Some(1));
    }
}
