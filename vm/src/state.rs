// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::collections::HashMap;
use std::sync::Arc;

use tokpeg::{AstNode, Token};
use tokpeg_meta::{MatcherId, RuleId};

use crate::config::ParserConfig;
use crate::listener::ParsingEventListener;
use crate::stack_trace::RuleFrame;

/// Outcome of running a matcher: `Err(NoMatch)` means the matcher failed and left the cursor
/// where it was.
pub type ParseResult<T> = Result<T, NoMatch>;

/// Failure of a matcher. Details live in the [`ParsingState`] outpost.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NoMatch;

/// What the parser was looking for at the furthest failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Expectation {
    Matcher(MatcherId),
    /// The root rule matched but tokens were left over.
    EndOfInput,
}

/// The furthest failure seen so far.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Outpost {
    pub expected: Expectation,
    /// Index of the token at which the expectation failed; equals the stream length when the
    /// stream ran out.
    pub index: usize,
    /// Active rules at the failure, outermost first. Only filled in extended mode.
    pub trace: Vec<RuleFrame>,
}

/// Counters of the work done by one parse.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Statistics {
    /// Matchers actually run.
    pub evaluations: usize,
    /// Matchers answered from the memo.
    pub memo_hits: usize,
}

// The nodes share their subtrees with the tree being built, storing or replaying them costs
// one reference count per node.
#[derive(Clone, Debug)]
struct MemoEntry {
    result: ParseResult<(usize, Vec<AstNode>)>,
    outpost: Option<Outpost>,
    depth: usize,
}

/// Mutable state of one parse: the token stream and cursor, the memo table, the furthest
/// failure and the rule frames of the extended stack trace.
///
/// A state is used by a single parse on a single thread. Many states can run concurrently
/// over the same [`Grammar`](tokpeg_meta::Grammar).
pub struct ParsingState<'l> {
    tokens: Vec<Arc<Token>>,
    cursor: usize,
    memo: HashMap<(MatcherId, usize), MemoEntry>,
    outpost: Option<Outpost>,
    frames: Option<Vec<RuleFrame>>,
    listeners: &'l [Arc<dyn ParsingEventListener>],
    config: ParserConfig,
    statistics: Statistics,
}

impl ParsingState<'static> {
    /// Creates a state with the default configuration and no listeners.
    pub fn new(tokens: Vec<Token>) -> ParsingState<'static> {
        ParsingState::with_config(tokens, ParserConfig::default(), &[])
    }
}

impl<'l> ParsingState<'l> {
    pub fn with_config(
        tokens: Vec<Token>,
        config: ParserConfig,
        listeners: &'l [Arc<dyn ParsingEventListener>],
    ) -> ParsingState<'l> {
        ParsingState {
            tokens: tokens.into_iter().map(Arc::new).collect(),
            cursor: 0,
            memo: HashMap::new(),
            outpost: None,
            frames: config.extended_stack_trace.then(Vec::new),
            listeners,
            config,
            statistics: Statistics::default(),
        }
    }

    /// Index of the next token to match.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns `true` once every token has been consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    #[inline]
    pub fn token(&self, index: usize) -> Option<&Arc<Token>> {
        self.tokens.get(index)
    }

    #[inline]
    pub fn tokens(&self) -> &[Arc<Token>] {
        &self.tokens
    }

    /// The token at the cursor, if any.
    #[inline]
    pub fn peek(&self) -> Option<&Arc<Token>> {
        self.tokens.get(self.cursor)
    }

    /// Consumes the token at the cursor, returning it with its index.
    pub fn advance(&mut self) -> Option<(usize, Arc<Token>)> {
        let token = Arc::clone(self.tokens.get(self.cursor)?);
        let index = self.cursor;
        self.cursor += 1;

        Some((index, token))
    }

    #[inline]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    #[inline]
    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    #[inline]
    pub fn outpost(&self) -> Option<&Outpost> {
        self.outpost.as_ref()
    }

    /// Returns `true` if the furthest failure happened after the first token, i.e. the parse
    /// made some progress before failing.
    pub fn has_progressed(&self) -> bool {
        self.outpost.as_ref().map_or(false, |outpost| outpost.index > 0)
    }

    /// Records a failure to match `expected` at the cursor. Failures at or beyond the current
    /// outpost replace it.
    pub fn record_failure(&mut self, expected: Expectation) {
        let index = self.cursor;

        if self.outpost.as_ref().map_or(true, |outpost| index >= outpost.index) {
            self.outpost = Some(Outpost {
                expected,
                index,
                trace: self.frames.clone().unwrap_or_default(),
            });
        }
    }

    fn merge_outpost(&mut self, outpost: Option<Outpost>) {
        if let Some(outpost) = outpost {
            if self
                .outpost
                .as_ref()
                .map_or(true, |current| outpost.index >= current.index)
            {
                self.outpost = Some(outpost);
            }
        }
    }

    /// Runs `f`, restoring the cursor if it fails.
    #[inline]
    pub fn sequence<T, F>(&mut self, f: F) -> ParseResult<T>
    where
        F: FnOnce(&mut Self) -> ParseResult<T>,
    {
        let start = self.cursor;
        let result = f(self);

        if result.is_err() {
            self.cursor = start;
        }

        result
    }

    /// Runs `f`, turning a failure into an empty match.
    #[inline]
    pub fn optional<F>(&mut self, f: F) -> ParseResult<Vec<AstNode>>
    where
        F: FnOnce(&mut Self) -> ParseResult<Vec<AstNode>>,
    {
        Ok(self.sequence(f).unwrap_or_default())
    }

    /// Runs `f` as long as it matches. An iteration which matches without consuming any token
    /// ends the repetition.
    pub fn repeat<F>(&mut self, mut f: F) -> Vec<AstNode>
    where
        F: FnMut(&mut Self) -> ParseResult<Vec<AstNode>>,
    {
        let mut nodes = vec![];

        loop {
            let start = self.cursor;

            match self.sequence(&mut f) {
                Ok(mut matched) => {
                    nodes.append(&mut matched);

                    if self.cursor == start {
                        break;
                    }
                }
                Err(NoMatch) => break,
            }
        }

        nodes
    }

    /// Runs `f` and moves the cursor back, keeping the result.
    #[inline]
    pub fn lookahead<T, F>(&mut self, f: F) -> ParseResult<T>
    where
        F: FnOnce(&mut Self) -> ParseResult<T>,
    {
        let start = self.cursor;
        let result = f(self);
        self.cursor = start;

        result
    }

    /// Tests whether `f` matches, leaving neither the cursor nor the outpost changed: failures
    /// inside a probe are expected and say nothing about the input.
    pub fn probe<T, F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut Self) -> ParseResult<T>,
    {
        let outpost = self.outpost.take();
        let matched = self.lookahead(f).is_ok();
        self.outpost = outpost;

        matched
    }

    #[inline]
    pub(crate) fn count_evaluation(&mut self) {
        self.statistics.evaluations += 1;
    }

    /// Runs `f` for the matcher `id` at the cursor, or replays its recorded effect: the same
    /// nodes, end position and furthest failure.
    pub(crate) fn memoized<F>(&mut self, id: MatcherId, f: F) -> ParseResult<Vec<AstNode>>
    where
        F: FnOnce(&mut Self) -> ParseResult<Vec<AstNode>>,
    {
        if !self.config.memoization {
            return f(self);
        }

        let start = self.cursor;

        if let Some(entry) = self.memo.get(&(id, start)) {
            let entry = entry.clone();
            self.statistics.memo_hits += 1;

            return self.replay(entry);
        }

        let depth = self.depth();
        let outpost = self.outpost.take();
        let result = f(self);
        let produced = self.outpost.take();
        self.outpost = outpost;
        self.merge_outpost(produced.clone());

        let recorded = match &result {
            Ok(nodes) => Ok((self.cursor, nodes.clone())),
            Err(NoMatch) => Err(NoMatch),
        };
        self.memo.insert(
            (id, start),
            MemoEntry {
                result: recorded,
                outpost: produced,
                depth,
            },
        );

        result
    }

    fn replay(&mut self, entry: MemoEntry) -> ParseResult<Vec<AstNode>> {
        let outpost = entry.outpost.map(|mut outpost| {
            if let Some(frames) = &self.frames {
                let inner = outpost.trace.split_off(entry.depth.min(outpost.trace.len()));
                outpost.trace = frames.iter().cloned().chain(inner).collect();
            }
            outpost
        });
        self.merge_outpost(outpost);

        let (end, nodes) = entry.result?;
        self.cursor = end;

        Ok(nodes)
    }

    fn depth(&self) -> usize {
        self.frames.as_ref().map_or(0, Vec::len)
    }

    pub(crate) fn enter_rule(&mut self, rule: RuleId, name: &str) {
        let index = self.cursor;
        log::trace!("enter rule '{}' at token {}", name, index);

        if let Some(frames) = &mut self.frames {
            frames.push(RuleFrame { rule, index });
        }
        for listener in self.listeners {
            listener.enter_rule(name, index);
        }
    }

    pub(crate) fn exit_rule(&mut self, name: &str, start: usize, matched: bool) {
        if let Some(frames) = &mut self.frames {
            frames.pop();
        }

        if matched {
            log::trace!("rule '{}' matched tokens {}..{}", name, start, self.cursor);
            for listener in self.listeners {
                listener.exit_with_match_rule(name, start, self.cursor);
            }
        } else {
            log::trace!("rule '{}' failed at token {}", name, start);
            for listener in self.listeners {
                listener.exit_without_match_rule(name, start);
            }
        }
    }

    pub(crate) fn begin_parse(&self) {
        for listener in self.listeners {
            listener.begin_parse();
        }
    }

    pub(crate) fn end_parse(&self) {
        for listener in self.listeners {
            listener.end_parse();
        }
    }
}

impl std::fmt::Debug for ParsingState<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsingState")
            .field("cursor", &self.cursor)
            .field("tokens", &self.tokens.len())
            .field("outpost", &self.outpost)
            .field("statistics", &self.statistics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tokpeg::generic::{EOF, IDENTIFIER};

    use super::*;

    fn state(words: &[&str]) -> ParsingState<'static> {
        let mut tokens: Vec<_> = words
            .iter()
            .map(|word| Token::new(IDENTIFIER, *word))
            .collect();
        tokens.push(Token::new(EOF, "EOF"));
        ParsingState::new(tokens)
    }

    #[test]
    fn sequence_restores_cursor() {
        let mut state = state(&["a", "b"]);

        let result: ParseResult<()> = state.sequence(|state| {
            state.advance();
            Err(NoMatch)
        });

        assert_eq!(result, Err(NoMatch));
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn furthest_failure_wins_ties_go_to_latest() {
        let mut state = state(&["a", "b"]);

        state.set_cursor(1);
        state.record_failure(Expectation::Matcher(1));
        state.set_cursor(0);
        state.record_failure(Expectation::Matcher(2));
        assert_eq!(state.outpost().map(|o| o.expected), Some(Expectation::Matcher(1)));

        state.set_cursor(1);
        state.record_failure(Expectation::Matcher(3));
        assert_eq!(state.outpost().map(|o| o.expected), Some(Expectation::Matcher(3)));
        assert!(state.has_progressed());
    }

    #[test]
    fn probe_leaves_no_trace() {
        let mut state = state(&["a"]);

        let matched = state.probe(|state| {
            state.advance();
            state.record_failure(Expectation::Matcher(0));
            Err::<(), _>(NoMatch)
        });

        assert!(!matched);
        assert_eq!(state.cursor(), 0);
        assert!(state.outpost().is_none());
    }

    #[test]
    fn memo_replays_effects() {
        let mut state = state(&["a", "b"]);
        let mut runs = 0;

        for _ in 0..2 {
            state.set_cursor(0);
            let result = state.memoized(7, |state| {
                runs += 1;
                state.advance();
                state.record_failure(Expectation::Matcher(8));
                Ok(vec![])
            });
            assert_eq!(result, Ok(vec![]));
            assert_eq!(state.cursor(), 1);
        }

        assert_eq!(runs, 1);
        assert_eq!(state.statistics().memo_hits, 1);
        assert_eq!(state.outpost().map(|o| o.index), Some(1));
    }

    #[test]
    fn repeat_stops_on_empty_iteration() {
        let mut state = state(&["a"]);
        let mut iterations = 0;

        let nodes = state.repeat(|_| {
            iterations += 1;
            Ok(vec![])
        });

        assert!(nodes.is_empty());
        assert_eq!(iterations, 1);
    }
}
