// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tokpeg::{AstNode, Lexer, LexerError, Token};
use tokpeg_meta::{Grammar, GrammarError, RuleId};

use crate::config::ParserConfig;
use crate::error::{RecognitionError, RecognitionReport};
use crate::listener::ParsingEventListener;
use crate::state::{Expectation, ParsingState};
use crate::Vm;

/// A grammar bound to a lexer, listeners and options.
///
/// Parsers are cheap to clone and can be used from several threads at once: every call to a
/// `parse*` method runs on its own [`ParsingState`].
#[derive(Clone)]
pub struct Parser {
    grammar: Arc<Grammar>,
    root: RuleId,
    lexer: Option<Arc<dyn Lexer>>,
    listeners: Vec<Arc<dyn ParsingEventListener>>,
    config: ParserConfig,
}

impl Parser {
    pub fn builder(grammar: impl Into<Arc<Grammar>>) -> ParserBuilder {
        let grammar = grammar.into();

        ParserBuilder {
            root: grammar.root(),
            grammar,
            lexer: None,
            listeners: vec![],
            config: ParserConfig::default(),
        }
    }

    /// Starts from the configuration of `parser`, typically to parse again with the extended
    /// stack trace enabled.
    ///
    /// ```
    /// # use tokpeg_meta::GrammarBuilder;
    /// # use tokpeg_vm::Parser;
    /// # let mut g = GrammarBuilder::new();
    /// # let root = g.rule("root");
    /// # g.define(root).is(tokpeg::generic::EOF).unwrap();
    /// # g.set_root(root);
    /// let parser = Parser::builder(g.build().unwrap()).build();
    /// let extended = Parser::builder_from(&parser)
    ///     .with_extended_stack_trace(true)
    ///     .build();
    ///
    /// assert!(extended.config().extended_stack_trace);
    /// ```
    pub fn builder_from(parser: &Parser) -> ParserBuilder {
        ParserBuilder {
            grammar: Arc::clone(&parser.grammar),
            root: parser.root,
            lexer: parser.lexer.clone(),
            listeners: parser.listeners.clone(),
            config: parser.config,
        }
    }

    #[inline]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    #[inline]
    pub fn root(&self) -> RuleId {
        self.root
    }

    #[inline]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses already lexed tokens with the root rule. The root rule has to consume every
    /// token.
    pub fn parse(&self, tokens: Vec<Token>) -> Result<AstNode, RecognitionError> {
        self.parse_with(self.root, tokens)
    }

    /// Lexes `source` with the configured lexer, then parses it.
    pub fn parse_str(&self, source: &str) -> Result<AstNode, RecognitionError> {
        let tokens = self.lex(|lexer| lexer.lex(source))?;

        self.parse(tokens)
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<AstNode, RecognitionError> {
        let path = path.as_ref();
        let tokens = self.lex(|lexer| lexer.lex_file(path))?;

        self.parse(tokens)
    }

    /// Parses tokens with any rule of the grammar instead of the root.
    ///
    /// # Panics
    ///
    /// Panics if the grammar has no rule called `rule`.
    pub fn parse_rule(&self, rule: &str, tokens: Vec<Token>) -> Result<AstNode, RecognitionError> {
        let rule = self.rule_id(rule);

        self.parse_with(rule, tokens)
    }

    /// Lexes `source`, then parses it with `rule`.
    ///
    /// # Panics
    ///
    /// Panics if the grammar has no rule called `rule`.
    pub fn parse_rule_str(&self, rule: &str, source: &str) -> Result<AstNode, RecognitionError> {
        let rule = self.rule_id(rule);
        let tokens = self.lex(|lexer| lexer.lex(source))?;

        self.parse_with(rule, tokens)
    }

    fn rule_id(&self, rule: &str) -> RuleId {
        match self.grammar.rule_id(rule) {
            Some(id) => id,
            None => panic!("the grammar has no rule named '{}'", rule),
        }
    }

    fn lex<F>(&self, f: F) -> Result<Vec<Token>, LexerError>
    where
        F: FnOnce(&dyn Lexer) -> Result<Vec<Token>, LexerError>,
    {
        let lexer = self.lexer.as_deref().ok_or(LexerError::NotConfigured)?;

        for listener in &self.listeners {
            listener.begin_lex();
        }
        let result = f(lexer);
        for listener in &self.listeners {
            listener.end_lex();
        }

        result
    }

    fn parse_with(&self, rule: RuleId, tokens: Vec<Token>) -> Result<AstNode, RecognitionError> {
        let vm = Vm::new(&self.grammar);
        let mut state = ParsingState::with_config(tokens, self.config, &self.listeners);
        let name = self.grammar.rule(rule).name();

        log::debug!("parsing {} tokens with rule '{}'", state.len(), name);

        state.begin_parse();
        let result = vm.parse_rule(rule, &mut state);
        state.end_parse();

        let statistics = state.statistics();
        log::debug!(
            "parse of rule '{}' ended at token {}: {} evaluations, {} memo hits",
            name,
            state.cursor(),
            statistics.evaluations,
            statistics.memo_hits
        );

        match result {
            Ok(node) if state.at_end() => Ok(node),
            Ok(_) => {
                state.record_failure(Expectation::EndOfInput);
                Err(self.reject(rule, &state))
            }
            Err(_) => Err(self.reject(rule, &state)),
        }
    }

    fn reject(&self, rule: RuleId, state: &ParsingState<'_>) -> RecognitionError {
        let report = RecognitionReport::new(&self.grammar, rule, state);

        log::debug!(
            "rejected at token {}, expected {}",
            report.index(),
            report.expected()
        );

        RecognitionError::Recognition(Box::new(report))
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("root", &self.grammar.rule(self.root).name())
            .field("lexer", &self.lexer.is_some())
            .field("listeners", &self.listeners.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Configures a [`Parser`].
pub struct ParserBuilder {
    grammar: Arc<Grammar>,
    root: RuleId,
    lexer: Option<Arc<dyn Lexer>>,
    listeners: Vec<Arc<dyn ParsingEventListener>>,
    config: ParserConfig,
}

impl ParserBuilder {
    pub fn with_lexer(mut self, lexer: impl Lexer + 'static) -> Self {
        let lexer: Arc<dyn Lexer> = Arc::new(lexer);
        self.lexer = Some(lexer);
        self
    }

    pub fn with_shared_lexer(mut self, lexer: Arc<dyn Lexer>) -> Self {
        self.lexer = Some(lexer);
        self
    }

    pub fn add_listener(mut self, listener: Arc<dyn ParsingEventListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Replaces every listener.
    pub fn set_listeners(mut self, listeners: Vec<Arc<dyn ParsingEventListener>>) -> Self {
        self.listeners = listeners;
        self
    }

    pub fn with_extended_stack_trace(mut self, extended_stack_trace: bool) -> Self {
        self.config.extended_stack_trace = extended_stack_trace;
        self
    }

    pub fn with_source_window(mut self, source_window: usize) -> Self {
        self.config.source_window = source_window;
        self
    }

    pub fn with_memoization(mut self, memoization: bool) -> Self {
        self.config.memoization = memoization;
        self
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Parses with the rule called `rule` instead of the root of the grammar.
    pub fn with_root(mut self, rule: &str) -> Result<Self, GrammarError> {
        self.root = self
            .grammar
            .rule_id(rule)
            .ok_or_else(|| GrammarError::UndefinedRule(rule.to_owned()))?;
        Ok(self)
    }

    pub fn build(self) -> Parser {
        Parser {
            grammar: self.grammar,
            root: self.root,
            lexer: self.lexer,
            listeners: self.listeners,
            config: self.config,
        }
    }
}

impl fmt::Debug for ParserBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserBuilder")
            .field("root", &self.grammar.rule(self.root).name())
            .field("config", &self.config)
            .finish()
    }
}
