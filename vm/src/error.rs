// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::fmt;

use tokpeg::{LexerError, Token};
use tokpeg_meta::{Grammar, RuleId};

use crate::stack_trace::{ExtendedStackTrace, ParsingStackTrace};
use crate::state::{Expectation, Outpost, ParsingState};

/// Errors returned by [`Parser`](crate::Parser).
#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    /// The source could not be turned into tokens.
    #[error(transparent)]
    Lexical(#[from] LexerError),
    /// The tokens do not conform to the grammar.
    #[error("{0}")]
    Recognition(Box<RecognitionReport>),
}

impl RecognitionError {
    /// Returns `true` if the parse made some progress before failing, in which case parsing
    /// again with the extended stack trace enabled gives a more precise picture.
    pub fn is_to_retry_with_extended_stack_trace(&self) -> bool {
        match self {
            RecognitionError::Lexical(_) => false,
            RecognitionError::Recognition(report) => report.retry,
        }
    }

    pub fn report(&self) -> Option<&RecognitionReport> {
        match self {
            RecognitionError::Lexical(_) => None,
            RecognitionError::Recognition(report) => Some(report),
        }
    }
}

/// A positioned description of why tokens were rejected.
#[derive(Clone, Debug)]
pub struct RecognitionReport {
    expected: String,
    actual: Option<Token>,
    index: usize,
    line: usize,
    column: usize,
    uri: Option<String>,
    message: String,
    rule_trace: Option<ExtendedStackTrace>,
    retry: bool,
}

impl RecognitionReport {
    /// Builds the report of a failed parse of `root` from its final state.
    pub(crate) fn new(grammar: &Grammar, root: RuleId, state: &ParsingState<'_>) -> Self {
        // Nothing failed: the root rule itself could not start.
        let fallback = Outpost {
            expected: Expectation::Matcher(grammar.rule_matcher(root)),
            index: 0,
            trace: vec![],
        };
        let outpost = state.outpost().unwrap_or(&fallback);
        let config = state.config();

        let stack_trace = ParsingStackTrace::new(grammar, state.tokens(), outpost)
            .with_source_code(config.display_source_code)
            .with_window(config.source_window);
        let rule_trace = config
            .extended_stack_trace
            .then(|| ExtendedStackTrace::new(grammar, state.tokens(), outpost));

        let mut message = stack_trace.to_string();
        if let Some(rule_trace) = &rule_trace {
            message.push_str(&rule_trace.to_string());
        }

        let actual = stack_trace.actual().cloned();
        let position = actual
            .as_ref()
            .or_else(|| state.tokens().last().map(|token| &**token));

        RecognitionReport {
            expected: stack_trace.expected(),
            index: outpost.index,
            line: position.map_or(1, Token::line),
            column: position.map_or(0, Token::column),
            uri: position.and_then(Token::uri).map(str::to_owned),
            actual,
            message,
            rule_trace,
            retry: outpost.index > 0,
        }
    }

    /// What was expected, in EBNF form.
    #[inline]
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// The token found instead, or `None` if the tokens ran out.
    #[inline]
    pub fn actual(&self) -> Option<&Token> {
        self.actual.as_ref()
    }

    /// Index of the offending token.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    #[inline]
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// The rendered report, as displayed.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Rules active at the failure, when the extended stack trace was enabled.
    #[inline]
    pub fn rule_trace(&self) -> Option<&ExtendedStackTrace> {
        self.rule_trace.as_ref()
    }

    #[inline]
    pub fn is_to_retry_with_extended_stack_trace(&self) -> bool {
        self.retry
    }
}

impl fmt::Display for RecognitionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
