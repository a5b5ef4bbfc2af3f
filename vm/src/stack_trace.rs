// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Rendering of parse failures.

use std::fmt;
use std::sync::Arc;

use tokpeg::Token;
use tokpeg_meta::{Grammar, RuleId};

use crate::config::SOURCE_CODE_TOKENS_WINDOW;
use crate::state::{Expectation, Outpost, ParsingState};

const SOURCE_CODE_LINE_HEADER_WIDTH: usize = 6;

/// A rule being matched, and the token index at which it was entered.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RuleFrame {
    pub rule: RuleId,
    pub index: usize,
}

/// Description of the furthest failure of a parse.
///
/// ```text
/// ------
///     1 int a = 1
/// -->   int b = ;
/// ------
/// Expected : <expression> but was : <; [SEMICOLON]> (Line 2 / Column 8)
/// ```
///
/// The excerpt between the dashes is only printed in full mode.
#[derive(Debug)]
pub struct ParsingStackTrace<'a> {
    grammar: &'a Grammar,
    tokens: &'a [Arc<Token>],
    outpost: &'a Outpost,
    window: usize,
    display_source_code: bool,
}

impl<'a> ParsingStackTrace<'a> {
    pub fn new(grammar: &'a Grammar, tokens: &'a [Arc<Token>], outpost: &'a Outpost) -> Self {
        ParsingStackTrace {
            grammar,
            tokens,
            outpost,
            window: SOURCE_CODE_TOKENS_WINDOW,
            display_source_code: false,
        }
    }

    /// Trace of the furthest failure recorded in `state`, rendered the way the state's
    /// configuration asks for. Returns `None` if nothing failed.
    pub fn from_state(grammar: &'a Grammar, state: &'a ParsingState<'_>) -> Option<Self> {
        let config = state.config();

        state.outpost().map(|outpost| {
            ParsingStackTrace::new(grammar, state.tokens(), outpost)
                .with_source_code(config.display_source_code)
                .with_window(config.source_window)
        })
    }

    pub fn with_source_code(mut self, display_source_code: bool) -> Self {
        self.display_source_code = display_source_code;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// The token found at the failure, or `None` if the stream was exhausted.
    pub fn actual(&self) -> Option<&'a Token> {
        self.tokens.get(self.outpost.index).map(|token| &**token)
    }

    /// EBNF form of what was expected at the failure.
    pub fn expected(&self) -> String {
        match self.outpost.expected {
            Expectation::Matcher(id) => {
                let mut expected = self.grammar.matcher_ebnf(id);

                if self.grammar.matcher(id).is_token_type() {
                    expected.push_str(" type");
                }

                expected
            }
            Expectation::EndOfInput => "end of input".to_owned(),
        }
    }

    fn error_line(&self) -> Option<usize> {
        self.actual()
            .or_else(|| self.tokens.last().map(|token| &**token))
            .map(Token::line)
    }

    fn fmt_source_code(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.outpost.index;
        let end = index
            .saturating_add(self.window)
            .saturating_add(1)
            .min(self.tokens.len());
        let start = index.saturating_sub(self.window).min(end);
        let error_line = self.error_line();

        let mut previous_line = None;
        let mut line = String::new();
        let mut width = 0;

        f.write_str("------")?;

        for token in &self.tokens[start..end] {
            if previous_line != Some(token.line()) {
                writeln!(f, "{}", line)?;
                line.clear();
                previous_line = Some(token.line());

                if error_line == Some(token.line()) {
                    line.push_str("-->   ");
                } else {
                    line.push_str(&format!(
                        "{:>width$} ",
                        token.line(),
                        width = SOURCE_CODE_LINE_HEADER_WIDTH - 1
                    ));
                }
                width = line.chars().count();
            }

            while width < SOURCE_CODE_LINE_HEADER_WIDTH + token.column() {
                line.push(' ');
                width += 1;
            }
            line.push_str(token.value());
            width += token.value().chars().count();
        }

        writeln!(f, "{}", line)?;
        writeln!(f, "------")
    }

    fn fmt_actual(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(" but was : <")?;

        match self.actual() {
            Some(token) => {
                write!(f, "{} [{}]> (", token.value(), token.ty())?;

                if token.is_included() {
                    f.write_str("copy book ")?;
                }
                if let Some(uri) = token.uri() {
                    write!(f, "'{}': ", uri)?;
                }
                write!(f, "Line {} / Column {}", token.line(), token.column())?;
                if let Some(included_from) = token.included_from() {
                    write!(
                        f,
                        " called from file '{}': Line {}",
                        included_from.uri, included_from.line
                    )?;
                }

                f.write_str(")")?;
            }
            None => {
                f.write_str("EOF>")?;

                if let Some(uri) = self.tokens.last().and_then(|token| token.uri()) {
                    write!(f, " ('{}')", uri)?;
                }
            }
        }

        writeln!(f)
    }
}

impl fmt::Display for ParsingStackTrace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_source_code {
            self.fmt_source_code(f)?;
        }

        write!(f, "Expected : <{}>", self.expected())?;
        self.fmt_actual(f)
    }
}

/// One rule of an [`ExtendedStackTrace`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TraceEntry {
    pub rule: String,
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

/// The rules that were being matched when the furthest failure happened, outermost first.
///
/// Only available when the parse ran with the extended stack trace enabled.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExtendedStackTrace {
    entries: Vec<TraceEntry>,
}

impl ExtendedStackTrace {
    pub fn new(grammar: &Grammar, tokens: &[Arc<Token>], outpost: &Outpost) -> Self {
        let entries = outpost
            .trace
            .iter()
            .map(|frame| {
                let token = tokens.get(frame.index).or_else(|| tokens.last());

                TraceEntry {
                    rule: grammar.rule(frame.rule).name().to_owned(),
                    index: frame.index,
                    line: token.map_or(1, |token| token.line()),
                    column: token.map_or(0, |token| token.column()),
                }
            })
            .collect();

        ExtendedStackTrace { entries }
    }

    #[inline]
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.rule.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ExtendedStackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.entries.iter().rev() {
            writeln!(
                f,
                "  at {} (Line {} / Column {})",
                entry.rule, entry.line, entry.column
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokpeg::generic::{EOF, IDENTIFIER};
    use tokpeg::TokenType;
    use tokpeg_meta::{and, GrammarBuilder};

    use super::*;

    const SEMICOLON: TokenType = TokenType::new("SEMICOLON", ";");

    fn grammar() -> (Grammar, usize) {
        let mut g = GrammarBuilder::new();
        let root = g.rule("root");
        g.define(root).is(and!(IDENTIFIER, SEMICOLON, EOF)).unwrap();
        g.set_root(root);
        let grammar = g.build().unwrap();

        let semicolon = (0..grammar.matcher_count())
            .find(|&id| grammar.matcher(id) == &tokpeg_meta::Matcher::TokenType(SEMICOLON))
            .unwrap();

        (grammar, semicolon)
    }

    fn tokens() -> Vec<Arc<Token>> {
        vec![
            Arc::new(Token::new(IDENTIFIER, "int").with_position(1, 0)),
            Arc::new(Token::new(IDENTIFIER, "a").with_position(1, 4)),
            Arc::new(Token::new(IDENTIFIER, "b").with_position(2, 2)),
            Arc::new(Token::new(EOF, "EOF").with_position(2, 3)),
        ]
    }

    #[test]
    fn light_report() {
        let (grammar, semicolon) = grammar();
        let tokens = tokens();
        let outpost = Outpost {
            expected: Expectation::Matcher(semicolon),
            index: 1,
            trace: vec![],
        };

        assert_eq!(
            ParsingStackTrace::new(&grammar, &tokens, &outpost).to_string(),
            "Expected : <SEMICOLON type> but was : <a [IDENTIFIER]> (Line 1 / Column 4)\n"
        );
    }

    #[test]
    fn full_report() {
        let (grammar, semicolon) = grammar();
        let tokens = tokens();
        let outpost = Outpost {
            expected: Expectation::Matcher(semicolon),
            index: 2,
            trace: vec![],
        };

        let report = ParsingStackTrace::new(&grammar, &tokens, &outpost)
            .with_source_code(true)
            .to_string();

        assert_eq!(
            report,
            "------\n\
             \x20   1 int a\n\
             -->     bEOF\n\
             ------\n\
             Expected : <SEMICOLON type> but was : <b [IDENTIFIER]> (Line 2 / Column 2)\n"
        );
    }

    #[test]
    fn unbounded_window() {
        let (grammar, semicolon) = grammar();
        let tokens = tokens();
        let outpost = Outpost {
            expected: Expectation::Matcher(semicolon),
            index: 2,
            trace: vec![],
        };

        let report = ParsingStackTrace::new(&grammar, &tokens, &outpost)
            .with_source_code(true)
            .with_window(usize::MAX)
            .to_string();

        assert_eq!(
            report,
            "------\n\
             \x20   1 int a\n\
             -->     bEOF\n\
             ------\n\
             Expected : <SEMICOLON type> but was : <b [IDENTIFIER]> (Line 2 / Column 2)\n"
        );
    }

    #[test]
    fn exhausted_stream() {
        let (grammar, _) = grammar();
        let tokens = vec![Arc::new(
            Token::new(IDENTIFIER, "a").with_uri(Arc::from("main.c")),
        )];
        let outpost = Outpost {
            expected: Expectation::EndOfInput,
            index: 1,
            trace: vec![],
        };

        assert_eq!(
            ParsingStackTrace::new(&grammar, &tokens, &outpost).to_string(),
            "Expected : <end of input> but was : <EOF> ('main.c')\n"
        );
    }

    #[test]
    fn extended_trace_is_printed_innermost_first() {
        let (grammar, _) = grammar();
        let tokens = tokens();
        let root = grammar.root();
        let outpost = Outpost {
            expected: Expectation::EndOfInput,
            index: 1,
            trace: vec![RuleFrame { rule: root, index: 0 }, RuleFrame { rule: root, index: 1 }],
        };

        let trace = ExtendedStackTrace::new(&grammar, &tokens, &outpost);

        assert_eq!(trace.rules().collect::<Vec<_>>(), vec!["root", "root"]);
        assert_eq!(
            trace.to_string(),
            "  at root (Line 1 / Column 4)\n  at root (Line 1 / Column 0)\n"
        );
    }
}
