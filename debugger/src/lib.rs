// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018-2022 Dragoș Tiselice, Tomas Tauber
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.
//! # tokpeg debugger
//!
//! This crate contains definitions for the debugger.
//! A sample CLI-based debugger is available in `main.rs`.
//! Other debugger frontends can be implemented using this
//! crate's `DebuggerContext`:
//!
//! ```
//! use tokpeg_debugger::{DebuggerContext, DebuggerEvent};
//! use std::sync::mpsc::sync_channel;
//! let mut context = DebuggerContext::default();
//!
//! context
//!     .load_grammar("minic")
//!     .expect("Error: failed to load grammar");
//! context.load_input_direct("int a; int b;".to_owned());
//!
//! let (sender, receiver) = sync_channel(1);
//!
//! context.add_breakpoint("variableDefinition".to_owned());
//! context
//!     .run("compilationUnit", sender)
//!     .expect("Error: failed to run rule");
//!
//! let event = receiver.recv().expect("Error: failed to receive event");
//! assert_eq!(event, DebuggerEvent::Breakpoint("variableDefinition".to_owned(), 0));
//!
//! context.cont().expect("Error: failed to continue");
//!
//! let event = receiver.recv().expect("Error: failed to receive event");
//! assert_eq!(event, DebuggerEvent::Breakpoint("variableDefinition".to_owned(), 3));
//! ```
//! ## Current Limitations
//! - relies on OS threads instead of stack-full generators
//! - a cancelled session runs to completion in the background without stopping
//! - no way to run another rule from a breakpoint, only from the start
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
use std::{
    collections::HashSet,
    fmt, fs, io,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::SyncSender as Sender,
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
};

use tokpeg::{Lexer, LexerError, Token};
use tokpeg_meta::Grammar;
use tokpeg_vm::{Parser, ParsingEventListener};

/// Possible errors that can occur in the debugger context.
#[derive(Debug, thiserror::Error)]
pub enum DebuggerError {
    /// Errors from opening files etc.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// No grammar is known under the requested name.
    #[error("Unknown language: {0} (available: {})", tokpeg_grammars::LANGUAGES.join(", "))]
    UnknownLanguage(String),
    /// Running a debugger requires a grammar to be provided.
    #[error("Open grammar first")]
    GrammarNotOpened,
    /// Running a debugger requires a parsing input to be provided.
    #[error("Open input first")]
    InputNotOpened,
    /// The grammar has no rule with the requested name.
    #[error("Unknown rule: {0}")]
    UnknownRule(String),
    /// Continuing a debugger session requires starting a session by running a rule.
    #[error("Run rule first")]
    RunRuleFirst,
    /// Parsing finished (i.e. cannot continue the session).
    #[error("End-of-input reached")]
    EofReached,
    /// The input has no token at the given index.
    #[error("Invalid token index: {0}")]
    InvalidPosition(usize),
    /// The input could not be split into tokens.
    #[error("Lexical error: {0}")]
    Lexical(#[from] LexerError),
    /// When restarting a session, the previous session
    /// seem to have panicked.
    #[error("Previous parsing execution panic: {0}")]
    PreviousRunPanic(String),
}

/// Events that are sent from the debugger.
#[derive(Debug, PartialEq, Eq)]
pub enum DebuggerEvent {
    /// A breakpoint encountered.
    /// The first element is the rule name.
    /// The second element is the token index.
    Breakpoint(String, usize),
    /// The end of the input has been reached.
    Eof,
    /// A parsing error encountered, with its full report.
    Error(String),
}

/// Debugger for tokpeg grammars.
pub struct DebuggerContext {
    handle: Option<JoinHandle<()>>,
    is_done: Arc<AtomicBool>,
    grammar: Option<(Arc<Grammar>, Arc<dyn Lexer>)>,
    input: Option<String>,
    breakpoints: Arc<Mutex<HashSet<String>>>,
}

const POISONED_LOCK_PANIC: &str = "poisoned lock";
const CHANNEL_CLOSED_PANIC: &str = "channel closed";

// Parks the parsing thread whenever a rule with a breakpoint is entered.
struct BreakpointListener {
    breakpoints: Arc<Mutex<HashSet<String>>>,
    is_done: Arc<AtomicBool>,
    sender: Mutex<Sender<DebuggerEvent>>,
}

impl ParsingEventListener for BreakpointListener {
    fn enter_rule(&self, rule: &str, index: usize) {
        if self.is_done.load(Ordering::SeqCst) {
            return;
        }

        let is_breakpoint = self
            .breakpoints
            .lock()
            .expect(POISONED_LOCK_PANIC)
            .contains(rule);

        if is_breakpoint {
            self.sender
                .lock()
                .expect(POISONED_LOCK_PANIC)
                .send(DebuggerEvent::Breakpoint(rule.to_owned(), index))
                .expect(CHANNEL_CLOSED_PANIC);

            thread::park();
        }
    }
}

impl DebuggerContext {
    /// Loads one of the grammars of `tokpeg_grammars` by name, with its lexer.
    pub fn load_grammar(&mut self, name: &str) -> Result<(), DebuggerError> {
        let language = tokpeg_grammars::language(name)
            .ok_or_else(|| DebuggerError::UnknownLanguage(name.to_owned()))?;

        self.grammar = Some(language);

        Ok(())
    }

    /// Loads a grammar built elsewhere, with the lexer producing its tokens.
    pub fn load_grammar_direct(
        &mut self,
        grammar: impl Into<Arc<Grammar>>,
        lexer: Arc<dyn Lexer>,
    ) {
        self.grammar = Some((grammar.into(), lexer));
    }

    /// Loads a parsing input from a file.
    pub fn load_input(&mut self, path: impl AsRef<Path>) -> Result<(), DebuggerError> {
        self.input = Some(fs::read_to_string(path)?);

        Ok(())
    }

    /// Loads a parsing input from a string.
    pub fn load_input_direct(&mut self, input: String) {
        self.input = Some(input);
    }

    /// Adds all grammar rules as breakpoints.
    /// This is useful for stepping through the entire parsing process.
    /// It returns an error if the grammar hasn't been loaded yet.
    pub fn add_all_rules_breakpoints(&mut self) -> Result<(), DebuggerError> {
        let (grammar, _) = self
            .grammar
            .as_ref()
            .ok_or(DebuggerError::GrammarNotOpened)?;
        let mut breakpoints = self.breakpoints.lock().expect(POISONED_LOCK_PANIC);
        for (_, rule) in grammar.rules() {
            breakpoints.insert(rule.name().to_owned());
        }

        Ok(())
    }

    /// Adds a rule to breakpoints.
    pub fn add_breakpoint(&mut self, rule: String) {
        let mut breakpoints = self.breakpoints.lock().expect(POISONED_LOCK_PANIC);

        breakpoints.insert(rule);
    }

    /// Removes a rule from breakpoints.
    pub fn delete_breakpoint(&mut self, rule: &str) {
        let mut breakpoints = self.breakpoints.lock().expect(POISONED_LOCK_PANIC);

        breakpoints.remove(rule);
    }

    /// Removes all breakpoints.
    pub fn delete_all_breakpoints(&mut self) {
        let mut breakpoints = self.breakpoints.lock().expect(POISONED_LOCK_PANIC);

        breakpoints.clear();
    }

    /// Returns a list of all breakpoints.
    pub fn list_breakpoints(&self) -> Vec<String> {
        let breakpoints = self.breakpoints.lock().expect(POISONED_LOCK_PANIC);
        let mut breakpoints: Vec<_> = breakpoints.iter().map(ToOwned::to_owned).collect();
        breakpoints.sort();
        breakpoints
    }

    fn handle(
        &self,
        grammar: Arc<Grammar>,
        lexer: Arc<dyn Lexer>,
        rule: String,
        input: String,
        sender: Sender<DebuggerEvent>,
    ) -> JoinHandle<()> {
        let is_done = Arc::clone(&self.is_done);
        let listener = BreakpointListener {
            breakpoints: Arc::clone(&self.breakpoints),
            is_done: Arc::clone(&self.is_done),
            sender: Mutex::new(sender.clone()),
        };
        let parser = Parser::builder(grammar)
            .with_shared_lexer(lexer)
            .add_listener(Arc::new(listener))
            .build();

        thread::spawn(move || {
            let result = parser.parse_rule_str(&rule, &input);

            // A cancelled session has nobody waiting for its outcome.
            if !is_done.swap(true, Ordering::SeqCst) {
                match result {
                    Ok(_) => sender.send(DebuggerEvent::Eof).expect(CHANNEL_CLOSED_PANIC),
                    Err(error) => sender
                        .send(DebuggerEvent::Error(error.to_string()))
                        .expect(CHANNEL_CLOSED_PANIC),
                };
            }
        })
    }

    /// Starts a debugger session: runs a rule on an input and stops at breakpoints.
    /// When the debugger is stopped, an event is sent to the channel using `sender`.
    /// The debugger can be resumed by calling `cont`.
    /// This naturally returns errors if the grammar or input haven't been loaded yet etc.
    pub fn run(&mut self, rule: &str, sender: Sender<DebuggerEvent>) -> Result<(), DebuggerError> {
        if let Some(handle) = self.handle.take() {
            if !(self.is_done.load(Ordering::Relaxed)) {
                self.is_done.store(true, Ordering::SeqCst);
                handle.thread().unpark();
            }
            handle
                .join()
                .map_err(|e| DebuggerError::PreviousRunPanic(format!("{:?}", e)))?;
        }

        let (grammar, lexer) = self
            .grammar
            .as_ref()
            .ok_or(DebuggerError::GrammarNotOpened)?;
        if grammar.rule_id(rule).is_none() {
            return Err(DebuggerError::UnknownRule(rule.to_owned()));
        }
        let input = self.input.clone().ok_or(DebuggerError::InputNotOpened)?;
        let (grammar, lexer) = (Arc::clone(grammar), Arc::clone(lexer));

        self.is_done.store(false, Ordering::SeqCst);
        self.handle = Some(self.handle(grammar, lexer, rule.to_owned(), input, sender));

        Ok(())
    }

    /// Continue the debugger session from the breakpoint.
    /// It returns an error if the session finished or wasn't started yet.
    pub fn cont(&self) -> Result<(), DebuggerError> {
        if self.is_done.load(Ordering::SeqCst) {
            return Err(DebuggerError::EofReached);
        }

        match self.handle {
            Some(ref handle) => {
                handle.thread().unpark();
                Ok(())
            }
            None => Err(DebuggerError::RunRuleFirst),
        }
    }

    /// Lexes the loaded input with the loaded grammar's lexer.
    pub fn tokens(&self) -> Result<Vec<Token>, DebuggerError> {
        let (_, lexer) = self
            .grammar
            .as_ref()
            .ok_or(DebuggerError::GrammarNotOpened)?;
        let input = self.input.as_ref().ok_or(DebuggerError::InputNotOpened)?;

        Ok(lexer.lex(input)?)
    }

    /// Returns the token of the loaded input at `index`.
    pub fn get_token(&self, index: usize) -> Result<Token, DebuggerError> {
        self.tokens()?
            .into_iter()
            .nth(index)
            .ok_or(DebuggerError::InvalidPosition(index))
    }
}

impl Default for DebuggerContext {
    fn default() -> Self {
        Self {
            handle: None,
            is_done: Arc::new(AtomicBool::new(false)),
            grammar: None,
            input: None,
            breakpoints: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl fmt::Debug for DebuggerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebuggerContext")
            .field("running", &self.handle.is_some())
            .field("is_done", &self.is_done.load(Ordering::Relaxed))
            .field(
                "grammar",
                &self
                    .grammar
                    .as_ref()
                    .map(|(grammar, _)| grammar.rule(grammar.root()).name()),
            )
            .field("input", &self.input.as_ref().map(String::len))
            .field("breakpoints", &self.list_breakpoints())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::mpsc::sync_channel;

    fn get_test_context() -> DebuggerContext {
        let mut context = DebuggerContext::default();

        context
            .load_grammar("minic")
            .expect("Error: failed to load grammar");
        context.load_input_direct("int a;\nint b = 1;".to_owned());
        context
    }

    #[test]
    fn test_full_flow() {
        let mut context = get_test_context();

        let (sender, receiver) = sync_channel(1);

        assert_eq!(context.list_breakpoints().len(), 0);
        context.add_breakpoint("variableDefinition".to_owned());
        assert_eq!(context.list_breakpoints().len(), 1);
        context
            .run("compilationUnit", sender)
            .expect("Error: failed to run rule");

        let event = receiver.recv().expect("Error: failed to receive event");
        assert_eq!(
            event,
            DebuggerEvent::Breakpoint("variableDefinition".to_owned(), 0)
        );

        context.cont().expect("Error: failed to continue");

        let event = receiver.recv().expect("Error: failed to receive event");
        assert_eq!(
            event,
            DebuggerEvent::Breakpoint("variableDefinition".to_owned(), 3)
        );
        let token = context.get_token(3).expect("Error: failed to lex input");
        assert_eq!((token.value(), token.line(), token.column()), ("int", 2, 0));

        context.cont().expect("Error: failed to continue");
        let event = receiver.recv().expect("Error: failed to receive event");

        assert_eq!(event, DebuggerEvent::Eof);
        context
            .add_all_rules_breakpoints()
            .expect("grammar is loaded");
        assert_eq!(
            context.list_breakpoints().len(),
            tokpeg_grammars::minic::grammar().rules().count()
        );
        context.delete_breakpoint("variableDefinition");
        assert!(!context
            .list_breakpoints()
            .contains(&"variableDefinition".to_owned()));
        context.delete_all_breakpoints();
        assert_eq!(context.list_breakpoints().len(), 0);
    }

    #[test]
    fn test_restart() {
        let mut context = get_test_context();

        let (sender, receiver) = sync_channel(1);

        context.add_breakpoint("variableDefinition".to_owned());
        context
            .run("compilationUnit", sender)
            .expect("Error: failed to run rule");

        let event = receiver.recv().expect("Error: failed to receive event");
        assert_eq!(
            event,
            DebuggerEvent::Breakpoint("variableDefinition".to_owned(), 0)
        );
        let (sender2, receiver2) = sync_channel(1);

        context
            .run("compilationUnit", sender2)
            .expect("Error: failed to run rule");
        let event = receiver2.recv().expect("Error: failed to receive event");
        assert_eq!(
            event,
            DebuggerEvent::Breakpoint("variableDefinition".to_owned(), 0)
        );
    }

    #[test]
    fn test_parse_error() {
        let mut context = get_test_context();
        context.load_input_direct("int a".to_owned());

        let (sender, receiver) = sync_channel(1);
        context
            .run("compilationUnit", sender)
            .expect("Error: failed to run rule");

        match receiver.recv().expect("Error: failed to receive event") {
            DebuggerEvent::Error(message) => {
                assert!(message.ends_with("but was : <EOF [EOF]> (Line 1 / Column 5)\n"))
            }
            event => panic!("unexpected {:?}", event),
        }
    }

    #[test]
    pub fn test_errors() {
        let mut context = DebuggerContext::default();

        assert!(context.load_input(".").is_err());
        assert!(matches!(
            context.load_grammar("cobol"),
            Err(DebuggerError::UnknownLanguage(_))
        ));
        assert!(context.add_all_rules_breakpoints().is_err());
        assert!(context.cont().is_err());
        assert!(context.run("rule", sync_channel(1).0).is_err());
        assert!(context.load_grammar("words").is_ok());
        assert!(matches!(
            context.run("text", sync_channel(1).0),
            Err(DebuggerError::InputNotOpened)
        ));
        assert!(context.get_token(0).is_err());
        context.load_input_direct("".to_owned());
        assert!(context.get_token(0).is_ok());
        assert!(matches!(
            context.get_token(1),
            Err(DebuggerError::InvalidPosition(1))
        ));
        assert!(matches!(
            context.run("rule", sync_channel(1).0),
            Err(DebuggerError::UnknownRule(_))
        ));
        let readme = concat!(env!("CARGO_MANIFEST_DIR"), "/../README.md");
        assert!(context.load_input(readme).is_ok());
        let (sender, _receiver) = sync_channel(1);
        assert!(context.run("text", sender).is_ok());
        while context.cont().is_ok() {}
        assert!(context.cont().is_err());
    }
}
