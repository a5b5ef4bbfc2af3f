// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018-2022 Dragoș Tiselice, Tomas Tauber
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::sync::mpsc::{self, Receiver};
use std::thread;

use rustyline::error::ReadlineError;
use rustyline::Editor;

use tokpeg_debugger::{DebuggerContext, DebuggerError, DebuggerEvent};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Default)]
struct Cli {
    context: DebuggerContext,
}

impl Cli {
    fn grammar(&mut self, name: &str) -> Result<(), DebuggerError> {
        self.context.load_grammar(name)
    }

    fn input(&mut self, path: &str) -> Result<(), DebuggerError> {
        self.context.load_input(path)
    }

    fn breakpoint(&mut self, rule: &str) {
        self.context.add_breakpoint(rule.to_owned());
    }

    fn run(&mut self, rule: &str) -> Result<(), DebuggerError> {
        let (sender, receiver) = mpsc::sync_channel(1);
        self.context.run(rule, sender)?;

        Cli::print_events(receiver, self.position_printer());

        Ok(())
    }

    // Positions are resolved up front, the printing thread has no access to the context.
    fn position_printer(&self) -> impl Fn(usize) -> String {
        let positions: Vec<_> = self
            .context
            .tokens()
            .unwrap_or_default()
            .iter()
            .map(|token| {
                format!(
                    "line {}, column {}: <{} [{}]>",
                    token.line(),
                    token.column(),
                    token.value(),
                    token.ty()
                )
            })
            .collect();

        move |index| {
            positions
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("token {}", index))
        }
    }

    fn print_events<F>(receiver: Receiver<DebuggerEvent>, position: F)
    where
        F: Fn(usize) -> String + Send + 'static,
    {
        thread::spawn(move || {
            while let Ok(event) = receiver.recv() {
                match event {
                    DebuggerEvent::Breakpoint(rule, index) => {
                        println!("parsing {} at {}", rule, position(index));
                    }
                    DebuggerEvent::Eof => println!("end-of-input reached"),
                    DebuggerEvent::Error(error) => println!("{}", error),
                }
            }
        });
    }

    fn cont(&self) -> Result<(), DebuggerError> {
        self.context.cont()
    }

    fn list(&self) {
        println!(
            "Breakpoints: {}",
            self.context.list_breakpoints().join(", ")
        );
    }

    fn help() {
        println!(
            "\n\
             Use the following commands:\n\
             g <grammar> - load a grammar by name ({})\n\
             i <input>   - load input file\n\
             ba          - add breakpoints at all rules\n\
             b <rule>    - breakpoint at rule\n\
             d <rule>    - delete breakpoint at rule\n\
             da          - delete all breakpoints\n\
             r <rule>    - run rule\n\
             c           - continue\n\
             l           - list breakpoints\n\
             h           - help\n\
             ",
            tokpeg_grammars::LANGUAGES.join(", ")
        );
    }

    fn unrecognized(command: &str) {
        println!("Unrecognized command: {}; use h for help", command);
    }

    fn execute_command(&mut self, command: &str) -> Result<(), DebuggerError> {
        let verb = command.split_whitespace().next().unwrap_or("");
        let argument = command[verb.len()..].trim();

        match (verb, argument) {
            ("", _) => (),
            ("g", name) if !name.is_empty() => self.grammar(name)?,
            ("i", path) if !path.is_empty() => self.input(path)?,
            ("ba", "") => self.context.add_all_rules_breakpoints()?,
            ("b", rule) if !rule.is_empty() => self.breakpoint(rule),
            ("d", rule) if !rule.is_empty() => self.context.delete_breakpoint(rule),
            ("da", "") => self.context.delete_all_breakpoints(),
            ("r", rule) if !rule.is_empty() => self.run(rule)?,
            ("c", "") => self.cont()?,
            ("l", "") => self.list(),
            ("h", "") => Cli::help(),
            _ => Cli::unrecognized(command),
        };

        Ok(())
    }
}

fn main() -> rustyline::Result<()> {
    let mut rl = Editor::<()>::new()?;
    let mut cli = Cli::default();

    println!("tokpeg_debugger v{}\n", VERSION);

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                rl.add_history_entry(line.as_str());
                if let Err(err) = cli.execute_command(line.trim()) {
                    println!("Error: {}", err);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
