// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use pretty_assertions::assert_eq;

use tokpeg::generic::{EOF, IDENTIFIER};
use tokpeg::Token;
use tokpeg_grammars::words::WordLexer;
use tokpeg_meta::{and, o2n, or, Grammar, GrammarBuilder};
use tokpeg_vm::{Parser, ParserConfig};

fn statements() -> Grammar {
    let mut g = GrammarBuilder::new();
    let root = g.rule("root");
    let statement = g.rule("statement");
    let value = g.rule("value");
    g.define(root).is(and!(o2n!(statement), EOF)).unwrap();
    g.define(statement)
        .is(and!("let", IDENTIFIER, "be", value))
        .unwrap();
    g.define(value).is(or!("zero", "one")).unwrap();
    g.set_root(root);

    g.build().unwrap()
}

fn parser() -> Parser {
    Parser::builder(statements())
        .with_lexer(WordLexer)
        .build()
}

#[test]
fn report_with_source_code() {
    let error = parser().parse_str("let a be zero\nlet b zero").unwrap_err();

    assert_eq!(
        error.to_string(),
        "------\n\
         \x20   1 let a be zero\n\
         -->   let b zeroEOF\n\
         ------\n\
         Expected : <be> but was : <zero [IDENTIFIER]> (Line 2 / Column 6)\n"
    );
}

#[test]
fn report_without_source_code() {
    let parser = Parser::builder(statements())
        .with_lexer(WordLexer)
        .with_config(ParserConfig::default().with_source_code(false))
        .build();

    let error = parser.parse_str("let a be two").unwrap_err();
    let report = error.report().unwrap();

    assert_eq!(
        report.message(),
        "Expected : <one> but was : <two [IDENTIFIER]> (Line 1 / Column 9)\n"
    );
    assert_eq!(report.index(), 3);
    assert_eq!((report.line(), report.column()), (1, 9));
    assert_eq!(report.actual().map(Token::value), Some("two"));
}

#[test]
fn source_window() {
    let parser = Parser::builder(statements())
        .with_lexer(WordLexer)
        .with_source_window(1)
        .build();

    let error = parser
        .parse_str("let a be zero\nlet b be one\nlet c be two\nlet d be one")
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "------\n\
         -->         be two\n\
         \x20   4 let\n\
         ------\n\
         Expected : <one> but was : <two [IDENTIFIER]> (Line 3 / Column 9)\n"
    );
}

#[test]
fn exhausted_tokens() {
    let parser = Parser::builder(statements())
        .with_config(ParserConfig::default().with_source_code(false))
        .build();
    let tokens = vec![
        Token::new(IDENTIFIER, "let").with_uri("lib.txt".into()),
        Token::new(IDENTIFIER, "a")
            .with_position(1, 4)
            .with_uri("lib.txt".into()),
    ];

    let error = parser.parse(tokens).unwrap_err();
    let report = error.report().unwrap();

    assert_eq!(
        report.message(),
        "Expected : <be> but was : <EOF> ('lib.txt')\n"
    );
    assert!(report.actual().is_none());
    assert_eq!(report.uri(), Some("lib.txt"));
    assert_eq!((report.line(), report.column()), (1, 4));
}

#[test]
fn included_tokens() {
    let parser = Parser::builder(statements())
        .with_config(ParserConfig::default().with_source_code(false))
        .build();
    let tokens = vec![
        Token::new(IDENTIFIER, "let")
            .with_position(3, 0)
            .with_uri("copy.txt".into())
            .with_included_from("main.txt".into(), 12),
        Token::new(EOF, "EOF").with_position(3, 3),
    ];

    let error = parser.parse(tokens).unwrap_err();

    assert_eq!(
        error.report().unwrap().message(),
        "Expected : <IDENTIFIER type> but was : <EOF [EOF]> (Line 3 / Column 3)\n"
    );

    let tokens = vec![
        Token::new(IDENTIFIER, "when")
            .with_position(3, 0)
            .with_uri("copy.txt".into())
            .with_included_from("main.txt".into(), 12),
        Token::new(EOF, "EOF").with_position(3, 4),
    ];

    let error = parser.parse(tokens).unwrap_err();

    assert_eq!(
        error.report().unwrap().message(),
        "Expected : <EOF type> but was : <when [IDENTIFIER]> (copy book 'copy.txt': Line 3 / \
         Column 0 called from file 'main.txt': Line 12)\n"
    );
}

#[test]
fn extended_stack_trace() {
    let parser = Parser::builder(statements())
        .with_lexer(WordLexer)
        .with_config(ParserConfig::default().with_source_code(false))
        .with_extended_stack_trace(true)
        .build();

    let error = parser.parse_str("let a be zero\nlet b be").unwrap_err();
    let report = error.report().unwrap();
    let trace = report.rule_trace().unwrap();

    assert_eq!(trace.rules().collect::<Vec<_>>(), vec!["root", "statement", "value"]);
    assert_eq!(
        report.message(),
        "Expected : <one> but was : <EOF [EOF]> (Line 2 / Column 8)\n\
         \x20 at value (Line 2 / Column 8)\n\
         \x20 at statement (Line 2 / Column 0)\n\
         \x20 at root (Line 1 / Column 0)\n"
    );
}

#[test]
fn extended_stack_trace_survives_memoization() {
    let mut g = GrammarBuilder::new();
    let root = g.rule("root");
    let first = g.rule("first");
    let second = g.rule("second");
    let word = g.rule("word");
    g.define(root).is(or!(first, second)).unwrap();
    g.define(first).is(and!(word, "x")).unwrap();
    g.define(second).is(and!(word, "y", EOF)).unwrap();
    g.define(word).is(and!(IDENTIFIER, IDENTIFIER)).unwrap();
    g.set_root(root);

    let parser = Parser::builder(g.build().unwrap())
        .with_lexer(WordLexer)
        .with_extended_stack_trace(true)
        .build();

    let error = parser.parse_str("a").unwrap_err();
    let trace = error.report().unwrap().rule_trace().unwrap();

    assert_eq!(trace.rules().collect::<Vec<_>>(), vec!["root", "second", "word"]);
}

#[test]
fn retry_with_extended_stack_trace() {
    let parser = parser();

    let error = parser.parse_str("let a be zero let").unwrap_err();
    assert!(error.is_to_retry_with_extended_stack_trace());
    assert!(error.report().unwrap().rule_trace().is_none());

    let parser = Parser::builder_from(&parser)
        .with_extended_stack_trace(true)
        .build();
    let error = parser.parse_str("let a be zero let").unwrap_err();
    let trace = error.report().unwrap().rule_trace().unwrap();

    assert_eq!(trace.len(), 2);
    assert_eq!(trace.entries()[1].rule, "statement");
    assert_eq!(trace.entries()[1].index, 4);
}
