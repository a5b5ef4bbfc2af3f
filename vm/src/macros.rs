// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

#[doc(hidden)]
#[macro_export]
macro_rules! consumes_to {
    ( $nodes:expr, [] ) => {
        if let Some(node) = $nodes.next() {
            panic!(
                "expected no more nodes but found {} ({}, {})",
                node.name(),
                node.from_index(),
                node.to_index()
            );
        }
    };
    ( $nodes:expr, [ $name:ident ( $start:expr, $end:expr )
                     $( , $names:ident $calls:tt )* $(,)* ] ) => {
        {
            let expected = format!("expected {} ({}, {})", stringify!($name), $start, $end);
            let node = $nodes
                .next()
                .unwrap_or_else(|| panic!("{} but found nothing", expected));

            if node.name() != stringify!($name)
                || node.from_index() != $start
                || node.to_index() != $end
            {
                panic!(
                    "{} but found {} ({}, {})",
                    expected,
                    node.name(),
                    node.from_index(),
                    node.to_index()
                );
            }
        }

        $crate::consumes_to!($nodes, [ $( $names $calls ),* ]);
    };
    ( $nodes:expr, [ $name:ident ( $start:expr, $end:expr,
                     [ $( $nested_names:ident $nested_calls:tt ),* $(,)* ] )
                     $( , $names:ident $calls:tt )* $(,)* ] ) => {
        {
            let expected = format!("expected {} ({}, {})", stringify!($name), $start, $end);
            let node = $nodes
                .next()
                .unwrap_or_else(|| panic!("{} but found nothing", expected));

            if node.name() != stringify!($name)
                || node.from_index() != $start
                || node.to_index() != $end
            {
                panic!(
                    "{} but found {} ({}, {})",
                    expected,
                    node.name(),
                    node.from_index(),
                    node.to_index()
                );
            }

            let mut children = node.children().iter();
            $crate::consumes_to!(children, [ $( $nested_names $nested_calls ),* ]);
        }

        $crate::consumes_to!($nodes, [ $( $names $calls ),* ]);
    };
}

/// Asserts that `input`, lexed by the parser's lexer, parses with `rule` into the given tree.
///
/// Nodes are written `name(from, to)`, or `name(from, to, [children])` to also check their
/// children. Indices are token indices; children left out of a node are not checked.
///
/// ```
/// # use tokpeg::generic::{EOF, IDENTIFIER};
/// # use tokpeg::{Lexer, LexerError, Token};
/// # use tokpeg_meta::{and, GrammarBuilder};
/// # use tokpeg_vm::{parses_to, Parser};
/// # struct Words;
/// # impl Lexer for Words {
/// #     fn lex_with_uri(&self, source: &str, _: Option<&str>) -> Result<Vec<Token>, LexerError> {
/// #         let mut tokens: Vec<_> =
/// #             source.split_whitespace().map(|w| Token::new(IDENTIFIER, w)).collect();
/// #         tokens.push(Token::new(EOF, "EOF"));
/// #         Ok(tokens)
/// #     }
/// # }
/// let mut g = GrammarBuilder::new();
/// let pair = g.rule("pair");
/// g.define(pair).is(and!(IDENTIFIER, "=", IDENTIFIER, EOF)).unwrap();
/// g.set_root(pair);
/// let parser = Parser::builder(g.build().unwrap()).with_lexer(Words).build();
///
/// parses_to! {
///     parser: parser,
///     input: "a = b",
///     rule: "pair",
///     tree: [
///         pair(0, 4, [
///             IDENTIFIER(0, 1),
///             IDENTIFIER(1, 2),
///             IDENTIFIER(2, 3),
///             EOF(3, 4)
///         ])
///     ]
/// };
/// ```
#[macro_export]
macro_rules! parses_to {
    ( parser: $parser:expr, input: $string:expr, rule: $rule:expr,
      tree: [ $( $names:ident $calls:tt ),* $(,)* ] ) => {

        #[allow(unused_mut)]
        {
            let parser = &$parser;
            let node = match parser.parse_rule_str($rule, $string) {
                Ok(node) => node,
                Err(error) => panic!("expected a successful parse but failed with\n{}", error),
            };
            let mut nodes = ::std::iter::once(&node);

            $crate::consumes_to!(nodes, [ $( $names $calls ),* ]);
        }
    };
}

/// Asserts that `input` is rejected by `rule`, with the furthest failure expecting `expected`
/// (in EBNF form) at token `index`.
#[macro_export]
macro_rules! fails_with {
    ( parser: $parser:expr, input: $string:expr, rule: $rule:expr,
      expected: $expected:expr, index: $index:expr ) => {
        {
            let parser = &$parser;
            let error = match parser.parse_rule_str($rule, $string) {
                Ok(node) => panic!("expected a failure but parsed {}", node),
                Err(error) => error,
            };
            let report = match error.report() {
                Some(report) => report,
                None => panic!("expected a recognition error but found: {}", error),
            };

            assert_eq!(report.expected(), $expected);
            assert_eq!(report.index(), $index);
        }
    };
}
