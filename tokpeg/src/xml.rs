// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::fmt::{self, Write};

use crate::ast::AstNode;

/// Renders a syntax tree as indented XML, one element per node.
///
/// ```
/// # use std::sync::Arc;
/// # use tokpeg::{AstNode, AstNodeType, AstXmlPrinter, generic, Token};
/// let token = Arc::new(Token::new(generic::IDENTIFIER, "a").with_position(1, 2));
/// let mut root = AstNode::new(AstNodeType::Rule("root".into()), Some(Arc::clone(&token)), 0);
/// root.add_child(AstNode::from_token(token, 0));
///
/// assert_eq!(
///     AstXmlPrinter::print(&root),
///     "<root tokenValue=\"a\" tokenLine=\"1\" tokenColumn=\"2\">\n  \
///      <IDENTIFIER tokenValue=\"a\" tokenLine=\"1\" tokenColumn=\"2\"/>\n\
///      </root>\n"
/// );
/// ```
#[derive(Debug)]
pub struct AstXmlPrinter;

impl AstXmlPrinter {
    pub fn print(node: &AstNode) -> String {
        let mut xml = String::new();
        Self::print_to(node, &mut xml).expect("writing to a String cannot fail");
        xml
    }

    pub fn print_to<W: Write>(node: &AstNode, out: &mut W) -> fmt::Result {
        Self::print_node(node, 0, out)
    }

    fn print_node<W: Write>(node: &AstNode, level: usize, out: &mut W) -> fmt::Result {
        write!(out, "{:indent$}<{}", "", node.name(), indent = level * 2)?;

        if let Some(token) = node.token() {
            write!(
                out,
                " tokenValue=\"{}\" tokenLine=\"{}\" tokenColumn=\"{}\"",
                escape(token.value()),
                token.line(),
                token.column()
            )?;
            if let Some(origin) = token.included_from() {
                write!(
                    out,
                    " includedFrom=\"{}\" includedLine=\"{}\"",
                    escape(&origin.uri),
                    origin.line
                )?;
            }
        }

        if node.has_children() {
            out.write_str(">\n")?;
            for child in node.children() {
                Self::print_node(child, level + 1, out)?;
            }
            writeln!(out, "{:indent$}</{}>", "", node.name(), indent = level * 2)
        } else {
            out.write_str("/>\n")
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }

    escaped
}
