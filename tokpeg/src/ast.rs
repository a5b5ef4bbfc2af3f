// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Syntax trees produced by successful parses.

use std::fmt;
use std::sync::Arc;

use crate::token::{Token, TokenType};

/// How a node is attached to its parent.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum AstSkip {
    /// The node is kept as is.
    #[default]
    Never,
    /// The node is replaced by its children.
    Always,
    /// The node is replaced by its only child when it has exactly one.
    IfOneChild,
}

/// What a node stands for.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum AstNodeType {
    /// A grammar rule.
    Rule(Arc<str>),
    /// A token leaf.
    Token(TokenType),
    /// A node built by a combinator which groups tokens, e.g. `till` or `bridge`.
    Synthetic(&'static str),
}

/// A node of the syntax tree.
///
/// Subtrees are shared: cloning a node only bumps a reference count, and mutating a shared
/// node copies its own fields and the list of its direct children, never the nodes below.
/// The covered token range is `[from_index, to_index)` in the parsed token stream.
#[derive(Clone, Eq, PartialEq)]
pub struct AstNode {
    data: Arc<AstNodeData>,
}

#[derive(Clone, Eq, PartialEq)]
struct AstNodeData {
    ty: AstNodeType,
    token: Option<Arc<Token>>,
    from_index: usize,
    to_index: usize,
    skip: AstSkip,
    children: Vec<AstNode>,
}

impl AstNode {
    pub fn new(ty: AstNodeType, token: Option<Arc<Token>>, from_index: usize) -> AstNode {
        AstNode {
            data: Arc::new(AstNodeData {
                ty,
                token,
                from_index,
                to_index: from_index,
                skip: AstSkip::Never,
                children: Vec::new(),
            }),
        }
    }

    /// Creates the leaf of the token found at `index`.
    pub fn from_token(token: Arc<Token>, index: usize) -> AstNode {
        let mut node = AstNode::new(AstNodeType::Token(token.ty()), Some(token), index);
        node.set_to_index(index + 1);
        node
    }

    #[inline]
    fn data_mut(&mut self) -> &mut AstNodeData {
        Arc::make_mut(&mut self.data)
    }

    pub fn with_skip(mut self, skip: AstSkip) -> AstNode {
        self.data_mut().skip = skip;
        self
    }

    pub fn set_to_index(&mut self, to_index: usize) {
        self.data_mut().to_index = to_index;
    }

    /// Attaches `child`, honouring its skip policy: a skipped child hands its own children
    /// over instead of being attached.
    ///
    /// ```
    /// # use tokpeg::{AstNode, AstNodeType, AstSkip};
    /// let mut parent = AstNode::new(AstNodeType::Synthetic("parent"), None, 0);
    /// let mut skipped = AstNode::new(AstNodeType::Synthetic("skipped"), None, 0)
    ///     .with_skip(AstSkip::Always);
    /// skipped.add_child(AstNode::new(AstNodeType::Synthetic("a"), None, 0));
    /// skipped.add_child(AstNode::new(AstNodeType::Synthetic("b"), None, 0));
    ///
    /// parent.add_child(skipped);
    ///
    /// let names: Vec<_> = parent.children().iter().map(|child| child.name()).collect();
    /// assert_eq!(names, ["a", "b"]);
    /// ```
    pub fn add_child(&mut self, mut child: AstNode) {
        let splice = match child.data.skip {
            AstSkip::Always => true,
            AstSkip::IfOneChild => child.data.children.len() == 1,
            AstSkip::Never => false,
        };

        if splice {
            self.add_children(child.take_children());
        } else {
            self.data_mut().children.push(child);
        }
    }

    pub fn add_children<I>(&mut self, children: I)
    where
        I: IntoIterator<Item = AstNode>,
    {
        for child in children {
            self.add_child(child);
        }
    }

    /// Detaches and returns all children.
    pub fn take_children(&mut self) -> Vec<AstNode> {
        std::mem::take(&mut self.data_mut().children)
    }

    /// Returns `true` if both nodes are the same shared subtree.
    #[inline]
    pub fn ptr_eq(&self, other: &AstNode) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn node_type(&self) -> &AstNodeType {
        &self.data.ty
    }

    /// Rule name, token type name or combinator name.
    pub fn name(&self) -> &str {
        match &self.data.ty {
            AstNodeType::Rule(name) => name,
            AstNodeType::Token(ty) => ty.name(),
            AstNodeType::Synthetic(name) => name,
        }
    }

    /// Returns `true` for a token leaf of type `ty`.
    pub fn is(&self, ty: TokenType) -> bool {
        matches!(self.data.ty, AstNodeType::Token(t) if t == ty)
    }

    /// Returns `true` for a node of the rule `name`.
    pub fn is_rule(&self, name: &str) -> bool {
        matches!(&self.data.ty, AstNodeType::Rule(rule) if &**rule == name)
    }

    #[inline]
    pub fn skip(&self) -> AstSkip {
        self.data.skip
    }

    /// The token the node starts at. Nodes which matched no token have none, unless the
    /// stream still had one at that position.
    pub fn token(&self) -> Option<&Token> {
        self.data.token.as_deref()
    }

    pub fn token_value(&self) -> Option<&str> {
        self.token().map(Token::value)
    }

    pub fn token_line(&self) -> Option<usize> {
        self.token().map(Token::line)
    }

    /// Returns `true` if this node is a token leaf rather than a grouping node.
    pub fn has_token(&self) -> bool {
        matches!(self.data.ty, AstNodeType::Token(_))
    }

    #[inline]
    pub fn from_index(&self) -> usize {
        self.data.from_index
    }

    #[inline]
    pub fn to_index(&self) -> usize {
        self.data.to_index
    }

    #[inline]
    pub fn children(&self) -> &[AstNode] {
        &self.data.children
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.data.children.is_empty()
    }

    #[inline]
    pub fn number_of_children(&self) -> usize {
        self.data.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&AstNode> {
        self.data.children.get(index)
    }

    pub fn first_child(&self) -> Option<&AstNode> {
        self.data.children.first()
    }

    pub fn last_child(&self) -> Option<&AstNode> {
        self.data.children.last()
    }

    /// First direct child called `name`.
    pub fn find_first_direct_child(&self, name: &str) -> Option<&AstNode> {
        self.data.children.iter().find(|child| child.name() == name)
    }

    /// All direct children called `name`.
    pub fn find_direct_children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AstNode> {
        self.data.children.iter().filter(move |child| child.name() == name)
    }

    /// First descendant called `name`, depth-first.
    pub fn find_first_child(&self, name: &str) -> Option<&AstNode> {
        self.descendants().find(|node| node.name() == name)
    }

    /// Depth-first, pre-order iterator over all descendants, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.data.children.iter().rev().collect(),
        }
    }

    /// Concatenated values of all token leaves below this node, separated by spaces.
    pub fn token_values(&self) -> String {
        let leaves = std::iter::once(self)
            .chain(self.descendants())
            .filter(|node| node.has_token())
            .filter_map(AstNode::token_value)
            .collect::<Vec<_>>();

        leaves.join(" ")
    }

    /// Serializes the tree to pretty-printed JSON.
    ///
    /// ```
    /// # use tokpeg::{AstNode, AstNodeType};
    /// let node = AstNode::new(AstNodeType::Synthetic("empty"), None, 0);
    ///
    /// assert!(node.to_json().contains("\"empty\""));
    /// ```
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("Failed to pretty-print AstNode to json.")
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;

        if let Some(token) = self.token() {
            write!(f, " tokenValue='{}' tokenLine={}", token.value(), token.line())?;
        }

        Ok(())
    }
}

impl fmt::Debug for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstNode")
            .field("ty", &self.data.ty)
            .field("token", &self.data.token)
            .field("from_index", &self.data.from_index)
            .field("to_index", &self.data.to_index)
            .field("skip", &self.data.skip)
            .field("children", &self.data.children)
            .finish()
    }
}

/// Iterator returned by [`AstNode::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a AstNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a AstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.data.children.iter().rev());
        Some(node)
    }
}

#[cfg(feature = "json")]
impl serde::Serialize for AstNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut ser = serializer.serialize_struct("AstNode", 5)?;
        ser.serialize_field("name", self.name())?;
        ser.serialize_field("from", &self.data.from_index)?;
        ser.serialize_field("to", &self.data.to_index)?;
        if self.has_token() {
            ser.serialize_field("token", &self.token())?;
        } else {
            ser.skip_field("token")?;
        }
        ser.serialize_field("children", &self.data.children)?;
        ser.end()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::token::generic;

    fn rule(name: &str) -> AstNode {
        AstNode::new(AstNodeType::Rule(name.into()), None, 0)
    }

    fn leaf(value: &str, index: usize) -> AstNode {
        AstNode::from_token(
            Arc::new(Token::new(generic::IDENTIFIER, value)),
            index,
        )
    }

    #[test]
    fn skip_if_one_child() {
        let mut parent = rule("parent");

        let mut single = rule("single").with_skip(AstSkip::IfOneChild);
        single.add_child(leaf("a", 0));
        parent.add_child(single);

        let mut double = rule("double").with_skip(AstSkip::IfOneChild);
        double.add_child(leaf("b", 1));
        double.add_child(leaf("c", 2));
        parent.add_child(double);

        let names: Vec<_> = parent.children().iter().map(AstNode::name).collect();
        assert_eq!(names, ["IDENTIFIER", "double"]);
        assert_eq!(parent.child(0).and_then(AstNode::token_value), Some("a"));
    }

    #[test]
    fn descendants_are_pre_order() {
        let mut root = rule("root");
        let mut left = rule("left");
        left.add_child(leaf("a", 0));
        left.add_child(leaf("b", 1));
        root.add_child(left);
        root.add_child(leaf("c", 2));

        let names: Vec<_> = root
            .descendants()
            .map(|node| node.token_value().unwrap_or(node.name()))
            .collect();
        assert_eq!(names, ["left", "a", "b", "c"]);
        assert_eq!(root.token_values(), "a b c");
        assert_eq!(root.find_first_child("IDENTIFIER").and_then(AstNode::token_value), Some("a"));
        assert!(root.find_first_direct_child("IDENTIFIER").is_some());
        assert_eq!(root.find_direct_children("left").count(), 1);
    }

    #[test]
    fn token_predicates() {
        let node = leaf("a", 3);

        assert!(node.is(generic::IDENTIFIER));
        assert!(!node.is(generic::EOF));
        assert!(!node.is_rule("IDENTIFIER"));
        assert_eq!((node.from_index(), node.to_index()), (3, 4));
    }

    #[test]
    fn take_children() {
        let mut root = rule("root");
        root.add_child(leaf("a", 0));

        assert_eq!(root.take_children().len(), 1);
        assert!(!root.has_children());
    }

    #[test]
    fn clones_share_subtrees() {
        let mut inner = rule("inner");
        inner.add_child(leaf("a", 0));
        let mut root = rule("root");
        root.add_child(inner.clone());

        assert!(root.child(0).map_or(false, |child| child.ptr_eq(&inner)));

        let mut copy = root.clone();
        assert!(copy.ptr_eq(&root));

        copy.add_child(leaf("b", 1));
        assert!(!copy.ptr_eq(&root));
        assert_eq!(root.number_of_children(), 1);
        assert_eq!(copy.number_of_children(), 2);
        assert!(copy.child(0).map_or(false, |child| child.ptr_eq(&inner)));
    }

    #[test]
    fn splicing_a_shared_node_leaves_it_intact() {
        let mut skipped = rule("skipped").with_skip(AstSkip::Always);
        skipped.add_child(leaf("a", 0));
        skipped.add_child(leaf("b", 1));
        let kept = skipped.clone();

        let mut parent = rule("parent");
        parent.add_child(skipped);

        assert_eq!(parent.number_of_children(), 2);
        assert_eq!(kept.number_of_children(), 2);
    }
}
