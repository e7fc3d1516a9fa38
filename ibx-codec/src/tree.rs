//! Document tree model.
//!
//! An [`Element`] owns its properties and its child elements in two separate
//! ordered lists, so "properties before elements" in the binary stream is a
//! property of the type rather than of a sort step. [`Node`] is the closed
//! borrowed view used when both kinds have to be visited in one sequence.
//!
//! Two orders matter:
//!
//! - **enumeration order** ([`Element::walk`]): an element, then each child
//!   element's subtree, then the element's properties. String and typed value
//!   indices are assigned in this order.
//! - **emission order**: an element's properties, then its child elements.
//!   This is the order of the binary stream and of the XML output.

use serde::Serialize;

use crate::error::{CodecError, Result};
use crate::value::Scalar;

/// Encoding marker written by the reference producer.
pub const DEFAULT_ENCODING: u8 = 0x01;

/// Deepest element nesting any codec pass accepts; the root is level 1.
pub const MAX_DEPTH: usize = 256;

/// A decoded or to-be-encoded IBX1 document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Opaque byte stored between the tables and the tree.
    pub encoding: u8,
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            encoding: DEFAULT_ENCODING,
            root,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub name: String,
    pub properties: Vec<Property>,
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: Scalar,
}

/// Either kind of tree node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Element(&'a Element),
    Property(&'a Property),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Scalar) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Iterate over this subtree in enumeration order.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![Node::Element(self)],
        }
    }

    /// Levels of element nesting in this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((element, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(element.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Fail with [`CodecError::NestingTooDeep`] past [`MAX_DEPTH`].
    pub fn check_depth(&self) -> Result<()> {
        if self.depth() > MAX_DEPTH {
            return Err(CodecError::NestingTooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    /// Number of elements and properties in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }
}

impl Property {
    pub fn new(name: impl Into<String>, value: Scalar) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Depth-first iterator produced by [`Element::walk`].
pub struct Walk<'a> {
    stack: Vec<Node<'a>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Node::Element(element) = node {
            // Pushed in reverse: children pop first and in order, properties
            // only after every child subtree is done.
            self.stack
                .extend(element.properties.iter().rev().map(Node::Property));
            self.stack
                .extend(element.children.iter().rev().map(Node::Element));
        }
        Some(node)
    }
}
