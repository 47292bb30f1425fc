//! Tree nodes, and a way to reference them.
//!
//! The document tree is made of reference-counted [`rctree`] nodes; each
//! node's payload is a [`NodeData`], either an element or character content.

use std::cell::{Ref, RefMut};
use std::fmt;

use crate::element::Element;

/// Data for a single DOM node.
pub enum NodeData {
    Element(Box<Element>),
    Text(String),
}

pub type Node = rctree::Node<NodeData>;

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeData::Element(e) => e.fmt(f),
            NodeData::Text(_) => write!(f, "Text"),
        }
    }
}

/// Helper trait to get different NodeData variants
pub trait NodeBorrow {
    /// Returns `false` for NodeData::Element, `true` for NodeData::Text
    fn is_chars(&self) -> bool;

    /// Returns `true` for NodeData::Element, `false` for NodeData::Text
    fn is_element(&self) -> bool;

    /// Borrows character content.
    ///
    /// Panics: will panic if `&self` is not a `NodeData::Text` node
    fn borrow_chars(&self) -> Ref<'_, String>;

    /// Borrows an `Element` reference
    ///
    /// Panics: will panic if `&self` is not a `NodeData::Element` node
    fn borrow_element(&self) -> Ref<'_, Element>;

    /// Borrows an `Element` reference mutably
    ///
    /// Panics: will panic if `&self` is not a `NodeData::Element` node
    fn borrow_element_mut(&mut self) -> RefMut<'_, Element>;
}

impl NodeBorrow for Node {
    fn is_chars(&self) -> bool {
        matches!(*self.borrow(), NodeData::Text(_))
    }

    fn is_element(&self) -> bool {
        matches!(*self.borrow(), NodeData::Element(_))
    }

    fn borrow_chars(&self) -> Ref<'_, String> {
        Ref::map(self.borrow(), |n| match *n {
            NodeData::Text(ref t) => t,
            _ => panic!("tried to borrow_chars for a non-text node"),
        })
    }

    fn borrow_element(&self) -> Ref<'_, Element> {
        Ref::map(self.borrow(), |n| match *n {
            NodeData::Element(ref e) => &**e,
            _ => panic!("tried to borrow_element for a non-element node"),
        })
    }

    fn borrow_element_mut(&mut self) -> RefMut<'_, Element> {
        RefMut::map(self.borrow_mut(), |n| match *n {
            NodeData::Element(ref mut e) => &mut **e,
            _ => panic!("tried to borrow_element_mut for a non-element node"),
        })
    }
}

/// Iterates a node's element children in document order.
pub fn element_children(node: &Node) -> impl Iterator<Item = Node> {
    node.children().filter(|c| c.is_element())
}

/// Concatenated character content of a node's direct text children.
pub fn text_content(node: &Node) -> String {
    let mut out = String::new();

    for child in node.children().filter(|c| c.is_chars()) {
        out.push_str(&child.borrow_chars());
    }

    out
}
