//! Tagged leaf/node value.

use core::fmt;

use crate::dict::HierDict;

/// A stored value: either an opaque leaf payload or a nested sub-tree.
///
/// The tag is the sole source of the node-vs-leaf classification; no
/// separate marker exists anywhere else.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<T> {
    /// An opaque payload (scalar, array, anything else).
    Leaf(T),
    /// A nested hierarchical dictionary.
    Node(HierDict<T>),
}

impl<T> Value<T> {
    /// Check if this is a leaf value.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Value::Leaf(_))
    }

    /// Check if this is a nested sub-tree.
    pub fn is_node(&self) -> bool {
        matches!(self, Value::Node(_))
    }

    /// Get the payload if this is a leaf.
    pub fn as_leaf(&self) -> Option<&T> {
        match self {
            Value::Leaf(v) => Some(v),
            _ => None,
        }
    }

    /// Get the sub-tree if this is a node.
    pub fn as_node(&self) -> Option<&HierDict<T>> {
        match self {
            Value::Node(d) => Some(d),
            _ => None,
        }
    }

    /// Get the sub-tree mutably if this is a node.
    pub fn as_node_mut(&mut self) -> Option<&mut HierDict<T>> {
        match self {
            Value::Node(d) => Some(d),
            _ => None,
        }
    }

    /// Consume and return the payload if this is a leaf.
    pub fn into_leaf(self) -> Option<T> {
        match self {
            Value::Leaf(v) => Some(v),
            _ => None,
        }
    }

    /// Consume and return the sub-tree if this is a node.
    pub fn into_node(self) -> Option<HierDict<T>> {
        match self {
            Value::Node(d) => Some(d),
            _ => None,
        }
    }
}

impl<T> From<HierDict<T>> for Value<T> {
    fn from(dict: HierDict<T>) -> Self {
        Value::Node(dict)
    }
}

impl<T: fmt::Display> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Leaf(v) => write!(f, "{v}"),
            Value::Node(d) => write!(f, "<node: {} fields>", d.len()),
        }
    }
}
