//! Depth-first leaf and node enumeration.
//!
//! All iterators here are lazy and restartable: each call builds a fresh
//! walk over the current tree, so enumerations always reflect mutations
//! made since the previous call. Order is depth-first, parent segment
//! before child segments, following insertion order at every level.
//!
//! Enumeration order is therefore insertion-order-derived: two structurally
//! equal trees built in different field orders enumerate differently.
//! Operations that fold over leaves without an explicit seed
//! ([`leaf_reduce`](crate::HierDict::leaf_reduce)) or chain adjacent pairs
//! ([`all_equal`](crate::HierDict::all_equal)) inherit this caveat.

use indexmap::map::Iter;

use crate::dict::dict::DELIMITER;
use crate::dict::value::Value;
use crate::dict::HierDict;

type Frame<'a, T> = (String, Iter<'a, String, Value<T>>);

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{DELIMITER}{name}")
    }
}

/// Depth-first iterator over `(leaf path, &payload)` pairs.
pub struct LeafItems<'a, T> {
    stack: Vec<Frame<'a, T>>,
}

impl<'a, T> Iterator for LeafItems<'a, T> {
    type Item = (String, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.1.next() {
                Some((name, value)) => {
                    let path = join(&top.0, name);
                    match value {
                        Value::Leaf(v) => return Some((path, v)),
                        Value::Node(d) => self.stack.push((path, d.iter())),
                    }
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Depth-first iterator over `(path, &value)` pairs including intermediate
/// nodes, each node yielded just before its contents.
pub struct NodeLeafItems<'a, T> {
    stack: Vec<Frame<'a, T>>,
}

impl<'a, T> Iterator for NodeLeafItems<'a, T> {
    type Item = (String, &'a Value<T>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.1.next() {
                Some((name, value)) => {
                    let path = join(&top.0, name);
                    if let Value::Node(d) = value {
                        self.stack.push((path.clone(), d.iter()));
                    }
                    return Some((path, value));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Depth-first iterator over leaf path strings.
pub struct LeafKeys<'a, T>(LeafItems<'a, T>);

impl<T> Iterator for LeafKeys<'_, T> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }
}

/// Depth-first iterator over node and leaf path strings.
pub struct NodeLeafKeys<'a, T>(NodeLeafItems<'a, T>);

impl<T> Iterator for NodeLeafKeys<'_, T> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }
}

impl<T> HierDict<T> {
    fn root_frame(&self) -> Vec<Frame<'_, T>> {
        vec![(String::new(), self.iter())]
    }

    /// Lazily enumerate the path of every leaf reachable from this tree.
    ///
    /// One path per leaf, no duplicates, O(total field count). Every
    /// returned path resolves via [`get`](Self::get) to a leaf.
    pub fn leaf_keys(&self) -> LeafKeys<'_, T> {
        LeafKeys(self.leaf_items())
    }

    /// Like [`leaf_keys`](Self::leaf_keys), but also yields the path of
    /// every intermediate node, just before descending into it.
    pub fn node_leaf_keys(&self) -> NodeLeafKeys<'_, T> {
        NodeLeafKeys(self.node_leaf_items())
    }

    /// Lazily enumerate `(leaf path, &payload)` pairs.
    pub fn leaf_items(&self) -> LeafItems<'_, T> {
        LeafItems {
            stack: self.root_frame(),
        }
    }

    /// Lazily enumerate `(path, &value)` pairs over nodes and leaves.
    pub fn node_leaf_items(&self) -> NodeLeafItems<'_, T> {
        NodeLeafItems {
            stack: self.root_frame(),
        }
    }

    /// Lazily enumerate every leaf payload.
    pub fn leaf_values(&self) -> impl Iterator<Item = &T> {
        self.leaf_items().map(|(_, v)| v)
    }

    /// Collect all leaf paths into a vector.
    pub fn list_leaf_keys(&self) -> Vec<String> {
        self.leaf_keys().collect()
    }

    /// Collect all node and leaf paths into a vector.
    pub fn list_node_leaf_keys(&self) -> Vec<String> {
        self.node_leaf_keys().collect()
    }
}
