//! Core hierarchical dictionary: ordered storage plus the path resolver.

use indexmap::IndexMap;

use crate::dict::value::Value;
use crate::error::{Error, Result};

/// The reserved path delimiter separating field names in compound keys.
///
/// Field names must never contain it; compound keys are decomposed before
/// anything reaches storage.
pub const DELIMITER: char = '/';

/// Reserved key probed by interactive environments when introspecting
/// objects. It is excluded from auto-vivification so a stray probe never
/// materializes a node.
pub const INTROSPECTION_SENTINEL: &str = "_ipython_canary_method_should_not_exist_";

/// Split a compound key into its head segment and the remainder.
///
/// A trailing delimiter (empty remainder) degenerates to a direct
/// single-segment access on the head.
fn split_key(key: &str) -> (&str, Option<&str>) {
    match key.split_once(DELIMITER) {
        Some((head, rest)) if !rest.is_empty() => (head, Some(rest)),
        Some((head, _)) => (head, None),
        None => (key, None),
    }
}

/// A nested, path-addressed dictionary.
///
/// Fields are kept in insertion order and map a `String` name to a
/// [`Value<T>`]: either an opaque leaf payload of type `T` or a nested
/// `HierDict<T>` node. Compound keys like `"a/b/c"` address values at
/// arbitrary depth; writes auto-create missing intermediate nodes
/// (vivification) unless the tree has been [frozen](HierDict::freeze).
///
/// Sub-trees are exclusively owned by their parent: inserting a
/// `Value::Node` moves it, and `Clone` is the explicit deep copy. There is
/// no reference sharing between trees.
///
/// ## Type Parameters
///
/// - `T`: the leaf payload type. Use the crate's [`Payload`](crate::Payload)
///   enum for heterogeneous trees, or any domain type directly.
#[derive(Debug, Clone)]
pub struct HierDict<T> {
    fields: IndexMap<String, Value<T>>,
    frozen: bool,
}

impl<T> Default for HierDict<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Equality compares structure and payloads only; the frozen flag is a
/// write-mode setting, not data.
impl<T: PartialEq> PartialEq for HierDict<T> {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<T> HierDict<T> {
    /// Create a new empty dictionary.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            frozen: false,
        }
    }

    /// Number of direct fields (leaves and nodes) at this level.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether this level has no direct fields.
    ///
    /// Note this differs from [`is_empty`](Self::is_empty), which asks
    /// whether any leaf exists at any depth.
    pub fn has_no_fields(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the direct fields at this level, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value<T>> {
        self.fields.iter()
    }

    /// Direct field names at this level, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Check whether a direct field exists at this level (no path splitting).
    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Addressed (subscript-style) lookup.
    ///
    /// A key containing the delimiter is split into `(head, rest)` and the
    /// lookup recurses into the node named `head`. A missing segment fails
    /// with [`Error::KeyNotFound`]; descending through a leaf fails with
    /// [`Error::NotANode`]. Never returns a silent default.
    pub fn get(&self, key: &str) -> Result<&Value<T>> {
        let (head, rest) = split_key(key);
        let value = self.fields.get(head).ok_or_else(|| Error::KeyNotFound {
            path: head.to_string(),
        })?;
        match rest {
            None => Ok(value),
            Some(rest) => match value {
                Value::Node(d) => d.get(rest),
                Value::Leaf(_) => Err(Error::NotANode {
                    path: head.to_string(),
                }),
            },
        }
    }

    /// Mutable addressed lookup. Same resolution rules as [`get`](Self::get).
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value<T>> {
        let (head, rest) = split_key(key);
        let value = self
            .fields
            .get_mut(head)
            .ok_or_else(|| Error::KeyNotFound {
                path: head.to_string(),
            })?;
        match rest {
            None => Ok(value),
            Some(rest) => match value {
                Value::Node(d) => d.get_mut(rest),
                Value::Leaf(_) => Err(Error::NotANode {
                    path: head.to_string(),
                }),
            },
        }
    }

    /// Addressed lookup that must resolve to a leaf.
    pub fn get_leaf(&self, key: &str) -> Result<&T> {
        match self.get(key)? {
            Value::Leaf(v) => Ok(v),
            Value::Node(_) => Err(Error::Assertion(format!(
                "'{key}' is a node, expected a leaf"
            ))),
        }
    }

    /// Addressed lookup that must resolve to a node.
    pub fn get_node(&self, key: &str) -> Result<&HierDict<T>> {
        match self.get(key)? {
            Value::Node(d) => Ok(d),
            Value::Leaf(_) => Err(Error::Assertion(format!(
                "'{key}' is a leaf, expected a node"
            ))),
        }
    }

    /// Attribute-style access to a direct field.
    ///
    /// No path splitting is performed. A missing field fails with
    /// [`Error::AttributeNotFound`], a distinct kind from the addressed
    /// lookup's [`Error::KeyNotFound`].
    pub fn attr(&self, name: &str) -> Result<&Value<T>> {
        self.fields.get(name).ok_or_else(|| Error::AttributeNotFound {
            name: name.to_string(),
        })
    }

    /// Addressed (subscript-style) write.
    ///
    /// The key is decomposed like [`get`](Self::get); missing intermediate
    /// nodes are auto-created (vivification), except for the reserved
    /// [`INTROSPECTION_SENTINEL`] key, which is never vivified. After
    /// [`freeze`](Self::freeze), a write that would vivify fails with
    /// [`Error::VivificationDisabled`]. The terminal segment stores `value`
    /// directly, overwriting any previous value.
    pub fn set(&mut self, key: &str, value: Value<T>) -> Result<()> {
        let (head, rest) = split_key(key);
        match rest {
            None => {
                self.fields.insert(head.to_string(), value);
                Ok(())
            }
            Some(rest) => {
                if !self.fields.contains_key(head) {
                    if head == INTROSPECTION_SENTINEL {
                        return Err(Error::KeyNotFound {
                            path: head.to_string(),
                        });
                    }
                    if self.frozen {
                        return Err(Error::VivificationDisabled {
                            path: key.to_string(),
                        });
                    }
                    self.fields
                        .insert(head.to_string(), Value::Node(HierDict::new()));
                }
                match self.fields.get_mut(head) {
                    Some(Value::Node(d)) => d.set(rest, value),
                    Some(Value::Leaf(_)) => Err(Error::NotANode {
                        path: head.to_string(),
                    }),
                    None => Err(Error::KeyNotFound {
                        path: head.to_string(),
                    }),
                }
            }
        }
    }

    /// Sugar for storing a leaf payload: `set(key, Value::Leaf(leaf))`.
    pub fn set_leaf(&mut self, key: &str, leaf: T) -> Result<()> {
        self.set(key, Value::Leaf(leaf))
    }

    /// Internal write used when rebuilding trees from enumerated leaf paths.
    ///
    /// Always vivifies, ignores the frozen flag and the sentinel, and
    /// replaces a leaf blocking the descent with a fresh node. Safe because
    /// enumerated leaf-path sets are prefix-free.
    pub(crate) fn force_set(&mut self, key: &str, value: Value<T>) {
        let (head, rest) = split_key(key);
        match rest {
            None => {
                self.fields.insert(head.to_string(), value);
            }
            Some(rest) => {
                let slot = self
                    .fields
                    .entry(head.to_string())
                    .or_insert_with(|| Value::Node(HierDict::new()));
                if !slot.is_node() {
                    *slot = Value::Node(HierDict::new());
                }
                if let Value::Node(node) = slot {
                    node.force_set(rest, value);
                }
            }
        }
    }

    /// Disable auto-vivification on this tree and all current descendants.
    ///
    /// Subsequent writes that would need to create an intermediate node
    /// fail with [`Error::VivificationDisabled`]. Direct single-segment
    /// writes and writes along existing paths remain allowed.
    pub fn freeze(&mut self) -> &mut Self {
        self.frozen = true;
        for value in self.fields.values_mut() {
            if let Value::Node(d) = value {
                d.freeze();
            }
        }
        self
    }

    /// Whether vivification has been disabled via [`freeze`](Self::freeze).
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Build a flat tree from equal-length key and value sequences.
    ///
    /// Keys may be compound paths. Fails with [`Error::Assertion`] on a
    /// length mismatch.
    pub fn from_kvs(keys: &[&str], values: Vec<Value<T>>) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(Error::Assertion(format!(
                "from_kvs length mismatch: {} keys, {} values",
                keys.len(),
                values.len()
            )));
        }
        let mut out = Self::new();
        for (key, value) in keys.iter().zip(values) {
            out.set(key, value)?;
        }
        Ok(out)
    }
}

impl<T: Clone> HierDict<T> {
    /// Flatten all leaves into a plain mapping keyed by full path string.
    ///
    /// Lossy: node structure is gone, only leaf paths survive as flat keys.
    pub fn as_dict(&self) -> IndexMap<String, T> {
        self.leaf_items().map(|(k, v)| (k, v.clone())).collect()
    }
}
