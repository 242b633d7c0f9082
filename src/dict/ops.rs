//! Functional operators over leaf and node-leaf enumerations.
//!
//! Every operator works by enumerating leaf (or node-leaf) items and
//! building a fresh output tree through addressed writes; only
//! `leaf_modify` and the combine family mutate in place, and say so.

use std::collections::HashSet;

use crate::dict::value::Value;
use crate::dict::HierDict;
use crate::error::{Error, Result};

fn sorted(mut keys: Vec<String>) -> Vec<String> {
    keys.sort();
    keys
}

impl<T> HierDict<T> {
    /// Whether the tree holds no leaf values at any depth.
    ///
    /// A tree made only of empty nodes counts as empty.
    pub fn is_empty(&self) -> bool {
        self.leaf_items().next().is_none()
    }

    /// First leaf payload in enumeration order.
    pub fn get_one(&self) -> Result<&T> {
        self.leaf_values()
            .next()
            .ok_or_else(|| Error::Assertion("get_one on a tree with no leaves".into()))
    }

    /// Whether `key` is a leaf path of this tree.
    pub fn has_leaf_key(&self, key: &str) -> bool {
        self.leaf_keys().any(|k| k == key)
    }

    /// Whether every key in `keys` is a leaf path of this tree.
    pub fn has_leaf_keys(&self, keys: &[&str]) -> bool {
        let own: HashSet<String> = self.leaf_keys().collect();
        keys.iter().all(|k| own.contains(*k))
    }

    /// Whether `key` is a node or leaf path of this tree.
    pub fn has_node_leaf_key(&self, key: &str) -> bool {
        self.node_leaf_keys().any(|k| k == key)
    }

    /// Whether every key in `keys` is a node or leaf path of this tree.
    pub fn has_node_leaf_keys(&self, keys: &[&str]) -> bool {
        let own: HashSet<String> = self.node_leaf_keys().collect();
        keys.iter().all(|k| own.contains(*k))
    }

    /// True iff the tree has at most one leaf or every adjacent pair in
    /// leaf enumeration order satisfies `eq`.
    ///
    /// This chains adjacent pairs rather than checking all pairs, which is
    /// sufficient only for transitive `eq`. Enumeration order is
    /// insertion-order-derived; see the [traversal docs](crate::dict::traverse).
    pub fn all_equal(&self, eq: impl Fn(&T, &T) -> bool) -> bool {
        let values: Vec<&T> = self.leaf_values().collect();
        values.windows(2).all(|w| eq(w[0], w[1]))
    }

    /// Assert `pred` on every leaf payload; fails with the paths of all
    /// offending leaves.
    pub fn leaf_assert(&self, pred: impl Fn(&T) -> bool) -> Result<()> {
        let failing: Vec<String> = self
            .leaf_items()
            .filter(|(_, v)| !pred(v))
            .map(|(k, _)| k)
            .collect();
        if failing.is_empty() {
            Ok(())
        } else {
            Err(Error::Assertion(format!(
                "leaf_assert failed at {failing:?}"
            )))
        }
    }

    /// Leaf keys of this tree that also appear in `keys`. Sorted.
    pub fn leaf_key_intersection(&self, keys: &[&str]) -> Vec<String> {
        let other: HashSet<&str> = keys.iter().copied().collect();
        sorted(self.leaf_keys().filter(|k| other.contains(k.as_str())).collect())
    }

    /// Leaf keys of this tree that do not appear in `keys`. Sorted.
    pub fn leaf_key_difference(&self, keys: &[&str]) -> Vec<String> {
        let other: HashSet<&str> = keys.iter().copied().collect();
        sorted(
            self.leaf_keys()
                .filter(|k| !other.contains(k.as_str()))
                .collect(),
        )
    }

    /// Keys in exactly one of this tree's leaf-key set and `keys`. Sorted.
    pub fn leaf_key_symmetric_difference(&self, keys: &[&str]) -> Vec<String> {
        let own: HashSet<String> = self.leaf_keys().collect();
        let other: HashSet<&str> = keys.iter().copied().collect();
        let mut out: Vec<String> = own
            .iter()
            .filter(|k| !other.contains(k.as_str()))
            .cloned()
            .chain(
                other
                    .iter()
                    .filter(|k| !own.contains(**k))
                    .map(|k| k.to_string()),
            )
            .collect();
        out.sort();
        out
    }

    /// Keys from `keys` that are not leaf paths of this tree. Sorted.
    pub fn leaf_key_missing(&self, keys: &[&str]) -> Vec<String> {
        let own: HashSet<String> = self.leaf_keys().collect();
        sorted(
            keys.iter()
                .filter(|k| !own.contains(**k))
                .map(|k| k.to_string())
                .collect(),
        )
    }

    /// Keys from `keys` that are node or leaf paths of this tree. Sorted.
    pub fn node_leaf_key_overlap(&self, keys: &[&str]) -> Vec<String> {
        let other: HashSet<&str> = keys.iter().copied().collect();
        sorted(
            self.node_leaf_keys()
                .filter(|k| other.contains(k.as_str()))
                .collect(),
        )
    }

    /// Node and leaf paths of this tree that do not appear in `keys`. Sorted.
    pub fn node_leaf_key_leftovers(&self, keys: &[&str]) -> Vec<String> {
        let other: HashSet<&str> = keys.iter().copied().collect();
        sorted(
            self.node_leaf_keys()
                .filter(|k| !other.contains(k.as_str()))
                .collect(),
        )
    }
}

impl<T: Clone> HierDict<T> {
    /// New tree containing only the leaf paths where `pred(path, value)`
    /// holds.
    pub fn leaf_filter(&self, pred: impl Fn(&str, &T) -> bool) -> Self {
        let mut out = Self::new();
        for (key, value) in self.leaf_items() {
            if pred(&key, value) {
                out.force_set(&key, Value::Leaf(value.clone()));
            }
        }
        out
    }

    /// Split leaves into a pair of trees: (where `pred` holds, where not).
    pub fn leaf_partition(&self, pred: impl Fn(&str, &T) -> bool) -> (Self, Self) {
        let mut yes = Self::new();
        let mut no = Self::new();
        for (key, value) in self.leaf_items() {
            let target = if pred(&key, value) { &mut yes } else { &mut no };
            target.force_set(&key, Value::Leaf(value.clone()));
        }
        (yes, no)
    }

    /// New tree containing only the named leaf paths.
    pub fn leaf_filter_keys(&self, names: &[&str]) -> Self {
        let wanted: HashSet<&str> = names.iter().copied().collect();
        self.leaf_filter(|key, _| wanted.contains(key))
    }

    /// Like [`leaf_filter`](Self::leaf_filter), but `pred` also sees
    /// intermediate nodes.
    ///
    /// When `copy_nodes` is set, a selected node is rebuilt leaf-by-leaf
    /// ([`leaf_copy`](Self::leaf_copy)), dropping any empty sub-nodes;
    /// otherwise it is cloned structurally.
    pub fn node_leaf_filter(
        &self,
        pred: impl Fn(&str, &Value<T>) -> bool,
        copy_nodes: bool,
    ) -> Self {
        let mut out = Self::new();
        for (key, value) in self.node_leaf_items() {
            if pred(&key, value) {
                let selected = match value {
                    Value::Node(d) if copy_nodes => Value::Node(d.leaf_copy()),
                    other => other.clone(),
                };
                out.force_set(&key, selected);
            }
        }
        out
    }

    /// New tree containing only the named node or leaf paths.
    pub fn node_leaf_filter_keys(&self, names: &[&str]) -> Self {
        let wanted: HashSet<&str> = names.iter().copied().collect();
        self.node_leaf_filter(|key, _| wanted.contains(key), false)
    }

    /// Gather the named node and leaf paths into a new tree, failing with
    /// [`Error::Assertion`] if any name is absent.
    pub fn node_leaf_filter_keys_required(
        &self,
        names: &[&str],
        copy_nodes: bool,
    ) -> Result<Self> {
        let mut out = Self::new();
        for name in names {
            let value = self.get(name).map_err(|_| {
                Error::Assertion(format!("missing required key: '{name}'"))
            })?;
            let selected = match value {
                Value::Node(d) if copy_nodes => Value::Node(d.leaf_copy()),
                other => other.clone(),
            };
            out.force_set(name, selected);
        }
        Ok(out)
    }

    /// New tree with `f` applied to every leaf payload; source untouched.
    pub fn leaf_apply<U>(&self, f: impl Fn(&T) -> U) -> HierDict<U> {
        let mut out = HierDict::new();
        for (key, value) in self.leaf_items() {
            out.force_set(&key, Value::Leaf(f(value)));
        }
        out
    }

    /// Fallible [`leaf_apply`](Self::leaf_apply); a failing transform is
    /// re-raised with the leaf path prepended, cause preserved.
    pub fn leaf_try_apply<U>(&self, f: impl Fn(&T) -> Result<U>) -> Result<HierDict<U>> {
        let mut out = HierDict::new();
        for (key, value) in self.leaf_items() {
            let mapped = f(value).map_err(|e| e.at_leaf(&key))?;
            out.force_set(&key, Value::Leaf(mapped));
        }
        Ok(out)
    }

    /// In place: replace every leaf payload with `f(payload)`.
    ///
    /// On a failing transform the error is re-raised with the leaf path
    /// prepended, cause preserved, and the tree is left partially modified
    /// up to that leaf.
    pub fn leaf_modify(&mut self, mut f: impl FnMut(&T) -> Result<T>) -> Result<()> {
        for key in self.list_leaf_keys() {
            let value = self.get_leaf(&key)?.clone();
            let replaced = f(&value).map_err(|e| e.at_leaf(&key))?;
            self.set(&key, Value::Leaf(replaced))?;
        }
        Ok(())
    }

    /// New tree with every leaf stored under `f(path, value)` instead of
    /// its original path. If two renames collide, the later leaf wins.
    pub fn leaf_key_change(&self, f: impl Fn(&str, &T) -> String) -> Self {
        let mut out = Self::new();
        for (key, value) in self.leaf_items() {
            let renamed = f(&key, value);
            out.force_set(&renamed, Value::Leaf(value.clone()));
        }
        out
    }

    /// Leaf-level copy: a fresh tree rebuilt from the leaf enumeration.
    ///
    /// Drops empty nodes; structurally identical otherwise. Use `clone()`
    /// for a structural deep copy.
    pub fn leaf_copy(&self) -> Self {
        let mut out = Self::new();
        for (key, value) in self.leaf_items() {
            out.force_set(&key, Value::Leaf(value.clone()));
        }
        out
    }

    /// Fold all leaf payloads into one result.
    ///
    /// Without a seed, an arbitrary leaf is consumed as the initial
    /// accumulator and folding proceeds over the rest, so the result is
    /// only deterministic for order-independent, commutative `f`. Fails
    /// with [`Error::Assertion`] on a leafless tree with no seed.
    pub fn leaf_reduce(&self, seed: Option<T>, mut f: impl FnMut(T, &T) -> T) -> Result<T> {
        let mut values: Vec<&T> = self.leaf_values().collect();
        let mut acc = match seed {
            Some(seed) => seed,
            None => values
                .pop()
                .ok_or_else(|| {
                    Error::Assertion("leaf_reduce on a tree with no leaves and no seed".into())
                })?
                .clone(),
        };
        while let Some(value) = values.pop() {
            acc = f(acc, value);
        }
        Ok(acc)
    }

    /// Copy every leaf of `other` into self by addressed write, overwriting
    /// on key collision. In place; returns self for chaining.
    ///
    /// Fallible because addressed writes are: a frozen self refuses new
    /// intermediate nodes.
    pub fn combine(&mut self, other: &Self) -> Result<&mut Self> {
        for (key, value) in other.leaf_items() {
            self.set(&key, Value::Leaf(value.clone()))?;
        }
        Ok(self)
    }

    /// Like [`combine`](Self::combine), but leaf keys already present in
    /// self are dropped from `other` first — self's values always win.
    ///
    /// With `warn_conflicting`, the dropped key set is reported via
    /// `tracing::warn!`.
    pub fn safe_combine(&mut self, other: &Self, warn_conflicting: bool) -> Result<&mut Self> {
        let own: HashSet<String> = self.leaf_keys().collect();
        if warn_conflicting {
            let conflicting: Vec<String> =
                sorted(other.leaf_keys().filter(|k| own.contains(k)).collect());
            if !conflicting.is_empty() {
                tracing::warn!(?conflicting, "safe_combine dropping conflicting keys");
            }
        }
        for (key, value) in other.leaf_items() {
            if !own.contains(&key) {
                self.set(&key, Value::Leaf(value.clone()))?;
            }
        }
        Ok(self)
    }

    /// Values for all `keys` (leaf or node), in order.
    ///
    /// Fails with [`Error::Assertion`] naming every absent key.
    pub fn get_keys_required(&self, keys: &[&str]) -> Result<Vec<Value<T>>> {
        let missing: Vec<&str> = keys
            .iter()
            .filter(|k| self.get(k).is_err())
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(Error::Assertion(format!(
                "missing required keys: {missing:?}"
            )));
        }
        keys.iter().map(|k| self.get(k).cloned()).collect()
    }

    /// Per-key: the stored value if the key resolves (leaf or node), else
    /// the positionally-corresponding default. Never fails on missing keys;
    /// only a `keys`/`defaults` length mismatch is an error.
    pub fn get_keys_optional(
        &self,
        keys: &[&str],
        defaults: Vec<Value<T>>,
    ) -> Result<Vec<Value<T>>> {
        if keys.len() != defaults.len() {
            return Err(Error::Assertion(format!(
                "get_keys_optional length mismatch: {} keys, {} defaults",
                keys.len(),
                defaults.len()
            )));
        }
        Ok(keys
            .iter()
            .zip(defaults)
            .map(|(key, default)| self.get(key).cloned().unwrap_or(default))
            .collect())
    }

    /// Multi-tree aligned combination.
    ///
    /// For each leaf key of the first tree (sorted), gathers
    /// `map_fn(tree[key])` across all trees and stores
    /// `combine_fn(key, gathered)` at that key in a new tree. With
    /// `match_keys`, all trees must share the exact same leaf-key set.
    pub fn leaf_combine_and_apply<U>(
        trees: &[Self],
        match_keys: bool,
        map_fn: impl Fn(&T) -> U,
        combine_fn: impl Fn(&str, Vec<U>) -> T,
    ) -> Result<Self> {
        let first = trees.first().ok_or_else(|| {
            Error::Assertion("leaf_combine_and_apply needs at least one tree".into())
        })?;
        let keys = sorted(first.list_leaf_keys());
        if match_keys {
            for tree in &trees[1..] {
                let other = sorted(tree.list_leaf_keys());
                if other != keys {
                    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
                    return Err(Error::Assertion(format!(
                        "leaf key sets differ: {:?}",
                        tree.leaf_key_symmetric_difference(&key_refs)
                    )));
                }
            }
        }

        let mut out = Self::new();
        for key in &keys {
            let gathered: Result<Vec<U>> = trees
                .iter()
                .map(|tree| tree.get_leaf(key).map(&map_fn))
                .collect();
            out.force_set(key, Value::Leaf(combine_fn(key, gathered?)));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HierDict<i64> {
        let mut d = HierDict::new();
        d.set_leaf("a/b", 1).unwrap();
        d.set_leaf("a/c", 2).unwrap();
        d.set_leaf("d", 3).unwrap();
        d
    }

    #[test]
    fn test_leaf_filter() {
        let d = sample();
        let big = d.leaf_filter(|_, v| *v > 1);
        assert_eq!(big.list_leaf_keys(), vec!["a/c", "d"]);
        // Source untouched.
        assert_eq!(d.leaf_keys().count(), 3);
    }

    #[test]
    fn test_leaf_partition() {
        let d = sample();
        let (odd, even) = d.leaf_partition(|_, v| v % 2 == 1);
        assert_eq!(odd.list_leaf_keys(), vec!["a/b", "d"]);
        assert_eq!(even.list_leaf_keys(), vec!["a/c"]);
    }

    #[test]
    fn test_node_leaf_filter_sees_nodes() {
        let d = sample();
        let nodes_only = d.node_leaf_filter(|_, v| v.is_node(), false);
        assert_eq!(nodes_only.list_leaf_keys(), vec!["a/b", "a/c"]);

        let copied = d.node_leaf_filter(|k, _| k == "a", true);
        assert_eq!(copied.get_leaf("a/b").unwrap(), &1);
    }

    #[test]
    fn test_node_leaf_filter_keys_required() {
        let d = sample();
        let out = d.node_leaf_filter_keys_required(&["a", "d"], false).unwrap();
        assert_eq!(out.get_leaf("a/c").unwrap(), &2);
        assert_eq!(out.get_leaf("d").unwrap(), &3);

        assert!(matches!(
            d.node_leaf_filter_keys_required(&["nope"], false),
            Err(Error::Assertion(_))
        ));
    }

    #[test]
    fn test_leaf_apply_builds_new_tree() {
        let d = sample();
        let doubled = d.leaf_apply(|v| v * 2);
        assert_eq!(doubled.get_leaf("a/b").unwrap(), &2);
        assert_eq!(d.get_leaf("a/b").unwrap(), &1);

        // Output payload type may differ from the input's.
        let labels = d.leaf_apply(|v| format!("v{v}"));
        assert_eq!(labels.get_leaf("d").unwrap(), "v3");
    }

    #[test]
    fn test_leaf_try_apply_prepends_failing_path() {
        let d = sample();
        let err = d
            .leaf_try_apply(|v| {
                if *v == 2 {
                    Err(Error::Assertion("two is not allowed".into()))
                } else {
                    Ok(*v)
                }
            })
            .unwrap_err();
        match err {
            Error::Transform { path, source } => {
                assert_eq!(path, "a/c");
                assert_eq!(*source, Error::Assertion("two is not allowed".into()));
            }
            other => panic!("expected Transform, got {other:?}"),
        }
    }

    #[test]
    fn test_leaf_modify_in_place() {
        let mut d = sample();
        d.leaf_modify(|v| Ok(v + 10)).unwrap();
        assert_eq!(d.get_leaf("a/b").unwrap(), &11);
        assert_eq!(d.get_leaf("d").unwrap(), &13);
    }

    #[test]
    fn test_leaf_key_change() {
        let d = sample();
        let renamed = d.leaf_key_change(|k, _| format!("new/{k}"));
        assert_eq!(renamed.get_leaf("new/a/b").unwrap(), &1);
    }

    #[test]
    fn test_leaf_copy_drops_empty_nodes() {
        let mut d = sample();
        d.set("empty", Value::Node(HierDict::new())).unwrap();

        let copy = d.leaf_copy();
        assert!(copy.get("empty").is_err());
        assert_eq!(copy.as_dict(), d.as_dict());
    }

    #[test]
    fn test_leaf_reduce_with_seed() {
        let d = sample();
        let sum = d.leaf_reduce(Some(0), |acc, v| acc + v).unwrap();
        assert_eq!(sum, 6);
    }

    #[test]
    fn test_leaf_reduce_without_seed() {
        let d = sample();
        let sum = d.leaf_reduce(None, |acc, v| acc + v).unwrap();
        assert_eq!(sum, 6);

        let empty: HierDict<i64> = HierDict::new();
        assert!(matches!(
            empty.leaf_reduce(None, |acc, v| acc + v),
            Err(Error::Assertion(_))
        ));
        assert_eq!(empty.leaf_reduce(Some(7), |acc, v| acc + v).unwrap(), 7);
    }

    #[test]
    fn test_all_equal() {
        let mut d = HierDict::new();
        d.set_leaf("a", 5).unwrap();
        d.set_leaf("b/c", 5).unwrap();
        assert!(d.all_equal(|a, b| a == b));

        d.set_leaf("b/d", 6).unwrap();
        assert!(!d.all_equal(|a, b| a == b));

        let empty: HierDict<i64> = HierDict::new();
        assert!(empty.all_equal(|a, b| a == b));
    }

    #[test]
    fn test_combine_overwrites() {
        let mut left = sample();
        let mut right = HierDict::new();
        right.set_leaf("a/c", 20).unwrap();
        right.set_leaf("a/e", 4).unwrap();

        left.combine(&right).unwrap();
        assert_eq!(left.get_leaf("a/c").unwrap(), &20);
        assert_eq!(left.get_leaf("a/e").unwrap(), &4);
        assert_eq!(left.get_leaf("a/b").unwrap(), &1);
    }

    #[test]
    fn test_safe_combine_never_overwrites() {
        let mut left = HierDict::new();
        left.set_leaf("a", 1).unwrap();
        let mut right = HierDict::new();
        right.set_leaf("a", 2).unwrap();
        right.set_leaf("b", 3).unwrap();

        left.safe_combine(&right, true).unwrap();
        assert_eq!(left.get_leaf("a").unwrap(), &1);
        assert_eq!(left.get_leaf("b").unwrap(), &3);
    }

    #[test]
    fn test_key_set_algebra() {
        let d = sample();
        assert_eq!(
            d.leaf_key_intersection(&["a/b", "x"]),
            vec!["a/b".to_string()]
        );
        assert_eq!(
            d.leaf_key_difference(&["a/b"]),
            vec!["a/c".to_string(), "d".to_string()]
        );
        assert_eq!(
            d.leaf_key_symmetric_difference(&["a/b", "x"]),
            vec!["a/c".to_string(), "d".to_string(), "x".to_string()]
        );
        assert_eq!(d.leaf_key_missing(&["a/b", "x"]), vec!["x".to_string()]);
        assert_eq!(
            d.node_leaf_key_overlap(&["a", "a/b", "x"]),
            vec!["a".to_string(), "a/b".to_string()]
        );
    }

    #[test]
    fn test_get_keys_required_and_optional() {
        let d = sample();
        let values = d.get_keys_required(&["a/b", "a"]).unwrap();
        assert_eq!(values[0].as_leaf(), Some(&1));
        assert!(values[1].is_node());

        assert!(matches!(
            d.get_keys_required(&["missing"]),
            Err(Error::Assertion(_))
        ));

        let values = d
            .get_keys_optional(&["a/b", "missing"], vec![Value::Leaf(0), Value::Leaf(42)])
            .unwrap();
        assert_eq!(values[0].as_leaf(), Some(&1));
        assert_eq!(values[1].as_leaf(), Some(&42));
    }

    #[test]
    fn test_leaf_combine_and_apply() {
        let a = sample();
        let mut b = sample();
        b.leaf_modify(|v| Ok(v * 10)).unwrap();

        let summed =
            HierDict::leaf_combine_and_apply(&[a, b], true, |v| *v, |_, vs| vs.iter().sum())
                .unwrap();
        assert_eq!(summed.get_leaf("a/b").unwrap(), &11);
        assert_eq!(summed.get_leaf("d").unwrap(), &33);
    }

    #[test]
    fn test_leaf_combine_and_apply_key_mismatch() {
        let a = sample();
        let mut b = sample();
        b.set_leaf("extra", 0).unwrap();

        let err =
            HierDict::leaf_combine_and_apply(&[a, b], true, |v| *v, |_, vs| vs.iter().sum())
                .unwrap_err();
        assert!(matches!(err, Error::Assertion(msg) if msg.contains("extra")));
    }

    #[test]
    fn test_leaf_assert() {
        let d = sample();
        assert!(d.leaf_assert(|v| *v > 0).is_ok());
        let err = d.leaf_assert(|v| *v > 1).unwrap_err();
        assert!(matches!(err, Error::Assertion(msg) if msg.contains("a/b")));
    }

    #[test]
    fn test_is_empty_and_get_one() {
        let d = sample();
        assert!(!d.is_empty());
        assert_eq!(d.get_one().unwrap(), &1);

        let mut hollow: HierDict<i64> = HierDict::new();
        hollow.set("n", Value::Node(HierDict::new())).unwrap();
        assert!(hollow.is_empty());
        assert!(hollow.get_one().is_err());
    }
}
