//! Parameter-access glue: defaults and config-driven construction.
//!
//! Thin conveniences over [`HierDict`] for code that treats a tree as a
//! bag of configuration parameters. Optional access returns a default
//! instead of failing; this is the only sanctioned soft-failure path.

use crate::dict::{HierDict, Value};
use crate::error::{Error, Result};

/// Whether a resolved value counts as present for optional access: leaves
/// always do, nodes only when they hold at least one leaf.
fn is_present<T>(value: &Value<T>) -> bool {
    match value {
        Value::Leaf(_) => true,
        Value::Node(d) => !d.is_empty(),
    }
}

/// The value at `key` (leaf or node) if present, else `default`.
///
/// An empty node counts as absent, matching the optional-access contract.
pub fn get_with_default<T: Clone>(
    params: &HierDict<T>,
    key: &str,
    default: Value<T>,
) -> Value<T> {
    match params.get(key) {
        Ok(value) if is_present(value) => value.clone(),
        _ => default,
    }
}

/// Mapped variant of [`get_with_default`]: applies `map` to the stored
/// value when present, else returns `default`.
pub fn get_mapped_or<T, U>(
    params: &HierDict<T>,
    key: &str,
    default: U,
    map: impl FnOnce(&Value<T>) -> U,
) -> U {
    match params.get(key) {
        Ok(value) if is_present(value) => map(value),
        _ => default,
    }
}

/// Construction from a parameter tree.
///
/// The configured type is chosen statically by the caller; the tree only
/// carries the constructor's inputs.
pub trait FromParams<T>: Sized {
    /// Build an instance from its parameter node.
    fn from_params(params: &HierDict<T>) -> Result<Self>;
}

/// Instantiate `C` from the node at `attr_name` (or the whole tree when
/// `None`).
///
/// Fails with [`Error::Assertion`] when the target is missing or is not a
/// node — malformed instantiation parameters.
pub fn instantiate<T, C: FromParams<T>>(
    params: &HierDict<T>,
    attr_name: Option<&str>,
) -> Result<C> {
    match attr_name {
        None => C::from_params(params),
        Some(name) => {
            let value = params.get(name).map_err(|_| {
                Error::Assertion(format!("missing instantiation parameters: '{name}'"))
            })?;
            match value {
                Value::Node(node) => C::from_params(node),
                Value::Leaf(_) => Err(Error::Assertion(format!(
                    "instantiation parameters at '{name}' must be a node"
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_with_default() {
        let mut d = HierDict::new();
        d.set_leaf("a/b", 1).unwrap();
        d.set("hollow", Value::Node(HierDict::new())).unwrap();

        assert_eq!(
            get_with_default(&d, "a/b", Value::Leaf(0)),
            Value::Leaf(1)
        );
        assert_eq!(
            get_with_default(&d, "missing", Value::Leaf(0)),
            Value::Leaf(0)
        );
        // An empty node counts as absent.
        assert_eq!(
            get_with_default(&d, "hollow", Value::Leaf(7)),
            Value::Leaf(7)
        );
    }

    #[test]
    fn test_get_mapped_or() {
        let mut d = HierDict::new();
        d.set_leaf("lr", 10).unwrap();

        let doubled = get_mapped_or(&d, "lr", -1, |v| v.as_leaf().map_or(-1, |x| x * 2));
        assert_eq!(doubled, 20);
        assert_eq!(get_mapped_or(&d, "missing", -1, |_| 0), -1);
    }

    struct Optimizer {
        lr: i64,
        momentum: i64,
    }

    impl FromParams<i64> for Optimizer {
        fn from_params(params: &HierDict<i64>) -> Result<Self> {
            Ok(Self {
                lr: *params.get_leaf("lr")?,
                momentum: *get_with_default(params, "momentum", Value::Leaf(9))
                    .as_leaf()
                    .unwrap_or(&9),
            })
        }
    }

    #[test]
    fn test_instantiate_from_node() {
        let mut d = HierDict::new();
        d.set_leaf("optimizer/lr", 3).unwrap();

        let opt: Optimizer = instantiate(&d, Some("optimizer")).unwrap();
        assert_eq!(opt.lr, 3);
        assert_eq!(opt.momentum, 9);
    }

    #[test]
    fn test_instantiate_rejects_leaf_target() {
        let mut d = HierDict::new();
        d.set_leaf("optimizer", 1).unwrap();

        let err = instantiate::<_, Optimizer>(&d, Some("optimizer")).unwrap_err();
        assert!(matches!(err, Error::Assertion(_)));

        let err = instantiate::<_, Optimizer>(&d, Some("missing")).unwrap_err();
        assert!(matches!(err, Error::Assertion(_)));
    }

    #[test]
    fn test_instantiate_whole_tree() {
        let mut d = HierDict::new();
        d.set_leaf("lr", 5).unwrap();
        d.set_leaf("momentum", 2).unwrap();

        let opt: Optimizer = instantiate(&d, None).unwrap();
        assert_eq!(opt.lr, 5);
        assert_eq!(opt.momentum, 2);
    }
}
