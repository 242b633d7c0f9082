//! # hierdict
//!
//! Hierarchical attribute dictionary: path-addressed nested parameter trees
//! with uniform leaf-level access, filtering, transformation, and merging.
//!
//! A [`HierDict<T>`] is an insertion-ordered tree of string-named fields,
//! each either an opaque leaf payload or a nested sub-tree. Compound keys
//! like `"a/b/c"` address values at arbitrary depth; writes auto-create
//! missing intermediate nodes (vivification).
//!
//! ```rust
//! use hierdict::HierDict;
//!
//! let mut params: HierDict<i64> = HierDict::new();
//! params.set_leaf("model/layers", 4)?;
//! params.set_leaf("model/width", 256)?;
//! params.set_leaf("train/steps", 1000)?;
//!
//! assert_eq!(params.list_leaf_keys(), vec!["model/layers", "model/width", "train/steps"]);
//!
//! let wide = params.leaf_filter(|_, v| *v >= 256);
//! assert_eq!(wide.list_leaf_keys(), vec!["model/width", "train/steps"]);
//! # Ok::<(), hierdict::Error>(())
//! ```
//!
//! Heterogeneous trees use the bundled [`Payload`] leaf type (with
//! ndarray-backed tensors behind the `array` feature); homogeneous trees
//! can use any payload type directly.

pub mod dict;
/// Error types used across `hierdict`.
pub mod error;
pub mod params;


pub use dict::{
    ArrayLike, HierDict, LeafItems, LeafKeys, NodeLeafItems, NodeLeafKeys, Payload, Value,
    DELIMITER, INTROSPECTION_SENTINEL,
};
pub use error::{Error, Result};
pub use params::{get_mapped_or, get_with_default, instantiate, FromParams};
