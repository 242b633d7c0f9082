//! Hierarchical, path-addressed dictionaries.
//!
//! # The Core Idea
//!
//! Deeply nested parameter trees want uniform leaf-level access:
//!
//! ```text
//! Tree                     │ Leaf paths
//! ─────────────────────────┼─────────────────
//! {a: {b: 1, c: 2}, d: 3}  │ a/b, a/c, d
//! ```
//!
//! A [`HierDict`] stores insertion-ordered fields whose values are either
//! opaque **leaves** or nested **nodes** — the [`Value`] tag is the only
//! classification. Compound keys (`"a/b/c"`) address values at any depth;
//! writes auto-create missing intermediate nodes.
//!
//! Three layers build on one another:
//!
//! | Layer | Provides |
//! |-------|----------|
//! | path resolver | storage, addressed get/set, construction/export, `freeze` |
//! | [`traverse`] | lazy depth-first leaf / node-leaf enumeration |
//! | [`ops`] | filter, map, reduce, partition, key-set algebra, combination |
//!
//! [`Payload`] supplies a ready-made heterogeneous leaf type plus the
//! [`ArrayLike`] classification seam; `pprint` is a cosmetic renderer.
//!
//! # Ordering Caveat
//!
//! Enumeration order is insertion-order-derived. Structurally equal trees
//! built in different field orders enumerate differently, so no-seed
//! [`leaf_reduce`](HierDict::leaf_reduce) and
//! [`all_equal`](HierDict::all_equal) are only deterministic for
//! order-independent functions. That is a documented caller
//! responsibility, not a defect.

#[allow(clippy::module_inception)]
mod dict;
pub mod ops;
mod payload;
mod pprint;
pub mod traverse;
mod value;

pub use dict::{HierDict, DELIMITER, INTROSPECTION_SENTINEL};
pub use payload::{ArrayLike, Payload};
pub use traverse::{LeafItems, LeafKeys, NodeLeafItems, NodeLeafKeys};
pub use value::Value;
