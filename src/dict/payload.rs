//! Ready-made heterogeneous leaf payload and the array-classification seam.

use core::fmt;

#[cfg(feature = "array")]
use ndarray::ArrayD;
use serde_json::json;

use crate::dict::value::Value;
use crate::dict::HierDict;
use crate::error::{Error, Result};

/// A heterogeneous leaf payload for parameter trees.
///
/// Covers the usual configuration scalars, an optional ndarray tensor
/// (`array` feature), and a JSON catch-all for anything else.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Absent/none marker.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Text.
    Str(String),
    /// Dynamic-dimensional f64 tensor.
    #[cfg(feature = "array")]
    Array(ArrayD<f64>),
    /// Arbitrary structured payload kept as raw JSON.
    Json(serde_json::Value),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Null => write!(f, "null"),
            Payload::Bool(v) => write!(f, "{v}"),
            Payload::Int(v) => write!(f, "{v}"),
            Payload::Float(v) => write!(f, "{v}"),
            Payload::Str(v) => write!(f, "{v}"),
            #[cfg(feature = "array")]
            Payload::Array(arr) => write!(f, "array{:?}", arr.shape()),
            Payload::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Payload {
    fn from(v: bool) -> Self {
        Payload::Bool(v)
    }
}

impl From<i64> for Payload {
    fn from(v: i64) -> Self {
        Payload::Int(v)
    }
}

impl From<f64> for Payload {
    fn from(v: f64) -> Self {
        Payload::Float(v)
    }
}

impl From<&str> for Payload {
    fn from(v: &str) -> Self {
        Payload::Str(v.to_string())
    }
}

impl From<String> for Payload {
    fn from(v: String) -> Self {
        Payload::Str(v)
    }
}

#[cfg(feature = "array")]
impl From<ArrayD<f64>> for Payload {
    fn from(v: ArrayD<f64>) -> Self {
        Payload::Array(v)
    }
}

/// Classification of leaf payloads as array-like tensors.
///
/// The traversal and operator layers never inspect payloads; this trait is
/// the one pluggable seam they use, and only for
/// [`leaf_arrays`](HierDict::leaf_arrays) /
/// [`leaf_shapes`](HierDict::leaf_shapes). Implement it for a custom
/// payload type to plug in other tensor representations.
pub trait ArrayLike {
    /// Whether this payload is an array/tensor value.
    fn is_array(&self) -> bool;
    /// The array's shape, if this payload is one.
    fn shape(&self) -> Option<Vec<usize>>;
}

impl ArrayLike for Payload {
    fn is_array(&self) -> bool {
        #[cfg(feature = "array")]
        {
            matches!(self, Payload::Array(_))
        }
        #[cfg(not(feature = "array"))]
        {
            false
        }
    }

    fn shape(&self) -> Option<Vec<usize>> {
        #[cfg(feature = "array")]
        if let Payload::Array(arr) = self {
            return Some(arr.shape().to_vec());
        }
        None
    }
}

impl<T: ArrayLike + Clone> HierDict<T> {
    /// New tree containing only the array-like leaves.
    pub fn leaf_arrays(&self) -> Self {
        self.leaf_filter(|_, v| v.is_array())
    }

    /// New tree mapping every array-like leaf to its shape.
    ///
    /// Mainly good for debugging tensor trees.
    pub fn leaf_shapes(&self) -> HierDict<Vec<usize>> {
        self.leaf_arrays()
            .leaf_apply(|v| v.shape().unwrap_or_default())
    }
}

fn leaf_from_json(value: &serde_json::Value) -> Payload {
    match value {
        serde_json::Value::Null => Payload::Null,
        serde_json::Value::Bool(b) => Payload::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Payload::Int(i),
            None => Payload::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Payload::Str(s.clone()),
        other => Payload::Json(other.clone()),
    }
}

impl HierDict<Payload> {
    /// Convert a plain nested JSON mapping into a tree.
    ///
    /// With `nested`, JSON objects become nodes recursively; otherwise they
    /// stay as [`Payload::Json`] leaves. The top-level value must be an
    /// object. Keys containing the delimiter are treated as compound paths,
    /// exactly like addressed writes.
    pub fn from_json(value: &serde_json::Value, nested: bool) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::Assertion(format!("from_json needs a JSON object, got: {value}"))
        })?;
        let mut out = Self::new();
        for (key, item) in object {
            match item {
                serde_json::Value::Object(_) if nested => {
                    let node = Self::from_json(item, true)?;
                    out.set(key, Value::Node(node))?;
                }
                _ => out.set(key, Value::Leaf(leaf_from_json(item)))?,
            }
        }
        Ok(out)
    }

    /// Render the tree back into a nested JSON object.
    ///
    /// Array leaves have no JSON form and render as their string
    /// representation.
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (name, value) in self.iter() {
            let rendered = match value {
                Value::Node(d) => d.to_json(),
                Value::Leaf(Payload::Null) => serde_json::Value::Null,
                Value::Leaf(Payload::Bool(b)) => json!(b),
                Value::Leaf(Payload::Int(i)) => json!(i),
                Value::Leaf(Payload::Float(x)) => json!(x),
                Value::Leaf(Payload::Str(s)) => json!(s),
                #[cfg(feature = "array")]
                Value::Leaf(arr @ Payload::Array(_)) => json!(arr.to_string()),
                Value::Leaf(Payload::Json(v)) => v.clone(),
            };
            object.insert(name.clone(), rendered);
        }
        serde_json::Value::Object(object)
    }
}
