use core::fmt;

/// Result alias for `hierdict`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by hierarchical dictionary operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Addressed (subscript-style) lookup hit a missing segment.
    KeyNotFound {
        /// The missing segment or path.
        path: String,
    },

    /// Attribute-style access on an absent field.
    ///
    /// Deliberately distinct from [`Error::KeyNotFound`]: the two access
    /// styles fail with different kinds.
    AttributeNotFound {
        /// The missing field name.
        name: String,
    },

    /// A path tried to descend through a leaf value.
    NotANode {
        /// The leaf segment that blocked the descent.
        path: String,
    },

    /// A write needed to auto-create an intermediate node after `freeze()`.
    VivificationDisabled {
        /// The full key being written.
        path: String,
    },

    /// Contract violation: missing required keys, mismatched leaf-key sets,
    /// empty reduce with no seed, malformed instantiation parameters.
    Assertion(String),

    /// A leaf transform failed; carries the failing leaf path and the cause.
    Transform {
        /// Path of the leaf whose transform failed.
        path: String,
        /// The original error, kind preserved.
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with the leaf path it occurred at.
    ///
    /// Used by `leaf_modify`/`leaf_try_apply` to prepend the failing path
    /// while keeping the original error reachable via `source()`.
    pub fn at_leaf(self, path: impl Into<String>) -> Self {
        Error::Transform {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound { path } => write!(f, "key not found: '{path}'"),
            Error::AttributeNotFound { name } => write!(f, "attribute not found: '{name}'"),
            Error::NotANode { path } => {
                write!(f, "'{path}' is a leaf, cannot descend into it")
            }
            Error::VivificationDisabled { path } => {
                write!(f, "tree is frozen, cannot auto-create nodes for '{path}'")
            }
            Error::Assertion(msg) => write!(f, "assertion failed: {msg}"),
            Error::Transform { path, source } => write!(f, "{path} : {source}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transform { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = Error::KeyNotFound { path: "a/b".into() };
        assert_eq!(e.to_string(), "key not found: 'a/b'");

        let e = Error::AttributeNotFound { name: "b".into() };
        assert_eq!(e.to_string(), "attribute not found: 'b'");
    }

    #[test]
    fn test_transform_wrapping_preserves_cause() {
        use std::error::Error as _;

        let cause = Error::Assertion("negative value".into());
        let wrapped = cause.clone().at_leaf("a/b");

        assert_eq!(wrapped.to_string(), "a/b : assertion failed: negative value");
        let source = wrapped.source().expect("source must be preserved");
        assert_eq!(source.to_string(), cause.to_string());
    }
}
