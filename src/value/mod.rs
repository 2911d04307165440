//! Plain nested documents
//!
//! `Value` is what goes into `wrap`/`set` and what comes back out of
//! `unwrap`: scalars at the leaves, ordered lists everywhere else.
//! Nothing in here is versioned.
//!
//! Parsing, wrapping and unwrapping all recurse once per nesting level,
//! so document depth is limited by the stack (a few thousand levels on
//! a default 2 MiB thread).

mod parse;

pub use parse::ParseValueError;

use std::fmt;

/// A nested document: a scalar or an ordered list of documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Value<T> {
    /// Opaque leaf value.
    Scalar(T),

    /// Ordered container of nested values.
    List(Vec<Value<T>>),
}

impl<T> Value<T> {
    /// Build a list from any iterator of values.
    pub fn list(items: impl IntoIterator<Item = Value<T>>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Check if this is a leaf
    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    /// Borrow the scalar, if any.
    pub fn as_scalar(&self) -> Option<&T> {
        match self {
            Value::Scalar(value) => Some(value),
            Value::List(_) => None,
        }
    }

    /// Borrow the list items, if any.
    pub fn as_list(&self) -> Option<&[Value<T>]> {
        match self {
            Value::Scalar(_) => None,
            Value::List(items) => Some(items),
        }
    }

    /// Collapse a list of scalars into a plain vector.
    ///
    /// Returns `None` for a scalar or for a list holding a nested list.
    pub fn into_flat_list(self) -> Option<Vec<T>> {
        match self {
            Value::Scalar(_) => None,
            Value::List(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Scalar(value) => Some(value),
                    Value::List(_) => None,
                })
                .collect(),
        }
    }

    /// Number of lists in this document, counting itself.
    ///
    /// Wrapping a document allocates exactly this many records.
    pub fn container_count(&self) -> usize {
        match self {
            Value::Scalar(_) => 0,
            Value::List(items) => 1 + items.iter().map(Value::container_count).sum::<usize>(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(value) => write!(f, "{}", value),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
