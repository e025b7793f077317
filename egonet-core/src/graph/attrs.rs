//! Attribute values carried by nodes and edges.

use std::{collections::BTreeMap, fmt};

/// Attribute map attached to a node or an edge.
///
/// Keys are kept ordered so that two maps with the same contents compare and
/// print identically regardless of insertion order.
pub type Attrs = BTreeMap<String, AttrValue>;

/// A single attribute value.
///
/// Integer and float values are both accepted as edge lengths when a
/// distance attribute is requested; text and boolean values are not.
///
/// # Examples
/// ```
/// use egonet_core::AttrValue;
///
/// assert_eq!(AttrValue::from(3).as_f64(), Some(3.0));
/// assert_eq!(AttrValue::from(0.5).as_f64(), Some(0.5));
/// assert_eq!(AttrValue::from("red").as_f64(), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Signed integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// UTF-8 text value.
    Text(String),
    /// Boolean flag.
    Bool(bool),
}

impl AttrValue {
    /// Returns the value as a float when it is numeric.
    ///
    /// Integers beyond 2^53 lose precision; they are not meaningful lengths.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Text(_) | Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Builds an [`Attrs`] map from `(name, value)` pairs.
///
/// # Examples
/// ```
/// use egonet_core::{AttrValue, attrs};
///
/// let map = attrs([("weight", AttrValue::from(2))]);
/// assert_eq!(map.get("weight"), Some(&AttrValue::Int(2)));
/// ```
pub fn attrs<I, K>(pairs: I) -> Attrs
where
    I: IntoIterator<Item = (K, AttrValue)>,
    K: Into<String>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value))
        .collect()
}
