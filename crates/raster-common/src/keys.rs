//! Key tuples addressing individual datasets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered key values identifying one dataset within a catalog.
///
/// One value per declared key name, in key-name declaration order.
/// Compares and hashes structurally, so tuples survive being rebuilt
/// across filter stages.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyTuple(Vec<String>);

impl KeyTuple {
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Move the value at `index` to the last position, keeping the
    /// relative order of all other values.
    pub fn promote_to_last(&self, index: usize) -> Self {
        let mut values = self.0.clone();
        let moved = values.remove(index);
        values.push(moved);
        Self(values)
    }
}

impl From<Vec<String>> for KeyTuple {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[&str; N]> for KeyTuple {
    fn from(values: [&str; N]) -> Self {
        Self(values.iter().map(|v| v.to_string()).collect())
    }
}

impl fmt::Display for KeyTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}
