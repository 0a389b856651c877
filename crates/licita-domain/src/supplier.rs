//! Supplier registry entries
//!
//! Suppliers live in an external registry; records only hold a weak
//! [`SupplierId`] reference to one of them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookup key into the supplier registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(String);

impl SupplierId {
    /// Wrap a registry key
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The registry key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    /// Registry key
    pub id: SupplierId,

    /// Company name
    pub name: String,

    /// Tax identifier, in whatever punctuation the registry stores it
    pub identifier: String,
}

impl Supplier {
    /// Create a registry entry
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            id: SupplierId::new(id),
            name: name.into(),
            identifier: identifier.into(),
        }
    }
}
