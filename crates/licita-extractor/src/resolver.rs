//! Matching extracted supplier data against the supplier registry
//!
//! Matching is substring containment in either direction, first by tax id
//! digits, then by case-insensitive name. There is no fuzzy matching; when
//! several registry entries match, the first wins and every candidate is
//! reported so the caller can ask for confirmation.

use licita_domain::{Supplier, SupplierId, SupplierRegistry};
use std::fmt::Display;
use tracing::{debug, warn};

/// Rule that produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Digits of the tax identifier
    Identifier,
    /// Supplier name
    Name,
}

/// Outcome of supplier resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierResolution {
    /// Selected supplier (first match)
    pub supplier: Option<Supplier>,

    /// Rule that selected it
    pub matched_by: Option<MatchKind>,

    /// Every entry the winning rule matched, in registry order
    pub candidates: Vec<Supplier>,
}

impl SupplierResolution {
    /// No supplier selected
    pub fn unresolved() -> Self {
        Self::default()
    }

    /// Id of the selected supplier
    pub fn supplier_id(&self) -> Option<&SupplierId> {
        self.supplier.as_ref().map(|s| &s.id)
    }

    /// Whether more than one registry entry matched
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

/// Resolve against a registry, treating a registry failure as no match
pub fn resolve_in<R>(identifier: Option<&str>, name: Option<&str>, registry: &R) -> SupplierResolution
where
    R: SupplierRegistry,
    R::Error: Display,
{
    match registry.suppliers() {
        Ok(suppliers) => resolve_supplier(identifier, name, &suppliers),
        Err(e) => {
            warn!(error = %e, "Supplier registry unavailable; leaving supplier unresolved");
            SupplierResolution::unresolved()
        }
    }
}

/// Resolve an extracted identifier and/or name against registry entries
///
/// # Examples
///
/// ```
/// use licita_domain::Supplier;
/// use licita_extractor::{resolve_supplier, MatchKind};
///
/// let registry = vec![Supplier::new("s-1", "ACME LTDA", "12345678000190")];
/// let resolution = resolve_supplier(Some("12.345.678/0001-90"), None, &registry);
/// assert_eq!(resolution.matched_by, Some(MatchKind::Identifier));
/// ```
pub fn resolve_supplier(
    identifier: Option<&str>,
    name: Option<&str>,
    registry: &[Supplier],
) -> SupplierResolution {
    let identifier = identifier.map(digits).filter(|d| !d.is_empty());
    if let Some(identifier) = identifier {
        let candidates = matching(registry, |s| contains_either_way(&digits(&s.identifier), &identifier));
        if !candidates.is_empty() {
            return resolved(MatchKind::Identifier, candidates);
        }
        debug!(identifier = %identifier, "No supplier matched the identifier; trying the name");
    }

    let name = name.map(|n| n.trim().to_lowercase()).filter(|n| !n.is_empty());
    if let Some(name) = name {
        let candidates = matching(registry, |s| contains_either_way(&s.name.trim().to_lowercase(), &name));
        if !candidates.is_empty() {
            return resolved(MatchKind::Name, candidates);
        }
    }

    SupplierResolution::unresolved()
}

fn matching(registry: &[Supplier], predicate: impl Fn(&Supplier) -> bool) -> Vec<Supplier> {
    registry.iter().filter(|s| predicate(s)).cloned().collect()
}

fn resolved(kind: MatchKind, candidates: Vec<Supplier>) -> SupplierResolution {
    if candidates.len() > 1 {
        warn!(
            candidates = candidates.len(),
            "Several suppliers matched; selecting the first"
        );
    }
    SupplierResolution {
        supplier: candidates.first().cloned(),
        matched_by: Some(kind),
        candidates,
    }
}

/// Containment in either direction; an empty registry value never matches
fn contains_either_way(registry_value: &str, extracted: &str) -> bool {
    !registry_value.is_empty()
        && (registry_value.contains(extracted) || extracted.contains(registry_value))
}

fn digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}
