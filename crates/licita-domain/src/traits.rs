//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and the
//! collaborators around it. Implementations live in other crates.

use crate::Supplier;
use std::convert::Infallible;

/// Read-only supplier registry
///
/// Queried by the entity resolver; never written by this system.
pub trait SupplierRegistry {
    /// Error type for registry lookups
    type Error;

    /// All registered suppliers, in registry order
    fn suppliers(&self) -> Result<Vec<Supplier>, Self::Error>;
}

impl SupplierRegistry for Vec<Supplier> {
    type Error = Infallible;

    fn suppliers(&self) -> Result<Vec<Supplier>, Self::Error> {
        Ok(self.clone())
    }
}

impl<R: SupplierRegistry + ?Sized> SupplierRegistry for &R {
    type Error = R::Error;

    fn suppliers(&self) -> Result<Vec<Supplier>, Self::Error> {
        (**self).suppliers()
    }
}
