//! Save validation configuration

/// Rules checked before a record may be saved
///
/// Process number, supplier and at least one item are always required; the
/// flags below add optional header checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Require a non-blank modality
    pub require_modality: bool,

    /// Require a non-blank object description
    pub require_object: bool,
}

impl ValidationConfig {
    /// Create a strict configuration (every header field required except the year)
    pub fn strict() -> Self {
        Self {
            require_modality: true,
            require_object: true,
        }
    }
}
