//! Opaque identifiers and their generators
//!
//! Line items, distribution shares and records are keyed by 128-bit ids
//! rendered as UUID strings. Ids are never minted ad hoc: every component that
//! creates an entity receives an [`IdGenerator`], so tests can swap the
//! time-ordered UUIDv7 source for a deterministic sequence.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of fresh, unique 128-bit identifiers
pub trait IdGenerator: Send + Sync {
    /// Produce the next identifier
    fn next_id(&self) -> u128;
}

/// Production generator backed by UUIDv7 (time-ordered, no coordination)
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> u128 {
        uuid::Uuid::now_v7().as_u128()
    }
}

/// Deterministic generator yielding 1, 2, 3, ...
///
/// # Examples
///
/// ```
/// use licita_domain::{IdGenerator, SequentialIdGenerator};
///
/// let ids = SequentialIdGenerator::new();
/// assert_eq!(ids.next_id(), 1);
/// assert_eq!(ids.next_id(), 2);
/// ```
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    last: AtomicU64,
}

impl SequentialIdGenerator {
    /// Start a sequence whose first id is 1
    pub fn new() -> Self {
        Self::starting_after(0)
    }

    /// Start a sequence whose first id is `last + 1`
    pub fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> u128 {
        u128::from(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(into = "String", try_from = "String")]
        pub struct $name(u128);

        impl $name {
            /// Take the next id from a generator
            pub fn generate(ids: &dyn IdGenerator) -> Self {
                Self(ids.next_id())
            }

            /// Wrap a raw value (storage and tests)
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse from the UUID string form
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s.trim())
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid {} '{}': {}", stringify!($name), s, e))
            }

            /// The raw value
            pub fn value(&self) -> u128 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::from_string(&s)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a line item, unique within its record
    ItemId
);

uuid_id!(
    /// Identifier of a distribution share, unique within its record
    ShareId
);

uuid_id!(
    /// Identifier assigned to a record when it is first saved
    RecordId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_generator_is_deterministic() {
        let ids = SequentialIdGenerator::new();
        let a = ItemId::generate(&ids);
        let b = ShareId::generate(&ids);
        assert_eq!(a.value(), 1);
        assert_eq!(b.value(), 2);
    }

    #[test]
    fn test_sequential_generator_starting_after() {
        let ids = SequentialIdGenerator::starting_after(41);
        assert_eq!(ids.next_id(), 42);
    }

    #[test]
    fn test_uuid_generator_is_unique() {
        let ids = UuidV7Generator;
        let a = ItemId::generate(&ids);
        let b = ItemId::generate(&ids);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_and_parse() {
        let id = ItemId::generate(&UuidV7Generator);
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(ItemId::from_string(&text).unwrap(), id);
    }

    #[test]
    fn test_invalid_string() {
        assert!(ShareId::from_string("not-a-uuid").is_err());
        assert!(ShareId::from_string("").is_err());
    }

    #[test]
    fn test_serde_uses_uuid_string() {
        let id = RecordId::from_value(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000007\"");
        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Round-trip through the string form preserves the id
        #[test]
        fn test_string_roundtrip(value: u128) {
            let id = ShareId::from_value(value);
            match ShareId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }

        /// Ordering follows the raw value
        #[test]
        fn test_ordering_matches_value(a: u128, b: u128) {
            prop_assert_eq!(ItemId::from_value(a) < ItemId::from_value(b), a < b);
        }
    }
}
