//! Strongly-typed identifiers.
//!
//! Entity crates declare their own id newtypes with [`uuid_newtype!`] so every
//! identifier shares the same parsing rules: a textual UUID is the only
//! well-formed identifier token.

/// Declare a UUID-backed identifier newtype.
///
/// The generated type is `Copy`, serde-transparent, `Display`s as the
/// hyphenated UUID and parses with `FromStr`, failing with
/// [`DomainError::InvalidId`](crate::DomainError::InvalidId).
#[macro_export]
macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $vis:vis struct $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
            $crate::serde::Serialize, $crate::serde::Deserialize,
        )]
        #[serde(transparent, crate = "::stockroom_core::serde")]
        $vis struct $t($crate::uuid::Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self($crate::uuid::Uuid::now_v7())
            }

            pub fn from_uuid(uuid: $crate::uuid::Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &$crate::uuid::Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$crate::uuid::Uuid> for $t {
            fn from(value: $crate::uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for $crate::uuid::Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = <$crate::uuid::Uuid as core::str::FromStr>::from_str(s)
                    .map_err(|e| $crate::DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}
