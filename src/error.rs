//! Error types for map lookups and the JSON codec.

use thiserror::Error;

/// Errors surfaced by [`OrderedHashMap`](crate::OrderedHashMap).
///
/// Deleting or popping an absent key is not an error. Sorting or
/// serializing a map whose keys are not [`TextKey`](crate::TextKey)s is
/// rejected at compile time, so it has no variant here.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MapError {
    /// `get` or `get_mut` on a key that is not in the map.
    #[error("key not found")]
    KeyNotFound,

    /// Decode failed: missing or malformed object delimiters, a member name
    /// that is not a string, trailing input, or a member value that failed
    /// to decode (the message names the member). The target map is left empty.
    #[cfg(feature = "serde")]
    #[error("malformed input: {0}")]
    MalformedInput(#[source] serde_json::Error),

    /// A member value failed to serialize (the message names the member).
    #[cfg(feature = "serde")]
    #[error("failed to encode ordered map: {0}")]
    Encode(#[source] serde_json::Error),
}

impl MapError {
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, MapError::KeyNotFound)
    }

    #[cfg(feature = "serde")]
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, MapError::MalformedInput(_))
    }

    #[cfg(feature = "serde")]
    pub fn is_encode(&self) -> bool {
        matches!(self, MapError::Encode(_))
    }
}

/// Result type used throughout the crate.
pub type Result<T, E = MapError> = core::result::Result<T, E>;
