//! Newtype IDs for type-safe entity references.
//!
//! Two macros are provided: `define_id!` for locally allocated numeric IDs
//! and `define_opaque_id!` for server-assigned identifiers that the client
//! must treat as opaque strings.

/// Macro to define a type-safe numeric ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_u64()`
/// - `From<u64>` and `Into<u64>` implementations
///
/// # Example
///
/// ```rust
/// # use printforge_core::define_id;
/// define_id!(QuoteId);
///
/// let first = QuoteId::new(1);
/// let second = QuoteId::new(2);
/// assert_ne!(first, second);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create a new ID from a u64 value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying u64 value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Macro to define a type-safe wrapper for a server-assigned opaque ID.
///
/// The quote service assigns these; the client never inspects or fabricates
/// them, it only echoes them back. Wrapping them prevents a shipping-rate ID
/// from being passed where a session ID is expected.
#[macro_export]
macro_rules! define_opaque_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a server-assigned identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

// Locally allocated: identifies a line item for its whole lifetime, stable
// across removals of other items.
define_id!(QuoteId);

// Server-assigned at shipping-rate-request time.
define_opaque_id!(SessionId);
define_opaque_id!(RateId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_id_roundtrip() {
        let id = QuoteId::new(7);
        assert_eq!(id.as_u64(), 7);
        assert_eq!(u64::from(id), 7);
        assert_eq!(QuoteId::from(7), id);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn test_opaque_id_display() {
        let rate = RateId::new("rate_abc123");
        assert_eq!(rate.as_str(), "rate_abc123");
        assert_eq!(rate.to_string(), "rate_abc123");
    }

    #[test]
    fn test_opaque_id_serde_transparent() {
        let session = SessionId::new("sess_42");
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(json, "\"sess_42\"");

        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
