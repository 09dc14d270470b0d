//! Newtype IDs for type-safe entity references.
//!
//! Marketplace records are keyed by opaque string identifiers (`_id` in the
//! API payloads). Use the `define_id!` macro to create wrappers that prevent
//! accidentally passing a store ID where a product ID is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Default`
/// - Accessors: `new()`, `as_str()`, `short()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display`
///
/// # Example
///
/// ```rust
/// # use bazaar_core::define_id;
/// define_id!(ShelfId);
/// define_id!(AisleId);
///
/// let shelf = ShelfId::new("64f0c2a1b9e77d0012ab34cd");
/// assert_eq!(shelf.short(), "12ab34cd");
///
/// // These are different types, so this won't compile:
/// // let _: AisleId = shelf;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            Default,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The last eight characters, used as a human-facing reference.
            #[must_use]
            pub fn short(&self) -> String {
                $crate::types::id::short_reference(&self.0)
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
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Number of trailing characters shown for a short reference.
pub const SHORT_REFERENCE_LEN: usize = 8;

/// Return the last [`SHORT_REFERENCE_LEN`] characters of an identifier.
///
/// Identifiers shorter than that are returned whole.
#[must_use]
pub fn short_reference(id: &str) -> String {
    let count = id.chars().count();
    id.chars()
        .skip(count.saturating_sub(SHORT_REFERENCE_LEN))
        .collect()
}

define_id!(UserId);
define_id!(StoreId);
define_id!(ProductId);
define_id!(OrderId);
define_id!(CartItemId);
define_id!(WishlistItemId);
define_id!(SubscriptionId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_short_reference_takes_last_eight() {
        let id = OrderId::new("64f0c2a1b9e77d0012ab34cd");
        assert_eq!(id.short(), "12ab34cd");
    }

    #[test]
    fn test_short_reference_keeps_short_ids() {
        assert_eq!(short_reference("abc"), "abc");
        assert_eq!(short_reference(""), "");
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = StoreId::new("s-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"s-1\"");

        let parsed: ProductId = serde_json::from_str("\"p-9\"").unwrap();
        assert_eq!(parsed.as_str(), "p-9");
    }

    #[test]
    fn test_display_matches_inner_value() {
        let id = ProductId::from("p-42");
        assert_eq!(id.to_string(), "p-42");
    }
}
