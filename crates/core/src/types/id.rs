//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Catalog and payment
//! identifiers are opaque strings assigned externally (catalog seed data,
//! the payment provider), so the wrappers hold `String` rather than an
//! integer.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>`, and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use amara_core::define_id;
/// define_id!(WarehouseId);
///
/// let id = WarehouseId::new("wh-01");
/// assert_eq!(id.as_str(), "wh-01");
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
            PartialOrd,
            Ord,
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

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
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

// Define standard entity IDs
define_id!(ProductId);
define_id!(PaymentIntentId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_round_trip() {
        let id = ProductId::new("obsidian-cuff");
        assert_eq!(id.as_str(), "obsidian-cuff");
        assert_eq!(id.to_string(), "obsidian-cuff");
    }

    #[test]
    fn test_ids_are_distinct_types() {
        let product = ProductId::new("x");
        let intent = PaymentIntentId::new("x");
        // Same underlying string, different types; equality within a type only.
        assert_eq!(product, ProductId::from("x"));
        assert_eq!(intent, PaymentIntentId::from("x"));
    }

    #[test]
    fn test_serde_transparent() {
        let id = PaymentIntentId::new("pi_123");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"pi_123\"");
        let back: PaymentIntentId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
