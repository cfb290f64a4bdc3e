//! Immutable catalog product records.
//!
//! Products are loaded once at startup and never mutated; the catalog is
//! process-wide static data. Lookup and filter functions live with the
//! catalog in the storefront crate - this module only defines the record.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A catalog product.
///
/// `sizes` and `colors` are non-empty by construction of the seed data;
/// a cart line always references one member of each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique catalog identifier (slug).
    pub id: ProductId,
    pub name: String,
    /// Non-negative price in major units.
    pub price: Price,
    pub description: String,
    /// The heritage narrative behind the piece, when one exists.
    pub cultural_story: Option<String>,
    /// Ordered image references; the first is the primary image.
    pub images: Vec<String>,
    /// Available sizes (non-empty).
    pub sizes: Vec<String>,
    /// Available colors (non-empty).
    pub colors: Vec<String>,
    pub category: String,
    pub collection: String,
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Whether the given size is offered for this product.
    #[must_use]
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// Whether the given color is offered for this product.
    #[must_use]
    pub fn has_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }
}
