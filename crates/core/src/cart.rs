//! The cart store: line items keyed by (product, size, color).
//!
//! A cart is an ordered collection of lines - insertion order is preserved
//! so the display stays stable across mutations - plus the panel open flag.
//! Two lines never share the same (product id, size, color) key; adding the
//! same selection again collapses into one line with a summed quantity.
//!
//! The cart itself performs no I/O. The storefront crate persists a
//! serialized snapshot to the visitor's session after every mutation and
//! rehydrates it on each request. The `revision` counter increments on
//! every mutation so a stale concurrent snapshot (two tabs writing the
//! same session) is detectable; the session layer itself is last-write-wins.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Price, ProductId};

/// One (product, size, color) selection with a quantity.
///
/// Name and unit price are snapshotted from the catalog at add time so a
/// serialized cart stays self-contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub size: String,
    pub color: String,
    /// Always >= 1; a quantity update to <= 0 removes the line instead.
    pub quantity: u32,
}

impl CartLine {
    /// Whether this line matches the given uniqueness key.
    fn matches(&self, product_id: &ProductId, size: &str, color: &str) -> bool {
        self.product_id == *product_id && self.size == size && self.color == color
    }

    /// Line total: unit price x quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.amount * Decimal::from(self.quantity)
    }
}

/// The cart: ordered lines plus the panel open flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    is_open: bool,
    /// Bumped on every mutation; used to detect stale snapshots.
    #[serde(default)]
    revision: u64,
}

impl Cart {
    /// Create an empty, closed cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart panel is displayed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Mutation counter for stale-snapshot detection.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of a (product, size, color) selection.
    ///
    /// If a line with the same key exists its quantity increments by 1;
    /// otherwise a new line with quantity 1 is appended. Size/color
    /// membership in the product's offerings is the caller's concern -
    /// the storefront validates it at the route layer.
    pub fn add_item(&mut self, product: &Product, size: &str, color: &str) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(&product.id, size, color))
        {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                unit_price: product.price,
                size: size.to_string(),
                color: color.to_string(),
                quantity: 1,
            });
        }
        self.revision += 1;
    }

    /// Remove the line matching the key; silent no-op if absent.
    pub fn remove_item(&mut self, product_id: &ProductId, size: &str, color: &str) {
        self.lines
            .retain(|line| !line.matches(product_id, size, color));
        self.revision += 1;
    }

    /// Set (not increment) the quantity of the matching line.
    ///
    /// A quantity <= 0 is equivalent to [`Self::remove_item`]; the cart
    /// never stores a non-positive quantity.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        size: &str,
        color: &str,
        quantity: i64,
    ) {
        if quantity <= 0 {
            self.remove_item(product_id, size, color);
            return;
        }
        // Quantity is positive and bounded well below u32::MAX in practice.
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(product_id, size, color))
        {
            line.quantity = quantity;
        }
        self.revision += 1;
    }

    /// Empty the cart. Does not touch the open flag.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.revision += 1;
    }

    /// Flip the panel open flag. Pure UI state; items are untouched.
    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
        self.revision += 1;
    }

    /// Sum of unit price x quantity over all lines; zero for an empty cart.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities (not line count) - drives the cart badge.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CurrencyCode;

    fn product(id: &str, amount: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::new(Decimal::from(amount), CurrencyCode::USD),
            description: String::new(),
            cultural_story: None,
            images: vec![format!("/images/{id}.jpg")],
            sizes: vec!["S".to_string(), "M".to_string()],
            colors: vec!["Black".to_string(), "Gold".to_string()],
            category: "jewelry".to_string(),
            collection: "heritage".to_string(),
            in_stock: true,
            featured: false,
        }
    }

    #[test]
    fn test_repeated_add_collapses_into_one_line() {
        let mut cart = Cart::new();
        let p = product("cuff", 100);
        for _ in 0..5 {
            cart.add_item(&p, "S", "Black");
        }
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_different_size_or_color_is_a_distinct_line() {
        let mut cart = Cart::new();
        let p = product("cuff", 100);
        cart.add_item(&p, "S", "Black");
        cart.add_item(&p, "M", "Black");
        cart.add_item(&p, "S", "Gold");
        assert_eq!(cart.lines().len(), 3);
        assert!(cart.lines().iter().all(|line| line.quantity == 1));
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 10), "S", "Black");
        cart.add_item(&product("b", 20), "S", "Black");
        cart.add_item(&product("c", 30), "S", "Black");
        // Mutating an earlier line must not reorder the display.
        cart.update_quantity(&ProductId::new("a"), "S", "Black", 4);
        let ids: Vec<&str> = cart
            .lines()
            .iter()
            .map(|line| line.product_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_update_quantity_sets_not_increments() {
        let mut cart = Cart::new();
        let p = product("cuff", 100);
        cart.add_item(&p, "S", "Black");
        cart.add_item(&p, "S", "Black");
        cart.update_quantity(&p.id, "S", "Black", 7);
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        for quantity in [0, -1] {
            let mut cart = Cart::new();
            let p = product("cuff", 100);
            cart.add_item(&p, "S", "Black");
            cart.update_quantity(&p.id, "S", "Black", quantity);
            assert!(cart.is_empty(), "quantity {quantity} should remove");
        }
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        let p = product("cuff", 100);
        cart.add_item(&p, "S", "Black");
        cart.remove_item(&ProductId::new("missing"), "S", "Black");
        cart.remove_item(&p.id, "M", "Black");
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        let a = product("a", 100);
        let b = product("b", 50);
        cart.add_item(&a, "S", "Black");
        cart.add_item(&a, "S", "Black");
        cart.add_item(&b, "M", "Gold");
        assert_eq!(cart.total_price(), Decimal::from(250));
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let cart = Cart::new();
        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_total_items_counts_quantities_not_lines() {
        let mut cart = Cart::new();
        let p = product("cuff", 100);
        cart.add_item(&p, "S", "Black");
        cart.update_quantity(&p.id, "S", "Black", 4);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_items(), 4);
    }

    #[test]
    fn test_clear_keeps_open_flag() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 10), "S", "Black");
        cart.toggle_open();
        assert!(cart.is_open());
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.is_open());
    }

    #[test]
    fn test_toggle_open_keeps_items() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 10), "S", "Black");
        cart.toggle_open();
        cart.toggle_open();
        assert!(!cart.is_open());
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_every_mutation_bumps_revision() {
        let mut cart = Cart::new();
        let p = product("a", 10);
        let before = cart.revision();
        cart.add_item(&p, "S", "Black");
        cart.update_quantity(&p.id, "S", "Black", 2);
        cart.toggle_open();
        cart.clear();
        assert_eq!(cart.revision(), before + 4);
    }

    #[test]
    fn test_serde_round_trip_preserves_order_and_flag() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 10), "S", "Black");
        cart.add_item(&product("b", 20), "M", "Gold");
        cart.toggle_open();

        let json = serde_json::to_string(&cart).expect("serialize");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
        assert!(back.is_open());
        assert_eq!(back.lines()[0].product_id.as_str(), "a");
        assert_eq!(back.lines()[1].product_id.as_str(), "b");
    }
}
