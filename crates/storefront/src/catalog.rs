//! The product catalog: static in-memory data plus pure accessors.
//!
//! Products are seeded once at startup and immutable for the process
//! lifetime. Lookups are O(n) scans over a small fixed array - there is
//! no index because there is nothing to index.

use amara_core::{CurrencyCode, Price, Product, ProductId};
use rust_decimal::Decimal;

/// The immutable catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::load()
    }
}

impl Catalog {
    /// Load the seed catalog.
    #[must_use]
    pub fn load() -> Self {
        Self {
            products: seed_products(),
        }
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == *id)
    }

    /// All products in a category.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// All products in a collection.
    #[must_use]
    pub fn by_collection(&self, collection: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.collection == collection)
            .collect()
    }

    /// Products flagged for the featured rail.
    #[must_use]
    pub fn featured(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.featured).collect()
    }
}

fn usd(amount: i64) -> Price {
    Price::new(Decimal::from(amount), CurrencyCode::USD)
}

#[allow(clippy::too_many_lines)]
fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("ade-crown-cuff"),
            name: "Ade Crown Cuff".to_string(),
            price: usd(285),
            description: "Hand-forged brass cuff finished in 18k gold, with a raised crown \
                          motif along the outer band."
                .to_string(),
            cultural_story: Some(
                "\"Ade\" means crown in Yoruba. The repeating motif echoes the beaded crowns \
                 of Yoruba royalty, each ridge laid by hand before casting."
                    .to_string(),
            ),
            images: vec![
                "/images/ade-crown-cuff-1.jpg".to_string(),
                "/images/ade-crown-cuff-2.jpg".to_string(),
            ],
            sizes: vec!["S".to_string(), "M".to_string(), "L".to_string()],
            colors: vec!["Gold".to_string(), "Brass".to_string()],
            category: "jewelry".to_string(),
            collection: "heritage".to_string(),
            in_stock: true,
            featured: true,
        },
        Product {
            id: ProductId::new("indigo-mud-wrap"),
            name: "Indigo Mud Wrap".to_string(),
            price: usd(180),
            description: "Oversized wrap in hand-dyed bogolan cotton, double-hemmed with a \
                          raw selvedge edge."
                .to_string(),
            cultural_story: Some(
                "Dyed in fermented mud and indigo over three weeks by artisans in Mali's \
                 Segou region; no two wraps carry the same pattern."
                    .to_string(),
            ),
            images: vec!["/images/indigo-mud-wrap-1.jpg".to_string()],
            sizes: vec!["One Size".to_string()],
            colors: vec!["Indigo".to_string(), "Earth".to_string()],
            category: "accessories".to_string(),
            collection: "heritage".to_string(),
            in_stock: true,
            featured: true,
        },
        Product {
            id: ProductId::new("sahara-silk-shirt"),
            name: "Sahara Silk Shirt".to_string(),
            price: usd(320),
            description: "Relaxed-cut shirt in sand-washed silk twill with corozo buttons."
                .to_string(),
            cultural_story: None,
            images: vec![
                "/images/sahara-silk-shirt-1.jpg".to_string(),
                "/images/sahara-silk-shirt-2.jpg".to_string(),
            ],
            sizes: vec![
                "XS".to_string(),
                "S".to_string(),
                "M".to_string(),
                "L".to_string(),
                "XL".to_string(),
            ],
            colors: vec!["Sand".to_string(), "Onyx".to_string()],
            category: "apparel".to_string(),
            collection: "atelier".to_string(),
            in_stock: true,
            featured: false,
        },
        Product {
            id: ProductId::new("kente-line-stole"),
            name: "Kente Line Stole".to_string(),
            price: usd(240),
            description: "Narrow-loom stole woven in silk and cotton, finished with hand-twisted \
                          fringe."
                .to_string(),
            cultural_story: Some(
                "Woven on traditional Ashanti strip looms in Bonwire, Ghana. The \"line\" \
                 pattern is reserved for moments of passage - graduations, weddings, firsts."
                    .to_string(),
            ),
            images: vec!["/images/kente-line-stole-1.jpg".to_string()],
            sizes: vec!["One Size".to_string()],
            colors: vec!["Gold".to_string(), "Ember".to_string(), "Noir".to_string()],
            category: "accessories".to_string(),
            collection: "heritage".to_string(),
            in_stock: true,
            featured: true,
        },
        Product {
            id: ProductId::new("obsidian-drop-earrings"),
            name: "Obsidian Drop Earrings".to_string(),
            price: usd(195),
            description: "Polished obsidian drops on recycled sterling hooks.".to_string(),
            cultural_story: None,
            images: vec!["/images/obsidian-drop-earrings-1.jpg".to_string()],
            sizes: vec!["One Size".to_string()],
            colors: vec!["Obsidian".to_string()],
            category: "jewelry".to_string(),
            collection: "atelier".to_string(),
            in_stock: true,
            featured: false,
        },
        Product {
            id: ProductId::new("meridian-leather-tote"),
            name: "Meridian Leather Tote".to_string(),
            price: usd(460),
            description: "Structured tote in vegetable-tanned leather with a hand-burnished \
                          base and solid brass feet."
                .to_string(),
            cultural_story: None,
            images: vec![
                "/images/meridian-leather-tote-1.jpg".to_string(),
                "/images/meridian-leather-tote-2.jpg".to_string(),
            ],
            sizes: vec!["One Size".to_string()],
            colors: vec!["Cognac".to_string(), "Noir".to_string()],
            category: "bags".to_string(),
            collection: "atelier".to_string(),
            in_stock: true,
            featured: true,
        },
        Product {
            id: ProductId::new("adire-eve-dress"),
            name: "Adire Eve Dress".to_string(),
            price: usd(540),
            description: "Bias-cut evening dress in hand-resist adire silk.".to_string(),
            cultural_story: Some(
                "The adire eleko resist pattern is painted with cassava paste before dyeing, \
                 a technique kept by women's guilds in Abeokuta for over a century."
                    .to_string(),
            ),
            images: vec!["/images/adire-eve-dress-1.jpg".to_string()],
            sizes: vec![
                "XS".to_string(),
                "S".to_string(),
                "M".to_string(),
                "L".to_string(),
            ],
            colors: vec!["Indigo".to_string(), "Midnight".to_string()],
            category: "apparel".to_string(),
            collection: "heritage".to_string(),
            in_stock: true,
            featured: false,
        },
        Product {
            id: ProductId::new("cowrie-signet-ring"),
            name: "Cowrie Signet Ring".to_string(),
            price: usd(150),
            description: "Cast signet ring with a recessed cowrie shell relief.".to_string(),
            cultural_story: Some(
                "Cowrie shells moved as currency and as blessing across West African trade \
                 routes; worn on the hand, they mark prosperity carried with you."
                    .to_string(),
            ),
            images: vec!["/images/cowrie-signet-ring-1.jpg".to_string()],
            sizes: vec![
                "6".to_string(),
                "7".to_string(),
                "8".to_string(),
                "9".to_string(),
            ],
            colors: vec!["Gold".to_string(), "Silver".to_string()],
            category: "jewelry".to_string(),
            collection: "heritage".to_string(),
            in_stock: false,
            featured: false,
        },
    ]
}
