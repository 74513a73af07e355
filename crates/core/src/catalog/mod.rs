//! Catalog
//!
//! Products grouped by category. Browsing a category lists its products in the order they were
//! inserted, which is the order the home screens show them in.

use std::fmt;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    items::NewLineItem,
    products::{ProductId, ProductKey},
};

mod favourites;

pub use favourites::Favourites;

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A product with the same id is already in the catalog.
    #[error("product {0} is already in the catalog")]
    DuplicateProduct(ProductId),

    /// A product is priced in another currency (product currency, catalog currency).
    #[error("product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// A product is priced below zero (minor units).
    #[error("product {0} has negative price {1}")]
    NegativePrice(ProductId, i64),
}

/// Top level shopping category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Food and household staples
    Grocery,

    /// Phones, audio and accessories
    Electronics,

    /// Medicines and personal care
    Health,
}

impl Category {
    /// Every category, in home screen tab order.
    pub const ALL: [Category; 3] = [Category::Grocery, Category::Electronics, Category::Health];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            Category::Grocery => "Grocery",
            Category::Electronics => "Electronics",
            Category::Health => "Health",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalog entry.
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Stable product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product price
    pub price: Money<'a, Currency>,

    /// Seller name
    pub sold_by: String,

    /// Category the product is listed under
    pub category: Category,

    /// Average rating in tenths of a star (e.g. 45 is 4.5 stars)
    pub rating: u8,
}

impl<'a> Product<'a> {
    /// Build the cart request for `quantity` units of this product.
    pub fn to_line_item(&self, quantity: u32) -> NewLineItem<'a> {
        NewLineItem::new(self.id.clone(), self.name.clone(), self.price)
            .quantity(quantity)
            .sold_by(self.sold_by.clone())
    }
}

/// Product catalog
#[derive(Debug)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    ids: FxHashMap<ProductId, ProductKey>,
    order: Vec<ProductKey>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            ids: FxHashMap::default(),
            order: Vec::new(),
            currency,
        }
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the id is taken, or the price is negative or in another
    /// currency.
    pub fn insert(&mut self, product: Product<'a>) -> Result<ProductKey, CatalogError> {
        if self.ids.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        if product.price.currency() != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.id,
                product.price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if product.price.to_minor_units() < 0 {
            let minor = product.price.to_minor_units();

            return Err(CatalogError::NegativePrice(product.id, minor));
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.ids.insert(id, key);
        self.order.push(key);

        Ok(key)
    }

    /// Get a product by id.
    pub fn get(&self, id: &str) -> Option<&Product<'a>> {
        self.ids
            .get(id)
            .and_then(|key| self.products.get(*key))
    }

    /// Get a product by storage key.
    pub fn get_key(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Iterate over every product in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Products listed under a category, in insertion order.
    pub fn browse(&self, category: Category) -> impl Iterator<Item = &Product<'a>> {
        self.iter()
            .filter(move |product| product.category == category)
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the currency of the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{INR, USD};
    use testresult::TestResult;

    use super::*;

    fn product<'a>(id: &str, category: Category, minor: i64) -> Product<'a> {
        Product {
            id: ProductId::from(id),
            name: id.to_uppercase(),
            price: Money::from_minor(minor, INR),
            sold_by: "FreshMart".to_string(),
            category,
            rating: 42,
        }
    }

    fn catalog<'a>() -> Result<Catalog<'a>, CatalogError> {
        let mut catalog = Catalog::new(INR);

        catalog.insert(product("apples", Category::Grocery, 18_000))?;
        catalog.insert(product("earbuds", Category::Electronics, 240_000))?;
        catalog.insert(product("rice", Category::Grocery, 45_000))?;
        catalog.insert(product("vitamin-c", Category::Health, 30_000))?;

        Ok(catalog)
    }

    #[test]
    fn browse_lists_category_in_insertion_order() -> TestResult {
        let catalog = catalog()?;

        let grocery: Vec<&str> = catalog
            .browse(Category::Grocery)
            .map(|product| product.id.as_str())
            .collect();

        assert_eq!(grocery, vec!["apples", "rice"]);
        assert_eq!(catalog.browse(Category::Health).count(), 1);

        Ok(())
    }

    #[test]
    fn insert_rejects_duplicate_ids() -> TestResult {
        let mut catalog = catalog()?;

        let result = catalog.insert(product("rice", Category::Grocery, 1));

        assert!(matches!(result, Err(CatalogError::DuplicateProduct(id)) if id.as_str() == "rice"));
        assert_eq!(catalog.len(), 4);

        Ok(())
    }

    #[test]
    fn insert_rejects_foreign_currency() {
        let mut catalog = Catalog::new(INR);
        let mut foreign = product("earbuds", Category::Electronics, 1);
        foreign.price = Money::from_minor(2_999, USD);

        assert!(matches!(
            catalog.insert(foreign),
            Err(CatalogError::CurrencyMismatch(_, "USD", "INR"))
        ));
    }

    #[test]
    fn insert_rejects_negative_price() -> TestResult {
        let mut catalog = catalog()?;

        let result = catalog.insert(product("refund", Category::Grocery, -500));

        assert!(matches!(
            result,
            Err(CatalogError::NegativePrice(id, -500)) if id.as_str() == "refund"
        ));
        assert!(catalog.get("refund").is_none());
        assert_eq!(catalog.len(), 4);

        Ok(())
    }

    #[test]
    fn get_by_id_and_key() -> TestResult {
        let mut catalog = Catalog::new(INR);
        let key = catalog.insert(product("rice", Category::Grocery, 45_000))?;

        assert_eq!(catalog.get("rice").map(|p| p.price), Some(Money::from_minor(45_000, INR)));
        assert_eq!(catalog.get_key(key).map(|p| p.id.as_str()), Some("rice"));
        assert!(catalog.get("missing").is_none());

        Ok(())
    }

    #[test]
    fn to_line_item_copies_listing() -> TestResult {
        let catalog = catalog()?;
        let item = catalog.get("earbuds").ok_or("missing earbuds")?.to_line_item(2);

        assert_eq!(item.product.as_str(), "earbuds");
        assert_eq!(item.unit_price, Money::from_minor(240_000, INR));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.sold_by, "FreshMart");

        Ok(())
    }
}
