//! Fixtures
//!
//! Deterministic catalog, promotion, pricing-policy and cart data loaded from YAML. A fixture
//! *set* is a group of files sharing a name, one per directory under the base path:
//!
//! ```text
//! fixtures/
//!   catalog/<set>.yml
//!   promotions/<set>.yml
//!   policies/<set>.yml
//!   carts/<set>.yml
//! ```

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError},
    discounts::Discount,
    fixtures::{
        carts::{CartFixture, CartLineFixture},
        policies::PolicyFixture,
        products::ProductsFixture,
        promotions::PromotionsFixture,
    },
    items::NewLineItem,
    pricing::{InvalidPolicy, PricingPolicy},
    promotions::{PromoBook, PromoRejection},
};

pub mod carts;
pub mod policies;
pub mod products;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Promo code cannot be used with this fixture set
    #[error("Invalid promo code {code}: {reason}")]
    InvalidPromotion {
        /// Normalised code
        code: String,

        /// Why it was rejected
        reason: PromoRejection,
    },

    /// Pricing policy would charge a negative tax or delivery fee
    #[error("Invalid pricing policy: {0}")]
    InvalidPolicy(#[from] InvalidPolicy),

    /// Currency mismatch between fixture files
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Catalog file is empty
    #[error("Catalog has no products; currency unknown")]
    NoCurrency,

    /// No catalog loaded
    #[error("No catalog loaded; cannot resolve cart lines")]
    NoCatalog,

    /// Catalog creation error
    #[error("Failed to build catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: Option<Catalog<'a>>,
    promotions: PromoBook<'a>,
    policy: Option<PricingPolicy<'a>>,

    /// Lines the cart starts with, validated against the catalog
    seed: Vec<CartLineFixture>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            promotions: PromoBook::new(),
            policy: None,
            seed: Vec::new(),
            currency: None,
        }
    }

    /// Load a complete fixture set (catalog, promotions, policy and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_set(name)?;

        Ok(fixture)
    }

    /// Load every file of a fixture set into this fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn load_set(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.load_catalog(name)?
            .load_promotions(name)?
            .load_policy(name)?
            .load_cart(name)
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, is empty, or if there are
    /// duplicate ids or currency mismatches.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("catalog", name)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        let Some(first) = fixture.products.first() else {
            return Err(FixtureError::NoCurrency);
        };

        let (_minor_units, currency) = products::parse_price(&first.price)?;

        self.note_currency(currency)?;

        let mut catalog = Catalog::new(currency);

        for product_fixture in fixture.products {
            catalog.insert(product_fixture.try_into()?)?;
        }

        debug!(set = name, products = catalog.len(), "loaded catalog");

        self.catalog = Some(catalog);

        Ok(self)
    }

    /// Load promo codes from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a code's amounts are in a
    /// different currency from the rest of the set, or a code is otherwise invalid.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("promotions", name)?;
        let fixture: PromotionsFixture = serde_norway::from_str(&contents)?;

        for (code, promo_fixture) in fixture.codes {
            let promo = promo_fixture.try_into_promo(&code)?;

            let amount_off = match promo.discount() {
                Discount::AmountOff(amount) => Some(*amount),
                Discount::PercentageOff(_) => None,
            };

            for amount in [amount_off, promo.minimum_subtotal().copied()]
                .into_iter()
                .flatten()
            {
                self.note_currency(amount.currency())?;
            }

            if let Some(currency) = self.currency {
                promo
                    .validate(currency)
                    .map_err(|reason| FixtureError::InvalidPromotion {
                        code: promo.code().to_string(),
                        reason,
                    })?;
            }

            self.promotions.insert(promo);
        }

        debug!(set = name, codes = self.promotions.len(), "loaded promotions");

        Ok(self)
    }

    /// Load the pricing policy from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, its amounts are in another
    /// currency, or it has a negative amount or a tax rate outside 0% to 100%.
    pub fn load_policy(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("policies", name)?;
        let fixture: PolicyFixture = serde_norway::from_str(&contents)?;
        let policy: PricingPolicy<'static> = PricingPolicy::try_from(fixture)?;

        policy.validate()?;
        self.note_currency(policy.delivery.fee.currency())?;

        if let Some(currency) = self.currency
            && let Some(foreign) = policy.foreign_currency(currency)
        {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                foreign.to_string(),
            ));
        }

        self.policy = Some(policy);

        Ok(self)
    }

    /// Load the seed cart from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, no catalog is loaded yet, or a
    /// line references an unknown product.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("carts", name)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;
        let catalog = self.catalog.as_ref().ok_or(FixtureError::NoCatalog)?;

        for line in &fixture.lines {
            if catalog.get(&line.product).is_none() {
                return Err(FixtureError::ProductNotFound(line.product.clone()));
            }
        }

        debug!(set = name, lines = fixture.lines.len(), "loaded seed cart");

        self.seed = fixture.lines;

        Ok(self)
    }

    /// Get the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCatalog`] if no catalog has been loaded.
    pub fn catalog(&self) -> Result<&Catalog<'a>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCatalog)
    }

    /// Loaded promo codes
    pub fn promotions(&self) -> &PromoBook<'a> {
        &self.promotions
    }

    /// Loaded pricing policy, or no tax and free delivery when none was loaded.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] if neither a policy nor a catalog has been loaded.
    pub fn policy(&self) -> Result<PricingPolicy<'a>, FixtureError> {
        match (&self.policy, self.currency) {
            (Some(policy), _) => Ok(*policy),
            (None, Some(currency)) => Ok(PricingPolicy::untaxed(currency)),
            (None, None) => Err(FixtureError::NoCurrency),
        }
    }

    /// Get the currency used by this fixture
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] if no catalog has been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Build a cart priced under the loaded policy and filled with the seed lines.
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog is loaded, a seed line references an unknown product, or
    /// the cart rejects a line.
    pub fn cart(&self) -> Result<Cart<'a>, FixtureError> {
        let catalog = self.catalog()?;

        let lines = self
            .seed
            .iter()
            .map(|line| {
                catalog
                    .get(&line.product)
                    .map(|product| product.to_line_item(line.quantity))
                    .ok_or_else(|| FixtureError::ProductNotFound(line.product.clone()))
            })
            .collect::<Result<Vec<NewLineItem<'a>>, _>>()?;

        Ok(Cart::with_items(lines, catalog.currency(), self.policy()?)?)
    }

    fn read(&self, kind: &str, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));

        Ok(fs::read_to_string(file_path)?)
    }

    fn note_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rusty_money::{Money, iso::INR};
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn write(dir: &TempDir, kind: &str, name: &str, contents: &str) -> TestResult {
        let path = dir.path().join(kind);

        fs::create_dir_all(&path)?;
        fs::write(path.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    const CATALOG: &str = "products:
  - id: rice
    name: Basmati Rice 5kg
    price: \"640.00 INR\"
    sold_by: GrainCo
    category: grocery
  - id: earbuds
    name: Wireless Earbuds
    price: \"2400.00 INR\"
    sold_by: SoundHub
    category: electronics
";

    #[test]
    fn catalog_keeps_file_order() -> TestResult {
        let dir = TempDir::new()?;

        write(&dir, "catalog", "t", CATALOG)?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_catalog("t")?;

        let ids: Vec<&str> = fixture.catalog()?.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["rice", "earbuds"]);
        assert_eq!(fixture.currency()?, INR);

        Ok(())
    }

    #[test]
    fn empty_catalog_is_rejected() -> TestResult {
        let dir = TempDir::new()?;

        write(&dir, "catalog", "t", "products: []\n")?;

        let result = Fixture::with_base_path(dir.path()).load_catalog("t").map(|_| ());

        assert!(matches!(result, Err(FixtureError::NoCurrency)));

        Ok(())
    }

    #[test]
    fn cart_lines_must_reference_catalog_products() -> TestResult {
        let dir = TempDir::new()?;

        write(&dir, "catalog", "t", CATALOG)?;
        write(&dir, "carts", "t", "lines:\n  - product: kettle\n")?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_catalog("t")?;

        let result = fixture.load_cart("t").map(|_| ());

        assert!(matches!(result, Err(FixtureError::ProductNotFound(id)) if id == "kettle"));

        Ok(())
    }

    #[test]
    fn cart_without_catalog_is_rejected() -> TestResult {
        let dir = TempDir::new()?;

        write(&dir, "carts", "t", "lines: []\n")?;

        let result = Fixture::with_base_path(dir.path()).load_cart("t").map(|_| ());

        assert!(matches!(result, Err(FixtureError::NoCatalog)));

        Ok(())
    }

    #[test]
    fn policy_in_other_currency_is_rejected() -> TestResult {
        let dir = TempDir::new()?;

        write(&dir, "catalog", "t", CATALOG)?;
        write(
            &dir,
            "policies",
            "t",
            "tax:\n  type: none\ndelivery:\n  fee: \"4.00 GBP\"\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_catalog("t")?;

        let result = fixture.load_policy("t").map(|_| ());

        assert!(matches!(
            result,
            Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "INR" && found == "GBP"
        ));

        Ok(())
    }

    #[test]
    fn negative_delivery_fee_is_rejected() -> TestResult {
        let dir = TempDir::new()?;

        write(
            &dir,
            "policies",
            "t",
            "tax:\n  type: none\ndelivery:\n  fee: \"-40.00 INR\"\n",
        )?;

        let result = Fixture::with_base_path(dir.path()).load_policy("t").map(|_| ());

        assert!(matches!(
            result,
            Err(FixtureError::InvalidPolicy(InvalidPolicy::NegativeDeliveryFee(-4_000)))
        ));

        Ok(())
    }

    #[test]
    fn negative_tax_rate_is_rejected() -> TestResult {
        let dir = TempDir::new()?;

        write(
            &dir,
            "policies",
            "t",
            "tax:\n  type: rate\n  value: \"-5%\"\ndelivery:\n  fee: \"40.00 INR\"\n",
        )?;

        let result = Fixture::with_base_path(dir.path()).load_policy("t").map(|_| ());

        assert!(matches!(
            result,
            Err(FixtureError::InvalidPolicy(InvalidPolicy::RateOutOfRange))
        ));

        Ok(())
    }

    #[test]
    fn promotions_loaded_first_fix_the_set_currency() -> TestResult {
        let dir = TempDir::new()?;

        write(
            &dir,
            "promotions",
            "t",
            "codes:\n  FLAT5:\n    discount:\n      type: amount_off\n      value: \"5.00 GBP\"\n",
        )?;
        write(&dir, "catalog", "t", CATALOG)?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_promotions("t")?;

        assert_eq!(fixture.currency()?.iso_alpha_code, "GBP");

        let result = fixture.load_catalog("t").map(|_| ());

        assert!(matches!(
            result,
            Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "GBP" && found == "INR"
        ));

        Ok(())
    }

    #[test]
    fn promotions_in_mixed_currencies_are_rejected() -> TestResult {
        let dir = TempDir::new()?;

        write(
            &dir,
            "promotions",
            "t",
            "codes:\n  FLAT5:\n    discount:\n      type: amount_off\n      value: \"5.00 GBP\"\n    minimum_subtotal: \"20.00 USD\"\n",
        )?;

        let result = Fixture::with_base_path(dir.path()).load_promotions("t").map(|_| ());

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));

        Ok(())
    }

    #[test]
    fn seeded_cart_merges_repeated_lines() -> TestResult {
        let dir = TempDir::new()?;

        write(&dir, "catalog", "t", CATALOG)?;
        write(
            &dir,
            "carts",
            "t",
            "lines:\n  - product: earbuds\n  - product: rice\n    quantity: 2\n  - product: earbuds\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_catalog("t")?.load_cart("t")?;

        let cart = fixture.cart()?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(
            cart.subtotal()?,
            Money::from_minor(2 * 240_000 + 2 * 64_000, INR)
        );

        Ok(())
    }
}
