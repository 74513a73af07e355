//! Shopping Session Args

use std::str::FromStr;

use clap::Args;
use shopfront::catalog::Category;
use thiserror::Error;

/// Category tab to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum BrowseCategory {
    /// Food and household staples
    Grocery,

    /// Phones, audio and accessories
    Electronics,

    /// Medicines and personal care
    Health,
}

impl From<BrowseCategory> for Category {
    fn from(category: BrowseCategory) -> Self {
        match category {
            BrowseCategory::Grocery => Category::Grocery,
            BrowseCategory::Electronics => Category::Electronics,
            BrowseCategory::Health => Category::Health,
        }
    }
}

/// Errors parsing an `--add` value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddRequestError {
    /// Nothing before the colon
    #[error("missing product id")]
    MissingProduct,

    /// Quantity is not a whole number of units
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// A product id with an optional quantity, written `ID` or `ID:QTY`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddRequest {
    /// Product id
    pub product: String,

    /// Units to add
    pub quantity: u32,
}

impl FromStr for AddRequest {
    type Err = AddRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (product, quantity) = match s.split_once(':') {
            Some((product, quantity)) => (
                product,
                quantity
                    .trim()
                    .parse::<u32>()
                    .map_err(|_err| AddRequestError::InvalidQuantity(quantity.to_string()))?,
            ),
            None => (s, 1),
        };

        let product = product.trim();

        if product.is_empty() {
            return Err(AddRequestError::MissingProduct);
        }

        Ok(Self {
            product: product.to_string(),
            quantity,
        })
    }
}

/// What the shopper does before the receipt is printed.
///
/// Actions run in a fixed order: likes, adds, decreases, removals, then the promo code.
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Only list this category
    #[arg(short, long, value_enum)]
    pub browse: Option<BrowseCategory>,

    /// Toggle the liked flag of a product (repeatable)
    #[arg(long = "like", value_name = "ID")]
    pub likes: Vec<String>,

    /// Add a product to the cart, optionally with a quantity (repeatable)
    #[arg(short, long = "add", value_name = "ID[:QTY]")]
    pub adds: Vec<AddRequest>,

    /// Take one unit of a product out of the cart, never below one (repeatable)
    #[arg(long = "decrease", value_name = "ID")]
    pub decreases: Vec<String>,

    /// Remove a product from the cart (repeatable)
    #[arg(long = "remove", value_name = "ID")]
    pub removals: Vec<String>,

    /// Promo code to apply
    #[arg(long, env = "SHOPFRONT_PROMO")]
    pub promo: Option<String>,
}
