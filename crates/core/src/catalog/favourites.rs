//! Favourites

use rustc_hash::FxHashSet;

use crate::products::ProductId;

/// Products the shopper has liked.
///
/// Kept apart from the cart: liking a product never changes what is in the cart or what it costs.
#[derive(Debug, Clone, Default)]
pub struct Favourites {
    liked: FxHashSet<ProductId>,
}

impl Favourites {
    /// Create an empty set of favourites.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the liked flag of a product and return the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.liked.remove(id) {
            false
        } else {
            self.liked.insert(ProductId::from(id));
            true
        }
    }

    /// Whether the product is liked.
    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.contains(id)
    }

    /// Iterate over liked product ids, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.liked.iter()
    }

    /// Number of liked products.
    pub fn len(&self) -> usize {
        self.liked.len()
    }

    /// Whether nothing is liked.
    pub fn is_empty(&self) -> bool {
        self.liked.is_empty()
    }
}
