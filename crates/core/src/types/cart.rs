//! The cart: an ordered, id-unique sequence of line items.
//!
//! A `Cart` is an immutable snapshot. Every mutation produces a new `Cart`
//! and leaves the original untouched, so a published snapshot can be shared
//! freely between readers.

use std::collections::HashSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize, Serializer};

use super::id::ProductId;
use super::product::Product;

/// Errors raised when a sequence of products does not form a valid cart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartIntegrityError {
    /// Two entries share the same product id.
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),
    /// An entry holds zero units.
    #[error("product {0} has an amount of zero")]
    ZeroAmount(ProductId),
}

/// The user's current selection of products awaiting purchase.
///
/// ## Constraints
///
/// - No two entries share a product id
/// - Every entry holds at least one unit
///
/// Insertion order is preserved for display.
///
/// ## Wire format
///
/// A JSON array of products. Deserialization rejects arrays that violate the
/// constraints above.
///
/// ```
/// use rocketshoes_core::{Cart, ProductId};
///
/// let cart: Cart = serde_json::from_str(r#"[{"id":1,"title":"X","amount":2}]"#).unwrap();
/// assert_eq!(cart.amount_of(ProductId::new(1)), 2);
///
/// assert!(serde_json::from_str::<Cart>(r#"[{"id":1,"amount":1},{"id":1,"amount":1}]"#).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Product>")]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Iterate over line items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.items.iter()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line item for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|product| product.id == id)
    }

    /// Whether the cart holds a line item for a product.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Units of a product currently held (0 if absent).
    #[must_use]
    pub fn amount_of(&self, id: ProductId) -> u32 {
        self.get(id).map_or(0, |product| product.amount)
    }

    /// Total units across all line items.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|product| u64::from(product.amount)).sum()
    }

    /// New cart with the amount of `id` replaced.
    ///
    /// Other entries are untouched. If `id` is absent the result equals
    /// `self`.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: NonZeroU32) -> Self {
        Self {
            items: self
                .items
                .iter()
                .map(|product| {
                    if product.id == id {
                        product.with_amount(amount.get())
                    } else {
                        product.clone()
                    }
                })
                .collect(),
        }
    }

    /// New cart with `product` appended at the end.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is already in the cart or holds zero
    /// units.
    pub fn with_appended(&self, product: Product) -> Result<Self, CartIntegrityError> {
        if product.amount == 0 {
            return Err(CartIntegrityError::ZeroAmount(product.id));
        }
        if self.contains(product.id) {
            return Err(CartIntegrityError::DuplicateProduct(product.id));
        }

        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(product);
        Ok(Self { items })
    }

    /// New cart without the entry for `id`, or `None` if it is absent.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }

        Some(Self {
            items: self
                .items
                .iter()
                .filter(|product| product.id != id)
                .cloned()
                .collect(),
        })
    }
}

impl TryFrom<Vec<Product>> for Cart {
    type Error = CartIntegrityError;

    fn try_from(items: Vec<Product>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(items.len());
        for product in &items {
            if product.amount == 0 {
                return Err(CartIntegrityError::ZeroAmount(product.id));
            }
            if !seen.insert(product.id) {
                return Err(CartIntegrityError::DuplicateProduct(product.id));
            }
        }
        Ok(Self { items })
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(n: i64) -> ProductId {
        ProductId::new(n)
    }

    fn amount(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn sample_cart() -> Cart {
        Cart::try_from(vec![
            Product::new(id(1), 1).with_field("title", "Runner"),
            Product::new(id(2), 3).with_field("title", "Trail"),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let cart = sample_cart();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.amount_of(id(2)), 3);
        assert_eq!(cart.amount_of(id(9)), 0);
        assert!(cart.contains(id(1)));
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_with_amount_touches_only_target() {
        let cart = sample_cart();
        let updated = cart.with_amount(id(1), amount(5));

        assert_eq!(updated.amount_of(id(1)), 5);
        assert_eq!(updated.get(id(1)).unwrap().field("title"), Some(&json!("Runner")));
        assert_eq!(updated.get(id(2)), cart.get(id(2)));
        // Original snapshot is unchanged
        assert_eq!(cart.amount_of(id(1)), 1);
    }

    #[test]
    fn test_with_amount_absent_is_identity() {
        let cart = sample_cart();
        assert_eq!(cart.with_amount(id(9), amount(2)), cart);
    }

    #[test]
    fn test_with_appended_preserves_order() {
        let cart = sample_cart()
            .with_appended(Product::new(id(7), 1))
            .unwrap();

        let ids: Vec<_> = cart.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![id(1), id(2), id(7)]);
    }

    #[test]
    fn test_with_appended_rejects_duplicate_and_zero() {
        let cart = sample_cart();
        assert_eq!(
            cart.with_appended(Product::new(id(1), 1)),
            Err(CartIntegrityError::DuplicateProduct(id(1)))
        );
        assert_eq!(
            cart.with_appended(Product::new(id(8), 0)),
            Err(CartIntegrityError::ZeroAmount(id(8)))
        );
    }

    #[test]
    fn test_without() {
        let cart = sample_cart();
        let removed = cart.without(id(1)).unwrap();

        assert_eq!(removed.len(), 1);
        assert!(!removed.contains(id(1)));
        assert!(removed.without(id(1)).is_none());
    }

    #[test]
    fn test_storage_round_trip_keeps_order_and_fields() {
        let cart = sample_cart();
        let serialized = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&serialized).unwrap();

        assert_eq!(restored, cart);
        assert_eq!(serde_json::to_string(&restored).unwrap(), serialized);
    }

    #[test]
    fn test_serializes_as_array() {
        let cart = Cart::new()
            .with_appended(Product::new(id(1), 1).with_field("name", "X"))
            .unwrap();

        assert_eq!(
            serde_json::to_value(&cart).unwrap(),
            json!([{"id": 1, "name": "X", "amount": 1}])
        );
    }

    #[test]
    fn test_deserialize_rejects_invalid_carts() {
        let duplicate = json!([{"id": 1, "amount": 1}, {"id": 1, "amount": 2}]);
        assert!(serde_json::from_value::<Cart>(duplicate).is_err());

        let zero = json!([{"id": 1, "amount": 0}]);
        assert!(serde_json::from_value::<Cart>(zero).is_err());

        let empty: Cart = serde_json::from_value(json!([])).unwrap();
        assert!(empty.is_empty());
    }
}
