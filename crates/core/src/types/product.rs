//! Catalog products as carried in the cart, and stock lookups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;

/// Keys owned by [`Product`] itself and never stored in its opaque fields.
const RESERVED_KEYS: &[&str] = &["id", "amount"];

/// A cart line item: a catalog product plus the quantity held in the cart.
///
/// Catalog fields other than `id` (title, price, image, ...) are opaque to
/// the cart. They are captured as-is and written back unchanged, so a
/// product survives a storage round-trip with every field intact.
///
/// ## Wire format
///
/// ```json
/// { "id": 1, "title": "Tênis", "price": 179.9, "amount": 2 }
/// ```
///
/// A catalog record without `amount` deserializes with `amount == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    #[serde(flatten)]
    fields: Map<String, Value>,
    /// Quantity held in the cart.
    #[serde(default)]
    pub amount: u32,
}

impl Product {
    /// Create a product with no catalog fields.
    #[must_use]
    pub fn new(id: ProductId, amount: u32) -> Self {
        Self {
            id,
            fields: Map::new(),
            amount,
        }
    }

    /// Builder-style setter for an opaque catalog field.
    ///
    /// `id` and `amount` are typed fields and are ignored here.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !RESERVED_KEYS.contains(&key.as_str()) {
            self.fields.insert(key, value.into());
        }
        self
    }

    /// Look up an opaque catalog field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All opaque catalog fields.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Copy of this product with a different quantity.
    #[must_use]
    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }
}

/// Result of a stock lookup: the maximum purchasable quantity right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Whether `requested` units can be held in the cart.
    #[must_use]
    pub fn covers(&self, requested: u64) -> bool {
        requested <= u64::from(self.amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_record_without_amount() {
        let product: Product =
            serde_json::from_value(json!({"id": 3, "title": "Sneaker", "price": 139.9})).unwrap();

        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.amount, 0);
        assert_eq!(product.field("title"), Some(&json!("Sneaker")));
        assert_eq!(product.fields().len(), 2);
    }

    #[test]
    fn test_fields_survive_serialization() {
        let product = Product::new(ProductId::new(1), 2)
            .with_field("title", "X")
            .with_field("image", json!({"url": "https://cdn/x.png"}));

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(
            value,
            json!({"id": 1, "title": "X", "image": {"url": "https://cdn/x.png"}, "amount": 2})
        );

        let back: Product = serde_json::from_value(value).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_fields_keep_catalog_order() {
        let raw = r#"{"id":1,"title":"X","price":179.9,"image":"x.jpg"}"#;
        let product: Product = serde_json::from_str(raw).unwrap();

        let keys: Vec<_> = product.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, ["title", "price", "image"]);
        assert_eq!(
            serde_json::to_string(&product.with_amount(1)).unwrap(),
            r#"{"id":1,"title":"X","price":179.9,"image":"x.jpg","amount":1}"#
        );
    }

    #[test]
    fn test_with_field_ignores_reserved_keys() {
        let product = Product::new(ProductId::new(1), 1)
            .with_field("id", 99)
            .with_field("amount", 99);

        assert!(product.fields().is_empty());
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.amount, 1);
    }

    #[test]
    fn test_with_amount_keeps_fields() {
        let product = Product::new(ProductId::new(1), 1).with_field("title", "X");
        let bumped = product.with_amount(4);

        assert_eq!(bumped.amount, 4);
        assert_eq!(bumped.field("title"), Some(&json!("X")));
    }

    #[test]
    fn test_stock_covers() {
        let stock = Stock {
            id: ProductId::new(1),
            amount: 5,
        };
        assert!(stock.covers(5));
        assert!(!stock.covers(6));
        assert!(stock.covers(0));
    }
}
