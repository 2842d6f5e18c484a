use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// A product line offered on the cart page, as loaded from a catalog.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct Product {
    #[serde(deserialize_with = "deserialize_id")]
    #[validate(custom = "validate_id")]
    pub id: String,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
}

/// One checkbox on the page. The `selected` flag belongs to the page; the
/// updater only ever reads it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SelectableItem {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub selected: bool,
}

impl SelectableItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            selected: false,
        }
    }

    pub fn checked(mut self) -> Self {
        self.selected = true;
        self
    }
}

impl From<&Product> for SelectableItem {
    fn from(product: &Product) -> Self {
        SelectableItem::new(product.id.clone(), product.name.clone())
    }
}

// Catalog files written by hand often use numeric ids
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::new("Product id is required"));
    }
    if id.trim() != id {
        return Err(ValidationError::new("Product id must not have surrounding whitespace"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id_is_normalized() {
        let product: Product =
            serde_json::from_str(r#"{"id": 7, "name": "Product G", "price": 12.5}"#).unwrap();
        assert_eq!(product.id, "7");
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_blank_id_is_rejected() {
        let product = Product {
            id: "  ".to_string(),
            name: "Product A".to_string(),
            price: 150.0,
        };
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let product = Product {
            id: "1".to_string(),
            name: "Product A".to_string(),
            price: -1.0,
        };
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_item_from_product_starts_unchecked() {
        let product = Product {
            id: "2".to_string(),
            name: "Product B".to_string(),
            price: 250.0,
        };
        let item = SelectableItem::from(&product);
        assert_eq!(item.id, "2");
        assert_eq!(item.label, "Product B");
        assert!(!item.selected);
    }
}
