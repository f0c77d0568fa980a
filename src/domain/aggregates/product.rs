//! Product Aggregate

use crate::domain::value_objects::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Catalog product as shown by the storefront. Cart items keep a copy of it,
/// so later catalog edits never reach items already in a cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default)]
    pub is_promotion: bool,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, category: impl Into<String>, price: Money) -> Self {
        Self {
            id, name: name.into(), category: category.into(), price, original_price: None,
            sku: String::new(), image_url: String::new(), images: vec![], description: String::new(),
            short_description: None, is_promotion: false,
        }
    }

    pub fn with_promotion(mut self, original_price: Option<Money>) -> Self {
        self.is_promotion = true;
        self.original_price = original_price;
        self
    }

    pub fn unit_price(&self) -> Decimal { self.price.amount() }
}

/// Product payload for create and update; the id is assigned by the store.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(custom = "non_negative")]
    pub price: Money,
    #[serde(default)]
    pub original_price: Option<Money>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub is_promotion: bool,
}

impl NewProduct {
    pub fn into_product(self, id: i64) -> Product {
        let images = if self.images.is_empty() && !self.image_url.is_empty() { vec![self.image_url.clone()] } else { self.images };
        Product {
            id, name: self.name, category: self.category, price: self.price, original_price: self.original_price,
            sku: self.sku, image_url: self.image_url, images, description: self.description,
            short_description: self.short_description, is_promotion: self.is_promotion,
        }
    }
}

fn non_negative(price: &Money) -> Result<(), ValidationError> {
    if price.amount().is_sign_negative() && !price.amount().is_zero() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> NewProduct {
        serde_json::from_value(serde_json::json!({
            "name": name, "category": "Lingerie", "price": "R$ 59,90", "imageUrl": "https://cdn/p.jpg"
        })).unwrap()
    }

    #[test]
    fn test_product_wire_format() {
        let p = Product::new(7, "Body Renda", "Lingerie", Money::parse("R$ 1.234,56"));
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["price"], "R$ 1.234,56");
        assert_eq!(json["isPromotion"], false);
        assert!(json.get("originalPrice").is_none());
        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_draft_defaults_gallery_to_cover_image() {
        let p = draft("Kit").into_product(3);
        assert_eq!(p.id, 3);
        assert_eq!(p.images, vec!["https://cdn/p.jpg".to_string()]);
        assert_eq!(p.unit_price(), Decimal::new(5990, 2));
    }

    #[test]
    fn test_draft_validation() {
        assert!(draft("Kit").validate().is_ok());
        assert!(draft("").validate().is_err());
        let mut negative = draft("Kit");
        negative.price = Money::new(Decimal::new(-1, 0));
        assert!(negative.validate().is_err());
    }
}
