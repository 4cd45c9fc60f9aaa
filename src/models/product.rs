use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::utils::de;

/// Equipment line a product, subcategory or discount applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Photography,
    Videography,
    #[default]
    Both,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Photography => "photography",
            ProductType::Videography => "videography",
            ProductType::Both => "both",
        }
    }

    /// Human label used in generated meta titles.
    pub fn label(&self) -> &'static str {
        match self {
            ProductType::Photography => "Photography",
            ProductType::Videography => "Videography",
            ProductType::Both => "Photography & Videography",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "photography" => Ok(ProductType::Photography),
            "videography" => Ok(ProductType::Videography),
            "both" => Ok(ProductType::Both),
            other => Err(format!(
                "unknown product type `{}` (expected photography, videography or both)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default, deserialize_with = "de::decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub discount_price: Option<Decimal>,
    #[serde(default, rename = "type")]
    pub product_type: ProductType,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub subcategory_id: Option<i64>,
    #[serde(default)]
    pub subcategory_name: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_featured: bool,
    #[serde(default = "de::default_true", deserialize_with = "de::flag")]
    pub is_active: bool,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Product row from `list_with_discounts`, carrying the server's price quote.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountedProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub final_price: Option<Decimal>,
    #[serde(default, deserialize_with = "de::flag")]
    pub has_discount: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_api_row() {
        let product: Product = serde_json::from_value(json!({
            "id": "12",
            "name": "Canon EOS R6",
            "price": "2499.00",
            "discount_price": null,
            "type": "photography",
            "brand": "Canon",
            "subcategory_id": 4,
            "is_featured": "0",
            "is_active": 1,
            "created_at": "2024-05-02 09:15:00"
        }))
        .unwrap();

        assert_eq!(product.id, 12);
        assert_eq!(product.price, Decimal::new(249900, 2));
        assert_eq!(product.product_type, ProductType::Photography);
        assert!(product.is_active);
        assert!(!product.is_featured);
    }

    #[test]
    fn parses_product_type() {
        assert_eq!("Both".parse::<ProductType>(), Ok(ProductType::Both));
        assert!("drone".parse::<ProductType>().is_err());
    }
}
