use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::utils::de;

/// Dashboard overview from `/admin/stats.php`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub counts: StatCounts,
    #[serde(default)]
    pub latest_products: Vec<LatestProduct>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatCounts {
    #[serde(default, deserialize_with = "de::opt_int")]
    pub products_active: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub products_total: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub categories: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub subcategories: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub brands: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub tags: Option<i64>,
}

impl StatCounts {
    /// Label/value pairs in dashboard order.
    pub fn entries(&self) -> [(&'static str, Option<i64>); 6] {
        [
            ("Products (active)", self.products_active),
            ("Products (total)", self.products_total),
            ("Categories", self.categories),
            ("Subcategories", self.subcategories),
            ("Brands", self.brands),
            ("Tags", self.tags),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestProduct {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "de::decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
}
