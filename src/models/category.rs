use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::models::ProductType;
use crate::utils::de;

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, alias = "image_url")]
    pub image: Option<String>,
    #[serde(default = "de::default_true", deserialize_with = "de::flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub subcategory_count: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Subcategory {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default, rename = "type")]
    pub product_type: ProductType,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "de::default_true", deserialize_with = "de::flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
}
