use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::utils::de;

pub const DEFAULT_TAG_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub usage_count: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
}

/// Link between a product and a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductTag {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    #[serde(deserialize_with = "de::int")]
    pub product_id: i64,
    #[serde(deserialize_with = "de::int")]
    pub tag_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub tag_color: Option<String>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
}
