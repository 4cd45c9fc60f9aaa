use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::utils::de;

#[derive(Debug, Clone, Deserialize)]
pub struct ProductImage {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    #[serde(deserialize_with = "de::int")]
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_full_url: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub display_order: Option<i64>,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_primary: bool,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
}

impl ProductImage {
    /// Absolute URL when the API provides one, else the stored path.
    pub fn display_url(&self) -> &str {
        self.image_full_url.as_deref().unwrap_or(&self.image_url)
    }
}
