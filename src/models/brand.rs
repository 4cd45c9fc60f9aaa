use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::utils::de;

#[derive(Debug, Clone, Deserialize)]
pub struct Brand {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default = "de::default_true", deserialize_with = "de::flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
}
