use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::utils::de;

/// One page of a list endpoint.
///
/// The API is inconsistent about where it reports totals: some endpoints
/// send `pagination.pages`, others `pagination.total_pages`, others only a
/// top-level `total`. The accessors below normalise all of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "vec_or_null")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub total: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default, deserialize_with = "de::opt_int")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub total: Option<i64>,
    #[serde(default, alias = "total_pages", deserialize_with = "de::opt_int")]
    pub pages: Option<i64>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            pagination: None,
            total: None,
        }
    }

    pub fn total(&self) -> u64 {
        self.pagination
            .as_ref()
            .and_then(|p| p.total)
            .or(self.total)
            .map(|t| t.max(0) as u64)
            .unwrap_or(self.data.len() as u64)
    }

    /// Number of pages, never less than one.
    pub fn total_pages(&self, limit: u32) -> u64 {
        if let Some(pages) = self.pagination.as_ref().and_then(|p| p.pages) {
            return pages.max(1) as u64;
        }
        let limit = u64::from(limit.max(1));
        self.total().div_ceil(limit).max(1)
    }

    /// 1-based inclusive range of rows shown on `page`, `(0, 0)` when empty.
    pub fn shown_range(&self, page: u32, limit: u32) -> (u64, u64) {
        let total = self.total();
        if total == 0 {
            return (0, 0);
        }
        let page = u64::from(page.max(1));
        let limit = u64::from(limit.max(1));
        let from = (page - 1) * limit + 1;
        let to = (page * limit).min(total);
        (from.min(total), to)
    }
}

/// Generic acknowledgement returned by create/update/delete endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default, deserialize_with = "de::flag")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub id: Option<i64>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ApiMessage {
    /// Id of the created record, from `id` or `data.id`.
    pub fn created_id(&self) -> Option<i64> {
        self.id.or_else(|| {
            self.data
                .as_ref()
                .and_then(|d| d.get("id"))
                .and_then(|id| match id {
                    Value::Number(n) => n.as_i64(),
                    Value::String(s) => s.parse().ok(),
                    _ => None,
                })
        })
    }
}

fn vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_pages_from_pagination_block() {
        let page: Page<Value> = serde_json::from_value(json!({
            "data": [{"id": 1}, {"id": 2}],
            "pagination": {"page": 1, "limit": 2, "total": "9", "total_pages": 5}
        }))
        .unwrap();

        assert_eq!(page.total(), 9);
        assert_eq!(page.total_pages(2), 5);
        assert_eq!(page.shown_range(1, 2), (1, 2));
    }

    #[test]
    fn derives_pages_from_top_level_total() {
        let page: Page<Value> = serde_json::from_value(json!({
            "data": [{"id": 1}],
            "total": 21
        }))
        .unwrap();

        assert_eq!(page.total_pages(10), 3);
        assert_eq!(page.shown_range(3, 10), (21, 21));
    }

    #[test]
    fn null_data_is_an_empty_page() {
        let page: Page<Value> = serde_json::from_value(json!({ "data": null })).unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total_pages(20), 1);
        assert_eq!(page.shown_range(1, 20), (0, 0));
    }

    #[test]
    fn created_id_falls_back_to_data() {
        let msg: ApiMessage = serde_json::from_value(json!({
            "success": 1,
            "data": {"id": "31"}
        }))
        .unwrap();

        assert!(msg.success);
        assert_eq!(msg.created_id(), Some(31));
    }
}
