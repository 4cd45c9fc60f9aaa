use serde_json::json;

use crate::{
    client::RequestBody,
    error::Result,
    forms::{FieldErrors, non_empty},
    models::{DEFAULT_TAG_COLOR, ProductTag, Tag},
    utils::slugify,
};

#[derive(Debug, Clone, Default)]
pub struct TagForm {
    pub name: String,
    pub slug: Option<String>,
    pub color: Option<String>,
}

impl From<&Tag> for TagForm {
    fn from(tag: &Tag) -> Self {
        Self {
            name: tag.name.clone(),
            slug: tag.slug.clone(),
            color: tag.color.clone(),
        }
    }
}

impl TagForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "Tag name is required");
        }
        errors
    }

    /// JSON body; the slug falls back to one built from the name.
    pub fn into_body(self) -> Result<RequestBody> {
        self.validate().into_result()?;

        let name = self.name.trim();
        let slug = non_empty(self.slug.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| slugify(name));
        let color = non_empty(self.color.as_deref()).unwrap_or(DEFAULT_TAG_COLOR);

        Ok(RequestBody::Json(json!({
            "name": name,
            "slug": slug,
            "color": color,
        })))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductTagForm {
    pub product_id: Option<i64>,
    pub tag_id: Option<i64>,
}

impl From<&ProductTag> for ProductTagForm {
    fn from(link: &ProductTag) -> Self {
        Self {
            product_id: Some(link.product_id),
            tag_id: Some(link.tag_id),
        }
    }
}

impl ProductTagForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.product_id.is_none() {
            errors.add("product_id", "Product is required");
        }
        if self.tag_id.is_none() {
            errors.add("tag_id", "Tag is required");
        }
        errors
    }

    pub fn into_body(self) -> Result<RequestBody> {
        self.validate().into_result()?;
        Ok(RequestBody::Json(json!({
            "product_id": self.product_id,
            "tag_id": self.tag_id,
        })))
    }
}
