use serde_json::{Value, json};

use crate::{
    client::{FileUpload, MultipartForm, RequestBody},
    error::Result,
    forms::{FieldErrors, FormMode, flag, non_empty},
    models::{ProductImage, ProductSpecification},
};

/// Where a new product image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    File(FileUpload),
    Url(String),
}

#[derive(Debug, Clone, Default)]
pub struct ProductImageForm {
    pub product_id: Option<i64>,
    pub source: Option<ImageSource>,
    pub display_order: i64,
    pub is_primary: bool,
}

impl From<&ProductImage> for ProductImageForm {
    fn from(image: &ProductImage) -> Self {
        Self {
            product_id: Some(image.product_id),
            source: None,
            display_order: image.display_order.unwrap_or(0),
            is_primary: image.is_primary,
        }
    }
}

fn is_valid_url(raw: &str) -> bool {
    reqwest::Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

impl ProductImageForm {
    pub fn validate(&self, mode: FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.product_id.is_none() {
            errors.add("product_id", "Product is required");
        }
        if mode == FormMode::Create {
            match &self.source {
                None => errors.add("image", "Image file or URL is required"),
                Some(ImageSource::Url(url)) if url.trim().is_empty() => {
                    errors.add("image_url", "Image URL is required")
                }
                Some(ImageSource::Url(url)) if !is_valid_url(url.trim()) => {
                    errors.add("image_url", "Please enter a valid URL")
                }
                Some(_) => {}
            }
        }
        if self.display_order < 0 {
            errors.add("display_order", "Display order cannot be negative");
        }

        errors
    }

    /// Edits send only the ordering fields; new images are multipart when a
    /// file is attached and JSON when pointing at a URL.
    pub fn into_body(self, mode: FormMode) -> Result<RequestBody> {
        self.validate(mode).into_result()?;

        if mode == FormMode::Edit {
            return Ok(RequestBody::Json(json!({
                "display_order": self.display_order,
                "is_primary": self.is_primary,
            })));
        }

        match self.source {
            Some(ImageSource::File(upload)) => {
                let mut form = MultipartForm::new();
                if let Some(product_id) = self.product_id {
                    form.push_text("product_id", product_id);
                }
                form.push_text("display_order", self.display_order);
                form.push_text("is_primary", flag(self.is_primary));
                form.push_file("image", upload);
                Ok(RequestBody::Multipart(form))
            }
            Some(ImageSource::Url(url)) => Ok(RequestBody::Json(json!({
                "product_id": self.product_id,
                "display_order": self.display_order,
                "is_primary": self.is_primary,
                "image_url": url.trim(),
            }))),
            None => Ok(RequestBody::Empty),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductSpecificationForm {
    pub product_id: Option<i64>,
    pub spec_name: String,
    pub spec_value: String,
    pub spec_group: Option<String>,
    /// Raw input; must parse as an integer when given.
    pub display_order: Option<String>,
}

impl From<&ProductSpecification> for ProductSpecificationForm {
    fn from(spec: &ProductSpecification) -> Self {
        Self {
            product_id: Some(spec.product_id),
            spec_name: spec.spec_name.clone(),
            spec_value: spec.spec_value.clone(),
            spec_group: spec.spec_group.clone(),
            display_order: spec.display_order.map(|order| order.to_string()),
        }
    }
}

impl ProductSpecificationForm {
    fn parsed_order(&self) -> Option<std::result::Result<i64, std::num::ParseIntError>> {
        non_empty(self.display_order.as_deref()).map(str::parse::<i64>)
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.product_id.is_none() {
            errors.add("product_id", "Product is required");
        }
        if self.spec_name.trim().is_empty() {
            errors.add("spec_name", "Specification name is required");
        }
        if self.spec_value.trim().is_empty() {
            errors.add("spec_value", "Specification value is required");
        }
        if matches!(self.parsed_order(), Some(Err(_))) {
            errors.add("display_order", "Display order must be a number");
        }

        errors
    }

    pub fn into_body(self) -> Result<RequestBody> {
        self.validate().into_result()?;

        let mut body = json!({
            "product_id": self.product_id,
            "spec_name": self.spec_name.trim(),
            "spec_value": self.spec_value.trim(),
            "spec_group": non_empty(self.spec_group.as_deref()),
        });
        if let Some(Ok(order)) = self.parsed_order() {
            body["display_order"] = Value::from(order);
        }
        Ok(RequestBody::Json(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_needs_a_source() {
        let form = ProductImageForm {
            product_id: Some(3),
            ..Default::default()
        };
        assert!(form.validate(FormMode::Create).contains("image"));
        assert!(form.validate(FormMode::Edit).is_empty());

        let form = ProductImageForm {
            product_id: Some(3),
            source: Some(ImageSource::Url("not a url".into())),
            display_order: -1,
            ..Default::default()
        };
        let errors = form.validate(FormMode::Create);
        assert_eq!(errors.get("image_url"), Some("Please enter a valid URL"));
        assert_eq!(errors.get("display_order"), Some("Display order cannot be negative"));
    }

    #[test]
    fn image_bodies_by_mode() {
        let url_form = ProductImageForm {
            product_id: Some(3),
            source: Some(ImageSource::Url("https://cdn.test/a.jpg".into())),
            display_order: 2,
            is_primary: true,
        };

        let RequestBody::Json(body) = url_form.clone().into_body(FormMode::Create).unwrap() else {
            panic!("expected json body");
        };
        assert_eq!(body["image_url"], "https://cdn.test/a.jpg");
        assert_eq!(body["product_id"], 3);

        let RequestBody::Json(body) = url_form.into_body(FormMode::Edit).unwrap() else {
            panic!("expected json body");
        };
        assert_eq!(body, json!({ "display_order": 2, "is_primary": true }));

        let file_form = ProductImageForm {
            product_id: Some(3),
            source: Some(ImageSource::File(FileUpload {
                file_name: "a.jpg".into(),
                content_type: "image/jpeg".into(),
                bytes: vec![1],
            })),
            ..Default::default()
        };
        let RequestBody::Multipart(form) = file_form.into_body(FormMode::Create).unwrap() else {
            panic!("expected multipart body");
        };
        assert!(form.has_file("image"));
        assert_eq!(form.text_value("is_primary"), Some("0"));
    }

    #[test]
    fn specification_order_must_be_numeric() {
        let form = ProductSpecificationForm {
            product_id: Some(1),
            spec_name: "Sensor".into(),
            spec_value: "Full frame".into(),
            spec_group: None,
            display_order: Some("first".into()),
        };
        assert_eq!(
            form.validate().get("display_order"),
            Some("Display order must be a number")
        );

        let form = ProductSpecificationForm {
            display_order: Some(" 4 ".into()),
            ..form
        };
        let RequestBody::Json(body) = form.into_body().unwrap() else {
            panic!("expected json body");
        };
        assert_eq!(body["display_order"], 4);
        assert_eq!(body["spec_group"], Value::Null);
    }
}
