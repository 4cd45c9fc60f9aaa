use rust_decimal::Decimal;

use crate::{
    client::{FileUpload, MultipartForm, RequestBody},
    error::Result,
    forms::{FieldErrors, flag, non_empty},
    models::{Product, ProductType},
};

#[derive(Debug, Clone)]
pub struct ProductForm {
    pub name: String,
    pub model: Option<String>,
    pub slug: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: Option<Decimal>,
    pub discount_price: Option<Decimal>,
    pub product_type: ProductType,
    pub brand: Option<String>,
    pub subcategory_id: Option<i64>,
    pub is_featured: bool,
    pub is_active: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub image_url: Option<String>,
    pub image: Option<FileUpload>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            model: None,
            slug: None,
            sku: None,
            description: None,
            short_description: None,
            price: None,
            discount_price: None,
            product_type: ProductType::Both,
            brand: None,
            subcategory_id: None,
            is_featured: false,
            is_active: true,
            meta_title: None,
            meta_description: None,
            image_url: None,
            image: None,
        }
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            model: product.model.clone(),
            slug: product.slug.clone(),
            sku: product.sku.clone(),
            description: product.description.clone(),
            short_description: product.short_description.clone(),
            price: Some(product.price),
            discount_price: product.discount_price,
            product_type: product.product_type,
            brand: product.brand.clone(),
            subcategory_id: product.subcategory_id,
            is_featured: product.is_featured,
            is_active: product.is_active,
            meta_title: product.meta_title.clone(),
            meta_description: product.meta_description.clone(),
            image_url: product.image_url.clone(),
            image: None,
        }
    }
}

/// SEO title and description derived from the product name and type.
pub fn meta_fields(name: &str, product_type: ProductType) -> (String, String) {
    let name = name.trim();
    let title = format!("{} - High Quality {} Equipment", name, product_type.label());
    let description = format!(
        "Discover {} - Premium {} equipment with excellent quality and competitive pricing. \
         Perfect for professional and amateur photographers.",
        name,
        product_type.as_str()
    );
    (title, description)
}

impl ProductForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", "Product name is required");
        }
        if self.subcategory_id.is_none() {
            errors.add("subcategory_id", "Subcategory is required");
        }
        match self.price {
            None => errors.add("price", "Price is required"),
            Some(price) if price.is_sign_negative() => {
                errors.add("price", "Price cannot be negative")
            }
            Some(_) => {}
        }
        if self.discount_price.is_some_and(|p| p.is_sign_negative()) {
            errors.add("discount_price", "Discount price cannot be negative");
        }

        errors
    }

    /// Multipart body with every non-empty field, plus the `image` file when set.
    pub fn into_body(self) -> Result<RequestBody> {
        self.validate().into_result()?;

        let (generated_title, generated_description) = meta_fields(&self.name, self.product_type);
        let meta_title = non_empty(self.meta_title.as_deref())
            .map(str::to_string)
            .unwrap_or(generated_title);
        let meta_description = non_empty(self.meta_description.as_deref())
            .map(str::to_string)
            .unwrap_or(generated_description);

        let mut form = MultipartForm::new().text("name", self.name.trim());
        let optional = [
            ("model", self.model.as_deref()),
            ("slug", self.slug.as_deref()),
            ("sku", self.sku.as_deref()),
            ("description", self.description.as_deref()),
            ("short_description", self.short_description.as_deref()),
            ("brand", self.brand.as_deref()),
            ("image_url", self.image_url.as_deref()),
        ];
        for (field, value) in optional {
            if let Some(value) = non_empty(value) {
                form.push_text(field, value);
            }
        }

        if let Some(price) = self.price {
            form.push_text("price", price);
        }
        if let Some(discount_price) = self.discount_price {
            form.push_text("discount_price", discount_price);
        }
        if let Some(subcategory_id) = self.subcategory_id {
            form.push_text("subcategory_id", subcategory_id);
        }
        form.push_text("type", self.product_type);
        form.push_text("is_featured", flag(self.is_featured));
        form.push_text("is_active", flag(self.is_active));
        form.push_text("meta_title", meta_title);
        form.push_text("meta_description", meta_description);

        if let Some(image) = self.image {
            form.push_file("image", image);
        }

        Ok(RequestBody::Multipart(form))
    }
}
