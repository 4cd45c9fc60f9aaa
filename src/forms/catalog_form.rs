use crate::{
    client::{FileUpload, MultipartForm, RequestBody},
    error::Result,
    forms::{FieldErrors, flag, non_empty},
    models::{Brand, Category, ProductType, Subcategory},
};

#[derive(Debug, Clone)]
pub struct CategoryForm {
    pub name: String,
    pub slug: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub image: Option<FileUpload>,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: None,
            image_url: None,
            is_active: true,
            image: None,
        }
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            image_url: category.image.clone(),
            is_active: category.is_active,
            image: None,
        }
    }
}

impl CategoryForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "Category name is required");
        }
        errors
    }

    pub fn into_body(self) -> Result<RequestBody> {
        self.validate().into_result()?;

        let mut form = MultipartForm::new().text("name", self.name.trim());
        push_optional(&mut form, "slug", self.slug.as_deref());
        push_optional(&mut form, "image_url", self.image_url.as_deref());
        form.push_text("is_active", flag(self.is_active));
        if let Some(image) = self.image {
            form.push_file("image", image);
        }
        Ok(RequestBody::Multipart(form))
    }
}

#[derive(Debug, Clone)]
pub struct SubcategoryForm {
    pub name: String,
    pub slug: Option<String>,
    pub category_id: Option<i64>,
    pub product_type: ProductType,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub image: Option<FileUpload>,
}

impl Default for SubcategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: None,
            category_id: None,
            product_type: ProductType::Both,
            image_url: None,
            is_active: true,
            image: None,
        }
    }
}

impl From<&Subcategory> for SubcategoryForm {
    fn from(subcategory: &Subcategory) -> Self {
        Self {
            name: subcategory.name.clone(),
            slug: subcategory.slug.clone(),
            category_id: subcategory.category_id,
            product_type: subcategory.product_type,
            image_url: subcategory.image_url.clone(),
            is_active: subcategory.is_active,
            image: None,
        }
    }
}

impl SubcategoryForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "Subcategory name is required");
        }
        if self.category_id.is_none() {
            errors.add("category_id", "Category is required");
        }
        errors
    }

    pub fn into_body(self) -> Result<RequestBody> {
        self.validate().into_result()?;

        let mut form = MultipartForm::new().text("name", self.name.trim());
        push_optional(&mut form, "slug", self.slug.as_deref());
        if let Some(category_id) = self.category_id {
            form.push_text("category_id", category_id);
        }
        form.push_text("type", self.product_type);
        push_optional(&mut form, "image_url", self.image_url.as_deref());
        form.push_text("is_active", flag(self.is_active));
        if let Some(image) = self.image {
            form.push_file("image", image);
        }
        Ok(RequestBody::Multipart(form))
    }
}

#[derive(Debug, Clone)]
pub struct BrandForm {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub logo: Option<FileUpload>,
}

impl Default for BrandForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: None,
            description: None,
            logo_url: None,
            is_active: true,
            is_featured: false,
            logo: None,
        }
    }
}

impl From<&Brand> for BrandForm {
    fn from(brand: &Brand) -> Self {
        Self {
            name: brand.name.clone(),
            slug: brand.slug.clone(),
            description: brand.description.clone(),
            logo_url: brand.logo_url.clone(),
            is_active: brand.is_active,
            is_featured: brand.is_featured,
            logo: None,
        }
    }
}

impl BrandForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "Brand name is required");
        }
        errors
    }

    pub fn into_body(self) -> Result<RequestBody> {
        self.validate().into_result()?;

        let mut form = MultipartForm::new().text("name", self.name.trim());
        push_optional(&mut form, "slug", self.slug.as_deref());
        push_optional(&mut form, "description", self.description.as_deref());
        push_optional(&mut form, "logo_url", self.logo_url.as_deref());
        form.push_text("is_active", flag(self.is_active));
        form.push_text("is_featured", flag(self.is_featured));
        if let Some(logo) = self.logo {
            form.push_file("logo", logo);
        }
        Ok(RequestBody::Multipart(form))
    }
}

fn push_optional(form: &mut MultipartForm, field: &str, value: Option<&str>) {
    if let Some(value) = non_empty(value) {
        form.push_text(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_sends_flag_and_file() {
        let form = CategoryForm {
            name: " Lenses ".into(),
            is_active: false,
            image: Some(FileUpload {
                file_name: "lenses.png".into(),
                content_type: "image/png".into(),
                bytes: vec![0; 4],
            }),
            ..Default::default()
        };

        let RequestBody::Multipart(form) = form.into_body().unwrap() else {
            panic!("expected multipart body");
        };
        assert_eq!(form.text_value("name"), Some("Lenses"));
        assert_eq!(form.text_value("is_active"), Some("0"));
        assert_eq!(form.text_value("slug"), None);
        assert!(form.has_file("image"));
    }

    #[test]
    fn subcategory_requires_category() {
        let errors = SubcategoryForm {
            name: "Mirrorless".into(),
            ..Default::default()
        }
        .validate();
        assert_eq!(errors.get("category_id"), Some("Category is required"));
        assert!(!errors.contains("name"));
    }

    #[test]
    fn brand_uses_logo_field() {
        let form = BrandForm {
            name: "Sigma".into(),
            logo_url: Some("https://cdn.test/sigma.svg".into()),
            ..Default::default()
        };
        let RequestBody::Multipart(form) = form.into_body().unwrap() else {
            panic!("expected multipart body");
        };
        assert_eq!(form.text_value("logo_url"), Some("https://cdn.test/sigma.svg"));
        assert_eq!(form.text_value("is_featured"), Some("0"));
        assert!(BrandForm::default().validate().contains("name"));
    }
}
