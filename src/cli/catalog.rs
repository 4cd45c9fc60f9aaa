use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::{
    app::AdminApp,
    cli::{
        ListArgs,
        output::{self, Mutation, Table},
    },
    client::FileUpload,
    error::Result,
    forms::{BrandForm, CategoryForm, ProductForm, SubcategoryForm},
    models::{Brand, Category, Product, ProductType, Subcategory},
    pricing,
    services::product_service,
};

pub(crate) fn flag_filter(on: bool) -> Option<String> {
    on.then(|| "1".to_string())
}

fn upload(path: Option<PathBuf>) -> Result<Option<FileUpload>> {
    path.map(FileUpload::from_path).transpose()
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        subcategory: Option<i64>,
        #[arg(long)]
        featured: bool,
        #[arg(long)]
        active: bool,
        /// Include the server's discounted prices.
        #[arg(long)]
        with_discounts: bool,
    },
    Get {
        id: i64,
    },
    Create(ProductFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: ProductFields,
    },
    Delete {
        id: i64,
    },
    /// Price after the first discount that applies to the product.
    Price {
        id: i64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ProductFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    sku: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    short_description: Option<String>,
    #[arg(long)]
    price: Option<Decimal>,
    #[arg(long)]
    discount_price: Option<Decimal>,
    #[arg(long = "type")]
    product_type: Option<ProductType>,
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    subcategory: Option<i64>,
    #[arg(long)]
    featured: Option<bool>,
    #[arg(long)]
    active: Option<bool>,
    #[arg(long)]
    meta_title: Option<String>,
    #[arg(long)]
    meta_description: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    /// Image file to upload.
    #[arg(long)]
    image: Option<PathBuf>,
}

impl ProductFields {
    fn apply(self, form: &mut ProductForm) -> Result<()> {
        if let Some(name) = self.name {
            form.name = name;
        }
        form.model = self.model.or(form.model.take());
        form.slug = self.slug.or(form.slug.take());
        form.sku = self.sku.or(form.sku.take());
        form.description = self.description.or(form.description.take());
        form.short_description = self.short_description.or(form.short_description.take());
        form.price = self.price.or(form.price);
        form.discount_price = self.discount_price.or(form.discount_price);
        form.product_type = self.product_type.unwrap_or(form.product_type);
        form.brand = self.brand.or(form.brand.take());
        form.subcategory_id = self.subcategory.or(form.subcategory_id);
        form.is_featured = self.featured.unwrap_or(form.is_featured);
        form.is_active = self.active.unwrap_or(form.is_active);
        form.meta_title = self.meta_title.or(form.meta_title.take());
        form.meta_description = self.meta_description.or(form.meta_description.take());
        form.image_url = self.image_url.or(form.image_url.take());
        form.image = upload(self.image)?;
        Ok(())
    }
}

pub async fn products(app: &AdminApp, command: ProductCommand) -> Result<()> {
    match command {
        ProductCommand::List {
            list,
            category,
            subcategory,
            featured,
            active,
            with_discounts,
        } => {
            let params = list.to_params(
                app,
                vec![
                    ("category_id", category.map(|id| id.to_string())),
                    ("subcategory_id", subcategory.map(|id| id.to_string())),
                    ("is_featured", flag_filter(featured)),
                    ("is_active", flag_filter(active)),
                ],
            );

            if with_discounts {
                let page = product_service::with_discounts(app.client(), &params)
                    .await
                    .map_err(|e| output::with_fallback(e, "Failed to load products"))?;
                let mut table = Table::new(&["ID", "Name", "Price", "Final price", "Discount"]);
                for item in &page.data {
                    table.row(vec![
                        item.product.id.to_string(),
                        item.product.name.clone(),
                        output::money(item.product.price),
                        output::money(item.final_price.unwrap_or(item.product.price)),
                        output::yes_no(item.has_discount),
                    ]);
                }
                output::print_page(&page, &table, &params, app.page_size(), "products");
                return Ok(());
            }

            let page = app
                .list::<Product>(&params)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load products"))?;
            let mut table =
                Table::new(&["ID", "Name", "Brand", "Category", "Price", "Featured", "Status"]);
            for product in &page.data {
                table.row(vec![
                    product.id.to_string(),
                    product.name.clone(),
                    output::opt(product.brand.as_deref()),
                    output::opt(
                        product
                            .subcategory_name
                            .as_deref()
                            .or(product.category_name.as_deref()),
                    ),
                    output::money(product.price),
                    output::yes_no(product.is_featured),
                    output::active_label(product.is_active),
                ]);
            }
            output::print_page(&page, &table, &params, app.page_size(), "products");
            Ok(())
        }
        ProductCommand::Get { id } => {
            let product = app
                .get::<Product>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load product"))?;
            output::print_details(&[
                ("ID", product.id.to_string()),
                ("Name", product.name.clone()),
                ("Model", output::opt(product.model.as_deref())),
                ("Slug", output::opt(product.slug.as_deref())),
                ("SKU", output::opt(product.sku.as_deref())),
                ("Type", product.product_type.label().to_string()),
                ("Brand", output::opt(product.brand.as_deref())),
                ("Category", output::opt(product.category_name.as_deref())),
                ("Subcategory", output::opt(product.subcategory_name.as_deref())),
                ("Price", output::money(product.price)),
                ("Discount price", output::opt(product.discount_price.map(output::money))),
                ("Featured", output::yes_no(product.is_featured)),
                ("Status", output::active_label(product.is_active)),
                ("Meta title", output::opt(product.meta_title.as_deref())),
                ("Image", output::opt(product.image_url.as_deref())),
            ]);
            Ok(())
        }
        ProductCommand::Create(fields) => {
            let mut form = ProductForm::default();
            fields.apply(&mut form)?;
            let body = form.into_body()?;
            output::report(app.create::<Product>(body).await, "Product", Mutation::Create)
        }
        ProductCommand::Update { id, fields } => {
            let existing = app
                .get::<Product>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load product"))?;
            let mut form = ProductForm::from(&existing);
            fields.apply(&mut form)?;
            let body = form.into_body()?;
            output::report(app.update::<Product>(id, body).await, "Product", Mutation::Update)
        }
        ProductCommand::Delete { id } => {
            output::report(app.delete::<Product>(id).await, "Product", Mutation::Delete)
        }
        ProductCommand::Price { id } => {
            let product = app
                .get::<Product>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load product"))?;
            let breakdown = pricing::product_discount(app.client(), id, product.price)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load discounts"))?;

            match breakdown {
                Some(price) => output::print_details(&[
                    ("Product", product.name.clone()),
                    ("Original", output::money(price.original)),
                    ("Final", output::money(price.final_price)),
                    ("You save", output::money(price.savings)),
                    ("Off", format!("-{}%", price.percent_off)),
                    ("Discount", price.discount_name.clone()),
                    ("Applies at", format!("{} level", price.target_type)),
                ]),
                None => println!("No discount for {}.", product.name),
            }
            Ok(())
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        active: bool,
    },
    Get {
        id: i64,
    },
    Create(CategoryFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: CategoryFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct CategoryFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long)]
    active: Option<bool>,
    #[arg(long)]
    image: Option<PathBuf>,
}

impl CategoryFields {
    fn apply(self, form: &mut CategoryForm) -> Result<()> {
        if let Some(name) = self.name {
            form.name = name;
        }
        form.slug = self.slug.or(form.slug.take());
        form.image_url = self.image_url.or(form.image_url.take());
        form.is_active = self.active.unwrap_or(form.is_active);
        form.image = upload(self.image)?;
        Ok(())
    }
}

pub async fn categories(app: &AdminApp, command: CategoryCommand) -> Result<()> {
    match command {
        CategoryCommand::List { list, active } => {
            let params = list.to_params(app, vec![("is_active", flag_filter(active))]);
            let page = app
                .list::<Category>(&params)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load categories"))?;
            let mut table = Table::new(&["ID", "Name", "Slug", "Subcategories", "Status"]);
            for category in &page.data {
                table.row(vec![
                    category.id.to_string(),
                    category.name.clone(),
                    output::opt(category.slug.as_deref()),
                    output::opt(category.subcategory_count),
                    output::active_label(category.is_active),
                ]);
            }
            output::print_page(&page, &table, &params, app.page_size(), "categories");
            Ok(())
        }
        CategoryCommand::Get { id } => {
            let category = app
                .get::<Category>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load category"))?;
            output::print_details(&[
                ("ID", category.id.to_string()),
                ("Name", category.name.clone()),
                ("Slug", output::opt(category.slug.as_deref())),
                ("Image", output::opt(category.image.as_deref())),
                ("Status", output::active_label(category.is_active)),
            ]);
            Ok(())
        }
        CategoryCommand::Create(fields) => {
            let mut form = CategoryForm::default();
            fields.apply(&mut form)?;
            let body = form.into_body()?;
            output::report(app.create::<Category>(body).await, "Category", Mutation::Create)
        }
        CategoryCommand::Update { id, fields } => {
            let existing = app
                .get::<Category>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load category"))?;
            let mut form = CategoryForm::from(&existing);
            fields.apply(&mut form)?;
            let body = form.into_body()?;
            output::report(app.update::<Category>(id, body).await, "Category", Mutation::Update)
        }
        CategoryCommand::Delete { id } => {
            output::report(app.delete::<Category>(id).await, "Category", Mutation::Delete)
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum SubcategoryCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        active: bool,
    },
    Get {
        id: i64,
    },
    Create(SubcategoryFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: SubcategoryFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SubcategoryFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    category: Option<i64>,
    #[arg(long = "type")]
    product_type: Option<ProductType>,
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long)]
    active: Option<bool>,
    #[arg(long)]
    image: Option<PathBuf>,
}

impl SubcategoryFields {
    fn apply(self, form: &mut SubcategoryForm) -> Result<()> {
        if let Some(name) = self.name {
            form.name = name;
        }
        form.slug = self.slug.or(form.slug.take());
        form.category_id = self.category.or(form.category_id);
        form.product_type = self.product_type.unwrap_or(form.product_type);
        form.image_url = self.image_url.or(form.image_url.take());
        form.is_active = self.active.unwrap_or(form.is_active);
        form.image = upload(self.image)?;
        Ok(())
    }
}

pub async fn subcategories(app: &AdminApp, command: SubcategoryCommand) -> Result<()> {
    match command {
        SubcategoryCommand::List {
            list,
            category,
            active,
        } => {
            let params = list.to_params(
                app,
                vec![
                    ("category_id", category.map(|id| id.to_string())),
                    ("is_active", flag_filter(active)),
                ],
            );
            let page = app
                .list::<Subcategory>(&params)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load subcategories"))?;
            let mut table = Table::new(&["ID", "Name", "Category", "Type", "Status"]);
            for subcategory in &page.data {
                table.row(vec![
                    subcategory.id.to_string(),
                    subcategory.name.clone(),
                    output::opt(subcategory.category_name.as_deref()),
                    subcategory.product_type.to_string(),
                    output::active_label(subcategory.is_active),
                ]);
            }
            output::print_page(&page, &table, &params, app.page_size(), "subcategories");
            Ok(())
        }
        SubcategoryCommand::Get { id } => {
            let subcategory = app
                .get::<Subcategory>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load subcategory"))?;
            output::print_details(&[
                ("ID", subcategory.id.to_string()),
                ("Name", subcategory.name.clone()),
                ("Slug", output::opt(subcategory.slug.as_deref())),
                ("Category", output::opt(subcategory.category_name.as_deref())),
                ("Type", subcategory.product_type.label().to_string()),
                ("Image", output::opt(subcategory.image_url.as_deref())),
                ("Status", output::active_label(subcategory.is_active)),
            ]);
            Ok(())
        }
        SubcategoryCommand::Create(fields) => {
            let mut form = SubcategoryForm::default();
            fields.apply(&mut form)?;
            let body = form.into_body()?;
            output::report(app.create::<Subcategory>(body).await, "Subcategory", Mutation::Create)
        }
        SubcategoryCommand::Update { id, fields } => {
            let existing = app
                .get::<Subcategory>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load subcategory"))?;
            let mut form = SubcategoryForm::from(&existing);
            fields.apply(&mut form)?;
            let body = form.into_body()?;
            output::report(
                app.update::<Subcategory>(id, body).await,
                "Subcategory",
                Mutation::Update,
            )
        }
        SubcategoryCommand::Delete { id } => {
            output::report(app.delete::<Subcategory>(id).await, "Subcategory", Mutation::Delete)
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum BrandCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        featured: bool,
        #[arg(long)]
        active: bool,
    },
    Get {
        id: i64,
    },
    Create(BrandFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: BrandFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct BrandFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    logo_url: Option<String>,
    #[arg(long)]
    active: Option<bool>,
    #[arg(long)]
    featured: Option<bool>,
    /// Logo file to upload.
    #[arg(long)]
    logo: Option<PathBuf>,
}

impl BrandFields {
    fn apply(self, form: &mut BrandForm) -> Result<()> {
        if let Some(name) = self.name {
            form.name = name;
        }
        form.slug = self.slug.or(form.slug.take());
        form.description = self.description.or(form.description.take());
        form.logo_url = self.logo_url.or(form.logo_url.take());
        form.is_active = self.active.unwrap_or(form.is_active);
        form.is_featured = self.featured.unwrap_or(form.is_featured);
        form.logo = upload(self.logo)?;
        Ok(())
    }
}

pub async fn brands(app: &AdminApp, command: BrandCommand) -> Result<()> {
    match command {
        BrandCommand::List {
            list,
            featured,
            active,
        } => {
            let params = list.to_params(
                app,
                vec![
                    ("is_featured", flag_filter(featured)),
                    ("is_active", flag_filter(active)),
                ],
            );
            let page = app
                .list::<Brand>(&params)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load brands"))?;
            let mut table = Table::new(&["ID", "Name", "Slug", "Featured", "Status"]);
            for brand in &page.data {
                table.row(vec![
                    brand.id.to_string(),
                    brand.name.clone(),
                    output::opt(brand.slug.as_deref()),
                    output::yes_no(brand.is_featured),
                    output::active_label(brand.is_active),
                ]);
            }
            output::print_page(&page, &table, &params, app.page_size(), "brands");
            Ok(())
        }
        BrandCommand::Get { id } => {
            let brand = app
                .get::<Brand>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load brand"))?;
            output::print_details(&[
                ("ID", brand.id.to_string()),
                ("Name", brand.name.clone()),
                ("Slug", output::opt(brand.slug.as_deref())),
                ("Description", output::opt(brand.description.as_deref())),
                ("Logo", output::opt(brand.logo_url.as_deref())),
                ("Featured", output::yes_no(brand.is_featured)),
                ("Status", output::active_label(brand.is_active)),
            ]);
            Ok(())
        }
        BrandCommand::Create(fields) => {
            let mut form = BrandForm::default();
            fields.apply(&mut form)?;
            let body = form.into_body()?;
            output::report(app.create::<Brand>(body).await, "Brand", Mutation::Create)
        }
        BrandCommand::Update { id, fields } => {
            let existing = app
                .get::<Brand>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load brand"))?;
            let mut form = BrandForm::from(&existing);
            fields.apply(&mut form)?;
            let body = form.into_body()?;
            output::report(app.update::<Brand>(id, body).await, "Brand", Mutation::Update)
        }
        BrandCommand::Delete { id } => {
            output::report(app.delete::<Brand>(id).await, "Brand", Mutation::Delete)
        }
    }
}
