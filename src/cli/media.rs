use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::{
    app::AdminApp,
    cli::{
        ListArgs,
        output::{self, Mutation, Table},
    },
    client::FileUpload,
    error::{AppError, Result},
    forms::{FormMode, ImageSource, ProductImageForm, ProductSpecificationForm},
    models::{ProductImage, ProductSpecification, group_specifications},
    services::{
        product_image_service,
        product_specification_service::{self, SpecInput},
    },
};

#[derive(Debug, Subcommand)]
pub enum ImageCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        product: Option<i64>,
    },
    Get {
        id: i64,
    },
    /// Upload a file or register an image URL.
    Add {
        #[arg(long)]
        product: Option<i64>,
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        order: i64,
        #[arg(long)]
        primary: bool,
    },
    /// Change display order or the primary flag.
    Update {
        id: i64,
        #[arg(long, allow_negative_numbers = true)]
        order: Option<i64>,
        #[arg(long)]
        primary: Option<bool>,
    },
    Delete {
        id: i64,
    },
    SetPrimary {
        id: i64,
    },
    /// Assign display order following the given ids.
    Reorder {
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<i64>,
    },
}

pub async fn images(app: &AdminApp, command: ImageCommand) -> Result<()> {
    match command {
        ImageCommand::List { list, product } => {
            let params =
                list.to_params(app, vec![("product_id", product.map(|id| id.to_string()))]);
            let page = app
                .list::<ProductImage>(&params)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load images"))?;
            let mut table = Table::new(&["ID", "Product", "Order", "Primary", "URL"]);
            for image in &page.data {
                table.row(vec![
                    image.id.to_string(),
                    image
                        .product_name
                        .clone()
                        .unwrap_or_else(|| format!("#{}", image.product_id)),
                    output::opt(image.display_order),
                    output::yes_no(image.is_primary),
                    image.display_url().to_string(),
                ]);
            }
            output::print_page(&page, &table, &params, app.page_size(), "images");
            Ok(())
        }
        ImageCommand::Get { id } => {
            let image = app
                .get::<ProductImage>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load image"))?;
            output::print_details(&[
                ("ID", image.id.to_string()),
                ("Product", image.product_id.to_string()),
                ("URL", image.display_url().to_string()),
                ("Order", output::opt(image.display_order)),
                ("Primary", output::yes_no(image.is_primary)),
            ]);
            Ok(())
        }
        ImageCommand::Add {
            product,
            file,
            url,
            order,
            primary,
        } => {
            let source = match (file, url) {
                (Some(path), _) => Some(ImageSource::File(FileUpload::from_path(path)?)),
                (None, Some(url)) => Some(ImageSource::Url(url)),
                (None, None) => None,
            };
            let body = ProductImageForm {
                product_id: product,
                source,
                display_order: order,
                is_primary: primary,
            }
            .into_body(FormMode::Create)?;
            output::report(app.create::<ProductImage>(body).await, "Image", Mutation::Create)
        }
        ImageCommand::Update { id, order, primary } => {
            let existing = app
                .get::<ProductImage>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load image"))?;
            let mut form = ProductImageForm::from(&existing);
            form.display_order = order.unwrap_or(form.display_order);
            form.is_primary = primary.unwrap_or(form.is_primary);
            let body = form.into_body(FormMode::Edit)?;
            output::report(app.update::<ProductImage>(id, body).await, "Image", Mutation::Update)
        }
        ImageCommand::Delete { id } => {
            output::report(app.delete::<ProductImage>(id).await, "Image", Mutation::Delete)
        }
        ImageCommand::SetPrimary { id } => {
            let result = app
                .mutate::<ProductImage, _>(product_image_service::set_primary(app.client(), id))
                .await;
            output::report(result, "Image", Mutation::Update)
        }
        ImageCommand::Reorder { ids } => {
            let results = product_image_service::reorder(app.client(), &ids).await;
            app.invalidate::<ProductImage>();
            let results = results.map_err(|e| output::with_fallback(e, "Failed to reorder images"))?;
            println!("Reordered {} images.", results.len());
            Ok(())
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum SpecCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        product: Option<i64>,
        #[arg(long, requires = "product")]
        group: Option<String>,
        /// Print the product's specifications grouped by `spec_group`.
        #[arg(long, requires = "product")]
        grouped: bool,
    },
    Get {
        id: i64,
    },
    Create(SpecFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: SpecFields,
    },
    Delete {
        id: i64,
    },
    /// Add several specifications, each given as `name=value` or `name=value@group`.
    BulkCreate {
        #[arg(long)]
        product: i64,
        #[arg(long = "spec", required = true)]
        specs: Vec<String>,
        #[arg(long)]
        start_order: Option<i64>,
    },
    /// Assign display order following the given ids.
    Reorder {
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SpecFields {
    #[arg(long)]
    product: Option<i64>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    value: Option<String>,
    #[arg(long)]
    group: Option<String>,
    #[arg(long)]
    order: Option<String>,
}

impl SpecFields {
    fn apply(self, form: &mut ProductSpecificationForm) {
        form.product_id = self.product.or(form.product_id);
        if let Some(name) = self.name {
            form.spec_name = name;
        }
        if let Some(value) = self.value {
            form.spec_value = value;
        }
        form.spec_group = self.group.or(form.spec_group.take());
        form.display_order = self.order.or(form.display_order.take());
    }
}

/// Parses `name=value` or `name=value@group`.
fn parse_spec(raw: &str) -> Result<SpecInput> {
    let (name, rest) = raw
        .split_once('=')
        .ok_or_else(|| AppError::BadRequest(format!("Expected name=value, got `{}`", raw)))?;
    let (value, group) = match rest.rsplit_once('@') {
        Some((value, group)) => (value, Some(group.trim().to_string())),
        None => (rest, None),
    };

    let name = name.trim();
    let value = value.trim();
    if name.is_empty() || value.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Specification `{}` needs both a name and a value",
            raw
        )));
    }

    Ok(SpecInput {
        spec_name: name.to_string(),
        spec_value: value.to_string(),
        spec_group: group.filter(|g| !g.is_empty()),
    })
}

fn spec_table(specs: &[ProductSpecification]) -> Table {
    let mut table = Table::new(&["ID", "Product", "Group", "Name", "Value", "Order"]);
    for spec in specs {
        table.row(vec![
            spec.id.to_string(),
            spec.product_name
                .clone()
                .unwrap_or_else(|| format!("#{}", spec.product_id)),
            output::opt(spec.spec_group.as_deref()),
            spec.spec_name.clone(),
            spec.spec_value.clone(),
            output::opt(spec.display_order),
        ]);
    }
    table
}

pub async fn specs(app: &AdminApp, command: SpecCommand) -> Result<()> {
    match command {
        SpecCommand::List {
            list,
            product,
            group,
            grouped,
        } => {
            if let (true, Some(product_id)) = (grouped, product) {
                let grouped = product_specification_service::grouped(app.client(), product_id)
                    .await
                    .map_err(|e| output::with_fallback(e, "Failed to load specifications"))?;
                let groups = if grouped.data.is_empty() {
                    let page = product_specification_service::by_product(app.client(), product_id)
                        .await
                        .map_err(|e| output::with_fallback(e, "Failed to load specifications"))?;
                    group_specifications(page.data)
                } else {
                    grouped.data
                };

                if groups.is_empty() {
                    println!("No specifications found.");
                }
                for (name, specs) in &groups {
                    println!("{}", name);
                    for spec in specs {
                        println!("  {}: {}", spec.spec_name, spec.spec_value);
                    }
                }
                return Ok(());
            }

            let params = list.to_params(
                app,
                vec![
                    ("product_id", product.map(|id| id.to_string())),
                    ("spec_group", group),
                ],
            );
            let page = app
                .list::<ProductSpecification>(&params)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load specifications"))?;
            output::print_page(
                &page,
                &spec_table(&page.data),
                &params,
                app.page_size(),
                "specifications",
            );
            Ok(())
        }
        SpecCommand::Get { id } => {
            let spec = app
                .get::<ProductSpecification>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load specification"))?;
            output::print_details(&[
                ("ID", spec.id.to_string()),
                ("Product", spec.product_id.to_string()),
                ("Group", output::opt(spec.spec_group.as_deref())),
                ("Name", spec.spec_name.clone()),
                ("Value", spec.spec_value.clone()),
                ("Order", output::opt(spec.display_order)),
            ]);
            Ok(())
        }
        SpecCommand::Create(fields) => {
            let mut form = ProductSpecificationForm::default();
            fields.apply(&mut form);
            let body = form.into_body()?;
            output::report(
                app.create::<ProductSpecification>(body).await,
                "Specification",
                Mutation::Create,
            )
        }
        SpecCommand::Update { id, fields } => {
            let existing = app
                .get::<ProductSpecification>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load specification"))?;
            let mut form = ProductSpecificationForm::from(&existing);
            fields.apply(&mut form);
            let body = form.into_body()?;
            output::report(
                app.update::<ProductSpecification>(id, body).await,
                "Specification",
                Mutation::Update,
            )
        }
        SpecCommand::Delete { id } => output::report(
            app.delete::<ProductSpecification>(id).await,
            "Specification",
            Mutation::Delete,
        ),
        SpecCommand::BulkCreate {
            product,
            specs,
            start_order,
        } => {
            let specs = specs
                .iter()
                .map(|raw| parse_spec(raw))
                .collect::<Result<Vec<_>>>()?;
            let result = app
                .mutate::<ProductSpecification, _>(product_specification_service::bulk_create(
                    app.client(),
                    product,
                    &specs,
                    start_order,
                ))
                .await;
            output::report(result, "Specifications", Mutation::Create)
        }
        SpecCommand::Reorder { ids } => {
            let results = product_specification_service::reorder(app.client(), &ids).await;
            app.invalidate::<ProductSpecification>();
            let results =
                results.map_err(|e| output::with_fallback(e, "Failed to reorder specifications"))?;
            println!("Reordered {} specifications.", results.len());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spec_arguments() {
        assert_eq!(
            parse_spec("Sensor = Full frame @ Imaging").unwrap(),
            SpecInput {
                spec_name: "Sensor".into(),
                spec_value: "Full frame".into(),
                spec_group: Some("Imaging".into()),
            }
        );
        assert_eq!(parse_spec("Weight=650 g").unwrap().spec_group, None);
        assert!(parse_spec("no value").is_err());
        assert!(parse_spec("=x").is_err());
    }
}
