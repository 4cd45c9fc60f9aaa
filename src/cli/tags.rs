use clap::{Args, Subcommand};

use crate::{
    app::AdminApp,
    cli::{
        ListArgs,
        output::{self, Mutation, Table},
    },
    error::{AppError, Result},
    forms::{ProductTagForm, TagForm},
    models::{ProductTag, Tag},
    services::{ListParams, product_tag_service, tag_service},
};

#[derive(Debug, Subcommand)]
pub enum TagCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Most used tags first, limited to N.
        #[arg(long, value_name = "N")]
        popular: Option<u32>,
    },
    Get {
        id: i64,
    },
    Create(TagFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: TagFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct TagFields {
    #[arg(long)]
    name: Option<String>,
    /// Built from the name when omitted.
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    color: Option<String>,
}

impl TagFields {
    fn apply(self, form: &mut TagForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        form.slug = self.slug.or(form.slug.take());
        form.color = self.color.or(form.color.take());
    }
}

fn tag_table(tags: &[Tag]) -> Table {
    let mut table = Table::new(&["ID", "Name", "Slug", "Color", "Used"]);
    for tag in tags {
        table.row(vec![
            tag.id.to_string(),
            tag.name.clone(),
            output::opt(tag.slug.as_deref()),
            output::opt(tag.color.as_deref()),
            tag.usage_count.unwrap_or(0).to_string(),
        ]);
    }
    table
}

pub async fn tags(app: &AdminApp, command: TagCommand) -> Result<()> {
    match command {
        TagCommand::List { list, popular } => {
            if let Some(limit) = popular {
                let page = tag_service::popular(app.client(), limit)
                    .await
                    .map_err(|e| output::with_fallback(e, "Failed to load tags"))?;
                let params = ListParams::new().limit(limit);
                output::print_page(&page, &tag_table(&page.data), &params, limit, "tags");
                return Ok(());
            }

            let params = list.to_params(app, Vec::new());
            let page = app
                .list::<Tag>(&params)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load tags"))?;
            output::print_page(&page, &tag_table(&page.data), &params, app.page_size(), "tags");
            Ok(())
        }
        TagCommand::Get { id } => {
            let tag = app
                .get::<Tag>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load tag"))?;
            output::print_details(&[
                ("ID", tag.id.to_string()),
                ("Name", tag.name.clone()),
                ("Slug", output::opt(tag.slug.as_deref())),
                ("Color", output::opt(tag.color.as_deref())),
                ("Used by", format!("{} products", tag.usage_count.unwrap_or(0))),
            ]);
            Ok(())
        }
        TagCommand::Create(fields) => {
            let mut form = TagForm::default();
            fields.apply(&mut form);
            let body = form.into_body()?;
            output::report(app.create::<Tag>(body).await, "Tag", Mutation::Create)
        }
        TagCommand::Update { id, fields } => {
            let existing = app
                .get::<Tag>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load tag"))?;
            let mut form = TagForm::from(&existing);
            fields.apply(&mut form);
            let body = form.into_body()?;
            output::report(app.update::<Tag>(id, body).await, "Tag", Mutation::Update)
        }
        TagCommand::Delete { id } => {
            output::report(app.delete::<Tag>(id).await, "Tag", Mutation::Delete)
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ProductTagCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        product: Option<i64>,
        #[arg(long)]
        tag: Option<i64>,
    },
    /// Tag a product.
    Create {
        #[arg(long)]
        product: Option<i64>,
        #[arg(long)]
        tag: Option<i64>,
    },
    /// Tag a product with several tags at once.
    BulkCreate {
        #[arg(long)]
        product: i64,
        #[arg(long, value_delimiter = ',', required = true)]
        tags: Vec<i64>,
    },
    Update {
        id: i64,
        #[arg(long)]
        product: Option<i64>,
        #[arg(long)]
        tag: Option<i64>,
    },
    Delete {
        id: i64,
    },
    BulkDelete {
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<i64>,
    },
    /// Remove every link of a product or of a tag.
    Clear {
        #[arg(long, conflicts_with = "tag", required_unless_present = "tag")]
        product: Option<i64>,
        #[arg(long)]
        tag: Option<i64>,
    },
    Exists {
        #[arg(long)]
        product: i64,
        #[arg(long)]
        tag: i64,
    },
    Count {
        #[arg(long)]
        product: Option<i64>,
        #[arg(long)]
        tag: Option<i64>,
    },
    MostUsed {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

pub async fn product_tags(app: &AdminApp, command: ProductTagCommand) -> Result<()> {
    match command {
        ProductTagCommand::List { list, product, tag } => {
            let params = list.to_params(
                app,
                vec![
                    ("product_id", product.map(|id| id.to_string())),
                    ("tag_id", tag.map(|id| id.to_string())),
                ],
            );
            let page = app
                .list::<ProductTag>(&params)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load product tags"))?;
            let mut table = Table::new(&["ID", "Product", "Tag", "Added"]);
            for link in &page.data {
                table.row(vec![
                    link.id.to_string(),
                    link.product_name
                        .clone()
                        .unwrap_or_else(|| format!("#{}", link.product_id)),
                    link.tag_name
                        .clone()
                        .unwrap_or_else(|| format!("#{}", link.tag_id)),
                    output::opt(link.created_at.map(|at| at.date())),
                ]);
            }
            output::print_page(&page, &table, &params, app.page_size(), "product tags");
            Ok(())
        }
        ProductTagCommand::Create { product, tag } => {
            let body = ProductTagForm {
                product_id: product,
                tag_id: tag,
            }
            .into_body()?;
            output::report(app.create::<ProductTag>(body).await, "Product tag", Mutation::Create)
        }
        ProductTagCommand::BulkCreate { product, tags } => {
            let pairs: Vec<(i64, i64)> = tags.iter().map(|tag| (product, *tag)).collect();
            let result = app
                .mutate::<ProductTag, _>(product_tag_service::bulk_create(app.client(), &pairs))
                .await;
            output::report(result, "Product tags", Mutation::Create)
        }
        ProductTagCommand::Update { id, product, tag } => {
            let existing = app
                .get::<ProductTag>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load product tag"))?;
            let mut form = ProductTagForm::from(&existing);
            form.product_id = product.or(form.product_id);
            form.tag_id = tag.or(form.tag_id);
            let body = form.into_body()?;
            output::report(
                app.update::<ProductTag>(id, body).await,
                "Product tag",
                Mutation::Update,
            )
        }
        ProductTagCommand::Delete { id } => {
            output::report(app.delete::<ProductTag>(id).await, "Product tag", Mutation::Delete)
        }
        ProductTagCommand::BulkDelete { ids } => {
            let result = app
                .mutate::<ProductTag, _>(product_tag_service::bulk_delete(app.client(), &ids))
                .await;
            output::report(result, "Product tags", Mutation::Delete)
        }
        ProductTagCommand::Clear { product, tag } => {
            let result = match (product, tag) {
                (Some(product_id), _) => {
                    app.mutate::<ProductTag, _>(product_tag_service::delete_by_product(
                        app.client(),
                        product_id,
                    ))
                    .await
                }
                (None, Some(tag_id)) => {
                    app.mutate::<ProductTag, _>(product_tag_service::delete_by_tag(
                        app.client(),
                        tag_id,
                    ))
                    .await
                }
                (None, None) => Err(AppError::BadRequest(
                    "Pass --product or --tag".to_string(),
                )),
            };
            output::report(result, "Product tags", Mutation::Delete)
        }
        ProductTagCommand::Exists { product, tag } => {
            let exists = product_tag_service::exists(app.client(), product, tag)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to check product tag"))?;
            if exists {
                println!("Product {} is tagged with tag {}.", product, tag);
            } else {
                println!("Product {} is not tagged with tag {}.", product, tag);
            }
            Ok(())
        }
        ProductTagCommand::Count { product, tag } => {
            let params = ListParams::new()
                .filter_opt("product_id", product)
                .filter_opt("tag_id", tag);
            let count = product_tag_service::count(app.client(), &params)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to count product tags"))?;
            println!("{}", count);
            Ok(())
        }
        ProductTagCommand::MostUsed { limit } => {
            let page = product_tag_service::most_used(app.client(), limit)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load tags"))?;
            let params = ListParams::new().limit(limit);
            output::print_page(&page, &tag_table(&page.data), &params, limit, "tags");
            Ok(())
        }
    }
}
