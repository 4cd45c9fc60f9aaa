use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use crate::{
    app::AdminApp,
    cli::{
        ListArgs,
        catalog::flag_filter,
        output::{self, Mutation, Table},
    },
    error::Result,
    forms::DiscountForm,
    models::{Discount, DiscountType, PriceQuote, TargetType},
    services::discount_service,
};

#[derive(Debug, Subcommand)]
pub enum DiscountCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        active: bool,
        #[arg(long)]
        target_type: Option<TargetType>,
    },
    Get {
        id: i64,
    },
    Create(DiscountFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: DiscountFields,
    },
    Delete {
        id: i64,
    },
    /// Discounts that apply to a product.
    ForProduct {
        product: i64,
    },
    /// Server-side price calculation for one or more products.
    Calculate {
        #[arg(value_delimiter = ',', required = true)]
        products: Vec<i64>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct DiscountFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// `percentage` or `fixed_amount`.
    #[arg(long = "type")]
    discount_type: Option<DiscountType>,
    #[arg(long)]
    value: Option<Decimal>,
    /// `product`, `category` or `subcategory`.
    #[arg(long)]
    target_type: Option<TargetType>,
    #[arg(long)]
    target: Option<i64>,
    /// YYYY-MM-DD
    #[arg(long)]
    start: Option<NaiveDate>,
    /// YYYY-MM-DD
    #[arg(long)]
    end: Option<NaiveDate>,
    #[arg(long)]
    active: Option<bool>,
    #[arg(long)]
    max_uses: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    min_quantity: Option<i64>,
}

impl DiscountFields {
    fn apply(self, form: &mut DiscountForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        form.description = self.description.or(form.description.take());
        form.discount_type = self.discount_type.unwrap_or(form.discount_type);
        form.discount_value = self.value.or(form.discount_value);
        form.target_type = self.target_type.unwrap_or(form.target_type);
        form.target_id = self.target.or(form.target_id);
        form.start_date = self.start.or(form.start_date);
        form.end_date = self.end.or(form.end_date);
        form.is_active = self.active.unwrap_or(form.is_active);
        form.max_uses = self.max_uses.or(form.max_uses);
        form.min_quantity = self.min_quantity.unwrap_or(form.min_quantity);
    }
}

fn value_label(discount: &Discount) -> String {
    match discount.discount_type {
        Some(DiscountType::Percentage) => format!("{}%", discount.discount_value.normalize()),
        Some(DiscountType::FixedAmount) => output::money(discount.discount_value),
        None => discount.discount_value.normalize().to_string(),
    }
}

fn status_label(discount: &Discount, today: NaiveDate) -> String {
    if !discount.is_active {
        "Inactive"
    } else if discount.is_running_on(today) {
        "Running"
    } else if discount.start_date.is_some_and(|start| start > today) {
        "Scheduled"
    } else {
        "Expired"
    }
    .to_string()
}

fn discount_table(discounts: &[Discount]) -> Table {
    let today = Utc::now().date_naive();
    let mut table = Table::new(&["ID", "Name", "Type", "Value", "Target", "Period", "Status"]);
    for discount in discounts {
        let target = match (&discount.target_name, discount.target_id) {
            (Some(name), _) => format!("{} {}", discount.target_type, name),
            (None, Some(id)) => format!("{} #{}", discount.target_type, id),
            (None, None) => discount.target_type.to_string(),
        };
        table.row(vec![
            output::opt(discount.id),
            discount.name.clone(),
            output::opt(discount.discount_type),
            value_label(discount),
            target,
            format!(
                "{} - {}",
                output::opt(discount.start_date),
                output::opt(discount.end_date)
            ),
            status_label(discount, today),
        ]);
    }
    table
}

fn quote_table(quotes: &[PriceQuote]) -> Table {
    let mut table = Table::new(&["Product", "Original", "Final", "Saved", "Discount"]);
    for quote in quotes {
        table.row(vec![
            quote.product_id.to_string(),
            output::money(quote.original_price),
            output::money(quote.final_price),
            output::money(quote.discount_amount),
            quote
                .discount
                .as_ref()
                .map(|d| d.name.clone())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

pub async fn discounts(app: &AdminApp, command: DiscountCommand) -> Result<()> {
    match command {
        DiscountCommand::List {
            list,
            active,
            target_type,
        } => {
            let params = list.to_params(
                app,
                vec![
                    ("is_active", flag_filter(active)),
                    ("target_type", target_type.map(|t| t.to_string())),
                ],
            );
            let page = app
                .list::<Discount>(&params)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load discounts"))?;
            output::print_page(
                &page,
                &discount_table(&page.data),
                &params,
                app.page_size(),
                "discounts",
            );
            Ok(())
        }
        DiscountCommand::Get { id } => {
            let discount = app
                .get::<Discount>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load discount"))?;
            output::print_details(&[
                ("ID", output::opt(discount.id)),
                ("Name", discount.name.clone()),
                ("Description", output::opt(discount.description.as_deref())),
                ("Value", value_label(&discount)),
                ("Target", discount.target_type.to_string()),
                ("Target ID", output::opt(discount.target_id)),
                ("Starts", output::opt(discount.start_date)),
                ("Ends", output::opt(discount.end_date)),
                ("Status", status_label(&discount, Utc::now().date_naive())),
                ("Used", output::opt(discount.used_count)),
                ("Max uses", output::opt(discount.max_uses)),
            ]);
            Ok(())
        }
        DiscountCommand::Create(fields) => {
            let mut form = DiscountForm::default();
            fields.apply(&mut form);
            let body = form.into_body()?;
            output::report(app.create::<Discount>(body).await, "Discount", Mutation::Create)
        }
        DiscountCommand::Update { id, fields } => {
            let existing = app
                .get::<Discount>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load discount"))?;
            let mut form = DiscountForm::from(&existing);
            fields.apply(&mut form);
            let body = form.into_body()?;
            output::report(app.update::<Discount>(id, body).await, "Discount", Mutation::Update)
        }
        DiscountCommand::Delete { id } => {
            output::report(app.delete::<Discount>(id).await, "Discount", Mutation::Delete)
        }
        DiscountCommand::ForProduct { product } => {
            let discounts = discount_service::for_product(app.client(), product)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load discounts"))?;
            if discounts.is_empty() {
                println!("No discounts for product {}.", product);
            } else {
                print!("{}", discount_table(&discounts).render());
            }
            Ok(())
        }
        DiscountCommand::Calculate { products } => {
            let quotes = match products.as_slice() {
                [product] => discount_service::calculate(app.client(), *product)
                    .await
                    .map(|quote| vec![quote]),
                many => discount_service::calculate_many(app.client(), many).await,
            }
            .map_err(|e| output::with_fallback(e, "Failed to calculate prices"))?;

            if quotes.is_empty() {
                println!("No prices returned.");
            } else {
                print!("{}", quote_table(&quotes).render());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn discount(active: bool, start: &str, end: &str) -> Discount {
        serde_json::from_value(json!({
            "id": 2,
            "name": "Autumn",
            "discount_type": "percentage",
            "discount_value": "12.50",
            "target_type": "subcategory",
            "target_id": 8,
            "start_date": start,
            "end_date": end,
            "is_active": active,
        }))
        .unwrap()
    }

    #[test]
    fn status_follows_dates() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        assert_eq!(status_label(&discount(true, "2025-10-01", "2025-10-31"), today), "Running");
        assert_eq!(status_label(&discount(true, "2025-11-01", "2025-11-30"), today), "Scheduled");
        assert_eq!(status_label(&discount(true, "2025-09-01", "2025-09-30"), today), "Expired");
        assert_eq!(status_label(&discount(false, "2025-10-01", "2025-10-31"), today), "Inactive");
    }

    #[test]
    fn value_labels() {
        assert_eq!(value_label(&discount(true, "2025-10-01", "2025-10-31")), "12.5%");
    }
}
