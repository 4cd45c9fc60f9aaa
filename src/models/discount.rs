use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::utils::de;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    #[default]
    Percentage,
    #[serde(alias = "fixed")]
    FixedAmount,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::FixedAmount => "fixed_amount",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" => Ok(DiscountType::Percentage),
            "fixed_amount" | "fixed" => Ok(DiscountType::FixedAmount),
            other => Err(format!(
                "unknown discount type `{}` (expected percentage or fixed_amount)",
                other
            )),
        }
    }
}

/// What a discount is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    #[default]
    Product,
    Category,
    Subcategory,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Product => "product",
            TargetType::Category => "category",
            TargetType::Subcategory => "subcategory",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" => Ok(TargetType::Product),
            "category" => Ok(TargetType::Category),
            "subcategory" => Ok(TargetType::Subcategory),
            other => Err(format!(
                "unknown target `{}` (expected product, category or subcategory)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "DiscountRow")]
pub struct Discount {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    /// `None` when the row carries no type or one this client does not know;
    /// such discounts never change a price.
    pub discount_type: Option<DiscountType>,
    pub discount_value: Decimal,
    pub target_type: TargetType,
    pub target_id: Option<i64>,
    pub target_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub priority: Option<i64>,
    pub max_uses: Option<i64>,
    pub min_order_amount: Option<Decimal>,
    pub used_count: Option<i64>,
}

/// Wire shape of a discount. Older endpoints send `type`/`value`, newer ones
/// `discount_type`/`discount_value`, and some send both.
#[derive(Debug, Deserialize)]
struct DiscountRow {
    #[serde(default, deserialize_with = "de::opt_int")]
    id: Option<i64>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    discount_type: Option<String>,
    #[serde(default, rename = "type")]
    legacy_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    discount_value: Option<Decimal>,
    #[serde(default, rename = "value", deserialize_with = "de::opt_decimal")]
    legacy_value: Option<Decimal>,
    #[serde(default)]
    target_type: TargetType,
    #[serde(default, deserialize_with = "de::opt_int")]
    target_id: Option<i64>,
    #[serde(default)]
    target_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_date")]
    start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::opt_date")]
    end_date: Option<NaiveDate>,
    #[serde(default = "de::default_true", deserialize_with = "de::flag")]
    is_active: bool,
    #[serde(default, deserialize_with = "de::opt_int")]
    priority: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_int")]
    max_uses: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    min_order_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_int")]
    used_count: Option<i64>,
}

impl From<DiscountRow> for Discount {
    fn from(row: DiscountRow) -> Self {
        let discount_type = [row.discount_type, row.legacy_type]
            .into_iter()
            .flatten()
            .find(|raw| !raw.trim().is_empty())
            .and_then(|raw| raw.parse().ok());

        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            discount_type,
            discount_value: row
                .discount_value
                .or(row.legacy_value)
                .unwrap_or(Decimal::ZERO),
            target_type: row.target_type,
            target_id: row.target_id,
            target_name: row.target_name,
            start_date: row.start_date,
            end_date: row.end_date,
            is_active: row.is_active,
            priority: row.priority,
            max_uses: row.max_uses,
            min_order_amount: row.min_order_amount,
            used_count: row.used_count,
        }
    }
}

impl Discount {
    /// Whether `day` falls inside the discount's date window.
    pub fn is_running_on(&self, day: NaiveDate) -> bool {
        self.is_active
            && self.start_date.is_none_or(|start| start <= day)
            && self.end_date.is_none_or(|end| day <= end)
    }
}

/// Server-side price quote from `/discounts/calculate.php`.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceQuote {
    #[serde(deserialize_with = "de::int")]
    pub product_id: i64,
    #[serde(default, deserialize_with = "de::decimal")]
    pub original_price: Decimal,
    #[serde(default, deserialize_with = "de::decimal")]
    pub final_price: Decimal,
    #[serde(default, deserialize_with = "de::decimal")]
    pub discount_amount: Decimal,
    #[serde(default, deserialize_with = "de::flag")]
    pub has_discount: bool,
    #[serde(default)]
    pub discount: Option<Discount>,
}
