//! Client-side discounted price calculation.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::{
    client::ApiClient,
    error::Result,
    models::{Discount, DiscountType, TargetType},
    services::discount_service,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub original: Decimal,
    pub final_price: Decimal,
    pub savings: Decimal,
    /// Whole percent saved, rounded half up.
    pub percent_off: i64,
    pub discount_name: String,
    pub target_type: TargetType,
}

/// Price after a discount; never below zero.
pub fn final_price(original: Decimal, kind: DiscountType, value: Decimal) -> Decimal {
    let price = match kind {
        DiscountType::Percentage => original * (Decimal::ONE - value / Decimal::ONE_HUNDRED),
        DiscountType::FixedAmount => original - value,
    };
    price.max(Decimal::ZERO)
}

/// `None` when there is no positive price to discount or the discount type
/// is unknown.
pub fn apply_discount(original: Decimal, discount: &Discount) -> Option<PriceBreakdown> {
    if original <= Decimal::ZERO {
        return None;
    }
    let kind = discount.discount_type?;

    let final_price = final_price(original, kind, discount.discount_value);
    let savings = original - final_price;
    let percent_off = (savings / original * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0);

    Some(PriceBreakdown {
        original,
        final_price,
        savings,
        percent_off,
        discount_name: discount.name.clone(),
        target_type: discount.target_type,
    })
}

/// Applies the first discount the API lists for a product.
pub async fn product_discount(
    client: &ApiClient,
    product_id: i64,
    original: Decimal,
) -> Result<Option<PriceBreakdown>> {
    if original <= Decimal::ZERO {
        return Ok(None);
    }

    let discounts = discount_service::for_product(client, product_id).await?;
    Ok(discounts
        .first()
        .and_then(|discount| apply_discount(original, discount)))
}
