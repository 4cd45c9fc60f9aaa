use chrono::NaiveDate;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde_json::json;

use crate::{
    client::RequestBody,
    error::Result,
    forms::{FieldErrors, non_empty},
    models::{Discount, DiscountType, TargetType},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct DiscountForm {
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Option<Decimal>,
    pub target_type: TargetType,
    pub target_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub max_uses: Option<i64>,
    /// Sent as `min_order_amount`.
    pub min_quantity: i64,
}

impl Default for DiscountForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: None,
            target_type: TargetType::Product,
            target_id: None,
            start_date: None,
            end_date: None,
            is_active: true,
            max_uses: None,
            min_quantity: 1,
        }
    }
}

impl From<&Discount> for DiscountForm {
    fn from(discount: &Discount) -> Self {
        Self {
            name: discount.name.clone(),
            description: discount.description.clone(),
            discount_type: discount.discount_type.unwrap_or_default(),
            discount_value: Some(discount.discount_value),
            target_type: discount.target_type,
            target_id: discount.target_id,
            start_date: discount.start_date,
            end_date: discount.end_date,
            is_active: discount.is_active,
            max_uses: discount.max_uses,
            min_quantity: discount
                .min_order_amount
                .and_then(|amount| amount.trunc().to_i64())
                .unwrap_or(1),
        }
    }
}

impl DiscountForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", "Discount name is required");
        }

        match self.discount_value {
            Some(value) if value > Decimal::ZERO => {
                if self.discount_type == DiscountType::Percentage && value > Decimal::ONE_HUNDRED {
                    errors.add("discount_value", "Discount percentage cannot be greater than 100%");
                }
            }
            _ => errors.add(
                "discount_value",
                "Discount value is required and must be greater than zero",
            ),
        }

        if self.target_id.is_none() {
            errors.add("target_id", "Target selection is required");
        }

        if self.start_date.is_none() {
            errors.add("start_date", "Start date is required");
        }
        match (self.start_date, self.end_date) {
            (_, None) => errors.add("end_date", "End date is required"),
            (Some(start), Some(end)) if end <= start => {
                errors.add("end_date", "End date must be after start date")
            }
            _ => {}
        }

        if self.min_quantity < 1 {
            errors.add("min_quantity", "Minimum quantity must be at least 1");
        }

        errors
    }

    pub fn into_body(self) -> Result<RequestBody> {
        self.validate().into_result()?;

        Ok(RequestBody::Json(json!({
            "name": self.name.trim(),
            "description": non_empty(self.description.as_deref()),
            "discount_type": self.discount_type.as_str(),
            "discount_value": self.discount_value,
            "target_type": self.target_type.as_str(),
            "target_id": self.target_id,
            "start_date": self.start_date.map(|d| d.format(DATE_FORMAT).to_string()),
            "end_date": self.end_date.map(|d| d.format(DATE_FORMAT).to_string()),
            "is_active": self.is_active,
            "priority": 0,
            "max_uses": self.max_uses,
            "min_order_amount": self.min_quantity,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn valid() -> DiscountForm {
        DiscountForm {
            name: "Summer".into(),
            discount_value: Some(Decimal::from(15)),
            target_id: Some(12),
            start_date: date(2025, 6, 1),
            end_date: date(2025, 6, 30),
            ..Default::default()
        }
    }

    #[test]
    fn percentage_is_capped() {
        let form = DiscountForm {
            discount_value: Some(Decimal::from(120)),
            ..valid()
        };
        assert_eq!(
            form.validate().get("discount_value"),
            Some("Discount percentage cannot be greater than 100%")
        );

        let form = DiscountForm {
            discount_type: DiscountType::FixedAmount,
            discount_value: Some(Decimal::from(120)),
            ..valid()
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn dates_and_quantity() {
        let form = DiscountForm {
            end_date: date(2025, 6, 1),
            min_quantity: 0,
            discount_value: Some(Decimal::ZERO),
            ..valid()
        };
        let errors = form.validate();
        assert_eq!(errors.get("end_date"), Some("End date must be after start date"));
        assert_eq!(errors.get("min_quantity"), Some("Minimum quantity must be at least 1"));
        assert!(errors.contains("discount_value"));

        let errors = DiscountForm::default().validate();
        assert!(errors.contains("start_date"));
        assert!(errors.contains("end_date"));
        assert!(errors.contains("target_id"));
    }

    #[test]
    fn payload_shape() {
        let RequestBody::Json(body) = valid().into_body().unwrap() else {
            panic!("expected json body");
        };
        assert_eq!(body["discount_type"], "percentage");
        assert_eq!(body["target_type"], "product");
        assert_eq!(body["start_date"], "2025-06-01");
        assert_eq!(body["priority"], 0);
        assert_eq!(body["min_order_amount"], 1);
        assert_eq!(body["is_active"], true);
    }
}
