//! Lenient decoders for the loosely typed JSON the admin API returns.
//!
//! Booleans show up as `true`, `1` or `"1"`, ids as numbers or numeric
//! strings, and timestamps in MySQL or RFC 3339 format.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;
use std::str::FromStr;

const MYSQL_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

pub fn default_true() -> bool {
    true
}

pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Null => Ok(false),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "" | "0" | "false" | "no" | "off" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean `{}`", other))),
        },
        other => Err(D::Error::custom(format!("invalid boolean {}", other))),
    }
}

pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    opt_int(deserializer)?.ok_or_else(|| D::Error::custom("expected an integer, found null"))
}

pub fn opt_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|v| v as i64))
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid integer {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid integer `{}`", s))),
        other => Err(D::Error::custom(format!("invalid integer {}", other))),
    }
}

pub fn opt_decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map(Some)
            .map_err(D::Error::custom),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Decimal::from_str(s.trim())
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid decimal `{}`", s))),
        other => Err(D::Error::custom(format!("invalid decimal {}", other))),
    }
}

pub fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    Ok(opt_decimal(deserializer)?.unwrap_or(Decimal::ZERO))
}

pub fn opt_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() || s.starts_with("0000-00-00") => Ok(None),
        Some(s) => parse_datetime(s.trim())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp `{}`", s))),
    }
}

pub fn opt_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() || s.starts_with("0000-00-00") => Ok(None),
        Some(s) => {
            let day = s.trim().get(..10).unwrap_or(s.trim());
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid date `{}`", s)))
        }
    }
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, MYSQL_DATETIME)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "int")]
        id: i64,
        #[serde(default, deserialize_with = "flag")]
        active: bool,
        #[serde(default, deserialize_with = "opt_decimal")]
        price: Option<Decimal>,
        #[serde(default, deserialize_with = "opt_datetime")]
        created_at: Option<NaiveDateTime>,
        #[serde(default, deserialize_with = "opt_date")]
        starts: Option<NaiveDate>,
    }

    #[test]
    fn accepts_php_style_values() {
        let row: Row = serde_json::from_value(json!({
            "id": "42",
            "active": "1",
            "price": "199.90",
            "created_at": "2024-03-01 12:30:00",
            "starts": "2024-03-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(row.id, 42);
        assert!(row.active);
        assert_eq!(row.price, Some(Decimal::new(19990, 2)));
        assert_eq!(
            row.created_at.unwrap().format(MYSQL_DATETIME).to_string(),
            "2024-03-01 12:30:00"
        );
        assert_eq!(row.starts, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn empty_values_become_none() {
        let row: Row = serde_json::from_value(json!({
            "id": 7,
            "active": 0,
            "price": "",
            "created_at": null
        }))
        .unwrap();

        assert!(!row.active);
        assert_eq!(row.price, None);
        assert_eq!(row.created_at, None);
        assert_eq!(row.starts, None);
    }

    #[test]
    fn rejects_garbage_flags() {
        let err = serde_json::from_value::<Row>(json!({ "id": 1, "active": "maybe" }));
        assert!(err.is_err());
    }
}
