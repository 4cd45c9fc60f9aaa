//! Tables, footers and success/failure messages.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    error::{AppError, Result},
    models::{ApiMessage, Page},
    services::ListParams,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
    Restore,
}

impl Mutation {
    fn verb(&self) -> &'static str {
        match self {
            Mutation::Create => "create",
            Mutation::Update => "update",
            Mutation::Delete => "delete",
            Mutation::Restore => "restore",
        }
    }

    fn past(&self) -> &'static str {
        match self {
            Mutation::Create => "created",
            Mutation::Update => "updated",
            Mutation::Delete => "deleted",
            Mutation::Restore => "restored",
        }
    }
}

/// Plain-text table with columns padded to their widest cell.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }

        let mut out = String::new();
        let header: Vec<String> = self.headers.iter().map(|h| h.to_string()).collect();
        push_line(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(&format!("{:<width$}", cell, width = *width));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn footer<T>(page: &Page<T>, params: &ListParams, default_limit: u32) -> String {
    let current = params.current_page();
    let limit = params.limit.unwrap_or(default_limit);
    let (from, to) = page.shown_range(current, limit);
    format!(
        "Showing {} to {} of {} results · Page {} of {}",
        from,
        to,
        page.total(),
        current,
        page.total_pages(limit)
    )
}

/// Prints a list table with its pagination footer, or an empty-state line.
pub fn print_page<T>(
    page: &Page<T>,
    table: &Table,
    params: &ListParams,
    default_limit: u32,
    plural: &str,
) {
    if table.is_empty() {
        println!("No {} found.", plural);
        return;
    }
    print!("{}", table.render());
    println!();
    println!("{}", footer(page, params, default_limit));
}

/// Prints `label: value` lines with the labels aligned.
pub fn print_details(rows: &[(&str, String)]) {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        println!("{:<width$}  {}", format!("{}:", label), value, width = width + 1);
    }
}

pub fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

pub fn active_label(value: bool) -> String {
    if value { "Active" } else { "Inactive" }.to_string()
}

pub fn money(amount: Decimal) -> String {
    format!(
        "${:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

pub fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Prints "<Label> created successfully!" or turns the failure into a
/// user-facing error.
pub fn report(result: Result<ApiMessage>, label: &str, mutation: Mutation) -> Result<()> {
    match result {
        Ok(message) => {
            println!("{} {} successfully!", label, mutation.past());
            if mutation == Mutation::Create {
                if let Some(id) = message.created_id() {
                    println!("ID: {}", id);
                }
            }
            Ok(())
        }
        Err(e) => Err(with_fallback(
            e,
            &format!("Failed to {} {}", mutation.verb(), label.to_lowercase()),
        )),
    }
}

/// Keeps errors that already read well and replaces the rest with `fallback`.
pub fn with_fallback(error: AppError, fallback: &str) -> AppError {
    match error {
        AppError::Validation(_) | AppError::SessionExpired | AppError::ConfigError(_) => error,
        e if e.server_message().is_some_and(|m| !m.is_empty()) => e,
        e => {
            tracing::warn!("{}: {}", fallback, e);
            AppError::InternalError(fallback.to_string())
        }
    }
}

pub fn print_error(error: &AppError) {
    match error {
        AppError::Validation(errors) => {
            eprintln!("Please fix the following fields:");
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field, message);
            }
        }
        AppError::InternalError(message) => eprintln!("Error: {}", message),
        other => eprintln!("Error: {}", other.user_message(&other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_aligned_columns() {
        let mut table = Table::new(&["ID", "Name"]);
        table.row(vec!["1".into(), "Canon".into()]);
        table.row(vec!["12".into(), "Sony".into()]);

        assert_eq!(table.render(), "ID  Name\n--  -----\n1   Canon\n12  Sony\n");
    }

    #[test]
    fn footer_text() {
        let page: Page<serde_json::Value> =
            serde_json::from_value(json!({ "data": [1, 2], "total": 42 })).unwrap();
        let params = ListParams::new().limit(20).page(3);

        assert_eq!(
            footer(&page, &params, 20),
            "Showing 41 to 42 of 42 results · Page 3 of 3"
        );
    }

    #[test]
    fn failures_fall_back_to_generic_message() {
        let err = report(
            Err(AppError::InternalError("bad json".into())),
            "Brand",
            Mutation::Create,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InternalError(ref m) if m == "Failed to create brand"));

        let err = report(
            Err(AppError::Conflict("Slug already exists".into())),
            "Brand",
            Mutation::Update,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn formats_money() {
        assert_eq!(money(Decimal::new(12345, 3)), "$12.35");
        assert_eq!(money(Decimal::from(7)), "$7.00");
    }
}
