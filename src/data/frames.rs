//! Data Table Frames
//! Polars views of the spend tables with percentage-of-total columns.
//! Built fresh on every call; nothing here is cached.

use crate::data::model::{ApplicationSpend, CspSpend, ServiceSpend};
use crate::stats::format_currency;
use polars::prelude::*;

/// Share of the column total in percent; zero when the total is not positive.
fn share_of_total(column: &str, alias: &str) -> Expr {
    when(col(column).sum().gt(lit(0.0)))
        .then(col(column) / col(column).sum() * lit(100.0))
        .otherwise(lit(0.0))
        .alias(alias)
}

/// Output columns: ["CSP", "Spend", "Marketplace", "Services %", "Marketplace %"]
pub fn csp_frame(rows: &[CspSpend]) -> PolarsResult<DataFrame> {
    let providers: Vec<String> = rows.iter().map(|r| r.provider.clone()).collect();
    let spend: Vec<f64> = rows.iter().map(|r| r.spend).collect();
    let marketplace: Vec<Option<f64>> = rows.iter().map(|r| r.marketplace_spend).collect();

    DataFrame::new(vec![
        Column::new("CSP".into(), providers),
        Column::new("Spend".into(), spend),
        Column::new("Marketplace".into(), marketplace),
    ])?
    .lazy()
    .with_columns([
        share_of_total("Spend", "Services %"),
        share_of_total("Marketplace", "Marketplace %"),
    ])
    .collect()
}

/// Output columns: ["Service", "Spend", ("CSP",) "Percentage"]
///
/// The provider column is only present when at least one row names a provider.
pub fn services_frame(rows: &[&ServiceSpend]) -> PolarsResult<DataFrame> {
    let services: Vec<String> = rows.iter().map(|r| r.service.clone()).collect();
    let spend: Vec<f64> = rows.iter().map(|r| r.spend).collect();

    let mut columns = vec![
        Column::new("Service".into(), services),
        Column::new("Spend".into(), spend),
    ];
    if rows.iter().any(|r| r.provider.is_some()) {
        let providers: Vec<Option<String>> = rows.iter().map(|r| r.provider.clone()).collect();
        columns.push(Column::new("CSP".into(), providers));
    }

    DataFrame::new(columns)?
        .lazy()
        .with_column(share_of_total("Spend", "Percentage"))
        .collect()
}

/// Output columns: ["Application", "Spend", "Percentage"]
pub fn applications_frame(rows: &[ApplicationSpend]) -> PolarsResult<DataFrame> {
    let applications: Vec<String> = rows.iter().map(|r| r.application.clone()).collect();
    let spend: Vec<f64> = rows.iter().map(|r| r.spend).collect();

    DataFrame::new(vec![
        Column::new("Application".into(), applications),
        Column::new("Spend".into(), spend),
    ])?
    .lazy()
    .with_column(share_of_total("Spend", "Percentage"))
    .collect()
}

/// Render a frame as display strings: header row plus one row per record.
///
/// Percentage columns get one decimal place, other numbers are shown as currency,
/// nulls as "-".
pub fn display_rows(df: &DataFrame) -> (Vec<String>, Vec<Vec<String>>) {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let rows = (0..df.height())
        .map(|i| {
            df.get_columns()
                .iter()
                .map(|column| {
                    let name = column.name().as_str();
                    let is_percent = name.ends_with('%') || name == "Percentage";
                    match column.get(i) {
                        Ok(AnyValue::Null) | Err(_) => "-".to_string(),
                        Ok(AnyValue::Float64(v)) if is_percent => format!("{:.1}%", v),
                        Ok(AnyValue::Float64(v)) => format_currency(v),
                        Ok(val) => val.to_string().trim_matches('"').to_string(),
                    }
                })
                .collect()
        })
        .collect();

    (headers, rows)
}
