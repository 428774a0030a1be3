//! Stats module - summary metrics and spend statistics

mod calculator;

pub use calculator::{format_currency, percent_of_total, SpendStats, SummaryMetrics};
