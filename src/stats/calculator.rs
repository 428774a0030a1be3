//! Spend Statistics Module
//! Headline totals, percentage-of-total and descriptive spend statistics.
//! Everything here is a pure function of the loaded tables.

use crate::data::CostDataset;
use statrs::statistics::{Data, Median, Statistics};

/// Headline totals shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryMetrics {
    pub total_csp_spend: f64,
    pub total_marketplace: f64,
    pub total_services: f64,
    pub total_applications: f64,
}

impl SummaryMetrics {
    pub fn from_dataset(data: &CostDataset) -> Self {
        Self {
            total_csp_spend: data.csp.iter().map(|c| c.spend).sum(),
            total_marketplace: data.csp.iter().map(|c| c.marketplace()).sum(),
            total_services: data.services.iter().map(|s| s.spend).sum(),
            total_applications: data.applications.iter().map(|a| a.spend).sum(),
        }
    }

    /// (label, value) pairs in display order.
    pub fn cards(&self) -> [(&'static str, f64); 4] {
        [
            ("Total CSP Spend", self.total_csp_spend),
            ("Total Marketplace", self.total_marketplace),
            ("Total Services", self.total_services),
            ("Total Applications", self.total_applications),
        ]
    }
}

/// Descriptive statistics for one spend column.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendStats {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub max: f64,
}

impl Default for SpendStats {
    fn default() -> Self {
        Self {
            count: 0,
            total: 0.0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            max: 0.0,
        }
    }
}

impl SpendStats {
    /// Empty input gives all zeros; a single value has zero spread.
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self::default();
        }

        let std_dev = if n > 1 { values.iter().std_dev() } else { 0.0 };

        Self {
            count: n,
            total: values.iter().sum(),
            mean: values.iter().mean(),
            median: Data::new(values.to_vec()).median(),
            std_dev,
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows · mean {} · median {} · std dev {} · max {}",
            self.count,
            format_currency(self.mean),
            format_currency(self.median),
            format_currency(self.std_dev),
            format_currency(self.max)
        )
    }
}

/// Each value as a percentage of the total; all zeros when the total is not positive.
pub fn percent_of_total(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / total * 100.0).collect()
}

/// Whole-dollar amount with thousands separators, e.g. "$100,000".
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}
