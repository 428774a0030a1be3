//! Dashboard Chart Definitions
//! Turns a loaded dataset into the list of charts shown on the dashboard.

use crate::data::{CostDataset, ServiceSpend};

pub const SPEND_BLUE: [u8; 3] = [0x00, 0x52, 0xcc];
pub const MARKETPLACE_BLUE: [u8; 3] = [0x33, 0x99, 0xff];
pub const PIE_PALETTE: [[u8; 3]; 3] = [
    [0x00, 0x52, 0xcc],
    [0x33, 0x99, 0xff],
    [0x66, 0xb3, 0xff],
];

/// Heatmap color scale endpoints
pub const HEAT_LOW: [u8; 3] = [0xcc, 0xe0, 0xff];
pub const HEAT_HIGH: [u8; 3] = [0x00, 0x52, 0xcc];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
    Heatmap,
    Waterfall,
}

/// One chart: categories on the x axis, spend on the y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Stable identifier, also used as the exported file stem.
    pub id: String,
    pub title: String,
    pub x_title: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub color: [u8; 3],
}

impl ChartData {
    fn new(id: &str, title: String, x_title: &str, kind: ChartKind, color: [u8; 3]) -> Self {
        Self {
            id: id.to_string(),
            title,
            x_title: x_title.to_string(),
            kind,
            labels: Vec::new(),
            values: Vec::new(),
            color,
        }
    }

    fn with_series(mut self, labels: Vec<String>, values: Vec<f64>) -> Self {
        self.labels = labels;
        self.values = values;
        self
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Every chart on the dashboard, in page order.
///
/// `provider` narrows the services charts to one provider when the services
/// table carries a provider column.
pub fn dashboard_charts(data: &CostDataset, provider: Option<&str>) -> Vec<ChartData> {
    let csp_labels: Vec<String> = data.csp.iter().map(|c| c.provider.clone()).collect();
    let csp_spend: Vec<f64> = data.csp.iter().map(|c| c.spend).collect();
    let marketplace: Vec<f64> = data.csp.iter().map(|c| c.marketplace()).collect();

    let services = data.services_for(provider);
    let service_labels = service_labels(&services, provider.is_none());
    let service_spend: Vec<f64> = services.iter().map(|s| s.spend).collect();
    let scope = provider.map(|p| format!(" ({})", p)).unwrap_or_default();

    let app_labels: Vec<String> = data
        .applications
        .iter()
        .map(|a| a.application.clone())
        .collect();
    let app_spend: Vec<f64> = data.applications.iter().map(|a| a.spend).collect();

    const CSP_AXIS: &str = "Cloud Service Provider";

    vec![
        ChartData::new(
            "csp_spend_waterfall",
            "Services Spend Waterfall (All CSPs)".to_string(),
            CSP_AXIS,
            ChartKind::Waterfall,
            SPEND_BLUE,
        )
        .with_series(csp_labels.clone(), csp_spend.clone()),
        ChartData::new(
            "marketplace_waterfall",
            "Marketplace Spend Waterfall (All CSPs)".to_string(),
            CSP_AXIS,
            ChartKind::Waterfall,
            MARKETPLACE_BLUE,
        )
        .with_series(csp_labels.clone(), marketplace.clone()),
        ChartData::new(
            "csp_spend_bar",
            "Services Spend by CSP".to_string(),
            CSP_AXIS,
            ChartKind::Bar,
            SPEND_BLUE,
        )
        .with_series(csp_labels.clone(), csp_spend),
        ChartData::new(
            "marketplace_bar",
            "Marketplace Spend by CSP".to_string(),
            CSP_AXIS,
            ChartKind::Bar,
            MARKETPLACE_BLUE,
        )
        .with_series(csp_labels, marketplace),
        ChartData::new(
            "service_bar",
            format!("Spend by Service{}", scope),
            "Service",
            ChartKind::Bar,
            SPEND_BLUE,
        )
        .with_series(service_labels.clone(), service_spend.clone()),
        ChartData::new(
            "service_pie",
            format!("Service Spend Distribution{}", scope),
            "Service",
            ChartKind::Pie,
            SPEND_BLUE,
        )
        .with_series(service_labels, service_spend),
        ChartData::new(
            "application_bar",
            "Spend by Application".to_string(),
            "Application",
            ChartKind::Bar,
            SPEND_BLUE,
        )
        .with_series(app_labels.clone(), app_spend.clone()),
        ChartData::new(
            "application_heatmap",
            "Application Spend Heatmap".to_string(),
            "Application",
            ChartKind::Heatmap,
            HEAT_HIGH,
        )
        .with_series(app_labels, app_spend),
    ]
}

/// Service names, qualified by provider when rows from several providers are mixed.
fn service_labels(services: &[&ServiceSpend], qualify: bool) -> Vec<String> {
    services
        .iter()
        .map(|s| match (&s.provider, qualify) {
            (Some(p), true) => format!("{} ({})", s.service, p),
            _ => s.service.clone(),
        })
        .collect()
}

/// (start, end) of each waterfall step; every value is a relative change.
pub fn waterfall_steps(values: &[f64]) -> Vec<(f64, f64)> {
    let mut running = 0.0;
    values
        .iter()
        .map(|v| {
            let start = running;
            running += v;
            (start, running)
        })
        .collect()
}

/// Position of each value between the smallest (0.0) and largest (1.0).
pub fn heat_levels(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    values
        .iter()
        .map(|v| if span > 0.0 { (v - min) / span } else { 1.0 })
        .collect()
}

/// Linear blend from `HEAT_LOW` (t = 0) to `HEAT_HIGH` (t = 1).
pub fn heat_color(t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for (i, channel) in out.iter_mut().enumerate() {
        let low = HEAT_LOW[i] as f64;
        let high = HEAT_HIGH[i] as f64;
        *channel = (low + (high - low) * t).round() as u8;
    }
    out
}

pub fn pie_color(index: usize) -> [u8; 3] {
    PIE_PALETTE[index % PIE_PALETTE.len()]
}
