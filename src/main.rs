//! Cloud Cost Dashboard - Cloud Spend Workbook Viewer
//!
//! Usage: cloud_cost_dashboard [config.json]

use anyhow::Result;
use cloud_cost_dashboard::config::DashboardConfig;
use cloud_cost_dashboard::data::WorkbookCache;
use cloud_cost_dashboard::gui::DashboardApp;
use eframe::egui;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DashboardConfig::load(config_path.as_deref())?;
    info!(workbook = %config.workbook.display(), "starting dashboard");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Cloud Cost Dashboard"),
        ..Default::default()
    };

    // The cache lives as long as the window
    let cache = WorkbookCache::new();

    eframe::run_native(
        "Cloud Cost Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, cache)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard window failed: {}", e))
}
