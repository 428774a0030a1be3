//! Cloud Cost Dashboard Main Application
//! Main window with control bar and dashboard body.

use crate::charts::{dashboard_charts, export_charts};
use crate::config::DashboardConfig;
use crate::data::{LoadOutcome, WorkbookCache};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::TopBottomPanel;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// How often the workbook is checked for changes on disk.
const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    cache: WorkbookCache,
    outcome: Arc<LoadOutcome>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    last_refresh: Instant,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        cache: WorkbookCache,
    ) -> Self {
        Self::with_config(config, cache)
    }

    fn with_config(config: DashboardConfig, cache: WorkbookCache) -> Self {
        let outcome = cache.load(&config.workbook, &config.sheets);
        let mut app = Self {
            config,
            cache,
            outcome,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            last_refresh: Instant::now(),
        };
        app.report_outcome();
        app
    }

    /// Load through the cache and refresh status.
    fn load(&mut self) {
        self.outcome = self.cache.load(&self.config.workbook, &self.config.sheets);
        self.report_outcome();
    }

    /// Pick up workbook edits through the cache.
    ///
    /// Returns true when the displayed data changed.
    fn refresh(&mut self) -> bool {
        self.last_refresh = Instant::now();
        let latest = self.cache.load(&self.config.workbook, &self.config.sheets);
        // Uncached loads (missing file) yield a fresh Arc every time
        if Arc::ptr_eq(&latest, &self.outcome) || latest == self.outcome {
            return false;
        }

        debug!(path = %self.config.workbook.display(), "workbook changed on disk");
        self.outcome = latest;
        self.report_outcome();
        true
    }

    fn report_outcome(&mut self) {
        let providers = self.providers();
        self.control_panel.retain_provider(&providers);

        let status = if self.outcome.uses_fallback() {
            format!(
                "Using sample data ({} issue{})",
                self.outcome.diagnostics.len(),
                if self.outcome.diagnostics.len() == 1 { "" } else { "s" }
            )
        } else {
            format!("Loaded {}", self.config.workbook.display())
        };
        self.control_panel.set_status(&status);
    }

    fn providers(&self) -> Vec<String> {
        self.outcome
            .dataset
            .service_providers()
            .into_iter()
            .map(|p| p.to_string())
            .collect()
    }

    /// Handle workbook selection
    fn handle_open_workbook(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel Workbooks", &["xlsx", "xlsm", "xls", "xlsb", "ods"])
            .pick_file()
        {
            info!(path = %path.display(), "workbook selected");
            self.config.workbook = path;
            self.load();
        }
    }

    /// Drop the cached entry so the workbook is re-read even if unchanged.
    fn handle_reload(&mut self) {
        self.cache.invalidate(&self.config.workbook);
        self.load();
    }

    /// Render every chart to PNG in a chosen folder, then open it
    fn handle_export_charts(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        let charts = dashboard_charts(
            &self.outcome.dataset,
            self.control_panel.provider.as_deref(),
        );
        let export = self.config.export;

        match export_charts(&charts, &dir, export.width, export.height) {
            Ok(paths) => {
                self.control_panel
                    .set_status(&format!("Exported {} charts to {}", paths.len(), dir.display()));
                if let Err(e) = open::that(&dir) {
                    warn!(dir = %dir.display(), error = %e, "could not open export folder");
                }
            }
            Err(e) => {
                error!(error = %e, "chart export failed");
                self.control_panel.set_status(&format!("Export error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.last_refresh.elapsed() >= REFRESH_INTERVAL {
            self.refresh();
        }
        ctx.request_repaint_after(REFRESH_INTERVAL);

        let providers = self.providers();

        // Top bar - Control Panel
        TopBottomPanel::top("control_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            let action = self
                .control_panel
                .show(ui, &self.config.workbook, &providers);
            ui.add_space(4.0);

            match action {
                ControlPanelAction::OpenWorkbook => self.handle_open_workbook(),
                ControlPanelAction::Reload => self.handle_reload(),
                ControlPanelAction::ExportCharts => self.handle_export_charts(),
                ControlPanelAction::None => {}
            }
        });

        // Central panel - Dashboard
        let outcome = Arc::clone(&self.outcome);
        let provider = self.control_panel.provider.clone();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &outcome, provider.as_deref());
        });
    }
}
