//! Chart Viewer Widget
//! Scrollable dashboard body: fallback notice, summary metrics, the CSP,
//! Services and Application sections, and the data tables.

use crate::charts::{dashboard_charts, ChartData, ChartPlotter};
use crate::data::frames::{applications_frame, csp_frame, display_rows, services_frame};
use crate::data::{LoadError, LoadOutcome, LogicalTable, TableSource};
use crate::stats::{format_currency, SpendStats, SummaryMetrics};
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::{DataFrame, PolarsResult};

const SECTION_SPACING: f32 = 15.0;
const NOTICE_FILL: Color32 = Color32::from_rgb(70, 20, 24);
const NOTICE_TEXT: Color32 = Color32::from_rgb(255, 130, 130);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableTab {
    #[default]
    Csp,
    Services,
    Application,
}

/// Dashboard body. Every derived value is rebuilt from the outcome on each frame.
#[derive(Default)]
pub struct ChartViewer {
    pub table_tab: TableTab,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, outcome: &LoadOutcome, provider: Option<&str>) {
        let charts = dashboard_charts(&outcome.dataset, provider);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::draw_notice(ui, outcome);
                Self::draw_metrics(ui, &SummaryMetrics::from_dataset(&outcome.dataset));
                ui.separator();

                Self::section_header(
                    ui,
                    "🏢 Cloud Service Provider Overview",
                    outcome,
                    LogicalTable::Csp,
                );
                Self::draw_pair(ui, &charts[0], &charts[1]);
                Self::draw_pair(ui, &charts[2], &charts[3]);
                Self::draw_stats(ui, &charts[2]);
                ui.add_space(SECTION_SPACING);
                ui.separator();

                Self::section_header(ui, "🔧 Services Overview", outcome, LogicalTable::Services);
                Self::draw_pair(ui, &charts[4], &charts[5]);
                Self::draw_stats(ui, &charts[4]);
                ui.add_space(SECTION_SPACING);
                ui.separator();

                Self::section_header(
                    ui,
                    "📱 Application Overview",
                    outcome,
                    LogicalTable::Application,
                );
                Self::draw_pair(ui, &charts[6], &charts[7]);
                Self::draw_stats(ui, &charts[6]);
                ui.add_space(SECTION_SPACING);
                ui.separator();

                self.draw_tables(ui, outcome, provider);
            });
    }

    /// Shown whenever any table is sample data.
    fn draw_notice(ui: &mut egui::Ui, outcome: &LoadOutcome) {
        let Some(notice) = outcome.notice() else {
            return;
        };

        egui::Frame::none()
            .fill(NOTICE_FILL)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                for line in notice.lines() {
                    ui.label(RichText::new(line).color(NOTICE_TEXT));
                }
                if let Some(hint) = sheet_hint(outcome) {
                    ui.label(hint);
                }
            });
        ui.add_space(SECTION_SPACING);
    }

    fn draw_metrics(ui: &mut egui::Ui, metrics: &SummaryMetrics) {
        ui.columns(4, |cols| {
            for (col, (label, value)) in cols.iter_mut().zip(metrics.cards()) {
                col.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                col.label(RichText::new(format_currency(value)).size(24.0).strong());
            }
        });
        ui.add_space(SECTION_SPACING);
    }

    fn section_header(ui: &mut egui::Ui, title: &str, outcome: &LoadOutcome, table: LogicalTable) {
        ui.horizontal(|ui| {
            ui.heading(title);
            match outcome.source(table) {
                TableSource::Workbook { sheet } => {
                    ui.label(RichText::new(format!("sheet: {}", sheet)).color(Color32::GRAY));
                }
                TableSource::Fallback => {
                    ui.label(RichText::new("sample data").color(NOTICE_TEXT).strong());
                }
            }
        });
        ui.add_space(5.0);
    }

    fn draw_pair(ui: &mut egui::Ui, left: &ChartData, right: &ChartData) {
        ui.columns(2, |cols| {
            ChartPlotter::draw_chart(&mut cols[0], left);
            ChartPlotter::draw_chart(&mut cols[1], right);
        });
        ui.add_space(SECTION_SPACING);
    }

    fn draw_stats(ui: &mut egui::Ui, chart: &ChartData) {
        let stats = SpendStats::from_values(&chart.values);
        ui.label(RichText::new(stats.summary()).size(11.0).color(Color32::GRAY));
    }

    fn draw_tables(&mut self, ui: &mut egui::Ui, outcome: &LoadOutcome, provider: Option<&str>) {
        ui.heading("📊 Data Tables");
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.table_tab, TableTab::Csp, "CSP Data");
            ui.selectable_value(&mut self.table_tab, TableTab::Services, "Services Data");
            ui.selectable_value(&mut self.table_tab, TableTab::Application, "Application Data");
        });
        ui.add_space(5.0);

        let data = &outcome.dataset;
        let (subtitle, frame): (&str, PolarsResult<DataFrame>) = match self.table_tab {
            TableTab::Csp => ("Cloud Service Provider Spending", csp_frame(&data.csp)),
            TableTab::Services => (
                "Services Spending",
                services_frame(&data.services_for(provider)),
            ),
            TableTab::Application => (
                "Application Spending",
                applications_frame(&data.applications),
            ),
        };

        ui.label(RichText::new(subtitle).size(14.0).strong());
        match frame {
            Ok(df) => Self::draw_frame(ui, &df),
            Err(e) => {
                ui.colored_label(Color32::RED, format!("Table error: {}", e));
            }
        }
    }

    fn draw_frame(ui: &mut egui::Ui, df: &DataFrame) {
        let (headers, rows) = display_rows(df);

        egui::Grid::new("data_table")
            .striped(true)
            .min_col_width(90.0)
            .show(ui, |ui| {
                for header in &headers {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for row in &rows {
                    for cell in row {
                        ui.label(cell.as_str());
                    }
                    ui.end_row();
                }
            });
    }
}

/// Workbook sheet list, unless a missing-sheet diagnostic already names it.
fn sheet_hint(outcome: &LoadOutcome) -> Option<String> {
    let listed = outcome
        .diagnostics
        .iter()
        .any(|d| matches!(d, LoadError::SheetMissing { .. }));
    if listed || outcome.available_sheets.is_empty() {
        return None;
    }
    Some(format!(
        "Available sheets in Excel file: {}",
        outcome.available_sheets.join(", ")
    ))
}
