//! Chart Plotter Module
//! Draws the dashboard charts interactively using egui_plot.

use crate::charts::dashboard::{
    heat_color, heat_levels, pie_color, waterfall_steps, ChartData, ChartKind,
};
use crate::stats::{format_currency, percent_of_total};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Plot};

const CHART_HEIGHT: f32 = 300.0;
const BAR_WIDTH: f64 = 0.6;

pub fn color32(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Draws spend charts inside egui panels.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw one chart with its title.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartData) {
        ui.label(RichText::new(&chart.title).size(14.0).strong());

        if chart.values.is_empty() {
            ui.label(RichText::new("No rows").color(Color32::GRAY));
            return;
        }

        match chart.kind {
            ChartKind::Bar => Self::draw_bars(ui, chart, Self::plain_bars(chart), "Spend ($)"),
            ChartKind::Waterfall => {
                Self::draw_bars(ui, chart, Self::waterfall_bars(chart), "Spend ($)")
            }
            ChartKind::Pie => Self::draw_bars(ui, chart, Self::share_bars(chart), "Share (%)"),
            ChartKind::Heatmap => Self::draw_heat_strip(ui, chart),
        }
    }

    fn plain_bars(chart: &ChartData) -> Vec<Bar> {
        let fill = color32(chart.color);
        chart
            .labels
            .iter()
            .zip(&chart.values)
            .enumerate()
            .map(|(i, (label, &value))| {
                Bar::new(i as f64, value)
                    .name(format!("{}: {}", label, format_currency(value)))
                    .fill(fill)
                    .width(BAR_WIDTH)
            })
            .collect()
    }

    /// Each step floats on the running total of the steps before it.
    fn waterfall_bars(chart: &ChartData) -> Vec<Bar> {
        let fill = color32(chart.color);
        waterfall_steps(&chart.values)
            .into_iter()
            .zip(&chart.labels)
            .enumerate()
            .map(|(i, ((start, end), label))| {
                Bar::new(i as f64, end - start)
                    .base_offset(start)
                    .name(format!("{}: {}", label, format_currency(end - start)))
                    .fill(fill)
                    .width(BAR_WIDTH)
            })
            .collect()
    }

    /// Pie slices as percentage bars, colored like the static pie.
    fn share_bars(chart: &ChartData) -> Vec<Bar> {
        percent_of_total(&chart.values)
            .into_iter()
            .zip(chart.labels.iter().zip(&chart.values))
            .enumerate()
            .map(|(i, (pct, (label, &value)))| {
                Bar::new(i as f64, pct)
                    .name(format!("{}: {:.1}% ({})", label, pct, format_currency(value)))
                    .fill(color32(pie_color(i)))
                    .width(BAR_WIDTH)
            })
            .collect()
    }

    fn draw_bars(ui: &mut egui::Ui, chart: &ChartData, bars: Vec<Bar>, y_label: &str) {
        let x_labels = chart.labels.clone();

        Plot::new(format!("plot_{}", chart.id))
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label(chart.x_title.clone())
            .y_axis_label(y_label.to_string())
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if v < 0.0 || (v - v.round()).abs() > 1e-6 {
                    return String::new();
                }
                x_labels.get(v.round() as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color32(chart.color)));
            });
    }

    /// Single-row heatmap: one shaded cell per category.
    fn draw_heat_strip(ui: &mut egui::Ui, chart: &ChartData) {
        let levels = heat_levels(&chart.values);

        ui.horizontal_wrapped(|ui| {
            for ((label, &value), level) in chart.labels.iter().zip(&chart.values).zip(levels) {
                let text_color = if level > 0.5 {
                    Color32::WHITE
                } else {
                    Color32::BLACK
                };

                egui::Frame::none()
                    .fill(color32(heat_color(level)))
                    .rounding(4.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_min_width(110.0);
                        ui.vertical_centered(|ui| {
                            ui.label(RichText::new(label).color(text_color).strong());
                            ui.label(RichText::new(format_currency(value)).color(text_color));
                        });
                    });
            }
        });
        ui.label(RichText::new(&chart.x_title).size(11.0).color(Color32::GRAY));
    }
}
