//! Static Chart Renderer
//! Renders dashboard charts to PNG bytes with plotters.
//!
//! Layout per kind:
//! - Bar / Waterfall: captioned cartesian chart, categories on x, spend on y,
//!   value label above each bar
//! - Pie: captioned pie with label and percentage per slice
//! - Heatmap: one row of shaded cells with the spend printed in each

use crate::charts::dashboard::{
    heat_color, heat_levels, pie_color, waterfall_steps, ChartData, ChartKind,
};
use crate::stats::format_currency;
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;
use std::io::Cursor;
use thiserror::Error;

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Pixel buffer does not match {0}x{1}")]
    Buffer(u32, u32),
}

fn draw_err<E: Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn rgb(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Render a chart into an in-memory PNG.
    pub fn render_png(chart: &ChartData, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            match chart.kind {
                ChartKind::Bar => {
                    let bars: Vec<(f64, f64)> = chart.values.iter().map(|v| (0.0, *v)).collect();
                    Self::draw_bars(&root, chart, &bars)?;
                }
                ChartKind::Waterfall => {
                    Self::draw_bars(&root, chart, &waterfall_steps(&chart.values))?;
                }
                ChartKind::Pie => Self::draw_pie(&root, chart)?,
                ChartKind::Heatmap => Self::draw_heatmap(&root, chart)?,
            }

            root.present().map_err(draw_err)?;
        }

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::Buffer(width, height))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Bars spanning (low, high) for each category.
    fn draw_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
        spans: &[(f64, f64)],
    ) -> Result<(), RenderError> {
        let n = spans.len().max(1) as u32;
        let top = spans.iter().map(|(_, hi)| *hi).fold(0.0, f64::max);
        let y_max = if top > 0.0 { top * 1.15 } else { 1.0 };
        let labels = &chart.labels;

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(90)
            .build_cartesian_2d((0u32..n).into_segmented(), 0f64..y_max)
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_desc(chart.x_title.as_str())
            .y_desc("Spend ($)")
            .x_label_formatter(&|v| segment_label(labels, v))
            .y_label_formatter(&|v| format_currency(*v))
            .draw()
            .map_err(draw_err)?;

        let fill = rgb(chart.color).filled();
        ctx.draw_series(
            spans
                .iter()
                .enumerate()
                .map(|(i, (lo, hi))| segment_rect(i as u32, n, *lo, *hi, fill, 12)),
        )
        .map_err(draw_err)?;

        let value_style = TextStyle::from((FONT, 14).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        ctx.draw_series(spans.iter().enumerate().map(|(i, (lo, hi))| {
            Text::new(
                format_currency(hi - lo),
                (SegmentValue::CenterOf(i as u32), *hi),
                value_style.clone(),
            )
        }))
        .map_err(draw_err)?;

        Ok(())
    }

    fn draw_pie<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
    ) -> Result<(), RenderError> {
        let area = root.titled(&chart.title, (FONT, 24)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();

        if chart.total() <= 0.0 {
            let style = TextStyle::from((FONT, 18).into_font())
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center));
            area.draw_text("No spend recorded", &style, (w as i32 / 2, h as i32 / 2))
                .map_err(draw_err)?;
            return Ok(());
        }

        let center = (w as i32 / 2, h as i32 / 2);
        let radius = w.min(h) as f64 * 0.35;
        let colors: Vec<RGBColor> = (0..chart.values.len()).map(|i| rgb(pie_color(i))).collect();
        let labels: Vec<String> = chart
            .labels
            .iter()
            .zip(&chart.values)
            .map(|(label, value)| format!("{} {}", label, format_currency(*value)))
            .collect();

        let mut pie = Pie::new(&center, &radius, &chart.values, &colors, &labels);
        pie.label_style((FONT, 16).into_font().color(&BLACK));
        pie.percentages((FONT, 14).into_font().color(&WHITE));
        area.draw(&pie).map_err(draw_err)?;
        Ok(())
    }

    fn draw_heatmap<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
    ) -> Result<(), RenderError> {
        let n = chart.values.len().max(1) as u32;
        let labels = &chart.labels;

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d((0u32..n).into_segmented(), 0f64..1f64)
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .disable_mesh()
            .x_desc(chart.x_title.as_str())
            .y_desc(format!("{} Spend", chart.x_title))
            .x_label_formatter(&|v| segment_label(labels, v))
            .y_label_formatter(&|_| String::new())
            .draw()
            .map_err(draw_err)?;

        let levels = heat_levels(&chart.values);
        ctx.draw_series(
            levels
                .iter()
                .enumerate()
                .map(|(i, t)| segment_rect(i as u32, n, 0.0, 1.0, rgb(heat_color(*t)).filled(), 0)),
        )
        .map_err(draw_err)?;

        ctx.draw_series(chart.values.iter().zip(&levels).enumerate().map(|(i, (v, t))| {
            let color: &RGBColor = if *t > 0.5 { &WHITE } else { &BLACK };
            Text::new(
                format_currency(*v),
                (SegmentValue::CenterOf(i as u32), 0.5),
                TextStyle::from((FONT, 16).into_font())
                    .color(color)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            )
        }))
        .map_err(draw_err)?;

        Ok(())
    }
}

/// Category name at a segment center; blank elsewhere.
fn segment_label(labels: &[String], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Rectangle filling segment `i` of `n` between `lo` and `hi`.
fn segment_rect(
    i: u32,
    n: u32,
    lo: f64,
    hi: f64,
    style: ShapeStyle,
    side_margin: u32,
) -> Rectangle<(SegmentValue<u32>, f64)> {
    let right = if i + 1 < n {
        SegmentValue::Exact(i + 1)
    } else {
        SegmentValue::Last
    };
    let mut rect = Rectangle::new([(SegmentValue::Exact(i), lo), (right, hi)], style);
    rect.set_margin(0, 0, side_margin, side_margin);
    rect
}
