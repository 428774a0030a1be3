//! Charts module - chart definitions, interactive plots and static rendering

mod dashboard;
mod export;
mod plotter;
mod renderer;

pub use dashboard::{
    dashboard_charts, heat_color, heat_levels, waterfall_steps, ChartData, ChartKind,
};
pub use export::{export_charts, ExportError};
pub use plotter::ChartPlotter;
pub use renderer::{ChartRenderer, RenderError};
