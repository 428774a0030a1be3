//! Chart Export Module
//! Renders every dashboard chart to a PNG file in one folder.

use crate::charts::dashboard::ChartData;
use crate::charts::renderer::{ChartRenderer, RenderError};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to render chart '{id}': {source}")]
    Render {
        id: String,
        #[source]
        source: RenderError,
    },
    #[error("Failed to write chart file: {0}")]
    Io(#[from] std::io::Error),
}

/// File name a chart is exported under.
pub fn export_file_name(chart: &ChartData) -> String {
    format!("{}.png", chart.id)
}

/// Render charts in parallel, then write `<id>.png` files into `dir`.
///
/// Returns the written paths in chart order. Nothing is written if any chart
/// fails to render.
pub fn export_charts(
    charts: &[ChartData],
    dir: &Path,
    width: u32,
    height: u32,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;

    let rendered: Vec<(PathBuf, Vec<u8>)> = charts
        .par_iter()
        .map(|chart| {
            ChartRenderer::render_png(chart, width, height)
                .map(|png| (dir.join(export_file_name(chart)), png))
                .map_err(|source| ExportError::Render {
                    id: chart.id.clone(),
                    source,
                })
        })
        .collect::<Result<_, _>>()?;

    let mut written = Vec::with_capacity(rendered.len());
    for (path, png) in rendered {
        fs::write(&path, png)?;
        written.push(path);
    }

    info!(dir = %dir.display(), charts = written.len(), "exported charts");
    Ok(written)
}
