use crate::chart::{Chart, build_chart};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::export::export_csv;
use crate::form::{CircleSpec, ReportMeta};
use crate::pdf::export_pdf;
use crate::points::{PointRecord, generate_points};
use crate::render::render_svg;
use crate::table::PointTable;

/// Everything one request produces, computed in memory.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub points: Vec<PointRecord>,
    pub table: PointTable,
    pub chart: Chart,
    pub svg: String,
    pub csv: Vec<u8>,
    pub pdf: Vec<u8>,
}

/// Runs the full pipeline for one spec. Either every artifact is produced or
/// the first failure is returned.
pub fn generate(spec: &CircleSpec, meta: &ReportMeta, config: &Config) -> Result<Artifacts> {
    let points = generate_points(spec);
    let chart = build_chart(&points, spec, &config.theme, &config.chart);
    if !chart.is_drawable() {
        return Err(Error::InvalidInput(format!(
            "circle extent around ({}, {}) with radius {} is too large to chart",
            spec.center_x, spec.center_y, spec.radius
        )));
    }
    let svg = render_svg(&chart, &config.theme, &config.chart);
    let table = PointTable::from_points(&points, spec.unit);
    let csv = export_csv(&table)?;
    let pdf = export_pdf(meta, &chart, &config.theme, &config.chart, &config.report)?;
    tracing::info!(
        points = points.len(),
        svg_bytes = svg.len(),
        csv_bytes = csv.len(),
        pdf_bytes = pdf.len(),
        "artifacts generated"
    );
    Ok(Artifacts {
        points,
        table,
        chart,
        svg,
        csv,
        pdf,
    })
}
