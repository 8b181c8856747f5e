use crate::error::Result;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Side of the square plot area, in px.
    pub plot_size: f32,
    pub pad_ratio: f64,
    /// Pad used when the radius is zero, in data units.
    pub fallback_pad: f64,
    pub tick_count: usize,
    pub tick_length: f32,
    pub marker_radius: f32,
    pub line_width: f32,
    pub grid_width: f32,
    pub grid_dash: [f32; 2],
    pub grid_alpha: f32,
    pub center_marker_size: f32,
    pub center_marker_width: f32,
    pub axis_width: f32,
    /// Whitespace kept around the visible extent when cropping.
    pub margin: f32,
    pub close_polyline: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            plot_size: 432.0,
            pad_ratio: 0.3,
            fallback_pad: 1.0,
            tick_count: 9,
            tick_length: 3.5,
            marker_radius: 3.0,
            line_width: 1.5,
            grid_width: 0.8,
            grid_dash: [3.7, 1.6],
            grid_alpha: 0.6,
            center_marker_size: 4.5,
            center_marker_width: 1.5,
            axis_width: 0.8,
            margin: 7.2,
            close_polyline: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub title: String,
    pub author_label: String,
    pub contact_label: String,
    pub parameters_heading: String,
    /// Cover text size, in pt.
    pub font_size: f32,
    pub line_height: f32,
    /// Offset of the cover text block from the top-left corner, as a
    /// fraction of the page size.
    pub margin_ratio: f32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Report".to_string(),
            author_label: "Author".to_string(),
            contact_label: "Contact".to_string(),
            parameters_heading: "Parameters".to_string(),
            font_size: 12.0,
            line_height: 1.4,
            margin_ratio: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub png_scale: f32,
    pub font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            png_scale: 2.0,
            font_family: "DejaVu Sans".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub chart: ChartConfig,
    pub report: ReportConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    chart: Option<ChartOverrides>,
    report: Option<ReportOverrides>,
    render: Option<RenderOverrides>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    text_color: Option<String>,
    axis_color: Option<String>,
    grid_color: Option<String>,
    center_marker_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartOverrides {
    plot_size: Option<f32>,
    pad_ratio: Option<f64>,
    fallback_pad: Option<f64>,
    tick_count: Option<usize>,
    marker_radius: Option<f32>,
    line_width: Option<f32>,
    grid_dash: Option<[f32; 2]>,
    grid_alpha: Option<f32>,
    close_polyline: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportOverrides {
    title: Option<String>,
    author_label: Option<String>,
    contact_label: Option<String>,
    parameters_heading: Option<String>,
    font_size: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderOverrides {
    png_scale: Option<f32>,
    font_family: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::info!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => tracing::warn!(theme = other, "unknown theme, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.axis_color {
            config.theme.axis_color = v;
        }
        if let Some(v) = vars.grid_color {
            config.theme.grid_color = v;
        }
        if let Some(v) = vars.center_marker_color {
            config.theme.center_marker_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(chart) = parsed.chart {
        let target = &mut config.chart;
        if let Some(v) = chart.plot_size {
            target.plot_size = v.max(50.0);
        }
        if let Some(v) = chart.pad_ratio {
            target.pad_ratio = v.max(0.0);
        }
        if let Some(v) = chart.fallback_pad {
            target.fallback_pad = v;
        }
        if let Some(v) = chart.tick_count {
            target.tick_count = v.max(2);
        }
        if let Some(v) = chart.marker_radius {
            target.marker_radius = v;
        }
        if let Some(v) = chart.line_width {
            target.line_width = v;
        }
        if let Some(v) = chart.grid_dash {
            target.grid_dash = v;
        }
        if let Some(v) = chart.grid_alpha {
            target.grid_alpha = v.clamp(0.0, 1.0);
        }
        if let Some(v) = chart.close_polyline {
            target.close_polyline = v;
        }
    }

    if let Some(report) = parsed.report {
        if let Some(v) = report.title {
            config.report.title = v;
        }
        if let Some(v) = report.author_label {
            config.report.author_label = v;
        }
        if let Some(v) = report.contact_label {
            config.report.contact_label = v;
        }
        if let Some(v) = report.parameters_heading {
            config.report.parameters_heading = v;
        }
        if let Some(v) = report.font_size {
            config.report.font_size = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.png_scale {
            config.render.png_scale = v;
        }
        if let Some(v) = render.font_family {
            config.render.font_family = v;
        }
    }

    Ok(config)
}
