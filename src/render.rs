use crate::chart::{AxisLabel, Chart};
use crate::config::ChartConfig;
#[cfg(feature = "png")]
use crate::config::RenderConfig;
#[cfg(feature = "png")]
use crate::error::{Error, Result};
use crate::theme::Theme;
use std::fmt::Write as _;

pub fn render_svg(chart: &Chart, theme: &Theme, config: &ChartConfig) -> String {
    let mut svg = String::new();
    let width = chart.width;
    let height = chart.height;

    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    );

    let plot = chart.plot;
    let [dash, gap] = config.grid_dash;
    let _ = write!(
        svg,
        "<g class=\"grid\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{}\" stroke-dasharray=\"{dash} {gap}\">",
        theme.grid_color, config.grid_alpha, config.grid_width
    );
    for segment in &chart.grid {
        let _ = write!(
            svg,
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>",
            segment.from.0, segment.from.1, segment.to.0, segment.to.1
        );
    }
    svg.push_str("</g>");

    let _ = write!(
        svg,
        "<g class=\"ticks\" stroke=\"{}\" stroke-width=\"{}\">",
        theme.axis_color, config.axis_width
    );
    for tick in &chart.x_ticks {
        let _ = write!(
            svg,
            "<line x1=\"{x:.2}\" y1=\"{y1:.2}\" x2=\"{x:.2}\" y2=\"{y2:.2}\"/>",
            x = tick.pos,
            y1 = plot.bottom(),
            y2 = plot.bottom() + config.tick_length
        );
    }
    for tick in &chart.y_ticks {
        let _ = write!(
            svg,
            "<line x1=\"{x1:.2}\" y1=\"{y:.2}\" x2=\"{x2:.2}\" y2=\"{y:.2}\"/>",
            x1 = plot.x - config.tick_length,
            x2 = plot.x,
            y = tick.pos
        );
    }
    svg.push_str("</g>");

    let _ = write!(
        svg,
        "<g class=\"tick-labels\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
        theme.font_family, chart.font_size, theme.text_color
    );
    let x_label_y = chart.x_tick_label_y;
    for tick in &chart.x_ticks {
        let _ = write!(
            svg,
            "<text x=\"{:.2}\" y=\"{x_label_y:.2}\" text-anchor=\"middle\">{}</text>",
            tick.pos,
            escape_xml(&tick.label)
        );
    }
    let y_label_x = chart.y_tick_label_x;
    for tick in &chart.y_ticks {
        let _ = write!(
            svg,
            "<text x=\"{y_label_x:.2}\" y=\"{:.2}\" text-anchor=\"end\">{}</text>",
            tick.pos + chart.font_size * 0.35,
            escape_xml(&tick.label)
        );
    }
    svg.push_str("</g>");

    let _ = write!(
        svg,
        "<rect class=\"frame\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
        plot.x, plot.y, plot.width, plot.height, theme.axis_color, config.axis_width
    );

    let color = chart.series.color.to_hex();
    if let Some(line) = &chart.series.polyline {
        let _ = write!(
            svg,
            "<path class=\"series-line\" d=\"{}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{}\" stroke-linejoin=\"round\"/>",
            points_to_path(line),
            config.line_width
        );
    }
    let _ = write!(svg, "<g class=\"series-markers\" fill=\"{color}\">");
    for (x, y) in &chart.series.markers {
        let _ = write!(
            svg,
            "<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{}\"/>",
            config.marker_radius
        );
    }
    svg.push_str("</g>");

    let (cx, cy) = chart.center;
    let s = config.center_marker_size;
    let _ = write!(
        svg,
        "<path class=\"center\" d=\"M {:.2} {:.2} L {:.2} {:.2} M {:.2} {:.2} L {:.2} {:.2}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"/>",
        cx - s,
        cy - s,
        cx + s,
        cy + s,
        cx - s,
        cy + s,
        cx + s,
        cy - s,
        theme.center_marker_color,
        config.center_marker_width
    );

    svg.push_str(&axis_label_svg(&chart.x_label, chart.font_size, theme));
    svg.push_str(&axis_label_svg(&chart.y_label, chart.font_size, theme));

    svg.push_str("</svg>");
    svg
}

fn axis_label_svg(label: &AxisLabel, font_size: f32, theme: &Theme) -> String {
    let transform = if label.vertical {
        format!(" transform=\"rotate(-90 {:.2} {:.2})\"", label.x, label.y)
    } else {
        String::new()
    };
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\"{transform}>{}</text>",
        label.x,
        label.y,
        theme.font_family,
        font_size,
        theme.text_color,
        escape_xml(&label.text)
    )
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };
    let mut d = format!("M {:.2} {:.2}", first.0, first.1);
    for point in points.iter().skip(1) {
        let _ = write!(d, " L {:.2} {:.2}", point.0, point.1);
    }
    d
}

#[cfg(feature = "png")]
pub fn rasterize_png(svg: &str, render_cfg: &RenderConfig) -> Result<Vec<u8>> {
    let mut opt = usvg::Options {
        font_family: render_cfg.font_family.clone(),
        ..usvg::Options::default()
    };
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|err| Error::Raster(err.to_string()))?;
    let scale = render_cfg.png_scale.max(0.1);
    let size = tree.size();
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| Error::Raster("failed to allocate pixmap".to_string()))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap
        .encode_png()
        .map_err(|err| Error::Raster(err.to_string()))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
