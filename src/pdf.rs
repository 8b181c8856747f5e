use crate::chart::Chart;
use crate::config::{ChartConfig, ReportConfig};
use crate::error::{Error, Result};
use crate::form::{Color, ReportMeta};
use crate::text::text_width;
use crate::theme::Theme;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    IndirectFontRef, Line, LineDashPattern, Mm, PdfDocument, PdfLayerReference, Point,
    Polygon, Rgb, TextMatrix,
};
use std::io::BufWriter;

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;
/// The report always carries a cover page and a chart page.
pub const PAGE_COUNT: usize = 2;

const PT_TO_MM: f32 = 25.4 / 72.0;
const MARKER_SEGMENTS: usize = 16;

/// Embedded so every report renders the same glyphs, including Latin
/// Extended names, regardless of installed fonts.
const REPORT_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

/// Two-page report: an A4 cover with the metadata, then the chart on a page
/// cropped to its visible extent. Chart px are laid out 1:1 as pt.
pub fn export_pdf(
    meta: &ReportMeta,
    chart: &Chart,
    theme: &Theme,
    chart_cfg: &ChartConfig,
    report_cfg: &ReportConfig,
) -> Result<Vec<u8>> {
    let face = ttf_parser::Face::parse(REPORT_FONT, 0).map_err(|err| Error::Pdf(err.to_string()))?;
    check_renderable(&face, "author name", &meta.author_name)?;
    check_renderable(&face, "contact", &meta.contact_info)?;

    let (doc, cover_page, cover_layer) = PdfDocument::new(
        report_cfg.title.as_str(),
        Mm(A4_WIDTH_MM),
        Mm(A4_HEIGHT_MM),
        "Cover",
    );
    let font = doc.add_external_font(REPORT_FONT)?;

    let cover = doc.get_page(cover_page).get_layer(cover_layer);
    write_cover(&cover, &font, meta, report_cfg);

    let (chart_page, chart_layer) = doc.add_page(
        Mm(chart.width * PT_TO_MM),
        Mm(chart.height * PT_TO_MM),
        "Chart",
    );
    let canvas = ChartCanvas {
        layer: doc.get_page(chart_page).get_layer(chart_layer),
        font: &font,
        page_height: chart.height,
    };
    canvas.draw(chart, theme, chart_cfg);

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)?;
    let bytes = writer
        .into_inner()
        .map_err(|err| Error::Io(err.into_error()))?;
    tracing::debug!(bytes = bytes.len(), pages = PAGE_COUNT, "pdf exported");
    Ok(bytes)
}

/// Characters of `text` the report font has no glyph for. Whitespace is
/// ignored.
pub fn missing_glyphs(face: &ttf_parser::Face<'_>, text: &str) -> Vec<char> {
    let mut missing: Vec<char> = text
        .chars()
        .filter(|ch| !ch.is_whitespace() && face.glyph_index(*ch).is_none())
        .collect();
    missing.dedup();
    missing
}

fn check_renderable(face: &ttf_parser::Face<'_>, field: &str, text: &str) -> Result<()> {
    let missing = missing_glyphs(face, text);
    if missing.is_empty() {
        return Ok(());
    }
    let chars: String = missing.into_iter().collect();
    Err(Error::InvalidInput(format!(
        "{field} contains characters the report font cannot render: {chars}"
    )))
}

/// Lines of the cover text block, top to bottom.
pub fn cover_lines(meta: &ReportMeta, report_cfg: &ReportConfig) -> Vec<String> {
    let mut lines = vec![
        report_cfg.title.clone(),
        String::new(),
        format!("{}: {}", report_cfg.author_label, meta.author_name),
        format!("{}: {}", report_cfg.contact_label, meta.contact_info),
        String::new(),
        format!("{}:", report_cfg.parameters_heading),
    ];
    lines.extend(meta.parameter_summary.lines().map(str::to_string));
    lines
}

fn write_cover(layer: &PdfLayerReference, font: &IndirectFontRef, meta: &ReportMeta, report_cfg: &ReportConfig) {
    let x = A4_WIDTH_MM * report_cfg.margin_ratio;
    let top = A4_HEIGHT_MM * (1.0 - report_cfg.margin_ratio);
    let step = report_cfg.font_size * report_cfg.line_height * PT_TO_MM;
    let mut baseline = top - report_cfg.font_size * PT_TO_MM;
    for line in cover_lines(meta, report_cfg) {
        if !line.is_empty() {
            layer.use_text(line, report_cfg.font_size, Mm(x), Mm(baseline), font);
        }
        baseline -= step;
    }
}

struct ChartCanvas<'a> {
    layer: PdfLayerReference,
    font: &'a IndirectFontRef,
    page_height: f32,
}

impl ChartCanvas<'_> {
    fn draw(&self, chart: &Chart, theme: &Theme, config: &ChartConfig) {
        let plot = chart.plot;

        let grid = theme_color(&theme.grid_color).blend_over_white(config.grid_alpha);
        self.set_stroke(grid, config.grid_width);
        let [dash, gap] = config.grid_dash;
        self.layer.set_line_dash_pattern(LineDashPattern {
            dash_1: Some(dash.round().max(1.0) as i64),
            gap_1: Some(gap.round().max(1.0) as i64),
            ..LineDashPattern::default()
        });
        for segment in &chart.grid {
            self.line(&[segment.from, segment.to], false);
        }
        self.layer.set_line_dash_pattern(LineDashPattern::default());

        self.set_stroke(theme_color(&theme.axis_color).to_unit_rgb(), config.axis_width);
        for tick in &chart.x_ticks {
            self.line(&[(tick.pos, plot.bottom()), (tick.pos, plot.bottom() + config.tick_length)], false);
        }
        for tick in &chart.y_ticks {
            self.line(&[(plot.x - config.tick_length, tick.pos), (plot.x, tick.pos)], false);
        }
        self.line(
            &[
                (plot.x, plot.y),
                (plot.right(), plot.y),
                (plot.right(), plot.bottom()),
                (plot.x, plot.bottom()),
            ],
            true,
        );

        self.set_fill(theme_color(&theme.text_color).to_unit_rgb());
        for tick in &chart.x_ticks {
            let w = text_width(&tick.label, chart.font_size);
            self.text(&tick.label, chart.font_size, tick.pos - w / 2.0, chart.x_tick_label_y);
        }
        for tick in &chart.y_ticks {
            let w = text_width(&tick.label, chart.font_size);
            self.text(
                &tick.label,
                chart.font_size,
                chart.y_tick_label_x - w,
                tick.pos + chart.font_size * 0.35,
            );
        }
        let x_label = &chart.x_label;
        let w = text_width(&x_label.text, chart.font_size);
        self.text(&x_label.text, chart.font_size, x_label.x - w / 2.0, x_label.y);
        let y_label = &chart.y_label;
        let w = text_width(&y_label.text, chart.font_size);
        self.vertical_text(&y_label.text, chart.font_size, y_label.x, y_label.y + w / 2.0);

        let series_rgb = chart.series.color.to_unit_rgb();
        if let Some(polyline) = &chart.series.polyline {
            self.set_stroke(series_rgb, config.line_width);
            self.line(polyline, false);
        }
        self.set_fill(series_rgb);
        for (x, y) in &chart.series.markers {
            self.disc(*x, *y, config.marker_radius);
        }

        let (cx, cy) = chart.center;
        let s = config.center_marker_size;
        self.set_stroke(
            theme_color(&theme.center_marker_color).to_unit_rgb(),
            config.center_marker_width,
        );
        self.line(&[(cx - s, cy - s), (cx + s, cy + s)], false);
        self.line(&[(cx - s, cy + s), (cx + s, cy - s)], false);
    }

    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(Mm(x * PT_TO_MM), Mm((self.page_height - y) * PT_TO_MM))
    }

    fn set_stroke(&self, (r, g, b): (f32, f32, f32), width: f32) {
        self.layer
            .set_outline_color(printpdf::Color::Rgb(Rgb::new(r, g, b, None)));
        self.layer.set_outline_thickness(width);
    }

    fn set_fill(&self, (r, g, b): (f32, f32, f32)) {
        self.layer
            .set_fill_color(printpdf::Color::Rgb(Rgb::new(r, g, b, None)));
    }

    fn line(&self, points: &[(f32, f32)], closed: bool) {
        if points.len() < 2 {
            return;
        }
        self.layer.add_line(Line {
            points: points.iter().map(|(x, y)| (self.point(*x, *y), false)).collect(),
            is_closed: closed,
        });
    }

    fn disc(&self, cx: f32, cy: f32, radius: f32) {
        let ring = (0..MARKER_SEGMENTS)
            .map(|i| {
                let theta = i as f32 / MARKER_SEGMENTS as f32 * std::f32::consts::TAU;
                (self.point(cx + radius * theta.cos(), cy + radius * theta.sin()), false)
            })
            .collect();
        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn text(&self, text: &str, size: f32, x: f32, baseline: f32) {
        let origin = self.point(x, baseline);
        self.layer.use_text(text, size, Mm::from(origin.x), Mm::from(origin.y), self.font);
    }

    fn vertical_text(&self, text: &str, size: f32, x: f32, baseline_start: f32) {
        let origin = self.point(x, baseline_start);
        self.layer.begin_text_section();
        self.layer.set_font(self.font, size);
        self.layer
            .set_text_matrix(TextMatrix::TranslateRotate(origin.x, origin.y, 90.0));
        self.layer.write_text(text, self.font);
        self.layer.end_text_section();
    }
}

fn theme_color(value: &str) -> Color {
    value.parse().unwrap_or_else(|_| {
        tracing::warn!(color = value, "theme color is not hex, using black in pdf");
        Color::rgb(0, 0, 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_chart;
    use crate::form::CircleSpec;
    use crate::points::generate_points;

    fn count_pages(bytes: &[u8]) -> usize {
        let text = String::from_utf8_lossy(bytes);
        let mut count = 0;
        let mut rest = text.as_ref();
        while let Some(idx) = rest.find("/Type") {
            rest = &rest[idx + "/Type".len()..];
            let trimmed = rest.trim_start();
            if let Some(after) = trimmed.strip_prefix("/Page")
                && !after.starts_with('s')
            {
                count += 1;
            }
        }
        count
    }

    fn export_for(spec: &CircleSpec, author: &str, contact: &str) -> Result<Vec<u8>> {
        let theme = Theme::classic();
        let chart_cfg = ChartConfig::default();
        let chart = build_chart(&generate_points(spec), spec, &theme, &chart_cfg);
        let meta = ReportMeta::new(author, contact, spec);
        export_pdf(&meta, &chart, &theme, &chart_cfg, &ReportConfig::default())
    }

    fn report_for(spec: &CircleSpec) -> Vec<u8> {
        export_for(spec, "Ada Lovelace", "ada@example.org").unwrap()
    }

    fn face() -> ttf_parser::Face<'static> {
        ttf_parser::Face::parse(REPORT_FONT, 0).unwrap()
    }

    #[test]
    fn always_two_pages() {
        for spec in [
            CircleSpec::default(),
            CircleSpec::new(0.0, 0.0, 0.0, 3),
            CircleSpec::new(-1e3, 4e3, 1e4, 500).with_line(false),
        ] {
            let bytes = report_for(&spec);
            assert!(bytes.starts_with(b"%PDF"));
            assert_eq!(count_pages(&bytes), PAGE_COUNT);
        }
    }

    #[test]
    fn cover_lists_fields_in_order() {
        let spec = CircleSpec::new(1.0, 2.0, 3.0, 10);
        let meta = ReportMeta::new("Ada", "ada@example.org", &spec);
        let lines = cover_lines(&meta, &ReportConfig::default());
        assert_eq!(lines[0], "Report");
        assert_eq!(lines[2], "Author: Ada");
        assert_eq!(lines[3], "Contact: ada@example.org");
        assert_eq!(lines[5], "Parameters:");
        assert_eq!(lines[6], "Center: (1.0, 2.0) m");
        assert_eq!(lines.last().map(String::as_str), Some("Connect with line: true"));
    }

    #[test]
    fn report_font_covers_czech_names() {
        let face = face();
        assert!(missing_glyphs(&face, "Tvoje Jméno Žluťoučký kůň").is_empty());
        assert!(missing_glyphs(&face, "ěščřžýáíéúůďťň ĚŠČŘŽÝÁÍÉÚŮĎŤŇ").is_empty());
        assert_eq!(missing_glyphs(&face, "Tokyo 東京"), vec!['東', '京']);
    }

    #[test]
    fn non_ascii_author_is_embedded() {
        let bytes = export_for(&CircleSpec::default(), "Tvoje Jméno Žluťoučký", "kůň@example.cz").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(count_pages(&bytes), PAGE_COUNT);
        assert!(String::from_utf8_lossy(&bytes).contains("/FontFile2"));
    }

    #[test]
    fn unrenderable_author_is_rejected() {
        let err = export_for(&CircleSpec::default(), "Tvoje Jméno 東京", "a@b.c").unwrap_err();
        match err {
            Error::InvalidInput(msg) => {
                assert!(msg.contains("author name"));
                assert!(msg.contains("東京"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            export_for(&CircleSpec::default(), "Ada", "連絡"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn non_hex_theme_color_falls_back_to_black() {
        assert_eq!(theme_color("black"), Color::rgb(0, 0, 0));
        assert_eq!(theme_color("#ffffff"), Color::rgb(255, 255, 255));
    }
}
