use crate::config::ChartConfig;
use crate::form::{CircleSpec, Color};
use crate::points::PointRecord;
use crate::text::{format_tick, text_width, tick_decimals};
use crate::theme::Theme;

const LABEL_GAP: f32 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Pixel position along the axis.
    pub pos: f32,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: (f32, f32),
    pub to: (f32, f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub vertical: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub markers: Vec<(f32, f32)>,
    /// Connecting line through the markers, in sequence order.
    pub polyline: Option<Vec<(f32, f32)>>,
    pub color: Color,
}

/// Data-space extent of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn around(center: f64, radius: f64, pad: f64) -> Self {
        Self {
            min: center - radius - pad,
            max: center + radius + pad,
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether `steps` intervals across the span land on distinct floats.
    pub fn resolves(&self, steps: usize) -> bool {
        let span = self.span();
        let magnitude = self.min.abs().max(self.max.abs());
        span.is_finite() && span > magnitude * f64::EPSILON * 4.0 * steps.max(1) as f64
    }

    /// `count` evenly spaced values from `min` to `max` inclusive.
    pub fn linspace(&self, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![self.min],
            _ => {
                let last = count - 1;
                (0..count)
                    .map(|i| {
                        if i == last {
                            self.max
                        } else {
                            self.min + self.span() * i as f64 / last as f64
                        }
                    })
                    .collect()
            }
        }
    }
}

/// A fully placed, device-independent chart. Coordinates are px with the
/// origin at the top-left; `width`/`height` are the tight visible extent.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub plot: Rect,
    pub pad: f64,
    pub x_bounds: Bounds,
    pub y_bounds: Bounds,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    /// Baseline of the x tick labels.
    pub x_tick_label_y: f32,
    /// Right edge of the y tick labels.
    pub y_tick_label_x: f32,
    pub grid: Vec<Segment>,
    pub series: Series,
    pub center: (f32, f32),
    pub x_label: AxisLabel,
    pub y_label: AxisLabel,
}

impl Chart {
    /// False when the extent overflowed and px positions are not finite.
    pub fn is_drawable(&self) -> bool {
        let finite = |(x, y): &(f32, f32)| x.is_finite() && y.is_finite();
        self.x_bounds.span().is_finite()
            && self.y_bounds.span().is_finite()
            && self.series.markers.iter().all(finite)
            && finite(&self.center)
    }
}

/// Pad between the circle and the plot edge; the fallback keeps a
/// zero-radius viewport from collapsing.
pub fn axis_pad(radius: f64, config: &ChartConfig) -> f64 {
    if radius > 0.0 {
        radius * config.pad_ratio
    } else {
        config.fallback_pad
    }
}

/// Bounds for both axes. When the padded extent is too small to resolve next
/// to the center (or zero), the pad grows from `fallback_pad` by doubling
/// until it does. A non-finite pad means the extent overflowed.
fn fit_bounds(spec: &CircleSpec, config: &ChartConfig) -> (f64, Bounds, Bounds) {
    let steps = config.tick_count.saturating_sub(1).max(1);
    let mut pad = axis_pad(spec.radius, config);
    let mut widened = false;
    loop {
        let x_bounds = Bounds::around(spec.center_x, spec.radius, pad);
        let y_bounds = Bounds::around(spec.center_y, spec.radius, pad);
        if (x_bounds.resolves(steps) && y_bounds.resolves(steps)) || !pad.is_finite() {
            if widened {
                tracing::debug!(pad, radius = spec.radius, "axis pad widened");
            }
            return (pad, x_bounds, y_bounds);
        }
        pad = if widened {
            pad * 2.0
        } else {
            pad.max(config.fallback_pad).max(f64::MIN_POSITIVE)
        };
        widened = true;
    }
}

pub fn build_chart(points: &[PointRecord], spec: &CircleSpec, theme: &Theme, config: &ChartConfig) -> Chart {
    let (pad, x_bounds, y_bounds) = fit_bounds(spec, config);
    let font_size = theme.font_size;
    let size = config.plot_size;

    let x_values = x_bounds.linspace(config.tick_count);
    let y_values = y_bounds.linspace(config.tick_count);
    let x_step = x_bounds.span() / config.tick_count.saturating_sub(1).max(1) as f64;
    let y_step = y_bounds.span() / config.tick_count.saturating_sub(1).max(1) as f64;
    let x_labels: Vec<String> = x_values
        .iter()
        .map(|v| format_tick(*v, tick_decimals(x_step)))
        .collect();
    let y_labels: Vec<String> = y_values
        .iter()
        .map(|v| format_tick(*v, tick_decimals(y_step)))
        .collect();

    let y_tick_width = y_labels
        .iter()
        .map(|label| text_width(label, font_size))
        .fold(0.0, f32::max);
    let last_x_half = x_labels
        .last()
        .map(|label| text_width(label, font_size) / 2.0)
        .unwrap_or(0.0);
    let first_x_half = x_labels
        .first()
        .map(|label| text_width(label, font_size) / 2.0)
        .unwrap_or(0.0);

    let y_label_band = font_size + LABEL_GAP;
    let left = config.margin + y_label_band + y_tick_width + LABEL_GAP + config.tick_length;
    let left = left.max(config.margin + first_x_half);
    let top = config.margin + font_size * 0.5;
    let plot = Rect {
        x: left,
        y: top,
        width: size,
        height: size,
    };

    let x_tick_label_y = plot.bottom() + config.tick_length + LABEL_GAP + font_size * 0.8;
    let y_tick_label_x = plot.x - config.tick_length - LABEL_GAP;
    let x_label_baseline = x_tick_label_y + font_size * 0.2 + LABEL_GAP + font_size;
    let width = plot.right() + last_x_half.max(config.marker_radius) + config.margin;
    let height = x_label_baseline + font_size * 0.25 + config.margin;

    let to_px_x = |v: f64| plot.x + ((v - x_bounds.min) / x_bounds.span()) as f32 * plot.width;
    let to_px_y = |v: f64| plot.bottom() - ((v - y_bounds.min) / y_bounds.span()) as f32 * plot.height;

    let x_ticks: Vec<Tick> = x_values
        .iter()
        .zip(x_labels)
        .map(|(value, label)| Tick {
            value: *value,
            pos: to_px_x(*value),
            label,
        })
        .collect();
    let y_ticks: Vec<Tick> = y_values
        .iter()
        .zip(y_labels)
        .map(|(value, label)| Tick {
            value: *value,
            pos: to_px_y(*value),
            label,
        })
        .collect();

    let mut grid = Vec::with_capacity(x_ticks.len() + y_ticks.len());
    for tick in &x_ticks {
        grid.push(Segment {
            from: (tick.pos, plot.y),
            to: (tick.pos, plot.bottom()),
        });
    }
    for tick in &y_ticks {
        grid.push(Segment {
            from: (plot.x, tick.pos),
            to: (plot.right(), tick.pos),
        });
    }

    let markers: Vec<(f32, f32)> = points.iter().map(|p| (to_px_x(p.x), to_px_y(p.y))).collect();
    let polyline = spec.connect_with_line.then(|| {
        let mut line = markers.clone();
        if config.close_polyline
            && let Some(first) = markers.first()
        {
            line.push(*first);
        }
        line
    });

    let x_label = AxisLabel {
        text: format!("X ({})", spec.unit),
        x: plot.x + plot.width / 2.0,
        y: x_label_baseline,
        vertical: false,
    };
    let y_label = AxisLabel {
        text: format!("Y ({})", spec.unit),
        x: config.margin + font_size * 0.8,
        y: plot.y + plot.height / 2.0,
        vertical: true,
    };

    tracing::debug!(
        x_min = x_bounds.min,
        x_max = x_bounds.max,
        y_min = y_bounds.min,
        y_max = y_bounds.max,
        pad,
        width,
        height,
        "chart laid out"
    );

    Chart {
        width,
        height,
        font_size,
        plot,
        pad,
        x_bounds,
        y_bounds,
        x_ticks,
        y_ticks,
        x_tick_label_y,
        y_tick_label_x,
        grid,
        series: Series {
            markers,
            polyline,
            color: spec.color.clone(),
        },
        center: (to_px_x(spec.center_x), to_px_y(spec.center_y)),
        x_label,
        y_label,
    }
}
