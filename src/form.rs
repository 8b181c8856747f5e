use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_POINTS: u32 = 3;
pub const MAX_POINTS: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    M,
    Cm,
    Mm,
    Km,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::M => "m",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
            Unit::Km => "km",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" => Ok(Unit::M),
            "cm" => Ok(Unit::Cm),
            "mm" => Ok(Unit::Mm),
            "km" => Ok(Unit::Km),
            other => Err(Error::InvalidInput(format!(
                "unknown unit '{other}' (expected m, cm, mm or km)"
            ))),
        }
    }
}

/// An sRGB color as picked in the form. Keeps the original spelling for
/// display in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    raw: String,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            raw: format!("#{r:02x}{g:02x}{b:02x}"),
        }
    }

    /// Hex form used in SVG attributes.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Channels normalized to 0..=1, for PDF color operators.
    pub fn to_unit_rgb(&self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }

    /// Mix toward white; approximates alpha on a white page.
    pub fn blend_over_white(&self, alpha: f32) -> (f32, f32, f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        let (r, g, b) = self.to_unit_rgb();
        (
            1.0 - alpha * (1.0 - r),
            1.0 - alpha * (1.0 - g),
            1.0 - alpha * (1.0 - b),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || Error::InvalidInput(format!("invalid color '{trimmed}' (expected #rrggbb)"));
        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        let (r, g, b) = match hex.len() {
            6 => (channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?),
            3 => {
                let expand = |idx: usize| channel(&hex[idx..idx + 1].repeat(2));
                (expand(0)?, expand(1)?, expand(2)?)
            }
            _ => return Err(invalid()),
        };
        Ok(Self {
            r,
            g,
            b,
            raw: trimmed.to_string(),
        })
    }
}

/// The immutable parameters of one generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleSpec {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub point_count: u32,
    pub color: Color,
    pub connect_with_line: bool,
    pub unit: Unit,
}

impl CircleSpec {
    /// Builds a spec, clamping radius to `>= 0` and the point count into
    /// `[MIN_POINTS, MAX_POINTS]`.
    pub fn new(center_x: f64, center_y: f64, radius: f64, point_count: u32) -> Self {
        Self {
            center_x,
            center_y,
            radius: clamp_radius(radius),
            point_count: clamp_point_count(point_count),
            color: Color::rgb(0x1f, 0x77, 0xb4),
            connect_with_line: true,
            unit: Unit::M,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_line(mut self, connect: bool) -> Self {
        self.connect_with_line = connect;
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// One field per line, as printed on the report cover. Coordinates keep a
    /// decimal point even when integral (`5.0`, not `5`).
    pub fn summary(&self) -> String {
        let unit = self.unit;
        format!(
            "Center: ({:?}, {:?}) {unit}\nRadius: {:?} {unit}\nPoint count: {}\nColor: {}\nConnect with line: {}",
            self.center_x,
            self.center_y,
            self.radius,
            self.point_count,
            self.color,
            self.connect_with_line
        )
    }
}

impl Default for CircleSpec {
    fn default() -> Self {
        Self::new(0.0, 0.0, 5.0, 36)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMeta {
    pub author_name: String,
    pub contact_info: String,
    pub parameter_summary: String,
}

impl ReportMeta {
    pub fn new(author_name: impl Into<String>, contact_info: impl Into<String>, spec: &CircleSpec) -> Self {
        Self {
            author_name: author_name.into(),
            contact_info: contact_info.into(),
            parameter_summary: spec.summary(),
        }
    }
}

pub fn clamp_radius(radius: f64) -> f64 {
    if radius.is_finite() { radius.max(0.0) } else { 0.0 }
}

pub fn clamp_point_count(count: u32) -> u32 {
    count.clamp(MIN_POINTS, MAX_POINTS)
}

/// Raw form values, before clamping and parsing. Every field may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormInput {
    pub center_x: Option<f64>,
    pub center_y: Option<f64>,
    pub radius: Option<f64>,
    #[serde(deserialize_with = "count_from_number")]
    pub point_count: Option<i64>,
    pub color: Option<String>,
    pub connect_line: Option<bool>,
    pub unit: Option<String>,
    pub author_name: Option<String>,
    pub contact_info: Option<String>,
}

/// Accepts any JSON number for the point count; fractional values round to
/// the nearest integer before clamping.
fn count_from_number<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if !value.is_finite() {
        return Err(serde::de::Error::custom("pointCount must be a finite number"));
    }
    Ok(Some(value.round() as i64))
}

pub const DEFAULT_AUTHOR: &str = "Your Name";
pub const DEFAULT_CONTACT: &str = "your@email.example";
pub const DEFAULT_COLOR: &str = "#1f77b4";

impl FormInput {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Fields set in `other` replace those in `self`.
    pub fn merge(mut self, other: FormInput) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(
            center_x,
            center_y,
            radius,
            point_count,
            color,
            connect_line,
            unit,
            author_name,
            contact_info
        );
        self
    }

    pub fn collect(&self) -> Result<(CircleSpec, ReportMeta)> {
        let center_x = self.center_x.unwrap_or(0.0);
        let center_y = self.center_y.unwrap_or(0.0);
        if !center_x.is_finite() || !center_y.is_finite() {
            return Err(Error::InvalidInput(
                "center coordinates must be finite".to_string(),
            ));
        }
        let count = self
            .point_count
            .unwrap_or(36)
            .clamp(i64::from(MIN_POINTS), i64::from(MAX_POINTS));
        let count = u32::try_from(count).unwrap_or(MIN_POINTS);
        let color: Color = self.color.as_deref().unwrap_or(DEFAULT_COLOR).parse()?;
        let unit: Unit = match self.unit.as_deref() {
            Some(raw) => raw.parse()?,
            None => Unit::default(),
        };

        let spec = CircleSpec::new(center_x, center_y, self.radius.unwrap_or(5.0), count)
            .with_color(color)
            .with_line(self.connect_line.unwrap_or(true))
            .with_unit(unit);
        let meta = ReportMeta::new(
            self.author_name.as_deref().unwrap_or(DEFAULT_AUTHOR),
            self.contact_info.as_deref().unwrap_or(DEFAULT_CONTACT),
            &spec,
        );
        tracing::debug!(
            center_x = spec.center_x,
            center_y = spec.center_y,
            radius = spec.radius,
            points = spec.point_count,
            "collected form input"
        );
        Ok((spec, meta))
    }
}
