use crate::form::Unit;
use crate::points::PointRecord;

pub const COORD_DECIMALS: usize = 6;
pub const ANGLE_DECIMALS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRow {
    pub x: f64,
    pub y: f64,
    pub angle_deg: f64,
}

impl TableRow {
    /// Cells formatted at the table's fixed precision.
    pub fn cells(&self) -> [String; 3] {
        [
            format!("{:.*}", COORD_DECIMALS, self.x),
            format!("{:.*}", COORD_DECIMALS, self.y),
            format!("{:.*}", ANGLE_DECIMALS, self.angle_deg),
        ]
    }
}

/// Coordinates rounded for display and export. Built from, never fed back
/// into, the generated points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointTable {
    pub headers: [String; 3],
    pub rows: Vec<TableRow>,
}

impl PointTable {
    pub fn from_points(points: &[PointRecord], unit: Unit) -> Self {
        let rows = points
            .iter()
            .map(|p| TableRow {
                x: round_to(p.x, COORD_DECIMALS),
                y: round_to(p.y, COORD_DECIMALS),
                angle_deg: round_to(p.angle_degrees, ANGLE_DECIMALS),
            })
            .collect();
        Self {
            headers: [
                format!("X ({unit})"),
                format!("Y ({unit})"),
                "angle_deg".to_string(),
            ],
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Right-aligned plain text with a leading row index, for the terminal.
    pub fn to_text(&self) -> String {
        let cells: Vec<[String; 3]> = self.rows.iter().map(TableRow::cells).collect();
        let index_width = self.rows.len().saturating_sub(1).to_string().len();
        let mut widths = [0usize; 3];
        for (col, header) in self.headers.iter().enumerate() {
            widths[col] = header.chars().count();
        }
        for row in &cells {
            for (col, cell) in row.iter().enumerate() {
                widths[col] = widths[col].max(cell.len());
            }
        }

        let mut out = String::new();
        out.push_str(&" ".repeat(index_width));
        for (col, header) in self.headers.iter().enumerate() {
            out.push_str(&format!("  {header:>width$}", width = widths[col]));
        }
        out.push('\n');
        for (idx, row) in cells.iter().enumerate() {
            out.push_str(&format!("{idx:>index_width$}"));
            for (col, cell) in row.iter().enumerate() {
                out.push_str(&format!("  {cell:>width$}", width = widths[col]));
            }
            out.push('\n');
        }
        out
    }
}

/// Half-away-from-zero rounding; never yields negative zero.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}
