use crate::form::CircleSpec;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
    pub angle_degrees: f64,
}

/// Evenly spaced points on the circle, starting at angle 0 and walking
/// counter-clockwise. Point 0 is always `(center_x + radius, center_y)`.
pub fn generate_points(spec: &CircleSpec) -> Vec<PointRecord> {
    let count = spec.point_count.max(1);
    let step = 360.0 / f64::from(count);
    let points: Vec<PointRecord> = (0..count)
        .map(|i| {
            let angle_degrees = f64::from(i) * step;
            let (sin, cos) = angle_degrees.to_radians().sin_cos();
            PointRecord {
                x: spec.center_x + spec.radius * cos,
                y: spec.center_y + spec.radius * sin,
                angle_degrees,
            }
        })
        .collect();
    tracing::debug!(count = points.len(), step, "generated circle points");
    points
}
