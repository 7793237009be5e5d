//! Planar geometry over normalized landmark coordinates.

use crate::models::LandmarkPoint;

/// Angle at joint `b` swept from ray `b→a` to ray `b→c`, in degrees.
///
/// Computed as a difference of arctangents and folded into `[0, 360)`, so
/// the result is direction-sensitive: a reflex bend reads above 180.
pub fn joint_angle_deg(a: &LandmarkPoint, b: &LandmarkPoint, c: &LandmarkPoint) -> f64 {
    let angle = ((c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x)).to_degrees();
    if angle < 0.0 {
        (angle + 360.0).abs()
    } else {
        angle.abs()
    }
}

pub fn midpoint(a: &LandmarkPoint, b: &LandmarkPoint) -> (f64, f64) {
    ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Lean of the shoulder→hip line away from vertical, in degrees.
pub fn spine_angle_deg(shoulder_center: (f64, f64), hip_center: (f64, f64)) -> f64 {
    (hip_center.0 - shoulder_center.0)
        .atan2(hip_center.1 - shoulder_center.1)
        .to_degrees()
        .abs()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`).
pub fn variance(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    Some(values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64)
}

pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
