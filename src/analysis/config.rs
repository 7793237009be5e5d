use serde::{Deserialize, Serialize};

use crate::models::BodySide;

/// Thresholds and window sizes for the fault detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Side whose arm and wrist are checked for collapse and swing plane.
    pub trail_side: BodySide,

    /// Trail arm collapse: minimum elbow angle (degrees) per phase group
    pub elbow_min_backswing_deg: f64,
    pub elbow_min_downswing_deg: f64,
    pub elbow_min_default_deg: f64,

    /// Early extension: minimum spine angle (degrees)
    pub spine_min_impact_zone_deg: f64,
    pub spine_min_default_deg: f64,

    /// Over the top: wrist deviation vs. recent baseline
    pub plane_window: usize,
    pub plane_deviation_ratio: f64,

    /// Sway: hips compared to the address position
    pub sway_address_frames: usize,
    pub sway_threshold: f64,

    /// Reverse pivot
    pub pivot_min_history: usize,
    pub pivot_tilt_threshold: f64,

    /// Head movement: nose position spread over the recent window
    pub head_min_history: usize,
    pub head_window: usize,
    pub head_movement_threshold: f64,

    /// Weight shift: left-side share of the ankle/hip offsets
    pub weight_min_history: usize,
    pub weight_backswing_max_ratio: f64,
    pub weight_impact_min_ratio: f64,
    pub weight_epsilon: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            trail_side: BodySide::Right,
            elbow_min_backswing_deg: 100.0,
            elbow_min_downswing_deg: 90.0,
            elbow_min_default_deg: 95.0,
            spine_min_impact_zone_deg: 15.0,
            spine_min_default_deg: 12.0,
            plane_window: 10,
            plane_deviation_ratio: 1.3,
            sway_address_frames: 5,
            sway_threshold: 0.05,
            pivot_min_history: 10,
            pivot_tilt_threshold: 0.02,
            head_min_history: 5,
            head_window: 10,
            head_movement_threshold: 0.01,
            weight_min_history: 10,
            weight_backswing_max_ratio: 0.6,
            weight_impact_min_ratio: 0.4,
            weight_epsilon: 0.001,
        }
    }
}
