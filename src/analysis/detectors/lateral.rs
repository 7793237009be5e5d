use super::{
    hip_center_x, point, require_history, DetectionContext, DetectionError, DetectionResult,
    FaultDetector,
};
use crate::analysis::geometry::{clamp01, mean, variance};
use crate::models::{FaultKind, FaultResult, LandmarkName, SwingPhase};

/// Hips sliding sideways away from the address position during the backswing.
///
/// The reference is the mean hip center over the first frames of the
/// session, not a rolling window.
pub struct Sway;

impl FaultDetector for Sway {
    fn kind(&self) -> FaultKind {
        FaultKind::Sway
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectionResult {
        let address_frames = ctx.config.sway_address_frames;
        require_history(ctx.history, address_frames)?;

        let hip_x = hip_center_x(ctx.frame)?;
        let address_positions = ctx
            .history
            .first_k(address_frames)
            .iter()
            .map(hip_center_x)
            .collect::<Result<Vec<f64>, _>>()?;
        let address_hip_x =
            mean(&address_positions).ok_or(DetectionError::Degenerate("no address frames"))?;

        let threshold = ctx.config.sway_threshold;
        let lateral_movement = (hip_x - address_hip_x).abs();
        let swaying = lateral_movement > threshold
            && ctx.phase.is_one_of(&[SwingPhase::Takeaway, SwingPhase::Backswing]);
        let confidence = if swaying {
            clamp01(lateral_movement / threshold)
        } else {
            0.0
        };

        Ok(FaultResult::measured(swaying, confidence)
            .with_measurement("lateral_movement", lateral_movement))
    }
}

/// Head wandering over the recent frames, in any phase.
pub struct HeadMovement;

impl FaultDetector for HeadMovement {
    fn kind(&self) -> FaultKind {
        FaultKind::HeadMovement
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectionResult {
        let min_frames = ctx.config.head_min_history;
        require_history(ctx.history, min_frames)?;
        point(ctx.frame, LandmarkName::Nose)?;

        let window = ctx.history.last_k(ctx.config.head_window);
        if window.len() < min_frames {
            return Err(DetectionError::InsufficientHistory {
                required: min_frames,
                available: window.len(),
            });
        }

        let mut xs = Vec::with_capacity(window.len());
        let mut ys = Vec::with_capacity(window.len());
        for past in window {
            let nose = point(past, LandmarkName::Nose)?;
            xs.push(nose.x);
            ys.push(nose.y);
        }

        let (var_x, var_y) = variance(&xs)
            .zip(variance(&ys))
            .ok_or(DetectionError::Degenerate("empty head window"))?;
        let total_movement = (var_x + var_y).sqrt();

        let threshold = ctx.config.head_movement_threshold;
        let excessive = total_movement > threshold;
        let confidence = if excessive {
            clamp01(total_movement / threshold)
        } else {
            0.0
        };

        Ok(FaultResult::measured(excessive, confidence)
            .with_measurement("movement_amount", total_movement))
    }
}
