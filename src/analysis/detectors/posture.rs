use super::{point, require_history, DetectionContext, DetectionResult, FaultDetector};
use crate::analysis::geometry::{clamp01, midpoint, spine_angle_deg};
use crate::models::{FaultKind, FaultResult, LandmarkName, SwingPhase};

const IMPACT_ZONE: [SwingPhase; 2] = [SwingPhase::Downswing, SwingPhase::Impact];

/// Spine standing up (losing forward bend) through the impact zone.
pub struct EarlyExtension;

impl FaultDetector for EarlyExtension {
    fn kind(&self) -> FaultKind {
        FaultKind::EarlyExtension
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectionResult {
        let frame = ctx.frame;
        let shoulder_center = midpoint(
            point(frame, LandmarkName::LeftShoulder)?,
            point(frame, LandmarkName::RightShoulder)?,
        );
        let hip_center = midpoint(
            point(frame, LandmarkName::LeftHip)?,
            point(frame, LandmarkName::RightHip)?,
        );

        let spine_angle = spine_angle_deg(shoulder_center, hip_center);
        let in_impact_zone = ctx.phase.is_one_of(&IMPACT_ZONE);
        let threshold = if in_impact_zone {
            ctx.config.spine_min_impact_zone_deg
        } else {
            ctx.config.spine_min_default_deg
        };

        let extending = in_impact_zone && spine_angle < threshold;
        let confidence = if extending {
            ((threshold - spine_angle) / threshold).max(0.0)
        } else {
            0.0
        };

        Ok(FaultResult::measured(extending, confidence)
            .with_measurement("spine_angle", spine_angle)
            .with_measurement("threshold", threshold))
    }
}

/// Upper body tilting toward the target at the top of the backswing.
pub struct ReversePivot;

impl FaultDetector for ReversePivot {
    fn kind(&self) -> FaultKind {
        FaultKind::ReversePivot
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectionResult {
        require_history(ctx.history, ctx.config.pivot_min_history)?;
        if !ctx.phase.is_one_of(&[SwingPhase::Backswing, SwingPhase::Transition]) {
            return Ok(FaultResult::inactive());
        }

        let frame = ctx.frame;
        let shoulder_tilt = point(frame, LandmarkName::LeftShoulder)?.x
            - point(frame, LandmarkName::RightShoulder)?.x;
        let hip_tilt =
            point(frame, LandmarkName::LeftHip)?.x - point(frame, LandmarkName::RightHip)?.x;
        let spine_tilt = shoulder_tilt - hip_tilt;

        let threshold = ctx.config.pivot_tilt_threshold;
        // Transition is measured but only the backswing can flag it.
        let reversed = ctx.phase == SwingPhase::Backswing && spine_tilt > threshold;
        let confidence = if reversed {
            clamp01(spine_tilt / threshold)
        } else {
            0.0
        };

        Ok(FaultResult::measured(reversed, confidence).with_measurement("spine_tilt", spine_tilt))
    }
}
