use super::{point, require_history, DetectionContext, DetectionResult, FaultDetector};
use crate::models::{FaultKind, FaultResult, LandmarkName, SwingPhase};

/// Weight on the wrong foot for the phase.
///
/// Uses the horizontal ankle-to-hip offset on each side as a pressure proxy.
/// History only gates readiness; the ratio comes from the current frame.
pub struct WeightShift;

impl FaultDetector for WeightShift {
    fn kind(&self) -> FaultKind {
        FaultKind::WeightShift
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectionResult {
        require_history(ctx.history, ctx.config.weight_min_history)?;

        let frame = ctx.frame;
        let left_indicator =
            (point(frame, LandmarkName::LeftAnkle)?.x - point(frame, LandmarkName::LeftHip)?.x).abs();
        let right_indicator = (point(frame, LandmarkName::RightAnkle)?.x
            - point(frame, LandmarkName::RightHip)?.x)
            .abs();
        let weight_ratio =
            left_indicator / (left_indicator + right_indicator + ctx.config.weight_epsilon);

        let improper = match ctx.phase {
            SwingPhase::Backswing => weight_ratio > ctx.config.weight_backswing_max_ratio,
            SwingPhase::Downswing | SwingPhase::Impact => {
                weight_ratio < ctx.config.weight_impact_min_ratio
            }
            _ => false,
        };
        let confidence = if improper {
            (weight_ratio - 0.5).abs() * 2.0
        } else {
            0.0
        };

        Ok(FaultResult::measured(improper, confidence).with_measurement("weight_ratio", weight_ratio))
    }
}
