use super::{
    point, require_history, shoulder_line_y, DetectionContext, DetectionError, DetectionResult,
    FaultDetector,
};
use crate::analysis::geometry::{clamp01, mean};
use crate::models::{FaultKind, FaultResult, LandmarkFrame, SwingPhase};

const MIN_BASELINE: f64 = 1e-9;

/// Hands moving outside the plane at the start of the downswing.
///
/// Compares the trail wrist's vertical distance from the shoulder line with
/// the same distance averaged over the recent window. Each window frame is
/// measured against its own shoulder line, not the current frame's.
pub struct OverTheTop;

fn wrist_deviation(frame: &LandmarkFrame, ctx: &DetectionContext<'_>) -> Result<f64, DetectionError> {
    let wrist = point(frame, ctx.config.trail_side.wrist())?;
    Ok((wrist.y - shoulder_line_y(frame)?).abs())
}

impl FaultDetector for OverTheTop {
    fn kind(&self) -> FaultKind {
        FaultKind::OverTheTop
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectionResult {
        let window = ctx.config.plane_window;
        require_history(ctx.history, window)?;
        if !ctx.phase.is_one_of(&[SwingPhase::Transition, SwingPhase::Downswing]) {
            return Ok(FaultResult::inactive());
        }

        let deviation = wrist_deviation(ctx.frame, ctx)?;
        let recent = ctx
            .history
            .last_k(window)
            .iter()
            .map(|past| wrist_deviation(past, ctx))
            .collect::<Result<Vec<f64>, _>>()?;
        let baseline = mean(&recent).ok_or(DetectionError::Degenerate("empty swing plane window"))?;
        if baseline < MIN_BASELINE {
            return Err(DetectionError::Degenerate("zero swing plane baseline"));
        }

        let over_the_top = deviation > baseline * ctx.config.plane_deviation_ratio;
        // Confidence is reported even below the detection ratio.
        let confidence = clamp01((deviation - baseline) / baseline);

        Ok(FaultResult::measured(over_the_top, confidence)
            .with_measurement("deviation", deviation)
            .with_measurement("baseline", baseline))
    }
}
