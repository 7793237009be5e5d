use super::{point, DetectionContext, DetectionResult, FaultDetector};
use crate::analysis::geometry::joint_angle_deg;
use crate::models::{FaultKind, FaultResult, SwingPhase};

/// Trail elbow folding below the extension expected for the phase.
pub struct TrailArmCollapse;

impl FaultDetector for TrailArmCollapse {
    fn kind(&self) -> FaultKind {
        FaultKind::TrailArmCollapse
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectionResult {
        let side = ctx.config.trail_side;
        let shoulder = point(ctx.frame, side.shoulder())?;
        let elbow = point(ctx.frame, side.elbow())?;
        let wrist = point(ctx.frame, side.wrist())?;

        let elbow_angle = joint_angle_deg(shoulder, elbow, wrist);
        let threshold = match ctx.phase {
            SwingPhase::Backswing | SwingPhase::Transition => ctx.config.elbow_min_backswing_deg,
            SwingPhase::Downswing => ctx.config.elbow_min_downswing_deg,
            _ => ctx.config.elbow_min_default_deg,
        };

        let collapsing = elbow_angle < threshold;
        let confidence = if collapsing {
            ((threshold - elbow_angle) / threshold).max(0.0)
        } else {
            0.0
        };

        Ok(FaultResult::measured(collapsing, confidence)
            .with_measurement("elbow_angle", elbow_angle)
            .with_measurement("threshold", threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::config::DetectionConfig;
    use crate::analysis::detectors::test_support::{base_landmarks, frame, history_with, set};
    use crate::analysis::detectors::DetectionError;
    use crate::models::{BodySide, LandmarkName, Severity};
    use approx::assert_abs_diff_eq;

    /// Trail arm bent to `elbow_deg` at the elbow.
    fn bent_arm_landmarks(elbow_deg: f64) -> crate::models::Landmarks {
        let mut landmarks = base_landmarks();
        set(&mut landmarks, LandmarkName::RightShoulder, 0.60, 0.30);
        set(&mut landmarks, LandmarkName::RightElbow, 0.60, 0.50);
        let rad = elbow_deg.to_radians();
        // Shoulder sits straight above the elbow (-90 deg); the forearm is
        // rotated `elbow_deg` from it.
        set(
            &mut landmarks,
            LandmarkName::RightWrist,
            0.60 + 0.1 * (rad - std::f64::consts::FRAC_PI_2).cos(),
            0.50 + 0.1 * (rad - std::f64::consts::FRAC_PI_2).sin(),
        );
        landmarks
    }

    #[test]
    fn bent_arm_in_backswing_uses_100_degree_threshold() {
        let config = DetectionConfig::default();
        let current = frame(40, bent_arm_landmarks(50.0));
        let history = history_with(0, Some(&current));
        let ctx = DetectionContext {
            frame: &current,
            history: &history,
            phase: SwingPhase::Backswing,
            config: &config,
        };

        let result = TrailArmCollapse.detect(&ctx).unwrap();
        assert!(result.detected);
        assert_abs_diff_eq!(result.measurement("elbow_angle").unwrap(), 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.confidence, 0.5, epsilon = 1e-9);
        assert_eq!(result.severity, Severity::Moderate);
    }

    #[test]
    fn threshold_follows_phase() {
        let config = DetectionConfig::default();
        let current = frame(70, bent_arm_landmarks(60.0));
        let history = history_with(0, Some(&current));

        let at = |phase| {
            TrailArmCollapse
                .detect(&DetectionContext {
                    frame: &current,
                    history: &history,
                    phase,
                    config: &config,
                })
                .unwrap()
        };

        assert_abs_diff_eq!(at(SwingPhase::Downswing).confidence, 30.0 / 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(at(SwingPhase::Impact).confidence, 35.0 / 95.0, epsilon = 1e-9);
        assert_abs_diff_eq!(at(SwingPhase::Transition).confidence, 0.4, epsilon = 1e-9);
    }

    #[test]
    fn extended_arm_is_clean() {
        let config = DetectionConfig::default();
        let current = frame(40, base_landmarks());
        let history = history_with(0, Some(&current));
        let result = TrailArmCollapse
            .detect(&DetectionContext {
                frame: &current,
                history: &history,
                phase: SwingPhase::Backswing,
                config: &config,
            })
            .unwrap();

        assert!(!result.detected);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.severity, Severity::None);
    }

    #[test]
    fn missing_elbow_is_reported() {
        let config = DetectionConfig::default();
        let mut landmarks = base_landmarks();
        landmarks.remove(&LandmarkName::RightElbow);
        let current = frame(40, landmarks);
        let history = history_with(0, Some(&current));

        let err = TrailArmCollapse
            .detect(&DetectionContext {
                frame: &current,
                history: &history,
                phase: SwingPhase::Backswing,
                config: &config,
            })
            .unwrap_err();
        assert_eq!(err, DetectionError::MissingLandmark(LandmarkName::RightElbow));
    }

    #[test]
    fn left_handed_golfer_checks_left_arm() {
        let config = DetectionConfig {
            trail_side: BodySide::Left,
            ..DetectionConfig::default()
        };
        let mut landmarks = bent_arm_landmarks(60.0);
        landmarks.remove(&LandmarkName::RightElbow);
        let current = frame(40, landmarks);
        let history = history_with(0, Some(&current));

        let result = TrailArmCollapse.detect(&DetectionContext {
            frame: &current,
            history: &history,
            phase: SwingPhase::Backswing,
            config: &config,
        });
        assert!(result.is_ok());
    }
}
