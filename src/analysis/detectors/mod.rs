//! Per-frame fault detectors.
//!
//! Every detector is a stateless function of the current frame, the session
//! history (which already contains the current frame) and the swing phase.
//! Anything that prevents a measurement is reported as a [`DetectionError`]
//! rather than a default result, so the frame analyzer decides how each
//! failure is shown.

mod arm;
mod lateral;
mod posture;
mod swing_plane;
mod weight;

pub use arm::TrailArmCollapse;
pub use lateral::{HeadMovement, Sway};
pub use posture::{EarlyExtension, ReversePivot};
pub use swing_plane::OverTheTop;
pub use weight::WeightShift;

use thiserror::Error;

use crate::analysis::config::DetectionConfig;
use crate::analysis::history::HistoryBuffer;
use crate::models::{FaultKind, FaultResult, LandmarkFrame, LandmarkName, LandmarkPoint, SwingPhase};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    #[error("needs {required} frames of history, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("landmark {0} missing from frame")]
    MissingLandmark(LandmarkName),

    #[error("degenerate geometry: {0}")]
    Degenerate(&'static str),
}

pub type DetectionResult = Result<FaultResult, DetectionError>;

/// Everything a detector may read for one frame.
#[derive(Clone, Copy)]
pub struct DetectionContext<'a> {
    pub frame: &'a LandmarkFrame,
    pub history: &'a HistoryBuffer,
    pub phase: SwingPhase,
    pub config: &'a DetectionConfig,
}

pub trait FaultDetector: Send + Sync {
    fn kind(&self) -> FaultKind;

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectionResult;
}

/// One detector per [`FaultKind`], in enumeration order.
pub fn default_detectors() -> Vec<Box<dyn FaultDetector>> {
    vec![
        Box::new(TrailArmCollapse),
        Box::new(EarlyExtension),
        Box::new(OverTheTop),
        Box::new(Sway),
        Box::new(ReversePivot),
        Box::new(HeadMovement),
        Box::new(WeightShift),
    ]
}

pub(crate) fn point(frame: &LandmarkFrame, name: LandmarkName) -> Result<&LandmarkPoint, DetectionError> {
    frame
        .point(name)
        .ok_or(DetectionError::MissingLandmark(name))
}

pub(crate) fn require_history(history: &HistoryBuffer, required: usize) -> Result<(), DetectionError> {
    if history.len() < required {
        return Err(DetectionError::InsufficientHistory {
            required,
            available: history.len(),
        });
    }
    Ok(())
}

/// Midpoint x of the hips, shared by sway and its address baseline.
pub(crate) fn hip_center_x(frame: &LandmarkFrame) -> Result<f64, DetectionError> {
    let left = point(frame, LandmarkName::LeftHip)?;
    let right = point(frame, LandmarkName::RightHip)?;
    Ok((left.x + right.x) / 2.0)
}

/// Mean y of both shoulders.
pub(crate) fn shoulder_line_y(frame: &LandmarkFrame) -> Result<f64, DetectionError> {
    let left = point(frame, LandmarkName::LeftShoulder)?;
    let right = point(frame, LandmarkName::RightShoulder)?;
    Ok((left.y + right.y) / 2.0)
}
