pub mod fault;
pub mod landmark;
pub mod phase;

pub use fault::{FaultKind, FaultResult, Severity};
pub use landmark::{frame_progress, BodySide, LandmarkFrame, LandmarkName, LandmarkPoint, Landmarks};
pub use phase::SwingPhase;
