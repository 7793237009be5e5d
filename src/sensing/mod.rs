mod controller;
mod loop_worker;
mod source;

pub use controller::AnalysisController;
pub use loop_worker::{analyze_source, SessionOutcome, SessionRunner, DEFAULT_PROGRESS_LOG_EVERY};
pub use source::{FrameSource, JsonlFrameSource, MemoryFrameSource, PoseSample};
