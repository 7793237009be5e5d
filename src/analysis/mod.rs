//! The fault-detection pipeline: phase labelling, rolling history, the
//! detector set and the per-frame analyzer that ties them together.

pub mod config;
pub mod detectors;
pub mod frame;
pub mod geometry;
pub mod history;
pub mod phase;
pub mod session;

pub use config::DetectionConfig;
pub use detectors::{default_detectors, DetectionContext, DetectionError, DetectionResult, FaultDetector};
pub use frame::{FaultCounters, FrameAnalysis, FrameAnalyzer};
pub use history::HistoryBuffer;
pub use phase::classify_phase;
pub use session::SwingSession;
